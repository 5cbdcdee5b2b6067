// ============================================================
// Layer 4 - Train/Test Splitter
// ============================================================
// Shuffles samples and splits them into two sets:
//   - Training set: used to fit the forest
//   - Held-out set: used only to measure the fitted forest
//
// The shuffle is driven by a seeded StdRng, so the same samples
// with the same seed and fraction always produce the same
// partition. That is what makes two training runs comparable.
//
// Held-out size is ceil(n * test_fraction); the rest trains.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Shuffle `samples` with `seed` and split into (train, test).
///
/// # Arguments
/// * `samples`       - All available samples (consumed by this function)
/// * `test_fraction` - Proportion held out, e.g. 0.2 = 20%
/// * `seed`          - Shuffle seed
///
/// # Example
/// ```ignore
/// let (train, test) = split_train_test(all_samples, 0.2, 42);
/// // train has 80% of samples, test has 20%
/// ```
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total     = samples.len();
    let test_size = ((total as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let split_at  = total - test_size.min(total);

    // After this: samples = [0..split_at], test = [split_at..total]
    let test = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} held out ({}% / {}%)",
        samples.len(),
        test.len(),
        (samples.len() * 100) / total.max(1),
        (test.len()    * 100) / total.max(1),
    );

    (samples, test)
}
