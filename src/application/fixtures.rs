// Synthetic training data shared by the use-case tests.

use std::{fmt::Write as _, fs, path::Path};

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::application::train_use_case::TrainConfig;

pub const HEADER: &str = "temperature,humidity,moisture,gas_level,weight,status";

/// Readings in the sensor ranges, labeled Good when gas is low and
/// humidity moderate, Bad otherwise.
pub fn dataset_csv(rows: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut csv = format!("{HEADER}\n");
    for _ in 0..rows {
        let temperature: i64 = rng.gen_range(20..=40);
        let humidity:    i64 = rng.gen_range(40..=90);
        let moisture:    i64 = rng.gen_range(300..=700);
        let gas_level:   i64 = rng.gen_range(0..=100);
        let weight:      i64 = rng.gen_range(200..=600);
        let status = if gas_level < 50 && humidity < 75 { "Good" } else { "Bad" };
        let _ = writeln!(csv, "{temperature},{humidity},{moisture},{gas_level},{weight},{status}");
    }
    csv
}

pub fn write_dataset(path: &Path, rows: usize, seed: u64) {
    fs::write(path, dataset_csv(rows, seed)).unwrap();
}

/// A config pointing at `dir`, with a smaller forest to keep tests quick.
pub fn config_in(dir: &Path, artifact: &str) -> TrainConfig {
    TrainConfig {
        dataset_path:  dir.join("storage_data.csv").display().to_string(),
        artifact_path: dir.join(artifact).display().to_string(),
        n_trees:       30,
        ..TrainConfig::default()
    }
}
