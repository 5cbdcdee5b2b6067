// ============================================================
// Layer 3 - Core Traits
// ============================================================
// The seams between layers:
//   - CsvLoader implements SampleSource
//   - RandomForest implements Classifier
//   - InferenceService implements Predictor
//
// The application layer only talks to these traits, so a
// different dataset format or model family slots in without
// touching the use cases.

use serde_json::{Map, Value};

use crate::domain::errors::TrainingDataError;
use crate::domain::feature_vector::FeatureVector;
use crate::domain::prediction::PredictionResult;
use crate::domain::sample::LabeledSample;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Anything that can produce the labeled training set.
pub trait SampleSource {
    fn load_all(&self) -> Result<Vec<LabeledSample>, TrainingDataError>;
}

// ─── Classifier ───────────────────────────────────────────────────────────────
/// A fitted binary classifier over canonical-order feature vectors.
///
/// Implementations must be pure: the same input always yields the
/// same output, and scoring never mutates the model.
pub trait Classifier: Send + Sync {
    /// Probability of each class, indexed by class.
    fn predict_proba(&self, x: &FeatureVector) -> [f64; 2];

    /// Most probable class. Ties resolve to the lower index.
    fn predict_class(&self, x: &FeatureVector) -> usize {
        let [p0, p1] = self.predict_proba(x);
        if p1 > p0 { 1 } else { 0 }
    }
}

// ─── Predictor ────────────────────────────────────────────────────────────────
/// The request/response boundary used by a transport layer.
/// Never panics on bad input; failures come back as error payloads.
pub trait Predictor {
    fn predict(&self, raw: &Map<String, Value>) -> PredictionResult;
}
