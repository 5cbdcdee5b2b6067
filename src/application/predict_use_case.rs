// ============================================================
// Layer 2 - Inference Service
// ============================================================
// The request/response core behind the prediction endpoint.
//
// Lifecycle:
//   Unloaded ──start()──▶ Ready
//
// There is no Unloaded value to call `predict` on: `start` either
// returns a Ready service holding a validated model or an
// ArtifactError, and the caller must not serve in the error case.
//
// Per request (`predict`):
//   1. vectorize the raw record via the Feature Schema
//   2. score the vector with the held forest
//   3. class 1 → "Safe Storage", class 0 → "Unsafe Storage"
// Input problems come back as {"error": ...}; nothing here panics
// or returns Err for a bad request.
//
// The model sits behind RwLock<Arc<Inferencer>>. Requests clone
// the Arc and score without holding the lock; `reload` builds and
// validates a whole new Inferencer before swapping the pointer, so
// readers only ever see a complete model.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::{ArtifactError, InputError};
use crate::domain::feature_vector::{json_type_name, vectorize};
use crate::domain::prediction::PredictionResult;
use crate::domain::traits::Predictor;
use crate::infra::checkpoint::{ArtifactMetadata, ArtifactStore};
use crate::ml::inferencer::Inferencer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeConfig {
    pub artifact_path: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self { artifact_path: "storage_ai_model.json".to_string() }
    }
}

pub struct InferenceService {
    store:   ArtifactStore,
    current: RwLock<Arc<Inferencer>>,
}

impl InferenceService {
    /// Load the artifact once and enter the Ready state.
    pub fn start(config: &ServeConfig) -> Result<Self, ArtifactError> {
        let store      = ArtifactStore::new(&config.artifact_path);
        let inferencer = Inferencer::from_store(&store)?;
        Ok(Self {
            store,
            current: RwLock::new(Arc::new(inferencer)),
        })
    }

    /// The model currently serving requests.
    pub fn model(&self) -> Arc<Inferencer> {
        Arc::clone(&self.current.read())
    }

    pub fn model_info(&self) -> ArtifactMetadata {
        self.model().metadata().clone()
    }

    /// Re-read the artifact and swap it in. On any error the model
    /// already being served stays in place.
    pub fn reload(&self) -> Result<(), ArtifactError> {
        let fresh = Inferencer::from_store(&self.store)?;
        *self.current.write() = Arc::new(fresh);
        tracing::info!("Model reloaded from '{}'", self.store.path().display());
        Ok(())
    }

    /// Transport entry point: a raw JSON body in, a JSON body out.
    pub fn predict_json(&self, body: &str) -> String {
        let result = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(record)) => self.predict(&record),
            Ok(other) => error_result(InputError::NotAnObject(json_type_name(&other).to_string())),
            Err(e)    => error_result(InputError::InvalidJson(e.to_string())),
        };
        result.to_json()
    }
}

impl Predictor for InferenceService {
    fn predict(&self, raw: &Map<String, Value>) -> PredictionResult {
        let features = match vectorize(raw) {
            Ok(v)  => v,
            Err(e) => return error_result(e),
        };

        let status = self.model().score(&features);
        tracing::debug!("Scored {:?} -> {}", features.0, status.label());
        PredictionResult::from_status(status)
    }
}

fn error_result(e: InputError) -> PredictionResult {
    tracing::debug!("Rejected request: {e}");
    PredictionResult::error(e.to_string())
}
