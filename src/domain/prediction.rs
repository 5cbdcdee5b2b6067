// ============================================================
// Layer 3 - PredictionResult
// ============================================================
// What the inference boundary hands back for one request.
// Serialises to exactly one of:
//
//   {"prediction": "Safe Storage"}
//   {"prediction": "Unsafe Storage"}
//   {"error": "<message>"}

use serde::{Deserialize, Serialize};

use crate::domain::status::StorageStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResult {
    Prediction { prediction: String },
    Error { error: String },
}

impl PredictionResult {
    pub fn from_status(status: StorageStatus) -> Self {
        Self::Prediction { prediction: status.label().to_string() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { error: message.into() }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Prediction { prediction } => Some(prediction),
            Self::Error { .. }              => None,
        }
    }

    /// Render as the JSON response body.
    pub fn to_json(&self) -> String {
        // Two string-only shapes; serialisation cannot fail.
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!("{{\"error\":{:?}}}", e.to_string())
        })
    }
}
