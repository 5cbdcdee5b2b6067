// ============================================================
// Layer 3 - Error Taxonomy
// ============================================================
// Three families, each with its own recovery policy:
//
//   InputError         per request; turned into {"error": ...}
//   ArtifactError      fatal at startup; the service never
//                      exists in a half-loaded state
//   TrainingDataError  fatal to the training run; nothing is
//                      written

use std::path::PathBuf;

/// A request body that cannot be turned into a FeatureVector.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("field '{field}' must be a number, found {found}")]
    NotNumeric { field: String, found: String },

    #[error("request body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("request body must be a JSON object, found {0}")]
    NotAnObject(String),
}

/// The persisted model cannot be read, written, or trusted.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("model artifact not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read model artifact {}: {source}", .path.display())]
    Io {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("model artifact {} is corrupt: {source}", .path.display())]
    Corrupt {
        path:   PathBuf,
        source: serde_json::Error,
    },

    #[error("unsupported artifact format version {found} (expected {expected})")]
    FormatVersion { found: u32, expected: u32 },

    #[error("artifact was trained with an incompatible feature schema (fingerprint {found}, expected {expected})")]
    SchemaMismatch { found: String, expected: String },

    #[error("artifact label encoding {found:?} does not match expected {expected:?}")]
    LabelEncodingMismatch {
        found:    Vec<String>,
        expected: Vec<String>,
    },

    #[error("model artifact is malformed: {0}")]
    Malformed(String),

    #[error("failed to write model artifact {}: {source}", .path.display())]
    Write {
        path:   PathBuf,
        source: std::io::Error,
    },
}

/// The training dataset or configuration cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum TrainingDataError {
    #[error("dataset not found at {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("failed to read dataset {}: {source}", .path.display())]
    Io {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("dataset is missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("line {line}: unknown status '{value}' (expected \"Good\" or \"Bad\")")]
    UnknownLabel { line: usize, value: String },

    #[error("dataset contains no samples")]
    Empty,

    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),

    #[error("fitting the forest failed: {0}")]
    Fit(String),
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let e = InputError::MissingField("gas_level".into());
        assert_eq!(e.to_string(), "missing required field 'gas_level'");

        let e = TrainingDataError::Schema {
            missing: vec!["status".into(), "weight".into()],
        };
        assert_eq!(e.to_string(), "dataset is missing required column(s): status, weight");

        let e = ArtifactError::NotFound(PathBuf::from("model.json"));
        assert!(e.to_string().contains("model.json"));
    }
}
