// ============================================================
// Layer 6 - Model Artifact Store
// ============================================================
// Saves and restores the trained forest as one JSON file.
//
// What gets saved (the "envelope"):
//   format_version   - layout of this file
//   schema_version   - Feature Schema version used at training
//   fingerprint      - sha256 of feature order + label encoding
//   feature_names    - the canonical order, for humans
//   class_labels     - ["Bad", "Good"], class index -> status
//   config           - TrainConfig of the run
//   metrics          - held-out evaluation
//   trained_at_unix  - when the run finished
//   model            - the forest itself
//
// Writing:
//   The envelope is written to a temp file in the destination
//   directory and renamed over the destination once complete.
//   A failed or interrupted write leaves the previous artifact
//   untouched and never a half-written one in its place.
//
// Loading:
//   Every compatibility field is checked before the model is
//   handed out. Anything off is an ArtifactError and the caller
//   must not start serving.

use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::application::train_use_case::TrainConfig;
use crate::domain::errors::ArtifactError;
use crate::domain::feature_vector::{schema_fingerprint, FEATURE_NAMES, SCHEMA_VERSION};
use crate::domain::status::CLASS_LABELS;
use crate::infra::metrics::EvaluationMetrics;
use crate::ml::model::RandomForest;

/// Bump when the envelope layout changes incompatibly.
pub const FORMAT_VERSION: u32 = 1;

/// Everything in the artifact except the forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub format_version:  u32,
    pub schema_version:  u32,
    pub fingerprint:     String,
    pub feature_names:   Vec<String>,
    pub class_labels:    Vec<String>,
    pub config:          TrainConfig,
    pub metrics:         EvaluationMetrics,
    pub trained_at_unix: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrainedArtifact {
    #[serde(flatten)]
    pub metadata: ArtifactMetadata,
    pub model:    RandomForest,
}

impl TrainedArtifact {
    /// Wrap a freshly fitted forest with the current schema contract.
    pub fn new(config: TrainConfig, metrics: EvaluationMetrics, model: RandomForest) -> Self {
        let trained_at_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self {
            metadata: ArtifactMetadata {
                format_version: FORMAT_VERSION,
                schema_version: SCHEMA_VERSION,
                fingerprint:    schema_fingerprint(),
                feature_names:  FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                class_labels:   CLASS_LABELS.iter().map(|s| s.to_string()).collect(),
                config,
                metrics,
                trained_at_unix,
            },
            model,
        }
    }

    /// Check this artifact against the schema compiled into this binary.
    pub fn check_compatible(&self) -> Result<(), ArtifactError> {
        let meta = &self.metadata;
        if meta.format_version != FORMAT_VERSION {
            return Err(ArtifactError::FormatVersion {
                found:    meta.format_version,
                expected: FORMAT_VERSION,
            });
        }

        let expected = schema_fingerprint();
        let names_match = meta.feature_names.iter().map(String::as_str).eq(FEATURE_NAMES);
        if meta.fingerprint != expected || meta.schema_version != SCHEMA_VERSION || !names_match {
            return Err(ArtifactError::SchemaMismatch {
                found: meta.fingerprint.clone(),
                expected,
            });
        }

        if !meta.class_labels.iter().map(String::as_str).eq(CLASS_LABELS) {
            return Err(ArtifactError::LabelEncodingMismatch {
                found:    meta.class_labels.clone(),
                expected: CLASS_LABELS.iter().map(|s| s.to_string()).collect(),
            });
        }

        self.model.validate().map_err(ArtifactError::Malformed)
    }
}

/// Reads and writes the artifact at one fixed path.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the artifact lives in (used for metrics.csv too).
    pub fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Atomically replace the artifact with `artifact`.
    pub fn save(&self, artifact: &TrainedArtifact) -> Result<(), ArtifactError> {
        let write_err = |source: std::io::Error| ArtifactError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = self.dir();
        fs::create_dir_all(&dir).map_err(write_err)?;

        let tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(&mut writer, artifact)
                .map_err(|e| write_err(e.into()))?;
            writer.flush().map_err(write_err)?;
        }
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!("Published artifact '{}'", self.path.display());
        Ok(())
    }

    /// Read, parse and validate the artifact.
    pub fn load(&self) -> Result<TrainedArtifact, ArtifactError> {
        if !self.path.exists() {
            return Err(ArtifactError::NotFound(self.path.clone()));
        }

        let bytes = fs::read(&self.path).map_err(|source| ArtifactError::Io {
            path: self.path.clone(),
            source,
        })?;
        let corrupt = |source: serde_json::Error| ArtifactError::Corrupt { path: self.path.clone(), source };

        // Look at the version before committing to the current layout
        let raw: Value = serde_json::from_slice(&bytes).map_err(corrupt)?;
        let found = raw.get("format_version").and_then(Value::as_u64);
        if found != Some(u64::from(FORMAT_VERSION)) {
            return Err(ArtifactError::FormatVersion {
                found:    found.and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
                expected: FORMAT_VERSION,
            });
        }

        let artifact: TrainedArtifact = serde_json::from_value(raw).map_err(corrupt)?;
        artifact.check_compatible()?;

        tracing::debug!(
            "Loaded artifact '{}' ({} trees)",
            self.path.display(),
            artifact.model.n_trees()
        );
        Ok(artifact)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature_vector::FeatureVector;
    use crate::domain::sample::LabeledSample;
    use crate::domain::status::StorageStatus;
    use crate::ml::model::ForestConfig;
    use tempfile::tempdir;

    fn tiny_artifact() -> TrainedArtifact {
        let samples = vec![
            LabeledSample::new(FeatureVector::new(25.0, 60.0, 450.0, 10.0, 350.0), StorageStatus::Good),
            LabeledSample::new(FeatureVector::new(38.0, 85.0, 690.0, 95.0, 580.0), StorageStatus::Bad),
        ];
        let model = ForestConfig::new(3, 42).fit(&samples).unwrap();
        TrainedArtifact::new(TrainConfig::default(), EvaluationMetrics::default(), model)
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.json"));
        let artifact = tiny_artifact();

        store.save(&artifact).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.metadata, artifact.metadata);
        assert_eq!(
            serde_json::to_value(&loaded).unwrap(),
            serde_json::to_value(&artifact).unwrap()
        );
    }

    #[test]
    fn test_save_overwrites_and_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.json"));
        store.save(&tiny_artifact()).unwrap();
        store.save(&tiny_artifact()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load(), Err(ArtifactError::NotFound(_))));
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"\x80not json").unwrap();
        assert!(matches!(ArtifactStore::new(&path).load(), Err(ArtifactError::Corrupt { .. })));
    }

    #[test]
    fn test_wrong_format_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, r#"{"format_version": 99}"#).unwrap();
        match ArtifactStore::new(&path).load() {
            Err(ArtifactError::FormatVersion { found, expected }) => {
                assert_eq!(found, 99);
                assert_eq!(expected, FORMAT_VERSION);
            }
            other => panic!("expected FormatVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_reordered_features_rejected() {
        let mut artifact = tiny_artifact();
        artifact.metadata.feature_names.swap(0, 4);
        assert!(matches!(
            artifact.check_compatible(),
            Err(ArtifactError::SchemaMismatch { .. })
        ));

        let mut artifact = tiny_artifact();
        artifact.metadata.fingerprint = "0".repeat(64);
        assert!(matches!(
            artifact.check_compatible(),
            Err(ArtifactError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_flipped_label_encoding_rejected() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.json"));
        let mut artifact = tiny_artifact();
        artifact.metadata.class_labels.reverse();
        store.save(&artifact).unwrap();

        assert!(matches!(
            store.load(),
            Err(ArtifactError::LabelEncodingMismatch { .. })
        ));
    }

    #[test]
    fn test_tampered_feature_columns_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut value = serde_json::to_value(tiny_artifact()).unwrap();
        value["model"]["members"][0]["features"] = serde_json::json!([9]);
        fs::write(&path, value.to_string()).unwrap();

        assert!(matches!(ArtifactStore::new(&path).load(), Err(ArtifactError::Malformed(_))));
    }

    #[test]
    fn test_dir_of_bare_filename() {
        assert_eq!(ArtifactStore::new("model.json").dir(), PathBuf::from("."));
    }
}
