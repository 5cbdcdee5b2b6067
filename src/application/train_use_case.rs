// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the training pipeline in order:
//
//   Step 1: Validate the run config           (Layer 2)
//   Step 2: Load the labeled CSV              (Layer 4 - data)
//   Step 3: Seeded 80/20 train/test split     (Layer 4 - data)
//   Step 4: Fit the random forest             (Layer 5 - ml)
//   Step 5: Evaluate on the held-out set      (Layer 5 - ml)
//   Step 6: Publish the artifact atomically   (Layer 6 - infra)
//   Step 7: Append run metrics to CSV         (Layer 6 - infra)
//
// Any failure before step 6 leaves the previous artifact in
// place; nothing partial is ever written.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    dataset::StorageDataset,
    loader::CsvLoader,
    splitter::split_train_test,
};
use crate::domain::errors::TrainingDataError;
use crate::domain::feature_vector::FEATURE_COUNT;
use crate::domain::traits::SampleSource;
use crate::infra::{
    checkpoint::{ArtifactStore, TrainedArtifact},
    metrics::{EvaluationMetrics, MetricsLogger},
};
use crate::ml::model::ForestConfig;
use crate::ml::trainer::{evaluate, run_training};

/// Rows shown in the dataset preview.
const PREVIEW_ROWS: usize = 5;

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for one training run. Serialisable because it is
// stored inside the artifact, so a loaded model can report how it
// was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset_path:      String,
    pub artifact_path:     String,
    pub test_fraction:     f64,
    pub seed:              u64,
    pub n_trees:           usize,
    pub max_depth:         Option<usize>,
    pub min_samples_split: usize,
    pub max_features:      usize,
    pub bootstrap:         bool,
    pub log_metrics:       bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path:      "storage_data.csv".to_string(),
            artifact_path:     "storage_ai_model.json".to_string(),
            test_fraction:     0.2,
            seed:              42,
            n_trees:           100,
            max_depth:         None,
            min_samples_split: 2,
            max_features:      FEATURE_COUNT,
            bootstrap:         true,
            log_metrics:       true,
        }
    }
}

impl TrainConfig {
    fn validate(&self) -> Result<(), TrainingDataError> {
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(TrainingDataError::InvalidConfig(format!(
                "test_fraction must be in [0, 1), got {}",
                self.test_fraction
            )));
        }
        ForestConfig::from(self)
            .validate()
            .map_err(TrainingDataError::InvalidConfig)
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub artifact_path: PathBuf,
    pub preview:       String,
    pub metrics:       EvaluationMetrics,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        cfg.validate()?;

        // ── Step 2: Load labeled samples ──────────────────────────────────────
        tracing::info!("Loading dataset from '{}'", cfg.dataset_path);
        let loader  = CsvLoader::new(&cfg.dataset_path);
        let samples = loader.load_all()?;
        let preview = StorageDataset::new(samples.iter().take(PREVIEW_ROWS).copied().collect())
            .head(PREVIEW_ROWS);

        // ── Step 3: Train / test split ────────────────────────────────────────
        let (train_samples, test_samples) =
            split_train_test(samples, cfg.test_fraction, cfg.seed);
        tracing::info!(
            "Split: {} train, {} held out",
            train_samples.len(),
            test_samples.len()
        );
        let train = StorageDataset::new(train_samples);
        let test  = StorageDataset::new(test_samples);

        // ── Step 4: Fit ───────────────────────────────────────────────────────
        let forest = run_training(cfg, &train)?;

        // ── Step 5: Evaluate on held-out data ─────────────────────────────────
        let metrics = evaluate(&forest, train.len(), &test);
        tracing::info!("{}", metrics.summary());

        // ── Step 6: Publish artifact ──────────────────────────────────────────
        let store    = ArtifactStore::new(&cfg.artifact_path);
        let artifact = TrainedArtifact::new(cfg.clone(), metrics.clone(), forest);
        let trained_at = artifact.metadata.trained_at_unix;
        store
            .save(&artifact)
            .with_context(|| format!("Cannot publish model to '{}'", cfg.artifact_path))?;
        tracing::info!("Model saved to '{}'", store.path().display());

        // ── Step 7: Metrics CSV ───────────────────────────────────────────────
        // The artifact is already published; a metrics failure is reported
        // but does not fail the run.
        if cfg.log_metrics {
            if let Err(e) = MetricsLogger::new(&store.dir()).and_then(|l| l.log(trained_at, &metrics)) {
                tracing::warn!("Could not record run metrics: {e:#}");
            }
        }

        Ok(TrainReport {
            artifact_path: store.path().to_path_buf(),
            preview,
            metrics,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fixtures::{config_in, write_dataset, HEADER};
    use crate::ml::inferencer::Inferencer;
    use std::fs;
    use tempfile::tempdir;

    fn training_error(err: &anyhow::Error) -> &TrainingDataError {
        err.downcast_ref::<TrainingDataError>()
            .unwrap_or_else(|| panic!("expected TrainingDataError, got {err:#}"))
    }

    #[test]
    fn test_end_to_end_training() {
        let dir = tempdir().unwrap();
        let cfg = config_in(dir.path(), "model.json");
        write_dataset(dir.path().join("storage_data.csv").as_path(), 300, 1);

        let report = TrainUseCase::new(cfg.clone()).execute().unwrap();
        assert!(report.artifact_path.exists());
        assert_eq!(report.metrics.test_samples, 60);
        assert_eq!(report.metrics.train_samples, 240);
        assert!(report.metrics.accuracy.unwrap() > 0.8);
        assert_eq!(report.preview.lines().count(), PREVIEW_ROWS + 1);

        let csv = fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 2);

        let inferencer = Inferencer::from_store(&ArtifactStore::new(&cfg.artifact_path)).unwrap();
        assert_eq!(inferencer.metadata().config, cfg);
    }

    #[test]
    fn test_missing_dataset() {
        let dir = tempdir().unwrap();
        let cfg = config_in(dir.path(), "model.json");
        let err = TrainUseCase::new(cfg.clone()).execute().unwrap_err();
        assert!(matches!(training_error(&err), TrainingDataError::DatasetNotFound(_)));
        assert!(!PathBuf::from(&cfg.artifact_path).exists());
    }

    #[test]
    fn test_missing_column_writes_nothing() {
        let dir = tempdir().unwrap();
        let cfg = config_in(dir.path(), "model.json");
        fs::write(&cfg.dataset_path, "temperature,humidity,moisture,weight,status\n25,60,450,350,Good\n")
            .unwrap();

        let err = TrainUseCase::new(cfg.clone()).execute().unwrap_err();
        match training_error(&err) {
            TrainingDataError::Schema { missing } => assert_eq!(missing, &vec!["gas_level".to_string()]),
            other => panic!("expected Schema error, got {other:?}"),
        }
        assert!(!PathBuf::from(&cfg.artifact_path).exists());
    }

    #[test]
    fn test_failed_run_keeps_previous_artifact() {
        let dir = tempdir().unwrap();
        let cfg = config_in(dir.path(), "model.json");
        write_dataset(PathBuf::from(&cfg.dataset_path).as_path(), 100, 2);
        TrainUseCase::new(cfg.clone()).execute().unwrap();
        let before = fs::read(&cfg.artifact_path).unwrap();

        // Break the dataset and retrain
        fs::write(&cfg.dataset_path, format!("{HEADER}\n25,60,450,10,350,Unknown\n")).unwrap();
        assert!(TrainUseCase::new(cfg.clone()).execute().is_err());

        assert_eq!(fs::read(&cfg.artifact_path).unwrap(), before);
    }

    #[test]
    fn test_single_class_dataset_still_trains() {
        let dir = tempdir().unwrap();
        let cfg = config_in(dir.path(), "model.json");
        let mut csv = format!("{HEADER}\n");
        for i in 0..20 {
            csv.push_str(&format!("{},{},450,{},350,Good\n", 20 + i % 5, 50 + i, i));
        }
        fs::write(&cfg.dataset_path, csv).unwrap();

        let report = TrainUseCase::new(cfg).execute().unwrap();
        assert_eq!(report.metrics.accuracy, Some(1.0));
    }

    #[test]
    fn test_invalid_test_fraction() {
        let dir = tempdir().unwrap();
        let cfg = TrainConfig { test_fraction: 1.0, ..config_in(dir.path(), "model.json") };
        write_dataset(PathBuf::from(&cfg.dataset_path).as_path(), 20, 3);
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(training_error(&err), TrainingDataError::InvalidConfig(_)));
    }

    #[test]
    fn test_forest_settings_checked_before_loading() {
        // No dataset on disk: a bad setting must be reported first
        let dir = tempdir().unwrap();
        for cfg in [
            TrainConfig { n_trees: 0, ..config_in(dir.path(), "model.json") },
            TrainConfig { min_samples_split: 1, ..config_in(dir.path(), "model.json") },
            TrainConfig { max_depth: Some(0), ..config_in(dir.path(), "model.json") },
        ] {
            let err = TrainUseCase::new(cfg).execute().unwrap_err();
            assert!(matches!(training_error(&err), TrainingDataError::InvalidConfig(_)));
        }
    }

    #[test]
    fn test_tiny_dataset_with_empty_train_split() {
        // One row: ceil(0.2) = 1 held out, nothing left to train on
        let dir = tempdir().unwrap();
        let cfg = config_in(dir.path(), "model.json");
        fs::write(&cfg.dataset_path, format!("{HEADER}\n25,60,450,10,350,Good\n")).unwrap();
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(matches!(training_error(&err), TrainingDataError::Empty));
    }
}
