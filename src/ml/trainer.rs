// ============================================================
// Layer 5 - Training and Evaluation
// ============================================================
// Fits the forest on the training partition and scores it on
// the held-out partition. Batch, synchronous, single-threaded;
// every call starts from scratch.

use crate::application::train_use_case::TrainConfig;
use crate::data::dataset::StorageDataset;
use crate::domain::errors::TrainingDataError;
use crate::domain::traits::Classifier;
use crate::infra::metrics::EvaluationMetrics;
use crate::ml::model::{ForestConfig, RandomForest};

impl From<&TrainConfig> for ForestConfig {
    fn from(cfg: &TrainConfig) -> Self {
        ForestConfig::new(cfg.n_trees, cfg.seed)
            .with_max_depth(cfg.max_depth)
            .with_min_samples_split(cfg.min_samples_split)
            .with_max_features(cfg.max_features)
            .with_bootstrap(cfg.bootstrap)
    }
}

/// Fit a forest on `train`.
///
/// Class imbalance, including a single-class training set, is not an
/// error: the resulting forest simply leans (or always answers) that
/// way. An empty training set is.
pub fn run_training(
    cfg:   &TrainConfig,
    train: &StorageDataset,
) -> Result<RandomForest, TrainingDataError> {
    if train.is_empty() {
        return Err(TrainingDataError::Empty);
    }

    let forest_cfg = ForestConfig::from(cfg);
    forest_cfg.validate().map_err(TrainingDataError::InvalidConfig)?;

    let [bad, good] = train.class_counts();
    tracing::info!(
        "Fitting {} trees on {} samples ({} Good / {} Bad), seed={}",
        forest_cfg.n_trees,
        train.len(),
        good,
        bad,
        forest_cfg.seed
    );
    if train.is_single_class() {
        tracing::warn!(
            "Training set contains a single status; the model will predict it for every input"
        );
    }

    let forest = forest_cfg.fit(train.samples()).map_err(TrainingDataError::Fit)?;
    tracing::info!(
        "Forest ready: {} trees, {} nodes total, deepest tree {}",
        forest.n_trees(),
        forest.total_nodes(),
        forest.deepest_tree()
    );
    Ok(forest)
}

/// Score `model` on every held-out sample.
pub fn evaluate(
    model:         &impl Classifier,
    train_samples: usize,
    test:          &StorageDataset,
) -> EvaluationMetrics {
    let pairs = test
        .samples()
        .iter()
        .map(|s| (model.predict_class(&s.features), s.class_index()));
    EvaluationMetrics::from_pairs(train_samples, pairs)
}
