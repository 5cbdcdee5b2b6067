// ============================================================
// Layer 5 - Inferencer
// ============================================================
use crate::domain::errors::ArtifactError;
use crate::domain::feature_vector::FeatureVector;
use crate::domain::status::StorageStatus;
use crate::domain::traits::Classifier;
use crate::infra::checkpoint::{ArtifactMetadata, ArtifactStore, TrainedArtifact};

/// A loaded, validated artifact ready to score vectors.
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug)]
pub struct Inferencer {
    artifact: TrainedArtifact,
}

impl Inferencer {
    pub fn from_store(store: &ArtifactStore) -> Result<Self, ArtifactError> {
        let artifact = store.load()?;
        tracing::info!(
            "Model loaded from '{}': {} trees, schema v{}",
            store.path().display(),
            artifact.model.n_trees(),
            artifact.metadata.schema_version
        );
        Ok(Self { artifact })
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.artifact.metadata
    }

    /// Score one vector. Always returns one of the two statuses.
    pub fn score(&self, x: &FeatureVector) -> StorageStatus {
        let class = self.artifact.model.predict_class(x);
        // predict_class only ever yields 0 or 1
        StorageStatus::from_class_index(class).unwrap_or(StorageStatus::Bad)
    }
}
