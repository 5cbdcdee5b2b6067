use serde::{Deserialize, Serialize};

use crate::domain::feature_vector::FeatureVector;
use crate::domain::status::StorageStatus;

/// One historical reading with its ground-truth status.
/// Read once from the dataset; never written back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub status:   StorageStatus,
}

impl LabeledSample {
    pub fn new(features: FeatureVector, status: StorageStatus) -> Self {
        Self { features, status }
    }

    pub fn class_index(&self) -> usize {
        self.status.class_index()
    }
}
