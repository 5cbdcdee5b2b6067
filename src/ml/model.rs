// ============================================================
// Layer 5 - Random Forest
// ============================================================
// Bagged CART trees. Each member is a linfa DecisionTree (gini)
// grown on a bootstrap draw of the training rows, restricted to
// a random subset of `max_features` columns. The column subset is
// stored next to the tree so scoring feeds it the same columns.
//
// Prediction counts the members' votes; the probability of a
// class is its share of the votes and the most probable class
// wins (ties go to class 0).
//
// Every random choice flows from one StdRng seeded with
// `ForestConfig::seed`: the master RNG hands each member its own
// seed, and linfa's tree growth is itself deterministic, so a
// given (samples, config) pair always grows the same forest.
//
// Depth is capped at DEPTH_LIMIT even when no max_depth is set.
// linfa grows trees recursively, and the artifact nests one JSON
// object per level, so an unbounded chain of splits would exhaust
// the stack on fit or the parser's nesting limit on load.

use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, Axis};
use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::feature_vector::{FeatureVector, FEATURE_COUNT};
use crate::domain::sample::LabeledSample;
use crate::domain::traits::Classifier;

/// Deepest any member tree may grow.
pub const DEPTH_LIMIT: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees:           usize,
    pub seed:              u64,
    pub max_depth:         Option<usize>,
    pub min_samples_split: usize,
    pub max_features:      usize,
    pub bootstrap:         bool,
}

impl ForestConfig {
    pub fn new(n_trees: usize, seed: u64) -> Self {
        Self {
            n_trees,
            seed,
            max_depth:         None,
            min_samples_split: 2,
            max_features:      FEATURE_COUNT,
            bootstrap:         true,
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.n_trees == 0 {
            return Err("n_trees must be at least 1".into());
        }
        if self.min_samples_split < 2 {
            return Err("min_samples_split must be at least 2".into());
        }
        if self.max_features == 0 || self.max_features > FEATURE_COUNT {
            return Err(format!("max_features must be in 1..={FEATURE_COUNT}"));
        }
        if let Some(depth) = self.max_depth {
            if depth == 0 || depth > DEPTH_LIMIT {
                return Err(format!("max_depth must be in 1..={DEPTH_LIMIT}"));
            }
        }
        Ok(())
    }

    /// Grow the forest on `samples`.
    pub fn fit(&self, samples: &[LabeledSample]) -> Result<RandomForest, String> {
        let n = samples.len();
        if n == 0 {
            return Err("no samples to fit".into());
        }

        let records = Array2::from_shape_fn((n, FEATURE_COUNT), |(i, j)| samples[i].features.0[j]);
        let targets: Array1<usize> = samples.iter().map(LabeledSample::class_index).collect();

        let params = DecisionTree::<f64, usize>::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(Some(self.max_depth.unwrap_or(DEPTH_LIMIT)))
            .min_weight_split(self.min_samples_split as f32)
            .min_weight_leaf(1.0);

        let mut master  = StdRng::seed_from_u64(self.seed);
        let mut members = Vec::with_capacity(self.n_trees);
        for t in 0..self.n_trees {
            let mut rng = StdRng::seed_from_u64(master.gen());
            let rows: Vec<usize> = if self.bootstrap {
                (0..n).map(|_| rng.gen_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            let mut features = index::sample(&mut rng, FEATURE_COUNT, self.max_features).into_vec();
            features.sort_unstable();

            let bag = Dataset::new(
                records.select(Axis(0), &rows).select(Axis(1), &features),
                targets.select(Axis(0), &rows),
            );
            let tree = params.fit(&bag).map_err(|e| format!("tree {t}: {e}"))?;
            tracing::trace!("tree {} grown: depth {}, features {:?}", t, tree.max_depth(), features);
            members.push(ForestMember { features, tree });
        }

        Ok(RandomForest { config: self.clone(), members })
    }
}

/// One bagged tree and the columns it was trained on.
#[derive(Debug, Serialize, Deserialize)]
struct ForestMember {
    features: Vec<usize>,
    tree:     DecisionTree<f64, usize>,
}

impl ForestMember {
    fn vote(&self, x: &FeatureVector) -> Option<usize> {
        let row = Array2::from_shape_fn((1, self.features.len()), |(_, j)| x.0[self.features[j]]);
        let predicted: Array1<usize> = self.tree.predict(&row);
        predicted.first().copied()
    }

    fn validate(&self) -> Result<(), String> {
        if self.features.is_empty() {
            return Err("no feature columns".into());
        }
        if let Some(&f) = self.features.iter().find(|&&f| f >= FEATURE_COUNT) {
            return Err(format!("feature column {f} out of range"));
        }
        if let Some(f) = self.tree.features().into_iter().find(|&f| f >= self.features.len()) {
            return Err(format!("split on column {f} but only {} columns", self.features.len()));
        }
        if self.tree.max_depth() > DEPTH_LIMIT {
            return Err(format!("depth {} exceeds {DEPTH_LIMIT}", self.tree.max_depth()));
        }
        if let Some(class) = self.tree.iter_nodes().filter_map(|node| node.prediction()).find(|&c| c > 1) {
            return Err(format!("leaf predicts unknown class {class}"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RandomForest {
    config:  ForestConfig,
    members: Vec<ForestMember>,
}

impl RandomForest {
    pub fn n_trees(&self) -> usize {
        self.members.len()
    }

    pub fn total_nodes(&self) -> usize {
        self.members.iter().map(|m| m.tree.iter_nodes().count()).sum()
    }

    pub fn deepest_tree(&self) -> usize {
        self.members.iter().map(|m| m.tree.max_depth()).max().unwrap_or(0)
    }

    /// Reject forests whose structure could misroute or panic.
    pub fn validate(&self) -> Result<(), String> {
        if self.members.is_empty() {
            return Err("forest has no trees".into());
        }
        for (i, member) in self.members.iter().enumerate() {
            member.validate().map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn predict_proba(&self, x: &FeatureVector) -> [f64; 2] {
        let mut votes = [0usize; 2];
        for class in self.members.iter().filter_map(|m| m.vote(x)) {
            if let Some(slot) = votes.get_mut(class) {
                *slot += 1;
            }
        }
        let k = self.members.len().max(1) as f64;
        [votes[0] as f64 / k, votes[1] as f64 / k]
    }
}
