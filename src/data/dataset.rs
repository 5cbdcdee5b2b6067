use crate::domain::feature_vector::FEATURE_NAMES;
use crate::domain::sample::LabeledSample;
use crate::domain::status::StorageStatus;

/// An in-memory partition of labeled samples.
pub struct StorageDataset {
    samples: Vec<LabeledSample>,
}

impl StorageDataset {
    pub fn new(samples: Vec<LabeledSample>) -> Self { Self { samples } }

    pub fn len(&self) -> usize { self.samples.len() }

    pub fn is_empty(&self) -> bool { self.samples.is_empty() }

    pub fn samples(&self) -> &[LabeledSample] { &self.samples }

    /// Number of samples per class index.
    pub fn class_counts(&self) -> [usize; 2] {
        let mut counts = [0usize; 2];
        for s in &self.samples {
            counts[s.class_index()] += 1;
        }
        counts
    }

    /// True when only one status occurs. Fitting still succeeds but the
    /// result can only ever predict that status.
    pub fn is_single_class(&self) -> bool {
        self.class_counts().iter().filter(|&&c| c > 0).count() < 2
    }

    /// Tabular preview of the first `n` rows, header included.
    pub fn head(&self, n: usize) -> String {
        let mut out = String::new();
        out.push_str(&format!("{:>5}", ""));
        for name in FEATURE_NAMES {
            out.push_str(&format!(" {:>12}", name));
        }
        out.push_str(&format!(" {:>7}\n", "status"));

        for (i, s) in self.samples.iter().take(n).enumerate() {
            out.push_str(&format!("{:>5}", i));
            for v in s.features.as_slice() {
                out.push_str(&format!(" {:>12}", v));
            }
            out.push_str(&format!(" {:>7}\n", s.status.as_str()));
        }
        out
    }
}
