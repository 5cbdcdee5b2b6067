// ============================================================
// Layer 6 - Evaluation Metrics
// ============================================================
// Held-out performance of a fitted forest, recorded two ways:
//   - inside the artifact, so `inspect` can show how good the
//     loaded model was when it was trained
//   - appended to metrics.csv next to the artifact, one row per
//     training run, for comparing retraining cycles
//
// Example CSV output:
//   trained_at_unix,train_samples,test_samples,accuracy,true_safe,false_safe,true_unsafe,false_unsafe
//   1760000000,240,60,0.950000,30,2,27,1
//
// "Safe" is class 1 (status Good). A false_safe is a Bad sample
// the model called safe, the costly mistake for stored goods.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

const CSV_HEADER: &str =
    "trained_at_unix,train_samples,test_samples,accuracy,true_safe,false_safe,true_unsafe,false_unsafe";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub train_samples: usize,
    pub test_samples:  usize,

    /// Fraction of held-out samples classified correctly.
    /// None when nothing was held out.
    pub accuracy: Option<f64>,

    pub true_safe:    usize,
    pub false_safe:   usize,
    pub true_unsafe:  usize,
    pub false_unsafe: usize,
}

impl EvaluationMetrics {
    /// Tally (predicted, actual) class pairs.
    pub fn from_pairs(
        train_samples: usize,
        pairs:         impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let mut m = Self { train_samples, ..Self::default() };
        for (predicted, actual) in pairs {
            match (predicted, actual) {
                (1, 1) => m.true_safe    += 1,
                (1, _) => m.false_safe   += 1,
                (_, 0) => m.true_unsafe  += 1,
                _      => m.false_unsafe += 1,
            }
            m.test_samples += 1;
        }
        if m.test_samples > 0 {
            m.accuracy = Some((m.true_safe + m.true_unsafe) as f64 / m.test_samples as f64);
        }
        m
    }

    pub fn summary(&self) -> String {
        match self.accuracy {
            Some(acc) => format!(
                "held-out accuracy={:.1}% ({} test / {} train) | safe: {} ok, {} wrong | unsafe: {} ok, {} wrong",
                acc * 100.0,
                self.test_samples,
                self.train_samples,
                self.true_safe,
                self.false_safe,
                self.true_unsafe,
                self.false_unsafe,
            ),
            None => format!("no held-out samples ({} train)", self.train_samples),
        }
    }
}

/// Appends one row per training run to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Log into `metrics.csv` inside `dir`, writing the header if the
    /// file is new.
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{CSV_HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, trained_at_unix: u64, m: &EvaluationMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let accuracy = m.accuracy.map(|a| format!("{a:.6}")).unwrap_or_default();
        writeln!(
            f,
            "{},{},{},{},{},{},{},{}",
            trained_at_unix,
            m.train_samples,
            m.test_samples,
            accuracy,
            m.true_safe,
            m.false_safe,
            m.true_unsafe,
            m.false_unsafe,
        )?;

        tracing::debug!("Logged run metrics to '{}'", self.csv_path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_confusion_counts() {
        let m = EvaluationMetrics::from_pairs(8, vec![(1, 1), (1, 0), (0, 0), (0, 1), (1, 1)]);
        assert_eq!((m.true_safe, m.false_safe, m.true_unsafe, m.false_unsafe), (2, 1, 1, 1));
        assert_eq!(m.test_samples, 5);
        assert_eq!(m.accuracy, Some(0.6));
    }

    #[test]
    fn test_no_test_samples() {
        let m = EvaluationMetrics::from_pairs(3, Vec::new());
        assert_eq!(m.accuracy, None);
        assert!(m.summary().contains("no held-out"));
    }

    #[test]
    fn test_rows_appended_across_runs() {
        let dir = tempdir().unwrap();
        let m = EvaluationMetrics::from_pairs(4, vec![(1, 1)]);

        MetricsLogger::new(dir.path()).unwrap().log(1, &m).unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(2, &m).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[2], "2,4,1,1.000000,1,0,0,0");
    }
}
