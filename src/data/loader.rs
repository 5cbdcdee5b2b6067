// ============================================================
// Layer 4 - Dataset Loader
// ============================================================
// Reads the historical readings from a CSV file with a header.
//
// Expected shape (column order is free, extra columns ignored):
//
//   temperature,humidity,moisture,gas_level,weight,status
//   25,60,450,10,350,Good
//   38,85,690,95,580,Bad
//
// Columns are located by header name and then read through
// FeatureVector::from_lookup, so the vector order comes from the
// Feature Schema and never from the file.
//
// Any problem aborts the whole load: a training run either sees
// the full dataset or nothing.

use std::{fs, path::PathBuf};

use crate::domain::errors::TrainingDataError;
use crate::domain::feature_vector::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::domain::sample::LabeledSample;
use crate::domain::status::StorageStatus;
use crate::domain::traits::SampleSource;

/// Name of the ground-truth column.
pub const LABEL_COLUMN: &str = "status";

/// Loads labeled samples from a CSV file.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleSource for CsvLoader {
    fn load_all(&self) -> Result<Vec<LabeledSample>, TrainingDataError> {
        if !self.path.exists() {
            return Err(TrainingDataError::DatasetNotFound(self.path.clone()));
        }

        let text = fs::read_to_string(&self.path).map_err(|source| TrainingDataError::Io {
            path: self.path.clone(),
            source,
        })?;

        let samples = parse_csv(&text)?;
        tracing::info!(
            "Loaded {} samples from '{}'",
            samples.len(),
            self.path.display()
        );
        Ok(samples)
    }
}

/// Parse CSV text into labeled samples.
pub fn parse_csv(text: &str) -> Result<Vec<LabeledSample>, TrainingDataError> {
    // (1-based line number, line) pairs, blank lines dropped
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((header_no, header_line)) = lines.next() else {
        return Err(TrainingDataError::Empty);
    };
    let header = split_row(header_no, header_line.trim_start_matches('\u{feff}'))?;
    let columns = ColumnMap::resolve(&header)?;

    let mut samples = Vec::new();
    for (line, raw) in lines {
        let cells = split_row(line, raw)?;
        if cells.len() != header.len() {
            return Err(TrainingDataError::MalformedRow {
                line,
                reason: format!("expected {} columns, found {}", header.len(), cells.len()),
            });
        }
        samples.push(columns.read_sample(line, &cells)?);
    }

    if samples.is_empty() {
        return Err(TrainingDataError::Empty);
    }
    Ok(samples)
}

/// Split one CSV row into trimmed cells.
///
/// Commas inside double quotes belong to the cell, and `""` inside
/// quotes is a literal quote. A row that ends inside quotes is
/// malformed.
fn split_row(line_no: usize, line: &str) -> Result<Vec<String>, TrainingDataError> {
    let mut cells  = Vec::new();
    let mut cell   = String::new();
    let mut quoted = false;

    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }

    if quoted {
        return Err(TrainingDataError::MalformedRow {
            line:   line_no,
            reason: "unterminated quoted cell".into(),
        });
    }
    cells.push(cell.trim().to_string());
    Ok(cells)
}

/// Positions of the required columns within a header row.
struct ColumnMap {
    features: [usize; FEATURE_COUNT],
    label:    usize,
}

impl ColumnMap {
    fn resolve(header: &[String]) -> Result<Self, TrainingDataError> {
        let find = |name: &str| header.iter().position(|h| h == name);

        let missing: Vec<String> = FEATURE_NAMES
            .iter()
            .copied()
            .chain(std::iter::once(LABEL_COLUMN))
            .filter(|name| find(*name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(TrainingDataError::Schema { missing });
        }

        let mut features = [0usize; FEATURE_COUNT];
        for (slot, name) in features.iter_mut().zip(FEATURE_NAMES) {
            *slot = find(name).unwrap_or_default();
        }
        let label = find(LABEL_COLUMN).unwrap_or_default();
        Ok(Self { features, label })
    }

    fn read_sample(&self, line: usize, cells: &[String]) -> Result<LabeledSample, TrainingDataError> {
        let features = FeatureVector::from_lookup(|name| {
            let idx = FEATURE_NAMES
                .iter()
                .position(|n| *n == name)
                .map(|i| self.features[i])
                .unwrap_or_default();
            parse_number(line, name, &cells[idx])
        })?;

        let raw_status = &cells[self.label];
        let status = StorageStatus::parse(raw_status).ok_or_else(|| {
            TrainingDataError::UnknownLabel { line, value: raw_status.clone() }
        })?;

        Ok(LabeledSample::new(features, status))
    }
}

fn parse_number(line: usize, column: &str, cell: &str) -> Result<f64, TrainingDataError> {
    let value: f64 = cell.parse().map_err(|_| TrainingDataError::MalformedRow {
        line,
        reason: format!("column '{column}' is not a number: '{cell}'"),
    })?;
    if !value.is_finite() {
        return Err(TrainingDataError::MalformedRow {
            line,
            reason: format!("column '{column}' is not finite: '{cell}'"),
        });
    }
    Ok(value)
}
