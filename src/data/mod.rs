// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// Everything from the CSV file to the two partitions the
// trainer consumes:
//
//   storage_data.csv
//       │
//       ▼
//   CsvLoader        → header lookup, row parsing, label check
//       │
//       ▼
//   split_train_test → seeded shuffle, 80/20 partition
//       │
//       ▼
//   StorageDataset   → train / held-out sets handed to Layer 5

/// Reads labeled samples from CSV
pub mod loader;

/// In-memory dataset partition
pub mod dataset;

/// Seeded train/test split
pub mod splitter;
