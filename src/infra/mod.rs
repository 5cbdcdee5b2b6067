// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by both pipelines:
//
//   checkpoint.rs - The model artifact on disk.
//                   Wraps the forest in a versioned envelope
//                   carrying the schema fingerprint and label
//                   encoding, publishes it atomically, and
//                   refuses incompatible artifacts on load.
//
//   metrics.rs    - Held-out evaluation numbers, kept in the
//                   artifact and appended to metrics.csv.

/// Model artifact saving and loading
pub mod checkpoint;

/// Evaluation metrics and CSV logger
pub mod metrics;
