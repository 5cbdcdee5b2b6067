// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain structs, enums and traits that define what the system
// talks about: sensor readings, statuses, predictions, errors.
//
// Rules for this layer:
//   - NO file I/O
//   - NO model fitting code
//   - Only plain Rust types and the traits other layers implement

// Canonical feature order and request vectorisation
pub mod feature_vector;

// Good/Bad status and its class-index encoding
pub mod status;

// A feature vector with its ground-truth status
pub mod sample;

// The response shape of the inference boundary
pub mod prediction;

// InputError / ArtifactError / TrainingDataError
pub mod errors;

// Core abstractions that other layers implement
pub mod traits;
