// ============================================================
// Layer 5 - ML Layer
// ============================================================
// All model code lives here. Other layers only see the
// Classifier trait and the types re-exported by these modules.
//
//   model.rs      - the random forest (bagged linfa trees) and
//                   its config
//   trainer.rs    - fit on the training partition, evaluate on
//                   the held-out one
//   inferencer.rs - a loaded artifact that scores vectors

/// Random forest ensemble
pub mod model;

/// Fitting and held-out evaluation
pub mod trainer;

/// Scoring with a loaded artifact
pub mod inferencer;
