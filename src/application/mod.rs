// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
// fitting and publishing a model, or serving predictions from
// a published one.
//
// Rules for this layer:
//   - No model math here (Layer 5)
//   - No printing here (Layer 1)
//   - No direct file formats here (Layers 4 and 6)
//   - Only workflow coordination

// The offline training workflow
pub mod train_use_case;

// The inference service core
pub mod predict_use_case;

#[cfg(test)]
pub(crate) mod fixtures;
