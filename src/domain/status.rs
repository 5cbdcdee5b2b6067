// ============================================================
// Layer 3 - Storage Status and Label Encoding
// ============================================================
// Training data carries a categorical `status` ("Good" / "Bad").
// The forest works on class indices, so the labels are encoded
// in sorted order:
//
//   class 0  <->  "Bad"   <->  "Unsafe Storage"
//   class 1  <->  "Good"  <->  "Safe Storage"
//
// Nothing inside the forest ties a class index to its meaning.
// The encoding is written into each artifact and the loader
// refuses artifacts with a different encoding, but the
// direction of the mapping itself is fixed here.

use serde::{Deserialize, Serialize};

/// Status values by class index.
pub const CLASS_LABELS: [&str; 2] = ["Bad", "Good"];

pub const SAFE_LABEL:   &str = "Safe Storage";
pub const UNSAFE_LABEL: &str = "Unsafe Storage";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageStatus {
    Bad,
    Good,
}

impl StorageStatus {
    /// Parse a training-data status cell. Only the exact encoded
    /// values are accepted (surrounding whitespace is trimmed).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Bad"  => Some(Self::Bad),
            "Good" => Some(Self::Good),
            _      => None,
        }
    }

    pub fn class_index(self) -> usize {
        match self {
            Self::Bad  => 0,
            Self::Good => 1,
        }
    }

    pub fn from_class_index(class: usize) -> Option<Self> {
        match class {
            0 => Some(Self::Bad),
            1 => Some(Self::Good),
            _ => None,
        }
    }

    /// Human-readable label returned by the inference boundary.
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => SAFE_LABEL,
            Self::Bad  => UNSAFE_LABEL,
        }
    }

    pub fn as_str(self) -> &'static str {
        CLASS_LABELS[self.class_index()]
    }
}
