// ============================================================
// Layer 3 - Feature Schema
// ============================================================
// The single definition of the classifier's input.
//
// The forest has no field names baked into it: it only sees
// positions 0..5. Training and inference therefore MUST build
// vectors through this module so both sides agree on order:
//
//   index:  0            1         2         3          4
//   field:  temperature  humidity  moisture  gas_level  weight
//
// The fingerprint below is stored in every artifact and checked
// on load, so changing FEATURE_NAMES (or the label encoding)
// without bumping the artifact is caught at startup.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::errors::InputError;
use crate::domain::status::CLASS_LABELS;

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 5;

/// Canonical feature order. Never reorder without bumping SCHEMA_VERSION.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "temperature",
    "humidity",
    "moisture",
    "gas_level",
    "weight",
];

/// Version of the feature schema written into artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// One sensor reading set in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Build a vector from named readings, in canonical order.
    pub fn new(
        temperature: f64,
        humidity:    f64,
        moisture:    f64,
        gas_level:   f64,
        weight:      f64,
    ) -> Self {
        Self([temperature, humidity, moisture, gas_level, weight])
    }

    /// Build a vector by asking `lookup` for each field in canonical order.
    ///
    /// The CSV loader and `vectorize` both go through here, which is
    /// what keeps training-time and inference-time order identical.
    pub fn from_lookup<E>(
        mut lookup: impl FnMut(&'static str) -> Result<f64, E>,
    ) -> Result<Self, E> {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(FEATURE_NAMES) {
            *slot = lookup(name)?;
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Turn a JSON-like record into a FeatureVector.
///
/// Fails on the first field (in canonical order) that is absent or
/// not a number. Extra keys are ignored. Missing fields are never
/// defaulted.
pub fn vectorize(record: &Map<String, Value>) -> Result<FeatureVector, InputError> {
    FeatureVector::from_lookup(|name| match record.get(name) {
        None => Err(InputError::MissingField(name.to_string())),
        Some(value) => value.as_f64().ok_or_else(|| InputError::NotNumeric {
            field: name.to_string(),
            found: json_type_name(value).to_string(),
        }),
    })
}

/// JSON type name used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}

/// SHA-256 over the schema version, feature order and label encoding.
pub fn schema_fingerprint() -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("schema-v{SCHEMA_VERSION}\n"));
    hasher.update(FEATURE_NAMES.join(","));
    hasher.update("\n");
    for (class, label) in CLASS_LABELS.iter().enumerate() {
        hasher.update(format!("{class}={label};"));
    }
    hex::encode(hasher.finalize())
}
