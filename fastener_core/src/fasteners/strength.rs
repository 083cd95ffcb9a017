//! Room-Temperature Strength Tables
//!
//! Minimum yield/tensile strength per grade, keyed by nominal diameter
//! range. Strength falls off for large-diameter bars of the quenched
//! and tempered grades, hence the range keying.
//!
//! Some cells in the published dataset are still unverified against the
//! governing spec edition. Those carry [`StressValue::Unresolved`] and
//! are never used as numbers in a computation; audit reports surface
//! them separately from true absence.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::units::{Inches, Ksi};

/// Marker string used for unresolved cells in the published JSON artifact
pub const PLACEHOLDER_MARKER: &str = "PLACEHOLDER_VERIFY";

/// A stress table cell: a verified number or an unresolved placeholder.
///
/// Serializes to the dataset's existing convention: verified values are
/// plain JSON numbers, unresolved cells are the `"PLACEHOLDER_VERIFY"`
/// marker string. Deserialization also maps `null` and any non-numeric
/// string to `Unresolved`, matching how the app reads the asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StressValue {
    /// Verified value in ksi
    Known(f64),
    /// Cell exists but the number is not yet verified
    Unresolved,
}

impl StressValue {
    /// Get the value if verified
    pub fn known(&self) -> Option<f64> {
        match self {
            StressValue::Known(v) => Some(*v),
            StressValue::Unresolved => None,
        }
    }

    /// Check if this cell is a verified number
    pub fn is_known(&self) -> bool {
        matches!(self, StressValue::Known(_))
    }
}

impl From<f64> for StressValue {
    fn from(value: f64) -> Self {
        StressValue::Known(value)
    }
}

impl Serialize for StressValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StressValue::Known(v) => serializer.serialize_f64(*v),
            StressValue::Unresolved => serializer.serialize_str(PLACEHOLDER_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for StressValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
            Null,
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(StressValue::Known(v)),
            // Numeric strings slip into hand-edited assets; accept them
            Raw::Text(s) => Ok(s
                .trim()
                .parse::<f64>()
                .map(StressValue::Known)
                .unwrap_or(StressValue::Unresolved)),
            Raw::Null => Ok(StressValue::Unresolved),
        }
    }
}

/// Minimum strength over an inclusive nominal-diameter range
///
/// Field names match the published dataset keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthRange {
    /// Lower diameter bound, inches (inclusive)
    #[serde(rename = "diaMin_in")]
    pub dia_min_in: f64,
    /// Upper diameter bound, inches (inclusive)
    #[serde(rename = "diaMax_in")]
    pub dia_max_in: f64,
    /// Minimum yield strength, ksi
    #[serde(rename = "Sy")]
    pub sy: StressValue,
    /// Minimum tensile strength, ksi
    #[serde(rename = "Su")]
    pub su: StressValue,
}

impl StrengthRange {
    /// Construct a range with verified values
    pub fn new(dia_min_in: f64, dia_max_in: f64, sy_ksi: f64, su_ksi: f64) -> Self {
        Self {
            dia_min_in,
            dia_max_in,
            sy: StressValue::Known(sy_ksi),
            su: StressValue::Known(su_ksi),
        }
    }

    /// Check if a diameter falls within this range (inclusive bounds)
    pub fn contains(&self, diameter: Inches) -> bool {
        diameter.0 >= self.dia_min_in && diameter.0 <= self.dia_max_in
    }
}

/// Look up minimum yield strength for a diameter.
///
/// First-match by inclusion over the stored range order; no
/// interpolation. The matching range decides the answer: an unresolved
/// Sy cell in that range is "no data", not a reason to keep scanning.
pub fn lookup_yield(ranges: &[StrengthRange], diameter: Inches) -> Option<Ksi> {
    ranges
        .iter()
        .find(|r| r.contains(diameter))
        .and_then(|r| r.sy.known())
        .map(Ksi)
}
