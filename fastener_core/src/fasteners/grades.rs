//! Bolt and Nut Grades (ASTM A193 / A320 / A453 / A194)
//!
//! Grade identifiers for the bolting materials the reference dataset
//! covers, plus the recommended nut pairing for each bolt grade.
//!
//! Grade keys are closed enums rather than free-form strings so an
//! unknown grade is rejected at the boundary instead of surfacing as a
//! silent empty lookup deep in the torque computation.

use serde::{Deserialize, Serialize};

use crate::errors::{RefError, RefResult};

/// Bolt grade identifiers
///
/// Variants serialize to the dataset's grade keys (e.g. `"A193_B7"`),
/// which are also the keys the mobile app uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoltGrade {
    /// ASTM A193 B7 (Cr-Mo alloy steel, the workhorse stud grade)
    #[serde(rename = "A193_B7")]
    A193B7,
    /// ASTM A193 B7M (B7 with controlled hardness for sour service)
    #[serde(rename = "A193_B7M")]
    A193B7M,
    /// ASTM A193 B16 (Cr-Mo-V, higher temperature service than B7)
    #[serde(rename = "A193_B16")]
    A193B16,
    /// ASTM A320 L7 (low-temperature Cr-Mo)
    #[serde(rename = "A320_L7")]
    A320L7,
    /// ASTM A320 L7M (L7 with controlled hardness)
    #[serde(rename = "A320_L7M")]
    A320L7M,
    /// ASTM A193 B8 Class 1 (304 stainless, carbide solution treated)
    #[serde(rename = "A193_B8_Class1_304")]
    A193B8Class1,
    /// ASTM A193 B8M Class 1 (316 stainless)
    #[serde(rename = "A193_B8M_Class1_316")]
    A193B8MClass1,
    /// ASTM A453 Grade 660 Class A (A-286 age-hardened superalloy)
    #[serde(rename = "A453_660_ClassA")]
    A453660ClassA,
    /// ASTM A453 Grade 660 Class B
    #[serde(rename = "A453_660_ClassB")]
    A453660ClassB,
    /// ASTM A453 Grade 660 Class C
    #[serde(rename = "A453_660_ClassC")]
    A453660ClassC,
    /// ASTM A453 Grade 660 Class D
    #[serde(rename = "A453_660_ClassD")]
    A453660ClassD,
}

impl BoltGrade {
    /// All bolt grade variants, in the dataset's publication order
    pub const ALL: [BoltGrade; 11] = [
        BoltGrade::A193B7,
        BoltGrade::A193B7M,
        BoltGrade::A193B16,
        BoltGrade::A320L7,
        BoltGrade::A320L7M,
        BoltGrade::A193B8Class1,
        BoltGrade::A193B8MClass1,
        BoltGrade::A453660ClassA,
        BoltGrade::A453660ClassB,
        BoltGrade::A453660ClassC,
        BoltGrade::A453660ClassD,
    ];

    /// Get the dataset key string (e.g., "A193_B7")
    pub fn code(&self) -> &'static str {
        match self {
            BoltGrade::A193B7 => "A193_B7",
            BoltGrade::A193B7M => "A193_B7M",
            BoltGrade::A193B16 => "A193_B16",
            BoltGrade::A320L7 => "A320_L7",
            BoltGrade::A320L7M => "A320_L7M",
            BoltGrade::A193B8Class1 => "A193_B8_Class1_304",
            BoltGrade::A193B8MClass1 => "A193_B8M_Class1_316",
            BoltGrade::A453660ClassA => "A453_660_ClassA",
            BoltGrade::A453660ClassB => "A453_660_ClassB",
            BoltGrade::A453660ClassC => "A453_660_ClassC",
            BoltGrade::A453660ClassD => "A453_660_ClassD",
        }
    }

    /// Parse from common string representations
    ///
    /// Accepts the dataset key ("A193_B7") as well as spec-sheet
    /// spellings ("SA-193 B7", "a193 b7").
    pub fn from_str_flexible(s: &str) -> RefResult<Self> {
        let normalized = s
            .trim()
            .to_uppercase()
            .replace("SA-", "A")
            .replace(['-', ' ', '.'], "_");
        match normalized.as_str() {
            "A193_B7" => Ok(BoltGrade::A193B7),
            "A193_B7M" => Ok(BoltGrade::A193B7M),
            "A193_B16" => Ok(BoltGrade::A193B16),
            "A320_L7" => Ok(BoltGrade::A320L7),
            "A320_L7M" => Ok(BoltGrade::A320L7M),
            "A193_B8_CLASS1_304" | "A193_B8_CLASS_1" | "A193_B8" => Ok(BoltGrade::A193B8Class1),
            "A193_B8M_CLASS1_316" | "A193_B8M_CLASS_1" | "A193_B8M" => {
                Ok(BoltGrade::A193B8MClass1)
            }
            "A453_660_CLASSA" | "A453_660_CLASS_A" => Ok(BoltGrade::A453660ClassA),
            "A453_660_CLASSB" | "A453_660_CLASS_B" => Ok(BoltGrade::A453660ClassB),
            "A453_660_CLASSC" | "A453_660_CLASS_C" => Ok(BoltGrade::A453660ClassC),
            "A453_660_CLASSD" | "A453_660_CLASS_D" => Ok(BoltGrade::A453660ClassD),
            _ => Err(RefError::unknown_grade(s)),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BoltGrade::A193B7 => "A193 B7",
            BoltGrade::A193B7M => "A193 B7M",
            BoltGrade::A193B16 => "A193 B16",
            BoltGrade::A320L7 => "A320 L7",
            BoltGrade::A320L7M => "A320 L7M",
            BoltGrade::A193B8Class1 => "A193 B8 Class 1 (304)",
            BoltGrade::A193B8MClass1 => "A193 B8M Class 1 (316)",
            BoltGrade::A453660ClassA => "A453 660 Class A",
            BoltGrade::A453660ClassB => "A453 660 Class B",
            BoltGrade::A453660ClassC => "A453 660 Class C",
            BoltGrade::A453660ClassD => "A453 660 Class D",
        }
    }

    /// Check if this is an austenitic stainless grade
    ///
    /// Stainless bolting galls against stainless nuts; downstream
    /// tooling surfaces an anti-seize caution for these grades.
    pub fn is_stainless(&self) -> bool {
        matches!(self, BoltGrade::A193B8Class1 | BoltGrade::A193B8MClass1)
    }

    /// Recommended nut grades for this bolt grade (preferred first)
    pub fn recommended_nuts(&self) -> &'static [NutGrade] {
        match self {
            BoltGrade::A193B7 => &[NutGrade::A194_2H, NutGrade::A194_4, NutGrade::A194_7],
            BoltGrade::A193B7M => &[NutGrade::A194_2HM, NutGrade::A194_7M],
            BoltGrade::A193B16 => &[NutGrade::A194_4, NutGrade::A194_7],
            BoltGrade::A320L7 => &[NutGrade::A194_7, NutGrade::A194_4],
            BoltGrade::A320L7M => &[NutGrade::A194_7M],
            BoltGrade::A193B8Class1 => &[NutGrade::A194_8],
            BoltGrade::A193B8MClass1 => &[NutGrade::A194_8M],
            BoltGrade::A453660ClassA
            | BoltGrade::A453660ClassB
            | BoltGrade::A453660ClassC
            | BoltGrade::A453660ClassD => &[NutGrade::A453_660],
        }
    }
}

impl std::fmt::Display for BoltGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Nut grade identifiers (ASTM A194 plus same-alloy A453 nuts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum NutGrade {
    /// A194 2H (quenched and tempered carbon steel, heavy hex)
    #[serde(rename = "A194_2H")]
    A194_2H,
    /// A194 2HM (controlled hardness for sour service)
    #[serde(rename = "A194_2HM")]
    A194_2HM,
    /// A194 4 (Cr-Mo alloy)
    #[serde(rename = "A194_4")]
    A194_4,
    /// A194 7 (Cr-Mo alloy, matches B7/L7 studs)
    #[serde(rename = "A194_7")]
    A194_7,
    /// A194 7M (controlled hardness)
    #[serde(rename = "A194_7M")]
    A194_7M,
    /// A194 8 (304 stainless)
    #[serde(rename = "A194_8")]
    A194_8,
    /// A194 8M (316 stainless)
    #[serde(rename = "A194_8M")]
    A194_8M,
    /// A453 660 (same-alloy nut for A-286 studs)
    #[serde(rename = "A453_660")]
    A453_660,
}

impl NutGrade {
    /// All nut grade variants, in the dataset's publication order
    pub const ALL: [NutGrade; 8] = [
        NutGrade::A194_2H,
        NutGrade::A194_2HM,
        NutGrade::A194_4,
        NutGrade::A194_7,
        NutGrade::A194_7M,
        NutGrade::A194_8,
        NutGrade::A194_8M,
        NutGrade::A453_660,
    ];

    /// Get the dataset key string (e.g., "A194_2H")
    pub fn code(&self) -> &'static str {
        match self {
            NutGrade::A194_2H => "A194_2H",
            NutGrade::A194_2HM => "A194_2HM",
            NutGrade::A194_4 => "A194_4",
            NutGrade::A194_7 => "A194_7",
            NutGrade::A194_7M => "A194_7M",
            NutGrade::A194_8 => "A194_8",
            NutGrade::A194_8M => "A194_8M",
            NutGrade::A453_660 => "A453_660",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            NutGrade::A194_2H => "A194 2H",
            NutGrade::A194_2HM => "A194 2HM",
            NutGrade::A194_4 => "A194 4",
            NutGrade::A194_7 => "A194 7",
            NutGrade::A194_7M => "A194 7M",
            NutGrade::A194_8 => "A194 8",
            NutGrade::A194_8M => "A194 8M",
            NutGrade::A453_660 => "A453 660",
        }
    }
}

impl std::fmt::Display for NutGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_codes_roundtrip() {
        for grade in BoltGrade::ALL {
            assert_eq!(BoltGrade::from_str_flexible(grade.code()).unwrap(), grade);
        }
    }

    #[test]
    fn test_grade_parsing_flexible() {
        assert_eq!(
            BoltGrade::from_str_flexible("SA-193 B7").unwrap(),
            BoltGrade::A193B7
        );
        assert_eq!(
            BoltGrade::from_str_flexible("a320 l7m").unwrap(),
            BoltGrade::A320L7M
        );
        assert!(BoltGrade::from_str_flexible("A999_X").is_err());
    }

    #[test]
    fn test_grade_serialization_uses_dataset_key() {
        let json = serde_json::to_string(&BoltGrade::A193B8Class1).unwrap();
        assert_eq!(json, "\"A193_B8_Class1_304\"");
        let parsed: BoltGrade = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, BoltGrade::A193B8Class1);
    }

    #[test]
    fn test_stainless_flag() {
        assert!(BoltGrade::A193B8Class1.is_stainless());
        assert!(BoltGrade::A193B8MClass1.is_stainless());
        assert!(!BoltGrade::A193B7.is_stainless());
    }

    #[test]
    fn test_nut_pairing() {
        assert_eq!(
            BoltGrade::A193B7.recommended_nuts().first(),
            Some(&NutGrade::A194_2H)
        );
        assert_eq!(
            BoltGrade::A193B8MClass1.recommended_nuts(),
            &[NutGrade::A194_8M]
        );
    }
}
