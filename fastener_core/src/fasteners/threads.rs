//! Thread Series & Diameter Tokens
//!
//! Thread series identifiers, the mixed fractional diameter notation used
//! throughout the reference tables ("1-1/2", "3/4", "2"), and the
//! root-area fallback formula for series/diameter pairs without a
//! published tensile stress area.

use serde::{Deserialize, Serialize};

use crate::errors::{RefError, RefResult};
use crate::units::{Inches, SqIn};

/// Thread series classification
///
/// The reference tables carry coarse series (UNC) for small fasteners
/// and the constant-pitch 8-thread series (8UN) for 1 in and larger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThreadSeries {
    /// Unified National Coarse
    #[serde(rename = "UNC")]
    Unc,
    /// 8-thread series (8 TPI at every diameter)
    #[serde(rename = "8UN")]
    EightUn,
}

impl ThreadSeries {
    /// All thread series variants
    pub const ALL: [ThreadSeries; 2] = [ThreadSeries::Unc, ThreadSeries::EightUn];

    /// Get the dataset key string ("UNC", "8UN")
    pub fn code(&self) -> &'static str {
        match self {
            ThreadSeries::Unc => "UNC",
            ThreadSeries::EightUn => "8UN",
        }
    }

    /// Parse from the dataset key string
    pub fn from_str_flexible(s: &str) -> RefResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "UNC" => Ok(ThreadSeries::Unc),
            "8UN" | "UN8" => Ok(ThreadSeries::EightUn),
            _ => Err(RefError::invalid_input(
                "thread_series",
                s,
                "Expected UNC or 8UN",
            )),
        }
    }

    /// Default series for a nominal diameter
    ///
    /// Flange bolting convention: 1 in and larger runs the 8-thread
    /// series, smaller diameters run coarse.
    pub fn default_for(diameter: Inches) -> ThreadSeries {
        if diameter.0 >= 1.0 {
            ThreadSeries::EightUn
        } else {
            ThreadSeries::Unc
        }
    }
}

impl std::fmt::Display for ThreadSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parse a nominal diameter token into inches.
///
/// Accepted shapes, matching the reference tables:
/// - `"W-N/D"` mixed notation: `"1-1/2"` → 1.5
/// - `"N/D"` bare fraction: `"3/4"` → 0.75
/// - plain decimal: `"2"` → 2.0
///
/// Anything else is a hard error. Diameter tokens are operator-curated
/// keys, so a malformed token means the table itself is broken.
///
/// # Example
///
/// ```rust
/// use fastener_core::fasteners::parse_diameter;
///
/// assert_eq!(parse_diameter("1-1/2").unwrap().0, 1.5);
/// assert_eq!(parse_diameter("3/4").unwrap().0, 0.75);
/// assert_eq!(parse_diameter("2").unwrap().0, 2.0);
/// assert!(parse_diameter("abc").is_err());
/// ```
pub fn parse_diameter(token: &str) -> RefResult<Inches> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(RefError::diameter_parse(token, "empty token"));
    }

    if trimmed.contains('-') && trimmed.contains('/') {
        let (whole_str, frac_str) = trimmed
            .split_once('-')
            .ok_or_else(|| RefError::diameter_parse(token, "expected W-N/D"))?;
        let whole = parse_component(token, whole_str)?;
        return Ok(Inches(whole + parse_fraction(token, frac_str)?));
    }

    if trimmed.contains('/') {
        return Ok(Inches(parse_fraction(token, trimmed)?));
    }

    Ok(Inches(parse_component(token, trimmed)?))
}

/// Parse the `N/D` part of a diameter token
fn parse_fraction(token: &str, frac: &str) -> RefResult<f64> {
    let (num_str, den_str) = frac
        .split_once('/')
        .ok_or_else(|| RefError::diameter_parse(token, "expected N/D fraction"))?;
    let num = parse_component(token, num_str)?;
    let den = parse_component(token, den_str)?;
    if den == 0.0 {
        return Err(RefError::diameter_parse(token, "denominator is zero"));
    }
    Ok(num / den)
}

fn parse_component(token: &str, part: &str) -> RefResult<f64> {
    part.trim()
        .parse::<f64>()
        .map_err(|_| RefError::diameter_parse(token, format!("'{part}' is not a number")))
}

/// Derive tensile stress area from thread pitch.
///
/// Standard UN-form root-area approximation:
/// `As = 0.7854 × (d − 0.9743/n)²` with d in inches and n in threads
/// per inch. This is only a fallback; tabulated datasheet values take
/// precedence where published.
pub fn derived_stress_area(diameter: Inches, tpi: f64) -> Option<SqIn> {
    if tpi <= 0.0 {
        return None;
    }
    let term = diameter.0 - 0.9743 / tpi;
    Some(SqIn(0.7854 * term * term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed() {
        assert_eq!(parse_diameter("1-1/2").unwrap(), Inches(1.5));
        assert_eq!(parse_diameter("2-1/4").unwrap(), Inches(2.25));
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_diameter("3/4").unwrap(), Inches(0.75));
        assert_eq!(parse_diameter("7/8").unwrap(), Inches(0.875));
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(parse_diameter("2").unwrap(), Inches(2.0));
        assert_eq!(parse_diameter("1.125").unwrap(), Inches(1.125));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(parse_diameter("abc").is_err());
        assert!(parse_diameter("").is_err());
        assert!(parse_diameter("1-1/0").is_err());
        assert!(parse_diameter("1-abc/2").is_err());
    }

    #[test]
    fn test_derived_area_matches_published() {
        // 1" 8 TPI: the published As (0.606 in²) comes from this formula
        let area = derived_stress_area(Inches(1.0), 8.0).unwrap();
        assert!((area.0 - 0.606).abs() < 0.001);
    }

    #[test]
    fn test_derived_area_zero_tpi() {
        assert!(derived_stress_area(Inches(1.0), 0.0).is_none());
    }

    #[test]
    fn test_default_series() {
        assert_eq!(ThreadSeries::default_for(Inches(0.5)), ThreadSeries::Unc);
        assert_eq!(
            ThreadSeries::default_for(Inches(1.0)),
            ThreadSeries::EightUn
        );
    }

    #[test]
    fn test_series_parsing() {
        assert_eq!(
            ThreadSeries::from_str_flexible("8un").unwrap(),
            ThreadSeries::EightUn
        );
        assert!(ThreadSeries::from_str_flexible("UNEF").is_err());
    }
}
