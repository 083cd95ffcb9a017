//! # Torque Matrix Computation
//!
//! Computes recommended bolt pre-load and multi-pass tightening torques
//! for a usage scenario against the reference dataset.
//!
//! ## Stress Basis
//!
//! The stress basis is two-tier: temperature-derated allowable stress
//! where the dataset publishes it for the grade/diameter, otherwise the
//! room-temperature minimum yield. The fallback is conservative: every
//! scenario still produces a usable number where any strength data
//! exists at all.
//!
//! ## Degradation
//!
//! Missing data never aborts a run. A scenario with no resolvable
//! stress area or strength emits its row with the dependent fields left
//! absent; only a malformed diameter token is a hard error.
//!
//! ## Example
//!
//! ```rust
//! use fastener_core::reference::ReferenceData;
//! use fastener_core::torque::{compute, Scenario};
//! use fastener_core::fasteners::{BoltGrade, ThreadSeries};
//!
//! let scenario = Scenario::new(BoltGrade::A193B7, "1", ThreadSeries::EightUn)
//!     .with_temperature(600.0)
//!     .with_target_pct(0.50)
//!     .with_lubricant("Dry", 0.27);
//!
//! let row = compute(&scenario, ReferenceData::builtin()).unwrap();
//! assert_eq!(row.as_in2, Some(0.606));
//! assert_eq!(row.sy_or_allowable_ksi, Some(23.6));
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{RefError, RefResult};
use crate::fasteners::{parse_diameter, BoltGrade, ThreadSeries};
use crate::reference::ReferenceData;
use crate::units::{FtLb, InLb, Ksi, Pounds, Psi};

/// Staged tightening fractions of the target torque (standard
/// three-pass sequence)
pub const STAGED_PASS_FRACTIONS: [f64; 3] = [0.30, 0.60, 1.00];

/// One usage scenario: a bolt in service
///
/// Immutable input; the standard report runs a fixed curated list
/// ([`standard_scenarios`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Bolt grade
    pub grade: BoltGrade,

    /// Nominal diameter token (e.g. "1-1/2")
    #[serde(rename = "dia")]
    pub dia_token: String,

    /// Thread series
    pub series: ThreadSeries,

    /// Operating temperature, °F
    #[serde(rename = "temp")]
    pub temp_f: f64,

    /// Target fraction of the stress basis (e.g. 0.50 for 50 % yield)
    pub pct: f64,

    /// Lubricant label for the report
    pub lube: String,

    /// Empirical nut factor K for that lubricant
    pub k: f64,
}

impl Scenario {
    /// Create a scenario with ambient defaults (70 °F, 50 % target, dry)
    pub fn new(grade: BoltGrade, dia_token: impl Into<String>, series: ThreadSeries) -> Self {
        Self {
            grade,
            dia_token: dia_token.into(),
            series,
            temp_f: 70.0,
            pct: 0.50,
            lube: "Dry".to_string(),
            k: 0.27,
        }
    }

    /// Set the operating temperature (°F)
    pub fn with_temperature(mut self, temp_f: f64) -> Self {
        self.temp_f = temp_f;
        self
    }

    /// Set the target fraction of the stress basis
    pub fn with_target_pct(mut self, pct: f64) -> Self {
        self.pct = pct;
        self
    }

    /// Set the lubricant label and its nut factor
    pub fn with_lubricant(mut self, lube: impl Into<String>, k: f64) -> Self {
        self.lube = lube.into();
        self.k = k;
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> RefResult<()> {
        if !(self.pct > 0.0 && self.pct <= 1.0) {
            return Err(RefError::invalid_input(
                "pct",
                self.pct.to_string(),
                "Target fraction must be within (0, 1]",
            ));
        }
        if self.k <= 0.0 {
            return Err(RefError::invalid_input(
                "k",
                self.k.to_string(),
                "Nut factor must be positive",
            ));
        }
        if !self.temp_f.is_finite() {
            return Err(RefError::invalid_input(
                "temp",
                self.temp_f.to_string(),
                "Temperature must be finite",
            ));
        }
        Ok(())
    }
}

/// One computed report row
///
/// Field names match the published torque matrix CSV headers. Absent
/// values (`None`) render as empty fields, never as zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorqueRow {
    /// 1-based scenario index
    pub scenario: usize,
    pub grade: BoltGrade,
    #[serde(rename = "diameter_in")]
    pub dia_token: String,
    #[serde(rename = "thread_series")]
    pub series: ThreadSeries,
    /// Resolved threads per inch
    pub tpi: Option<f64>,
    /// Resolved tensile stress area, in²
    #[serde(rename = "As_in2")]
    pub as_in2: Option<f64>,
    /// Requested operating temperature, °F
    #[serde(rename = "working_temp_F")]
    pub working_temp_f: f64,
    /// Temperature actually used for the stress basis, °F (allowable
    /// basis only; absent on the yield basis)
    #[serde(rename = "used_temp_F")]
    pub used_temp_f: Option<f64>,
    /// Resolved stress basis value, ksi
    #[serde(rename = "Sy_or_allowable_ksi")]
    pub sy_or_allowable_ksi: Option<f64>,
    #[serde(rename = "pct_yield")]
    pub pct: f64,
    /// Recommended bolt pre-load, lbf
    #[serde(rename = "bolt_load_F_lbf")]
    pub bolt_load_lbf: Option<f64>,
    pub lube: String,
    #[serde(rename = "K")]
    pub k: f64,
    /// Target (final pass) torque, ft-lb
    #[serde(rename = "target_torque_ftlb")]
    pub target_torque_ftlb: Option<f64>,
    #[serde(rename = "pass1_30pct_ftlb")]
    pub pass1_ftlb: Option<f64>,
    #[serde(rename = "pass2_60pct_ftlb")]
    pub pass2_ftlb: Option<f64>,
    #[serde(rename = "pass3_100pct_ftlb")]
    pub pass3_ftlb: Option<f64>,
}

/// Compute the report row for a scenario.
///
/// Pure function of the scenario plus the read-only reference tables;
/// safe to call concurrently for disjoint scenario lists.
pub fn compute(scenario: &Scenario, reference: &ReferenceData) -> RefResult<TorqueRow> {
    compute_indexed(scenario, reference, 1)
}

/// Compute a row carrying an explicit 1-based scenario index
pub fn compute_indexed(
    scenario: &Scenario,
    reference: &ReferenceData,
    index: usize,
) -> RefResult<TorqueRow> {
    scenario.validate()?;
    let diameter = parse_diameter(&scenario.dia_token)?;

    let tpi = reference.tpi(scenario.series, &scenario.dia_token);
    let area = reference.stress_area(scenario.series, &scenario.dia_token)?;

    // Allowable stress preferred; an unresolved cell or absent table
    // falls back to the room-temperature yield basis
    let allowable = reference
        .allowable_stress(scenario.grade, diameter, scenario.temp_f)
        .and_then(|r| r.stress.known().map(|s| (s, r.used_temp_f)));

    let (stress_ksi, used_temp_f) = match allowable {
        Some((s, used)) => (Some(s), Some(used)),
        None => (
            reference
                .yield_strength(scenario.grade, diameter)
                .map(|sy| sy.0),
            None,
        ),
    };

    let bolt_load = match (area, stress_ksi) {
        (Some(a), Some(s)) => Some(Pounds(a.0 * Psi::from(Ksi(s)).0 * scenario.pct)),
        _ => None,
    };

    // K × d × F is in inch-pounds; the report publishes foot-pounds
    let target_torque =
        bolt_load.map(|f| FtLb::from(InLb(scenario.k * diameter.0 * f.0)));

    Ok(TorqueRow {
        scenario: index,
        grade: scenario.grade,
        dia_token: scenario.dia_token.clone(),
        series: scenario.series,
        tpi,
        as_in2: area.map(|a| a.0),
        working_temp_f: scenario.temp_f,
        used_temp_f,
        sy_or_allowable_ksi: stress_ksi,
        pct: scenario.pct,
        bolt_load_lbf: bolt_load.map(|f| f.0),
        lube: scenario.lube.clone(),
        k: scenario.k,
        target_torque_ftlb: target_torque.map(|t| t.0),
        pass1_ftlb: target_torque.map(|t| t.0 * STAGED_PASS_FRACTIONS[0]),
        pass2_ftlb: target_torque.map(|t| t.0 * STAGED_PASS_FRACTIONS[1]),
        pass3_ftlb: target_torque.map(|t| t.0),
    })
}

/// Compute rows for a scenario list, indexing from 1
pub fn compute_matrix(
    scenarios: &[Scenario],
    reference: &ReferenceData,
) -> RefResult<Vec<TorqueRow>> {
    scenarios
        .iter()
        .enumerate()
        .map(|(i, sc)| compute_indexed(sc, reference, i + 1))
        .collect()
}

/// The curated 20-scenario list published with the reference app.
///
/// Covers the grade range of the dataset across representative
/// diameters, temperatures, target fractions, and lubricants.
pub fn standard_scenarios() -> Vec<Scenario> {
    use BoltGrade::*;
    use ThreadSeries::*;

    let sc = |grade, dia: &str, series, temp: f64, pct: f64, lube: &str, k: f64| {
        Scenario::new(grade, dia, series)
            .with_temperature(temp)
            .with_target_pct(pct)
            .with_lubricant(lube, k)
    };

    vec![
        sc(A193B7, "1", EightUn, 600.0, 0.50, "Dry", 0.27),
        sc(A193B7, "1", EightUn, 650.0, 0.45, "Moly paste", 0.11),
        sc(A193B7, "1-1/2", EightUn, 700.0, 0.50, "Never-Seez Regular", 0.13),
        sc(A193B7, "2", EightUn, 750.0, 0.40, "Copper/Nickel anti-seize", 0.15),
        sc(A193B7, "1/2", Unc, 550.0, 0.35, "Dry", 0.27),
        sc(A193B16, "2-1/2", EightUn, 900.0, 0.50, "Dry", 0.27),
        sc(A193B16, "3", EightUn, 650.0, 0.55, "High-temp blends", 0.17),
        sc(A193B16, "4", EightUn, 500.0, 0.45, "Moly paste", 0.11),
        sc(A193B7M, "1", EightUn, 650.0, 0.50, "Dry", 0.27),
        sc(A193B7M, "2", EightUn, 700.0, 0.45, "Never-Seez Regular", 0.13),
        sc(A320L7, "1", EightUn, 650.0, 0.50, "Copper/Nickel anti-seize", 0.15),
        sc(A320L7, "2", EightUn, 550.0, 0.40, "Dry", 0.27),
        sc(A320L7M, "1", EightUn, 650.0, 0.50, "High-temp blends", 0.17),
        sc(A320L7M, "2", EightUn, 700.0, 0.45, "Moly paste", 0.11),
        sc(A193B8Class1, "1", EightUn, 300.0, 0.50, "Dry", 0.27),
        sc(A193B8MClass1, "1", EightUn, 650.0, 0.50, "Dry", 0.27),
        sc(A193B8MClass1, "2", EightUn, 1000.0, 0.45, "Copper/Nickel anti-seize", 0.15),
        sc(A453660ClassA, "1", EightUn, 950.0, 0.50, "Dry", 0.27),
        sc(A453660ClassB, "1", EightUn, 1000.0, 0.50, "Moly paste", 0.11),
        sc(A453660ClassC, "1", EightUn, 1000.0, 0.50, "High-temp blends", 0.17),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> &'static ReferenceData {
        ReferenceData::builtin()
    }

    #[test]
    fn test_end_to_end_b7_at_600() {
        let scenario = Scenario::new(BoltGrade::A193B7, "1", ThreadSeries::EightUn)
            .with_temperature(600.0)
            .with_target_pct(0.50)
            .with_lubricant("Dry", 0.27);
        let row = compute(&scenario, reference()).unwrap();

        assert_eq!(row.tpi, Some(8.0));
        assert_eq!(row.as_in2, Some(0.606));
        assert_eq!(row.used_temp_f, Some(600.0));
        assert_eq!(row.sy_or_allowable_ksi, Some(23.6));

        let f = row.bolt_load_lbf.unwrap();
        assert!((f - 7150.8).abs() < 1e-9);

        let t = row.target_torque_ftlb.unwrap();
        assert!((t - 0.27 * 1.0 * 7150.8 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_round_up_reports_used_temperature() {
        let scenario = Scenario::new(BoltGrade::A193B7, "1/2", ThreadSeries::Unc)
            .with_temperature(550.0)
            .with_target_pct(0.35)
            .with_lubricant("Dry", 0.27);
        let row = compute(&scenario, reference()).unwrap();

        assert_eq!(row.working_temp_f, 550.0);
        assert_eq!(row.used_temp_f, Some(600.0));
        assert_eq!(row.sy_or_allowable_ksi, Some(23.6));
    }

    #[test]
    fn test_yield_fallback_without_allowable_data() {
        let scenario = Scenario::new(BoltGrade::A320L7, "1", ThreadSeries::EightUn)
            .with_temperature(650.0)
            .with_target_pct(0.50)
            .with_lubricant("Copper/Nickel anti-seize", 0.15);
        let row = compute(&scenario, reference()).unwrap();

        // No allowable table for A320; the yield basis carries no used temp
        assert_eq!(row.used_temp_f, None);
        assert_eq!(row.sy_or_allowable_ksi, Some(105.0));
        assert!(row.target_torque_ftlb.is_some());
    }

    #[test]
    fn test_yield_fallback_on_unresolved_allowable_cell() {
        // B8's 850 °F cell is unresolved; computation must not use it
        let scenario = Scenario::new(BoltGrade::A193B8Class1, "1", ThreadSeries::EightUn)
            .with_temperature(850.0);
        let row = compute(&scenario, reference()).unwrap();

        assert_eq!(row.used_temp_f, None);
        assert_eq!(row.sy_or_allowable_ksi, Some(30.0));
    }

    #[test]
    fn test_missing_strength_degrades_row() {
        let scenario = Scenario::new(BoltGrade::A453660ClassC, "1", ThreadSeries::EightUn)
            .with_temperature(1000.0)
            .with_lubricant("High-temp blends", 0.17);
        let row = compute(&scenario, reference()).unwrap();

        // Geometry still resolves; strength and everything downstream is absent
        assert_eq!(row.as_in2, Some(0.606));
        assert_eq!(row.sy_or_allowable_ksi, None);
        assert_eq!(row.bolt_load_lbf, None);
        assert_eq!(row.target_torque_ftlb, None);
        assert_eq!(row.pass1_ftlb, None);
    }

    #[test]
    fn test_staged_torque_fractions_exact() {
        let scenario = Scenario::new(BoltGrade::A193B7, "1-1/2", ThreadSeries::EightUn)
            .with_temperature(700.0)
            .with_lubricant("Never-Seez Regular", 0.13);
        let row = compute(&scenario, reference()).unwrap();

        let t = row.target_torque_ftlb.unwrap();
        assert_eq!(row.pass1_ftlb, Some(t * 0.30));
        assert_eq!(row.pass2_ftlb, Some(t * 0.60));
        assert_eq!(row.pass3_ftlb, Some(t));
    }

    #[test]
    fn test_malformed_diameter_is_fatal() {
        let scenario = Scenario::new(BoltGrade::A193B7, "abc", ThreadSeries::EightUn);
        assert!(compute(&scenario, reference()).is_err());
    }

    #[test]
    fn test_invalid_pct_rejected() {
        let scenario =
            Scenario::new(BoltGrade::A193B7, "1", ThreadSeries::EightUn).with_target_pct(1.5);
        assert!(compute(&scenario, reference()).is_err());
    }

    #[test]
    fn test_standard_matrix_computes_every_row() {
        let scenarios = standard_scenarios();
        assert_eq!(scenarios.len(), 20);

        let rows = compute_matrix(&scenarios, reference()).unwrap();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].scenario, 1);
        assert_eq!(rows[19].scenario, 20);

        // Exactly one scenario (660 Class C) lacks a stress basis
        let missing: Vec<_> = rows
            .iter()
            .filter(|r| r.target_torque_ftlb.is_none())
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].grade, BoltGrade::A453660ClassC);
    }

    #[test]
    fn test_row_serialization_headers() {
        let scenario = Scenario::new(BoltGrade::A193B7, "1", ThreadSeries::EightUn);
        let row = compute(&scenario, reference()).unwrap();
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"As_in2\""));
        assert!(json.contains("\"bolt_load_F_lbf\""));
        assert!(json.contains("\"pass3_100pct_ftlb\""));
    }
}
