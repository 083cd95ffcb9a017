//! Temperature-Derated Allowable Stress Tables
//!
//! Allowable stress S per grade, keyed by nominal diameter range and
//! temperature range. The reference standards publish these only for
//! some grades; where absent, torque computation falls back to the
//! room-temperature yield basis (see [`crate::torque`]).
//!
//! Temperature entries are inclusive ranges. Hand-curated rows use real
//! spans; rows merged from spec-sheet CSVs are point entries
//! (`tMin == tMax` at 50 °F steps), and a query between points rounds
//! up to the next tabulated boundary. Rounding up is conservative:
//! allowable stress decreases with temperature, so the next boundary up
//! never overstates capacity.

use serde::{Deserialize, Serialize};

use crate::fasteners::strength::StressValue;
use crate::units::Inches;

/// One temperature band within an allowable-stress range
///
/// Field names match the published dataset keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempEntry {
    /// Lower temperature bound, °F (inclusive)
    #[serde(rename = "tMin")]
    pub t_min_f: f64,
    /// Upper temperature bound, °F (inclusive)
    #[serde(rename = "tMax")]
    pub t_max_f: f64,
    /// Allowable stress, ksi
    #[serde(rename = "S")]
    pub s: StressValue,
}

impl TempEntry {
    /// Construct a point entry (`tMin == tMax`) with a verified value
    pub fn point(temp_f: f64, s_ksi: f64) -> Self {
        Self {
            t_min_f: temp_f,
            t_max_f: temp_f,
            s: StressValue::Known(s_ksi),
        }
    }

    /// Check if a temperature falls within this band (inclusive bounds)
    pub fn contains(&self, temp_f: f64) -> bool {
        temp_f >= self.t_min_f && temp_f <= self.t_max_f
    }
}

/// Allowable stress bands over an inclusive nominal-diameter range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowableRange {
    /// Lower diameter bound, inches (inclusive)
    #[serde(rename = "diaMin_in")]
    pub dia_min_in: f64,
    /// Upper diameter bound, inches (inclusive)
    #[serde(rename = "diaMax_in")]
    pub dia_max_in: f64,
    /// Temperature bands in stored (publication) order
    pub temps: Vec<TempEntry>,
}

impl AllowableRange {
    /// Construct a range from point entries
    pub fn from_points(dia_min_in: f64, dia_max_in: f64, points: &[(f64, f64)]) -> Self {
        Self {
            dia_min_in,
            dia_max_in,
            temps: points.iter().map(|&(t, s)| TempEntry::point(t, s)).collect(),
        }
    }

    /// Check if a diameter falls within this range (inclusive bounds)
    pub fn contains(&self, diameter: Inches) -> bool {
        diameter.0 >= self.dia_min_in && diameter.0 <= self.dia_max_in
    }
}

/// Resolved allowable stress and the tabulated temperature it came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllowableResult {
    /// The matched cell; may be unresolved, which callers must treat as
    /// unavailable rather than a number
    pub stress: StressValue,
    /// Temperature actually used for the stress basis, °F
    pub used_temp_f: f64,
}

/// Look up allowable stress for a diameter and operating temperature.
///
/// Only the first diameter range (stored order) containing the diameter
/// is consulted. Within it:
///
/// 1. **Direct match**: the first band whose inclusive `[tMin, tMax]`
///    contains the temperature wins; its `tMax` is reported as the
///    temperature used.
/// 2. **Round-up**: otherwise, among bands with `tMax >=` the query,
///    the smallest `tMax` wins. Ties keep stored order.
///
/// Returns `None` when no diameter range matches or no band qualifies.
pub fn lookup_allowable(
    ranges: &[AllowableRange],
    diameter: Inches,
    temp_f: f64,
) -> Option<AllowableResult> {
    let range = ranges.iter().find(|r| r.contains(diameter))?;

    if let Some(entry) = range.temps.iter().find(|t| t.contains(temp_f)) {
        return Some(AllowableResult {
            stress: entry.s,
            used_temp_f: entry.t_max_f,
        });
    }

    // Round up to the nearest tabulated boundary at or above the query.
    // min_by returns the first of equal entries, preserving stored order.
    range
        .temps
        .iter()
        .filter(|t| t.t_max_f >= temp_f)
        .min_by(|a, b| {
            a.t_max_f
                .partial_cmp(&b.t_max_f)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|entry| AllowableResult {
            stress: entry.s,
            used_temp_f: entry.t_max_f,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_ranges() -> Vec<AllowableRange> {
        vec![AllowableRange::from_points(
            0.25,
            2.5,
            &[(500.0, 25.0), (600.0, 23.6), (700.0, 17.0)],
        )]
    }

    #[test]
    fn test_direct_match_wins() {
        let ranges = vec![AllowableRange {
            dia_min_in: 0.25,
            dia_max_in: 2.5,
            temps: vec![
                TempEntry {
                    t_min_f: -20.0,
                    t_max_f: 500.0,
                    s: StressValue::Known(25.0),
                },
                TempEntry::point(600.0, 23.6),
            ],
        }];
        // 450 sits inside the first band; round-up must not fire
        let result = lookup_allowable(&ranges, Inches(1.0), 450.0).unwrap();
        assert_eq!(result.stress, StressValue::Known(25.0));
        assert_eq!(result.used_temp_f, 500.0);
    }

    #[test]
    fn test_round_up_to_next_boundary() {
        // 550 has no direct band; the 600 point wins over 500 and 700
        let result = lookup_allowable(&point_ranges(), Inches(1.0), 550.0).unwrap();
        assert_eq!(result.stress, StressValue::Known(23.6));
        assert_eq!(result.used_temp_f, 600.0);
    }

    #[test]
    fn test_round_up_tie_keeps_stored_order() {
        let ranges = vec![AllowableRange {
            dia_min_in: 0.25,
            dia_max_in: 2.5,
            temps: vec![
                TempEntry {
                    t_min_f: 590.0,
                    t_max_f: 600.0,
                    s: StressValue::Known(23.6),
                },
                TempEntry {
                    t_min_f: 595.0,
                    t_max_f: 600.0,
                    s: StressValue::Known(9.9),
                },
            ],
        }];
        let result = lookup_allowable(&ranges, Inches(1.0), 550.0).unwrap();
        assert_eq!(result.stress, StressValue::Known(23.6));
    }

    #[test]
    fn test_above_all_bands_is_none() {
        assert!(lookup_allowable(&point_ranges(), Inches(1.0), 900.0).is_none());
    }

    #[test]
    fn test_diameter_outside_every_range() {
        assert!(lookup_allowable(&point_ranges(), Inches(4.0), 550.0).is_none());
    }

    #[test]
    fn test_first_matching_diameter_range_only() {
        let ranges = vec![
            AllowableRange::from_points(0.25, 2.5, &[(500.0, 25.0)]),
            AllowableRange::from_points(0.25, 4.0, &[(900.0, 8.5)]),
        ];
        // 700 °F exceeds every band of the first matching range; the
        // second range is never consulted
        assert!(lookup_allowable(&ranges, Inches(1.0), 700.0).is_none());
    }

    #[test]
    fn test_unresolved_cell_passes_through() {
        let ranges = vec![AllowableRange {
            dia_min_in: 0.25,
            dia_max_in: 2.5,
            temps: vec![TempEntry {
                t_min_f: 600.0,
                t_max_f: 600.0,
                s: StressValue::Unresolved,
            }],
        }];
        let result = lookup_allowable(&ranges, Inches(1.0), 600.0).unwrap();
        assert_eq!(result.stress, StressValue::Unresolved);
    }
}
