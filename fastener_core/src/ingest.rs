//! # Strength CSV Ingest
//!
//! Merges an operator-supplied spec-sheet CSV into the reference
//! dataset. This is how new code-edition values enter the dataset
//! without hand-editing JSON.
//!
//! ## CSV Format
//!
//! One row per grade/diameter range:
//!
//! ```csv
//! grade_key,dia_min_in,dia_max_in,Sy_ksi,Su_ksi,S_100F_ksi,S_600F_ksi
//! A193_B7,0.25,2.5,105,125,25.0,23.6
//! ```
//!
//! `S_<T>F_ksi` columns are optional and become point temperature
//! entries (`tMin == tMax`). Empty Sy/Su cells fall back to the
//! enclosing existing range's values; empty stress cells are skipped.
//!
//! ## Merge Semantics
//!
//! A grade that appears in the CSV has its strength (and, when the CSV
//! carries temperature columns, allowable) entries replaced wholesale.
//! Grades absent from the CSV keep their existing entries untouched.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{RefError, RefResult};
use crate::fasteners::{AllowableRange, BoltGrade, StrengthRange, StressValue, TempEntry};
use crate::reference::ReferenceData;

/// Summary of a completed merge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeReport {
    /// Grades whose entries were replaced
    pub grades_updated: Vec<BoltGrade>,
    /// CSV data rows consumed
    pub rows_merged: usize,
}

/// Merge a strength CSV file into the reference tables.
pub fn merge_strength_csv(reference: &mut ReferenceData, path: &Path) -> RefResult<MergeReport> {
    let contents = fs::read_to_string(path)
        .map_err(|e| RefError::file_error("read", path.display().to_string(), e.to_string()))?;
    merge_strength_records(reference, &contents)
        .map_err(|e| annotate_path(e, path))
}

fn annotate_path(err: RefError, path: &Path) -> RefError {
    match err {
        RefError::FileError {
            operation, reason, ..
        } => RefError::file_error(operation, path.display().to_string(), reason),
        other => other,
    }
}

/// Merge CSV contents into the reference tables.
///
/// An unknown `grade_key` is a hard error: the CSV is operator-curated
/// and a key outside the grade enum means a typo, not a new grade.
pub fn merge_strength_records(
    reference: &mut ReferenceData,
    contents: &str,
) -> RefResult<MergeReport> {
    let mut lines = contents.lines();

    let header_line = lines
        .next()
        .ok_or_else(|| RefError::file_error("parse", "<csv>", "CSV is empty"))?;
    let headers: Vec<&str> = header_line.split(',').map(str::trim).collect();
    let col_index = |name: &str| -> Option<usize> {
        headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    };

    // Find required column indices
    let grade_idx = col_index("grade_key")
        .ok_or_else(|| RefError::file_error("parse", "<csv>", "Missing 'grade_key' column"))?;
    let dia_min_idx = col_index("dia_min_in");
    let dia_max_idx = col_index("dia_max_in");
    let sy_idx = col_index("Sy_ksi");
    let su_idx = col_index("Su_ksi");

    // Temperature columns: S_<T>F_ksi
    let temp_cols: Vec<(usize, f64)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| parse_temp_column(h).map(|t| (i, t)))
        .collect();

    let mut new_strength: BTreeMap<BoltGrade, Vec<StrengthRange>> = BTreeMap::new();
    let mut new_allowable: BTreeMap<BoltGrade, Vec<AllowableRange>> = BTreeMap::new();
    let mut rows_merged = 0usize;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();

        let grade_str = fields.get(grade_idx).map(|s| s.trim()).unwrap_or("");
        if grade_str.is_empty() {
            continue; // Skip rows without a grade key
        }
        let grade = BoltGrade::from_str_flexible(grade_str)?;

        let get_opt_f64 = |idx: Option<usize>| -> Option<f64> {
            idx.and_then(|i| fields.get(i))
                .and_then(|v| parse_optional_f64(v))
        };

        let dia_min = get_opt_f64(dia_min_idx).unwrap_or(0.0);
        let dia_max = get_opt_f64(dia_max_idx).unwrap_or(f64::MAX);

        // Missing Sy/Su cells fall back to the enclosing existing range
        let existing = find_enclosing_strength(reference, grade, dia_min, dia_max);
        let sy = get_opt_f64(sy_idx)
            .map(StressValue::Known)
            .or(existing.map(|r| r.sy))
            .unwrap_or(StressValue::Unresolved);
        let su = get_opt_f64(su_idx)
            .map(StressValue::Known)
            .or(existing.map(|r| r.su))
            .unwrap_or(StressValue::Unresolved);

        new_strength.entry(grade).or_default().push(StrengthRange {
            dia_min_in: dia_min,
            dia_max_in: dia_max,
            sy,
            su,
        });

        // Explicit temperature cells only; no inference between points
        let temps: Vec<TempEntry> = temp_cols
            .iter()
            .filter_map(|&(i, t)| {
                fields
                    .get(i)
                    .and_then(|v| parse_optional_f64(v))
                    .map(|s| TempEntry::point(t, s))
            })
            .collect();
        if !temps.is_empty() {
            new_allowable.entry(grade).or_default().push(AllowableRange {
                dia_min_in: dia_min,
                dia_max_in: dia_max,
                temps,
            });
        }

        rows_merged += 1;
    }

    // Replace wholesale for grades the CSV covers; leave the rest alone
    let grades_updated: Vec<BoltGrade> = new_strength.keys().copied().collect();
    for (grade, ranges) in new_strength {
        reference.bolt_grades.strength.insert(grade, ranges);
    }
    for (grade, ranges) in new_allowable {
        reference.bolt_grades.allowable.insert(grade, ranges);
    }

    Ok(MergeReport {
        grades_updated,
        rows_merged,
    })
}

/// Find an existing strength range that encloses [dia_min, dia_max]
fn find_enclosing_strength(
    reference: &ReferenceData,
    grade: BoltGrade,
    dia_min: f64,
    dia_max: f64,
) -> Option<&StrengthRange> {
    reference
        .strength_ranges(grade)
        .iter()
        .find(|r| dia_min >= r.dia_min_in && dia_max <= r.dia_max_in)
}

/// Parse a `S_<T>F_ksi` header into its temperature
fn parse_temp_column(name: &str) -> Option<f64> {
    let rest = name.trim().strip_prefix("S_")?;
    let digits = rest.strip_suffix("F_ksi")?;
    u32::from_str(digits).ok().map(f64::from)
}

/// Parse an optional f64 from a CSV field
///
/// Returns None for empty strings, dashes, or invalid numbers.
fn parse_optional_f64(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "-" || trimmed == "—" {
        return None;
    }
    f64::from_str(trimmed).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Inches, Ksi};

    #[test]
    fn test_parse_temp_column() {
        assert_eq!(parse_temp_column("S_600F_ksi"), Some(600.0));
        assert_eq!(parse_temp_column("S_1000F_ksi"), Some(1000.0));
        assert_eq!(parse_temp_column("Sy_ksi"), None);
        assert_eq!(parse_temp_column("S_hotF_ksi"), None);
    }

    #[test]
    fn test_merge_replaces_covered_grade_only() {
        let mut reference = ReferenceData::builtin().clone();
        let before_b16 = reference.strength_ranges(BoltGrade::A193B16).to_vec();

        let csv = "grade_key,dia_min_in,dia_max_in,Sy_ksi,Su_ksi\n\
                   A193_B7,0.25,2.5,106,126\n\
                   A193_B7,2.5,4,96,116\n";
        let report = merge_strength_records(&mut reference, csv).unwrap();

        assert_eq!(report.rows_merged, 2);
        assert_eq!(report.grades_updated, vec![BoltGrade::A193B7]);
        assert_eq!(
            reference.yield_strength(BoltGrade::A193B7, Inches(1.0)),
            Some(Ksi(106.0))
        );
        // Untouched grade keeps its entries bit-identical
        assert_eq!(
            reference.strength_ranges(BoltGrade::A193B16),
            before_b16.as_slice()
        );
    }

    #[test]
    fn test_merge_temp_columns_become_point_entries() {
        let mut reference = ReferenceData::builtin().clone();
        let csv = "grade_key,dia_min_in,dia_max_in,Sy_ksi,Su_ksi,S_100F_ksi,S_600F_ksi\n\
                   A320_L7,0.25,2.5,105,125,25.0,23.6\n";
        merge_strength_records(&mut reference, csv).unwrap();

        let result = reference
            .allowable_stress(BoltGrade::A320L7, Inches(1.0), 600.0)
            .unwrap();
        assert_eq!(result.stress, StressValue::Known(23.6));
        assert_eq!(result.used_temp_f, 600.0);

        // 300 °F rounds up to the 600 point (no 100..600 band exists)
        let rounded = reference
            .allowable_stress(BoltGrade::A320L7, Inches(1.0), 300.0)
            .unwrap();
        assert_eq!(rounded.used_temp_f, 600.0);
    }

    #[test]
    fn test_merge_missing_cells_fall_back_to_existing() {
        let mut reference = ReferenceData::builtin().clone();
        let csv = "grade_key,dia_min_in,dia_max_in,Sy_ksi,Su_ksi\n\
                   A193_B7,0.25,2.5,,126\n";
        merge_strength_records(&mut reference, csv).unwrap();

        // Sy falls back to the enclosing builtin range's 105
        assert_eq!(
            reference.yield_strength(BoltGrade::A193B7, Inches(1.0)),
            Some(Ksi(105.0))
        );
    }

    #[test]
    fn test_merge_unknown_grade_is_rejected() {
        let mut reference = ReferenceData::builtin().clone();
        let csv = "grade_key,dia_min_in,dia_max_in,Sy_ksi,Su_ksi\n\
                   A999_X,0.25,2.5,100,120\n";
        let err = merge_strength_records(&mut reference, csv).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_GRADE");
    }

    #[test]
    fn test_merge_requires_grade_column() {
        let mut reference = ReferenceData::builtin().clone();
        let csv = "spec,grade\nSA-193,B7\n";
        assert!(merge_strength_records(&mut reference, csv).is_err());
    }
}
