//! # Audit Report Builders
//!
//! Human-readable CSV/text renderings of the reference dataset and the
//! torque matrix. Every builder is a pure function of its inputs and
//! returns the full file contents as a `String`; the `gen-reports`
//! binary handles the writing.
//!
//! Absent values render as empty CSV fields. Unresolved cells render as
//! the placeholder marker with a `missing` annotation, so known-
//! incomplete data stays distinguishable from true absence.

use crate::fasteners::{StressValue, PLACEHOLDER_MARKER};
use crate::reference::ReferenceData;
use crate::torque::TorqueRow;

/// Torque matrix CSV header, in publication column order
const TORQUE_MATRIX_HEADER: &str = "scenario,grade,diameter_in,thread_series,tpi,As_in2,\
     working_temp_F,used_temp_F,Sy_or_allowable_ksi,pct_yield,bolt_load_F_lbf,lube,K,\
     target_torque_ftlb,pass1_30pct_ftlb,pass2_60pct_ftlb,pass3_100pct_ftlb";

/// Render the torque matrix rows as CSV.
pub fn torque_matrix_csv(rows: &[TorqueRow]) -> String {
    let mut out = String::from(TORQUE_MATRIX_HEADER);
    out.push('\n');
    for row in rows {
        let fields = [
            row.scenario.to_string(),
            row.grade.code().to_string(),
            csv_field(&row.dia_token),
            row.series.code().to_string(),
            fmt_opt(row.tpi),
            fmt_opt(row.as_in2),
            fmt_f64(row.working_temp_f),
            fmt_opt(row.used_temp_f),
            fmt_opt(row.sy_or_allowable_ksi),
            fmt_f64(row.pct),
            fmt_opt(row.bolt_load_lbf),
            csv_field(&row.lube),
            fmt_f64(row.k),
            fmt_opt(row.target_torque_ftlb),
            fmt_opt(row.pass1_ftlb),
            fmt_opt(row.pass2_ftlb),
            fmt_opt(row.pass3_ftlb),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Render the room-temperature strength audit as CSV.
///
/// One row per strength range per grade; grades with no data get a
/// single `NO_STRENGTH_DATA` row so the audit is complete over the
/// options list.
pub fn strength_audit_csv(reference: &ReferenceData) -> String {
    let mut out = String::from("grade_key,dia_min_in,dia_max_in,Sy_ksi,Su_ksi,missing\n");
    for &grade in &reference.bolt_grades.options {
        let ranges = reference.strength_ranges(grade);
        if ranges.is_empty() {
            out.push_str(&format!("{},,,,,NO_STRENGTH_DATA\n", grade.code()));
            continue;
        }
        for range in ranges {
            let mut missing = Vec::new();
            if !range.sy.is_known() {
                missing.push("Sy_placeholder");
            }
            if !range.su.is_known() {
                missing.push("Su_placeholder");
            }
            out.push_str(&format!(
                "{},{},{},{},{},{}\n",
                grade.code(),
                fmt_f64(range.dia_min_in),
                fmt_f64(range.dia_max_in),
                fmt_stress(range.sy),
                fmt_stress(range.su),
                missing.join(";"),
            ));
        }
    }
    out
}

/// Render the allowable-stress-at-temperature audit as CSV.
pub fn allowable_audit_csv(reference: &ReferenceData) -> String {
    let mut out =
        String::from("grade_key,dia_min_in,dia_max_in,temp_min_F,temp_max_F,S_ksi,missing\n");
    for &grade in &reference.bolt_grades.options {
        let ranges = reference.allowable_ranges(grade);
        if ranges.is_empty() {
            out.push_str(&format!("{},,,,,,NO_ALLOWABLE_DATA\n", grade.code()));
            continue;
        }
        for range in ranges {
            for entry in &range.temps {
                let missing = if entry.s.is_known() { "" } else { "S_placeholder" };
                out.push_str(&format!(
                    "{},{},{},{},{},{},{}\n",
                    grade.code(),
                    fmt_f64(range.dia_min_in),
                    fmt_f64(range.dia_max_in),
                    fmt_f64(entry.t_min_f),
                    fmt_f64(entry.t_max_f),
                    fmt_stress(entry.s),
                    missing,
                ));
            }
        }
    }
    out
}

/// Render the missing-data summary as text.
pub fn missing_data_report(reference: &ReferenceData) -> String {
    let options = &reference.bolt_grades.options;

    let missing_allowable: Vec<&str> = options
        .iter()
        .filter(|&&g| reference.allowable_ranges(g).is_empty())
        .map(|g| g.code())
        .collect();

    let missing_strength: Vec<&str> = options
        .iter()
        .filter(|&&g| reference.strength_ranges(g).is_empty())
        .map(|g| g.code())
        .collect();

    let placeholder_strength: Vec<&str> = options
        .iter()
        .filter(|&&g| {
            reference
                .strength_ranges(g)
                .iter()
                .any(|r| !r.sy.is_known() || !r.su.is_known())
        })
        .map(|g| g.code())
        .collect();

    let mut out = String::new();
    out.push_str("Missing Allowable Stress at Temperature (no entries):\n");
    out.push_str(&grade_list_line(&missing_allowable));
    out.push_str("Missing Strength Ranges (no entries):\n");
    out.push_str(&grade_list_line(&missing_strength));
    out.push_str("Strength Placeholders Present:\n");
    if placeholder_strength.is_empty() {
        out.push_str("None\n");
    } else {
        out.push_str(&placeholder_strength.join(", "));
        out.push('\n');
    }
    out
}

fn grade_list_line(grades: &[&str]) -> String {
    if grades.is_empty() {
        "None\n\n".to_string()
    } else {
        format!("{}\n\n", grades.join(", "))
    }
}

/// Render the nut grade options list as CSV.
pub fn nut_list_csv(reference: &ReferenceData) -> String {
    let mut out = String::from("nut_grade\n");
    for nut in &reference.nut_grades.options {
        out.push_str(nut.code());
        out.push('\n');
    }
    out
}

/// Render the recommended nut pairing per bolt grade as CSV.
pub fn nut_pairing_csv(reference: &ReferenceData) -> String {
    let mut out = String::from("bolt_grade,recommended_nuts,caution\n");
    for &grade in &reference.bolt_grades.options {
        let nuts: Vec<&str> = grade.recommended_nuts().iter().map(|n| n.code()).collect();
        let caution = if grade.is_stainless() {
            "STAINLESS_GALLING_USE_ANTISEIZE"
        } else {
            ""
        };
        out.push_str(&format!(
            "{},{},{}\n",
            grade.code(),
            csv_field(&nuts.join(";")),
            caution,
        ));
    }
    out
}

/// Format an optional number; absence renders as an empty field
fn fmt_opt(value: Option<f64>) -> String {
    value.map(fmt_f64).unwrap_or_default()
}

/// Format a stress cell; unresolved cells carry the marker string
fn fmt_stress(value: StressValue) -> String {
    match value {
        StressValue::Known(v) => fmt_f64(v),
        StressValue::Unresolved => PLACEHOLDER_MARKER.to_string(),
    }
}

fn fmt_f64(value: f64) -> String {
    format!("{value}")
}

/// Quote a CSV field if it contains separators or quotes
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torque::{compute_matrix, standard_scenarios};

    fn reference() -> &'static ReferenceData {
        ReferenceData::builtin()
    }

    #[test]
    fn test_torque_matrix_shape() {
        let rows = compute_matrix(&standard_scenarios(), reference()).unwrap();
        let csv = torque_matrix_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 21); // header + 20 scenarios
        assert!(lines[0].starts_with("scenario,grade,diameter_in"));
        assert!(lines[1].starts_with("1,A193_B7,1,8UN,8,0.606,600,"));

        // Every data row has the full column count even when degraded
        let columns = lines[0].split(',').count();
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), columns, "row: {line}");
        }
    }

    #[test]
    fn test_degraded_row_has_empty_fields() {
        let rows = compute_matrix(&standard_scenarios(), reference()).unwrap();
        let csv = torque_matrix_csv(&rows);
        let class_c_line = csv
            .lines()
            .find(|l| l.contains("A453_660_ClassC"))
            .unwrap();
        // Trailing torque columns are empty, not zero
        assert!(class_c_line.ends_with(",,,"));
    }

    #[test]
    fn test_strength_audit_flags_placeholders() {
        let csv = strength_audit_csv(reference());
        let class_d_line = csv
            .lines()
            .find(|l| l.starts_with("A453_660_ClassD"))
            .unwrap();
        assert!(class_d_line.contains(PLACEHOLDER_MARKER));
        assert!(class_d_line.ends_with("Sy_placeholder;Su_placeholder"));

        let b7_lines: Vec<&str> = csv
            .lines()
            .filter(|l| l.starts_with("A193_B7,"))
            .collect();
        assert_eq!(b7_lines.len(), 3);
        assert!(b7_lines.iter().all(|l| l.ends_with(',')));
    }

    #[test]
    fn test_allowable_audit_flags_missing_grades() {
        let csv = allowable_audit_csv(reference());
        assert!(csv.contains("A320_L7,,,,,,NO_ALLOWABLE_DATA"));
        assert!(csv.contains("A453_660_ClassA,,,,,,NO_ALLOWABLE_DATA"));
        // B8's unresolved 850 cell is annotated
        let unresolved_line = csv
            .lines()
            .find(|l| l.starts_with("A193_B8_Class1_304") && l.contains("850"))
            .unwrap();
        assert!(unresolved_line.ends_with("S_placeholder"));
    }

    #[test]
    fn test_missing_data_report_lists_grades() {
        let report = missing_data_report(reference());
        assert!(report.contains("Missing Allowable Stress at Temperature"));
        assert!(report.contains("A320_L7"));
        assert!(report.contains("A453_660_ClassC, A453_660_ClassD"));
        // Every grade has strength ranges, so that section is empty
        assert!(report.contains("Missing Strength Ranges (no entries):\nNone"));
    }

    #[test]
    fn test_nut_list() {
        let csv = nut_list_csv(reference());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "nut_grade");
        assert_eq!(lines.len(), 1 + reference().nut_grades.options.len());
        assert!(csv.contains("A194_2H\n"));
    }

    #[test]
    fn test_nut_pairing_caution() {
        let csv = nut_pairing_csv(reference());
        let b8_line = csv
            .lines()
            .find(|l| l.starts_with("A193_B8_Class1_304"))
            .unwrap();
        assert!(b8_line.contains("STAINLESS_GALLING_USE_ANTISEIZE"));
        let b7_line = csv.lines().find(|l| l.starts_with("A193_B7,")).unwrap();
        assert!(b7_line.ends_with(','));
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("Dry"), "Dry");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
