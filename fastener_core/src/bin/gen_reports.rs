//! Generate the reference dataset artifact and audit reports.
//!
//! Writes `fastener_reference.json` plus the CSV/text audit reports to
//! the `reports/` directory, all derived from the built-in curated
//! dataset.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-reports
//! cargo run --bin gen-reports -- --merge Bolt_B1_clean.csv
//! ```
//!
//! With `--merge`, the strength CSV is folded into the dataset before
//! anything is generated.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use fastener_core::dataset::{save_dataset, Dataset, FileLock};
use fastener_core::ingest::merge_strength_csv;
use fastener_core::reference::ReferenceData;
use fastener_core::reports::{
    allowable_audit_csv, missing_data_report, nut_list_csv, nut_pairing_csv, strength_audit_csv,
    torque_matrix_csv,
};
use fastener_core::torque::{compute_matrix, standard_scenarios};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let merge_path = parse_args()?;

    let mut reference = ReferenceData::builtin().clone();
    if let Some(path) = &merge_path {
        let report = merge_strength_csv(&mut reference, path)?;
        println!(
            "Merged {} rows from {} ({} grades updated)",
            report.rows_merged,
            path.display(),
            report.grades_updated.len()
        );
    }

    // Dataset artifact, lock-guarded: other report tooling may share it
    let dataset_path = Path::new("fastener_reference.json");
    let lock = FileLock::acquire(dataset_path, "gen-reports")?;
    save_dataset(&Dataset::new(reference.clone()), dataset_path)?;
    drop(lock);
    println!("Wrote: {}", dataset_path.display());

    let out_dir = Path::new("reports");
    fs::create_dir_all(out_dir)?;

    let rows = compute_matrix(&standard_scenarios(), &reference)?;
    write_report(out_dir, "Torque_Matrix.csv", &torque_matrix_csv(&rows))?;
    write_report(
        out_dir,
        "Bolt_Strength_RoomTemp.csv",
        &strength_audit_csv(&reference),
    )?;
    write_report(
        out_dir,
        "Bolt_AllowableStress_Temp.csv",
        &allowable_audit_csv(&reference),
    )?;
    write_report(
        out_dir,
        "Bolt_Missing_Data.txt",
        &missing_data_report(&reference),
    )?;
    write_report(out_dir, "Nut_Grades_List.csv", &nut_list_csv(&reference))?;
    write_report(out_dir, "Nut_Pairing.csv", &nut_pairing_csv(&reference))?;

    Ok(())
}

fn parse_args() -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => Ok(None),
        [flag, path] if flag == "--merge" => Ok(Some(PathBuf::from(path))),
        _ => Err("usage: gen-reports [--merge <strength.csv>]".into()),
    }
}

fn write_report(dir: &Path, name: &str, contents: &str) -> std::io::Result<()> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    println!("Wrote: {} ({} bytes)", path.display(), contents.len());
    Ok(())
}
