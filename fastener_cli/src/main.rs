//! # Fastref CLI
//!
//! Terminal front end for one-off bolt torque checks against the
//! built-in reference dataset. Prompts for the scenario, prints the
//! resolved stress basis and the three-pass torque sequence, and echoes
//! the row as JSON for piping into other tooling.

use std::io::{self, BufRead, Write};

use fastener_core::fasteners::{parse_diameter, BoltGrade, ThreadSeries};
use fastener_core::reference::ReferenceData;
use fastener_core::torque::{compute, Scenario};

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn prompt_str(prompt: &str, default: &str) -> String {
    match prompt_line(prompt) {
        Some(s) if !s.is_empty() => s,
        _ => default.to_string(),
    }
}

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn main() {
    println!("Fastref CLI - Bolt Torque Calculator");
    println!("====================================");
    println!();

    let reference = ReferenceData::builtin();

    let grade_input = prompt_str("Bolt grade [A193_B7]: ", "A193_B7");
    let grade = match BoltGrade::from_str_flexible(&grade_input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    let dia_token = prompt_str("Nominal diameter [1]: ", "1");
    let diameter = match parse_diameter(&dia_token) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    let default_series = ThreadSeries::default_for(diameter);
    let series_input = prompt_str(
        &format!("Thread series [{}]: ", default_series.code()),
        default_series.code(),
    );
    let series = match ThreadSeries::from_str_flexible(&series_input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    let temp_f = prompt_f64("Operating temperature (F) [600]: ", 600.0);
    let pct = prompt_f64("Target fraction of yield [0.50]: ", 0.50);
    let lube = prompt_str("Lubricant [Dry]: ", "Dry");
    let k = prompt_f64("Nut factor K [0.27]: ", 0.27);

    let scenario = Scenario::new(grade, dia_token, series)
        .with_temperature(temp_f)
        .with_target_pct(pct)
        .with_lubricant(lube, k);

    match compute(&scenario, reference) {
        Ok(row) => {
            println!();
            println!("═══════════════════════════════════════");
            println!("  BOLT TORQUE RESULTS");
            println!("═══════════════════════════════════════");
            println!();
            println!("Input:");
            println!("  Grade:    {}", row.grade);
            println!("  Diameter: {} in ({})", row.dia_token, row.series);
            println!("  Temp:     {:.0} F", row.working_temp_f);
            println!("  Target:   {:.0}% of stress basis", row.pct * 100.0);
            println!("  Lube:     {} (K = {:.2})", row.lube, row.k);
            println!();
            println!("Resolved:");
            println!("  TPI:          {}", fmt_opt(row.tpi, 1));
            println!("  Stress area:  {} in2", fmt_opt(row.as_in2, 3));
            match row.used_temp_f {
                Some(used) => println!(
                    "  Basis:        {} ksi allowable at {:.0} F",
                    fmt_opt(row.sy_or_allowable_ksi, 1),
                    used
                ),
                None => println!(
                    "  Basis:        {} ksi (room-temperature yield)",
                    fmt_opt(row.sy_or_allowable_ksi, 1)
                ),
            }
            println!();
            match (row.bolt_load_lbf, row.target_torque_ftlb) {
                (Some(load), Some(torque)) => {
                    println!("Result:");
                    println!("  Bolt load:  {:.0} lbf", load);
                    println!("  Target:     {:.1} ft-lb", torque);
                    println!("  Pass 1:     {:.1} ft-lb (30%)", row.pass1_ftlb.unwrap_or(0.0));
                    println!("  Pass 2:     {:.1} ft-lb (60%)", row.pass2_ftlb.unwrap_or(0.0));
                    println!("  Pass 3:     {:.1} ft-lb (100%)", row.pass3_ftlb.unwrap_or(0.0));
                }
                _ => {
                    println!("Result: no torque computed (missing reference data)");
                }
            }
            if row.grade.is_stainless() {
                println!();
                println!("Note: stainless bolting galls; use anti-seize and verify K.");
            }
            println!();
            println!("═══════════════════════════════════════");

            println!();
            println!("JSON Output (for tooling):");
            if let Ok(json) = serde_json::to_string_pretty(&row) {
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "-".to_string(),
    }
}
