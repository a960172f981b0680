//! Steane Demo Suite
//!
//! Terminal front-ends for the QEC control plane:
//!
//! - **demo-qec-cycle**: one encode, inject, decode, correct, verify cycle
//!   with every syndrome printed
//! - **demo-benchmark**: the noise sweep, power-law analysis and memory
//!   decay against the Pauli-frame simulator
//!
//! The formatting helpers here return strings so they can be tested
//! without a terminal.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use steane_bench::{ExperimentResult, MemoryCurve, PowerLawFit};
use steane_code::SyndromePair;
use tracing_subscriber::EnvFilter;

/// Install a `tracing` subscriber for `-v` counts; `RUST_LOG` wins if set.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Create a progress bar for sweep points.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(72)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(72)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(48)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print a failure message.
pub fn print_failure(message: &str) {
    println!("{} {}", style("✗").red().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Human label for a noise level.
pub fn scenario_name(noise_level: f64) -> &'static str {
    if noise_level <= 0.0 {
        "No noise"
    } else if noise_level <= 0.1 {
        "Low noise"
    } else if noise_level <= 0.4 {
        "Medium noise"
    } else {
        "High noise"
    }
}

/// Both syndromes in sign form, e.g. `X=(1, 1, 1) Z=(1, 1, -1)`.
pub fn format_syndromes(pair: &SyndromePair) -> String {
    let [xr, xg, xb] = pair.x.signs();
    let [zr, zg, zb] = pair.z.signs();
    format!("X=({xr}, {xg}, {xb}) Z=({zr}, {zg}, {zb})")
}

/// Fixed-width summary table, one row per sweep point.
pub fn format_summary_table(results: &[ExperimentResult]) -> String {
    let mut out = format!(
        "{:<14} {:>6} {:>10} {:>11} {:>8} {:>10} {:>10}\n",
        "Scenario", "p", "Baseline", "Postselect", "Waste", "Corrected", "Status"
    );
    out.push_str(&"-".repeat(75));
    out.push('\n');
    for r in results {
        out.push_str(&format!(
            "{:<14} {:>6.2} {:>10.4} {:>11.4} {:>8.4} {:>10.4} {:>10}\n",
            scenario_name(r.noise_level),
            r.noise_level,
            r.baseline_fidelity,
            r.postselected_fidelity,
            r.waste_fraction,
            r.corrected_fidelity,
            r.status.to_string(),
        ));
    }
    out
}

/// Fraction of completed trials per fault weight, one line per weight.
pub fn format_histogram(result: &ExperimentResult) -> Vec<String> {
    let total: usize = result.weight_histogram.iter().sum();
    result
        .weight_histogram
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(weight, &count)| {
            let frac = count as f64 / total as f64;
            let bar = "█".repeat((frac * 40.0).round() as usize);
            format!("{weight} faults: {frac:.3} {bar}")
        })
        .collect()
}

/// `a · N^b (R² = r)` or a note that the strategy could not be fitted.
pub fn format_fit(fit: Option<&PowerLawFit>) -> String {
    match fit {
        Some(f) => format!(
            "{:.4} · N^{:+.4}  (R² = {:.3}, {} points)",
            f.a, f.b, f.r_squared, f.points_used
        ),
        None => "not enough nonzero error rates to fit".to_string(),
    }
}

/// One line per round: `round  survival  bar`.
pub fn format_memory_curve(curve: &MemoryCurve) -> Vec<String> {
    curve
        .survival
        .iter()
        .enumerate()
        .map(|(k, s)| {
            let bar = "█".repeat((s * 40.0).round() as usize);
            format!("{:>5} {:>8.4} {bar}", k + 1, s)
        })
        .collect()
}
