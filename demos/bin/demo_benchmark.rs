//! QEC Benchmark Demo
//!
//! Runs the noise sweep, the shot-count power-law analysis and the memory
//! experiment on the Pauli-frame simulator.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;

use steane_adapter_sim::{SimulatorBackend, SimulatorConfig};
use steane_bench::{
    BenchmarkReport, ExperimentConfig, ExperimentDriver, FaultProfile, MultiRoundMemory,
};
use steane_code::ColorCode;
use steane_demos::{
    create_progress_bar, format_fit, format_histogram, format_memory_curve, format_summary_table,
    init_tracing, print_header, print_info, print_result, print_section, print_success,
    scenario_name,
};
use steane_hal::QecBackend;

#[derive(Parser, Debug)]
#[command(name = "demo-benchmark")]
#[command(about = "Benchmark baseline, postselection and active correction under noise")]
struct Args {
    /// YAML experiment configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trials per noise level (overrides the configuration)
    #[arg(short, long)]
    shots: Option<usize>,

    /// Master seed (overrides the configuration)
    #[arg(long)]
    seed: Option<u64>,

    /// Sample at most one fault per trial
    #[arg(long)]
    single_qubit: bool,

    /// Skip the shot-count power-law sweep
    #[arg(long)]
    skip_power_law: bool,

    /// Skip the multi-round memory experiment
    #[arg(long)]
    skip_memory: bool,

    /// Write the JSON report here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = ExperimentConfig::load(args.config.as_deref())?;
    if let Some(shots) = args.shots {
        config.sweep.shots_per_level = shots;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.single_qubit {
        config.faults = FaultProfile::single_qubit();
    }
    config.validate()?;

    let start = Instant::now();
    let code = Arc::new(ColorCode::steane()?);
    let backend = Arc::new(SimulatorBackend::with_code(
        SimulatorConfig::default(),
        code.clone(),
    ));
    let driver = ExperimentDriver::from_config(backend.clone(), code.clone(), &config)?;

    print_header("Steane [[7,1,3]] QEC Benchmark");
    print_result("Backend", backend.name());
    print_result("Initial state", config.angles()?);
    print_result("Fault profile", format!("{:?}", config.faults.kind));
    print_result("Seed", config.seed);

    print_section("Noise sweep");
    let levels = &config.sweep.noise_levels;
    let pb = create_progress_bar(levels.len() as u64, "noise levels");
    let mut results = Vec::with_capacity(levels.len());
    for &p in levels {
        pb.set_message(format!("p = {p}"));
        let mut point = driver
            .run(&[p], config.sweep.shots_per_level, config.seed)
            .await?;
        results.append(&mut point);
        pb.inc(1);
    }
    pb.finish_and_clear();

    for r in &results {
        print_section(&format!("{} (p = {})", scenario_name(r.noise_level), r.noise_level));
        print_result("Baseline fidelity", format!("{:.4}", r.baseline_fidelity));
        print_result("Postselected fidelity", format!("{:.4}", r.postselected_fidelity));
        print_result("Postselection waste", format!("{:.4}", r.waste_fraction));
        print_result("Corrected fidelity", format!("{:.4}", r.corrected_fidelity));
        if r.aborted_trials > 0 {
            print_result("Aborted trials", r.aborted_trials);
        }
        println!("  Injected faults per shot:");
        for line in format_histogram(r) {
            println!("    {line}");
        }
    }

    print_section("Summary");
    println!("{}", format_summary_table(&results));

    let mut report = BenchmarkReport::new(backend.name(), config.clone(), results);

    if !args.skip_power_law {
        let noise = config.power_law.noise_level;
        print_section(&format!("Power-law scaling (p = {noise})"));
        let sweep = driver
            .run_shot_sweep(noise, &config.power_law.shot_counts, config.seed)
            .await?;
        for r in &sweep.points {
            println!(
                "  N = {:>4}  baseline {:.4}  postselect {:.4}  corrected {:.4}",
                r.shots, r.baseline_fidelity, r.postselected_fidelity, r.corrected_fidelity
            );
        }
        println!();
        print_result("Baseline error", format_fit(sweep.baseline.as_ref()));
        print_result("Postselected error", format_fit(sweep.postselected.as_ref()));
        print_result("Corrected error", format_fit(sweep.corrected.as_ref()));
        report = report.with_shot_sweep(sweep);
    }

    if !args.skip_memory {
        let memory = &config.memory;
        print_section(&format!(
            "Memory decay ({} rounds, p = {})",
            memory.rounds, memory.noise_level
        ));
        let curve = MultiRoundMemory::from_config(backend.clone(), code, &config)
            .run_curve(config.angles()?, memory.rounds, memory.noise_level, memory.shots)
            .await?;
        println!("  round survival");
        for line in format_memory_curve(&curve) {
            println!("  {line}");
        }
        if curve.aborted_trajectories > 0 {
            print_result("Aborted trajectories", curve.aborted_trajectories);
        }
        report = report.with_memory(curve);
    }

    if let Some(path) = &args.output {
        report.write_json(path)?;
        tracing::info!(path = %path.display(), "report written");
        print_info(&format!("Report written to {}", path.display()));
    }

    println!();
    print_success(&format!("Benchmark complete in {:.2?}", start.elapsed()));
    Ok(())
}
