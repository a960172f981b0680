//! Single QEC Cycle Demo
//!
//! Walks one encode, baseline, inject, decode, correct, verify cycle on the
//! Pauli-frame simulator and prints the syndrome at every step.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use steane_adapter_sim::{SimulatorBackend, SimulatorConfig};
use steane_code::{ColorCode, ErrorEvent, LogicalState, Pauli};
use steane_demos::{
    format_syndromes, init_tracing, print_failure, print_header, print_info, print_result,
    print_section, print_success,
};
use steane_pipeline::QecPipeline;

#[derive(Parser, Debug)]
#[command(name = "demo-qec-cycle")]
#[command(about = "Walk through one error-correction cycle of the Steane code")]
struct Args {
    /// Initial logical state (|0>, |1>, |+>, |->)
    #[arg(short, long, default_value = "|0>")]
    state: String,

    /// Qubit to corrupt (0-6)
    #[arg(short, long, default_value = "4")]
    qubit: usize,

    /// Pauli to inject (X, Y or Z)
    #[arg(short, long, default_value = "Y")]
    pauli: String,

    /// Skip fault injection
    #[arg(long)]
    no_fault: bool,

    /// Simulator seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let state: LogicalState = args.state.parse().context("invalid --state")?;
    let fault = if args.no_fault {
        None
    } else {
        let pauli: Pauli = args.pauli.parse().context("invalid --pauli")?;
        Some(ErrorEvent::new(args.qubit, pauli)?)
    };

    print_header("Steane [[7,1,3]] Error-Correction Cycle");

    let code = Arc::new(ColorCode::steane()?);
    let backend = Arc::new(SimulatorBackend::with_code(
        SimulatorConfig {
            seed: Some(args.seed),
            ..SimulatorConfig::default()
        },
        code.clone(),
    ));
    let mut pipeline = QecPipeline::new(backend.clone(), code);

    print_section("1. Encode");
    let angles = state.angles();
    let handle = pipeline.encode(angles.theta, angles.phi).await?;
    print_result("Logical state", state);
    print_result("Angles", angles);
    print_result("Handle", handle);

    print_section("2. Baseline syndrome");
    let baseline = pipeline.measure_baseline().await?;
    print_result("Syndromes", format_syndromes(&baseline));

    print_section("3. Inject fault");
    pipeline.inject(fault).await?;
    match fault {
        Some(event) => print_result("Injected", event),
        None => print_result("Injected", "nothing"),
    }

    print_section("4. Post-error syndrome");
    let (dx, dz) = pipeline.measure_post_error().await?;
    print_result("Delta X", dx);
    print_result("Delta Z", dz);

    print_section("5. Decode");
    let decoded = pipeline.decode()?;
    print_result("Decoder", decoded);

    print_section("6. Correct");
    let action = pipeline.correct().await?;
    print_result("Action", action);

    print_section("7. Verify");
    let outcome = pipeline.verify().await?;
    print_result("After error", format_syndromes(&outcome.post_error_syndrome));
    print_result(
        "After correction",
        format_syndromes(&outcome.post_correction_syndrome),
    );
    let frame = backend.residual_frame(&handle)?;
    print_result("Residual frame weight", frame.weight());

    println!();
    if outcome.success {
        print_success("Syndrome restored to baseline");
    } else {
        print_failure("Syndrome differs from baseline");
    }
    if !frame.is_identity() {
        print_info("The block still carries a residual Pauli the syndrome cannot see.");
    }

    pipeline.release().await?;
    Ok(())
}
