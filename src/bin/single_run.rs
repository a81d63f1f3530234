//! Single-run demonstration.
//!
//! Draws one set of per-battle power ratios for a fixed attrition law and
//! Gamma mean/spread, simulates every battle and reports the mean distance
//! per battle. Without `--model` it runs the time-decay and logarithmic laws
//! back to back.
//!
//! Usage:
//!   cargo run --bin single_run -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin single_run                           # demonstration pair
//!   cargo run --bin single_run -- -m 1 --mu 1.5 -v       # squared law, full trace

use clap::Parser;
use lanchester_abc::abc::{distance, ParameterSample};
use lanchester_abc::attrition::{simulate_traced, AttritionTrace};
use lanchester_abc::{load_battles, AbcError, AbcResult, AttritionLaw, Battle, BattleSet};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Simulate every battle once under a fixed attrition law.
#[derive(Parser, Debug)]
#[command(name = "single_run", version, about, long_about = None)]
struct Args {
    /// CSV file with battles (`year;R0;Rc;B0;Bc`, one header line)
    #[arg(short = 'i', long, default_value = "data/01.csv")]
    input: PathBuf,

    /// Attrition law index (0 linear, 1 squared, 2 logarithmic, 3 time decay)
    #[arg(short = 'm', long)]
    model: Option<u8>,

    /// Mean of the power-ratio Gamma distribution
    #[arg(long, default_value_t = 2.0)]
    mu: f64,

    /// Standard deviation of the power-ratio Gamma distribution
    #[arg(long, default_value_t = 1.0)]
    sd: f64,

    /// RNG seed
    #[arg(short = 's', long, default_value_t = 42)]
    seed: u64,

    /// Print every simulated step
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,lanchester_abc=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> AbcResult<()> {
    let battles = load_battles(&args.input)?;
    battles.validate()?;

    let laws = match args.model {
        Some(index) => vec![AttritionLaw::from_index(index).ok_or(AbcError::InvalidConfig {
            field: "model",
            reason: format!("no attrition law with index {index}"),
        })?],
        None => vec![AttritionLaw::TimeDecay, AttritionLaw::Logarithmic],
    };

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for law in laws {
        let sample =
            ParameterSample::with_distribution(law, args.mu, args.sd, battles.len(), &mut rng)?;
        let simulated = run_sample(&sample, &battles, args.verbose)?;
        let total = distance(&simulated, battles.historical())?;
        println!("{} law, mu {:.2}, sd {:.2}", law, args.mu, args.sd);
        println!("dist: {:.2}", total / battles.len() as f64);
    }
    Ok(())
}

fn run_sample(
    sample: &ParameterSample,
    battles: &BattleSet,
    verbose: bool,
) -> AbcResult<Vec<u32>> {
    let mut simulated = Vec::with_capacity(battles.len() * 2);
    let ratios = &sample.pow_ratios;
    for (index, (battle, &ratio)) in battles.battles().iter().zip(ratios).enumerate() {
        let trace = simulate_traced(sample.law, ratio, battle, index)?;
        if verbose {
            print_trace(battle, &trace);
        }
        simulated.push(trace.casualties.red);
        simulated.push(trace.casualties.blue);
    }
    Ok(simulated)
}

fn print_trace(battle: &Battle, trace: &AttritionTrace) {
    println!(
        "{} for battle: {} ratio: {:.4}:1, step factor: {:.6}",
        trace.law, battle, trace.pow_ratio, trace.step_factor
    );
    for step in trace.steps.iter().skip(1) {
        println!(
            "\tstep:{} R/Rc: {}/{} B/Bc: {}/{}",
            step.step,
            step.red,
            battle.red_initial - step.red,
            step.blue,
            battle.blue_initial - step.blue
        );
    }
    let miss = trace.casualties.red.abs_diff(battle.red_casualties)
        + trace.casualties.blue.abs_diff(battle.blue_casualties);
    println!("distance to historical: {}", miss);
}
