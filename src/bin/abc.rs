//! Attrition-law estimation CLI.
//!
//! Usage:
//!   cargo run --release --bin abc -- [OPTIONS]
//!
//! Examples:
//!   cargo run --release --bin abc                         # 1000 runs, tolerance 0.1
//!   cargo run --release --bin abc -- -r 100000 -t 0.01    # larger posterior sample
//!   cargo run --release --bin abc -- --seed 42 --json     # reproducible, with JSON summary

use clap::Parser;
use lanchester_abc::abc::{runs_per_worker, worker_capacity};
use lanchester_abc::build_info::version_line;
use lanchester_abc::report::{write_ranked_table, PosteriorSummary};
use lanchester_abc::{
    load_battles, AbcConfig, AbcError, AbcResult, ParallelRejectionSampler, PriorConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Estimate which attrition law and power-ratio distribution best reproduce
/// historical battle casualties.
#[derive(Parser, Debug)]
#[command(name = "abc", version, about, long_about = None)]
struct Args {
    /// CSV file with battles (`year;R0;Rc;B0;Bc`, one header line)
    #[arg(short = 'i', long, default_value = "data/01.csv")]
    input: PathBuf,

    /// Output stem; the ranked table is written to `<output>.csv`
    #[arg(short = 'o', long, default_value = "output")]
    output: String,

    /// Total number of runs
    #[arg(short = 'r', long, default_value_t = 1000)]
    runs: usize,

    /// Fraction of runs retained, in (0, 1]
    #[arg(short = 't', long, default_value_t = 0.1)]
    tolerance: f64,

    /// Worker threads. Defaults to available parallelism.
    #[arg(short = 'w', long)]
    workers: Option<usize>,

    /// Random seed for reproducible results. When omitted, a random seed is used.
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Directory for per-worker progress logs (`log_<n>`)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Also write a JSON posterior summary to `<output>.json`
    #[arg(long)]
    json: bool,

    /// Lowest attrition law index (0 linear, 1 squared, 2 logarithmic, 3 time decay)
    #[arg(long, default_value_t = 0)]
    model_min: u8,

    /// Highest attrition law index
    #[arg(long, default_value_t = 3)]
    model_max: u8,

    /// Lower bound of the power-ratio mean prior
    #[arg(long, default_value_t = 0.1)]
    mu_min: f64,

    /// Upper bound of the power-ratio mean prior
    #[arg(long, default_value_t = 5.0)]
    mu_max: f64,

    /// Lower bound of the power-ratio standard deviation prior
    #[arg(long, default_value_t = 0.1)]
    sd_min: f64,

    /// Upper bound of the power-ratio standard deviation prior
    #[arg(long, default_value_t = 5.0)]
    sd_max: f64,
}

impl Args {
    fn to_config(&self) -> AbcConfig {
        AbcConfig {
            num_runs: self.runs,
            tolerance: self.tolerance,
            workers: self.workers,
            seed: self.seed,
            prior: PriorConfig {
                models: self.model_min..=self.model_max,
                mu: (self.mu_min, self.mu_max),
                sd: (self.sd_min, self.sd_max),
            },
            log_dir: self.log_dir.clone(),
        }
    }
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
    let config = args.to_config();
    let table_path = PathBuf::from(format!("{}.csv", args.output));

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              LANCHESTER ABC ESTIMATOR                         ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!("{}", version_line());
    println!();

    let battles = load_battles(&args.input)?;
    let workers = config.resolved_workers();
    let per_worker = runs_per_worker(config.num_runs, workers);

    println!("Configuration:");
    println!("  Dataset:        {} ({} battles)", args.input.display(), battles.len());
    println!("  Runs:           {}", config.num_runs);
    println!("  Tolerance:      {}", config.tolerance);
    println!("  Selecting:      {}", config.selected_runs());
    println!("  Workers:        {}", workers);
    println!("  Runs/worker:    {}", per_worker);
    println!("  Best/worker:    {}", worker_capacity(per_worker, config.tolerance));
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!("  Output:         {}", table_path.display());
    println!();
    println!("Running rejection sampling...");
    println!();

    let sampler = ParallelRejectionSampler::new(config, battles)?;
    let ranked = sampler.run()?;
    write_ranked_table(&table_path, &ranked)?;

    let config = sampler.config();
    let summary = PosteriorSummary::from_ranked(&ranked, config.num_runs, config.tolerance);
    println!("{}", summary.to_text());

    if args.json {
        let json_path = PathBuf::from(format!("{}.json", args.output));
        let json = summary.to_json().map_err(|e| {
            AbcError::io(&json_path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        std::fs::write(&json_path, json).map_err(|e| AbcError::io(&json_path, e))?;
        println!("JSON summary saved to: {}", json_path.display());
    }

    println!("Ranked table saved to: {}", table_path.display());
    Ok(())
}
