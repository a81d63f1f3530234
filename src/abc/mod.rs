//! Approximate Bayesian Computation by parallel rejection sampling.
//!
//! Each run draws an attrition law and a power-ratio distribution from the
//! prior, simulates every historical battle under that draw, and scores the
//! simulated casualties against the record. The best-scoring fraction of
//! all runs approximates the posterior.

mod best_k;
mod config;
mod distance;
mod prior;
mod progress;
mod sample;
mod sampler;
mod worker;

pub use best_k::BestKSet;
pub use config::{AbcConfig, PriorConfig};
pub use distance::distance;
pub use prior::PriorSampler;
pub use progress::{log_path, ProgressLog, PROGRESS_RESOLUTION};
pub use sample::{sample_pow_ratios, ParameterSample, SimulationResult};
pub use sampler::{
    merge_ranked, partition_runs, run_abc, runs_per_worker, worker_capacity,
    ParallelRejectionSampler,
};
pub use worker::RejectionWorker;
