//! Partitioned parallel rejection sampling.
//!
//! The run budget is split into contiguous blocks, one per worker thread.
//! Workers share the battle set read-only, draw from distinct ChaCha streams
//! of a common seed, and report back over a completion channel that carries
//! either their retained results or their error. The orchestrator blocks
//! once for all of them, then merges and globally re-sorts.

use crossbeam_channel::bounded;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

use super::config::AbcConfig;
use super::prior::PriorSampler;
use super::progress::ProgressLog;
use super::sample::SimulationResult;
use super::worker::RejectionWorker;
use crate::battle::BattleSet;
use crate::error::{AbcError, AbcResult};

/// Split `num_runs` into `workers` contiguous blocks covering `0..num_runs`.
///
/// Every block but the last has `ceil(num_runs / workers)` runs (fewer if
/// the budget runs out); the last takes whatever remains.
pub fn partition_runs(num_runs: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let per_worker = runs_per_worker(num_runs, workers);
    (0..workers)
        .map(|idx| {
            let start = (idx * per_worker).min(num_runs);
            let end = if idx + 1 == workers {
                num_runs
            } else {
                ((idx + 1) * per_worker).min(num_runs)
            };
            start..end
        })
        .collect()
}

/// `ceil(num_runs / workers)`.
pub fn runs_per_worker(num_runs: usize, workers: usize) -> usize {
    num_runs.div_ceil(workers.max(1))
}

/// Per-worker retention `ceil(runs_per_worker × tolerance)`.
pub fn worker_capacity(runs_per_worker: usize, tolerance: f64) -> usize {
    (runs_per_worker as f64 * tolerance).ceil() as usize
}

/// Concatenate per-worker tables in worker order and stable-sort by
/// distance, so ties keep first-observed order.
pub fn merge_ranked(tables: Vec<Vec<SimulationResult>>) -> Vec<SimulationResult> {
    let mut merged: Vec<SimulationResult> = tables.into_iter().flatten().collect();
    merged.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    merged
}

/// Runs ABC rejection sampling over a battle set.
pub struct ParallelRejectionSampler {
    config: AbcConfig,
    prior: PriorSampler,
    battles: Arc<BattleSet>,
}

impl ParallelRejectionSampler {
    /// Validate configuration and data before anything is launched.
    pub fn new(config: AbcConfig, battles: BattleSet) -> AbcResult<Self> {
        config.validate()?;
        battles.validate()?;
        let prior = PriorSampler::new(config.prior.clone())?;
        Ok(Self {
            config,
            prior,
            battles: Arc::new(battles),
        })
    }

    pub fn config(&self) -> &AbcConfig {
        &self.config
    }

    /// Run every worker to completion and return the globally ranked table.
    pub fn run(&self) -> AbcResult<Vec<SimulationResult>> {
        let workers = self.config.resolved_workers();
        let blocks = partition_runs(self.config.num_runs, workers);
        let per_worker = runs_per_worker(self.config.num_runs, workers);
        let capacity = worker_capacity(per_worker, self.config.tolerance);
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen());

        info!(
            runs = self.config.num_runs,
            tolerance = self.config.tolerance,
            workers,
            runs_per_worker = per_worker,
            capacity_per_worker = capacity,
            seed,
            "starting rejection sampling"
        );

        if let Some(dir) = &self.config.log_dir {
            std::fs::create_dir_all(dir).map_err(|e| AbcError::io(dir, e))?;
        }

        let mut jobs = Vec::with_capacity(workers);
        for (idx, runs) in blocks.into_iter().enumerate() {
            let progress = match &self.config.log_dir {
                Some(dir) => ProgressLog::create(dir, idx)?,
                None => ProgressLog::tracing_only(idx),
            };
            info!(worker = idx, start = runs.start, end = runs.end, "starting worker");
            let worker = RejectionWorker::new(
                idx,
                runs,
                capacity,
                self.prior.clone(),
                Arc::clone(&self.battles),
                worker_rng(seed, idx),
                progress,
            );
            jobs.push(move || worker.run());
        }

        let tables = execute(jobs)?;
        let merged = merge_ranked(tables);
        info!(
            retained = merged.len(),
            best = merged.first().map(|r| r.distance),
            "rejection sampling finished"
        );
        Ok(merged)
    }
}

/// Validate, run and rank in one call.
pub fn run_abc(config: AbcConfig, battles: BattleSet) -> AbcResult<Vec<SimulationResult>> {
    ParallelRejectionSampler::new(config, battles)?.run()
}

type WorkerOutcome = AbcResult<Vec<SimulationResult>>;

/// Run each job on its own named thread and return their tables in job order.
///
/// Every job reports exactly once over the completion channel, a panic
/// included. The first error ends collection, but the call still joins
/// every spawned thread before returning it, so no worker outlives the run.
fn execute<J>(jobs: Vec<J>) -> AbcResult<Vec<Vec<SimulationResult>>>
where
    J: FnOnce() -> WorkerOutcome + Send + 'static,
{
    let workers = jobs.len();
    // Capacity for every report, so senders never block once collection stops.
    let (tx, rx) = bounded::<(usize, WorkerOutcome)>(workers.max(1));
    let mut handles = Vec::with_capacity(workers);
    let mut failure = None;

    for (idx, job) in jobs.into_iter().enumerate() {
        let tx = tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("abc-worker-{idx}"))
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|payload| {
                    Err(AbcError::WorkerFailed {
                        worker: idx,
                        reason: panic_message(payload.as_ref()),
                    })
                });
                let _ = tx.send((idx, outcome));
            });
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                failure = Some(AbcError::WorkerFailed {
                    worker: idx,
                    reason: format!("failed to spawn: {e}"),
                });
                break;
            }
        }
    }
    drop(tx);

    let mut tables: Vec<Option<Vec<SimulationResult>>> = vec![None; workers];
    if failure.is_none() {
        for _ in 0..workers {
            match rx.recv() {
                Ok((idx, Ok(results))) => tables[idx] = Some(results),
                Ok((idx, Err(e))) => {
                    warn!(worker = idx, error = %e, "worker failed, aborting run");
                    failure = Some(e);
                    break;
                }
                Err(_) => {
                    let missing = tables.iter().position(Option::is_none).unwrap_or(0);
                    failure = Some(AbcError::WorkerFailed {
                        worker: missing,
                        reason: "completion channel closed before reporting".to_string(),
                    });
                    break;
                }
            }
        }
    }

    for handle in handles {
        let _ = handle.join();
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(tables.into_iter().flatten().collect()),
    }
}

/// Independent stream `worker` of the shared seed.
fn worker_rng(seed: u64, worker: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(worker as u64);
    rng
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
