//! One rejection-sampling worker and its share of the run budget.

use rand::Rng;
use std::ops::Range;
use std::sync::Arc;
use tracing::debug;

use super::best_k::BestKSet;
use super::prior::PriorSampler;
use super::progress::ProgressLog;
use super::sample::{ParameterSample, SimulationResult};
use crate::battle::BattleSet;
use crate::error::AbcResult;

/// Samples, simulates and scores every run index in `runs`, keeping the
/// `capacity` best results.
pub struct RejectionWorker<R: Rng> {
    id: usize,
    runs: Range<usize>,
    capacity: usize,
    prior: PriorSampler,
    battles: Arc<BattleSet>,
    rng: R,
    progress: ProgressLog,
}

impl<R: Rng> RejectionWorker<R> {
    pub fn new(
        id: usize,
        runs: Range<usize>,
        capacity: usize,
        prior: PriorSampler,
        battles: Arc<BattleSet>,
        rng: R,
        progress: ProgressLog,
    ) -> Self {
        Self {
            id,
            runs,
            capacity,
            prior,
            battles,
            rng,
            progress,
        }
    }

    /// Run the whole block and return the retained results, best first.
    pub fn run(mut self) -> AbcResult<Vec<SimulationResult>> {
        debug!(
            worker = self.id,
            start = self.runs.start,
            end = self.runs.end,
            capacity = self.capacity,
            "worker starting"
        );

        let block_len = self.runs.len();
        let num_battles = self.battles.len();
        let mut best = BestKSet::new(self.capacity);

        for run_id in self.runs.clone() {
            let parameters = ParameterSample::draw(&self.prior, num_battles, &mut self.rng)?;
            let result = SimulationResult::evaluate(run_id, parameters, &self.battles)?;
            best.offer(result);

            if ProgressLog::is_due(run_id) {
                self.progress
                    .record(run_id - self.runs.start, block_len, best.worst())?;
            }
        }

        debug!(worker = self.id, retained = best.len(), "worker finished");
        Ok(best.into_sorted_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abc::config::PriorConfig;
    use crate::battle::Battle;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn battles() -> Arc<BattleSet> {
        Arc::new(BattleSet::new(vec![
            Battle::new(1805, 73_000, 9_000, 85_000, 36_000),
            Battle::new(1809, 1000, 200, 800, 100),
        ]))
    }

    fn worker(runs: Range<usize>, capacity: usize, seed: u64) -> RejectionWorker<ChaCha8Rng> {
        RejectionWorker::new(
            0,
            runs,
            capacity,
            PriorSampler::new(PriorConfig::default()).unwrap(),
            battles(),
            ChaCha8Rng::seed_from_u64(seed),
            ProgressLog::tracing_only(0),
        )
    }

    #[test]
    fn test_returns_at_most_capacity_sorted() {
        let results = worker(0..200, 20, 5).run().unwrap();
        assert_eq!(results.len(), 20);
        assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!(results.iter().all(|r| (0..200).contains(&r.run_id)));
    }

    #[test]
    fn test_short_block_returns_everything() {
        let results = worker(10..15, 20, 5).run().unwrap();
        assert_eq!(results.len(), 5);
    }

    #[test]
    fn test_empty_block_returns_nothing() {
        let results = worker(7..7, 3, 5).run().unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_same_seed_same_results() {
        let first = worker(0..100, 10, 77).run().unwrap();
        let second = worker(0..100, 10, 77).run().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_retained_are_best_of_all_draws() {
        let everything = worker(0..150, 150, 9).run().unwrap();
        let best = worker(0..150, 15, 9).run().unwrap();
        assert_eq!(best.as_slice(), &everything[..15]);
    }

    #[test]
    fn test_degenerate_battle_fails_the_worker() {
        let battles = Arc::new(BattleSet::new(vec![Battle::new(1809, 1000, 0, 800, 100)]));
        let worker = RejectionWorker::new(
            0,
            0..10,
            2,
            PriorSampler::new(PriorConfig::default()).unwrap(),
            battles,
            ChaCha8Rng::seed_from_u64(1),
            ProgressLog::tracing_only(0),
        );
        assert!(worker.run().is_err());
    }
}
