//! Candidate parameter draws and their scored simulations.

use rand::Rng;
use rand_distr::{Distribution, Gamma};
use serde::Serialize;
use std::fmt;

use super::distance::distance;
use super::prior::PriorSampler;
use crate::attrition::{simulate_all, AttritionLaw};
use crate::battle::BattleSet;
use crate::error::{AbcError, AbcResult};

/// One draw from the prior: a law plus per-battle power ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSample {
    pub law: AttritionLaw,
    pub mu_pow_ratio: f64,
    pub sd_pow_ratio: f64,
    /// One ratio per battle, Gamma-distributed with mean `mu` and sd `sd`.
    pub pow_ratios: Vec<f64>,
}

impl ParameterSample {
    /// Draw law, mean and spread from the prior, then one ratio per battle.
    pub fn draw(prior: &PriorSampler, num_battles: usize, rng: &mut impl Rng) -> AbcResult<Self> {
        let law = prior.sample_model(rng)?;
        let mu = prior.sample_mu_pow_ratio(rng);
        let sd = prior.sample_sd_pow_ratio(rng);
        Self::with_distribution(law, mu, sd, num_battles, rng)
    }

    /// Fixed law, mean and spread; only the per-battle ratios are random.
    pub fn with_distribution(
        law: AttritionLaw,
        mu_pow_ratio: f64,
        sd_pow_ratio: f64,
        num_battles: usize,
        rng: &mut impl Rng,
    ) -> AbcResult<Self> {
        let pow_ratios = sample_pow_ratios(mu_pow_ratio, sd_pow_ratio, num_battles, rng)?;
        Ok(Self {
            law,
            mu_pow_ratio,
            sd_pow_ratio,
            pow_ratios,
        })
    }
}

/// Draw `count` ratios from a Gamma with the given mean and standard deviation.
///
/// shape = (mu/sd)², scale = sd²/mu.
pub fn sample_pow_ratios(
    mu: f64,
    sd: f64,
    count: usize,
    rng: &mut impl Rng,
) -> AbcResult<Vec<f64>> {
    if !(mu > 0.0 && sd > 0.0) {
        return Err(AbcError::InvalidPrior {
            parameter: "powRatio gamma",
            low: mu,
            high: sd,
        });
    }
    let shape = (mu / sd).powi(2);
    let scale = sd * sd / mu;
    let gamma = Gamma::new(shape, scale).map_err(|e| AbcError::InvalidPrior {
        parameter: gamma_error_label(e),
        low: mu,
        high: sd,
    })?;
    Ok((0..count).map(|_| gamma.sample(&mut *rng)).collect())
}

fn gamma_error_label(error: rand_distr::GammaError) -> &'static str {
    match error {
        rand_distr::GammaError::ShapeTooSmall => "powRatio gamma shape",
        rand_distr::GammaError::ScaleTooSmall => "powRatio gamma scale",
        _ => "powRatio gamma",
    }
}

/// A parameter draw scored against the historical record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub run_id: usize,
    pub parameters: ParameterSample,
    /// Flattened like the historical casualties: `[Rc0, Bc0, ...]`.
    pub simulated_casualties: Vec<u32>,
    pub distance: f64,
}

impl SimulationResult {
    /// Simulate every battle under `parameters` and score the outcome.
    pub fn evaluate(
        run_id: usize,
        parameters: ParameterSample,
        battles: &BattleSet,
    ) -> AbcResult<Self> {
        let simulated_casualties =
            simulate_all(parameters.law, &parameters.pow_ratios, battles.battles())?;
        let distance = distance(&simulated_casualties, battles.historical())?;
        Ok(Self {
            run_id,
            parameters,
            simulated_casualties,
            distance,
        })
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run: {} with model: {} ({}) and gamma with mu and sd: {:.2}/{:.2} distance: {:.2}",
            self.run_id,
            self.parameters.law.index(),
            self.parameters.law,
            self.parameters.mu_pow_ratio,
            self.parameters.sd_pow_ratio,
            self.distance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abc::config::PriorConfig;
    use crate::battle::Battle;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_one_ratio_per_battle() {
        let prior = PriorSampler::new(PriorConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let sample = ParameterSample::draw(&prior, 17, &mut rng).unwrap();
        assert_eq!(sample.pow_ratios.len(), 17);
        assert!(sample.pow_ratios.iter().all(|&r| r >= 0.0));
    }

    #[test]
    fn test_gamma_moments_converge() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let (mu, sd) = (2.0, 0.5);
        let draws = sample_pow_ratios(mu, sd, 200_000, &mut rng).unwrap();
        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let variance = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        assert!((mean - mu).abs() < 0.01, "mean {mean}");
        assert!((variance - sd * sd).abs() < 0.01, "variance {variance}");
    }

    #[test]
    fn test_gamma_moments_wide_spread() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let (mu, sd) = (1.0, 2.0);
        let draws = sample_pow_ratios(mu, sd, 400_000, &mut rng).unwrap();
        let n = draws.len() as f64;
        let mean = draws.iter().sum::<f64>() / n;
        let variance = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        assert!((mean - mu).abs() < 0.03, "mean {mean}");
        assert!((variance - sd * sd).abs() < 0.3, "variance {variance}");
    }

    #[test]
    fn test_rejects_non_positive_moments() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(sample_pow_ratios(0.0, 1.0, 3, &mut rng).is_err());
        assert!(sample_pow_ratios(1.0, -1.0, 3, &mut rng).is_err());
    }

    #[test]
    fn test_evaluate_exact_match_has_zero_distance() {
        let battles = BattleSet::new(vec![Battle::new(1809, 1000, 100, 800, 120)]);
        let parameters = ParameterSample {
            law: AttritionLaw::Logarithmic,
            mu_pow_ratio: 1.5,
            sd_pow_ratio: 0.1,
            pow_ratios: vec![1.5],
        };
        let result = SimulationResult::evaluate(0, parameters, &battles).unwrap();
        assert_eq!(result.simulated_casualties, vec![100, 120]);
        assert_eq!(result.distance, 0.0);
    }

    #[test]
    fn test_display_mentions_law_and_distance() {
        let result = SimulationResult {
            run_id: 12,
            parameters: ParameterSample {
                law: AttritionLaw::Squared,
                mu_pow_ratio: 1.234,
                sd_pow_ratio: 0.5,
                pow_ratios: vec![],
            },
            simulated_casualties: vec![],
            distance: 0.456,
        };
        assert_eq!(
            result.to_string(),
            "run: 12 with model: 1 (squared) and gamma with mu and sd: 1.23/0.50 distance: 0.46"
        );
    }
}
