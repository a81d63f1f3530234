//! Uniform priors over attrition law and power-ratio distribution.

use rand::Rng;

use super::config::PriorConfig;
use crate::attrition::AttritionLaw;
use crate::error::{AbcError, AbcResult};

/// Draws candidate parameters from the configured ranges.
#[derive(Debug, Clone)]
pub struct PriorSampler {
    config: PriorConfig,
}

impl PriorSampler {
    /// Build a sampler, rejecting empty or non-positive ranges.
    pub fn new(config: PriorConfig) -> AbcResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PriorConfig {
        &self.config
    }

    pub fn sample_model(&self, rng: &mut impl Rng) -> AbcResult<AttritionLaw> {
        let index = rng.gen_range(self.config.models.clone());
        AttritionLaw::from_index(index).ok_or(AbcError::InvalidConfig {
            field: "model",
            reason: format!("no attrition law with index {index}"),
        })
    }

    pub fn sample_mu_pow_ratio(&self, rng: &mut impl Rng) -> f64 {
        let (low, high) = self.config.mu;
        rng.gen_range(low..=high)
    }

    pub fn sample_sd_pow_ratio(&self, rng: &mut impl Rng) -> f64 {
        let (low, high) = self.config.sd;
        rng.gen_range(low..=high)
    }
}
