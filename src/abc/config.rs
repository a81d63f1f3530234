//! Estimation run configuration.

use std::num::NonZeroUsize;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use crate::error::{AbcError, AbcResult};

/// Ranges the prior draws from.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorConfig {
    /// Inclusive model index bounds (0 = linear ... 3 = time decay).
    pub models: RangeInclusive<u8>,
    /// Uniform bounds for the Gamma mean of the power ratio.
    pub mu: (f64, f64),
    /// Uniform bounds for the Gamma standard deviation of the power ratio.
    pub sd: (f64, f64),
}

impl Default for PriorConfig {
    fn default() -> Self {
        Self {
            models: 0..=3,
            mu: (0.1, 5.0),
            sd: (0.1, 5.0),
        }
    }
}

impl PriorConfig {
    pub fn validate(&self) -> AbcResult<()> {
        let (low, high) = (*self.models.start(), *self.models.end());
        if low > high || high > 3 {
            return Err(AbcError::InvalidPrior {
                parameter: "model",
                low: low as f64,
                high: high as f64,
            });
        }
        check_positive_range("muPowRatio", self.mu)?;
        check_positive_range("sdPowRatio", self.sd)
    }
}

fn check_positive_range(parameter: &'static str, (low, high): (f64, f64)) -> AbcResult<()> {
    if !(low > 0.0 && high >= low && high.is_finite()) {
        return Err(AbcError::InvalidPrior {
            parameter,
            low,
            high,
        });
    }
    Ok(())
}

/// Configuration for one estimation run.
#[derive(Debug, Clone)]
pub struct AbcConfig {
    /// Total run budget across all workers
    pub num_runs: usize,

    /// Fraction of runs retained, in (0, 1]
    pub tolerance: f64,

    /// Worker count (None = available parallelism)
    pub workers: Option<usize>,

    /// Base seed; worker `w` draws from stream `w` (None = entropy)
    pub seed: Option<u64>,

    pub prior: PriorConfig,

    /// Directory for per-worker progress logs (None = tracing only)
    pub log_dir: Option<PathBuf>,
}

impl Default for AbcConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            tolerance: 0.1,
            workers: None,
            seed: None,
            prior: PriorConfig::default(),
            log_dir: None,
        }
    }
}

impl AbcConfig {
    /// Small deterministic config for tests and quick checks.
    pub fn quick(num_runs: usize, tolerance: f64, workers: usize, seed: u64) -> Self {
        Self {
            num_runs,
            tolerance,
            workers: Some(workers),
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> AbcResult<()> {
        if !(self.tolerance > 0.0 && self.tolerance <= 1.0) {
            return Err(AbcError::InvalidConfig {
                field: "tolerance",
                reason: format!("{} is outside (0, 1]", self.tolerance),
            });
        }
        if self.workers == Some(0) {
            return Err(AbcError::InvalidConfig {
                field: "workers",
                reason: "at least one worker is required".to_string(),
            });
        }
        self.prior.validate()
    }

    /// Worker count after resolving the default.
    pub fn resolved_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }

    /// Overall number of retained draws the tolerance asks for, `floor(N × t)`.
    pub fn selected_runs(&self) -> usize {
        (self.num_runs as f64 * self.tolerance) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AbcConfig::default().validate().is_ok());
        assert_eq!(AbcConfig::default().selected_runs(), 100);
    }

    #[test]
    fn test_tolerance_bounds() {
        for tolerance in [0.0, -0.5, 1.5, f64::NAN] {
            let config = AbcConfig {
                tolerance,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(AbcError::InvalidConfig {
                    field: "tolerance",
                    ..
                })
            ));
        }
        let full = AbcConfig {
            tolerance: 1.0,
            ..Default::default()
        };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = AbcConfig {
            workers: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_mu_rejected() {
        let config = AbcConfig {
            prior: PriorConfig {
                mu: (0.0, 5.0),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AbcError::InvalidPrior {
                parameter: "muPowRatio",
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_sd_range_rejected() {
        let prior = PriorConfig {
            sd: (3.0, 1.0),
            ..Default::default()
        };
        assert!(prior.validate().is_err());
    }

    #[test]
    fn test_model_range_beyond_known_laws_rejected() {
        let prior = PriorConfig {
            models: 0..=4,
            ..Default::default()
        };
        assert!(prior.validate().is_err());
    }

    #[test]
    fn test_resolved_workers_defaults_to_parallelism() {
        assert!(AbcConfig::default().resolved_workers() >= 1);
        assert_eq!(AbcConfig::quick(10, 0.1, 3, 1).resolved_workers(), 3);
    }
}
