//! Relative-error distance between simulated and historical casualties.

use crate::battle::HistoricalCasualties;
use crate::error::{AbcError, AbcResult};

/// `Σ |simulated[i] − historical[i]| / historical[i]` over the flattened
/// casualty sequence.
///
/// Zero exactly when every simulated count matches history. A zero
/// historical count has no meaningful relative error and is rejected.
pub fn distance(simulated: &[u32], historical: &HistoricalCasualties) -> AbcResult<f64> {
    let observed = historical.as_slice();
    if simulated.len() != observed.len() {
        return Err(AbcError::InvalidConfig {
            field: "simulated_casualties",
            reason: format!(
                "{} simulated entries for {} historical entries",
                simulated.len(),
                observed.len()
            ),
        });
    }

    let mut total = 0.0;
    for (entry, (&sim, &obs)) in simulated.iter().zip(observed).enumerate() {
        if obs == 0 {
            return Err(AbcError::DegenerateBattle {
                index: entry / 2,
                year: historical.year_of(entry),
            });
        }
        total += (sim as f64 - obs as f64).abs() / obs as f64;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::Battle;

    fn historical() -> HistoricalCasualties {
        HistoricalCasualties::from_battles(&[
            Battle::new(1809, 1000, 200, 800, 100),
            Battle::new(1813, 5000, 700, 4000, 900),
        ])
    }

    #[test]
    fn test_identical_sequences_have_zero_distance() {
        let historical = historical();
        let d = distance(historical.as_slice(), &historical).unwrap();
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_any_difference_is_positive() {
        let historical = historical();
        let d = distance(&[200, 100, 700, 901], &historical).unwrap();
        assert!(d > 0.0);
        assert!((d - 1.0 / 900.0).abs() < 1e-12);
    }

    #[test]
    fn test_reference_battle_distance() {
        let historical = HistoricalCasualties::from_battles(&[Battle::new(1809, 1000, 200, 800, 100)]);
        let d = distance(&[100, 120], &historical).unwrap();
        assert!((d - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_over_and_under_estimates_weigh_equally() {
        let historical = HistoricalCasualties::from_battles(&[Battle::new(1809, 1000, 200, 800, 100)]);
        let over = distance(&[250, 100], &historical).unwrap();
        let under = distance(&[150, 100], &historical).unwrap();
        assert!((over - under).abs() < 1e-12);
    }

    #[test]
    fn test_zero_historical_casualties_rejected() {
        let historical = HistoricalCasualties::from_battles(&[
            Battle::new(1809, 1000, 200, 800, 100),
            Battle::new(1812, 900, 40, 700, 0),
        ]);
        let err = distance(&[200, 100, 40, 3], &historical).unwrap_err();
        assert!(matches!(
            err,
            AbcError::DegenerateBattle {
                index: 1,
                year: 1812
            }
        ));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let historical = historical();
        assert!(distance(&[1, 2], &historical).is_err());
    }
}
