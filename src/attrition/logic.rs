//! Force-decay iteration shared by all attrition laws.

use super::types::{AttritionLaw, AttritionStep, AttritionTrace, CasualtyPair};
use crate::battle::Battle;
use crate::error::AbcResult;

/// Simulate one battle and return the casualties inflicted on each side.
///
/// # Arguments
/// * `law` - Attrition law to iterate
/// * `pow_ratio` - Red lethality relative to blue
/// * `battle` - Initial strengths and historical casualties
/// * `index` - Position of the battle in its set (for diagnostics)
///
/// # Returns
/// Casualties once either side has fallen to its historical remainder.
pub fn simulate(
    law: AttritionLaw,
    pow_ratio: f64,
    battle: &Battle,
    index: usize,
) -> AbcResult<CasualtyPair> {
    iterate(law, pow_ratio, battle, index, |_| {})
}

/// Like [`simulate`], keeping every intermediate step.
pub fn simulate_traced(
    law: AttritionLaw,
    pow_ratio: f64,
    battle: &Battle,
    index: usize,
) -> AbcResult<AttritionTrace> {
    let mut steps = Vec::new();
    let casualties = iterate(law, pow_ratio, battle, index, |step| steps.push(step))?;
    Ok(AttritionTrace {
        law,
        pow_ratio,
        step_factor: law.step_factor(battle.red_initial, battle.blue_initial),
        steps,
        casualties,
    })
}

/// Simulate every battle, one power ratio per battle, flattened as
/// `[Rc0, Bc0, Rc1, Bc1, ...]`.
pub fn simulate_all(
    law: AttritionLaw,
    pow_ratios: &[f64],
    battles: &[Battle],
) -> AbcResult<Vec<u32>> {
    let mut casualties = Vec::with_capacity(battles.len() * 2);
    for (index, (battle, &pow_ratio)) in battles.iter().zip(pow_ratios).enumerate() {
        let pair = simulate(law, pow_ratio, battle, index)?;
        casualties.push(pair.red);
        casualties.push(pair.blue);
    }
    Ok(casualties)
}

fn iterate(
    law: AttritionLaw,
    pow_ratio: f64,
    battle: &Battle,
    index: usize,
    mut on_step: impl FnMut(AttritionStep),
) -> AbcResult<CasualtyPair> {
    battle.check_strengths(index)?;

    let blue_power = law.step_factor(battle.red_initial, battle.blue_initial);
    let red_power = blue_power * pow_ratio;
    let red_floor = battle.red_remaining();
    let blue_floor = battle.blue_remaining();

    let mut red = battle.red_initial;
    let mut blue = battle.blue_initial;
    let mut step = 0;
    on_step(AttritionStep { step, red, blue });

    // Red always loses something while both sides stand, so this halts
    // within `red_casualties` steps.
    while red > red_floor && blue > blue_floor {
        let (red_loss, blue_loss) =
            law.losses(red as f64, blue as f64, step, blue_power, red_power);
        red = apply_loss(red, red_loss);
        blue = apply_loss(blue, blue_loss);
        step += 1;
        on_step(AttritionStep { step, red, blue });
    }

    Ok(CasualtyPair {
        red: battle.red_initial - red,
        blue: battle.blue_initial - blue,
    })
}

/// Remaining strength after `loss`, truncated toward zero and floored at zero.
///
/// A positive loss always removes at least one unit, even when it is too
/// small to register against `current` in floating point.
fn apply_loss(current: u32, loss: f64) -> u32 {
    let next = ((current as f64 - loss) as i64).clamp(0, current as i64) as u32;
    if loss > 0.0 && next == current {
        current.saturating_sub(1)
    } else {
        next
    }
}
