use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AbcError, AbcResult};

/// One historical engagement between a "red" and a "blue" force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub year: i32,
    pub red_initial: u32,
    pub red_casualties: u32,
    pub blue_initial: u32,
    pub blue_casualties: u32,
}

impl Battle {
    pub fn new(
        year: i32,
        red_initial: u32,
        red_casualties: u32,
        blue_initial: u32,
        blue_casualties: u32,
    ) -> Self {
        Self {
            year,
            red_initial,
            red_casualties,
            blue_initial,
            blue_casualties,
        }
    }

    /// Red strength left standing when the historical battle ended.
    pub fn red_remaining(&self) -> u32 {
        self.red_initial.saturating_sub(self.red_casualties)
    }

    /// Blue strength left standing when the historical battle ended.
    pub fn blue_remaining(&self) -> u32 {
        self.blue_initial.saturating_sub(self.blue_casualties)
    }

    /// Both sides field a force and lose no more than they fielded.
    ///
    /// `index` is the battle's position in its set, used in the error.
    pub fn check_strengths(&self, index: usize) -> AbcResult<()> {
        if self.red_initial == 0 || self.blue_initial == 0 {
            return Err(AbcError::DegenerateStrength {
                index,
                year: self.year,
            });
        }
        if self.red_casualties > self.red_initial || self.blue_casualties > self.blue_initial {
            return Err(AbcError::ExcessCasualties {
                index,
                year: self.year,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "battle in: {} R: {}/{} B: {}/{}",
            self.year,
            self.red_initial,
            self.red_casualties,
            self.blue_initial,
            self.blue_casualties
        )
    }
}

/// Observed casualties flattened as `[Rc0, Bc0, Rc1, Bc1, ...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalCasualties {
    casualties: Vec<u32>,
    years: Vec<i32>,
}

impl HistoricalCasualties {
    pub fn from_battles(battles: &[Battle]) -> Self {
        let mut casualties = Vec::with_capacity(battles.len() * 2);
        for battle in battles {
            casualties.push(battle.red_casualties);
            casualties.push(battle.blue_casualties);
        }
        Self {
            casualties,
            years: battles.iter().map(|b| b.year).collect(),
        }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.casualties
    }

    /// Year of the battle an entry of the flattened sequence belongs to.
    pub fn year_of(&self, entry: usize) -> i32 {
        self.years.get(entry / 2).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.casualties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.casualties.is_empty()
    }
}

/// Immutable battle data shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct BattleSet {
    battles: Vec<Battle>,
    historical: HistoricalCasualties,
}

impl BattleSet {
    pub fn new(battles: Vec<Battle>) -> Self {
        let historical = HistoricalCasualties::from_battles(&battles);
        Self {
            battles,
            historical,
        }
    }

    pub fn battles(&self) -> &[Battle] {
        &self.battles
    }

    pub fn historical(&self) -> &HistoricalCasualties {
        &self.historical
    }

    pub fn len(&self) -> usize {
        self.battles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.battles.is_empty()
    }

    /// Reject datasets the simulator or distance cannot handle.
    ///
    /// Run before any worker starts so a bad record aborts the estimation
    /// with the offending battle named, instead of surfacing mid-run.
    pub fn validate(&self) -> AbcResult<()> {
        if self.battles.is_empty() {
            return Err(AbcError::InvalidConfig {
                field: "battles",
                reason: "battle set is empty".to_string(),
            });
        }
        for (index, battle) in self.battles.iter().enumerate() {
            battle.check_strengths(index)?;
            if battle.red_casualties == 0 || battle.blue_casualties == 0 {
                return Err(AbcError::DegenerateBattle {
                    index,
                    year: battle.year,
                });
            }
        }
        Ok(())
    }
}
