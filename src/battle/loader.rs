//! Reader for `year;R0;Rc;B0;Bc` battle files.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use super::types::{Battle, BattleSet};
use crate::error::{AbcError, AbcResult};

const FIELD_NAMES: [&str; 5] = ["year", "R0", "Rc", "B0", "Bc"];

/// Load a battle file from disk. The first line is a header and is skipped.
pub fn load_battles(path: impl AsRef<Path>) -> AbcResult<BattleSet> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AbcError::io(path, e))?;
    let battles = read_battles(file, path)?;
    info!(path = %path.display(), battles = battles.len(), "loaded battles");
    Ok(battles)
}

/// Parse battles from any reader. `origin` is only used in error messages.
pub fn read_battles<R: Read>(reader: R, origin: &Path) -> AbcResult<BattleSet> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut battles = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AbcError::csv(origin, e))?;
        // Header occupies line 1.
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(battles.len() + 2);
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        battles.push(parse_battle(&record, line)?);
    }
    Ok(BattleSet::new(battles))
}

fn parse_battle(record: &StringRecord, line: usize) -> AbcResult<Battle> {
    if record.len() != FIELD_NAMES.len() {
        return Err(AbcError::MalformedBattle {
            line,
            reason: format!(
                "expected {} fields, found {}",
                FIELD_NAMES.len(),
                record.len()
            ),
        });
    }

    let year = parse_field::<i32>(record, 0, line)?;
    let red_initial = parse_field::<u32>(record, 1, line)?;
    let red_casualties = parse_field::<u32>(record, 2, line)?;
    let blue_initial = parse_field::<u32>(record, 3, line)?;
    let blue_casualties = parse_field::<u32>(record, 4, line)?;

    if red_casualties > red_initial {
        return Err(AbcError::MalformedBattle {
            line,
            reason: format!("Rc ({red_casualties}) exceeds R0 ({red_initial})"),
        });
    }
    if blue_casualties > blue_initial {
        return Err(AbcError::MalformedBattle {
            line,
            reason: format!("Bc ({blue_casualties}) exceeds B0 ({blue_initial})"),
        });
    }

    Ok(Battle::new(
        year,
        red_initial,
        red_casualties,
        blue_initial,
        blue_casualties,
    ))
}

fn parse_field<T: std::str::FromStr>(
    record: &StringRecord,
    index: usize,
    line: usize,
) -> AbcResult<T> {
    let raw = record.get(index).unwrap_or_default();
    raw.parse::<T>().map_err(|_| AbcError::MalformedBattle {
        line,
        reason: format!("field {} is not a valid integer: '{}'", FIELD_NAMES[index], raw),
    })
}
