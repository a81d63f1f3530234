//! Error types for the estimation pipeline.
//!
//! Every fault is fatal for the run in question: nothing here is retried,
//! and a failing worker aborts the whole estimation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbcError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed battle record on line {line}: {reason}")]
    MalformedBattle { line: usize, reason: String },

    #[error("Battle #{index} ({year}) has zero historical casualties on one side")]
    DegenerateBattle { index: usize, year: i32 },

    #[error("Battle #{index} ({year}) has zero initial strength on one side")]
    DegenerateStrength { index: usize, year: i32 },

    #[error("Battle #{index} ({year}) reports more casualties than initial strength on one side")]
    ExcessCasualties { index: usize, year: i32 },

    #[error("Invalid prior range for {parameter}: [{low}, {high}]")]
    InvalidPrior {
        parameter: &'static str,
        low: f64,
        high: f64,
    },

    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Worker {worker} failed: {reason}")]
    WorkerFailed { worker: usize, reason: String },
}

/// Result alias used throughout the crate.
pub type AbcResult<T> = Result<T, AbcError>;

impl AbcError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
