//! Per-worker progress records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

use super::sample::SimulationResult;
use crate::error::{AbcError, AbcResult};

/// Global run indices between two progress records.
pub const PROGRESS_RESOLUTION: usize = 100;

/// Append-only progress stream for one worker.
///
/// Every record goes to `tracing` at debug level; when a log directory is
/// configured it is also written to `<dir>/log_<worker>`.
pub struct ProgressLog {
    worker: usize,
    started: Instant,
    sink: Option<(PathBuf, BufWriter<File>)>,
}

impl ProgressLog {
    /// Progress log that only emits tracing events.
    pub fn tracing_only(worker: usize) -> Self {
        Self {
            worker,
            started: Instant::now(),
            sink: None,
        }
    }

    /// Create (truncating) `<dir>/log_<worker>` and write its header.
    pub fn create(dir: &Path, worker: usize) -> AbcResult<Self> {
        let path = log_path(dir, worker);
        let file = File::create(&path).map_err(|e| AbcError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "logs for worker: {} started: {}",
            worker,
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )
        .and_then(|_| writer.flush())
        .map_err(|e| AbcError::io(&path, e))?;
        Ok(Self {
            worker,
            started: Instant::now(),
            sink: Some((path, writer)),
        })
    }

    /// Whether `run_id` falls on the reporting cadence.
    pub fn is_due(run_id: usize) -> bool {
        run_id % PROGRESS_RESOLUTION == 0
    }

    /// Record elapsed time, position in the block and the current worst kept result.
    pub fn record(
        &mut self,
        offset: usize,
        block_len: usize,
        worst: Option<&SimulationResult>,
    ) -> AbcResult<()> {
        let elapsed = self.started.elapsed().as_secs_f64();
        let worst = worst
            .map(ToString::to_string)
            .unwrap_or_else(|| "none".to_string());
        debug!(
            worker = self.worker,
            elapsed_s = elapsed,
            offset,
            block_len,
            worst = %worst,
            "progress"
        );

        if let Some((path, writer)) = self.sink.as_mut() {
            writeln!(
                writer,
                "worker: {} time: {:.2}s. run: {}/{} - worst: {}",
                self.worker, elapsed, offset, block_len, worst
            )
            .and_then(|_| writer.flush())
            .map_err(|e| AbcError::io(path.as_path(), e))?;
        }
        Ok(())
    }
}

/// Location of a worker's progress log inside `dir`.
pub fn log_path(dir: &Path, worker: usize) -> PathBuf {
    dir.join(format!("log_{worker}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence() {
        assert!(ProgressLog::is_due(0));
        assert!(ProgressLog::is_due(300));
        assert!(!ProgressLog::is_due(301));
    }

    #[test]
    fn test_file_log_has_header_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = ProgressLog::create(dir.path(), 2).unwrap();
        log.record(0, 250, None).unwrap();
        log.record(100, 250, None).unwrap();
        drop(log);

        let text = std::fs::read_to_string(log_path(dir.path(), 2)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("logs for worker: 2"));
        assert!(lines[2].starts_with("worker: 2 time: "));
        assert!(lines[2].ends_with("run: 100/250 - worst: none"));
    }

    #[test]
    fn test_tracing_only_log_writes_nothing() {
        let mut log = ProgressLog::tracing_only(0);
        assert!(log.record(0, 10, None).is_ok());
    }
}
