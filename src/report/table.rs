//! `run;model;muPR;sdPR;dist` table writer.

use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::abc::SimulationResult;
use crate::error::{AbcError, AbcResult};

pub const TABLE_HEADER: [&str; 5] = ["run", "model", "muPR", "sdPR", "dist"];

/// Write the ranked table to `path`, one row per retained result.
pub fn write_ranked_table(path: impl AsRef<Path>, results: &[SimulationResult]) -> AbcResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| AbcError::io(path, e))?;
    write_ranked_table_to(file, results).map_err(|e| AbcError::csv(path, e))?;
    info!(path = %path.display(), rows = results.len(), "wrote ranked table");
    Ok(())
}

/// Write the ranked table to any writer.
pub fn write_ranked_table_to<W: Write>(
    writer: W,
    results: &[SimulationResult],
) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().delimiter(b';').from_writer(writer);
    writer.write_record(TABLE_HEADER)?;
    for result in results {
        writer.write_record([
            result.run_id.to_string(),
            result.parameters.law.index().to_string(),
            format!("{:.2}", result.parameters.mu_pow_ratio),
            format!("{:.2}", result.parameters.sd_pow_ratio),
            format!("{:.2}", result.distance),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
