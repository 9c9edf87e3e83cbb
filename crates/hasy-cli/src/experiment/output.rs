use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use hasy_classifiers::experiment::ExperimentOutcome;

/// Write the outcome of a run as pretty-printed JSON.
pub fn write_outcome<P: AsRef<Path>>(outcome: &ExperimentOutcome, output_path: P) -> Result<()> {
    let path = output_path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), outcome)
        .with_context(|| format!("Failed to write results to {:?}", path))?;
    log::info!("[hasy] Results written to {:?}", path);
    Ok(())
}
