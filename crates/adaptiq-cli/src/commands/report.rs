//! The `adaptiq report` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptiq_core::report::SessionReport;

use crate::OutputFormat;

pub fn execute(session_path: PathBuf, format: OutputFormat) -> Result<()> {
    let report = SessionReport::load_json(&session_path)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => println!("{}", report.to_text()),
    }

    Ok(())
}
