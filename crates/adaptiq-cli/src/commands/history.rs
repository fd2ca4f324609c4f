//! The `adaptiq history` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use adaptiq_core::config::load_config_from;
use adaptiq_core::store::ReportDirectory;
use adaptiq_core::traits::SessionStore;

pub async fn execute(output: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = ReportDirectory::new(output.unwrap_or(config.output_dir));

    let sessions = store.list_sessions().await?;
    if sessions.is_empty() {
        println!("No sessions found in {}", store.root().display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Completed",
        "Name",
        "Bank",
        "Questions",
        "Accuracy",
        "Final Difficulty",
        "Mastery",
        "Session",
    ]);

    for report in &sessions {
        let s = &report.summary;
        table.add_row(vec![
            Cell::new(report.completed_at.format("%Y-%m-%d %H:%M")),
            Cell::new(&report.display_name),
            Cell::new(&report.bank.name),
            Cell::new(s.total_questions),
            Cell::new(format!("{}%", s.accuracy)),
            Cell::new(s.final_difficulty),
            Cell::new(s.mastery_level),
            Cell::new(report.id),
        ]);
    }

    println!("{table}");
    println!("{} session(s)", sessions.len());

    Ok(())
}
