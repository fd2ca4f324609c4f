//! The `adaptiq leaderboard` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use adaptiq_core::config::load_config_from;
use adaptiq_core::store::ReportDirectory;
use adaptiq_core::traits::RankingStore;

pub async fn execute(
    output: Option<PathBuf>,
    limit: usize,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = ReportDirectory::new(output.unwrap_or(config.output_dir));

    let entries = store.top(limit).await?;
    if entries.is_empty() {
        println!("Leaderboard is empty.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Rank",
        "Name",
        "Score",
        "Questions",
        "Avg Time",
        "Mastery",
        "Date",
    ]);

    for (i, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&entry.display_name),
            Cell::new(format!("{}%", entry.score)),
            Cell::new(entry.total_questions),
            Cell::new(format!("{}ms", entry.avg_response_time_ms)),
            Cell::new(entry.mastery_level),
            Cell::new(entry.created_at.format("%Y-%m-%d")),
        ]);
    }

    println!("{table}");

    Ok(())
}
