//! The `adaptiq run` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use adaptiq_core::bank::BankSource;
use adaptiq_core::config::load_config_from;
use adaptiq_core::parser::{parse_question_bank, validate_question_bank};
use adaptiq_core::report::{BankSummary, LeaderboardEntry, SessionReport};
use adaptiq_core::respondent::ScriptedRespondent;
use adaptiq_core::session::SessionRunner;
use adaptiq_core::store::ReportDirectory;
use adaptiq_core::traits::{RankingStore, SessionStore};

use crate::console::{ConsoleReporter, ConsoleRespondent};
use crate::OutputFormat;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    bank_path: Option<PathBuf>,
    questions: Option<u32>,
    name: Option<String>,
    answers_path: Option<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let bank_path = bank_path
        .or_else(|| config.question_bank.clone())
        .context("no question bank given: pass --bank or set question_bank in adaptiq.toml")?;
    let bank = parse_question_bank(&bank_path)?;
    for w in validate_question_bank(&bank) {
        match &w.question_id {
            Some(id) => tracing::warn!("[{id}] {}", w.message),
            None => tracing::warn!("{}", w.message),
        }
    }

    let mut session_config = config.session_config();
    if let Some(n) = questions {
        anyhow::ensure!(n >= 1, "questions must be at least 1");
        session_config.question_count = n;
    }
    if let Some(name) = name {
        session_config.display_name = name;
    }
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    eprintln!(
        "adaptiq v{}: {} questions from '{}' ({} available)",
        env!("CARGO_PKG_VERSION"),
        session_config.question_count,
        bank.name,
        bank.questions.len()
    );

    let summary = BankSummary {
        id: bank.id.clone(),
        name: bank.name.clone(),
        question_count: bank.questions.len(),
    };
    let runner = SessionRunner::new(Arc::new(BankSource::new(bank)), summary, session_config);
    let reporter = ConsoleReporter;

    let report = match &answers_path {
        Some(path) => {
            let respondent = ScriptedRespondent::from_file(path)?;
            runner.run(&respondent, &reporter).await?
        }
        None => runner.run(&ConsoleRespondent::new(), &reporter).await?,
    };

    print_summary(&report);

    let store = ReportDirectory::new(&output);
    store.save_session(&report).await?;
    store.submit(&LeaderboardEntry::from(&report)).await?;
    eprintln!("Results saved to: {}", store.session_path(&report).display());

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => println!("{}", report.to_text()),
    }

    Ok(())
}

fn print_summary(report: &SessionReport) {
    use comfy_table::{Cell, Table};

    let s = &report.summary;
    let mut table = Table::new();
    table.set_header(vec![
        "Questions",
        "Accuracy",
        "Weighted",
        "Avg Time",
        "Final Difficulty",
        "Mastery",
    ]);
    table.add_row(vec![
        Cell::new(s.total_questions),
        Cell::new(format!("{}%", s.accuracy)),
        Cell::new(format!("{}%", s.weighted_accuracy)),
        Cell::new(format!("{}ms", s.avg_response_time_ms)),
        Cell::new(s.final_difficulty),
        Cell::new(s.mastery_level),
    ]);

    eprintln!("\n{table}");

    eprintln!("\nRecommendations:");
    for rec in &report.recommendations {
        eprintln!("  - {rec}");
    }
}
