//! The `adaptiq validate` command.

use std::path::PathBuf;

use anyhow::Result;

use adaptiq_core::model::Difficulty;
use adaptiq_core::parser::{load_banks, validate_question_bank};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = load_banks(&bank_path)?;
    if banks.is_empty() {
        anyhow::bail!("no question banks found in {}", bank_path.display());
    }

    let mut total_warnings = 0;

    for bank in &banks {
        let counts: Vec<String> = Difficulty::ALL
            .iter()
            .map(|&d| format!("{d}: {}", bank.count_at(d)))
            .collect();
        println!(
            "Question bank: {} ({} questions; {})",
            bank.name,
            bank.questions.len(),
            counts.join(", ")
        );

        let warnings = validate_question_bank(bank);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All question banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
