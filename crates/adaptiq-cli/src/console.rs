//! Terminal respondent and progress output.

use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use adaptiq_core::engine::AdaptiveState;
use adaptiq_core::error::SessionError;
use adaptiq_core::model::Question;
use adaptiq_core::report::{ResponseRecord, SessionReport};
use adaptiq_core::session::ProgressReporter;
use adaptiq_core::traits::{Respondent, Response};

/// Reads answers from stdin and times them.
pub struct ConsoleRespondent {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleRespondent {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for ConsoleRespondent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Respondent for ConsoleRespondent {
    async fn respond(&self, question: &Question, number: u32) -> Result<Response> {
        eprintln!("\n{}", question.text);
        for option in &question.options {
            eprintln!("  {}) {}", option.key, option.text);
        }

        let started = Instant::now();
        let mut lines = self.lines.lock().await;
        loop {
            eprint!("Your answer: ");
            let Some(line) = lines.next_line().await? else {
                return Err(SessionError::RespondentExhausted {
                    answered: number - 1,
                }
                .into());
            };
            let selected = line.trim().to_uppercase();
            if question.has_option(&selected) {
                return Ok(Response {
                    selected,
                    response_time_ms: started.elapsed().as_millis() as u64,
                });
            }
            eprintln!("Please choose one of the listed options.");
        }
    }
}

/// Console progress reporter.
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_question(&self, number: u32, total: u32, question: &Question) {
        eprintln!(
            "\nQuestion {number} / {total} [{}] {}",
            question.difficulty, question.topic
        );
    }

    fn on_answer(&self, record: &ResponseRecord, state: &AdaptiveState) {
        let verdict = if record.is_correct { "correct" } else { "wrong" };
        let change = if record.difficulty_after != record.difficulty_at_time {
            format!(", next: {}", record.difficulty_after)
        } else {
            String::new()
        };
        eprintln!(
            "  {verdict} ({}ms, confidence {:.2}{change})",
            record.response_time_ms, state.confidence
        );
    }

    fn on_session_complete(&self, report: &SessionReport) {
        eprintln!(
            "\nComplete: {} questions, {}% accuracy ({:.1}s)",
            report.summary.total_questions,
            report.summary.accuracy,
            report.duration_ms() as f64 / 1000.0
        );
    }
}
