//! Scripted respondent for non-interactive sessions and tests.

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::error::SessionError;
use crate::model::Question;
use crate::traits::{Respondent, Response};

/// Replays a fixed list of answers, one per question, in order.
///
/// Once the list runs out, [`SessionError::RespondentExhausted`] is returned,
/// which the session driver treats as the end of the session.
pub struct ScriptedRespondent {
    answers: Vec<Response>,
    /// Number of answers handed out so far.
    cursor: AtomicU32,
    /// Ids of the questions that were asked, in order.
    asked: Mutex<Vec<String>>,
}

impl ScriptedRespondent {
    pub fn new(answers: Vec<Response>) -> Self {
        Self {
            answers,
            cursor: AtomicU32::new(0),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Parse a script with one `KEY MILLIS` answer per line.
    ///
    /// Blank lines and lines starting with `#` are ignored. The latency is
    /// optional and defaults to 1000ms.
    pub fn from_script(script: &str) -> Result<Self> {
        let answers = script
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .map(|(line_no, line)| -> Result<Response> {
                let mut parts = line.split_whitespace();
                let selected = parts
                    .next()
                    .map(|s| s.to_uppercase())
                    .with_context(|| format!("line {line_no}: missing answer key"))?;
                let response_time_ms = match parts.next() {
                    Some(ms) => ms.parse::<u64>().with_context(|| {
                        format!("line {line_no}: invalid response time '{ms}'")
                    })?,
                    None => 1000,
                };
                anyhow::ensure!(
                    parts.next().is_none(),
                    "line {line_no}: expected `KEY [MILLIS]`"
                );
                Ok(Response {
                    selected,
                    response_time_ms,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(answers))
    }

    /// Load a script file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read answer script: {}", path.display()))?;
        Self::from_script(&content)
            .with_context(|| format!("failed to parse answer script: {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Ids of the questions asked so far.
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .map(|asked| asked.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Respondent for ScriptedRespondent {
    async fn respond(&self, question: &Question, number: u32) -> anyhow::Result<Response> {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) as usize;
        let Some(answer) = self.answers.get(index) else {
            return Err(SessionError::RespondentExhausted {
                answered: number.saturating_sub(1),
            }
            .into());
        };
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(question.id.clone());
        }
        Ok(answer.clone())
    }
}
