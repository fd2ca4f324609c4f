//! Collaborator traits for the session driver.
//!
//! The engine only consumes answer outcomes. Where questions come from, who
//! answers them, and where finished sessions go are all behind these async
//! traits so the driver can be pointed at a local bank, a script, or a remote
//! store without changes.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Question};
use crate::report::{LeaderboardEntry, SessionReport};

// ---------------------------------------------------------------------------
// Question source
// ---------------------------------------------------------------------------

/// Serves questions by difficulty bucket.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. the bank name).
    fn name(&self) -> &str;

    /// Return one question not in `used`, preferably at `difficulty`.
    ///
    /// `Ok(None)` means the source is exhausted.
    async fn next_question(
        &self,
        difficulty: Difficulty,
        used: &HashSet<String>,
    ) -> anyhow::Result<Option<Question>>;
}

// ---------------------------------------------------------------------------
// Respondent
// ---------------------------------------------------------------------------

/// Whoever answers the questions: a person at a terminal, a script, a test.
#[async_trait]
pub trait Respondent: Send + Sync {
    /// Answer `question`, the `number`th of the session (1-based).
    async fn respond(&self, question: &Question, number: u32) -> anyhow::Result<Response>;
}

/// A respondent's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Key of the selected option.
    pub selected: String,
    /// Time between the question being shown and the answer, in milliseconds.
    pub response_time_ms: u64,
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// Persists completed sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save_session(&self, report: &SessionReport) -> anyhow::Result<()>;

    /// All stored sessions, most recently completed first.
    async fn list_sessions(&self) -> anyhow::Result<Vec<SessionReport>>;
}

/// Cross-session score ranking.
#[async_trait]
pub trait RankingStore: Send + Sync {
    async fn submit(&self, entry: &LeaderboardEntry) -> anyhow::Result<()>;

    /// The best `limit` entries, highest score first.
    async fn top(&self, limit: usize) -> anyhow::Result<Vec<LeaderboardEntry>>;
}
