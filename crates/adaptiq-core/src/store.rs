//! Filesystem-backed session and ranking stores.
//!
//! Layout under the root directory:
//!
//! ```text
//! sessions/<session-id>.json   one SessionReport per completed session
//! leaderboard.json             all submitted LeaderboardEntry rows
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::report::{rank, LeaderboardEntry, SessionReport};
use crate::traits::{RankingStore, SessionStore};

/// A results directory acting as both session and ranking store.
#[derive(Debug, Clone)]
pub struct ReportDirectory {
    root: PathBuf,
}

impl ReportDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn sessions_dir(&self) -> PathBuf {
        self.root.join("sessions")
    }

    fn leaderboard_path(&self) -> PathBuf {
        self.root.join("leaderboard.json")
    }

    /// Path a session report is written to.
    pub fn session_path(&self, report: &SessionReport) -> PathBuf {
        self.sessions_dir().join(format!("{}.json", report.id))
    }

    fn read_leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let path = self.leaderboard_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read leaderboard: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse leaderboard: {}", path.display()))
    }
}

#[async_trait]
impl SessionStore for ReportDirectory {
    async fn save_session(&self, report: &SessionReport) -> Result<()> {
        let path = self.session_path(report);
        report.save_json(&path)?;
        tracing::debug!(path = %path.display(), "session saved");
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionReport>> {
        let dir = self.sessions_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut sessions = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("failed to read directory: {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match SessionReport::load_json(&path) {
                    Ok(report) => sessions.push(report),
                    Err(e) => {
                        tracing::warn!("skipping {}: {e:#}", path.display());
                    }
                }
            }
        }

        sessions.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(sessions)
    }
}

#[async_trait]
impl RankingStore for ReportDirectory {
    async fn submit(&self, entry: &LeaderboardEntry) -> Result<()> {
        let mut entries = self.read_leaderboard()?;
        entries.push(entry.clone());

        let path = self.leaderboard_path();
        std::fs::create_dir_all(&self.root)?;
        let json =
            serde_json::to_string_pretty(&entries).context("failed to serialize leaderboard")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write leaderboard: {}", path.display()))?;
        Ok(())
    }

    async fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        Ok(rank(self.read_leaderboard()?, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AdaptiveState;
    use crate::model::Difficulty;
    use crate::report::BankSummary;
    use chrono::{Duration, Utc};

    fn report(name: &str, correct: usize, offset_minutes: i64) -> SessionReport {
        let mut state = AdaptiveState::new();
        for i in 0..4 {
            state = state.record_answer(i < correct, 1000, Difficulty::Medium, "General");
        }
        let mut report = SessionReport::from_session(
            name,
            BankSummary {
                id: "b".into(),
                name: "Bank".into(),
                question_count: 4,
            },
            Utc::now(),
            state,
            Vec::new(),
        );
        report.completed_at += Duration::minutes(offset_minutes);
        report
    }

    #[tokio::test]
    async fn empty_directory_has_no_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportDirectory::new(dir.path().join("missing"));
        assert!(store.list_sessions().await.unwrap().is_empty());
        assert!(store.top(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sessions_listed_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportDirectory::new(dir.path());

        let older = report("old", 1, -10);
        let newer = report("new", 3, 0);
        store.save_session(&older).await.unwrap();
        store.save_session(&newer).await.unwrap();
        std::fs::write(dir.path().join("sessions").join("junk.json"), "{").unwrap();

        let sessions = store.list_sessions().await.unwrap();
        let names: Vec<&str> = sessions.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn leaderboard_accumulates_and_ranks() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportDirectory::new(dir.path());

        for (name, correct) in [("low", 1), ("high", 4), ("mid", 2)] {
            let r = report(name, correct, 0);
            store.submit(&LeaderboardEntry::from(&r)).await.unwrap();
        }

        let top = store.top(2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].display_name, "high");
        assert_eq!(top[0].score, 100);
        assert_eq!(top[1].display_name, "mid");
    }
}
