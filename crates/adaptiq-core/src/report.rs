//! Session reports with JSON persistence, a plain-text rendering, and
//! leaderboard entries.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::AdaptiveState;
use crate::model::{Difficulty, MasteryLevel, TopicAnalysis};
use crate::statistics::{self, difficulty_breakdown, difficulty_path};

/// A completed test session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique session identifier.
    pub id: Uuid,
    /// Name shown on the leaderboard.
    pub display_name: String,
    /// The bank the questions came from.
    pub bank: BankSummary,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Headline metrics.
    pub summary: SessionSummary,
    /// Per-topic analysis, in the order topics were first answered.
    pub topics: Vec<TopicAnalysis>,
    pub recommendations: Vec<String>,
    /// One record per answered question, in answer order.
    pub responses: Vec<ResponseRecord>,
    /// Engine state at the end of the session.
    pub final_state: AdaptiveState,
}

/// Summary of a question bank (without the questions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

/// Headline metrics of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_questions: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    /// Rounded percentage of correct answers.
    pub accuracy: u32,
    /// Rounded percentage of earned difficulty weight.
    pub weighted_accuracy: u32,
    pub avg_response_time_ms: u64,
    /// Level the next question would have been drawn from.
    pub final_difficulty: Difficulty,
    pub mastery_level: MasteryLevel,
}

impl SessionSummary {
    /// Compute the summary of an engine state.
    pub fn from_state(state: &AdaptiveState) -> Self {
        Self {
            total_questions: state.total_questions,
            correct_count: state.total_correct,
            incorrect_count: state.total_incorrect,
            accuracy: statistics::accuracy(state),
            weighted_accuracy: statistics::weighted_accuracy(state),
            avg_response_time_ms: statistics::avg_response_time(state),
            final_difficulty: state.current_difficulty,
            mastery_level: statistics::mastery_level(state),
        }
    }
}

/// What happened on one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// 1-based position in the session.
    pub question_number: u32,
    pub question_id: String,
    pub topic: String,
    pub selected_answer: String,
    pub is_correct: bool,
    pub response_time_ms: u64,
    /// Difficulty of the answered question.
    pub difficulty_at_time: Difficulty,
    /// Engine difficulty after recording the answer.
    pub difficulty_after: Difficulty,
}

impl SessionReport {
    /// Assemble a report from the final engine state and the response log.
    pub fn from_session(
        display_name: &str,
        bank: BankSummary,
        started_at: DateTime<Utc>,
        state: AdaptiveState,
        responses: Vec<ResponseRecord>,
    ) -> Self {
        let topics = statistics::analyze_topics(&state);
        let recommendations = statistics::recommendations(&topics);
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.to_string(),
            bank,
            started_at,
            completed_at: Utc::now(),
            summary: SessionSummary::from_state(&state),
            topics,
            recommendations,
            responses,
            final_state: state,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Session wall-clock duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        (self.completed_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64
    }

    /// Render the downloadable plain-text assessment report.
    pub fn to_text(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();

        out.push_str("adaptiq - Assessment Report\n");
        out.push_str("===========================\n");
        out.push_str(&format!("Name: {}\n", self.display_name));
        out.push_str(&format!("Question bank: {}\n", self.bank.name));
        out.push_str(&format!(
            "Date: {}\n",
            self.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!("Total Questions: {}\n", s.total_questions));
        out.push_str(&format!("Correct: {}\n", s.correct_count));
        out.push_str(&format!("Incorrect: {}\n", s.incorrect_count));
        out.push_str(&format!("Accuracy: {}%\n", s.accuracy));
        out.push_str(&format!("Weighted Accuracy: {}%\n", s.weighted_accuracy));
        out.push_str(&format!("Avg Response Time: {}ms\n", s.avg_response_time_ms));
        out.push_str(&format!("Final Difficulty: {}\n", s.final_difficulty));
        out.push_str(&format!("Mastery Level: {}\n", s.mastery_level));
        let path: Vec<String> = difficulty_path(&self.responses)
            .iter()
            .map(Difficulty::to_string)
            .collect();
        out.push_str(&format!("Difficulty Path: {}\n", path.join(" -> ")));

        if !self.topics.is_empty() {
            out.push_str("\nTopic Analysis:\n");
            for t in &self.topics {
                out.push_str(&format!(
                    "  {}: {}/{} ({}%) - {}\n",
                    t.topic, t.correct, t.total, t.accuracy, t.category
                ));
            }
        }

        out.push_str("\nRecommendations:\n");
        for rec in &self.recommendations {
            out.push_str(&format!("  - {rec}\n"));
        }

        let breakdown = difficulty_breakdown(&self.responses);
        if !breakdown.is_empty() {
            out.push_str("\nDifficulty Breakdown:\n");
            for b in &breakdown {
                out.push_str(&format!(
                    "  {}: {}/{} ({}%)\n",
                    b.difficulty,
                    b.correct,
                    b.total,
                    b.accuracy()
                ));
            }
        }

        if !self.responses.is_empty() {
            out.push_str("\nResponse Timeline:\n");
            for r in &self.responses {
                out.push_str(&format!(
                    "  Q{}: {} ({}) - {}ms\n",
                    r.question_number,
                    if r.is_correct { "correct" } else { "wrong" },
                    r.difficulty_at_time,
                    r.response_time_ms
                ));
            }
        }

        out
    }
}

/// One row of the cross-session ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub session_id: Uuid,
    pub display_name: String,
    /// Raw accuracy of the session.
    pub score: u32,
    pub total_questions: u32,
    pub avg_response_time_ms: u64,
    pub mastery_level: MasteryLevel,
    pub created_at: DateTime<Utc>,
}

impl From<&SessionReport> for LeaderboardEntry {
    fn from(report: &SessionReport) -> Self {
        Self {
            session_id: report.id,
            display_name: report.display_name.clone(),
            score: report.summary.accuracy,
            total_questions: report.summary.total_questions,
            avg_response_time_ms: report.summary.avg_response_time_ms,
            mastery_level: report.summary.mastery_level,
            created_at: report.completed_at,
        }
    }
}

/// Sort entries by score, highest first, and keep the best `limit`.
///
/// Ties keep their submission order.
pub fn rank(mut entries: Vec<LeaderboardEntry>, limit: usize) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> SessionReport {
        let answers = [
            (true, 1200, Difficulty::Medium, "Algebra"),
            (false, 3400, Difficulty::Medium, "Verbal"),
            (true, 900, Difficulty::Easy, "Algebra"),
        ];
        let mut state = AdaptiveState::new();
        let mut responses = Vec::new();
        for (i, (correct, ms, difficulty, topic)) in answers.into_iter().enumerate() {
            state = state.record_answer(correct, ms, difficulty, topic);
            responses.push(ResponseRecord {
                question_number: i as u32 + 1,
                question_id: format!("q{i}"),
                topic: topic.into(),
                selected_answer: "A".into(),
                is_correct: correct,
                response_time_ms: ms,
                difficulty_at_time: difficulty,
                difficulty_after: state.current_difficulty,
            });
        }
        SessionReport::from_session(
            "Ada",
            BankSummary {
                id: "test".into(),
                name: "Test Bank".into(),
                question_count: 3,
            },
            Utc::now(),
            state,
            responses,
        )
    }

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            session_id: Uuid::nil(),
            display_name: name.into(),
            score,
            total_questions: 15,
            avg_response_time_ms: 1000,
            mastery_level: MasteryLevel::Intermediate,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn summary_matches_engine_metrics() {
        let report = sample_report();
        assert_eq!(report.summary.total_questions, 3);
        assert_eq!(report.summary.correct_count, 2);
        assert_eq!(report.summary.incorrect_count, 1);
        assert_eq!(report.summary.accuracy, 67);
        assert_eq!(report.summary.weighted_accuracy, 60);
        assert_eq!(report.summary.avg_response_time_ms, 1833);
        assert_eq!(report.summary.mastery_level, MasteryLevel::Intermediate);
        assert_eq!(report.topics.len(), 2);
        assert_eq!(report.recommendations.len(), 1);
        assert!(report.recommendations[0].starts_with("Focus on Verbal"));
    }

    #[test]
    fn json_roundtrip() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        report.save_json(&path).unwrap();
        let loaded = SessionReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.summary, report.summary);
        assert_eq!(loaded.final_state, report.final_state);
    }

    #[test]
    fn load_missing_file_fails_with_path() {
        let err = SessionReport::load_json(Path::new("no/such/report.json")).unwrap_err();
        assert!(err.to_string().contains("no/such/report.json"));
    }

    #[test]
    fn text_report_sections() {
        let text = sample_report().to_text();
        assert!(text.contains("Accuracy: 67%"));
        assert!(text.contains("Mastery Level: Intermediate"));
        assert!(text.contains("Difficulty Path: medium\n"));
        assert!(text.contains("Algebra: 2/2 (100%) - strength"));
        assert!(text.contains("Difficulty Breakdown:"));
        assert!(text.contains("  easy: 1/1 (100%)"));
        assert!(text.contains("  medium: 1/2 (50%)"));
        assert!(text.contains("Q2: wrong (medium) - 3400ms"));
    }

    #[test]
    fn leaderboard_entry_uses_raw_accuracy() {
        let report = sample_report();
        let entry = LeaderboardEntry::from(&report);
        assert_eq!(entry.score, 67);
        assert_eq!(entry.display_name, "Ada");
        assert_eq!(entry.session_id, report.id);
    }

    #[test]
    fn rank_orders_by_score_and_truncates() {
        let ranked = rank(
            vec![entry("a", 40), entry("b", 90), entry("c", 90), entry("d", 70)],
            3,
        );
        let names: Vec<&str> = ranked.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }
}
