//! Derived session metrics.
//!
//! Every function here is a read-only view over an [`AdaptiveState`] (or over
//! values derived from one), so calling any of them repeatedly yields the
//! same answer.

use serde::{Deserialize, Serialize};

use crate::engine::{AdaptiveState, INITIAL_DIFFICULTY};
use crate::model::{Difficulty, MasteryLevel, TopicAnalysis, TopicCategory};
use crate::report::ResponseRecord;

/// Weighted accuracy at or above which a session is rated advanced.
pub const ADVANCED_THRESHOLD: u32 = 80;
/// Weighted accuracy at or above which a session is rated intermediate.
pub const INTERMEDIATE_THRESHOLD: u32 = 50;
/// Topic accuracy strictly above this is a strength.
pub const STRENGTH_THRESHOLD: u32 = 75;
/// Topic accuracy strictly below this is a weakness.
pub const WEAK_THRESHOLD: u32 = 50;

/// Message used when no topic needs attention.
pub const CONGRATULATIONS: &str =
    "Excellent performance across all topics! Try harder difficulty levels.";

/// `part / whole` as a rounded percentage, or 0 when `whole` is zero.
fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Share of correct answers, 0-100.
pub fn accuracy(state: &AdaptiveState) -> u32 {
    percent(
        u64::from(state.total_correct),
        u64::from(state.total_questions),
    )
}

/// Share of earned difficulty weight, 0-100.
pub fn weighted_accuracy(state: &AdaptiveState) -> u32 {
    percent(
        u64::from(state.weighted_score),
        u64::from(state.max_weighted_score),
    )
}

/// Mean response latency in milliseconds, rounded.
pub fn avg_response_time(state: &AdaptiveState) -> u64 {
    if state.total_questions == 0 {
        return 0;
    }
    (state.total_response_time_ms as f64 / f64::from(state.total_questions)).round() as u64
}

/// Mastery band from weighted accuracy.
pub fn mastery_level(state: &AdaptiveState) -> MasteryLevel {
    let wa = weighted_accuracy(state);
    if wa >= ADVANCED_THRESHOLD {
        MasteryLevel::Advanced
    } else if wa >= INTERMEDIATE_THRESHOLD {
        MasteryLevel::Intermediate
    } else {
        MasteryLevel::Beginner
    }
}

fn categorize(accuracy: u32) -> TopicCategory {
    if accuracy > STRENGTH_THRESHOLD {
        TopicCategory::Strength
    } else if accuracy < WEAK_THRESHOLD {
        TopicCategory::Weak
    } else {
        TopicCategory::Moderate
    }
}

/// One analysis per topic, in the order topics were first answered.
pub fn analyze_topics(state: &AdaptiveState) -> Vec<TopicAnalysis> {
    state
        .topic_stats
        .iter()
        .map(|stats| {
            let accuracy = percent(u64::from(stats.correct), u64::from(stats.total));
            TopicAnalysis {
                topic: stats.topic.clone(),
                accuracy,
                correct: stats.correct,
                total: stats.total,
                category: categorize(accuracy),
            }
        })
        .collect()
}

/// Study advice: weak topics first, then moderate ones.
pub fn recommendations(topics: &[TopicAnalysis]) -> Vec<String> {
    let weak = topics
        .iter()
        .filter(|t| t.category == TopicCategory::Weak)
        .map(|t| {
            format!(
                "Focus on {} — your accuracy is {}%. Practice foundational concepts.",
                t.topic, t.accuracy
            )
        });
    let moderate = topics
        .iter()
        .filter(|t| t.category == TopicCategory::Moderate)
        .map(|t| {
            format!(
                "Strengthen {} ({}%) with more challenging problems.",
                t.topic, t.accuracy
            )
        });

    let recs: Vec<String> = weak.chain(moderate).collect();
    if recs.is_empty() {
        vec![CONGRATULATIONS.to_string()]
    } else {
        recs
    }
}

/// Correct/total counts for one difficulty level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyBreakdown {
    pub difficulty: Difficulty,
    pub correct: u32,
    pub total: u32,
}

impl DifficultyBreakdown {
    pub fn accuracy(&self) -> u32 {
        percent(u64::from(self.correct), u64::from(self.total))
    }
}

/// Per-level results of a session, easiest first. Levels never served are omitted.
pub fn difficulty_breakdown(responses: &[ResponseRecord]) -> Vec<DifficultyBreakdown> {
    Difficulty::ALL
        .iter()
        .filter_map(|&difficulty| {
            let at_level = responses
                .iter()
                .filter(|r| r.difficulty_at_time == difficulty);
            let (correct, total) = at_level.fold((0u32, 0u32), |(c, t), r| {
                (c + u32::from(r.is_correct), t + 1)
            });
            (total > 0).then_some(DifficultyBreakdown {
                difficulty,
                correct,
                total,
            })
        })
        .collect()
}

/// Levels visited over a session, starting from the initial level and
/// collapsing repeats.
pub fn difficulty_path(responses: &[ResponseRecord]) -> Vec<Difficulty> {
    let mut path = vec![INITIAL_DIFFICULTY];
    for r in responses {
        if path.last() != Some(&r.difficulty_after) {
            path.push(r.difficulty_after);
        }
    }
    path
}
