//! Adaptive difficulty engine.
//!
//! [`AdaptiveState`] is the whole state of one test session. It only changes
//! through [`AdaptiveState::record_answer`], which returns a new value and
//! leaves the prior state untouched.

use serde::{Deserialize, Serialize};

use crate::model::Difficulty;

/// Confidence assigned to a fresh session and after every level change.
pub const INITIAL_CONFIDENCE: f64 = 0.5;
/// Level every session starts at.
pub const INITIAL_DIFFICULTY: Difficulty = Difficulty::Medium;
/// Answers faster than this fraction of the running average count as fast.
pub const FAST_ANSWER_RATIO: f64 = 0.7;
/// Answers slower than this multiple of the running average count as slow.
pub const SLOW_ANSWER_RATIO: f64 = 1.5;
pub const FAST_TIME_FACTOR: f64 = 1.1;
pub const SLOW_TIME_FACTOR: f64 = 0.9;
/// Confidence gained by a correct answer, after the time factor.
pub const CORRECT_BONUS: f64 = 0.05;
/// Confidence lost by an incorrect answer, after the time factor.
pub const INCORRECT_PENALTY: f64 = 0.08;
/// Streak length required before a level change is considered.
pub const STREAK_THRESHOLD: u32 = 2;
/// Confidence must exceed this to promote.
pub const PROMOTE_CONFIDENCE: f64 = 0.55;
/// Confidence must fall below this to demote.
pub const DEMOTE_CONFIDENCE: f64 = 0.45;

/// Correct/total counters for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCounter {
    pub topic: String,
    pub correct: u32,
    pub total: u32,
}

/// Per-topic counters keyed by topic name, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicStats {
    entries: Vec<TopicCounter>,
}

impl TopicStats {
    pub fn get(&self, topic: &str) -> Option<&TopicCounter> {
        self.entries.iter().find(|e| e.topic == topic)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicCounter> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record(&mut self, topic: &str, is_correct: bool) {
        let index = match self.entries.iter().position(|e| e.topic == topic) {
            Some(i) => i,
            None => {
                self.entries.push(TopicCounter {
                    topic: topic.to_string(),
                    correct: 0,
                    total: 0,
                });
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[index];
        entry.total += 1;
        if is_correct {
            entry.correct += 1;
        }
    }
}

/// Scoring and calibration state of a single test session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveState {
    /// Bucket the next question must be drawn from.
    pub current_difficulty: Difficulty,
    pub consecutive_correct: u32,
    pub consecutive_incorrect: u32,
    pub total_correct: u32,
    pub total_incorrect: u32,
    pub total_questions: u32,
    pub total_response_time_ms: u64,
    pub topic_stats: TopicStats,
    /// Sum of the weights of correctly answered questions.
    pub weighted_score: u32,
    /// Sum of the weights of all answered questions.
    pub max_weighted_score: u32,
    /// Belief that `current_difficulty` matches the taker, in `[0, 1]`.
    pub confidence: f64,
}

impl Default for AdaptiveState {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveState {
    /// The state of a session before any question is answered.
    pub fn new() -> Self {
        Self {
            current_difficulty: INITIAL_DIFFICULTY,
            consecutive_correct: 0,
            consecutive_incorrect: 0,
            total_correct: 0,
            total_incorrect: 0,
            total_questions: 0,
            total_response_time_ms: 0,
            topic_stats: TopicStats::default(),
            weighted_score: 0,
            max_weighted_score: 0,
            confidence: INITIAL_CONFIDENCE,
        }
    }

    /// Fold one answered question into the state.
    ///
    /// `difficulty` is the level the answered question was drawn at and is
    /// used for weighting only; level changes always start from
    /// `current_difficulty`.
    #[must_use]
    pub fn record_answer(
        &self,
        is_correct: bool,
        response_time_ms: u64,
        difficulty: Difficulty,
        topic: &str,
    ) -> AdaptiveState {
        let mut next = self.clone();

        next.total_questions += 1;
        next.total_response_time_ms += response_time_ms;

        let weight = difficulty.weight();
        next.max_weighted_score += weight;
        if is_correct {
            next.weighted_score += weight;
        }

        next.topic_stats.record(topic, is_correct);

        if is_correct {
            next.total_correct += 1;
            next.consecutive_correct += 1;
            next.consecutive_incorrect = 0;
        } else {
            next.total_incorrect += 1;
            next.consecutive_incorrect += 1;
            next.consecutive_correct = 0;
        }

        let avg_time = next.total_response_time_ms as f64 / f64::from(next.total_questions);
        let time_factor = time_factor(response_time_ms as f64, avg_time);

        next.confidence = if is_correct {
            (next.confidence * time_factor + CORRECT_BONUS).min(1.0)
        } else {
            (next.confidence * time_factor - INCORRECT_PENALTY).max(0.0)
        };

        next.apply_level_change();
        next
    }

    fn apply_level_change(&mut self) {
        if self.consecutive_correct >= STREAK_THRESHOLD && self.confidence > PROMOTE_CONFIDENCE {
            if let Some(up) = self.current_difficulty.harder() {
                tracing::debug!(
                    from = %self.current_difficulty,
                    to = %up,
                    confidence = self.confidence,
                    "promoting difficulty"
                );
                self.current_difficulty = up;
                self.consecutive_correct = 0;
                self.confidence = INITIAL_CONFIDENCE;
            }
        } else if self.consecutive_incorrect >= STREAK_THRESHOLD
            && self.confidence < DEMOTE_CONFIDENCE
        {
            if let Some(down) = self.current_difficulty.easier() {
                tracing::debug!(
                    from = %self.current_difficulty,
                    to = %down,
                    confidence = self.confidence,
                    "demoting difficulty"
                );
                self.current_difficulty = down;
                self.consecutive_incorrect = 0;
                self.confidence = INITIAL_CONFIDENCE;
            }
        }
    }
}

/// Confidence multiplier for an answer relative to the running average.
fn time_factor(response_time_ms: f64, avg_time_ms: f64) -> f64 {
    if response_time_ms < avg_time_ms * FAST_ANSWER_RATIO {
        FAST_TIME_FACTOR
    } else if response_time_ms > avg_time_ms * SLOW_ANSWER_RATIO {
        SLOW_TIME_FACTOR
    } else {
        1.0
    }
}
