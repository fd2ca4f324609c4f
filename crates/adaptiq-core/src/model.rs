//! Core data model types for adaptiq.
//!
//! Difficulty levels, questions and question banks, and the derived labels
//! (mastery level, topic category) that summaries produce.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty bucket a question is drawn from.
///
/// Ordered `Easy < Medium < Hard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All levels in ascending order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Scoring weight of a question at this level.
    pub fn weight(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    /// The next level up, if any.
    pub fn harder(self) -> Option<Difficulty> {
        match self {
            Difficulty::Easy => Some(Difficulty::Medium),
            Difficulty::Medium => Some(Difficulty::Hard),
            Difficulty::Hard => None,
        }
    }

    /// The next level down, if any.
    pub fn easier(self) -> Option<Difficulty> {
        match self {
            Difficulty::Easy => None,
            Difficulty::Medium => Some(Difficulty::Easy),
            Difficulty::Hard => Some(Difficulty::Medium),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// One selectable answer of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Option key (e.g. "A").
    pub key: String,
    /// Option text shown to the taker.
    pub text: String,
}

/// A multiple-choice question as served by a question source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within its bank.
    pub id: String,
    /// The question text.
    pub text: String,
    /// Answer options, normally four.
    pub options: Vec<AnswerOption>,
    /// Key of the correct option.
    pub correct_answer: String,
    /// Difficulty bucket.
    pub difficulty: Difficulty,
    /// Free-form topic label.
    pub topic: String,
}

impl Question {
    /// Whether `key` names one of this question's options. Keys are trimmed
    /// and compare case-insensitively.
    pub fn has_option(&self, key: &str) -> bool {
        let key = key.trim();
        self.options.iter().any(|o| o.key.eq_ignore_ascii_case(key))
    }

    /// Whether `key` is the correct answer. Keys compare case-insensitively.
    pub fn is_correct(&self, key: &str) -> bool {
        self.correct_answer.eq_ignore_ascii_case(key.trim())
    }
}

/// A named collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this bank.
    #[serde(default)]
    pub description: String,
    /// The questions, in file order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Number of questions at the given difficulty.
    pub fn count_at(&self, difficulty: Difficulty) -> usize {
        self.questions
            .iter()
            .filter(|q| q.difficulty == difficulty)
            .count()
    }
}

/// Coarse three-band label summarizing overall session performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MasteryLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MasteryLevel::Beginner => write!(f, "Beginner"),
            MasteryLevel::Intermediate => write!(f, "Intermediate"),
            MasteryLevel::Advanced => write!(f, "Advanced"),
        }
    }
}

/// Per-topic performance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicCategory {
    Strength,
    Moderate,
    Weak,
}

impl fmt::Display for TopicCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicCategory::Strength => write!(f, "strength"),
            TopicCategory::Moderate => write!(f, "moderate"),
            TopicCategory::Weak => write!(f, "weak"),
        }
    }
}

/// Read-only accuracy view of one topic, derived from the session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAnalysis {
    pub topic: String,
    /// Rounded percentage, 0-100.
    pub accuracy: u32,
    pub correct: u32,
    pub total: u32,
    pub category: TopicCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert_eq!(Difficulty::Hard.to_string(), "hard");
        assert_eq!("medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!(" Hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_order_and_weights() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
        let weights: Vec<u32> = Difficulty::ALL.iter().map(|d| d.weight()).collect();
        assert_eq!(weights, vec![1, 2, 3]);
    }

    #[test]
    fn difficulty_neighbours() {
        assert_eq!(Difficulty::Easy.harder(), Some(Difficulty::Medium));
        assert_eq!(Difficulty::Hard.harder(), None);
        assert_eq!(Difficulty::Easy.easier(), None);
        assert_eq!(Difficulty::Hard.easier(), Some(Difficulty::Medium));
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let back: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(back, Difficulty::Easy);
    }

    #[test]
    fn question_answer_matching_ignores_case() {
        let q = Question {
            id: "q1".into(),
            text: "2 + 2?".into(),
            options: ["A", "B", "C", "D"]
                .iter()
                .map(|k| AnswerOption {
                    key: k.to_string(),
                    text: String::new(),
                })
                .collect(),
            correct_answer: "B".into(),
            difficulty: Difficulty::Easy,
            topic: "Arithmetic".into(),
        };
        assert!(q.is_correct("b"));
        assert!(!q.is_correct("A"));
        assert!(q.has_option("d"));
        assert!(!q.has_option("E"));

        // Surrounding whitespace is ignored by both checks.
        assert!(q.has_option(" B "));
        assert!(q.is_correct(" B "));
        assert!(q.has_option("\tc\n"));
        assert!(!q.is_correct("\tc\n"));
    }
}
