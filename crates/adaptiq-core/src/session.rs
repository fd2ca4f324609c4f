//! Session driver.
//!
//! Runs one adaptive test: fetches a question at the engine's current
//! difficulty, collects an answer, folds it into the [`AdaptiveState`], and
//! repeats until the configured number of questions has been answered.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;

use crate::engine::AdaptiveState;
use crate::error::SessionError;
use crate::model::Question;
use crate::report::{BankSummary, ResponseRecord, SessionReport};
use crate::traits::{QuestionSource, Respondent};

/// Default number of questions per session.
pub const DEFAULT_QUESTION_COUNT: u32 = 15;

/// Configuration for a session run.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Questions to ask before the session ends.
    pub question_count: u32,
    /// Name recorded in the report and on the leaderboard.
    pub display_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
            display_name: "Anonymous".to_string(),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_question(&self, number: u32, total: u32, question: &Question);
    fn on_answer(&self, record: &ResponseRecord, state: &AdaptiveState);
    fn on_session_complete(&self, report: &SessionReport);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_question(&self, _: u32, _: u32, _: &Question) {}
    fn on_answer(&self, _: &ResponseRecord, _: &AdaptiveState) {}
    fn on_session_complete(&self, _: &SessionReport) {}
}

/// Drives sessions against one question source.
pub struct SessionRunner {
    source: Arc<dyn QuestionSource>,
    bank: BankSummary,
    config: SessionConfig,
}

impl SessionRunner {
    pub fn new(source: Arc<dyn QuestionSource>, bank: BankSummary, config: SessionConfig) -> Self {
        Self {
            source,
            bank,
            config,
        }
    }

    /// Run one session to completion.
    ///
    /// The session ends early, without error, if the source runs out of
    /// questions or the respondent runs out of answers after at least one
    /// question.
    pub async fn run(
        &self,
        respondent: &dyn Respondent,
        progress: &dyn ProgressReporter,
    ) -> Result<SessionReport> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let total = self.config.question_count;

        let mut state = AdaptiveState::new();
        let mut used: HashSet<String> = HashSet::new();
        let mut responses: Vec<ResponseRecord> = Vec::new();

        while state.total_questions < total {
            let number = state.total_questions + 1;

            let Some(question) = self
                .source
                .next_question(state.current_difficulty, &used)
                .await?
            else {
                if number == 1 {
                    return Err(SessionError::EmptyQuestionBank(self.bank.name.clone()).into());
                }
                tracing::warn!(
                    "'{}' ran out of questions after {} of {total}",
                    self.source.name(),
                    number - 1
                );
                break;
            };

            progress.on_question(number, total, &question);

            let response = match respondent.respond(&question, number).await {
                Ok(response) => response,
                Err(e) => match e.downcast_ref::<SessionError>() {
                    Some(se) if se.is_end_of_input() && number > 1 => {
                        tracing::warn!("ending session early: {se}");
                        break;
                    }
                    _ => return Err(e),
                },
            };

            if !question.has_option(&response.selected) {
                return Err(SessionError::InvalidOption {
                    question_id: question.id.clone(),
                    selected: response.selected,
                }
                .into());
            }

            let is_correct = question.is_correct(&response.selected);
            state = state.record_answer(
                is_correct,
                response.response_time_ms,
                question.difficulty,
                &question.topic,
            );

            let record = ResponseRecord {
                question_number: number,
                question_id: question.id.clone(),
                topic: question.topic.clone(),
                selected_answer: response.selected,
                is_correct,
                response_time_ms: response.response_time_ms,
                difficulty_at_time: question.difficulty,
                difficulty_after: state.current_difficulty,
            };
            progress.on_answer(&record, &state);

            used.insert(question.id);
            responses.push(record);
        }

        let report = SessionReport::from_session(
            &self.config.display_name,
            self.bank.clone(),
            started_at,
            state,
            responses,
        );

        tracing::info!(
            session = %report.id,
            questions = report.summary.total_questions,
            accuracy = report.summary.accuracy,
            mastery = %report.summary.mastery_level,
            elapsed_ms = clock.elapsed().as_millis() as u64,
            "session complete"
        );
        progress.on_session_complete(&report);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::BankSource;
    use crate::model::{AnswerOption, Difficulty, MasteryLevel, QuestionBank};
    use crate::respondent::ScriptedRespondent;
    use crate::statistics::difficulty_path;
    use crate::traits::Response;
    use std::sync::Mutex;

    fn question(id: &str, difficulty: Difficulty, topic: &str) -> Question {
        Question {
            id: id.into(),
            text: format!("question {id}"),
            options: ["A", "B", "C", "D"]
                .iter()
                .map(|k| AnswerOption {
                    key: k.to_string(),
                    text: k.to_lowercase(),
                })
                .collect(),
            correct_answer: "A".into(),
            difficulty,
            topic: topic.into(),
        }
    }

    fn bank() -> QuestionBank {
        let mut questions = Vec::new();
        for d in Difficulty::ALL {
            for i in 0..5 {
                let topic = if i % 2 == 0 { "Algebra" } else { "Logic" };
                questions.push(question(&format!("{d}-{i}"), d, topic));
            }
        }
        QuestionBank {
            id: "test".into(),
            name: "Test Bank".into(),
            description: String::new(),
            questions,
        }
    }

    fn runner(question_count: u32) -> SessionRunner {
        let bank = bank();
        let summary = BankSummary {
            id: bank.id.clone(),
            name: bank.name.clone(),
            question_count: bank.questions.len(),
        };
        SessionRunner::new(
            Arc::new(BankSource::new(bank)),
            summary,
            SessionConfig {
                question_count,
                display_name: "Tester".into(),
            },
        )
    }

    fn answers(keys: &[&str]) -> ScriptedRespondent {
        ScriptedRespondent::new(
            keys.iter()
                .map(|k| Response {
                    selected: k.to_string(),
                    response_time_ms: 1000,
                })
                .collect(),
        )
    }

    #[derive(Default)]
    struct RecordingReporter {
        questions: Mutex<Vec<(u32, Difficulty)>>,
        completed: Mutex<u32>,
    }

    impl ProgressReporter for RecordingReporter {
        fn on_question(&self, number: u32, _: u32, question: &Question) {
            self.questions
                .lock()
                .unwrap()
                .push((number, question.difficulty));
        }
        fn on_answer(&self, _: &ResponseRecord, _: &AdaptiveState) {}
        fn on_session_complete(&self, _: &SessionReport) {
            *self.completed.lock().unwrap() += 1;
        }
    }

    #[tokio::test]
    async fn correct_answers_climb_to_hard() {
        let runner = runner(4);
        let respondent = answers(&["A", "A", "A", "A"]);
        let reporter = RecordingReporter::default();

        let report = runner.run(&respondent, &reporter).await.unwrap();

        let served: Vec<Difficulty> = reporter
            .questions
            .lock()
            .unwrap()
            .iter()
            .map(|(_, d)| *d)
            .collect();
        assert_eq!(
            served,
            vec![
                Difficulty::Medium,
                Difficulty::Medium,
                Difficulty::Hard,
                Difficulty::Hard
            ]
        );
        assert_eq!(report.summary.total_questions, 4);
        assert_eq!(report.summary.accuracy, 100);
        assert_eq!(report.summary.final_difficulty, Difficulty::Hard);
        assert_eq!(report.summary.mastery_level, MasteryLevel::Advanced);
        assert_eq!(report.display_name, "Tester");
        assert_eq!(*reporter.completed.lock().unwrap(), 1);
        assert_eq!(
            difficulty_path(&report.responses),
            vec![Difficulty::Medium, Difficulty::Hard]
        );
    }

    #[tokio::test]
    async fn wrong_answers_fall_to_easy() {
        let runner = runner(3);
        let respondent = answers(&["B", "C", "D"]);

        let report = runner.run(&respondent, &NoopReporter).await.unwrap();

        assert_eq!(report.responses[2].difficulty_at_time, Difficulty::Easy);
        assert_eq!(report.summary.accuracy, 0);
        assert_eq!(report.summary.mastery_level, MasteryLevel::Beginner);
    }

    #[tokio::test]
    async fn questions_are_never_repeated() {
        let runner = runner(15);
        let respondent = answers(&["A"; 15]);

        let report = runner.run(&respondent, &NoopReporter).await.unwrap();

        let ids: HashSet<&str> = report
            .responses
            .iter()
            .map(|r| r.question_id.as_str())
            .collect();
        assert_eq!(ids.len(), 15);
        assert_eq!(respondent.asked().len(), 15);
    }

    #[tokio::test]
    async fn ends_early_when_bank_runs_out() {
        let runner = runner(20);
        let respondent = answers(&["A"; 20]);

        let report = runner.run(&respondent, &NoopReporter).await.unwrap();
        assert_eq!(report.summary.total_questions, 15);
    }

    #[tokio::test]
    async fn ends_early_when_answers_run_out() {
        let runner = runner(10);
        let respondent = answers(&["A", "B"]);

        let report = runner.run(&respondent, &NoopReporter).await.unwrap();
        assert_eq!(report.summary.total_questions, 2);
    }

    #[tokio::test]
    async fn no_answers_at_all_is_an_error() {
        let runner = runner(10);
        let respondent = answers(&[]);

        let err = runner.run(&respondent, &NoopReporter).await.unwrap_err();
        assert!(err.to_string().contains("ran out of answers"));
    }

    #[tokio::test]
    async fn unknown_option_is_rejected() {
        let runner = runner(3);
        let respondent = answers(&["E"]);

        let err = runner.run(&respondent, &NoopReporter).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::InvalidOption { .. })
        ));
    }

    #[tokio::test]
    async fn empty_bank_is_an_error() {
        let summary = BankSummary {
            id: "empty".into(),
            name: "Empty".into(),
            question_count: 0,
        };
        let runner = SessionRunner::new(
            Arc::new(BankSource::new(QuestionBank {
                id: "empty".into(),
                name: "Empty".into(),
                description: String::new(),
                questions: vec![],
            })),
            summary,
            SessionConfig::default(),
        );

        let err = runner.run(&answers(&["A"]), &NoopReporter).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SessionError>(),
            Some(SessionError::EmptyQuestionBank(_))
        ));
    }
}
