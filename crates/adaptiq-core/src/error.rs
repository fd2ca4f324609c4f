//! Session driver error types.
//!
//! The engine itself is total and has no errors. These cover the boundary
//! between the session driver and its collaborators, and are typed so the
//! driver can downcast and classify them without string matching.

use thiserror::Error;

/// Errors raised while driving a test session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The respondent picked a key that is not one of the question's options.
    #[error("question {question_id} has no option '{selected}'")]
    InvalidOption {
        question_id: String,
        selected: String,
    },

    /// The respondent has no more answers to give.
    #[error("respondent ran out of answers after {answered} question(s)")]
    RespondentExhausted { answered: u32 },

    /// The question source had nothing to serve for the first question.
    #[error("question bank '{0}' has no questions")]
    EmptyQuestionBank(String),
}

impl SessionError {
    /// Returns `true` if the session should end normally with the answers so far.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, SessionError::RespondentExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_end_of_input() {
        assert!(SessionError::RespondentExhausted { answered: 3 }.is_end_of_input());
        assert!(!SessionError::EmptyQuestionBank("b".into()).is_end_of_input());
    }

    #[test]
    fn downcasts_from_anyhow() {
        let err: anyhow::Error = SessionError::RespondentExhausted { answered: 2 }.into();
        let typed = err.downcast_ref::<SessionError>().unwrap();
        assert!(typed.is_end_of_input());
        assert_eq!(
            err.to_string(),
            "respondent ran out of answers after 2 question(s)"
        );
    }
}
