//! In-memory question source over a loaded [`QuestionBank`].

use std::collections::HashSet;

use async_trait::async_trait;

use crate::model::{Difficulty, Question, QuestionBank};
use crate::traits::QuestionSource;

/// Serves questions from a bank in file order.
///
/// When the requested bucket has no unused question left, any unused
/// question is served instead so a session never stalls on a thin bucket.
pub struct BankSource {
    bank: QuestionBank,
}

impl BankSource {
    pub fn new(bank: QuestionBank) -> Self {
        Self { bank }
    }

    fn pick(&self, difficulty: Difficulty, used: &HashSet<String>) -> Option<&Question> {
        let mut unused = self.bank.questions.iter().filter(|q| !used.contains(&q.id));
        if let Some(q) = unused.clone().find(|q| q.difficulty == difficulty) {
            return Some(q);
        }
        let fallback = unused.next();
        if let Some(q) = fallback {
            tracing::warn!(
                requested = %difficulty,
                served = %q.difficulty,
                "no unused {difficulty} question left in '{}', falling back",
                self.bank.name
            );
        }
        fallback
    }
}

#[async_trait]
impl QuestionSource for BankSource {
    fn name(&self) -> &str {
        &self.bank.name
    }

    async fn next_question(
        &self,
        difficulty: Difficulty,
        used: &HashSet<String>,
    ) -> anyhow::Result<Option<Question>> {
        let question = self.pick(difficulty, used).cloned();
        if let Some(q) = &question {
            tracing::debug!(id = %q.id, difficulty = %q.difficulty, "serving question");
        }
        Ok(question)
    }
}
