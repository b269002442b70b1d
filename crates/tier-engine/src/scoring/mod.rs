mod breakdown;
mod resolve;

pub use breakdown::{CategoryTotals, FemaleTotals, MaleTotals, ScoreBreakdown, AGGREGATE_MAX};

use std::collections::BTreeMap;

use tracing::debug;

use crate::catalog::QuestionSet;
use crate::domain::{Answer, AnswerValue, QuestionId};
use crate::error::{ConfigurationError, EvaluationError, ValidationError};
use crate::weights::WeightTable;

/// Stateless calculator over one gender's question snapshot.
pub struct ScoreCalculator<'a> {
    questions: &'a QuestionSet,
}

impl<'a> ScoreCalculator<'a> {
    pub fn new(questions: &'a QuestionSet) -> Self {
        Self { questions }
    }

    /// Score `answers` against `table`. Later answers to the same question replace
    /// earlier ones.
    pub fn calculate(
        &self,
        answers: &[Answer],
        table: &WeightTable,
    ) -> Result<ScoreBreakdown, EvaluationError> {
        let gender = self.questions.gender();
        let weights = table.for_gender(gender);
        let latest = self.latest_answers(answers)?;

        let mut sums = BTreeMap::new();
        for category in gender.categories() {
            sums.insert(category, 0.0_f64);
        }

        for question in self.questions.iter() {
            let weight = weights
                .weight_of(question.category, &question.id)
                .ok_or_else(|| ConfigurationError::UnweightedQuestion {
                    gender,
                    question_id: question.id.clone(),
                })?;

            match latest.get(&question.id) {
                Some(value) => {
                    let points = resolve::points(question, value, weight)?;
                    *sums.entry(question.category).or_insert(0.0) += points;
                }
                None if question.required => {
                    return Err(ValidationError::MissingRequired {
                        question_id: question.id.clone(),
                    }
                    .into());
                }
                None => {}
            }
        }

        let breakdown =
            ScoreBreakdown::assemble(gender, &sums, weights.combination(), table.version());
        debug!(
            %gender,
            version = table.version(),
            aggregate = breakdown.aggregate,
            answered = latest.len(),
            "scored answers"
        );

        Ok(breakdown)
    }

    fn latest_answers<'b>(
        &self,
        answers: &'b [Answer],
    ) -> Result<BTreeMap<&'b QuestionId, &'b AnswerValue>, ValidationError> {
        let mut latest = BTreeMap::new();
        for answer in answers {
            if self.questions.get(&answer.question_id).is_none() {
                return Err(ValidationError::UnknownQuestion {
                    question_id: answer.question_id.clone(),
                    gender: self.questions.gender(),
                });
            }
            latest.insert(&answer.question_id, &answer.value);
        }
        Ok(latest)
    }
}
