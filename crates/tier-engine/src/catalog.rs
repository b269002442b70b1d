//! Question definitions consumed by scoring.
//!
//! Question content is external configuration. The catalog only checks that the
//! definitions are internally consistent before they are handed to the calculator.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{Category, Gender, QuestionId};
use crate::error::{ConfigurationError, StoreError};

/// Which genders a question is asked of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Applicability {
    Male,
    Female,
    Both,
}

impl Applicability {
    pub fn includes(self, gender: Gender) -> bool {
        match self {
            Applicability::Both => true,
            Applicability::Male => gender == Gender::Male,
            Applicability::Female => gender == Gender::Female,
        }
    }
}

/// Fixed-score option of a single-select question. `score` is the share of the
/// question weight awarded when chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerKind {
    Ranged { min: f64, max: f64 },
    Select { options: Vec<SelectOption> },
}

impl AnswerKind {
    pub const fn expected(&self) -> &'static str {
        match self {
            AnswerKind::Ranged { .. } => "numeric",
            AnswerKind::Select { .. } => "single-select",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub category: Category,
    pub applies_to: Applicability,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub prompt: String,
    #[serde(flatten)]
    pub kind: AnswerKind,
}

impl Question {
    fn validate(&self) -> Result<(), ConfigurationError> {
        for gender in Gender::ALL {
            if self.applies_to.includes(gender) && !gender.has_category(self.category) {
                return Err(ConfigurationError::CategoryNotApplicable {
                    question_id: self.id.clone(),
                    category: self.category,
                    gender,
                });
            }
        }

        match &self.kind {
            AnswerKind::Ranged { min, max } => {
                if !min.is_finite() || !max.is_finite() || min >= max {
                    return Err(ConfigurationError::InvalidBounds {
                        question_id: self.id.clone(),
                        min: *min,
                        max: *max,
                    });
                }
            }
            AnswerKind::Select { options } => {
                if options.is_empty() {
                    return Err(ConfigurationError::EmptyOptions {
                        question_id: self.id.clone(),
                    });
                }
                if let Some(option) = options
                    .iter()
                    .find(|option| !(0.0..=1.0).contains(&option.score))
                {
                    return Err(ConfigurationError::InvalidOptionScore {
                        question_id: self.id.clone(),
                        value: option.value.clone(),
                        score: option.score,
                    });
                }
            }
        }

        Ok(())
    }
}

/// Validated, ordered question definitions for every gender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Result<Self, ConfigurationError> {
        let mut seen = BTreeSet::new();
        for question in &questions {
            if !seen.insert(question.id.clone()) {
                return Err(ConfigurationError::DuplicateQuestion {
                    question_id: question.id.clone(),
                });
            }
            question.validate()?;
        }

        Ok(Self { questions })
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigurationError> {
        let questions: Vec<Question> = serde_json::from_str(raw)
            .map_err(|err| ConfigurationError::Malformed(err.to_string()))?;
        Self::new(questions)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Immutable snapshot of the questions asked of `gender`, catalog order preserved.
    pub fn for_gender(&self, gender: Gender) -> QuestionSet {
        let questions = self
            .questions
            .iter()
            .filter(|question| question.applies_to.includes(gender))
            .cloned()
            .collect::<Vec<_>>();

        QuestionSet {
            gender,
            questions: questions.into(),
        }
    }
}

/// Ordered questions for a single gender, fixed for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSet {
    gender: Gender,
    questions: Arc<[Question]>,
}

impl QuestionSet {
    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| &question.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Source of question definitions for an evaluation.
pub trait QuestionCatalogProvider: Send + Sync {
    fn questions(&self, gender: Gender) -> Result<QuestionSet, StoreError>;
}

impl QuestionCatalogProvider for QuestionCatalog {
    fn questions(&self, gender: Gender) -> Result<QuestionSet, StoreError> {
        Ok(self.for_gender(gender))
    }
}
