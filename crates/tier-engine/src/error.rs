use crate::domain::{Category, Gender, QuestionId};

/// Failure surfaced by scoring, weight loading, or collaborator lookups.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no active weight table for {gender}")]
    NotFound { gender: Gender },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Answer-level failures. The first offending question in catalog order is reported.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("required question {question_id} has no answer")]
    MissingRequired { question_id: QuestionId },
    #[error("answer {value} for {question_id} is outside [{min}, {max}]")]
    OutOfRange {
        question_id: QuestionId,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("'{value}' is not an option of {question_id}")]
    UnknownOption { question_id: QuestionId, value: String },
    #[error("{question_id} expects a {expected} answer")]
    KindMismatch {
        question_id: QuestionId,
        expected: &'static str,
    },
    #[error("{question_id} is not a {gender} question")]
    UnknownQuestion { question_id: QuestionId, gender: Gender },
}

/// Malformed catalog, weight, plan, or model configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("weight configuration could not be parsed: {0}")]
    Malformed(String),
    #[error("weight configuration is missing a version name")]
    MissingVersion,
    #[error("weight configuration has no {gender} sub-tree")]
    MissingGender { gender: Gender },
    #[error("{gender} weights are missing the {category} category")]
    MissingCategory { gender: Gender, category: Category },
    #[error("{gender} weights contain unexpected category '{key}'")]
    UnexpectedCategory { gender: Gender, key: String },
    #[error("{gender} {category} weights sum to {sum}, expected {expected}")]
    UnbalancedCategory {
        gender: Gender,
        category: Category,
        sum: f64,
        expected: f64,
    },
    #[error("weight {weight} for {question_id} must be finite and non-negative")]
    InvalidWeight { question_id: QuestionId, weight: f64 },
    #[error("{gender} question {question_id} has no weight in the active table")]
    UnweightedQuestion {
        gender: Gender,
        question_id: QuestionId,
    },
    #[error("{gender} {category} weight for {question_id} matches no {gender} {category} question")]
    OrphanWeight {
        gender: Gender,
        category: Category,
        question_id: QuestionId,
    },
    #[error("{gender} combination multiplier for {category} must be finite and non-negative, found {value}")]
    InvalidMultiplier {
        gender: Gender,
        category: Category,
        value: f64,
    },
    #[error("{gender} combination multipliers sum to {sum}, expected 1")]
    UnbalancedCombination { gender: Gender, sum: f64 },
    #[error("question {question_id} is declared more than once")]
    DuplicateQuestion { question_id: QuestionId },
    #[error("question {question_id} declares invalid bounds [{min}, {max}]")]
    InvalidBounds {
        question_id: QuestionId,
        min: f64,
        max: f64,
    },
    #[error("select question {question_id} declares no options")]
    EmptyOptions { question_id: QuestionId },
    #[error("option '{value}' of {question_id} has score {score}, expected 0..=1")]
    InvalidOptionScore {
        question_id: QuestionId,
        value: String,
        score: f64,
    },
    #[error("question {question_id} uses {category}, which {gender} scoring does not have")]
    CategoryNotApplicable {
        question_id: QuestionId,
        category: Category,
        gender: Gender,
    },
    #[error("percentile model needs a finite mean and positive std dev (mean {mean}, std dev {std_dev})")]
    InvalidModel { mean: f64, std_dev: f64 },
    #[error("subscription plan '{id}' is declared more than once")]
    DuplicatePlan { id: String },
}

/// Collaborator failure (weight store, catalog provider).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
