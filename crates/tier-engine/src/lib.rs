//! Questionnaire scoring, percentile grading, and tier entitlement policy.
//!
//! Every function here is pure and synchronous. Question definitions, the active weight
//! table, subscription plans, and view counters are supplied by the caller; results are
//! returned, never persisted.

pub mod access;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod grade;
pub mod percentile;
pub mod scoring;
pub mod service;
pub mod weights;

#[cfg(test)]
mod tests;

pub use catalog::{QuestionCatalog, QuestionCatalogProvider, QuestionSet};
pub use domain::{Answer, AnswerValue, Category, Gender, QuestionId, UserId};
pub use error::{ConfigurationError, EvaluationError, StoreError, ValidationError};
pub use grade::{Tier, TierProfile};
pub use percentile::{PercentileModel, PercentileResult};
pub use scoring::{ScoreBreakdown, ScoreCalculator};
pub use service::{evaluate, ActivationReceipt, Evaluation, EvaluationService};
pub use weights::{WeightDocument, WeightTable, WeightTableStore};
