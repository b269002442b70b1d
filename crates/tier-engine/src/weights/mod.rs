//! Versioned per-gender weight tables.
//!
//! A [`WeightTable`] is only ever built from a validated [`WeightDocument`], so holding one
//! means every category sub-tree is present, balanced, and combinable.

mod document;
mod store;

pub use document::{GenderWeightDocument, WeightDocument};
pub use store::WeightTableStore;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::QuestionSet;
use crate::domain::{Category, Gender, QuestionId};
use crate::error::ConfigurationError;

/// Maximum achievable total for every category.
pub const CATEGORY_MAX: f64 = 100.0;

pub(crate) const SUM_TOLERANCE: f64 = 1e-6;

/// Question weights for one category. Weights sum to [`CATEGORY_MAX`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWeights {
    weights: BTreeMap<QuestionId, f64>,
}

impl CategoryWeights {
    pub fn get(&self, question_id: &QuestionId) -> Option<f64> {
        self.weights.get(question_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, f64)> {
        self.weights.iter().map(|(id, weight)| (id, *weight))
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }
}

/// Per-gender rule folding category totals into the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationRule {
    multipliers: BTreeMap<Category, f64>,
}

impl CombinationRule {
    pub fn equal(gender: Gender) -> Self {
        let categories = gender.categories();
        let share = 1.0 / categories.len() as f64;
        Self {
            multipliers: categories.iter().map(|category| (*category, share)).collect(),
        }
    }

    pub fn multiplier(&self, category: Category) -> f64 {
        self.multipliers.get(&category).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.multipliers
            .iter()
            .map(|(category, value)| (*category, *value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderWeights {
    gender: Gender,
    categories: BTreeMap<Category, CategoryWeights>,
    combination: CombinationRule,
}

impl GenderWeights {
    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn category(&self, category: Category) -> Option<&CategoryWeights> {
        self.categories.get(&category)
    }

    pub fn weight_of(&self, category: Category, question_id: &QuestionId) -> Option<f64> {
        self.category(category)
            .and_then(|weights| weights.get(question_id))
    }

    pub fn combination(&self) -> &CombinationRule {
        &self.combination
    }

    /// Confirms every question in `questions` carries a weight in its category, and that
    /// every weight belongs to one of those questions.
    pub fn check_coverage(&self, questions: &QuestionSet) -> Result<(), ConfigurationError> {
        if let Some(question) = questions
            .iter()
            .find(|question| self.weight_of(question.category, &question.id).is_none())
        {
            return Err(ConfigurationError::UnweightedQuestion {
                gender: self.gender,
                question_id: question.id.clone(),
            });
        }

        for (category, weights) in &self.categories {
            let orphan = weights.iter().find(|(question_id, _)| {
                questions
                    .get(question_id)
                    .map_or(true, |question| question.category != *category)
            });
            if let Some((question_id, _)) = orphan {
                return Err(ConfigurationError::OrphanWeight {
                    gender: self.gender,
                    category: *category,
                    question_id: question_id.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Complete, named weight configuration covering both genders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTable {
    version: String,
    male: GenderWeights,
    female: GenderWeights,
}

impl WeightTable {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn for_gender(&self, gender: Gender) -> &GenderWeights {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigurationError> {
        WeightDocument::from_json(raw)?.try_into()
    }
}
