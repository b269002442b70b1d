use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Category, Gender};
use crate::weights::{CombinationRule, CATEGORY_MAX};

/// Upper bound of the aggregate score.
pub const AGGREGATE_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaleTotals {
    pub economic: f64,
    pub physical: f64,
    pub personality: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FemaleTotals {
    pub physical: f64,
    pub personality: f64,
    pub values: f64,
}

/// Per-category totals, shaped by gender.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryTotals {
    Male(MaleTotals),
    Female(FemaleTotals),
}

impl CategoryTotals {
    fn from_sums(gender: Gender, sums: &BTreeMap<Category, f64>) -> Self {
        let total = |category: Category| {
            sums.get(&category)
                .copied()
                .unwrap_or(0.0)
                .clamp(0.0, CATEGORY_MAX)
        };

        match gender {
            Gender::Male => CategoryTotals::Male(MaleTotals {
                economic: total(Category::Economic),
                physical: total(Category::Physical),
                personality: total(Category::Personality),
            }),
            Gender::Female => CategoryTotals::Female(FemaleTotals {
                physical: total(Category::Physical),
                personality: total(Category::Personality),
                values: total(Category::Values),
            }),
        }
    }

    pub fn gender(&self) -> Gender {
        match self {
            CategoryTotals::Male(_) => Gender::Male,
            CategoryTotals::Female(_) => Gender::Female,
        }
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        match (self, category) {
            (CategoryTotals::Male(totals), Category::Economic) => Some(totals.economic),
            (CategoryTotals::Male(totals), Category::Physical) => Some(totals.physical),
            (CategoryTotals::Male(totals), Category::Personality) => Some(totals.personality),
            (CategoryTotals::Female(totals), Category::Physical) => Some(totals.physical),
            (CategoryTotals::Female(totals), Category::Personality) => Some(totals.personality),
            (CategoryTotals::Female(totals), Category::Values) => Some(totals.values),
            _ => None,
        }
    }

    /// Totals in the gender's category order.
    pub fn entries(&self) -> [(Category, f64); 3] {
        self.gender()
            .categories()
            .map(|category| (category, self.get(category).unwrap_or(0.0)))
    }
}

/// Scoring output for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub gender: Gender,
    pub categories: CategoryTotals,
    pub aggregate: f64,
    pub weight_version: String,
}

impl ScoreBreakdown {
    pub(crate) fn assemble(
        gender: Gender,
        sums: &BTreeMap<Category, f64>,
        combination: &CombinationRule,
        weight_version: &str,
    ) -> Self {
        let categories = CategoryTotals::from_sums(gender, sums);
        let aggregate = categories
            .entries()
            .iter()
            .map(|(category, total)| total * combination.multiplier(*category))
            .sum::<f64>()
            .clamp(0.0, AGGREGATE_MAX);

        Self {
            gender,
            categories,
            aggregate,
            weight_version: weight_version.to_string(),
        }
    }

    /// Aggregate rescaled onto the 0-10 scale used by the percentile model.
    pub fn normalized(&self) -> f64 {
        self.aggregate / 10.0
    }
}
