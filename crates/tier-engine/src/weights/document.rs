use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{
    CategoryWeights, CombinationRule, GenderWeights, WeightTable, CATEGORY_MAX, SUM_TOLERANCE,
};
use crate::domain::{Category, Gender, QuestionId};
use crate::error::ConfigurationError;

/// Loosely shaped weight configuration as received from the administrative channel.
///
/// Category keys stay strings here so missing or unexpected sub-trees can be reported
/// precisely during conversion into a [`WeightTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightDocument {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub male: Option<GenderWeightDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub female: Option<GenderWeightDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderWeightDocument {
    #[serde(default)]
    pub categories: BTreeMap<String, BTreeMap<String, f64>>,
    /// Category multipliers for the aggregate; equal shares when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combination: Option<BTreeMap<String, f64>>,
}

impl WeightDocument {
    pub fn from_json(raw: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(raw).map_err(|err| ConfigurationError::Malformed(err.to_string()))
    }

    fn sub_tree(&self, gender: Gender) -> Option<&GenderWeightDocument> {
        match gender {
            Gender::Male => self.male.as_ref(),
            Gender::Female => self.female.as_ref(),
        }
    }
}

impl TryFrom<WeightDocument> for WeightTable {
    type Error = ConfigurationError;

    fn try_from(document: WeightDocument) -> Result<Self, Self::Error> {
        let version = document.version.trim().to_string();
        if version.is_empty() {
            return Err(ConfigurationError::MissingVersion);
        }

        match (
            gender_weights(&document, Gender::Male),
            gender_weights(&document, Gender::Female),
        ) {
            (Ok(male), Ok(female)) => Ok(WeightTable {
                version,
                male,
                female,
            }),
            (Err(err), _) | (_, Err(err)) => {
                warn!(%err, %version, "rejected weight document");
                Err(err)
            }
        }
    }
}

impl From<&WeightTable> for WeightDocument {
    fn from(table: &WeightTable) -> Self {
        Self {
            version: table.version.clone(),
            male: Some(GenderWeightDocument::from(&table.male)),
            female: Some(GenderWeightDocument::from(&table.female)),
        }
    }
}

impl From<&GenderWeights> for GenderWeightDocument {
    fn from(weights: &GenderWeights) -> Self {
        let categories = weights
            .categories
            .iter()
            .map(|(category, entries)| {
                let entries = entries
                    .iter()
                    .map(|(id, weight)| (id.0.clone(), weight))
                    .collect();
                (category.label().to_string(), entries)
            })
            .collect();
        let combination = weights
            .combination
            .iter()
            .map(|(category, value)| (category.label().to_string(), value))
            .collect();

        Self {
            categories,
            combination: Some(combination),
        }
    }
}

fn gender_weights(
    document: &WeightDocument,
    gender: Gender,
) -> Result<GenderWeights, ConfigurationError> {
    let tree = document
        .sub_tree(gender)
        .ok_or(ConfigurationError::MissingGender { gender })?;

    let categories = parse_categories(gender, &tree.categories)?;
    let combination = match &tree.combination {
        Some(raw) => parse_combination(gender, raw)?,
        None => CombinationRule::equal(gender),
    };

    Ok(GenderWeights {
        gender,
        categories,
        combination,
    })
}

fn category_key(gender: Gender, key: &str) -> Result<Category, ConfigurationError> {
    key.parse::<Category>()
        .ok()
        .filter(|category| gender.has_category(*category))
        .ok_or_else(|| ConfigurationError::UnexpectedCategory {
            gender,
            key: key.to_string(),
        })
}

fn parse_categories(
    gender: Gender,
    raw: &BTreeMap<String, BTreeMap<String, f64>>,
) -> Result<BTreeMap<Category, CategoryWeights>, ConfigurationError> {
    let mut categories = BTreeMap::new();
    for (key, entries) in raw {
        let category = category_key(gender, key)?;

        let mut weights = BTreeMap::new();
        for (id, weight) in entries {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ConfigurationError::InvalidWeight {
                    question_id: QuestionId(id.clone()),
                    weight: *weight,
                });
            }
            weights.insert(QuestionId(id.clone()), *weight);
        }

        let weights = CategoryWeights { weights };
        let sum = weights.total();
        if (sum - CATEGORY_MAX).abs() > SUM_TOLERANCE {
            return Err(ConfigurationError::UnbalancedCategory {
                gender,
                category,
                sum,
                expected: CATEGORY_MAX,
            });
        }
        categories.insert(category, weights);
    }

    if let Some(category) = gender
        .categories()
        .into_iter()
        .find(|category| !categories.contains_key(category))
    {
        return Err(ConfigurationError::MissingCategory { gender, category });
    }

    Ok(categories)
}

fn parse_combination(
    gender: Gender,
    raw: &BTreeMap<String, f64>,
) -> Result<CombinationRule, ConfigurationError> {
    let mut multipliers = BTreeMap::new();
    for (key, value) in raw {
        let category = category_key(gender, key)?;
        if !value.is_finite() || *value < 0.0 {
            return Err(ConfigurationError::InvalidMultiplier {
                gender,
                category,
                value: *value,
            });
        }
        multipliers.insert(category, *value);
    }

    if let Some(category) = gender
        .categories()
        .into_iter()
        .find(|category| !multipliers.contains_key(category))
    {
        return Err(ConfigurationError::MissingCategory { gender, category });
    }

    let sum: f64 = multipliers.values().sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(ConfigurationError::UnbalancedCombination { gender, sum });
    }

    Ok(CombinationRule { multipliers })
}
