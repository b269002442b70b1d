use std::sync::{Arc, RwLock};

use crate::catalog::{AnswerKind, Applicability, Question, QuestionCatalog, SelectOption};
use crate::domain::{Answer, Category, Gender, QuestionId};
use crate::error::StoreError;
use crate::percentile::PercentileModel;
use crate::service::EvaluationService;
use crate::weights::{WeightDocument, WeightTable, WeightTableStore};

fn ranged(
    id: &str,
    category: Category,
    applies_to: Applicability,
    required: bool,
    min: f64,
    max: f64,
) -> Question {
    Question {
        id: QuestionId::from(id),
        category,
        applies_to,
        required,
        prompt: String::new(),
        kind: AnswerKind::Ranged { min, max },
    }
}

fn select(id: &str, category: Category, applies_to: Applicability, options: &[(&str, f64)]) -> Question {
    Question {
        id: QuestionId::from(id),
        category,
        applies_to,
        required: false,
        prompt: String::new(),
        kind: AnswerKind::Select {
            options: options
                .iter()
                .map(|(value, score)| SelectOption {
                    value: (*value).to_string(),
                    score: *score,
                })
                .collect(),
        },
    }
}

pub(super) fn catalog() -> QuestionCatalog {
    QuestionCatalog::new(vec![
        ranged(
            "economic.income",
            Category::Economic,
            Applicability::Male,
            true,
            0.0,
            200.0,
        ),
        select(
            "economic.education",
            Category::Economic,
            Applicability::Male,
            &[("none", 0.0), ("bachelor", 0.5), ("graduate", 1.0)],
        ),
        ranged(
            "physical.height",
            Category::Physical,
            Applicability::Male,
            true,
            150.0,
            190.0,
        ),
        select(
            "physical.fitness",
            Category::Physical,
            Applicability::Both,
            &[("rarely", 0.0), ("weekly", 0.5), ("daily", 1.0)],
        ),
        ranged(
            "physical.style",
            Category::Physical,
            Applicability::Female,
            false,
            1.0,
            10.0,
        ),
        ranged(
            "personality.humor",
            Category::Personality,
            Applicability::Both,
            true,
            0.0,
            10.0,
        ),
        ranged(
            "values.family",
            Category::Values,
            Applicability::Female,
            true,
            1.0,
            10.0,
        ),
        select(
            "values.lifestyle",
            Category::Values,
            Applicability::Female,
            &[("homebody", 0.3), ("balanced", 0.7), ("adventurous", 1.0)],
        ),
    ])
    .expect("fixture catalog validates")
}

pub(super) fn weight_document(version: &str) -> WeightDocument {
    let raw = format!(
        r#"{{
            "version": "{version}",
            "male": {{
                "categories": {{
                    "economic": {{"economic.income": 60, "economic.education": 40}},
                    "physical": {{"physical.height": 50, "physical.fitness": 50}},
                    "personality": {{"personality.humor": 100}}
                }}
            }},
            "female": {{
                "categories": {{
                    "physical": {{"physical.fitness": 40, "physical.style": 60}},
                    "personality": {{"personality.humor": 100}},
                    "values": {{"values.family": 70, "values.lifestyle": 30}}
                }}
            }}
        }}"#
    );
    WeightDocument::from_json(&raw).expect("fixture weights parse")
}

pub(super) fn weight_table(version: &str) -> WeightTable {
    WeightTable::try_from(weight_document(version)).expect("fixture weights validate")
}

/// Every male category lands on exactly 50.
pub(super) fn midpoint_male_answers() -> Vec<Answer> {
    vec![
        Answer::number("economic.income", 100.0),
        Answer::choice("economic.education", "bachelor"),
        Answer::number("physical.height", 170.0),
        Answer::choice("physical.fitness", "weekly"),
        Answer::number("personality.humor", 5.0),
    ]
}

/// Every male category lands on 80.
pub(super) fn strong_male_answers() -> Vec<Answer> {
    vec![
        Answer::number("economic.income", 200.0),
        Answer::choice("economic.education", "bachelor"),
        Answer::number("physical.height", 174.0),
        Answer::choice("physical.fitness", "daily"),
        Answer::number("personality.humor", 8.0),
    ]
}

pub(super) fn female_answers() -> Vec<Answer> {
    vec![
        Answer::choice("physical.fitness", "daily"),
        Answer::number("physical.style", 10.0),
        Answer::number("personality.humor", 10.0),
        Answer::number("values.family", 10.0),
        Answer::choice("values.lifestyle", "adventurous"),
    ]
}

#[derive(Default)]
pub(super) struct MemoryWeights {
    active: RwLock<Option<Arc<WeightTable>>>,
}

impl MemoryWeights {
    pub(super) fn with_active(table: WeightTable) -> Self {
        Self {
            active: RwLock::new(Some(Arc::new(table))),
        }
    }
}

impl WeightTableStore for MemoryWeights {
    fn active(&self) -> Result<Option<Arc<WeightTable>>, StoreError> {
        Ok(self.active.read().expect("weights lock poisoned").clone())
    }

    fn activate(&self, table: WeightTable) -> Result<Option<String>, StoreError> {
        let mut guard = self.active.write().expect("weights lock poisoned");
        let previous = guard.replace(Arc::new(table));
        Ok(previous.map(|table| table.version().to_string()))
    }
}

pub(super) struct OfflineWeights;

impl WeightTableStore for OfflineWeights {
    fn active(&self) -> Result<Option<Arc<WeightTable>>, StoreError> {
        Err(StoreError::Unavailable("weights offline".to_string()))
    }

    fn activate(&self, _table: WeightTable) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("weights offline".to_string()))
    }
}

pub(super) fn build_service(
    weights: MemoryWeights,
) -> (
    EvaluationService<QuestionCatalog, MemoryWeights>,
    Arc<MemoryWeights>,
) {
    let weights = Arc::new(weights);
    let service = EvaluationService::new(
        Arc::new(catalog()),
        weights.clone(),
        PercentileModel::default(),
    );
    (service, weights)
}

pub(super) fn male_questions() -> crate::catalog::QuestionSet {
    catalog().for_gender(Gender::Male)
}
