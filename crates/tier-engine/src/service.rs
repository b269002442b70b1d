use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{QuestionCatalogProvider, QuestionSet};
use crate::domain::{Answer, Gender};
use crate::error::EvaluationError;
use crate::grade::{self, Tier, TierProfile};
use crate::percentile::{PercentileModel, PercentileResult};
use crate::scoring::{ScoreBreakdown, ScoreCalculator};
use crate::weights::{WeightDocument, WeightTable, WeightTableStore};

/// Full pipeline output: breakdown, percentile, and tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub breakdown: ScoreBreakdown,
    pub percentile: PercentileResult,
    pub grade: &'static TierProfile,
}

impl Evaluation {
    pub fn tier(&self) -> Tier {
        self.grade.tier
    }
}

/// Acknowledgement returned after a weight table becomes active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationReceipt {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deactivated: Option<String>,
}

/// Run scoring, percentile, and grading over snapshots the caller already holds.
pub fn evaluate(
    questions: &QuestionSet,
    answers: &[Answer],
    table: &WeightTable,
    model: &PercentileModel,
) -> Result<Evaluation, EvaluationError> {
    let breakdown = ScoreCalculator::new(questions).calculate(answers, table)?;
    let percentile = model.percentile(breakdown.normalized());
    let grade = grade::grade(percentile.precise);

    debug!(
        gender = %breakdown.gender,
        aggregate = breakdown.aggregate,
        percentile = percentile.value,
        tier = %grade.tier,
        "evaluated answers"
    );

    Ok(Evaluation {
        breakdown,
        percentile,
        grade,
    })
}

/// Facade composing the catalog provider, the weight store, and the percentile model.
pub struct EvaluationService<C, W> {
    catalog: Arc<C>,
    weights: Arc<W>,
    model: PercentileModel,
}

impl<C, W> EvaluationService<C, W>
where
    C: QuestionCatalogProvider + 'static,
    W: WeightTableStore + 'static,
{
    pub fn new(catalog: Arc<C>, weights: Arc<W>, model: PercentileModel) -> Self {
        Self {
            catalog,
            weights,
            model,
        }
    }

    pub fn model(&self) -> &PercentileModel {
        &self.model
    }

    pub fn questions(&self, gender: Gender) -> Result<QuestionSet, EvaluationError> {
        Ok(self.catalog.questions(gender)?)
    }

    /// The active table, as a snapshot that stays consistent for the caller's lifetime.
    pub fn active_weights(&self, gender: Gender) -> Result<Arc<WeightTable>, EvaluationError> {
        self.weights
            .active()?
            .ok_or(EvaluationError::NotFound { gender })
    }

    /// Evaluate `answers`, reading the catalog and the active table exactly once.
    pub fn evaluate(
        &self,
        gender: Gender,
        answers: &[Answer],
    ) -> Result<Evaluation, EvaluationError> {
        let table = self.active_weights(gender)?;
        let questions = self.questions(gender)?;
        evaluate(&questions, answers, &table, &self.model)
    }

    /// Validate a weight document against both question sets and make it active.
    pub fn activate_weights(
        &self,
        document: WeightDocument,
    ) -> Result<ActivationReceipt, EvaluationError> {
        let table = WeightTable::try_from(document)?;
        for gender in Gender::ALL {
            let questions = self.questions(gender)?;
            table.for_gender(gender).check_coverage(&questions)?;
        }

        let version = table.version().to_string();
        let deactivated = self.weights.activate(table)?;
        info!(%version, deactivated = ?deactivated, "activated weight table");

        Ok(ActivationReceipt {
            version,
            deactivated,
        })
    }
}
