use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tier_engine::access::{PlanCatalog, ViewQuota};
use tier_engine::{
    Evaluation, EvaluationService, QuestionCatalog, StoreError, UserId, WeightDocument,
    WeightTable, WeightTableStore,
};
use tracing::info;

use crate::config::ScoringConfig;
use crate::error::AppError;

const BUILTIN_QUESTIONS: &str = include_str!("../config/questions.json");
const BUILTIN_WEIGHTS: &str = include_str!("../config/weights.json");

pub(crate) type TierService = EvaluationService<QuestionCatalog, InMemoryWeightStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Option<Arc<PrometheusHandle>>,
    pub(crate) service: Arc<TierService>,
    pub(crate) plans: Arc<PlanCatalog>,
    pub(crate) evaluations: Arc<InMemoryEvaluationStore>,
    pub(crate) views: Arc<InMemoryViewCounter>,
}

impl AppState {
    pub(crate) fn new(service: Arc<TierService>, plans: PlanCatalog) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: None,
            service,
            plans: Arc::new(plans),
            evaluations: Arc::new(InMemoryEvaluationStore::default()),
            views: Arc::new(InMemoryViewCounter::default()),
        }
    }

    pub(crate) fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(Arc::new(handle));
        self
    }
}

fn poisoned(what: &str) -> StoreError {
    StoreError::Unavailable(format!("{what} lock poisoned"))
}

/// Active weight table held behind a single `Arc` swap.
#[derive(Default)]
pub(crate) struct InMemoryWeightStore {
    active: RwLock<Option<Arc<WeightTable>>>,
}

impl WeightTableStore for InMemoryWeightStore {
    fn active(&self) -> Result<Option<Arc<WeightTable>>, StoreError> {
        let guard = self.active.read().map_err(|_| poisoned("weight table"))?;
        Ok(guard.clone())
    }

    fn activate(&self, table: WeightTable) -> Result<Option<String>, StoreError> {
        let mut guard = self.active.write().map_err(|_| poisoned("weight table"))?;
        let previous = guard.replace(Arc::new(table));
        Ok(previous.map(|table| table.version().to_string()))
    }
}

/// The most recent evaluation kept for a user.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct StoredEvaluation {
    pub(crate) user_id: UserId,
    pub(crate) evaluated_at: DateTime<Utc>,
    pub(crate) evaluation: Evaluation,
}

#[derive(Default)]
pub(crate) struct InMemoryEvaluationStore {
    records: Mutex<HashMap<UserId, StoredEvaluation>>,
}

impl InMemoryEvaluationStore {
    pub(crate) fn save(&self, record: StoredEvaluation) -> Result<(), StoreError> {
        let mut guard = self.records.lock().map_err(|_| poisoned("evaluation store"))?;
        guard.insert(record.user_id.clone(), record);
        Ok(())
    }

    pub(crate) fn fetch(&self, user_id: &UserId) -> Result<Option<StoredEvaluation>, StoreError> {
        let guard = self.records.lock().map_err(|_| poisoned("evaluation store"))?;
        Ok(guard.get(user_id).cloned())
    }
}

/// Daily view counters. Reads and increments are separate calls, so concurrent views
/// from one user can both pass a nearly exhausted quota.
#[derive(Default)]
pub(crate) struct InMemoryViewCounter {
    quotas: Mutex<HashMap<UserId, ViewQuota>>,
}

impl InMemoryViewCounter {
    pub(crate) fn views_on(&self, user_id: &UserId, day: NaiveDate) -> Result<u32, StoreError> {
        let guard = self.quotas.lock().map_err(|_| poisoned("view counter"))?;
        Ok(guard.get(user_id).map_or(0, |quota| quota.count_on(day)))
    }

    pub(crate) fn record_view(&self, user_id: &UserId, day: NaiveDate) -> Result<u32, StoreError> {
        let mut guard = self.quotas.lock().map_err(|_| poisoned("view counter"))?;
        let next = match guard.get(user_id) {
            Some(quota) => quota.record_view(day),
            None => ViewQuota::new(user_id.clone(), day).record_view(day),
        };
        let count = next.count;
        guard.insert(user_id.clone(), next);
        Ok(count)
    }
}

pub(crate) fn builtin_catalog() -> Result<QuestionCatalog, AppError> {
    Ok(QuestionCatalog::from_json(BUILTIN_QUESTIONS)?)
}

pub(crate) fn builtin_weights() -> Result<WeightDocument, AppError> {
    Ok(WeightDocument::from_json(BUILTIN_WEIGHTS)?)
}

/// Weight document from `path`, or the built-in one.
pub(crate) fn load_weights(path: Option<&Path>) -> Result<WeightDocument, AppError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(WeightDocument::from_json(&raw)?)
        }
        None => builtin_weights(),
    }
}

/// Plan list from `path`, or the standard free/plus/premium set.
pub(crate) fn load_plans(path: Option<&Path>) -> Result<PlanCatalog, AppError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(PlanCatalog::from_json(&raw)?)
        }
        None => Ok(PlanCatalog::standard()),
    }
}

/// Evaluation service over the built-in catalog with the configured weights already active.
pub(crate) fn build_service(config: &ScoringConfig) -> Result<Arc<TierService>, AppError> {
    let service = EvaluationService::new(
        Arc::new(builtin_catalog()?),
        Arc::new(InMemoryWeightStore::default()),
        config.model()?,
    );

    let document = load_weights(config.weights_path.as_deref())?;
    let receipt = service.activate_weights(document)?;
    info!(version = %receipt.version, "loaded weight table");

    Ok(Arc::new(service))
}
