use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tier_engine::access::{check_daily_limit, decide_view, ViewDecision, ViewRequest};
use tier_engine::grade::{Visual, BANDS};
use tier_engine::{
    ActivationReceipt, Answer, Evaluation, Gender, QuestionSet, UserId, WeightDocument,
};
use tracing::info;

use crate::error::AppError;
use crate::infra::{AppState, StoredEvaluation};

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/questions/:gender", get(questions_handler))
        .route("/api/v1/tiers", get(tiers_handler))
        .route("/api/v1/evaluations", post(evaluate_handler))
        .route(
            "/api/v1/users/:user_id/evaluation",
            post(store_evaluation_handler).get(fetch_evaluation_handler),
        )
        .route("/api/v1/weights/active", get(active_weights_handler))
        .route("/api/v1/admin/weights", put(activate_weights_handler))
        .route("/api/v1/profiles/view", post(profile_view_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluationRequest {
    pub(crate) gender: Gender,
    pub(crate) answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TierBandView {
    pub(crate) tier: &'static str,
    pub(crate) code: &'static str,
    pub(crate) description: &'static str,
    pub(crate) visual: Visual,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_percentile: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileViewRequest {
    pub(crate) viewer_id: UserId,
    pub(crate) viewer_tier: String,
    pub(crate) target_tier: String,
    pub(crate) plan_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileViewResponse {
    #[serde(flatten)]
    pub(crate) decision: ViewDecision,
    pub(crate) views_today: u32,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}

pub(crate) async fn questions_handler(
    State(state): State<AppState>,
    Path(gender): Path<String>,
) -> Result<Response, AppError> {
    let gender = match gender.parse::<Gender>() {
        Ok(gender) => gender,
        Err(err) => return Ok(error_response(StatusCode::BAD_REQUEST, err.to_string())),
    };

    let questions: QuestionSet = state.service.questions(gender)?;
    Ok(Json(questions).into_response())
}

pub(crate) async fn tiers_handler() -> Json<Vec<TierBandView>> {
    let bands = BANDS
        .iter()
        .map(|band| {
            let profile = band.tier.profile();
            TierBandView {
                tier: profile.label,
                code: profile.code,
                description: profile.description,
                visual: profile.visual,
                max_percentile: band.upper_bound,
            }
        })
        .collect();
    Json(bands)
}

pub(crate) async fn evaluate_handler(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<Evaluation>, AppError> {
    let evaluation = state.service.evaluate(request.gender, &request.answers)?;
    info!(
        gender = %request.gender,
        tier = %evaluation.tier(),
        "evaluated anonymous submission"
    );
    Ok(Json(evaluation))
}

pub(crate) async fn store_evaluation_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<StoredEvaluation>, AppError> {
    let evaluation = state.service.evaluate(request.gender, &request.answers)?;
    let record = StoredEvaluation {
        user_id: UserId(user_id),
        evaluated_at: Utc::now(),
        evaluation,
    };
    state.evaluations.save(record.clone())?;
    info!(
        user_id = %record.user_id,
        tier = %record.evaluation.tier(),
        "stored evaluation"
    );
    Ok(Json(record))
}

pub(crate) async fn fetch_evaluation_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, AppError> {
    let user_id = UserId(user_id);
    match state.evaluations.fetch(&user_id)? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok(error_response(
            StatusCode::NOT_FOUND,
            format!("no evaluation stored for user '{user_id}'"),
        )),
    }
}

pub(crate) async fn active_weights_handler(
    State(state): State<AppState>,
) -> Result<Json<WeightDocument>, AppError> {
    let table = state.service.active_weights(Gender::Male)?;
    Ok(Json(WeightDocument::from(table.as_ref())))
}

pub(crate) async fn activate_weights_handler(
    State(state): State<AppState>,
    Json(document): Json<WeightDocument>,
) -> Result<Json<ActivationReceipt>, AppError> {
    let receipt = state.service.activate_weights(document)?;
    Ok(Json(receipt))
}

/// Gate a view and count it when granted. The read and the increment are not atomic.
pub(crate) async fn profile_view_handler(
    State(state): State<AppState>,
    Json(request): Json<ProfileViewRequest>,
) -> Result<Json<ProfileViewResponse>, AppError> {
    let today = Utc::now().date_naive();
    let views_today = state.views.views_on(&request.viewer_id, today)?;

    let mut decision = decide_view(
        &ViewRequest {
            viewer_tier: request.viewer_tier,
            target_tier: request.target_tier,
            plan_id: request.plan_id.clone(),
            views_today,
        },
        &state.plans,
    );

    if !decision.allowed {
        info!(
            viewer = %request.viewer_id,
            reason = ?decision.reason,
            "profile view denied"
        );
        return Ok(Json(ProfileViewResponse {
            decision,
            views_today,
        }));
    }

    let views_today = state.views.record_view(&request.viewer_id, today)?;
    if let Some(plan) = state.plans.get(&request.plan_id) {
        decision.remaining = Some(check_daily_limit(views_today, plan).remaining);
    }

    Ok(Json(ProfileViewResponse {
        decision,
        views_today,
    }))
}
