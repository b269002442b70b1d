//! Tier entitlements and daily view quotas.
//!
//! These checks are advisory soft limits. Counters are read and incremented by the
//! caller, so concurrent views from one user may overshoot a quota slightly.

mod plan;
mod policy;
mod quota;

pub use plan::{PlanCatalog, PlanId, SubscriptionPlan, TierAccess, ViewAllowance};
pub use policy::{
    can_access, can_access_tier, check_daily_limit, AccessDecision, DailyLimitCheck,
    DenialReason,
};
pub use quota::ViewQuota;

use serde::{Deserialize, Serialize};

/// Inputs for gating a single profile view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub viewer_tier: String,
    pub target_tier: String,
    pub plan_id: String,
    pub views_today: u32,
}

/// Combined tier and quota decision for a profile view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<ViewAllowance>,
}

impl ViewDecision {
    fn denied(reason: DenialReason, remaining: Option<ViewAllowance>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            remaining,
        }
    }
}

/// Resolve the plan, then check tier access, then the daily quota. A missing plan
/// denies without a remaining count.
pub fn decide_view(request: &ViewRequest, plans: &PlanCatalog) -> ViewDecision {
    let Some(plan) = plans.get(&request.plan_id) else {
        return ViewDecision::denied(
            DenialReason::UnknownPlan {
                id: request.plan_id.clone(),
            },
            None,
        );
    };

    let quota = check_daily_limit(request.views_today, plan);

    if let AccessDecision::Denied(reason) =
        can_access_tier(&request.viewer_tier, &request.target_tier, plan)
    {
        return ViewDecision::denied(reason, Some(quota.remaining));
    }

    if !quota.allowed {
        let limit = match plan.daily_view_limit {
            ViewAllowance::Limited(limit) => limit,
            ViewAllowance::Unlimited => u32::MAX,
        };
        return ViewDecision::denied(
            DenialReason::DailyLimitReached { limit },
            Some(quota.remaining),
        );
    }

    ViewDecision {
        allowed: true,
        reason: None,
        remaining: Some(quota.remaining),
    }
}
