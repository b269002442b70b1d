use serde::{Deserialize, Serialize};

use super::plan::{SubscriptionPlan, TierAccess, ViewAllowance};
use crate::grade::Tier;

/// Outcome of a tier access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Granted,
    Denied(DenialReason),
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }

    pub fn summary(&self) -> String {
        match self {
            AccessDecision::Granted => "view granted".to_string(),
            AccessDecision::Denied(reason) => reason.summary(),
        }
    }
}

/// Why a view was refused. Every unknown input lands here rather than in an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    UnknownTier { name: String },
    UnknownPlan { id: String },
    TierAboveViewer { viewer: Tier, target: Tier },
    DailyLimitReached { limit: u32 },
}

impl DenialReason {
    pub fn summary(&self) -> String {
        match self {
            DenialReason::UnknownTier { name } => format!("denied: unknown tier '{name}'"),
            DenialReason::UnknownPlan { id } => format!("denied: unknown plan '{id}'"),
            DenialReason::TierAboveViewer { viewer, target } => {
                format!("denied: {target} profiles are above a {viewer} viewer's plan")
            }
            DenialReason::DailyLimitReached { limit } => {
                format!("denied: daily limit of {limit} views reached")
            }
        }
    }
}

/// Result of a daily quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLimitCheck {
    pub allowed: bool,
    pub remaining: ViewAllowance,
}

/// Tier access by name. Unrecognized names deny, whatever the plan.
pub fn can_access_tier(
    viewer_tier: &str,
    target_tier: &str,
    plan: &SubscriptionPlan,
) -> AccessDecision {
    let viewer = match viewer_tier.parse::<Tier>() {
        Ok(tier) => tier,
        Err(unknown) => return AccessDecision::Denied(DenialReason::UnknownTier { name: unknown.0 }),
    };
    let target = match target_tier.parse::<Tier>() {
        Ok(tier) => tier,
        Err(unknown) => return AccessDecision::Denied(DenialReason::UnknownTier { name: unknown.0 }),
    };

    can_access(viewer, target, plan)
}

pub fn can_access(viewer: Tier, target: Tier, plan: &SubscriptionPlan) -> AccessDecision {
    match plan.tier_access {
        TierAccess::AllTiers => AccessDecision::Granted,
        TierAccess::OwnTierOrBelow if target <= viewer => AccessDecision::Granted,
        TierAccess::OwnTierOrBelow => {
            AccessDecision::Denied(DenialReason::TierAboveViewer { viewer, target })
        }
    }
}

pub fn check_daily_limit(view_count: u32, plan: &SubscriptionPlan) -> DailyLimitCheck {
    match plan.daily_view_limit {
        ViewAllowance::Unlimited => DailyLimitCheck {
            allowed: true,
            remaining: ViewAllowance::Unlimited,
        },
        ViewAllowance::Limited(limit) => DailyLimitCheck {
            allowed: view_count < limit,
            remaining: ViewAllowance::Limited(limit.saturating_sub(view_count)),
        },
    }
}
