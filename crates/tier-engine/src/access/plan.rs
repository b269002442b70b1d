use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ConfigurationError;

const UNLIMITED: &str = "unlimited";

/// Identifier wrapper for subscription plans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanId(pub String);

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A daily view count that is either bounded or unlimited. On the wire the unlimited
/// sentinel is the string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAllowance {
    Limited(u32),
    Unlimited,
}

impl fmt::Display for ViewAllowance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewAllowance::Limited(count) => write!(f, "{count}"),
            ViewAllowance::Unlimited => f.write_str(UNLIMITED),
        }
    }
}

impl Serialize for ViewAllowance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ViewAllowance::Limited(count) => serializer.serialize_u32(*count),
            ViewAllowance::Unlimited => serializer.serialize_str(UNLIMITED),
        }
    }
}

impl<'de> Deserialize<'de> for ViewAllowance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u32),
            Label(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(count) => Ok(ViewAllowance::Limited(count)),
            Raw::Label(label) if label.trim().eq_ignore_ascii_case(UNLIMITED) => {
                Ok(ViewAllowance::Unlimited)
            }
            Raw::Label(other) => Err(de::Error::custom(format!(
                "expected a view count or \"{UNLIMITED}\", found '{other}'"
            ))),
        }
    }
}

/// How far across the tier ladder a plan may browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierAccess {
    OwnTierOrBelow,
    AllTiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    pub id: PlanId,
    pub daily_view_limit: ViewAllowance,
    pub tier_access: TierAccess,
}

impl SubscriptionPlan {
    pub fn new(id: &str, daily_view_limit: ViewAllowance, tier_access: TierAccess) -> Self {
        Self {
            id: PlanId(id.to_string()),
            daily_view_limit,
            tier_access,
        }
    }
}

/// Named set of subscription plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanCatalog {
    plans: BTreeMap<PlanId, SubscriptionPlan>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<SubscriptionPlan>) -> Result<Self, ConfigurationError> {
        let mut indexed = BTreeMap::new();
        for plan in plans {
            if indexed.contains_key(&plan.id) {
                return Err(ConfigurationError::DuplicatePlan { id: plan.id.0 });
            }
            indexed.insert(plan.id.clone(), plan);
        }
        Ok(Self { plans: indexed })
    }

    /// Free, plus, and premium plans.
    pub fn standard() -> Self {
        let plans = [
            SubscriptionPlan::new(
                "free",
                ViewAllowance::Limited(30),
                TierAccess::OwnTierOrBelow,
            ),
            SubscriptionPlan::new("plus", ViewAllowance::Limited(100), TierAccess::AllTiers),
            SubscriptionPlan::new("premium", ViewAllowance::Unlimited, TierAccess::AllTiers),
        ];

        Self {
            plans: plans
                .into_iter()
                .map(|plan| (plan.id.clone(), plan))
                .collect(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigurationError> {
        let plans: Vec<SubscriptionPlan> = serde_json::from_str(raw)
            .map_err(|err| ConfigurationError::Malformed(err.to_string()))?;
        Self::new(plans)
    }

    /// Plan lookup; callers treat `None` as a deny.
    pub fn get(&self, id: &str) -> Option<&SubscriptionPlan> {
        self.plans.get(&PlanId(id.trim().to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubscriptionPlan> {
        self.plans.values()
    }
}
