//! Percentile bands and the ranked tier ladder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ranked tiers; declaration order is the total order (`Iron` lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Emerald,
    Platinum,
    Diamond,
    Master,
    Mythic,
    Legend,
}

/// Broad visual treatment a client renders a tier badge with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visual {
    Prismatic,
    Radiant,
    Gleaming,
    Metallic,
    Muted,
}

/// Descriptive metadata attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierProfile {
    pub tier: Tier,
    pub label: &'static str,
    pub code: &'static str,
    pub description: &'static str,
    pub visual: Visual,
}

/// A percentile band; `upper_bound` is inclusive and `None` marks the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub upper_bound: Option<f64>,
    pub tier: Tier,
}

/// Bands in ascending bound order, best tier first.
pub const BANDS: [Band; 10] = [
    band(Some(0.01), Tier::Legend),
    band(Some(0.05), Tier::Mythic),
    band(Some(0.5), Tier::Master),
    band(Some(3.0), Tier::Diamond),
    band(Some(15.0), Tier::Platinum),
    band(Some(35.0), Tier::Emerald),
    band(Some(50.0), Tier::Gold),
    band(Some(65.0), Tier::Silver),
    band(Some(85.0), Tier::Bronze),
    band(None, Tier::Iron),
];

const fn band(upper_bound: Option<f64>, tier: Tier) -> Band {
    Band { upper_bound, tier }
}

static PROFILES: [TierProfile; 10] = [
    profile(
        Tier::Iron,
        "Iron",
        "D",
        "Below the upper 85% of the population.",
        Visual::Muted,
    ),
    profile(
        Tier::Bronze,
        "Bronze",
        "C",
        "Within the upper 85% of the population.",
        Visual::Muted,
    ),
    profile(
        Tier::Silver,
        "Silver",
        "C+",
        "Within the upper 65% of the population.",
        Visual::Metallic,
    ),
    profile(
        Tier::Gold,
        "Gold",
        "B",
        "Within the upper half of the population.",
        Visual::Metallic,
    ),
    profile(
        Tier::Emerald,
        "Emerald",
        "B+",
        "Within the upper 35% of the population.",
        Visual::Gleaming,
    ),
    profile(
        Tier::Platinum,
        "Platinum",
        "A",
        "Within the upper 15% of the population.",
        Visual::Gleaming,
    ),
    profile(
        Tier::Diamond,
        "Diamond",
        "A+",
        "Within the upper 3% of the population.",
        Visual::Radiant,
    ),
    profile(
        Tier::Master,
        "Master",
        "S",
        "Within the upper 0.5% of the population.",
        Visual::Radiant,
    ),
    profile(
        Tier::Mythic,
        "Mythic",
        "SS",
        "Within the upper 0.05% of the population.",
        Visual::Prismatic,
    ),
    profile(
        Tier::Legend,
        "Legend",
        "SSS",
        "Within the upper 0.01% of the population.",
        Visual::Prismatic,
    ),
];

const fn profile(
    tier: Tier,
    label: &'static str,
    code: &'static str,
    description: &'static str,
    visual: Visual,
) -> TierProfile {
    TierProfile {
        tier,
        label,
        code,
        description,
        visual,
    }
}

impl Tier {
    /// Best tier first.
    pub const RANKED: [Tier; 10] = [
        Tier::Legend,
        Tier::Mythic,
        Tier::Master,
        Tier::Diamond,
        Tier::Platinum,
        Tier::Emerald,
        Tier::Gold,
        Tier::Silver,
        Tier::Bronze,
        Tier::Iron,
    ];

    /// Zero for the lowest tier, increasing toward the best.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    pub fn profile(self) -> &'static TierProfile {
        &PROFILES[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.profile().label
    }

    pub fn code(self) -> &'static str {
        self.profile().code
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Tier::RANKED
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownTier(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tier '{0}'")]
pub struct UnknownTier(pub String);

/// Resolve a percentile to its band. Ties resolve to the better band; anything above
/// the last bound, including `NaN`, falls through to the catch-all.
pub fn grade(percentile: f64) -> &'static TierProfile {
    BANDS
        .iter()
        .find(|band| match band.upper_bound {
            Some(bound) => percentile <= bound,
            None => true,
        })
        .map_or(Tier::Iron, |band| band.tier)
        .profile()
}
