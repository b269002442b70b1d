//! Score to population percentile under a normal model.
//!
//! Percentiles follow the "lower is rarer" convention: the share of the reference
//! population scoring at or above the input, expressed on 0-100.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

pub const DEFAULT_MEAN: f64 = 5.0;
pub const DEFAULT_STD_DEV: f64 = 1.5;

// Abramowitz & Stegun 7.1.26, |error| <= 1.5e-7.
const ERF_P: f64 = 0.327_591_1;
const ERF_A1: f64 = 0.254_829_592;
const ERF_A2: f64 = -0.284_496_736;
const ERF_A3: f64 = 1.421_413_741;
const ERF_A4: f64 = -1.453_152_027;
const ERF_A5: f64 = 1.061_405_429;

/// Error function via a five-term rational approximation.
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + ERF_P * x);
    let poly = ((((ERF_A5 * t + ERF_A4) * t + ERF_A3) * t + ERF_A2) * t + ERF_A1) * t;

    sign * (1.0 - poly * (-x * x).exp())
}

/// Normal distribution parameters for the reference population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileModel {
    mean: f64,
    std_dev: f64,
}

impl Default for PercentileModel {
    fn default() -> Self {
        Self {
            mean: DEFAULT_MEAN,
            std_dev: DEFAULT_STD_DEV,
        }
    }
}

impl PercentileModel {
    pub fn new(mean: f64, std_dev: f64) -> Result<Self, ConfigurationError> {
        if !mean.is_finite() || !std_dev.is_finite() || std_dev <= 0.0 {
            return Err(ConfigurationError::InvalidModel { mean, std_dev });
        }
        Ok(Self { mean, std_dev })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    pub fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / (self.std_dev * std::f64::consts::SQRT_2);
        0.5 * (1.0 + erf(z))
    }

    /// Percentile for a normalized (0-10) score.
    ///
    /// Total over `f64`: `NaN` is treated as the lowest possible score.
    pub fn percentile(&self, score: f64) -> PercentileResult {
        let precise = if score.is_nan() {
            100.0
        } else {
            round_to((1.0 - self.cdf(score)) * 100.0, PRECISE_SCALE).clamp(0.0, 100.0)
        };

        PercentileResult {
            score,
            value: round_to(precise, DISPLAY_SCALE),
            precise,
        }
    }
}

// One decimal for display; six for banding, which keeps Mythic reachable while absorbing
// float noise around exact band bounds.
const DISPLAY_SCALE: f64 = 10.0;
const PRECISE_SCALE: f64 = 1_000_000.0;

fn round_to(value: f64, scale: f64) -> f64 {
    (value * scale).round() / scale
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileResult {
    /// Normalized input score.
    pub score: f64,
    /// Rounded to one decimal place.
    pub value: f64,
    /// Rounded to six decimal places; tiers are graded on this value.
    pub precise: f64,
}
