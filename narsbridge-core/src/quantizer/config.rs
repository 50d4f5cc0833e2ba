//! Quantizer configuration

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::QuantizerError;

/// Tuning for [`EventQuantizer`](super::EventQuantizer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizerConfig {
    /// Length of every observation vector.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Initial maximum match distance.
    #[serde(default = "default_vigilance")]
    pub vigilance: f64,

    /// Step size when a matched prototype moves toward its input.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Floor for vigilance after surprise adjustments.
    #[serde(default = "default_min_vigilance")]
    pub min_vigilance: f64,

    /// Vigilance decrease per unit of prediction error.
    #[serde(default = "default_vigilance_step")]
    pub vigilance_step: f64,
}

fn default_dimension() -> usize {
    64
}

fn default_vigilance() -> f64 {
    0.5
}

fn default_learning_rate() -> f64 {
    0.1
}

fn default_min_vigilance() -> f64 {
    0.01
}

fn default_vigilance_step() -> f64 {
    0.05
}

impl Default for QuantizerConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            vigilance: default_vigilance(),
            learning_rate: default_learning_rate(),
            min_vigilance: default_min_vigilance(),
            vigilance_step: default_vigilance_step(),
        }
    }
}

impl QuantizerConfig {
    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    #[must_use]
    pub fn with_vigilance(mut self, vigilance: f64) -> Self {
        self.vigilance = vigilance;
        self
    }

    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    #[must_use]
    pub fn with_min_vigilance(mut self, min_vigilance: f64) -> Self {
        self.min_vigilance = min_vigilance;
        self
    }

    #[must_use]
    pub fn with_vigilance_step(mut self, vigilance_step: f64) -> Self {
        self.vigilance_step = vigilance_step;
        self
    }

    /// Settings outside their allowed range, in field order.
    ///
    /// All values must be finite; `learning_rate` lies in `(0, 1]`,
    /// `min_vigilance` is positive and `vigilance_step` is not negative.
    fn out_of_range(&self) -> Vec<(&'static str, f64)> {
        [
            ("vigilance", self.vigilance, true),
            (
                "learning_rate",
                self.learning_rate,
                self.learning_rate > 0.0 && self.learning_rate <= 1.0,
            ),
            ("min_vigilance", self.min_vigilance, self.min_vigilance > 0.0),
            ("vigilance_step", self.vigilance_step, self.vigilance_step >= 0.0),
        ]
        .into_iter()
        .filter(|&(_, value, in_range)| !(value.is_finite() && in_range))
        .map(|(name, value, _)| (name, value))
        .collect()
    }

    /// Reject the first out-of-range setting.
    pub fn validate(&self) -> Result<(), QuantizerError> {
        match self.out_of_range().first() {
            Some(&(name, value)) => Err(QuantizerError::InvalidParameter { name, value }),
            None => Ok(()),
        }
    }

    /// Replace out-of-range settings with their defaults.
    pub(crate) fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for (name, value) in self.out_of_range() {
            warn!(setting = name, value, "Invalid quantizer setting, using default");
            match name {
                "vigilance" => self.vigilance = defaults.vigilance,
                "learning_rate" => self.learning_rate = defaults.learning_rate,
                "min_vigilance" => self.min_vigilance = defaults.min_vigilance,
                _ => self.vigilance_step = defaults.vigilance_step,
            }
        }
        self
    }
}
