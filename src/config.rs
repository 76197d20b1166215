use alloc::string::String;
use core::time::Duration;

use thiserror::Error;

/// An f64 carries about 15 significant decimal digits.
pub const MAX_PRECISION: u32 = 15;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("value_delta must be a finite number >= 0, got {0}")]
    InvalidValueDelta(f64),

    #[error("precision must be at most {max} digits, got {0}", max = MAX_PRECISION)]
    PrecisionTooLarge(u32),

    #[error("{key} must not be negative")]
    NegativeDuration { key: &'static str },

    #[error("{key}: cannot parse '{value}' as a time period")]
    InvalidDuration { key: &'static str, value: String },

    #[error("invalid entity id '{0}', expected <domain>.<object_id>")]
    InvalidEntityId(String),
}

/// What happens to the averaging window when the source becomes unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WindowPolicy {
    /// Discard accumulated samples; averaging restarts on recovery
    #[default]
    Reset,

    /// Keep samples so they still count (until they age out) on recovery
    Keep,
}

/// Filter configuration, immutable for the lifetime of a [`Denoise`](crate::Denoise).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Minimum change of the rounded value that gets published
    pub value_delta: f64,

    /// Decimal digits kept when rounding
    pub precision: u32,

    /// Width of the sliding average; `None` or zero disables averaging
    pub average_interval: Option<Duration>,

    /// Maximum staleness before an unchanged value is republished; `None` or zero disables it
    pub update_interval: Option<Duration>,

    pub window_policy: WindowPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            value_delta: 0.0,
            precision: 1,
            average_interval: None,
            update_interval: None,
            window_policy: WindowPolicy::Reset,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // NaN fails both comparisons, so check finiteness explicitly
        if !self.value_delta.is_finite() || self.value_delta < 0.0 {
            return Err(ConfigError::InvalidValueDelta(self.value_delta));
        }

        if self.precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionTooLarge(self.precision));
        }

        Ok(())
    }

    /// Averaging window width, if averaging is enabled.
    pub fn window_width(&self) -> Option<Duration> {
        self.average_interval.filter(|d| !d.is_zero())
    }

    /// Forced refresh interval, if staleness forcing is enabled.
    pub fn staleness_limit(&self) -> Option<Duration> {
        self.update_interval.filter(|d| !d.is_zero())
    }
}
