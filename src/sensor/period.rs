use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::time::Duration;

use crate::config::ConfigError;

/// A configured duration: plain seconds, or `"HH:MM"`, `"HH:MM:SS"`, `"HH:MM:SS.fff"`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum TimePeriod {
    Seconds(f64),
    Text(String),
}

impl TimePeriod {
    /// Resolve to a [`Duration`]. `key` names the setting in error messages.
    pub fn to_duration(&self, key: &'static str) -> Result<Duration, ConfigError> {
        let (negative, seconds) = match self {
            TimePeriod::Seconds(secs) => (*secs < 0.0, libm::fabs(*secs)),
            TimePeriod::Text(text) => parse_text(text).ok_or_else(|| self.invalid(key))?,
        };

        if negative && seconds != 0.0 {
            return Err(ConfigError::NegativeDuration { key });
        }

        Duration::try_from_secs_f64(seconds).map_err(|_| self.invalid(key))
    }

    fn invalid(&self, key: &'static str) -> ConfigError {
        let value = match self {
            TimePeriod::Seconds(secs) => secs.to_string(),
            TimePeriod::Text(text) => text.clone(),
        };
        ConfigError::InvalidDuration { key, value }
    }
}

impl From<Duration> for TimePeriod {
    fn from(duration: Duration) -> Self {
        TimePeriod::Seconds(duration.as_secs_f64())
    }
}

impl From<&str> for TimePeriod {
    fn from(text: &str) -> Self {
        TimePeriod::Text(text.into())
    }
}

/// Returns (is_negative, magnitude in seconds).
fn parse_text(text: &str) -> Option<(bool, f64)> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let parts: Vec<&str> = body.split(':').collect();
    let seconds = match parts.as_slice() {
        [secs] => parse_seconds(secs)?,
        [hours, minutes] => whole(hours)? * 3600.0 + whole(minutes)? * 60.0,
        [hours, minutes, secs] => {
            whole(hours)? * 3600.0 + whole(minutes)? * 60.0 + parse_seconds(secs)?
        }
        _ => return None,
    };

    Some((negative, seconds))
}

fn whole(part: &str) -> Option<f64> {
    part.parse::<u32>().ok().map(f64::from)
}

fn parse_seconds(part: &str) -> Option<f64> {
    // Signs belong in front of the whole period only
    if part.starts_with(['-', '+']) {
        return None;
    }
    part.parse::<f64>().ok().filter(|s| s.is_finite())
}
