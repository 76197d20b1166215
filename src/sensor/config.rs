use alloc::string::String;
use core::time::Duration;

use crate::config::{Config, ConfigError, WindowPolicy};

use super::period::TimePeriod;

pub const DEFAULT_NAME: &str = "Denoise sensor";
pub const DEFAULT_PRECISION: u32 = 1;

/// Operator-facing configuration of one denoise sensor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct SensorConfig {
    #[cfg_attr(feature = "serde", serde(default = "default_name"))]
    pub name: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub unique_id: Option<String>,

    /// Upstream source, `<domain>.<object_id>`
    pub entity_id: String,

    #[cfg_attr(feature = "serde", serde(default))]
    pub value_delta: f64,

    #[cfg_attr(feature = "serde", serde(default = "default_precision"))]
    pub precision: u32,

    #[cfg_attr(feature = "serde", serde(default))]
    pub average_interval: Option<TimePeriod>,

    #[cfg_attr(feature = "serde", serde(default, alias = "time_delta"))]
    pub update_interval: Option<TimePeriod>,

    /// Seconds between ticks; `None` leaves it to the host
    #[cfg_attr(feature = "serde", serde(default))]
    pub scan_interval: Option<u64>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub window_policy: WindowPolicy,
}

#[cfg(feature = "serde")]
fn default_name() -> String {
    DEFAULT_NAME.into()
}

#[cfg(feature = "serde")]
fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

impl SensorConfig {
    /// Defaults for everything but the source.
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_NAME.into(),
            unique_id: None,
            entity_id: entity_id.into(),
            value_delta: 0.0,
            precision: DEFAULT_PRECISION,
            average_interval: None,
            update_interval: None,
            scan_interval: None,
            window_policy: WindowPolicy::Reset,
        }
    }

    /// Validate and convert into the filter's configuration.
    pub fn filter_config(&self) -> Result<Config, ConfigError> {
        validate_entity_id(&self.entity_id)?;

        let config = Config {
            value_delta: self.value_delta,
            precision: self.precision,
            average_interval: resolve(&self.average_interval, "average_interval")?,
            update_interval: resolve(&self.update_interval, "update_interval")?,
            window_policy: self.window_policy,
        };
        config.validate()?;

        Ok(config)
    }

    pub fn scan_interval(&self) -> Option<Duration> {
        self.scan_interval.map(Duration::from_secs)
    }
}

fn resolve(
    period: &Option<TimePeriod>,
    key: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    period.as_ref().map(|p| p.to_duration(key)).transpose()
}

/// `<domain>.<object_id>`, both non-empty, lowercase ASCII letters, digits and `_`.
pub fn validate_entity_id(entity_id: &str) -> Result<(), ConfigError> {
    let valid_part =
        |part: &str| !part.is_empty() && part.bytes().all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_'));

    match entity_id.split_once('.') {
        Some((domain, object_id)) if valid_part(domain) && valid_part(object_id) => Ok(()),
        _ => Err(ConfigError::InvalidEntityId(entity_id.into())),
    }
}
