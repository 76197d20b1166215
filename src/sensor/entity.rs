use alloc::collections::VecDeque;
use alloc::string::String;
use core::time::Duration;

use log::{error, info, warn};

use crate::config::ConfigError;
use crate::denoise::{Decision, Denoise, PublishReason, TickError};
use crate::filters::SampleStore;
use crate::reading::{Reading, Sample};
use crate::state::{PublishedState, PublishedValue};
use crate::time::Timestamp;

use super::config::SensorConfig;
use super::source::{SourceDomain, SourceState, is_reported};
use super::units::TemperatureUnit;

const TEMPERATURE_DEVICE_CLASS: &str = "temperature";
const TEMPERATURE_ICON: &str = "mdi:thermometer";

/// Synchronous lookup of host-held entity state.
pub trait StateSource {
    type Error: core::fmt::Display;

    /// `Ok(None)` when no such entity exists.
    fn current_state(&self, entity_id: &str) -> Result<Option<SourceState>, Self::Error>;
}

/// Receives the sensor's own state whenever it publishes.
pub trait StatePublisher {
    fn publish(&mut self, update: &StateUpdate<'_>);
}

/// What the host should record for the denoise entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateUpdate<'a> {
    pub name: &'a str,
    pub unique_id: Option<&'a str>,
    pub value: PublishedValue,
    pub last_update: Timestamp,
    pub unit_of_measurement: Option<&'a str>,
    pub device_class: Option<&'a str>,
    pub icon: Option<&'a str>,
    /// Record even if the value equals the previous one (staleness refresh)
    pub force_update: bool,
}

/// Result of [`DenoiseSensor::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Published(PublishReason),
    Held,
    /// Reading the source failed; retried next tick
    Skipped,
    Failed(TickError),
}

/// How the source is read and presented, fixed on the first state seen.
#[derive(Debug, Clone, PartialEq)]
struct Profile {
    domain: SourceDomain,
    /// Source unit when in temperature mode
    temperature_unit: Option<TemperatureUnit>,
    unit_of_measurement: Option<String>,
    device_class: Option<String>,
    icon: Option<String>,
}

impl Profile {
    fn detect(state: &SourceState, host_unit: TemperatureUnit) -> Self {
        let domain = state.domain();
        let temperature = |unit| Profile {
            domain,
            temperature_unit: Some(unit),
            unit_of_measurement: Some(host_unit.symbol().into()),
            device_class: Some(TEMPERATURE_DEVICE_CLASS.into()),
            icon: Some(TEMPERATURE_ICON.into()),
        };

        if domain.is_temperature_source() {
            return temperature(host_unit);
        }

        let source_unit = state.attribute("unit_of_measurement");
        match source_unit.and_then(TemperatureUnit::from_symbol) {
            Some(unit) => temperature(unit),
            None => Profile {
                domain,
                temperature_unit: None,
                unit_of_measurement: source_unit.map(String::from),
                device_class: state.attribute("device_class").map(String::from),
                icon: state.attribute("icon").map(String::from),
            },
        }
    }
}

/// Home-automation entity republishing a denoised copy of one source.
pub struct DenoiseSensor<S = VecDeque<Sample>> {
    name: String,
    unique_id: Option<String>,
    entity_id: String,
    scan_interval: Option<Duration>,
    host_unit: TemperatureUnit,
    filter: Denoise<S>,
    profile: Option<Profile>,
}

impl DenoiseSensor {
    pub fn new(config: &SensorConfig, host_unit: TemperatureUnit) -> Result<Self, ConfigError> {
        Self::with_store(config, host_unit)
    }
}

impl<S> DenoiseSensor<S>
where
    S: SampleStore + Default,
{
    pub fn with_store(config: &SensorConfig, host_unit: TemperatureUnit) -> Result<Self, ConfigError> {
        let filter_config = config.filter_config()?;

        info!(
            "setup [{}] source[{}] value_delta[{}] precision[{}] average[{:?}] update[{:?}]",
            config.name,
            config.entity_id,
            filter_config.value_delta,
            filter_config.precision,
            filter_config.average_interval,
            filter_config.update_interval
        );

        Ok(Self {
            name: config.name.clone(),
            unique_id: config.unique_id.clone(),
            entity_id: config.entity_id.clone(),
            scan_interval: config.scan_interval(),
            host_unit,
            filter: Denoise::with_store(filter_config)?,
            profile: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    pub fn source_entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn scan_interval(&self) -> Option<Duration> {
        self.scan_interval
    }

    pub fn filter(&self) -> &Denoise<S> {
        &self.filter
    }

    pub fn value(&self) -> Option<f64> {
        self.filter.value()
    }

    pub fn last_update(&self) -> Option<Timestamp> {
        self.filter.last_update()
    }

    pub fn available(&self) -> bool {
        self.filter.is_available()
    }

    pub fn unit_of_measurement(&self) -> Option<&str> {
        self.profile.as_ref()?.unit_of_measurement.as_deref()
    }

    pub fn device_class(&self) -> Option<&str> {
        self.profile.as_ref()?.device_class.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.profile.as_ref()?.icon.as_deref()
    }

    /// Read the source, run the filter and publish if it decided to.
    pub fn tick<Src, P>(&mut self, now: Timestamp, source: &Src, publisher: &mut P) -> TickOutcome
    where
        Src: StateSource,
        P: StatePublisher,
    {
        let reading = match source.current_state(&self.entity_id) {
            Ok(Some(state)) => self.read(&state),
            Ok(None) => {
                error!("[{}] unable to find entity '{}'", self.name, self.entity_id);
                Reading::Unavailable
            }
            Err(err) => {
                warn!("[{}] reading '{}' failed, skipping tick: {}", self.name, self.entity_id, err);
                return TickOutcome::Skipped;
            }
        };

        match self.filter.update(now, reading) {
            Ok(Decision::Publish { state, reason }) => {
                publisher.publish(&self.state_update(state));
                TickOutcome::Published(reason)
            }
            Ok(Decision::Hold) => TickOutcome::Held,
            Err(err) => {
                error!("[{}] tick failed: {}", self.name, err);
                TickOutcome::Failed(err)
            }
        }
    }

    fn state_update(&self, state: PublishedState) -> StateUpdate<'_> {
        StateUpdate {
            name: &self.name,
            unique_id: self.unique_id(),
            value: state.value,
            last_update: state.last_update,
            unit_of_measurement: self.unit_of_measurement(),
            device_class: self.device_class(),
            icon: self.icon(),
            force_update: true,
        }
    }

    fn read(&mut self, state: &SourceState) -> Reading {
        let host_unit = self.host_unit;
        let profile = self
            .profile
            .get_or_insert_with(|| Profile::detect(state, host_unit));

        let raw = match profile.domain.temperature_attribute() {
            Some(attribute) if profile.temperature_unit.is_some() => state.attribute(attribute),
            _ => Some(state.state.as_str()),
        };

        let Some(raw) = raw.filter(|v| is_reported(v)) else {
            return Reading::Unavailable;
        };

        let Ok(value) = raw.trim().parse::<f64>() else {
            error!("[{}] could not convert value '{}' to float", self.name, raw);
            return Reading::Unavailable;
        };

        match profile.temperature_unit {
            Some(unit) => Reading::Value(unit.convert(value, host_unit)),
            None => Reading::Value(value),
        }
    }
}
