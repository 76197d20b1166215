//! Host integration for the denoise filter.
//!
//! The host owns scheduling and entity state. Each tick it hands a
//! [`DenoiseSensor`] the current time, a [`StateSource`] to look up the
//! upstream entity and a [`StatePublisher`] that records the sensor's own
//! state. Everything else (source unit detection, value extraction,
//! availability) happens here.

mod config;
mod entity;
mod period;
mod source;
mod units;

pub use config::{DEFAULT_NAME, DEFAULT_PRECISION, SensorConfig, validate_entity_id};
pub use entity::{DenoiseSensor, StatePublisher, StateSource, StateUpdate, TickOutcome};
pub use period::TimePeriod;
pub use source::{SourceDomain, SourceState, is_reported};
pub use units::TemperatureUnit;
