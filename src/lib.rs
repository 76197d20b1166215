#![no_std]

extern crate alloc;

mod config;
mod denoise;
mod reading;
mod state;
mod time;
pub mod filters;
pub mod rounding;
pub mod sensor;

pub use config::{Config, ConfigError, MAX_PRECISION, WindowPolicy};
pub use denoise::{Decision, Denoise, PublishReason, TickError};
pub use reading::{Reading, Sample};
pub use state::{PublishedState, PublishedValue};
pub use time::Timestamp;
pub use filters::{NoiseGate, SlidingWindow, Staleness};
