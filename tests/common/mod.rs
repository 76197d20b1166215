#![allow(dead_code)]

use std::collections::HashMap;

use denoise_sensor::sensor::{SourceState, StatePublisher, StateSource, StateUpdate};
use denoise_sensor::{PublishedValue, Timestamp};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Host-side entity registry the sensor reads its source from.
#[derive(Default)]
pub struct FakeSource {
    states: HashMap<String, SourceState>,
    pub failing: bool,
}

impl FakeSource {
    pub fn set(&mut self, state: SourceState) {
        self.states.insert(state.entity_id.clone(), state);
    }

    pub fn remove(&mut self, entity_id: &str) {
        self.states.remove(entity_id);
    }
}

impl StateSource for FakeSource {
    type Error = String;

    fn current_state(&self, entity_id: &str) -> Result<Option<SourceState>, String> {
        if self.failing {
            return Err("state machine busy".into());
        }
        Ok(self.states.get(entity_id).cloned())
    }
}

/// Owned copy of a [`StateUpdate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub name: String,
    pub unique_id: Option<String>,
    pub value: PublishedValue,
    pub last_update: Timestamp,
    pub unit_of_measurement: Option<String>,
    pub device_class: Option<String>,
    pub icon: Option<String>,
    pub force_update: bool,
}

#[derive(Default)]
pub struct Recorder {
    pub updates: Vec<Recorded>,
}

impl Recorder {
    pub fn last(&self) -> &Recorded {
        self.updates.last().expect("nothing published")
    }
}

impl StatePublisher for Recorder {
    fn publish(&mut self, update: &StateUpdate<'_>) {
        self.updates.push(Recorded {
            name: update.name.to_owned(),
            unique_id: update.unique_id.map(str::to_owned),
            value: update.value,
            last_update: update.last_update,
            unit_of_measurement: update.unit_of_measurement.map(str::to_owned),
            device_class: update.device_class.map(str::to_owned),
            icon: update.icon.map(str::to_owned),
            force_update: update.force_update,
        });
    }
}
