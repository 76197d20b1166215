use alloc::collections::BTreeMap;
use alloc::string::String;

/// Snapshot of the upstream entity as held by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceState {
    pub entity_id: String,
    pub state: String,
    pub attributes: BTreeMap<String, String>,
}

impl SourceState {
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn domain(&self) -> SourceDomain {
        SourceDomain::of(&self.entity_id)
    }
}

/// Where a source keeps its temperature, decided by the entity id's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceDomain {
    /// `weather.*`: `temperature` attribute
    Weather,
    /// `climate.*`, `water_heater.*`: `current_temperature` attribute
    Climate,
    /// Everything else: the state itself
    Other,
}

impl SourceDomain {
    pub fn of(entity_id: &str) -> Self {
        let domain = entity_id.split_once('.').map_or(entity_id, |(domain, _)| domain);
        match domain {
            "weather" => SourceDomain::Weather,
            "climate" | "water_heater" => SourceDomain::Climate,
            _ => SourceDomain::Other,
        }
    }

    /// Attribute holding the temperature, `None` when it is the state.
    pub fn temperature_attribute(&self) -> Option<&'static str> {
        match self {
            SourceDomain::Weather => Some("temperature"),
            SourceDomain::Climate => Some("current_temperature"),
            SourceDomain::Other => None,
        }
    }

    pub fn is_temperature_source(&self) -> bool {
        !matches!(self, SourceDomain::Other)
    }
}

/// False for the placeholder values hosts use when a source has nothing to report.
pub fn is_reported(value: &str) -> bool {
    !matches!(value.trim(), "" | "unknown" | "unavailable" | "None")
}
