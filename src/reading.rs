use num_traits::AsPrimitive;

use crate::time::Timestamp;

/// Raw value reported by the upstream source on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Value(f64),
    /// Source missing, not reporting, or reporting something non-numeric
    Unavailable,
}

impl Reading {
    /// Wrap any primitive numeric reading.
    pub fn from_value<T: AsPrimitive<f64>>(value: T) -> Self {
        Reading::Value(value.as_())
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            Reading::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Value(_))
    }
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Reading::Unavailable, Reading::Value)
    }
}

/// A numeric reading together with the tick it was observed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: Timestamp,
    pub value: f64,
}

impl Sample {
    pub const fn new(timestamp: Timestamp, value: f64) -> Self {
        Self { timestamp, value }
    }
}
