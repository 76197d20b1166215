use crate::filters::{SampleStore, SlidingWindow};
use crate::time::Timestamp;

/// Externally visible value of the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PublishedValue {
    Value(f64),
    Unavailable,
}

impl PublishedValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            PublishedValue::Value(v) => Some(*v),
            PublishedValue::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, PublishedValue::Value(_))
    }
}

impl core::fmt::Display for PublishedValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PublishedValue::Value(v) => write!(f, "{}", v),
            PublishedValue::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Last published value and when it was published.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PublishedState {
    pub value: PublishedValue,
    pub last_update: Timestamp,
}

pub(crate) struct State<S> {
    /// Only present when averaging is enabled
    pub window: Option<SlidingWindow<S>>,

    /// `None` until the first observation
    pub published: Option<PublishedState>,
}

impl<S: SampleStore> State<S> {
    pub fn new(window: Option<SlidingWindow<S>>) -> Self {
        Self {
            window,
            published: None,
        }
    }
}
