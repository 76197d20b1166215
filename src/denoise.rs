use alloc::collections::VecDeque;

use log::{debug, info};
use thiserror::Error;

use crate::config::{Config, ConfigError, WindowPolicy};
use crate::filters::{NoiseGate, SampleStore, SlidingWindow, Staleness};
use crate::reading::{Reading, Sample};
use crate::rounding::round_half_even;
use crate::state::{PublishedState, PublishedValue, State};
use crate::time::Timestamp;

/// A tick that could not be applied. Filter state is left as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickError {
    #[error("upstream reported a non-finite value ({0})")]
    NonFiniteReading(f64),
}

/// Why a tick published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishReason {
    /// Nothing was published before
    FirstObservation,
    /// Source came back after being unavailable
    Recovered,
    /// Rounded value moved by at least `value_delta`
    ValueChanged,
    /// `update_interval` elapsed since the last publish
    Stale,
    /// Source became unavailable
    Unavailable,
    /// Source is still unavailable; republished every tick
    StillUnavailable,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Publish {
        state: PublishedState,
        reason: PublishReason,
    },
    Hold,
}

impl Decision {
    pub fn is_publish(&self) -> bool {
        matches!(self, Decision::Publish { .. })
    }

    pub fn published(&self) -> Option<&PublishedState> {
        match self {
            Decision::Publish { state, .. } => Some(state),
            Decision::Hold => None,
        }
    }

    pub fn reason(&self) -> Option<PublishReason> {
        match self {
            Decision::Publish { reason, .. } => Some(*reason),
            Decision::Hold => None,
        }
    }
}

/// Denoise filter for a single upstream source.
///
/// Call [`update`](Denoise::update) once per polling tick. Readings are
/// optionally averaged over a trailing time window, rounded, and published
/// only when the change passes the noise gate, the published value went
/// stale, or the source recovered. Unavailability is never gated.
pub struct Denoise<S = VecDeque<Sample>> {
    config: Config,
    gate: NoiseGate,
    staleness: Staleness,
    state: State<S>,
}

impl Denoise {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        Self::with_store(config)
    }
}

impl<S> Denoise<S>
where
    S: SampleStore + Default,
{
    /// Build a filter whose window keeps its samples in `S`.
    pub fn with_store(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let window = config
            .window_width()
            .map(|width| SlidingWindow::with_store(width, S::default()));

        Ok(Self {
            config,
            gate: NoiseGate::new(config.value_delta, config.precision),
            staleness: Staleness::new(config.staleness_limit()),
            state: State::new(window),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn published(&self) -> Option<&PublishedState> {
        self.state.published.as_ref()
    }

    /// Current published value, `None` while unavailable or before the first tick.
    pub fn value(&self) -> Option<f64> {
        self.state.published.and_then(|p| p.value.value())
    }

    pub fn last_update(&self) -> Option<Timestamp> {
        self.state.published.map(|p| p.last_update)
    }

    pub fn is_available(&self) -> bool {
        self.state.published.is_some_and(|p| p.value.is_available())
    }

    /// Number of raw samples currently averaged (always 0 without a window).
    pub fn window_len(&self) -> usize {
        self.state.window.as_ref().map_or(0, |w| w.len())
    }

    /// Forget everything, as after a restart.
    pub fn reset(&mut self) {
        if let Some(window) = self.state.window.as_mut() {
            window.clear();
        }
        self.state.published = None;
    }

    /// Run one tick with the reading observed at `now`.
    ///
    /// Changes are committed only once the whole tick has been computed, so an
    /// error leaves the filter exactly as it was. `now` may step back; elapsed
    /// times then saturate at zero and the averaging window restarts.
    pub fn update(&mut self, now: Timestamp, reading: Reading) -> Result<Decision, TickError> {
        match reading {
            Reading::Unavailable => Ok(self.apply_unavailable(now)),
            Reading::Value(raw) => self.apply_value(now, raw),
        }
    }

    fn apply_unavailable(&mut self, now: Timestamp) -> Decision {
        let reason = match self.state.published {
            Some(PublishedState {
                value: PublishedValue::Unavailable,
                ..
            }) => {
                debug!("still unavailable at {}", now);
                PublishReason::StillUnavailable
            }
            _ => {
                if self.config.window_policy == WindowPolicy::Reset {
                    if let Some(window) = self.state.window.as_mut() {
                        window.clear();
                    }
                }
                info!("source unavailable at {}", now);
                PublishReason::Unavailable
            }
        };

        let state = PublishedState {
            value: PublishedValue::Unavailable,
            last_update: now,
        };
        self.state.published = Some(state);

        Decision::Publish { state, reason }
    }

    fn apply_value(&mut self, now: Timestamp, raw: f64) -> Result<Decision, TickError> {
        if !raw.is_finite() {
            return Err(TickError::NonFiniteReading(raw));
        }

        let sample = Sample::new(now, raw);
        let candidate = match self.state.window.as_ref() {
            Some(window) => window.peek_mean(sample),
            None => raw,
        };
        let rounded = round_half_even(candidate, self.config.precision);

        let reason = match self.state.published {
            None => Some(PublishReason::FirstObservation),
            Some(PublishedState {
                value: PublishedValue::Unavailable,
                ..
            }) => Some(PublishReason::Recovered),
            Some(PublishedState {
                value: PublishedValue::Value(previous),
                last_update,
            }) => {
                if self.gate.passes(rounded, previous) {
                    Some(PublishReason::ValueChanged)
                } else if self.staleness.is_stale(now, last_update) {
                    Some(PublishReason::Stale)
                } else {
                    None
                }
            }
        };

        // Commit
        if let Some(window) = self.state.window.as_mut() {
            window.push(sample);
        }

        let Some(reason) = reason else {
            debug!("hold at {}: raw {} -> {} gated", now, raw, rounded);
            return Ok(Decision::Hold);
        };

        let state = PublishedState {
            value: PublishedValue::Value(rounded),
            last_update: now,
        };
        self.state.published = Some(state);
        info!(
            "publish {} at {} ({:?}, raw {}, averaged over {} samples)",
            rounded,
            now,
            reason,
            raw,
            self.window_len().max(1)
        );

        Ok(Decision::Publish { state, reason })
    }
}
