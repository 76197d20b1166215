use alloc::collections::VecDeque;
use core::time::Duration;

use crate::reading::Sample;
use crate::time::Timestamp;

/// Storage backing a [`SlidingWindow`], oldest sample at the front.
pub trait SampleStore {
    /// Append at the back. A full fixed-capacity store drops its oldest sample first.
    fn append(&mut self, sample: Sample);

    fn evict_oldest(&mut self) -> Option<Sample>;

    fn oldest(&self) -> Option<&Sample>;

    fn newest(&self) -> Option<&Sample>;

    fn samples(&self) -> impl Iterator<Item = &Sample>;

    fn sample_count(&self) -> usize;

    fn clear_samples(&mut self);

    /// Fixed capacity, `None` for stores that grow.
    fn capacity_limit(&self) -> Option<usize> {
        None
    }
}

impl SampleStore for VecDeque<Sample> {
    fn append(&mut self, sample: Sample) {
        self.push_back(sample);
    }

    fn evict_oldest(&mut self) -> Option<Sample> {
        self.pop_front()
    }

    fn oldest(&self) -> Option<&Sample> {
        self.front()
    }

    fn newest(&self) -> Option<&Sample> {
        self.back()
    }

    fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.iter()
    }

    fn sample_count(&self) -> usize {
        self.len()
    }

    fn clear_samples(&mut self) {
        self.clear();
    }
}

#[cfg(feature = "bounded-window")]
impl<const N: usize> SampleStore for heapless::Deque<Sample, N> {
    fn append(&mut self, sample: Sample) {
        if self.is_full() {
            log::warn!("sample window full at {} samples, dropping oldest", N);
            self.pop_front();
        }
        // Cannot fail: a slot was freed above
        let _ = self.push_back(sample);
    }

    fn evict_oldest(&mut self) -> Option<Sample> {
        self.pop_front()
    }

    fn oldest(&self) -> Option<&Sample> {
        self.front()
    }

    fn newest(&self) -> Option<&Sample> {
        self.back()
    }

    fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.iter()
    }

    fn sample_count(&self) -> usize {
        self.len()
    }

    fn clear_samples(&mut self) {
        self.clear();
    }

    fn capacity_limit(&self) -> Option<usize> {
        Some(N)
    }
}

/// Time-windowed mean of raw readings.
///
/// Holds every sample whose age is at most `width`. Eviction only happens when
/// a new sample is pushed, never on its own.
#[derive(Debug, Clone)]
pub struct SlidingWindow<S = VecDeque<Sample>> {
    store: S,
    width: Duration,
}

impl SlidingWindow {
    pub fn new(width: Duration) -> Self {
        Self::with_store(width, VecDeque::new())
    }
}

impl<S: SampleStore> SlidingWindow<S> {
    pub fn with_store(width: Duration, store: S) -> Self {
        Self { store, width }
    }

    pub fn width(&self) -> Duration {
        self.width
    }

    pub fn len(&self) -> usize {
        self.store.sample_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn newest(&self) -> Option<&Sample> {
        self.store.newest()
    }

    /// True when `now` is earlier than the newest sample, i.e. the host clock stepped back.
    pub fn is_ahead_of(&self, now: Timestamp) -> bool {
        self.newest().is_some_and(|s| s.timestamp > now)
    }

    /// Mean the window would report after pushing `sample`, without changing it.
    pub fn peek_mean(&self, sample: Sample) -> f64 {
        if self.is_ahead_of(sample.timestamp) {
            return sample.value;
        }

        // A full fixed-capacity store will drop its oldest sample on push
        let dropped = match self.store.capacity_limit() {
            Some(capacity) if self.len() >= capacity => 1,
            _ => 0,
        };

        let (sum, count) = self
            .store
            .samples()
            .skip(dropped)
            .filter(|s| !self.expired(s, sample.timestamp))
            .fold((sample.value, 1_usize), |(sum, count), s| (sum + s.value, count + 1));

        sum / count as f64
    }

    /// Push `sample` and evict everything older than the window width.
    ///
    /// Samples timed after `sample` cannot be aged against it, so a clock
    /// step back restarts the window.
    pub fn push(&mut self, sample: Sample) {
        if self.is_ahead_of(sample.timestamp) {
            log::warn!(
                "clock stepped back to {}, restarting window of {} samples",
                sample.timestamp,
                self.len()
            );
            self.store.clear_samples();
        }

        self.store.append(sample);

        let mut evicted = 0;
        while let Some(oldest) = self.store.oldest() {
            if !self.expired(oldest, sample.timestamp) {
                break;
            }
            self.store.evict_oldest();
            evicted += 1;
        }

        if evicted > 0 {
            log::debug!("evicted {} samples older than {:?}", evicted, self.width);
        }
    }

    /// Push `sample` and return the resulting mean.
    pub fn apply(&mut self, sample: Sample) -> f64 {
        self.push(sample);
        self.mean().unwrap_or(sample.value)
    }

    /// Mean of the samples currently held, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        let count = self.len();
        if count == 0 {
            return None;
        }

        let sum: f64 = self.store.samples().map(|s| s.value).sum();
        Some(sum / count as f64)
    }

    pub fn clear(&mut self) {
        self.store.clear_samples();
    }

    fn expired(&self, sample: &Sample, now: Timestamp) -> bool {
        now.saturating_duration_since(sample.timestamp) > self.width
    }
}
