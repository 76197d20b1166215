/// Building blocks of the denoise pipeline
///
/// Each policy is independent: the sliding window smooths raw readings, the
/// noise gate suppresses small changes of the rounded value, and staleness
/// forces a republish when nothing has been published for a while.
mod gate;
mod staleness;
mod window;

pub use gate::NoiseGate;
pub use staleness::Staleness;
pub use window::{SampleStore, SlidingWindow};
