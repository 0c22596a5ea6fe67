//! Vizij CountUp Core (host-agnostic)
//!
//! Animates a displayed number from a start value to an end value. The
//! [`Animator`] computes one value per frame (ease-out-expo or linear, rounded
//! and clamped), formats it with grouping and decimal marks, and writes it to a
//! [`RenderSink`] only when the text changes. Frames come from a host through
//! the [`FrameScheduler`] seam; [`ManualScheduler`] drives it deterministically
//! and [`IntervalScheduler`] is a ~60 Hz timer fallback for native hosts.

pub mod animator;
pub mod config;
pub mod easing;
pub mod error;
pub mod format;
pub mod scheduler;
pub mod sink;

// Re-exports for consumers (adapters)
pub use animator::{
    Animator, CompleteCallback, FrameReport, PendingResume, ProgressCallback,
    INVALID_PLACEHOLDER,
};
pub use config::{
    CountConfig, CountUpOptions, DEFAULT_DURATION_MS, MAX_DECIMALS, RESUME_DURATION_MS,
};
pub use easing::{ease_out_expo, linear};
pub use error::{CountUpError, Result};
pub use format::{coerce_number, format_number, round_to_scale, to_fixed, unformat_number};
pub use scheduler::{
    FrameHandle, FrameScheduler, IntervalScheduler, ManualScheduler, PollScheduler,
    FRAME_INTERVAL_MS,
};
pub use sink::{MemorySink, RenderSink, TargetResolver};
