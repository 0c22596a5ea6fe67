//! Frame scheduling seam between the animator and its host.
//!
//! The animator asks for one frame at a time through [`FrameScheduler`] and
//! the host answers by calling [`Animator::on_frame`](crate::Animator::on_frame)
//! with a monotonic timestamp in milliseconds. Hosts that own the loop
//! themselves (tests, native timers) implement [`PollScheduler`] so the
//! animator can pump frames directly.

use std::thread;
use std::time::{Duration, Instant};

/// Nominal frame spacing of a 60 Hz display.
pub const FRAME_INTERVAL_MS: f64 = 16.0;

/// Opaque id of one outstanding frame request.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct FrameHandle(pub u32);

pub trait FrameScheduler {
    /// Ask for the next frame tick.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request. Unknown or already-cancelled handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A scheduler whose frames are pulled by the owning thread.
pub trait PollScheduler: FrameScheduler {
    /// Wait for (or simulate) the outstanding frame and return its timestamp.
    /// Returns `None` when nothing is outstanding.
    fn next_frame(&mut self) -> Option<f64>;
}

#[derive(Default, Debug)]
struct HandleAllocator {
    next: u32,
}

impl HandleAllocator {
    #[inline]
    fn alloc(&mut self) -> FrameHandle {
        // Hosts treat 0 as "no request", so ids start at 1.
        self.next = self.next.wrapping_add(1).max(1);
        FrameHandle(self.next)
    }
}

/// Deterministic scheduler with a manual clock.
///
/// Each delivered frame advances the clock by a fixed interval. The counters
/// let tests check how the animator used the scheduling primitive.
#[derive(Debug)]
pub struct ManualScheduler {
    now: f64,
    frame_interval: f64,
    ids: HandleAllocator,
    outstanding: Option<FrameHandle>,
    requests: usize,
    cancels: usize,
    overlaps: usize,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::with_frame_interval(FRAME_INTERVAL_MS)
    }

    /// Non-positive or non-finite intervals fall back to [`FRAME_INTERVAL_MS`].
    pub fn with_frame_interval(frame_interval: f64) -> Self {
        let frame_interval = if frame_interval.is_finite() && frame_interval > 0.0 {
            frame_interval
        } else {
            FRAME_INTERVAL_MS
        };
        Self {
            now: 0.0,
            frame_interval,
            ids: HandleAllocator::default(),
            outstanding: None,
            requests: 0,
            cancels: 0,
            overlaps: 0,
        }
    }

    /// Current clock reading in milliseconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Move the clock forward without delivering a frame.
    pub fn advance(&mut self, ms: f64) {
        self.now += ms.max(0.0);
    }

    pub fn frame_interval(&self) -> f64 {
        self.frame_interval
    }

    pub fn outstanding(&self) -> Option<FrameHandle> {
        self.outstanding
    }

    /// Total frame requests made.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Cancels that actually withdrew an outstanding request.
    pub fn cancels(&self) -> usize {
        self.cancels
    }

    /// Requests made while another one was still outstanding.
    pub fn overlaps(&self) -> usize {
        self.overlaps
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        if self.outstanding.is_some() {
            self.overlaps += 1;
        }
        let handle = self.ids.alloc();
        self.outstanding = Some(handle);
        self.requests += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.outstanding == Some(handle) {
            self.outstanding = None;
            self.cancels += 1;
        }
    }
}

impl PollScheduler for ManualScheduler {
    fn next_frame(&mut self) -> Option<f64> {
        self.outstanding.take()?;
        self.now += self.frame_interval;
        Some(self.now)
    }
}

/// Timer-driven fallback for hosts without a display refresh signal.
///
/// Frames are spaced roughly [`FRAME_INTERVAL_MS`] apart: a request made
/// shortly after the previous frame waits out the rest of the interval, a
/// late request fires immediately.
#[derive(Debug)]
pub struct IntervalScheduler {
    epoch: Instant,
    interval_ms: f64,
    last_due_ms: f64,
    ids: HandleAllocator,
    outstanding: Option<(FrameHandle, f64)>,
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            interval_ms: FRAME_INTERVAL_MS,
            last_due_ms: 0.0,
            ids: HandleAllocator::default(),
            outstanding: None,
        }
    }

    fn elapsed_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}

impl FrameScheduler for IntervalScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let now = self.elapsed_ms();
        let wait = (self.interval_ms - (now - self.last_due_ms)).max(0.0);
        let due = now + wait;
        self.last_due_ms = due;
        let handle = self.ids.alloc();
        self.outstanding = Some((handle, due));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if matches!(self.outstanding, Some((h, _)) if h == handle) {
            self.outstanding = None;
        }
    }
}

impl PollScheduler for IntervalScheduler {
    fn next_frame(&mut self) -> Option<f64> {
        let (_, due) = self.outstanding.take()?;
        let now = self.elapsed_ms();
        if due > now {
            thread::sleep(Duration::from_secs_f64((due - now) / 1000.0));
        }
        Some(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_cancel_is_idempotent() {
        let mut s = ManualScheduler::new();
        let h = s.request_frame();
        s.cancel_frame(h);
        s.cancel_frame(h);
        s.cancel_frame(FrameHandle(999));
        assert_eq!(s.cancels(), 1);
        assert_eq!(s.outstanding(), None);
        assert_eq!(s.next_frame(), None);
    }

    #[test]
    fn manual_frames_advance_clock() {
        let mut s = ManualScheduler::with_frame_interval(10.0);
        s.request_frame();
        assert_eq!(s.next_frame(), Some(10.0));
        s.advance(5.0);
        s.request_frame();
        assert_eq!(s.next_frame(), Some(25.0));
        assert_eq!(s.overlaps(), 0);
    }

    #[test]
    fn manual_rejects_zero_interval() {
        assert_eq!(ManualScheduler::with_frame_interval(0.0).frame_interval(), FRAME_INTERVAL_MS);
    }

    #[test]
    fn interval_frames_are_spaced() {
        let mut s = IntervalScheduler::new();
        s.request_frame();
        let first = s.next_frame().unwrap();
        s.request_frame();
        let second = s.next_frame().unwrap();
        assert!(second - first >= FRAME_INTERVAL_MS - 1e-9, "{first} -> {second}");
    }
}
