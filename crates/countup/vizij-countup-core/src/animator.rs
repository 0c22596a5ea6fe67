//! Animator: owns one count-up run and its start/stop/reset/resume state.
//!
//! The animator never drives time itself. It requests frames from its
//! [`FrameScheduler`] and the host delivers them through [`Animator::on_frame`].

use std::fmt;

use log::{debug, trace, warn};

use crate::config::{normalize_duration_ms, CountConfig, CountUpOptions, RESUME_DURATION_MS};
use crate::easing::{ease_out_expo, linear};
use crate::error::{CountUpError, Result};
use crate::format::{format_number, round_to_scale, to_fixed};
use crate::scheduler::{FrameHandle, FrameScheduler, PollScheduler};
use crate::sink::{RenderSink, TargetResolver};

/// Text shown when the bounds are unusable.
pub const INVALID_PLACEHOLDER: &str = "--";

/// Called with the numeric value each time the displayed text changes.
pub type ProgressCallback = Box<dyn FnMut(f64)>;

/// Called when a run ends without a queued resume.
pub type CompleteCallback = Box<dyn FnMut()>;

/// What one delivered frame did, for hosts that run the callbacks
/// themselves (see [`Animator::advance`]).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Value whose text was written to the sink on this frame.
    pub rendered: Option<f64>,
    /// The run ended on this frame with no queued resume.
    pub completed: bool,
}

/// Transition queued behind the hold phase of a retarget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PendingResume {
    Retarget {
        end_value: f64,
        /// `None` keeps the current duration.
        duration_ms: Option<f64>,
    },
}

pub struct Animator<S: RenderSink, F: FrameScheduler> {
    sink: S,
    scheduler: F,
    options: CountUpOptions,

    start_value: f64,
    end_value: f64,
    count_down: bool,
    frame_value: f64,
    decimals: u32,
    decimal_scale: f64,
    duration_ms: f64,
    resume_duration_ms: f64,

    start_time: Option<f64>,
    remaining_ms: Option<f64>,
    last_rendered: Option<String>,
    pending_resume: Option<PendingResume>,
    frame_request: Option<FrameHandle>,

    on_progress: Option<ProgressCallback>,
    on_complete: Option<CompleteCallback>,
}

impl<S: RenderSink, F: FrameScheduler> Animator<S, F> {
    /// Build an animator and show the formatted start value right away.
    pub fn new(sink: S, scheduler: F, cfg: CountConfig) -> Self {
        let decimals = cfg.normalized_decimals();
        let duration_ms = cfg.normalized_duration_ms();
        let mut anim = Self {
            sink,
            scheduler,
            options: cfg.options,
            start_value: cfg.start_value,
            end_value: cfg.end_value,
            count_down: cfg.start_value > cfg.end_value,
            frame_value: cfg.start_value,
            decimals,
            decimal_scale: 10f64.powi(decimals as i32),
            duration_ms,
            resume_duration_ms: RESUME_DURATION_MS,
            start_time: None,
            remaining_ms: None,
            last_rendered: None,
            pending_resume: None,
            frame_request: None,
            on_progress: None,
            on_complete: None,
        };
        let text = anim.format_value(anim.start_value);
        anim.sink.set_content(&text);
        anim
    }

    /// Build an animator whose sink is looked up by identifier.
    pub fn from_target_id<R>(
        resolver: &mut R,
        id: &str,
        scheduler: F,
        cfg: CountConfig,
    ) -> Result<Self>
    where
        R: TargetResolver<Sink = S>,
    {
        let sink = resolver
            .resolve(id)
            .ok_or_else(|| CountUpError::TargetNotFound { id: id.to_string() })?;
        Ok(Self::new(sink, scheduler, cfg))
    }

    /// Begin counting. Callbacks replace any from a previous call.
    ///
    /// With a non-numeric bound the target shows [`INVALID_PLACEHOLDER`], a
    /// warning is logged, no frame is requested and `InvalidBound` is
    /// returned.
    pub fn start(
        &mut self,
        on_progress: Option<ProgressCallback>,
        on_complete: Option<CompleteCallback>,
    ) -> Result<()> {
        self.on_progress = on_progress;
        self.on_complete = on_complete;
        self.pending_resume = None;
        self.last_rendered = None;

        if !(self.start_value.is_finite() && self.end_value.is_finite()) {
            let err = CountUpError::InvalidBound {
                start: self.start_value,
                end: self.end_value,
            };
            warn!("{err}");
            self.sink.set_content(INVALID_PLACEHOLDER);
            return Err(err);
        }

        debug!(
            "countup start {} -> {} over {}ms",
            self.start_value, self.end_value, self.duration_ms
        );
        self.schedule_frame();
        Ok(())
    }

    /// Freeze at the current frame. A later [`resume`](Self::resume) picks up
    /// from here.
    pub fn stop(&mut self) {
        debug!("countup stop at {}", self.frame_value);
        self.cancel_frame();
    }

    /// Cancel the run and show the start value again. Bounds and callbacks
    /// are kept.
    pub fn reset(&mut self) {
        debug!("countup reset to {}", self.start_value);
        self.start_time = None;
        self.cancel_frame();
        let text = self.format_value(self.start_value);
        self.sink.set_content(&text);
    }

    /// Continue or retarget.
    ///
    /// With both `new_end` and `duration_secs` the animation heads to the new
    /// end value from wherever it currently is. If it still looks running
    /// (see [`is_running`](Self::is_running)) it first holds its current
    /// value for one second, then retargets. With either argument missing it
    /// continues towards the existing end using the time left over from the
    /// last frame.
    pub fn resume(&mut self, new_end: Option<f64>, duration_secs: Option<f64>) -> Result<()> {
        if let (Some(end), Some(_)) = (new_end, duration_secs) {
            if !end.is_finite() {
                let err = CountUpError::InvalidBound {
                    start: self.frame_value,
                    end,
                };
                warn!("{err}");
                self.sink.set_content(INVALID_PLACEHOLDER);
                return Err(err);
            }
        }

        self.start_time = None;
        self.pending_resume = None;

        match (new_end, duration_secs) {
            (Some(end_value), Some(secs)) => {
                let duration_ms = normalize_duration_ms(Some(secs));
                if self.is_running() {
                    debug!(
                        "countup hold at {} for {}ms before retarget to {}",
                        self.frame_value, self.resume_duration_ms, end_value
                    );
                    // `end_value` is left alone so a plain `resume()` after a
                    // stop inside the hold still heads for it.
                    self.duration_ms = self.resume_duration_ms;
                    self.start_value = self.frame_value;
                    self.pending_resume = Some(PendingResume::Retarget {
                        end_value,
                        duration_ms,
                    });
                    self.schedule_frame();
                } else {
                    self.retarget(end_value, duration_ms);
                }
            }
            _ => {
                self.duration_ms = self.remaining_ms.unwrap_or(self.duration_ms);
                self.start_value = self.frame_value;
                self.count_down = self.start_value > self.end_value;
                debug!(
                    "countup continue from {} over {}ms",
                    self.start_value, self.duration_ms
                );
                self.schedule_frame();
            }
        }
        Ok(())
    }

    /// Approximate: true while the last rendered text differs from the
    /// formatted end value. It does not track whether a frame is actually
    /// outstanding; see [`has_pending_frame`](Self::has_pending_frame) for
    /// that.
    pub fn is_running(&self) -> bool {
        self.last_rendered.as_deref() != Some(self.format_value(self.end_value).as_str())
    }

    /// Deliver a frame tick and run the callbacks it triggers. Returns false
    /// (and does nothing) when no frame was requested, e.g. after `stop()`.
    pub fn on_frame(&mut self, timestamp: f64) -> bool {
        match self.advance(timestamp) {
            Some(report) => {
                self.notify(report);
                true
            }
            None => false,
        }
    }

    /// Process a frame tick without calling the progress or complete
    /// callbacks. Hosts that share the animator with those callbacks use this
    /// and dispatch the report once they have released the animator.
    pub fn advance(&mut self, timestamp: f64) -> Option<FrameReport> {
        if self.frame_request.take().is_none() {
            trace!("countup ignoring unrequested frame at {timestamp}");
            return None;
        }
        Some(self.tick(timestamp))
    }

    fn notify(&mut self, report: FrameReport) {
        if let (Some(value), Some(cb)) = (report.rendered, self.on_progress.as_mut()) {
            cb(value);
        }
        if report.completed {
            if let Some(cb) = self.on_complete.as_mut() {
                cb();
            }
        }
    }

    fn tick(&mut self, timestamp: f64) -> FrameReport {
        let mut report = FrameReport::default();
        let start_time = *self.start_time.get_or_insert(timestamp);
        let elapsed = timestamp - start_time;
        self.remaining_ms = Some(self.duration_ms - elapsed);

        let value = self.frame_value_at(elapsed);
        self.frame_value = value;

        let text = self.format_value(value);
        if self.last_rendered.as_deref() != Some(text.as_str()) {
            trace!("countup frame {elapsed}ms -> {text}");
            self.sink.set_content(&text);
            self.last_rendered = Some(text);
            report.rendered = Some(value);
        }

        if elapsed < self.duration_ms {
            self.schedule_frame();
        } else if let Some(PendingResume::Retarget {
            end_value,
            duration_ms,
        }) = self.pending_resume.take()
        {
            self.retarget(end_value, duration_ms);
        } else {
            debug!("countup complete at {}", self.frame_value);
            report.completed = true;
        }
        report
    }

    /// Eased or linear value at `elapsed`, rounded to the configured decimals
    /// and clamped so it never passes the end value.
    fn frame_value_at(&self, elapsed: f64) -> f64 {
        let (start, end, d) = (self.start_value, self.frame_target(), self.duration_ms);
        let raw = match (self.options.use_easing, self.count_down) {
            (true, true) => start - ease_out_expo(elapsed, 0.0, start - end, d),
            (true, false) => ease_out_expo(elapsed, start, end - start, d),
            (false, true) => start - linear(elapsed, 0.0, start - end, d),
            (false, false) => linear(elapsed, start, end - start, d),
        };
        let rounded = round_to_scale(raw, self.decimal_scale);
        if self.count_down {
            rounded.max(end)
        } else {
            rounded.min(end)
        }
    }

    /// A retarget hold stays on its start value; `end_value` keeps the
    /// previous target until the queued retarget runs.
    fn frame_target(&self) -> f64 {
        if self.pending_resume.is_some() {
            self.start_value
        } else {
            self.end_value
        }
    }

    fn retarget(&mut self, end_value: f64, duration_ms: Option<f64>) {
        self.start_time = None;
        if let Some(ms) = duration_ms {
            self.duration_ms = ms;
        }
        self.start_value = self.frame_value;
        self.end_value = end_value;
        self.count_down = self.start_value > self.end_value;
        debug!(
            "countup retarget {} -> {} over {}ms",
            self.start_value, self.end_value, self.duration_ms
        );
        self.schedule_frame();
    }

    fn schedule_frame(&mut self) {
        self.cancel_frame();
        self.frame_request = Some(self.scheduler.request_frame());
    }

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.frame_request.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Display text for `value` under the current decimals and options.
    pub fn format_value(&self, value: f64) -> String {
        format_number(&to_fixed(value, self.decimals), &self.options)
    }

    pub fn frame_value(&self) -> f64 {
        self.frame_value
    }

    pub fn start_value(&self) -> f64 {
        self.start_value
    }

    pub fn end_value(&self) -> f64 {
        self.end_value
    }

    pub fn is_count_down(&self) -> bool {
        self.count_down
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Time left as of the last frame; `None` before the first frame.
    pub fn remaining_ms(&self) -> Option<f64> {
        self.remaining_ms
    }

    pub fn options(&self) -> &CountUpOptions {
        &self.options
    }

    pub fn last_rendered(&self) -> Option<&str> {
        self.last_rendered.as_deref()
    }

    pub fn pending_resume(&self) -> Option<PendingResume> {
        self.pending_resume
    }

    pub fn has_pending_frame(&self) -> bool {
        self.frame_request.is_some()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}

impl<S: RenderSink, F: PollScheduler> Animator<S, F> {
    /// Pull one frame from the scheduler and process it.
    pub fn step(&mut self) -> bool {
        match self.scheduler.next_frame() {
            Some(timestamp) => self.on_frame(timestamp),
            None => false,
        }
    }

    /// Process frames until none is outstanding. Returns the frame count.
    pub fn run_until_idle(&mut self) -> usize {
        let mut frames = 0;
        while self.step() {
            frames += 1;
        }
        frames
    }
}

impl<S: RenderSink, F: FrameScheduler> Drop for Animator<S, F> {
    fn drop(&mut self) {
        self.cancel_frame();
    }
}

impl<S: RenderSink, F: FrameScheduler> fmt::Debug for Animator<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("start_value", &self.start_value)
            .field("end_value", &self.end_value)
            .field("count_down", &self.count_down)
            .field("frame_value", &self.frame_value)
            .field("decimals", &self.decimals)
            .field("duration_ms", &self.duration_ms)
            .field("start_time", &self.start_time)
            .field("remaining_ms", &self.remaining_ms)
            .field("last_rendered", &self.last_rendered)
            .field("pending_resume", &self.pending_resume)
            .field("frame_request", &self.frame_request)
            .finish_non_exhaustive()
    }
}
