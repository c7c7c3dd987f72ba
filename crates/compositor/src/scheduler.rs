//! Frame scheduling for the output preview.
//!
//! The host owns the refresh cycle and exposes it through [`FrameClock`].
//! [`RenderScheduler`] decides when to ask for a frame:
//!
//! - while playing, every frame schedules the next one;
//! - while paused, exactly one frame is drawn per invalidation;
//! - while the video is not ready, the placeholder keeps refreshing only if
//!   playback is nominally running.
//!
//! At most one frame request is outstanding at any time.

/// Opaque identifier of a requested frame.
pub type FrameHandle = u64;

/// The host's refresh-cycle primitive (animation frame, vsync timer, ...).
pub trait FrameClock {
    /// Ask for a callback on the next refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Drop a pending callback.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not attached to a canvas, or torn down.
    Idle,
    /// Attached, but the video cannot be composited yet.
    WaitingForVideo,
    /// Attached with a ready video.
    Compositing,
}

#[derive(Debug, Clone)]
pub struct RenderScheduler {
    state: SchedulerState,
    pending: Option<FrameHandle>,
    playing: bool,
    video_ready: bool,
    last_revision: Option<u64>,
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            pending: None,
            playing: false,
            video_ready: false,
            last_revision: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether a frame request is outstanding.
    pub fn is_frame_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// The canvas is mounted: leave `Idle` and draw a first frame.
    pub fn attach<C: FrameClock + ?Sized>(&mut self, clock: &mut C) {
        self.set_state(self.active_state());
        self.schedule(clock);
    }

    /// The canvas is going away: cancel any pending frame and go `Idle`.
    pub fn teardown<C: FrameClock + ?Sized>(&mut self, clock: &mut C) {
        if let Some(handle) = self.pending.take() {
            clock.cancel_frame(handle);
        }
        self.set_state(SchedulerState::Idle);
    }

    /// The video became ready (or stopped being ready).
    pub fn set_video_ready<C: FrameClock + ?Sized>(&mut self, clock: &mut C, ready: bool) {
        if self.video_ready == ready {
            return;
        }
        self.video_ready = ready;
        if self.state != SchedulerState::Idle {
            self.set_state(self.active_state());
        }
        self.invalidate(clock);
    }

    /// Playback started or stopped.
    ///
    /// Starting enters the continuous loop; stopping lets the loop run out
    /// and draws one final frame.
    pub fn set_playing<C: FrameClock + ?Sized>(&mut self, clock: &mut C, playing: bool) {
        if self.playing == playing {
            return;
        }
        self.playing = playing;
        self.invalidate(clock);
    }

    /// Something visible changed (layout, options, resize, seek). Draws
    /// once more when paused; a running loop picks it up on its own.
    pub fn invalidate<C: FrameClock + ?Sized>(&mut self, clock: &mut C) {
        if self.state == SchedulerState::Idle {
            return;
        }
        self.schedule(clock);
    }

    /// Invalidate when the editor revision differs from the last one seen.
    ///
    /// Returns whether an invalidation happened.
    pub fn observe_revision<C: FrameClock + ?Sized>(&mut self, clock: &mut C, revision: u64) -> bool {
        if self.last_revision == Some(revision) {
            return false;
        }
        self.last_revision = Some(revision);
        self.invalidate(clock);
        true
    }

    /// The requested frame fired.
    ///
    /// Runs `draw` with the current state unless the callback is stale or
    /// the scheduler is idle, then schedules the next frame when playing.
    pub fn on_frame<C, F, R>(&mut self, clock: &mut C, handle: FrameHandle, draw: F) -> Option<R>
    where
        C: FrameClock + ?Sized,
        F: FnOnce(SchedulerState) -> R,
    {
        if self.pending != Some(handle) {
            tracing::trace!(handle, "Ignoring stale frame callback");
            return None;
        }
        self.pending = None;
        if self.state == SchedulerState::Idle {
            return None;
        }

        let result = draw(self.state);
        if self.playing {
            self.schedule(clock);
        }
        Some(result)
    }

    fn active_state(&self) -> SchedulerState {
        if self.video_ready {
            SchedulerState::Compositing
        } else {
            SchedulerState::WaitingForVideo
        }
    }

    fn set_state(&mut self, state: SchedulerState) {
        if self.state != state {
            tracing::debug!(from = ?self.state, to = ?state, "Render scheduler state change");
            self.state = state;
        }
    }

    fn schedule<C: FrameClock + ?Sized>(&mut self, clock: &mut C) {
        if self.pending.is_none() {
            self.pending = Some(clock.request_frame());
        }
    }
}
