//! Playback timeline: position, duration, and play/pause state.
//!
//! The video element itself belongs to the host. This type keeps the
//! editor's view of it consistent and decides when the host has to seek.

use serde::{Deserialize, Serialize};

/// Position changes smaller than this are not stored (seconds).
pub const TIME_UPDATE_THRESHOLD_SECS: f64 = 0.05;

/// The host only seeks the video when it is further off than this (seconds).
pub const SEEK_THRESHOLD_SECS: f64 = 0.1;

/// How much media data the host has buffered, mirroring media-element ready states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

/// Why playback could not be started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("Video metadata has not loaded yet")]
    NotLoaded,

    #[error("Not enough video data buffered to start playback")]
    NotEnoughData,

    #[error("Could not start video playback: {0}")]
    StartRejected(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    current_secs: f64,
    duration_secs: f64,
    playing: bool,
    metadata_loaded: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_secs(&self) -> f64 {
        self.current_secs
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_metadata_loaded(&self) -> bool {
        self.metadata_loaded
    }

    /// Whether the scrubber should be interactive.
    pub fn can_seek(&self) -> bool {
        self.metadata_loaded && self.duration_secs > 0.0
    }

    /// Video metadata arrived. Unusable durations are stored as 0.
    pub fn on_metadata_loaded(&mut self, duration_secs: f64) {
        self.metadata_loaded = true;
        self.on_duration_change(duration_secs);
        if self.duration_secs == 0.0 {
            tracing::warn!(duration_secs, "Could not read video duration");
        }
    }

    /// Back to the "no video" state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Accepts only finite, positive durations; anything else resets to 0.
    pub fn on_duration_change(&mut self, duration_secs: f64) {
        if duration_secs.is_finite() && duration_secs > 0.0 {
            self.duration_secs = duration_secs;
        } else {
            self.duration_secs = 0.0;
        }
    }

    /// Playback position reported by the host.
    ///
    /// Returns whether the stored position changed.
    pub fn on_time_update(&mut self, secs: f64) -> bool {
        if (self.current_secs - secs).abs() > TIME_UPDATE_THRESHOLD_SECS {
            self.current_secs = secs;
            true
        } else {
            false
        }
    }

    /// User scrubbed to `secs`.
    ///
    /// Returns the clamped position the host should apply to the video, or
    /// `None` when no metadata is loaded.
    pub fn seek(&mut self, secs: f64) -> Option<f64> {
        if !self.metadata_loaded || !secs.is_finite() {
            return None;
        }
        let target = secs.clamp(0.0, self.duration_secs.max(0.0));
        self.current_secs = target;
        Some(target)
    }

    /// Whether a video currently at `video_secs` must be moved to the
    /// timeline position.
    pub fn needs_video_seek(&self, video_secs: f64) -> bool {
        self.duration_secs > 0.0 && (video_secs - self.current_secs).abs() > SEEK_THRESHOLD_SECS
    }

    /// Toggle between playing and paused.
    ///
    /// Pausing always succeeds. Starting needs loaded metadata and at least
    /// [`ReadyState::HaveFutureData`]; `start` asks the host to begin
    /// playback and may refuse, in which case the timeline stays paused.
    /// Returns the new playing state.
    pub fn toggle_play<F>(&mut self, ready: ReadyState, start: F) -> Result<bool, PlaybackError>
    where
        F: FnOnce() -> Result<(), String>,
    {
        if !self.metadata_loaded {
            return Err(PlaybackError::NotLoaded);
        }
        if self.playing {
            self.playing = false;
            return Ok(false);
        }
        if ready < ReadyState::HaveFutureData {
            return Err(PlaybackError::NotEnoughData);
        }
        match start() {
            Ok(()) => {
                self.playing = true;
                Ok(true)
            }
            Err(reason) => {
                tracing::warn!(%reason, "Playback start rejected");
                self.playing = false;
                Err(PlaybackError::StartRejected(reason))
            }
        }
    }

    /// Mirror play/pause/ended events fired by the video element.
    ///
    /// Returns whether the playing state changed.
    pub fn sync_paused(&mut self, paused: bool) -> bool {
        let playing = !paused;
        let changed = self.playing != playing;
        self.playing = playing;
        changed
    }
}

/// Format seconds as `MM:SS`, or `HH:MM:SS` from one hour on.
///
/// Non-finite and negative values render as `00:00`.
pub fn format_timestamp(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "00:00".to_string();
    }
    let total = secs.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
