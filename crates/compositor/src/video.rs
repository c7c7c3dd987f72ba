//! Video frame sources.

use std::path::Path;

use image::RgbaImage;

use reframe_common::error::{ReframeError, ReframeResult};
use reframe_model::geometry::VideoDimensions;
use reframe_model::timeline::ReadyState;

/// The host's video element as seen by the compositor.
pub trait VideoSource {
    /// Intrinsic dimensions, once metadata has loaded.
    fn dimensions(&self) -> Option<VideoDimensions>;

    fn ready_state(&self) -> ReadyState;

    /// The frame at the current position, in intrinsic pixels.
    fn current_frame(&self) -> Option<&RgbaImage>;

    fn current_time(&self) -> f64;

    fn duration(&self) -> f64;

    fn is_playing(&self) -> bool;

    /// Whether a frame can be composited right now.
    fn is_ready(&self) -> bool {
        self.ready_state() >= ReadyState::HaveCurrentData
            && self.dimensions().is_some()
            && self.current_frame().is_some()
    }
}

/// A single decoded frame standing in for a paused video.
#[derive(Debug, Clone)]
pub struct StillFrameSource {
    frame: RgbaImage,
    dimensions: VideoDimensions,
    current_time: f64,
    duration: f64,
}

impl StillFrameSource {
    /// Wrap a decoded frame. Fails for an empty image.
    pub fn new(frame: RgbaImage) -> ReframeResult<Self> {
        let dimensions = VideoDimensions::new(frame.width(), frame.height())
            .ok_or_else(|| ReframeError::invalid_input("Frame has zero width or height"))?;
        Ok(Self {
            frame,
            dimensions,
            current_time: 0.0,
            duration: 0.0,
        })
    }

    /// Decode an image file (PNG) into a still frame.
    pub fn open(path: &Path) -> ReframeResult<Self> {
        if !path.exists() {
            return Err(ReframeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let frame = image::open(path)
            .map_err(|e| ReframeError::invalid_input(format!("Cannot decode {}: {e}", path.display())))?
            .to_rgba8();
        tracing::debug!(
            path = %path.display(),
            width = frame.width(),
            height = frame.height(),
            "Loaded still frame"
        );
        Self::new(frame)
    }

    /// Report a timeline position and duration alongside the frame.
    pub fn with_timing(mut self, current_time: f64, duration: f64) -> Self {
        self.current_time = current_time;
        self.duration = duration;
        self
    }
}

impl VideoSource for StillFrameSource {
    fn dimensions(&self) -> Option<VideoDimensions> {
        Some(self.dimensions)
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::HaveEnoughData
    }

    fn current_frame(&self) -> Option<&RgbaImage> {
        Some(&self.frame)
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_playing(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_still_frame_is_ready() {
        let source = StillFrameSource::new(RgbaImage::new(64, 36)).unwrap();
        assert!(source.is_ready());
        assert_eq!(source.dimensions(), VideoDimensions::new(64, 36));
        assert!(!source.is_playing());
    }

    #[test]
    fn test_with_timing_reports_position() {
        let source = StillFrameSource::new(RgbaImage::new(4, 4))
            .unwrap()
            .with_timing(2.5, 10.0);
        assert_eq!(source.current_time(), 2.5);
        assert_eq!(source.duration(), 10.0);
    }

    #[test]
    fn test_empty_frame_rejected() {
        assert!(StillFrameSource::new(RgbaImage::new(0, 10)).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = StillFrameSource::open(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, ReframeError::FileNotFound { .. }));
    }
}
