//! Output canvas sizing.

use serde::Serialize;

use reframe_model::geometry::{fit_contain, Rect, Size};

/// Largest backing store the compositor will allocate (8K UHD at 2x).
pub const MAX_BACKING_PIXELS: u64 = 7680 * 4320 * 2;

/// Output canvas: CSS size plus the backing store in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputCanvas {
    pub css_width: f64,
    pub css_height: f64,
    pub device_pixel_ratio: f64,
    pub backing_width: u32,
    pub backing_height: u32,
}

impl OutputCanvas {
    /// Largest canvas with `aspect` (width / height) that fits the container.
    ///
    /// Returns `None` for a zero-sized container, a degenerate aspect, or a
    /// backing store above [`MAX_BACKING_PIXELS`].
    pub fn fit(container_width: f64, container_height: f64, aspect: f64, device_pixel_ratio: f64) -> Option<Self> {
        if !aspect.is_finite() || aspect <= 0.0 {
            return None;
        }
        let fit = fit_contain(
            Size::new(container_width, container_height),
            Size::new(aspect, 1.0),
        )?;
        let dpr = sanitize_dpr(device_pixel_ratio);
        let backing_width = (fit.width * dpr).round();
        let backing_height = (fit.height * dpr).round();
        if !(backing_width.is_finite() && backing_height.is_finite())
            || backing_width < 1.0
            || backing_height < 1.0
            || backing_width * backing_height > MAX_BACKING_PIXELS as f64
        {
            return None;
        }
        Some(Self {
            css_width: fit.width,
            css_height: fit.height,
            device_pixel_ratio: dpr,
            backing_width: backing_width as u32,
            backing_height: backing_height as u32,
        })
    }

    pub fn css_size(&self) -> Size {
        Size::new(self.css_width, self.css_height)
    }

    /// The whole backing store, in device pixels.
    pub fn backing_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.backing_width as f64, self.backing_height as f64)
    }
}

/// Device pixel ratio with unusable values replaced by 1.
pub fn sanitize_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr
    } else {
        1.0
    }
}
