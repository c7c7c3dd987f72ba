//! Stage layout: where the letterboxed video sits inside the stage element.

use serde::{Deserialize, Serialize};

use reframe_model::geometry::{fit_contain, Point, Rect, Size, VideoDimensions};

/// Stage aspect ratio used before the video's dimensions are known.
pub const FALLBACK_STAGE_ASPECT: f64 = 16.0 / 9.0;

/// The affine mapping between intrinsic video pixels and stage pixels.
///
/// `stage = intrinsic * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageLayout {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub rendered_video_width: f64,
    pub rendered_video_height: f64,
    pub stage_width: f64,
    pub stage_height: f64,
    /// The video dimensions this layout was computed for.
    pub video: VideoDimensions,
}

/// "Contain" fit of the video inside the stage.
///
/// Returns `None` (not ready) for a zero-sized or non-finite stage.
pub fn compute_layout(stage_width: f64, stage_height: f64, video: VideoDimensions) -> Option<StageLayout> {
    let fit = fit_contain(Size::new(stage_width, stage_height), video.as_size())?;
    if !fit.scale.is_finite() || fit.scale <= 0.0 {
        return None;
    }
    Some(StageLayout {
        scale: fit.scale,
        offset_x: fit.offset_x,
        offset_y: fit.offset_y,
        rendered_video_width: fit.width,
        rendered_video_height: fit.height,
        stage_width,
        stage_height,
        video,
    })
}

/// Aspect ratio the host should give the stage element.
pub fn stage_aspect_ratio(video: Option<VideoDimensions>) -> f64 {
    video
        .map(|dims| dims.aspect_ratio())
        .unwrap_or(FALLBACK_STAGE_ASPECT)
}

impl StageLayout {
    /// Intrinsic point to stage point.
    pub fn to_stage(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }

    /// Stage point to intrinsic point.
    pub fn to_intrinsic(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        )
    }

    /// Intrinsic rectangle to stage rectangle (no minimum size applied).
    pub fn rect_to_stage(&self, r: Rect) -> Rect {
        let origin = self.to_stage(Point::new(r.x, r.y));
        Rect::new(origin.x, origin.y, r.width * self.scale, r.height * self.scale)
    }

    /// Area of the stage covered by the video.
    pub fn video_rect(&self) -> Rect {
        Rect::new(
            self.offset_x,
            self.offset_y,
            self.rendered_video_width,
            self.rendered_video_height,
        )
    }
}
