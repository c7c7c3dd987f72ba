//! Frame compositor: draws one output frame from the layer model and the
//! current video frame.

use image::{Rgba, RgbaImage};
use kurbo::Affine;
use serde::Serialize;

use reframe_model::geometry::{fit_cover, Point, Rect, VideoDimensions, BOUNDS_EPSILON};
use reframe_model::layer::{Layer, LayerId, LayerModel};
use reframe_model::layout::OutputConfig;

use crate::canvas::OutputCanvas;
use crate::destinations::compute_destinations;
use crate::surface::{Filter, RasterSurface, BLACK, WHITE};
use crate::video::VideoSource;

/// Backdrop blur in CSS pixels.
pub const BACKDROP_BLUR_PX: f64 = 10.0;

/// Backdrop brightness multiplier.
pub const BACKDROP_BRIGHTNESS: f64 = 0.6;

pub const PLACEHOLDER_TEXT: &str = "Waiting for video...";

/// Placeholder font size in CSS pixels.
pub const PLACEHOLDER_FONT_SIZE: f64 = 14.0;

const PLACEHOLDER_FILL: Rgba<u8> = Rgba([0, 0, 0, 204]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    /// The video was not ready; the waiting placeholder was drawn.
    Placeholder,
    /// Layers were composited from the current frame.
    Composited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Zero or negative crop size.
    Degenerate,
    /// Crop rectangle reaches outside the video frame.
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedLayer {
    pub id: LayerId,
    pub reason: SkipReason,
}

/// What a single draw did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameReport {
    pub kind: FrameKind,
    pub backdrop: bool,
    /// Layers drawn, in draw order.
    pub drawn: Vec<LayerId>,
    pub skipped: Vec<SkippedLayer>,
}

impl FrameReport {
    fn placeholder() -> Self {
        Self {
            kind: FrameKind::Placeholder,
            backdrop: false,
            drawn: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Output compositor for one preview canvas.
///
/// Holds the output configuration and the canvas sizing derived from the
/// last container size. Layers and frames are passed in per draw.
#[derive(Debug, Clone)]
pub struct Compositor {
    config: OutputConfig,
    container: Option<(f64, f64)>,
    device_pixel_ratio: f64,
    canvas: Option<OutputCanvas>,
}

impl Compositor {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            container: None,
            device_pixel_ratio: 1.0,
            canvas: None,
        }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Switch layout or options. The canvas is re-fitted to the new aspect ratio.
    pub fn set_config(&mut self, config: OutputConfig) {
        self.config = config;
        self.refit();
    }

    /// The preview container changed size (CSS pixels) or moved to a
    /// display with a different pixel ratio.
    pub fn on_container_resized(&mut self, width: f64, height: f64, device_pixel_ratio: f64) -> Option<&OutputCanvas> {
        self.container = Some((width, height));
        self.device_pixel_ratio = device_pixel_ratio;
        self.refit();
        self.canvas.as_ref()
    }

    pub fn canvas(&self) -> Option<&OutputCanvas> {
        self.canvas.as_ref()
    }

    fn refit(&mut self) {
        self.canvas = self.container.and_then(|(w, h)| {
            OutputCanvas::fit(w, h, self.config.layout.aspect().value(), self.device_pixel_ratio)
        });
        match &self.canvas {
            Some(canvas) => tracing::debug!(
                layout = %self.config.layout,
                css_width = canvas.css_width,
                css_height = canvas.css_height,
                backing_width = canvas.backing_width,
                backing_height = canvas.backing_height,
                "Output canvas resized"
            ),
            None => tracing::debug!(
                container = ?self.container,
                device_pixel_ratio = self.device_pixel_ratio,
                "Output canvas not ready"
            ),
        }
    }

    /// Draw one frame.
    ///
    /// The surface is resized to the canvas backing store when needed. Without
    /// a ready video (or without a canvas) the waiting placeholder is drawn.
    pub fn draw_frame<S, V>(&self, surface: &mut S, layers: &LayerModel, video: &V) -> FrameReport
    where
        S: RasterSurface + ?Sized,
        V: VideoSource + ?Sized,
    {
        let Some(canvas) = self.canvas else {
            draw_placeholder(surface, 1.0);
            return FrameReport::placeholder();
        };
        if (surface.width(), surface.height()) != (canvas.backing_width, canvas.backing_height) {
            surface.resize(canvas.backing_width, canvas.backing_height);
        }

        let frame_and_dims = if video.is_ready() {
            video.current_frame().zip(video.dimensions())
        } else {
            None
        };
        let Some((frame, dims)) = frame_and_dims else {
            draw_placeholder(surface, canvas.device_pixel_ratio);
            return FrameReport::placeholder();
        };

        let dpr = canvas.device_pixel_ratio;
        surface.set_transform(Affine::IDENTITY);
        surface.clear();
        surface.fill_rect(canvas.backing_rect(), BLACK);

        let backdrop = self.config.options.add_blurred_background;
        if backdrop {
            draw_backdrop(surface, frame, dims, &canvas);
        }

        let destinations = compute_destinations(self.config.layout, canvas.css_size(), layers);
        let mut report = FrameReport {
            kind: FrameKind::Composited,
            backdrop,
            drawn: Vec::with_capacity(2),
            skipped: Vec::new(),
        };
        for layer in layers.draw_order() {
            let Some(dest) = destinations.get(layer.id) else {
                continue;
            };
            match draw_layer(surface, frame, dims, layer, dest.scaled(dpr)) {
                Ok(()) => report.drawn.push(layer.id),
                Err(reason) => report.skipped.push(SkippedLayer {
                    id: layer.id,
                    reason,
                }),
            }
        }
        report
    }
}

/// Whether a crop rectangle lies inside the frame.
///
/// The origin must be inside `[0, W) × [0, H)`; the far edges may overshoot
/// by [`BOUNDS_EPSILON`].
pub fn source_rect_in_bounds(src: Rect, dims: VideoDimensions) -> bool {
    let (w, h) = (dims.width as f64, dims.height as f64);
    src.x >= 0.0
        && src.x < w
        && src.y >= 0.0
        && src.y < h
        && src.right() <= w + BOUNDS_EPSILON
        && src.bottom() <= h + BOUNDS_EPSILON
}

/// Draw one layer's crop into `dest` (device pixels), rotated around the
/// center of `dest`.
///
/// Degenerate or out-of-bounds layers are skipped; a skip never affects the
/// rest of the frame.
pub fn draw_layer<S>(
    surface: &mut S,
    frame: &RgbaImage,
    dims: VideoDimensions,
    layer: &Layer,
    dest: Rect,
) -> Result<(), SkipReason>
where
    S: RasterSurface + ?Sized,
{
    if !layer.is_renderable() {
        return Err(SkipReason::Degenerate);
    }
    let src = layer.source_rect();
    if !source_rect_in_bounds(src, dims) {
        tracing::warn!(
            layer = %layer.id,
            sx = src.x,
            sy = src.y,
            sw = src.width,
            sh = src.height,
            video_width = dims.width,
            video_height = dims.height,
            "Layer source rect out of bounds, skipping"
        );
        return Err(SkipReason::OutOfBounds);
    }

    let center = dest.center();
    surface.save();
    surface.translate(center.x, center.y);
    surface.rotate(layer.rotation_radians());
    surface.translate(-center.x, -center.y);
    surface.draw_image(frame, src, dest, Filter::NONE);
    surface.restore();
    Ok(())
}

/// Full frame, cover-fitted to the canvas, blurred and darkened.
fn draw_backdrop<S>(surface: &mut S, frame: &RgbaImage, dims: VideoDimensions, canvas: &OutputCanvas)
where
    S: RasterSurface + ?Sized,
{
    let Some(fit) = fit_cover(canvas.css_size(), dims.as_size()) else {
        return;
    };
    let dpr = canvas.device_pixel_ratio;
    surface.draw_image(
        frame,
        dims.frame_rect(),
        fit.rect().scaled(dpr),
        Filter {
            blur_radius: BACKDROP_BLUR_PX * dpr,
            brightness: BACKDROP_BRIGHTNESS,
        },
    );
}

fn draw_placeholder<S>(surface: &mut S, dpr: f64)
where
    S: RasterSurface + ?Sized,
{
    let (w, h) = (surface.width() as f64, surface.height() as f64);
    surface.set_transform(Affine::IDENTITY);
    surface.clear();
    surface.fill_rect(Rect::new(0.0, 0.0, w, h), PLACEHOLDER_FILL);
    surface.fill_text(
        PLACEHOLDER_TEXT,
        Point::new(w / 2.0, h / 2.0),
        PLACEHOLDER_FONT_SIZE * dpr,
        WHITE,
    );
}
