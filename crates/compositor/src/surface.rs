//! 2D raster surfaces the compositor draws into.
//!
//! [`RasterSurface`] is the small canvas-like capability the compositor
//! needs: a transform stack, rectangle fills, and cropped, scaled image
//! draws with an optional blur/brightness filter. [`PixmapSurface`]
//! rasterizes into an RGBA buffer; [`RecordingSurface`] only records the
//! calls.

use std::borrow::Cow;
use std::path::Path;

use image::{imageops, ImageFormat, Rgba, RgbaImage};
use kurbo::Affine;

use reframe_common::error::{ReframeError, ReframeResult};
use reframe_model::geometry::{Point, Rect};

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Blur and brightness applied to an image draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filter {
    /// Gaussian standard deviation in device pixels. 0 disables the blur.
    pub blur_radius: f64,
    /// Multiplier on the color channels. 1 leaves colors unchanged.
    pub brightness: f64,
}

impl Filter {
    pub const NONE: Filter = Filter {
        blur_radius: 0.0,
        brightness: 1.0,
    };
}

impl Default for Filter {
    fn default() -> Self {
        Self::NONE
    }
}

/// Canvas-like drawing target.
///
/// Geometry passed to the drawing calls is in the surface's current user
/// space; the current transform maps it to device pixels.
pub trait RasterSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Reallocate the backing store. Clears all content and resets the transform.
    fn resize(&mut self, width: u32, height: u32);

    fn transform(&self) -> Affine;

    fn set_transform(&mut self, transform: Affine);

    /// Push the current transform.
    fn save(&mut self);

    /// Pop the transform pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Set every pixel to transparent, ignoring the transform.
    fn clear(&mut self);

    /// Source-over fill of a rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>);

    /// Draw the `src` region of `frame` scaled into `dst`.
    fn draw_image(&mut self, frame: &RgbaImage, src: Rect, dst: Rect, filter: Filter);

    /// Draw a single line of text centered on `center`.
    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, color: Rgba<u8>);

    fn translate(&mut self, dx: f64, dy: f64) {
        let t = self.transform();
        self.set_transform(t * Affine::translate((dx, dy)));
    }

    fn rotate(&mut self, radians: f64) {
        let t = self.transform();
        self.set_transform(t * Affine::rotate(radians));
    }
}

// ---------------------------------------------------------------------------
// Recording surface
// ---------------------------------------------------------------------------

/// One recorded drawing call, with the transform in effect at the time.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect {
        rect: Rect,
        color: Rgba<u8>,
        transform: Affine,
    },
    DrawImage {
        src: Rect,
        dst: Rect,
        filter: Filter,
        transform: Affine,
    },
    FillText {
        text: String,
        center: Point,
        font_size: f64,
        color: Rgba<u8>,
        transform: Affine,
    },
}

/// Surface that records drawing calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    transform: Affine,
    stack: Vec<Affine>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            transform: Affine::IDENTITY,
            stack: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Depth of the save/restore stack.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }
}

impl RasterSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.transform = Affine::IDENTITY;
        self.stack.clear();
        self.commands.clear();
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color,
            transform: self.transform,
        });
    }

    fn draw_image(&mut self, _frame: &RgbaImage, src: Rect, dst: Rect, filter: Filter) {
        self.commands.push(DrawCommand::DrawImage {
            src,
            dst,
            filter,
            transform: self.transform,
        });
    }

    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, color: Rgba<u8>) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            center,
            font_size,
            color,
            transform: self.transform,
        });
    }
}

// ---------------------------------------------------------------------------
// Software raster surface
// ---------------------------------------------------------------------------

/// Software RGBA surface.
///
/// Draws are rasterized by inverse-mapping each covered device pixel center
/// into user space and sampling the nearest source pixel. Text is not
/// rasterized.
#[derive(Debug, Clone)]
pub struct PixmapSurface {
    image: RgbaImage,
    transform: Affine,
    stack: Vec<Affine>,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            transform: Affine::IDENTITY,
            stack: Vec::new(),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Write the surface as a PNG file.
    pub fn save_png(&self, path: &Path) -> ReframeResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| ReframeError::render(format!("Failed to write {}: {e}", path.display())))
    }

    /// Visit every device pixel whose center falls inside `rect` (user space).
    ///
    /// `shade` receives the user-space position of the pixel center and
    /// returns the color to composite, if any.
    fn shade_rect<F>(&mut self, rect: Rect, mut shade: F)
    where
        F: FnMut(Point) -> Option<Rgba<u8>>,
    {
        if !rect.is_finite() || rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let transform = self.transform;
        if transform.determinant().abs() < f64::EPSILON {
            return;
        }
        let inverse = transform.inverse();

        let corners = [
            (rect.x, rect.y),
            (rect.right(), rect.y),
            (rect.x, rect.bottom()),
            (rect.right(), rect.bottom()),
        ]
        .map(|(x, y)| transform * kurbo::Point::new(x, y));
        let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        let (width, height) = self.image.dimensions();
        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = (max_x.ceil().max(0.0) as u32).min(width);
        let y1 = (max_y.ceil().max(0.0) as u32).min(height);

        for py in y0..y1 {
            for px in x0..x1 {
                let local = inverse * kurbo::Point::new(px as f64 + 0.5, py as f64 + 0.5);
                if local.x < rect.x
                    || local.x >= rect.right()
                    || local.y < rect.y
                    || local.y >= rect.bottom()
                {
                    continue;
                }
                if let Some(color) = shade(Point::new(local.x, local.y)) {
                    blend_over(self.image.get_pixel_mut(px, py), color);
                }
            }
        }
    }
}

impl RasterSurface for PixmapSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
        self.transform = Affine::IDENTITY;
        self.stack.clear();
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        self.shade_rect(rect, |_| Some(color));
    }

    fn draw_image(&mut self, frame: &RgbaImage, src: Rect, dst: Rect, filter: Filter) {
        let (frame_w, frame_h) = frame.dimensions();
        if frame_w == 0 || frame_h == 0 || src.width <= 0.0 || src.height <= 0.0 {
            return;
        }
        if !src.is_finite() || dst.width <= 0.0 || dst.height <= 0.0 {
            return;
        }

        // Whole-pixel window of the frame covering `src`.
        let win_x = src.x.floor().clamp(0.0, (frame_w - 1) as f64) as u32;
        let win_y = src.y.floor().clamp(0.0, (frame_h - 1) as f64) as u32;
        let win_w = ((src.right().ceil() as i64 - win_x as i64).max(1) as u32).min(frame_w - win_x);
        let win_h = ((src.bottom().ceil() as i64 - win_y as i64).max(1) as u32).min(frame_h - win_y);

        // Working pixels plus the mapping from frame pixels into them.
        let (pixels, origin_x, origin_y, kx, ky): (Cow<'_, RgbaImage>, f64, f64, f64, f64) =
            if filter.blur_radius > 0.0 {
                let device_scale = self.transform.determinant().abs().sqrt();
                // Device pixels covered by the window along each axis.
                let device_w = win_w as f64 * dst.width * device_scale / src.width;
                let device_h = win_h as f64 * dst.height * device_scale / src.height;
                let target_w = (device_w.ceil() as u32).clamp(1, win_w);
                let target_h = (device_h.ceil() as u32).clamp(1, win_h);

                let mut window = imageops::crop_imm(frame, win_x, win_y, win_w, win_h).to_image();
                if target_w < win_w || target_h < win_h {
                    window = imageops::resize(&window, target_w, target_h, imageops::FilterType::Triangle);
                }
                let kx = target_w as f64 / win_w as f64;
                let ky = target_h as f64 / win_h as f64;
                // Device pixels per working pixel, to express the blur in working space.
                let per_pixel = ((device_w / target_w as f64) * (device_h / target_h as f64)).sqrt();
                let sigma = (filter.blur_radius / per_pixel.max(f64::EPSILON)) as f32;
                (
                    Cow::Owned(imageops::blur(&window, sigma.max(0.01))),
                    win_x as f64,
                    win_y as f64,
                    kx,
                    ky,
                )
            } else {
                (Cow::Borrowed(frame), 0.0, 0.0, 1.0, 1.0)
            };
        let (pix_w, pix_h) = pixels.dimensions();
        let x_ratio = src.width / dst.width;
        let y_ratio = src.height / dst.height;
        let brightness = filter.brightness;

        self.shade_rect(dst, |local| {
            let sx = (src.x + (local.x - dst.x) * x_ratio - origin_x) * kx;
            let sy = (src.y + (local.y - dst.y) * y_ratio - origin_y) * ky;
            let ix = (sx.floor().max(0.0) as u32).min(pix_w - 1);
            let iy = (sy.floor().max(0.0) as u32).min(pix_h - 1);
            let mut color = *pixels.get_pixel(ix, iy);
            if brightness != 1.0 {
                for channel in &mut color.0[..3] {
                    *channel = (*channel as f64 * brightness).round().clamp(0.0, 255.0) as u8;
                }
            }
            Some(color)
        });
    }

    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, _color: Rgba<u8>) {
        tracing::trace!(text, x = center.x, y = center.y, font_size, "Text is not rasterized");
    }
}

/// Source-over compositing of `src` onto `dst` (straight alpha).
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let src_a = src.0[3] as f64 / 255.0;
    if src_a >= 1.0 {
        *dst = src;
        return;
    }
    if src_a <= 0.0 {
        return;
    }
    let dst_a = dst.0[3] as f64 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    for i in 0..3 {
        let s = src.0[i] as f64;
        let d = dst.0[i] as f64;
        let c = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        dst.0[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
