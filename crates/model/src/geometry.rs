//! Rectangles, sizes, and aspect-ratio fitting.
//!
//! Coordinates are absolute pixels with the origin at the top-left corner.
//! Which pixel space a value lives in (intrinsic video, stage, or output
//! canvas) is decided by the caller; these types only carry the numbers.

use serde::{Deserialize, Serialize};

/// Tolerance used when checking that a rectangle stays inside a frame.
pub const BOUNDS_EPSILON: f64 = 0.01;

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both sides are finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width divided by height, or `None` for degenerate sizes.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_positive() {
            Some(self.width / self.height)
        } else {
            None
        }
    }
}

/// Native decoded pixel dimensions of a source video.
///
/// Only non-zero dimensions can be constructed; "metadata not loaded yet" is
/// represented by the absence of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

impl VideoDimensions {
    /// Returns `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    pub fn as_size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// The full frame as a rectangle.
    pub fn frame_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle at the origin with the given size.
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The center point of this rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether all four components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Check if a point lies inside this rectangle (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether `self` lies entirely inside `outer`, allowing `epsilon` of
    /// overshoot on the far edges.
    pub fn is_within(&self, outer: &Rect, epsilon: f64) -> bool {
        self.x >= outer.x - epsilon
            && self.y >= outer.y - epsilon
            && self.right() <= outer.right() + epsilon
            && self.bottom() <= outer.bottom() + epsilon
    }

    /// Area shared with another rectangle (zero when they only touch).
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    /// Multiply every component by `factor`.
    pub fn scaled(&self, factor: f64) -> Rect {
        Rect::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

/// Result of fitting content of one size into a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Uniform scale applied to the content.
    pub scale: f64,
    /// Horizontal margin on each side (negative for cover overflow).
    pub offset_x: f64,
    /// Vertical margin on each side (negative for cover overflow).
    pub offset_y: f64,
    /// Content width after scaling.
    pub width: f64,
    /// Content height after scaling.
    pub height: f64,
}

impl Fit {
    /// The placed content as a rectangle in container space.
    pub fn rect(&self) -> Rect {
        Rect::new(self.offset_x, self.offset_y, self.width, self.height)
    }
}

/// "Contain" fit: scale uniformly so the content fits inside the container,
/// centered, leaving symmetric margins on one axis.
///
/// Returns `None` when either size is degenerate.
pub fn fit_contain(container: Size, content: Size) -> Option<Fit> {
    fit_with(container, content, f64::min)
}

/// "Cover" fit: scale uniformly so the content fills the container, centered,
/// overflowing (and later cropped) on one axis.
pub fn fit_cover(container: Size, content: Size) -> Option<Fit> {
    fit_with(container, content, f64::max)
}

fn fit_with(container: Size, content: Size, pick: fn(f64, f64) -> f64) -> Option<Fit> {
    if !container.is_positive() || !content.is_positive() {
        return None;
    }
    let scale = pick(
        container.width / content.width,
        container.height / content.height,
    );
    let width = content.width * scale;
    let height = content.height * scale;
    Some(Fit {
        scale,
        offset_x: (container.width - width) / 2.0,
        offset_y: (container.height - height) / 2.0,
        width,
        height,
    })
}
