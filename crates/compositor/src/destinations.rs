//! Destination rectangles for each layer in the output canvas.
//!
//! All rectangles are in CSS pixels of the output canvas; the compositor
//! multiplies them by the device pixel ratio right before drawing.

use reframe_model::geometry::{Rect, Size};
use reframe_model::layer::{Layer, LayerId, LayerModel};
use reframe_model::layout::{Arrangement, Corner, DockEdge, OutputLayout};

/// Share of the canvas height taken by the docked camera strip.
pub const CAMERA_STRIP_RATIO: f64 = 0.25;

/// Picture-in-picture width as a share of the canvas width.
pub const PIP_WIDTH_RATIO: f64 = 0.25;

/// PIP inset from the canvas edges, as a share of the shorter canvas side.
pub const PIP_PADDING_RATIO: f64 = 0.02;

/// Camera aspect used when the camera layer is degenerate.
pub const FALLBACK_CAMERA_ASPECT: f64 = 16.0 / 9.0;

/// Where each layer lands in the canvas. `None` means the layer is not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Destinations {
    pub content: Option<Rect>,
    pub camera: Option<Rect>,
}

impl Destinations {
    pub fn get(&self, id: LayerId) -> Option<Rect> {
        match id {
            LayerId::Content => self.content,
            LayerId::Camera => self.camera,
        }
    }
}

/// Compute the destination rectangles for `layout` on a canvas of `canvas` CSS pixels.
///
/// Hidden layers get no destination. A docked layout whose camera is hidden
/// gives the content the whole canvas.
pub fn compute_destinations(layout: OutputLayout, canvas: Size, layers: &LayerModel) -> Destinations {
    let full = Rect::from_size(canvas);
    let content = &layers.content;
    let camera = &layers.camera;

    match layout.arrangement() {
        Arrangement::ContentOnly => Destinations {
            content: content.visible.then_some(full),
            camera: None,
        },
        Arrangement::CameraDocked(edge) => {
            let strip = if camera.visible {
                canvas.height * CAMERA_STRIP_RATIO
            } else {
                0.0
            };
            let (camera_y, content_y) = match edge {
                DockEdge::Top => (0.0, strip),
                DockEdge::Bottom => (canvas.height - strip, 0.0),
            };
            Destinations {
                content: content
                    .visible
                    .then(|| Rect::new(0.0, content_y, canvas.width, canvas.height - strip)),
                camera: camera
                    .visible
                    .then(|| Rect::new(0.0, camera_y, canvas.width, strip)),
            }
        }
        Arrangement::PictureInPicture(corner) => Destinations {
            content: content.visible.then_some(full),
            camera: camera.visible.then(|| pip_rect(canvas, camera, corner)),
        },
    }
}

/// Camera inset for a PIP layout.
///
/// The height follows the camera layer's current aspect ratio. An inset too
/// tall for the canvas is shrunk, keeping that aspect, so it stays inside
/// the padded area.
fn pip_rect(canvas: Size, camera: &Layer, corner: Corner) -> Rect {
    let padding = canvas.width.min(canvas.height) * PIP_PADDING_RATIO;
    let aspect = camera.aspect_ratio().unwrap_or(FALLBACK_CAMERA_ASPECT);

    let mut width = canvas.width * PIP_WIDTH_RATIO;
    let mut height = width / aspect;
    let max_height = (canvas.height - 2.0 * padding).max(0.0);
    if height > max_height {
        height = max_height;
        width = height * aspect;
    }

    let x = match corner {
        Corner::TopLeft | Corner::BottomLeft => padding,
        Corner::TopRight | Corner::BottomRight => canvas.width - width - padding,
    };
    let y = match corner {
        Corner::TopLeft | Corner::TopRight => padding,
        Corner::BottomLeft | Corner::BottomRight => canvas.height - height - padding,
    };
    Rect::new(x, y, width, height)
}
