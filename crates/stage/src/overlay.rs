//! Layer overlay boxes drawn on top of the stage.

use serde::{Deserialize, Serialize};

use reframe_model::geometry::{Point, Rect};
use reframe_model::layer::LayerId;

/// Stacking value given to the selected overlay so it sits above the others.
pub const SELECTED_OVERLAY_Z: i32 = 50;

/// Where an overlay box is shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayPlacement {
    /// Layout not ready: keep the box off the stage entirely.
    Hidden,
    /// Box in stage pixels.
    Placed { rect: Rect },
}

/// Interactive box for one layer, in stage space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayBox {
    pub id: LayerId,
    pub placement: OverlayPlacement,
    /// Degrees, applied around the box center.
    pub rotation: f64,
    pub z_index: i32,
    pub selected: bool,
}

impl OverlayBox {
    pub fn rect(&self) -> Option<Rect> {
        match self.placement {
            OverlayPlacement::Placed { rect } => Some(rect),
            OverlayPlacement::Hidden => None,
        }
    }

    /// Stacking value on the stage: the selected box always comes first.
    pub fn display_z(&self) -> i32 {
        if self.selected {
            SELECTED_OVERLAY_Z
        } else {
            self.z_index
        }
    }

    /// Whether a stage point falls inside the (possibly rotated) box.
    pub fn contains(&self, p: Point) -> bool {
        let Some(rect) = self.rect() else {
            return false;
        };
        let center = rect.center();
        let (sin, cos) = (-self.rotation.to_radians()).sin_cos();
        let dx = p.x - center.x;
        let dy = p.y - center.y;
        let local = Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos);
        rect.contains(local)
    }
}
