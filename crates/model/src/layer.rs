//! Layer types: the two crop regions composited into the output.
//!
//! All geometry is in intrinsic source-video pixels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, VideoDimensions, BOUNDS_EPSILON};

/// Upper bound for the default camera inset width (intrinsic pixels).
pub const DEFAULT_CAMERA_MAX_WIDTH: f64 = 320.0;

/// Default camera inset width as a fraction of the frame width.
pub const DEFAULT_CAMERA_WIDTH_RATIO: f64 = 0.25;

/// Default camera inset distance from the top-left corner.
pub const DEFAULT_CAMERA_INSET: f64 = 20.0;

/// Stable layer identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerId {
    Content,
    Camera,
}

impl LayerId {
    /// Both identities, in model order.
    pub const ALL: [LayerId; 2] = [LayerId::Content, LayerId::Camera];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Camera => "camera",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rectangular region of interest in the source video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    /// Left edge of the crop rectangle.
    pub x: f64,
    /// Top edge of the crop rectangle.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees; interpreted mod 360.
    pub rotation: f64,
    /// Stacking order: lower values are drawn first.
    pub z_index: i32,
    pub visible: bool,
}

impl Layer {
    /// Whether the crop rectangle has positive area.
    pub fn is_renderable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// The crop rectangle in intrinsic pixels.
    pub fn source_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Width over height, or `None` when the layer is degenerate.
    pub fn aspect_ratio(&self) -> Option<f64> {
        let ratio = self.width / self.height;
        (ratio.is_finite() && ratio > 0.0).then_some(ratio)
    }

    /// Rotation normalized into `[0, 360)` degrees.
    pub fn normalized_rotation(&self) -> f64 {
        self.rotation.rem_euclid(360.0)
    }

    /// Rotation in radians.
    pub fn rotation_radians(&self) -> f64 {
        self.normalized_rotation().to_radians()
    }

    /// Whether the crop rectangle lies inside the video frame.
    pub fn fits_within(&self, dims: VideoDimensions) -> bool {
        self.source_rect()
            .is_within(&dims.frame_rect(), BOUNDS_EPSILON)
    }

    fn apply(&mut self, patch: &LayerPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
    }
}

/// Numeric fields editable from the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerField {
    X,
    Y,
    Width,
    Height,
    Rotation,
    ZIndex,
}

impl LayerField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Rotation => "rotation",
            Self::ZIndex => "z_index",
        }
    }
}

/// A partial layer update. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl LayerPatch {
    /// Patch that moves the top-left corner.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that replaces the whole crop rectangle.
    pub fn rect(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Self::default()
        }
    }

    pub fn visibility(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Self::default()
        }
    }

    /// Parse a settings-panel text edit into a single-field patch.
    ///
    /// Returns `None` when the text is not a finite number; the edit is then
    /// dropped and the model stays untouched.
    pub fn from_field_input(field: LayerField, input: &str) -> Option<Self> {
        let value: f64 = input.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        let mut patch = Self::default();
        match field {
            LayerField::X => patch.x = Some(value),
            LayerField::Y => patch.y = Some(value),
            LayerField::Width => patch.width = Some(value),
            LayerField::Height => patch.height = Some(value),
            LayerField::Rotation => patch.rotation = Some(value),
            LayerField::ZIndex => {
                let rounded = value.round();
                if rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
                    return None;
                }
                patch.z_index = Some(rounded as i32);
            }
        }
        Some(patch)
    }

    /// Reject patches carrying NaN or infinite values.
    pub fn validate(&self) -> Result<(), LayerError> {
        let numeric = [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("rotation", self.rotation),
        ];
        for (field, value) in numeric {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(LayerError::NonFinite { field, value });
                }
            }
        }
        Ok(())
    }
}

/// Errors raised when a layer update is refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayerError {
    #[error("Field '{field}' must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// The two layers, keyed by identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerModel {
    pub content: Layer,
    pub camera: Layer,
}

impl Default for LayerModel {
    /// Placeholder layers used before any video metadata is known.
    fn default() -> Self {
        Self {
            content: Layer {
                id: LayerId::Content,
                x: 0.0,
                y: 0.0,
                width: 1280.0,
                height: 720.0,
                rotation: 0.0,
                z_index: 1,
                visible: true,
            },
            camera: Layer {
                id: LayerId::Camera,
                x: 10.0,
                y: 10.0,
                width: 256.0,
                height: 144.0,
                rotation: 0.0,
                z_index: 2,
                visible: true,
            },
        }
    }
}

impl LayerModel {
    /// Default layers for a freshly loaded video.
    ///
    /// Content covers the whole frame; camera is a 16:9 inset near the
    /// top-left corner, a quarter of the frame width (at most 320 px).
    pub fn from_video_dimensions(dims: VideoDimensions) -> Self {
        let frame_width = dims.width as f64;
        let camera_width = (frame_width * DEFAULT_CAMERA_WIDTH_RATIO)
            .min(DEFAULT_CAMERA_MAX_WIDTH)
            .max(1.0);
        let camera_height = (camera_width / 16.0 * 9.0).max(1.0);

        Self {
            content: Layer {
                id: LayerId::Content,
                x: 0.0,
                y: 0.0,
                width: frame_width,
                height: dims.height as f64,
                rotation: 0.0,
                z_index: 1,
                visible: true,
            },
            camera: Layer {
                id: LayerId::Camera,
                x: DEFAULT_CAMERA_INSET,
                y: DEFAULT_CAMERA_INSET,
                width: camera_width,
                height: camera_height,
                rotation: 0.0,
                z_index: 2,
                visible: true,
            },
        }
    }

    pub fn get(&self, id: LayerId) -> &Layer {
        match id {
            LayerId::Content => &self.content,
            LayerId::Camera => &self.camera,
        }
    }

    fn get_mut(&mut self, id: LayerId) -> &mut Layer {
        match id {
            LayerId::Content => &mut self.content,
            LayerId::Camera => &mut self.camera,
        }
    }

    /// Both layers in model order (content, camera).
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        [&self.content, &self.camera].into_iter()
    }

    /// Merge `patch` into the layer.
    ///
    /// The patch is validated as a whole before anything is written, so a
    /// rejected patch leaves the layer exactly as it was. Returns whether
    /// the layer changed.
    pub fn update(&mut self, id: LayerId, patch: &LayerPatch) -> Result<bool, LayerError> {
        patch.validate()?;
        let layer = self.get_mut(id);
        let before = *layer;
        layer.apply(patch);
        Ok(*layer != before)
    }

    /// Returns whether the visibility changed.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> bool {
        let layer = self.get_mut(id);
        let changed = layer.visible != visible;
        layer.visible = visible;
        changed
    }

    /// Layers ordered background first.
    ///
    /// The lower `z_index` is the background. On a tie the camera is treated
    /// as the background.
    pub fn draw_order(&self) -> [&Layer; 2] {
        if self.content.z_index < self.camera.z_index {
            [&self.content, &self.camera]
        } else {
            [&self.camera, &self.content]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(w: u32, h: u32) -> VideoDimensions {
        VideoDimensions::new(w, h).unwrap()
    }

    #[test]
    fn test_defaults_for_full_hd() {
        let model = LayerModel::from_video_dimensions(dims(1920, 1080));
        assert_eq!(model.content.source_rect(), Rect::new(0.0, 0.0, 1920.0, 1080.0));
        assert_eq!(model.camera.width, 320.0);
        assert_eq!(model.camera.height, 180.0);
        assert_eq!((model.camera.x, model.camera.y), (20.0, 20.0));
        assert!(model.camera.z_index > model.content.z_index);
        assert!(model.content.visible && model.camera.visible);
    }

    #[test]
    fn test_defaults_for_small_video_use_quarter_width() {
        let model = LayerModel::from_video_dimensions(dims(640, 360));
        assert_eq!(model.camera.width, 160.0);
        assert_eq!(model.camera.height, 90.0);
    }

    #[test]
    fn test_defaults_never_degenerate() {
        let model = LayerModel::from_video_dimensions(dims(2, 2));
        assert!(model.camera.width >= 1.0);
        assert!(model.camera.height >= 1.0);
    }

    #[test]
    fn test_update_merges_fields() {
        let mut model = LayerModel::from_video_dimensions(dims(1920, 1080));
        let changed = model
            .update(LayerId::Camera, &LayerPatch::position(100.0, 50.0))
            .unwrap();
        assert!(changed);
        assert_eq!((model.camera.x, model.camera.y), (100.0, 50.0));
        assert_eq!(model.camera.width, 320.0);
    }

    #[test]
    fn test_update_with_same_values_reports_unchanged() {
        let mut model = LayerModel::from_video_dimensions(dims(1920, 1080));
        let changed = model
            .update(LayerId::Camera, &LayerPatch::position(20.0, 20.0))
            .unwrap();
        assert!(!changed);
    }

    #[test]
    fn test_non_finite_patch_is_rejected_atomically() {
        let mut model = LayerModel::from_video_dimensions(dims(1920, 1080));
        let before = model;
        let patch = LayerPatch {
            x: Some(5.0),
            height: Some(f64::NAN),
            ..LayerPatch::default()
        };
        let err = model.update(LayerId::Content, &patch).unwrap_err();
        assert!(matches!(err, LayerError::NonFinite { field: "height", .. }));
        assert_eq!(model, before);
    }

    #[test]
    fn test_field_input_parsing() {
        assert_eq!(
            LayerPatch::from_field_input(LayerField::X, " 42.5 "),
            Some(LayerPatch {
                x: Some(42.5),
                ..LayerPatch::default()
            })
        );
        assert_eq!(
            LayerPatch::from_field_input(LayerField::ZIndex, "2.6").and_then(|p| p.z_index),
            Some(3)
        );
        assert!(LayerPatch::from_field_input(LayerField::Width, "abc").is_none());
        assert!(LayerPatch::from_field_input(LayerField::Width, "").is_none());
        assert!(LayerPatch::from_field_input(LayerField::Height, "NaN").is_none());
        assert!(LayerPatch::from_field_input(LayerField::Rotation, "inf").is_none());
    }

    #[test]
    fn test_draw_order_follows_z_index() {
        let mut model = LayerModel::from_video_dimensions(dims(1920, 1080));
        assert_eq!(model.draw_order()[0].id, LayerId::Content);

        model.content.z_index = 5;
        assert_eq!(model.draw_order()[0].id, LayerId::Camera);

        model.content.z_index = model.camera.z_index;
        assert_eq!(model.draw_order()[0].id, LayerId::Camera);
    }

    #[test]
    fn test_rotation_is_interpreted_mod_360() {
        let mut layer = LayerModel::default().camera;
        layer.rotation = -90.0;
        assert_eq!(layer.normalized_rotation(), 270.0);
        layer.rotation = 725.0;
        assert!((layer.normalized_rotation() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_layer_serializes_camel_case() {
        let model = LayerModel::default();
        let json = serde_json::to_value(model.camera).unwrap();
        assert_eq!(json["id"], "camera");
        assert_eq!(json["zIndex"], 2);
        let back: Layer = serde_json::from_value(json).unwrap();
        assert_eq!(back, model.camera);
    }

    #[test]
    fn test_fits_within_frame() {
        let d = dims(1920, 1080);
        let mut layer = LayerModel::from_video_dimensions(d).camera;
        assert!(layer.fits_within(d));
        layer.x = 1700.0;
        assert!(!layer.fits_within(d));
    }
}
