//! Owned editor state: the layer model, the loaded video, and UI selection.
//!
//! Every mutation goes through [`EditorState`]. Each call either applies a
//! whole update or nothing, and bumps [`EditorState::revision`] when
//! something changed, so a renderer can tell whether its last frame is stale.

use crate::geometry::VideoDimensions;
use crate::layer::{Layer, LayerError, LayerField, LayerId, LayerModel, LayerPatch};

#[derive(Debug, Clone, Default)]
pub struct EditorState {
    video: Option<VideoDimensions>,
    layers: LayerModel,
    selected: Option<LayerId>,
    revision: u64,
}

impl EditorState {
    /// Editor with no video loaded and placeholder layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the layers for a newly loaded video. Clears the selection.
    pub fn load_video(&mut self, dims: VideoDimensions) {
        tracing::info!(
            width = dims.width,
            height = dims.height,
            "Initializing layers for loaded video"
        );
        self.video = Some(dims);
        self.layers = LayerModel::from_video_dimensions(dims);
        self.selected = None;
        self.bump();
    }

    /// Forget the current video (source swap or load failure).
    pub fn unload_video(&mut self) {
        self.video = None;
        self.layers = LayerModel::default();
        self.selected = None;
        self.bump();
    }

    /// Intrinsic dimensions of the loaded video, if metadata is known.
    pub fn video(&self) -> Option<VideoDimensions> {
        self.video
    }

    pub fn layers(&self) -> &LayerModel {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> &Layer {
        self.layers.get(id)
    }

    /// Layers back to front.
    pub fn layers_in_draw_order(&self) -> [&Layer; 2] {
        self.layers.draw_order()
    }

    /// Monotonic counter bumped on every effective change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a partial update. Returns whether the layer changed.
    pub fn update(&mut self, id: LayerId, patch: &LayerPatch) -> Result<bool, LayerError> {
        let changed = self.layers.update(id, patch)?;
        if changed {
            tracing::debug!(layer = %id, ?patch, "Layer updated");
            self.bump();
        }
        Ok(changed)
    }

    /// Apply a text edit from the settings panel.
    ///
    /// Unparseable input is dropped and `false` returned.
    pub fn apply_field_input(&mut self, id: LayerId, field: LayerField, input: &str) -> bool {
        let Some(patch) = LayerPatch::from_field_input(field, input) else {
            tracing::warn!(
                layer = %id,
                field = field.as_str(),
                input,
                "Ignoring non-numeric layer edit"
            );
            return false;
        };
        // `from_field_input` only yields finite values.
        self.update(id, &patch).unwrap_or(false)
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> bool {
        let changed = self.layers.set_visible(id, visible);
        if changed {
            self.bump();
        }
        changed
    }

    /// Select a layer, or deselect everything with `None`.
    ///
    /// Selection is UI state: it does not bump the revision.
    pub fn select(&mut self, id: Option<LayerId>) -> bool {
        let changed = self.selected != id;
        self.selected = id;
        changed
    }

    pub fn selected(&self) -> Option<LayerId> {
        self.selected
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> EditorState {
        let mut editor = EditorState::new();
        editor.load_video(VideoDimensions::new(1920, 1080).unwrap());
        editor
    }

    #[test]
    fn test_load_video_resets_layers_and_selection() {
        let mut editor = loaded();
        editor.select(Some(LayerId::Camera));
        editor
            .update(LayerId::Camera, &LayerPatch::position(500.0, 500.0))
            .unwrap();

        editor.load_video(VideoDimensions::new(1280, 720).unwrap());
        assert_eq!(editor.selected(), None);
        assert_eq!(editor.layer(LayerId::Content).width, 1280.0);
        assert_eq!(editor.layer(LayerId::Camera).x, 20.0);
    }

    #[test]
    fn test_revision_tracks_effective_changes() {
        let mut editor = loaded();
        let start = editor.revision();

        editor
            .update(LayerId::Camera, &LayerPatch::position(20.0, 20.0))
            .unwrap();
        assert_eq!(editor.revision(), start);

        editor
            .update(LayerId::Camera, &LayerPatch::position(30.0, 20.0))
            .unwrap();
        assert_eq!(editor.revision(), start + 1);

        editor.select(Some(LayerId::Content));
        assert_eq!(editor.revision(), start + 1);

        assert!(editor.set_visible(LayerId::Camera, false));
        assert!(!editor.set_visible(LayerId::Camera, false));
        assert_eq!(editor.revision(), start + 2);
    }

    #[test]
    fn test_field_input_drops_invalid_text() {
        let mut editor = loaded();
        let before = *editor.layers();
        assert!(!editor.apply_field_input(LayerId::Content, LayerField::X, "twelve"));
        assert_eq!(*editor.layers(), before);

        assert!(editor.apply_field_input(LayerId::Content, LayerField::Rotation, "45"));
        assert_eq!(editor.layer(LayerId::Content).rotation, 45.0);
    }

    #[test]
    fn test_unload_video_clears_dimensions() {
        let mut editor = loaded();
        editor.unload_video();
        assert!(editor.video().is_none());
        assert_eq!(*editor.layers(), LayerModel::default());
    }
}
