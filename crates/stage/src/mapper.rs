//! Stage coordinate mapper.
//!
//! Owns the cached [`StageLayout`] and turns stage-space gestures into
//! clamped layer updates. The cache is recomputed synchronously on every
//! resize or metadata notification, so a gesture is never converted with a
//! layout older than the latest stage size.

use reframe_model::editor::EditorState;
use reframe_model::geometry::{fit_contain, Point, Rect, Size, VideoDimensions};
use reframe_model::layer::{Layer, LayerId, LayerPatch};

use crate::layout::{compute_layout, StageLayout};
use crate::overlay::{OverlayBox, OverlayPlacement};

/// Smallest layer side a resize can produce (intrinsic pixels).
pub const MIN_LAYER_SIZE: f64 = 1.0;

/// Smallest overlay side shown on the stage (stage pixels).
pub const MIN_OVERLAY_SIZE: f64 = 1.0;

/// Interaction reported by the host's gesture source. Coordinates are stage pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageGesture {
    /// A layer box was dropped with its top-left corner at `(x, y)`.
    DragStop { id: LayerId, x: f64, y: f64 },
    /// A layer box was resized to the given top-left corner and size.
    ResizeStop {
        id: LayerId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Click on a layer box. Never reaches the background.
    ClickLayer(LayerId),
    /// Click on empty stage area.
    ClickBackground,
}

/// What a gesture did to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The layer was written.
    Updated(LayerId),
    /// The gesture mapped onto the layer's current geometry.
    Unchanged,
    /// Selection changed to the given value.
    SelectionChanged(Option<LayerId>),
    /// The layout is not ready or the layer is hidden; nothing happened.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct StageMapper {
    stage: Option<Size>,
    video: Option<VideoDimensions>,
    layout: Option<StageLayout>,
}

impl StageMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stage element changed size.
    pub fn on_stage_resized(&mut self, width: f64, height: f64) -> Option<&StageLayout> {
        self.stage = Some(Size::new(width, height));
        self.recompute()
    }

    /// Video metadata loaded (or was lost with `None`).
    pub fn on_video_metadata(&mut self, video: Option<VideoDimensions>) -> Option<&StageLayout> {
        self.video = video;
        self.recompute()
    }

    /// Current layout, or `None` while not ready.
    pub fn layout(&self) -> Option<&StageLayout> {
        self.layout.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.layout.is_some()
    }

    fn recompute(&mut self) -> Option<&StageLayout> {
        self.layout = match (self.stage, self.video) {
            (Some(stage), Some(video)) => compute_layout(stage.width, stage.height, video),
            _ => None,
        };
        match &self.layout {
            Some(layout) => tracing::debug!(
                scale = layout.scale,
                offset_x = layout.offset_x,
                offset_y = layout.offset_y,
                "Stage layout recomputed"
            ),
            None => tracing::debug!("Stage layout not ready"),
        }
        self.layout.as_ref()
    }

    /// Layout usable for `editor`: present and computed for the editor's video.
    fn layout_for(&self, editor: &EditorState) -> Option<&StageLayout> {
        let layout = self.layout.as_ref()?;
        (editor.video() == Some(layout.video)).then_some(layout)
    }

    /// Convert a drag stop into a position patch.
    ///
    /// The new position keeps the whole layer inside the frame. Returns
    /// `None` when not ready, when the input is not finite, or when the
    /// clamped position equals the current one.
    pub fn drag_patch(&self, layer: &Layer, stage_x: f64, stage_y: f64) -> Option<LayerPatch> {
        let layout = self.layout.as_ref()?;
        if !stage_x.is_finite() || !stage_y.is_finite() {
            return None;
        }
        let video = layout.to_intrinsic(Point::new(stage_x, stage_y));
        let (frame_w, frame_h) = (layout.video.width as f64, layout.video.height as f64);

        // `min` before `max`: a layer wider than the frame pins to 0.
        let x = video.x.min(frame_w - layer.width).max(0.0);
        let y = video.y.min(frame_h - layer.height).max(0.0);

        if x == layer.x && y == layer.y {
            return None;
        }
        Some(LayerPatch::position(x, y))
    }

    /// Convert a resize stop into a rectangle patch.
    ///
    /// Aspect ratio is not re-derived here; the gesture source locks it
    /// before reporting (see [`constrain_to_aspect`]).
    pub fn resize_patch(
        &self,
        layer: &Layer,
        stage_x: f64,
        stage_y: f64,
        stage_width: f64,
        stage_height: f64,
    ) -> Option<LayerPatch> {
        let layout = self.layout.as_ref()?;
        if ![stage_x, stage_y, stage_width, stage_height]
            .iter()
            .all(|v| v.is_finite())
        {
            return None;
        }
        let origin = layout.to_intrinsic(Point::new(stage_x, stage_y));
        let (frame_w, frame_h) = (layout.video.width as f64, layout.video.height as f64);

        // Leave room for the minimum size so the rectangle stays in frame.
        let x = origin.x.max(0.0).min(frame_w - MIN_LAYER_SIZE);
        let y = origin.y.max(0.0).min(frame_h - MIN_LAYER_SIZE);
        let width = (stage_width / layout.scale)
            .min(frame_w - x)
            .max(MIN_LAYER_SIZE);
        let height = (stage_height / layout.scale)
            .min(frame_h - y)
            .max(MIN_LAYER_SIZE);

        let rect = Rect::new(x, y, width, height);
        if rect == layer.source_rect() {
            return None;
        }
        Some(LayerPatch::rect(rect))
    }

    /// Apply a gesture to the editor.
    pub fn handle_gesture(&self, editor: &mut EditorState, gesture: StageGesture) -> GestureOutcome {
        match gesture {
            StageGesture::ClickBackground => {
                if editor.select(None) {
                    GestureOutcome::SelectionChanged(None)
                } else {
                    GestureOutcome::Unchanged
                }
            }
            StageGesture::ClickLayer(id) => {
                if !editor.layer(id).visible {
                    return GestureOutcome::Ignored;
                }
                if editor.select(Some(id)) {
                    GestureOutcome::SelectionChanged(Some(id))
                } else {
                    GestureOutcome::Unchanged
                }
            }
            StageGesture::DragStop { id, x, y } => {
                self.apply_edit(editor, id, |layer| self.drag_patch(layer, x, y))
            }
            StageGesture::ResizeStop {
                id,
                x,
                y,
                width,
                height,
            } => self.apply_edit(editor, id, |layer| {
                self.resize_patch(layer, x, y, width, height)
            }),
        }
    }

    fn apply_edit<F>(&self, editor: &mut EditorState, id: LayerId, to_patch: F) -> GestureOutcome
    where
        F: FnOnce(&Layer) -> Option<LayerPatch>,
    {
        if self.layout_for(editor).is_none() {
            tracing::debug!(layer = %id, "Ignoring gesture: stage layout not ready");
            return GestureOutcome::Ignored;
        }
        let layer = *editor.layer(id);
        if !layer.visible {
            return GestureOutcome::Ignored;
        }
        let Some(patch) = to_patch(&layer) else {
            return GestureOutcome::Unchanged;
        };
        match editor.update(id, &patch) {
            Ok(true) => GestureOutcome::Updated(id),
            Ok(false) => GestureOutcome::Unchanged,
            Err(e) => {
                tracing::warn!(layer = %id, error = %e, "Dropping gesture update");
                GestureOutcome::Ignored
            }
        }
    }

    /// Overlay box for one layer.
    ///
    /// Without a layout the box is hidden rather than left at a stale position.
    pub fn overlay_for(&self, layer: &Layer, selected: bool) -> OverlayBox {
        let placement = match &self.layout {
            Some(layout) => {
                let origin = layout.to_stage(Point::new(layer.x, layer.y));
                OverlayPlacement::Placed {
                    rect: Rect::new(
                        origin.x,
                        origin.y,
                        (layer.width * layout.scale).max(MIN_OVERLAY_SIZE),
                        (layer.height * layout.scale).max(MIN_OVERLAY_SIZE),
                    ),
                }
            }
            None => OverlayPlacement::Hidden,
        };
        OverlayBox {
            id: layer.id,
            placement,
            rotation: layer.rotation,
            z_index: layer.z_index,
            selected,
        }
    }

    /// Overlay boxes for the visible, renderable layers, lowest `z_index` first.
    ///
    /// Empty while the layout is not ready for the editor's video.
    pub fn overlays(&self, editor: &EditorState) -> Vec<OverlayBox> {
        if self.layout_for(editor).is_none() {
            return Vec::new();
        }
        let mut boxes: Vec<OverlayBox> = editor
            .layers()
            .iter()
            .filter(|layer| layer.visible && layer.is_renderable())
            .map(|layer| self.overlay_for(layer, editor.selected() == Some(layer.id)))
            .collect();
        boxes.sort_by_key(|b| b.z_index);
        boxes
    }

    /// Topmost overlay under a stage point.
    pub fn hit_test(&self, editor: &EditorState, x: f64, y: f64) -> Option<LayerId> {
        let point = Point::new(x, y);
        let mut boxes = self.overlays(editor);
        boxes.sort_by_key(|b| std::cmp::Reverse(b.display_z()));
        boxes.into_iter().find(|b| b.contains(point)).map(|b| b.id)
    }

    /// Route a click at a stage point to the layer under it, or to the background.
    pub fn click_at(&self, editor: &mut EditorState, x: f64, y: f64) -> GestureOutcome {
        let gesture = match self.hit_test(editor, x, y) {
            Some(id) => StageGesture::ClickLayer(id),
            None => StageGesture::ClickBackground,
        };
        self.handle_gesture(editor, gesture)
    }
}

/// Largest size with the given aspect ratio that fits inside `proposed`.
///
/// Gesture sources use this to lock a layer's aspect ratio while resizing.
/// Degenerate input is returned unchanged.
pub fn constrain_to_aspect(proposed: Size, aspect: f64) -> Size {
    if !aspect.is_finite() || aspect <= 0.0 {
        return proposed;
    }
    match fit_contain(proposed, Size::new(aspect, 1.0)) {
        Some(fit) => Size::new(fit.width, fit.height),
        None => proposed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(stage_w: f64, stage_h: f64) -> (StageMapper, EditorState) {
        let dims = VideoDimensions::new(1920, 1080).unwrap();
        let mut editor = EditorState::new();
        editor.load_video(dims);
        let mut mapper = StageMapper::new();
        mapper.on_video_metadata(Some(dims));
        mapper.on_stage_resized(stage_w, stage_h);
        (mapper, editor)
    }

    #[test]
    fn test_not_ready_until_both_inputs_known() {
        let mut mapper = StageMapper::new();
        assert!(mapper.on_stage_resized(800.0, 800.0).is_none());
        assert!(mapper
            .on_video_metadata(VideoDimensions::new(1920, 1080))
            .is_some());
        assert!(mapper.on_stage_resized(0.0, 800.0).is_none());
        assert!(!mapper.is_ready());
    }

    #[test]
    fn test_drag_clamps_to_right_edge() {
        let (mapper, mut editor) = ready(1920.0, 1080.0);
        editor
            .update(
                LayerId::Camera,
                &LayerPatch::rect(Rect::new(1800.0, 1000.0, 200.0, 150.0)),
            )
            .unwrap();

        // Scale is 1 with no offsets, so stage equals intrinsic here.
        let outcome = mapper.handle_gesture(
            &mut editor,
            StageGesture::DragStop {
                id: LayerId::Camera,
                x: 1850.0,
                y: 1000.0,
            },
        );
        assert_eq!(outcome, GestureOutcome::Updated(LayerId::Camera));
        let camera = editor.layer(LayerId::Camera);
        assert_eq!(camera.x, 1720.0);
        assert_eq!(camera.y, 930.0);
    }

    #[test]
    fn test_drag_converts_through_letterbox() {
        let (mapper, mut editor) = ready(800.0, 800.0);
        let layout = *mapper.layout().unwrap();
        let stage = layout.to_stage(Point::new(400.0, 300.0));

        mapper.handle_gesture(
            &mut editor,
            StageGesture::DragStop {
                id: LayerId::Camera,
                x: stage.x,
                y: stage.y,
            },
        );
        let camera = editor.layer(LayerId::Camera);
        assert!((camera.x - 400.0).abs() < 1e-9);
        assert!((camera.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_to_same_position_is_unchanged() {
        let (mapper, mut editor) = ready(1920.0, 1080.0);
        let revision = editor.revision();
        let outcome = mapper.handle_gesture(
            &mut editor,
            StageGesture::DragStop {
                id: LayerId::Camera,
                x: 20.0,
                y: 20.0,
            },
        );
        assert_eq!(outcome, GestureOutcome::Unchanged);
        assert_eq!(editor.revision(), revision);
    }

    #[test]
    fn test_resize_enforces_minimum_and_bounds() {
        let (mapper, mut editor) = ready(960.0, 540.0);
        mapper.handle_gesture(
            &mut editor,
            StageGesture::ResizeStop {
                id: LayerId::Camera,
                x: -50.0,
                y: 10.0,
                width: 0.1,
                height: 5000.0,
            },
        );
        let camera = editor.layer(LayerId::Camera);
        assert_eq!(camera.x, 0.0);
        assert!((camera.y - 20.0).abs() < 1e-9);
        assert_eq!(camera.width, 1.0);
        assert!((camera.height - 1060.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_far_outside_stays_in_frame() {
        let (mapper, mut editor) = ready(960.0, 540.0);
        mapper.handle_gesture(
            &mut editor,
            StageGesture::ResizeStop {
                id: LayerId::Content,
                x: 1e6,
                y: 1e6,
                width: 10.0,
                height: 10.0,
            },
        );
        let content = editor.layer(LayerId::Content);
        assert!(content.fits_within(editor.video().unwrap()));
        assert_eq!(content.width, 1.0);
    }

    #[test]
    fn test_gestures_ignored_when_not_ready_or_hidden() {
        let (_, mut editor) = ready(800.0, 800.0);
        let unready = StageMapper::new();
        let outcome = unready.handle_gesture(
            &mut editor,
            StageGesture::DragStop {
                id: LayerId::Camera,
                x: 100.0,
                y: 100.0,
            },
        );
        assert_eq!(outcome, GestureOutcome::Ignored);

        let (mapper, mut editor) = ready(800.0, 800.0);
        editor.set_visible(LayerId::Camera, false);
        let outcome = mapper.handle_gesture(
            &mut editor,
            StageGesture::DragStop {
                id: LayerId::Camera,
                x: 100.0,
                y: 100.0,
            },
        );
        assert_eq!(outcome, GestureOutcome::Ignored);
    }

    #[test]
    fn test_stale_layout_is_not_used_after_video_swap() {
        let (mapper, mut editor) = ready(800.0, 800.0);
        editor.load_video(VideoDimensions::new(640, 360).unwrap());
        let outcome = mapper.handle_gesture(
            &mut editor,
            StageGesture::DragStop {
                id: LayerId::Camera,
                x: 300.0,
                y: 300.0,
            },
        );
        assert_eq!(outcome, GestureOutcome::Ignored);
        assert!(mapper.overlays(&editor).is_empty());
    }

    #[test]
    fn test_overlay_hidden_without_layout() {
        let editor = EditorState::new();
        let mapper = StageMapper::new();
        let overlay = mapper.overlay_for(editor.layer(LayerId::Content), false);
        assert_eq!(overlay.placement, OverlayPlacement::Hidden);
    }

    #[test]
    fn test_overlay_minimum_size() {
        let (mapper, mut editor) = ready(192.0, 108.0);
        editor
            .update(
                LayerId::Camera,
                &LayerPatch::rect(Rect::new(0.0, 0.0, 2.0, 2.0)),
            )
            .unwrap();
        let overlay = mapper.overlay_for(editor.layer(LayerId::Camera), false);
        let rect = overlay.rect().unwrap();
        assert_eq!((rect.width, rect.height), (1.0, 1.0));
    }

    #[test]
    fn test_overlays_sorted_and_filtered() {
        let (mapper, mut editor) = ready(800.0, 800.0);
        editor.select(Some(LayerId::Content));
        let boxes = mapper.overlays(&editor);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].id, LayerId::Content);
        assert!(boxes[0].selected);

        editor.set_visible(LayerId::Content, false);
        let boxes = mapper.overlays(&editor);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].id, LayerId::Camera);
    }

    #[test]
    fn test_click_selection_flow() {
        let (mapper, mut editor) = ready(1920.0, 1080.0);

        // The camera inset sits on top of the content at (20, 20).
        assert_eq!(
            mapper.click_at(&mut editor, 50.0, 50.0),
            GestureOutcome::SelectionChanged(Some(LayerId::Camera))
        );
        assert_eq!(editor.selected(), Some(LayerId::Camera));

        assert_eq!(
            mapper.click_at(&mut editor, 1000.0, 800.0),
            GestureOutcome::SelectionChanged(Some(LayerId::Content))
        );

        editor.set_visible(LayerId::Content, false);
        assert_eq!(
            mapper.click_at(&mut editor, 1000.0, 800.0),
            GestureOutcome::SelectionChanged(None)
        );
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn test_selected_overlay_wins_hit_test() {
        let (mapper, mut editor) = ready(1920.0, 1080.0);
        editor.select(Some(LayerId::Content));
        assert_eq!(mapper.hit_test(&editor, 50.0, 50.0), Some(LayerId::Content));
    }

    #[test]
    fn test_constrain_to_aspect() {
        let size = constrain_to_aspect(Size::new(400.0, 400.0), 16.0 / 9.0);
        assert!((size.width - 400.0).abs() < 1e-9);
        assert!((size.height - 225.0).abs() < 1e-9);

        let unchanged = constrain_to_aspect(Size::new(10.0, 20.0), f64::NAN);
        assert_eq!(unchanged, Size::new(10.0, 20.0));
    }
}
