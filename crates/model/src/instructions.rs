//! Clip instructions: the payload handed to the export service.
//!
//! The export service receives the crop rectangles of the visible layers in
//! whole intrinsic pixels, the chosen output layout, and the output options.
//! It does the encoding; this crate only describes the request.

use serde::{Deserialize, Serialize};

use crate::editor::EditorState;
use crate::geometry::VideoDimensions;
use crate::layer::{Layer, LayerId};
use crate::layout::{OutputConfig, OutputLayout, OutputOptions};

/// Why a set of clip instructions could not be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InstructionError {
    #[error("No video is loaded")]
    NoVideo,

    #[error("Video duration is unknown ({0})")]
    InvalidDuration(f64),

    #[error("No visible layers selected or layers have invalid dimensions")]
    NoVisibleLayers,
}

/// Crop rectangle rounded to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// One layer as sent to the export service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInstruction {
    pub id: LayerId,
    pub source_rect: SourceRect,
    pub rotation: f64,
    pub z_index: i32,
}

impl LayerInstruction {
    /// `None` for hidden or zero-area layers.
    pub fn from_layer(layer: &Layer) -> Option<Self> {
        if !layer.visible || !layer.is_renderable() {
            return None;
        }
        Some(Self {
            id: layer.id,
            source_rect: SourceRect {
                x: layer.x.round() as i64,
                y: layer.y.round() as i64,
                width: layer.width.round() as i64,
                height: layer.height.round() as i64,
            },
            rotation: layer.rotation,
            z_index: layer.z_index,
        })
    }
}

/// Where the export service finds the source video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    /// How `identifier` is to be interpreted (always `"file_reference"` here).
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
    pub original_dimensions: Option<VideoDimensions>,
}

/// Time range and layout of the requested clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipRange {
    pub start_time: f64,
    pub end_time: f64,
    pub output_layout: OutputLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputMetadata {
    pub filename_suggestion: String,
}

/// Complete clip request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipInstructions {
    pub source: SourceDescriptor,
    pub clip: ClipRange,
    pub layers: Vec<LayerInstruction>,
    pub options: OutputOptions,
    pub output_metadata: OutputMetadata,
}

impl ClipInstructions {
    /// Serialize the editor state into a clip request covering the whole video.
    ///
    /// `source_identifier` is the name the export service knows the video by
    /// (usually its file name).
    pub fn build(
        editor: &EditorState,
        source_identifier: &str,
        duration_secs: f64,
        config: &OutputConfig,
    ) -> Result<Self, InstructionError> {
        let dims = editor.video().ok_or(InstructionError::NoVideo)?;
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(InstructionError::InvalidDuration(duration_secs));
        }

        let layers: Vec<LayerInstruction> = editor
            .layers()
            .iter()
            .filter_map(LayerInstruction::from_layer)
            .collect();
        if layers.is_empty() {
            return Err(InstructionError::NoVisibleLayers);
        }

        Ok(Self {
            source: SourceDescriptor {
                kind: "file_reference".to_string(),
                identifier: source_identifier.to_string(),
                original_dimensions: Some(dims),
            },
            clip: ClipRange {
                start_time: 0.0,
                end_time: duration_secs,
                output_layout: config.layout,
            },
            layers,
            options: config.options,
            output_metadata: OutputMetadata {
                filename_suggestion: suggest_filename(config.layout, source_identifier),
            },
        })
    }
}

/// `clip_<layout>_<name without extension>.mp4`.
pub fn suggest_filename(layout: OutputLayout, source_identifier: &str) -> String {
    format!("clip_{}_{}.mp4", layout.as_str(), strip_extension(source_identifier))
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    }
}
