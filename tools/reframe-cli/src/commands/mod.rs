pub mod config;
pub mod instructions;
pub mod layouts;
pub mod render;
pub mod stage;

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use reframe_common::config::AppConfig;
use reframe_common::error::ReframeError;
use reframe_model::editor::EditorState;
use reframe_model::layer::{LayerId, LayerPatch};
use reframe_model::layout::OutputLayout;

/// Layer edits read from a `--layers` file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerEdits {
    #[serde(default)]
    pub content: Option<LayerPatch>,
    #[serde(default)]
    pub camera: Option<LayerPatch>,
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(input: &str) -> anyhow::Result<(f64, f64)> {
    let (w, h) = input
        .split_once(['x', 'X'])
        .with_context(|| format!("Expected WIDTHxHEIGHT, got '{input}'"))?;
    let width: f64 = w.trim().parse().with_context(|| format!("Invalid width in '{input}'"))?;
    let height: f64 = h.trim().parse().with_context(|| format!("Invalid height in '{input}'"))?;
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        anyhow::bail!("Size must be positive, got '{input}'");
    }
    Ok((width, height))
}

/// Layout named on the command line, or the configured default.
pub fn resolve_layout(name: Option<&str>, config: &AppConfig) -> anyhow::Result<OutputLayout> {
    match name {
        Some(name) => Ok(name.parse::<OutputLayout>()?),
        None => config
            .preview
            .default_layout
            .parse::<OutputLayout>()
            .map_err(|e| ReframeError::config(format!("preview.default_layout: {e}")).into()),
    }
}

/// Apply a layer edits file to the editor.
pub fn apply_layer_edits(editor: &mut EditorState, path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layer edits {}", path.display()))?;
    let edits: LayerEdits = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse layer edits {}", path.display()))?;

    for (id, patch) in [(LayerId::Content, edits.content), (LayerId::Camera, edits.camera)] {
        if let Some(patch) = patch {
            editor
                .update(id, &patch)
                .with_context(|| format!("Invalid edit for layer '{id}'"))?;
        }
    }
    Ok(())
}
