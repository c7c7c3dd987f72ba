//! Build the clip submission payload and hand it to the JSON exporter.

use std::path::PathBuf;

use anyhow::Context;

use reframe_common::config::AppConfig;
use reframe_compositor::{submit_clip, ExportOutcome, JsonFileExporter, StillFrameSource, VideoSource};
use reframe_model::editor::EditorState;
use reframe_model::layout::{OutputConfig, OutputOptions};

use super::{apply_layer_edits, resolve_layout};

pub fn run(
    config: &AppConfig,
    frame: PathBuf,
    layout: Option<String>,
    layers: Option<PathBuf>,
    blur: bool,
    duration: f64,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let layout = resolve_layout(layout.as_deref(), config)?;
    let video = StillFrameSource::open(&frame)
        .with_context(|| format!("Failed to load frame {}", frame.display()))?
        .with_timing(0.0, duration);
    let dims = video.dimensions().context("Frame has no dimensions")?;

    let mut editor = EditorState::new();
    editor.load_video(dims);
    if let Some(path) = &layers {
        apply_layer_edits(&mut editor, path)?;
    }

    let source_identifier = frame
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| frame.display().to_string());
    let output_config = OutputConfig {
        layout,
        options: OutputOptions {
            add_blurred_background: blur || config.preview.add_blurred_background,
        },
    };

    let mut exporter = match &output {
        Some(path) => JsonFileExporter::new(path),
        None => JsonFileExporter::stdout(),
    };
    match submit_clip(&mut exporter, &editor, &source_identifier, video.duration(), &output_config) {
        ExportOutcome::Succeeded => {
            if let Some(path) = &output {
                println!("Wrote clip instructions to {}", path.display());
            }
            Ok(())
        }
        ExportOutcome::Failed(reason) => anyhow::bail!("Clip request failed: {reason}"),
    }
}
