//! Clip submission to an export service.
//!
//! The editor does not encode video itself. It builds [`ClipInstructions`]
//! from the editor state and hands them to a [`ClipExporter`].

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use reframe_common::error::{ReframeError, ReframeResult};
use reframe_model::editor::EditorState;
use reframe_model::instructions::ClipInstructions;
use reframe_model::layout::OutputConfig;

/// Trait for export services (HTTP endpoint, job queue, local file, ...).
pub trait ClipExporter {
    /// Deliver the clip request.
    fn submit(&mut self, instructions: &ClipInstructions) -> ReframeResult<()>;

    /// Exporter name, for logs.
    fn name(&self) -> &str;
}

/// Result of a clip submission as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ExportOutcome {
    Succeeded,
    Failed(String),
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Build the clip instructions for the whole video and submit them.
///
/// Requests that cannot be built (no video, unknown duration, no visible
/// layer) fail without reaching the exporter.
pub fn submit_clip(
    exporter: &mut dyn ClipExporter,
    editor: &EditorState,
    source_identifier: &str,
    duration_secs: f64,
    config: &OutputConfig,
) -> ExportOutcome {
    let instructions = match ClipInstructions::build(editor, source_identifier, duration_secs, config) {
        Ok(instructions) => instructions,
        Err(e) => {
            tracing::warn!(error = %e, "Clip request refused");
            return ExportOutcome::Failed(e.to_string());
        }
    };

    tracing::info!(
        exporter = exporter.name(),
        layout = %instructions.clip.output_layout,
        layers = instructions.layers.len(),
        end_time = instructions.clip.end_time,
        "Submitting clip"
    );
    match exporter.submit(&instructions) {
        Ok(()) => {
            tracing::info!(
                filename = %instructions.output_metadata.filename_suggestion,
                "Clip submitted"
            );
            ExportOutcome::Succeeded
        }
        Err(e) => {
            tracing::warn!(exporter = exporter.name(), error = %e, "Clip submission failed");
            ExportOutcome::Failed(e.to_string())
        }
    }
}

/// Writes clip instructions as pretty-printed JSON to a file, or to stdout.
#[derive(Debug, Clone)]
pub struct JsonFileExporter {
    path: Option<PathBuf>,
}

impl JsonFileExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn stdout() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ClipExporter for JsonFileExporter {
    fn submit(&mut self, instructions: &ClipInstructions) -> ReframeResult<()> {
        let json = serde_json::to_string_pretty(instructions)?;
        match &self.path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                std::fs::write(path, json).map_err(|e| {
                    ReframeError::export(format!("Failed to write {}: {e}", path.display()))
                })
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{json}")?;
                Ok(())
            }
        }
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reframe_model::geometry::VideoDimensions;
    use reframe_model::layer::LayerId;
    use reframe_model::layout::OutputLayout;

    #[derive(Default)]
    struct CollectingExporter {
        received: Vec<ClipInstructions>,
        fail_with: Option<String>,
    }

    impl ClipExporter for CollectingExporter {
        fn submit(&mut self, instructions: &ClipInstructions) -> ReframeResult<()> {
            if let Some(reason) = &self.fail_with {
                return Err(ReframeError::export(reason.clone()));
            }
            self.received.push(instructions.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "collecting"
        }
    }

    fn editor() -> EditorState {
        let mut editor = EditorState::new();
        editor.load_video(VideoDimensions::new(1920, 1080).unwrap());
        editor
    }

    #[test]
    fn test_submit_success() {
        let mut exporter = CollectingExporter::default();
        let outcome = submit_clip(
            &mut exporter,
            &editor(),
            "talk.mp4",
            30.0,
            &OutputConfig::new(OutputLayout::TiktokCamBottom),
        );
        assert_eq!(outcome, ExportOutcome::Succeeded);
        assert_eq!(exporter.received.len(), 1);
        assert_eq!(exporter.received[0].layers.len(), 2);
    }

    #[test]
    fn test_no_visible_layers_never_reaches_exporter() {
        let mut editor = editor();
        editor.set_visible(LayerId::Content, false);
        editor.set_visible(LayerId::Camera, false);
        let mut exporter = CollectingExporter::default();

        let outcome = submit_clip(&mut exporter, &editor, "a.mp4", 5.0, &OutputConfig::default());
        assert!(!outcome.is_success());
        assert!(exporter.received.is_empty());
    }

    #[test]
    fn test_exporter_failure_is_reported() {
        let mut exporter = CollectingExporter {
            fail_with: Some("service unavailable".to_string()),
            ..Default::default()
        };
        let outcome = submit_clip(&mut exporter, &editor(), "a.mp4", 5.0, &OutputConfig::default());
        assert_eq!(
            outcome,
            ExportOutcome::Failed("Export error: service unavailable".to_string())
        );
    }

    #[test]
    fn test_json_file_exporter_writes_payload() {
        let dir = std::env::temp_dir().join(format!("reframe-export-test-{}", std::process::id()));
        let path = dir.join("nested").join("clip.json");
        let mut exporter = JsonFileExporter::new(&path);

        let outcome = submit_clip(&mut exporter, &editor(), "demo.mov", 8.0, &OutputConfig::default());
        assert_eq!(outcome, ExportOutcome::Succeeded);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["clip"]["outputLayout"], "tiktok-cam-top");
        assert_eq!(written["outputMetadata"]["filename_suggestion"], "clip_tiktok-cam-top_demo.mp4");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_outcome_json() {
        let failed = serde_json::to_value(ExportOutcome::Failed("nope".into())).unwrap();
        assert_eq!(failed["status"], "failed");
        assert_eq!(failed["reason"], "nope");
    }
}
