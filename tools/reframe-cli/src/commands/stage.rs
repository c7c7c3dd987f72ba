//! Print the stage layout and the default overlay boxes for a video/stage pair.

use serde::Serialize;

use reframe_model::editor::EditorState;
use reframe_model::geometry::{Rect, VideoDimensions};
use reframe_stage::{OverlayBox, StageLayout, StageMapper};

use super::parse_size;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StageReport {
    layout: StageLayout,
    video_rect: Rect,
    overlays: Vec<OverlayBox>,
}

pub fn run(video: &str, stage: &str) -> anyhow::Result<()> {
    let (video_w, video_h) = parse_size(video)?;
    let (stage_w, stage_h) = parse_size(stage)?;
    let dims = VideoDimensions::new(video_w.round() as u32, video_h.round() as u32)
        .ok_or_else(|| anyhow::anyhow!("Video size must be at least 1x1"))?;

    let mut editor = EditorState::new();
    editor.load_video(dims);

    let mut mapper = StageMapper::new();
    mapper.on_video_metadata(Some(dims));
    let layout = *mapper
        .on_stage_resized(stage_w, stage_h)
        .ok_or_else(|| anyhow::anyhow!("Stage layout is not computable for {stage}"))?;

    let report = StageReport {
        layout,
        video_rect: layout.video_rect(),
        overlays: mapper.overlays(&editor),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
