//! Composite a still frame into a PNG.

use std::path::PathBuf;

use anyhow::Context;

use reframe_common::config::AppConfig;
use reframe_compositor::{Compositor, FrameKind, PixmapSurface, StillFrameSource, VideoSource};
use reframe_model::editor::EditorState;
use reframe_model::layout::{OutputConfig, OutputOptions};

use super::{apply_layer_edits, parse_size, resolve_layout};

pub struct RenderArgs {
    pub frame: PathBuf,
    pub layout: Option<String>,
    pub layers: Option<PathBuf>,
    pub blur: bool,
    pub container: Option<String>,
    pub dpr: Option<f64>,
    pub output: PathBuf,
}

pub fn run(config: &AppConfig, args: RenderArgs) -> anyhow::Result<()> {
    let layout = resolve_layout(args.layout.as_deref(), config)?;
    let (container_w, container_h) = match args.container.as_deref() {
        Some(size) => parse_size(size)?,
        None => (config.preview.container_width, config.preview.container_height),
    };
    let dpr = args.dpr.unwrap_or(config.preview.device_pixel_ratio);

    let video = StillFrameSource::open(&args.frame)
        .with_context(|| format!("Failed to load frame {}", args.frame.display()))?;
    let dims = video
        .dimensions()
        .context("Frame has no dimensions")?;

    let mut editor = EditorState::new();
    editor.load_video(dims);
    if let Some(path) = &args.layers {
        apply_layer_edits(&mut editor, path)?;
    }

    let mut compositor = Compositor::new(OutputConfig {
        layout,
        options: OutputOptions {
            add_blurred_background: args.blur || config.preview.add_blurred_background,
        },
    });
    let canvas = *compositor
        .on_container_resized(container_w, container_h, dpr)
        .with_context(|| {
            format!("No output canvas for container {container_w}x{container_h} at {dpr}x (too small or too large)")
        })?;

    let mut surface = PixmapSurface::new(canvas.backing_width, canvas.backing_height);
    let report = compositor.draw_frame(&mut surface, editor.layers(), &video);
    if report.kind != FrameKind::Composited {
        anyhow::bail!("Frame could not be composited");
    }
    for skipped in &report.skipped {
        println!("Skipped layer '{}': {:?}", skipped.id, skipped.reason);
    }

    surface.save_png(&args.output)?;
    println!(
        "Rendered {} ({}x{}, layers: {}) to {}",
        layout,
        canvas.backing_width,
        canvas.backing_height,
        report
            .drawn
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        args.output.display()
    );
    Ok(())
}
