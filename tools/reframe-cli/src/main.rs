//! Reframe CLI: inspect layouts, render preview frames, and build clip requests.
//!
//! Usage:
//!   reframe layouts                      List output layouts
//!   reframe stage --video WxH --stage WxH
//!                                        Print the stage layout and overlay boxes
//!   reframe render <FRAME> -o OUT.png    Composite a still frame
//!   reframe instructions <FRAME>         Build the clip submission payload
//!   reframe config [--init]              Show or create the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use reframe_common::config::{AppConfig, LoggingConfig};

mod commands;

#[derive(Parser)]
#[command(
    name = "reframe",
    about = "Reframe landscape recordings into vertical, square, and picture-in-picture clips",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the output layouts, grouped as in the layout picker
    Layouts,

    /// Print the stage layout and default layer overlays as JSON
    Stage {
        /// Intrinsic video size, e.g. 1920x1080
        #[arg(long)]
        video: String,

        /// Stage element size in pixels, e.g. 800x800
        #[arg(long)]
        stage: String,
    },

    /// Composite one still frame into a PNG
    Render {
        /// Source frame image (PNG)
        frame: PathBuf,

        /// Output layout (defaults to the configured layout)
        #[arg(short, long)]
        layout: Option<String>,

        /// JSON file with layer edits, e.g. {"camera": {"x": 100, "y": 40}}
        #[arg(long)]
        layers: Option<PathBuf>,

        /// Draw the blurred full-frame background
        #[arg(long)]
        blur: bool,

        /// Preview container size in CSS pixels, e.g. 540x960
        #[arg(long)]
        container: Option<String>,

        /// Device pixel ratio
        #[arg(long)]
        dpr: Option<f64>,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Build the clip submission payload for a frame's video
    Instructions {
        /// Source frame image (PNG); its file name identifies the source
        frame: PathBuf,

        /// Output layout (defaults to the configured layout)
        #[arg(short, long)]
        layout: Option<String>,

        /// JSON file with layer edits
        #[arg(long)]
        layers: Option<PathBuf>,

        /// Request the blurred full-frame background
        #[arg(long)]
        blur: bool,

        /// Clip duration in seconds
        #[arg(long, default_value = "10.0")]
        duration: f64,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    reframe_common::logging::init_logging(&LoggingConfig {
        level,
        ..config.logging.clone()
    });

    match cli.command {
        Commands::Layouts => commands::layouts::run(),
        Commands::Stage { video, stage } => commands::stage::run(&video, &stage),
        Commands::Render {
            frame,
            layout,
            layers,
            blur,
            container,
            dpr,
            output,
        } => commands::render::run(
            &config,
            commands::render::RenderArgs {
                frame,
                layout,
                layers,
                blur,
                container,
                dpr,
                output,
            },
        ),
        Commands::Instructions {
            frame,
            layout,
            layers,
            blur,
            duration,
            output,
        } => commands::instructions::run(&config, frame, layout, layers, blur, duration, output),
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
