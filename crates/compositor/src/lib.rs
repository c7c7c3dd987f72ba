//! Reframe Compositor
//!
//! Draws the output preview: the chosen layer regions of the current video
//! frame arranged into the target layout.
//!
//! # Frame Pipeline
//!
//! ```text
//! container size ──► OutputCanvas (contain fit, device pixels)
//!                          │
//! layer model ─────► destinations (strip / PIP / full canvas)
//!                          │
//! video frame ─────► black fill ─► blurred backdrop ─► layers by z_index
//!                                                          │
//!                                                          ▼
//!                                                   RasterSurface
//! ```
//!
//! The [`scheduler`] decides when a frame is drawn; the [`export`] module
//! hands finished clip instructions to an export service.

pub mod canvas;
pub mod compositor;
pub mod destinations;
pub mod export;
pub mod scheduler;
pub mod surface;
pub mod video;

pub use canvas::OutputCanvas;
pub use compositor::{Compositor, FrameKind, FrameReport, SkipReason, SkippedLayer};
pub use destinations::{compute_destinations, Destinations};
pub use export::{submit_clip, ClipExporter, ExportOutcome, JsonFileExporter};
pub use scheduler::{FrameClock, FrameHandle, RenderScheduler, SchedulerState};
pub use surface::{DrawCommand, Filter, PixmapSurface, RasterSurface, RecordingSurface};
pub use video::{StillFrameSource, VideoSource};
