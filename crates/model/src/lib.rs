//! Reframe Model
//!
//! Defines the core data contracts of the editor:
//! - **Layers:** The `content` and `camera` crop regions, in intrinsic video pixels
//! - **Editor state:** The owned layer model plus UI selection, with a single
//!   mutation entry point
//! - **Output layouts:** Target aspect ratios and compositing arrangements
//! - **Geometry:** Rectangles, sizes, and the contain/cover fit helpers shared
//!   by the stage mapper and the compositor
//! - **Timeline:** Playback position, duration, and play/pause state
//! - **Instructions:** The clip payload handed to the export service
//!
//! Layer coordinates are absolute intrinsic pixels of the source video, not
//! normalized values: a layer at `(20, 20, 320, 180)` crops exactly those
//! pixels regardless of how the video is displayed.

pub mod editor;
pub mod geometry;
pub mod instructions;
pub mod layer;
pub mod layout;
pub mod timeline;

pub use editor::*;
pub use geometry::*;
pub use instructions::*;
pub use layer::*;
pub use layout::*;
pub use timeline::*;
