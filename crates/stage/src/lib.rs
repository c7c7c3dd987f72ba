//! Reframe Stage: the interactive editing surface.
//!
//! Maps between intrinsic video pixels and the on-screen stage the video is
//! letterboxed into:
//! - **Layout:** "contain" fit of the video inside the stage element
//! - **Gestures:** Drag/resize stops in stage pixels become clamped layer updates
//! - **Overlays:** Layer rectangles projected back onto the stage, plus hit testing
//!
//! This crate is pure computation with no rendering and no platform dependencies.
//! The host reports stage resizes and gestures; the mapper answers with
//! layer patches and overlay boxes.

pub mod layout;
pub mod mapper;
pub mod overlay;

pub use layout::{compute_layout, stage_aspect_ratio, StageLayout};
pub use mapper::{constrain_to_aspect, GestureOutcome, StageGesture, StageMapper};
pub use overlay::{OverlayBox, OverlayPlacement};
