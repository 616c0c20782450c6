//! Renderers that paint onto any [`Surface`]
//!
//! The renderers only know about lines, polygons and rectangles. The iced
//! canvas `Frame` implements [`Surface`] for on-screen drawing and
//! [`DisplayList`] records operations so rendering can be asserted in tests.

mod overlay;
mod surface;
mod waveform;

pub use overlay::{TrimOverlay, HANDLE_LINE_WIDTH, PLAYHEAD_LINE_WIDTH, TAB_HEIGHT, TAB_WIDTH};
pub use surface::{DisplayList, DrawOp, Surface};
pub use waveform::{WaveformRenderer, MIN_PEAK};
