//! Sampler widgets - iced UI for sample display and trimming
//!
//! ## Architecture (iced 0.14 patterns)
//!
//! - **State structs**: plain data ([`SampleView`])
//! - **View functions**: take state + callbacks, return `Element<Message>` ([`sample_view`])
//! - **Canvas Programs**: event-to-callback translation and drawing ([`SampleCanvas`])
//!
//! Drawing itself lives in [`render`] and targets the [`Surface`] trait, so
//! the same renderers paint an iced `Frame` on screen and a [`DisplayList`]
//! in tests.

pub mod render;
pub mod sample_view;
pub mod theme;

pub use render::{DisplayList, DrawOp, Surface, TrimOverlay, WaveformRenderer};
pub use sample_view::{sample_view, PointerAction, SampleCanvas, SampleView, SampleViewEvent, TickControl};
pub use theme::{SampleViewStyle, SAMPLE_VIEW_HEIGHT};
