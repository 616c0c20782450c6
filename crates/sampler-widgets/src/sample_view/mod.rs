//! Sample view: waveform, trim handles and playhead for one sound
//!
//! - [`SampleView`]: plain state, owned by the application
//! - [`sample_view`]: view function returning the canvas element
//! - [`SampleCanvas`]: canvas program, turns mouse input into [`SampleViewEvent`]s

mod canvas;
mod state;
mod view;

pub use canvas::{translate_event, PointerAction, SampleCanvas, SampleViewEvent, SampleViewInteraction};
pub use state::{SampleView, TickControl, COLUMNS_PER_TICK, INCREMENTAL_PEAKS_THRESHOLD};
pub use view::sample_view;
