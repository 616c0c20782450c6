//! Shared colors and dimensions for sampler widgets

use iced::Color;

/// Waveform fill and baseline (#00FF00)
pub const WAVEFORM_COLOR: Color = Color::from_rgb(0.0, 1.0, 0.0);

/// Canvas background
pub const BACKGROUND_COLOR: Color = Color::BLACK;

/// Trim handle at rest
pub const HANDLE_COLOR: Color = Color::WHITE;

/// Trim handle while hovered or dragged
pub const HANDLE_SELECTED_COLOR: Color = Color::from_rgb(1.0, 0.0, 0.0);

/// Playhead line
pub const PLAYHEAD_COLOR: Color = Color::from_rgb(1.0, 1.0, 0.0);

/// Shade over the parts of the sample outside the trim region
pub const EXCLUDED_REGION_COLOR: Color = Color::from_rgba(0.5, 0.5, 0.5, 0.5);

/// Sample view height in pixels
pub const SAMPLE_VIEW_HEIGHT: f32 = 100.0;

/// Color set used by the renderers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleViewStyle {
    pub background: Color,
    pub waveform: Color,
    pub handle: Color,
    pub handle_selected: Color,
    pub playhead: Color,
    pub excluded: Color,
}

impl Default for SampleViewStyle {
    fn default() -> Self {
        Self {
            background: BACKGROUND_COLOR,
            waveform: WAVEFORM_COLOR,
            handle: HANDLE_COLOR,
            handle_selected: HANDLE_SELECTED_COLOR,
            playhead: PLAYHEAD_COLOR,
            excluded: EXCLUDED_REGION_COLOR,
        }
    }
}
