use iced::{Point, Size};
use sampler_core::{HandleSide, TrimEditor, TrimHandle};

use super::surface::Surface;
use crate::theme::SampleViewStyle;

/// Width of a trim handle's vertical line
pub const HANDLE_LINE_WIDTH: f32 = 2.0;

/// Width of the playhead line
pub const PLAYHEAD_LINE_WIDTH: f32 = 1.0;

/// Horizontal reach of a handle's triangular tab
pub const TAB_WIDTH: f32 = 10.0;

/// Height of a handle's triangular tab
pub const TAB_HEIGHT: f32 = 16.0;

/// Draws trim handles, excluded-region shading and the playhead
///
/// Drawn on top of the waveform; never clears the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrimOverlay {
    pub style: SampleViewStyle,
}

impl TrimOverlay {
    pub fn new(style: SampleViewStyle) -> Self {
        Self { style }
    }

    /// Paint the overlay; the playhead only when `0 <= playhead_x < width`
    pub fn draw(&self, editor: &TrimEditor, playhead_x: f32, surface: &mut impl Surface) {
        let size = surface.size();
        let (left, right) = (editor.left_x(), editor.right_x());

        surface.fill_rect(Point::ORIGIN, Size::new(left, size.height), self.style.excluded);
        surface.fill_rect(
            Point::new(right, 0.0),
            Size::new((size.width - right).max(0.0), size.height),
            self.style.excluded,
        );

        self.draw_handle(&editor.handle(HandleSide::Left), size.height, surface);
        self.draw_handle(&editor.handle(HandleSide::Right), size.height, surface);

        if playhead_x >= 0.0 && playhead_x < size.width {
            surface.stroke_line(
                Point::new(playhead_x, 0.0),
                Point::new(playhead_x, size.height),
                PLAYHEAD_LINE_WIDTH,
                self.style.playhead,
            );
        }
    }

    fn draw_handle(&self, handle: &TrimHandle, height: f32, surface: &mut impl Surface) {
        let color = if handle.selected {
            self.style.handle_selected
        } else {
            self.style.handle
        };
        let x = handle.pixel_x;

        surface.stroke_line(Point::new(x, 0.0), Point::new(x, height), HANDLE_LINE_WIDTH, color);

        // Tab points into the kept region
        let reach = match handle.side {
            HandleSide::Left => TAB_WIDTH,
            HandleSide::Right => -TAB_WIDTH,
        };
        surface.fill_polygon(
            &[
                Point::new(x, 0.0),
                Point::new(x + reach, TAB_HEIGHT / 2.0),
                Point::new(x, TAB_HEIGHT),
            ],
            color,
        );
    }
}
