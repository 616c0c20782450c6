use iced::{Color, Point};
use sampler_core::PeakEnvelope;

use super::surface::Surface;

/// Floor for the loudest peak when scaling, so silence doesn't divide by zero
pub const MIN_PEAK: f32 = 1e-6;

/// Paints an envelope as a filled shape mirrored around a centre baseline
///
/// Column `i` of the envelope is drawn at `x = i`. Peaks are scaled so the
/// loudest column spans the full height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformRenderer {
    pub background: Color,
}

impl Default for WaveformRenderer {
    fn default() -> Self {
        Self {
            background: crate::theme::BACKGROUND_COLOR,
        }
    }
}

impl WaveformRenderer {
    pub fn new(background: Color) -> Self {
        Self { background }
    }

    /// Clear `surface` and draw `envelope` in `color`
    ///
    /// Returns `false` without touching the surface when the envelope is empty.
    pub fn draw(&self, envelope: &PeakEnvelope, surface: &mut impl Surface, color: Color) -> bool {
        if envelope.is_empty() {
            return false;
        }

        let size = surface.size();
        surface.clear(self.background);

        let baseline = size.height / 2.0;
        let coef = size.height / (2.0 * envelope.max_peak().max(MIN_PEAK));
        let offset = |peak: f32| (peak * coef).round();

        surface.stroke_line(
            Point::new(0.0, baseline),
            Point::new(size.width, baseline),
            1.0,
            color,
        );

        let peaks = envelope.peaks();
        let mut outline = Vec::with_capacity(peaks.len() * 2 + 1);
        outline.push(Point::new(0.0, baseline));
        for (i, &peak) in peaks.iter().enumerate() {
            outline.push(Point::new(i as f32, baseline + offset(peak)));
        }
        for (i, &peak) in peaks.iter().enumerate().rev() {
            outline.push(Point::new(i as f32, baseline - offset(peak)));
        }
        surface.fill_polygon(&outline, color);

        true
    }
}
