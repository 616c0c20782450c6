//! Elapsed time to playhead position
//!
//! Pure functions with no timer of their own; the host calls [`tick`] once
//! per animation frame with the time elapsed since the playback reference.

use crate::trim::TrimRegion;

/// Off-screen x reported once playback has ended
pub const SENTINEL_X: f32 = -1.0;

/// Where the playhead is, or that it is done
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayheadPosition {
    At { x: f32, progress: f64 },
    Ended,
}

impl PlayheadPosition {
    /// Pixel x, [`SENTINEL_X`] once ended
    pub fn x(&self) -> f32 {
        match self {
            Self::At { x, .. } => *x,
            Self::Ended => SENTINEL_X,
        }
    }

    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::At { progress, .. } => Some(*progress),
            Self::Ended => None,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended)
    }
}

/// Wall-clock length of one pass through the trim region at `speed`
pub fn adjusted_duration_ms(trim: &TrimRegion, speed: f64) -> f64 {
    trim.length_seconds() * 1000.0 / speed
}

/// Progress fraction for `elapsed_ms`, `None` once a non-looping pass is over
///
/// Looping progress wraps into `[0, 1)` forever. Negative elapsed time is
/// treated as zero.
pub fn progress(elapsed_ms: f64, trim: &TrimRegion, speed: f64, looping: bool) -> Option<f64> {
    let elapsed = if elapsed_ms.is_finite() { elapsed_ms.max(0.0) } else { 0.0 };
    let adjusted = adjusted_duration_ms(trim, speed);

    if !adjusted.is_finite() || adjusted <= 0.0 {
        return if looping { Some(0.0) } else { None };
    }

    if looping {
        Some((elapsed % adjusted) / adjusted)
    } else {
        let p = elapsed / adjusted;
        if p >= 1.0 {
            None
        } else {
            Some(p)
        }
    }
}

/// Map elapsed time onto the pixel span between the trim handles
pub fn tick(
    elapsed_ms: f64,
    trim: &TrimRegion,
    speed: f64,
    looping: bool,
    left_x: f32,
    right_x: f32,
) -> PlayheadPosition {
    match progress(elapsed_ms, trim, speed, looping) {
        Some(p) => PlayheadPosition::At {
            x: left_x + p as f32 * (right_x - left_x),
            progress: p,
        },
        None => PlayheadPosition::Ended,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trim_1_3() -> TrimRegion {
        TrimRegion::new(1.0, 3.0).unwrap()
    }

    #[test]
    fn test_non_looping_pass() {
        let trim = trim_1_3();
        assert_eq!(
            tick(0.0, &trim, 1.0, false, 75.0, 225.0),
            PlayheadPosition::At { x: 75.0, progress: 0.0 }
        );
        assert_eq!(
            tick(1000.0, &trim, 1.0, false, 75.0, 225.0),
            PlayheadPosition::At { x: 150.0, progress: 0.5 }
        );
        assert_eq!(tick(2000.0, &trim, 1.0, false, 75.0, 225.0), PlayheadPosition::Ended);
        assert_eq!(tick(2001.0, &trim, 1.0, false, 75.0, 225.0), PlayheadPosition::Ended);
        assert_eq!(PlayheadPosition::Ended.x(), SENTINEL_X);
    }

    #[test]
    fn test_speed_scales_duration() {
        let trim = trim_1_3();
        assert_eq!(adjusted_duration_ms(&trim, 2.0), 1000.0);
        assert_eq!(progress(500.0, &trim, 2.0, false), Some(0.5));
        assert_eq!(progress(1000.0, &trim, 2.0, false), None);
        assert_eq!(progress(2000.0, &trim, 0.5, false), Some(0.5));
    }

    #[test]
    fn test_looping_wraps_and_never_ends() {
        let trim = trim_1_3();
        for step in 0..200 {
            let elapsed = step as f64 * 137.0;
            let p = progress(elapsed, &trim, 1.0, true).unwrap();
            assert!((0.0..1.0).contains(&p));
        }
        assert_eq!(progress(2500.0, &trim, 1.0, true), Some(0.25));
    }

    #[test]
    fn test_negative_elapsed_is_start() {
        assert_eq!(progress(-30.0, &trim_1_3(), 1.0, false), Some(0.0));
    }
}
