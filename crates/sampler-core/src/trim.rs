//! Trim region and its pointer-driven editor
//!
//! [`TrimRegion`] is the committed `[start, end]` window in seconds.
//! [`TrimEditor`] is the interactive side: two handles in pixel space and
//! an explicit hover/drag state machine. Pointer handling is total; any
//! position is accepted and clamped, never rejected.
//!
//! ```text
//!            move near L            down
//!   Idle ───────────────► HoverLeft ─────► DragLeft ──┐
//!    ▲  ◄─────────────── (move away)                  │ up: commit
//!    │                                                ▼
//!    └────────────────────────────────────────────── Idle
//! ```
//! (and symmetrically for the right handle)

use serde::{Deserialize, Serialize};

use crate::config::TrimConfig;
use crate::error::{PlaybackError, PlaybackResult};

/// Committed playable window of a sample, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimRegion {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl TrimRegion {
    /// Create a region, checking only ordering and finiteness
    pub fn new(start_seconds: f64, end_seconds: f64) -> PlaybackResult<Self> {
        let region = Self {
            start_seconds,
            end_seconds,
        };
        if !start_seconds.is_finite() || !end_seconds.is_finite() || start_seconds >= end_seconds {
            return Err(region.invalid());
        }
        Ok(region)
    }

    /// Region covering a whole sample
    pub fn full(duration_seconds: f64) -> Self {
        Self {
            start_seconds: 0.0,
            end_seconds: duration_seconds,
        }
    }

    /// Check `0 <= start < end <= duration` with finite bounds
    pub fn validate(&self, duration_seconds: f64) -> PlaybackResult<()> {
        let ordered = self.start_seconds.is_finite()
            && self.end_seconds.is_finite()
            && self.start_seconds < self.end_seconds;
        // Small tolerance for pixel->seconds round-off at the right edge
        let in_bounds =
            self.start_seconds >= 0.0 && self.end_seconds <= duration_seconds + 1e-9;
        if ordered && in_bounds {
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    pub fn length_seconds(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }

    fn invalid(&self) -> PlaybackError {
        PlaybackError::InvalidTrimRegion {
            start: self.start_seconds,
            end: self.end_seconds,
        }
    }
}

/// Pointer position in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

impl PointerPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Which trim handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleSide {
    Left,
    Right,
}

/// Editor state; exactly one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimState {
    #[default]
    Idle,
    HoverLeft,
    HoverRight,
    DragLeft,
    DragRight,
}

impl TrimState {
    fn hover(side: HandleSide) -> Self {
        match side {
            HandleSide::Left => Self::HoverLeft,
            HandleSide::Right => Self::HoverRight,
        }
    }

    /// Handle under the pointer or being dragged
    pub fn active_handle(self) -> Option<HandleSide> {
        match self {
            Self::Idle => None,
            Self::HoverLeft | Self::DragLeft => Some(HandleSide::Left),
            Self::HoverRight | Self::DragRight => Some(HandleSide::Right),
        }
    }

    pub fn is_dragging(self) -> bool {
        matches!(self, Self::DragLeft | Self::DragRight)
    }
}

/// Read-only view of one handle for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimHandle {
    pub side: HandleSide,
    pub pixel_x: f32,
    /// Hovered or dragged
    pub selected: bool,
    pub dragged: bool,
}

/// Two-handle trim editor in pixel space
#[derive(Debug, Clone, PartialEq)]
pub struct TrimEditor {
    left_x: f32,
    right_x: f32,
    canvas_width: f32,
    state: TrimState,
    config: TrimConfig,
}

impl TrimEditor {
    /// Handles at the canvas edges
    pub fn new(canvas_width: f32, config: TrimConfig) -> Self {
        let canvas_width = Self::usable_width(canvas_width);
        Self {
            left_x: 0.0,
            right_x: canvas_width,
            canvas_width,
            state: TrimState::Idle,
            config,
        }
    }

    /// Handles placed from a committed region: `x = seconds / duration * width`
    pub fn from_region(
        region: &TrimRegion,
        duration_seconds: f64,
        canvas_width: f32,
        config: TrimConfig,
    ) -> Self {
        let mut editor = Self::new(canvas_width, config);
        if duration_seconds > 0.0 {
            let w = editor.canvas_width as f64;
            let left = (region.start_seconds / duration_seconds * w) as f32;
            let right = (region.end_seconds / duration_seconds * w) as f32;
            editor.place(left, right);
        }
        editor
    }

    fn usable_width(canvas_width: f32) -> f32 {
        if canvas_width.is_finite() {
            canvas_width.max(1.0)
        } else {
            1.0
        }
    }

    /// Set both handles, normalising to `0 <= left <= w-1`, `left+1 <= right <= w`
    fn place(&mut self, left: f32, right: f32) {
        let w = self.canvas_width;
        let left = if left.is_finite() { left } else { 0.0 };
        let right = if right.is_finite() { right } else { w };
        self.left_x = left.clamp(0.0, w - 1.0);
        self.right_x = right.clamp(self.left_x + 1.0, w);
    }

    pub fn left_x(&self) -> f32 {
        self.left_x
    }

    pub fn right_x(&self) -> f32 {
        self.right_x
    }

    pub fn canvas_width(&self) -> f32 {
        self.canvas_width
    }

    pub fn state(&self) -> TrimState {
        self.state
    }

    pub fn config(&self) -> &TrimConfig {
        &self.config
    }

    pub fn handle(&self, side: HandleSide) -> TrimHandle {
        let pixel_x = match side {
            HandleSide::Left => self.left_x,
            HandleSide::Right => self.right_x,
        };
        TrimHandle {
            side,
            pixel_x,
            selected: self.state.active_handle() == Some(side),
            dragged: self.state.is_dragging() && self.state.active_handle() == Some(side),
        }
    }

    /// Reference point used for hit testing, just inside the handle's tab
    fn hit_point(&self, side: HandleSide) -> (f32, f32) {
        let dx = self.config.tip_offset_x;
        let y = self.config.tip_offset_y;
        match side {
            HandleSide::Left => (self.left_x + dx, y),
            HandleSide::Right => (self.right_x - dx, y),
        }
    }

    /// Nearest handle within the hit radius; left wins an exact tie
    fn hit_test(&self, pos: PointerPos) -> Option<HandleSide> {
        let distance = |side| {
            let (hx, hy) = self.hit_point(side);
            ((pos.x - hx).powi(2) + (pos.y - hy).powi(2)).sqrt()
        };
        let radius = self.config.hit_radius;
        let left = distance(HandleSide::Left);
        let right = distance(HandleSide::Right);

        match (left < radius, right < radius) {
            (true, true) if right < left => Some(HandleSide::Right),
            (true, _) => Some(HandleSide::Left),
            (false, true) => Some(HandleSide::Right),
            (false, false) => None,
        }
    }

    fn hover_state(&self, pos: PointerPos) -> TrimState {
        self.hit_test(pos).map_or(TrimState::Idle, TrimState::hover)
    }

    /// Pointer moved. Returns true if anything visible changed.
    pub fn pointer_move(&mut self, pos: PointerPos) -> bool {
        let before = (self.state, self.left_x, self.right_x);
        let x = if pos.x.is_finite() { pos.x } else { 0.0 };

        match self.state {
            TrimState::Idle | TrimState::HoverLeft | TrimState::HoverRight => {
                self.state = self.hover_state(pos);
            }
            TrimState::DragLeft => {
                self.left_x = x.clamp(0.0, self.right_x - 1.0);
            }
            TrimState::DragRight => {
                self.right_x = x.clamp(self.left_x + 1.0, self.canvas_width);
            }
        }

        before != (self.state, self.left_x, self.right_x)
    }

    /// Pointer pressed. Starts a drag if a handle is under `pos`.
    pub fn pointer_down(&mut self, pos: PointerPos) -> bool {
        if self.state.is_dragging() {
            return false;
        }
        self.state = match self.hover_state(pos) {
            TrimState::HoverLeft => TrimState::DragLeft,
            TrimState::HoverRight => TrimState::DragRight,
            _ => TrimState::Idle,
        };
        self.state.is_dragging()
    }

    /// Pointer released. Ends a drag and returns the committed region.
    ///
    /// Outside a drag this only resets hover and commits nothing.
    pub fn pointer_up(&mut self, duration_seconds: f64) -> Option<TrimRegion> {
        let was_dragging = self.state.is_dragging();
        self.state = TrimState::Idle;
        if !was_dragging {
            return None;
        }

        let region = self.region(duration_seconds);
        log::debug!(
            "TrimEditor: committed [{:.1}px, {:.1}px] -> [{:.4}s, {:.4}s]",
            self.left_x,
            self.right_x,
            region.start_seconds,
            region.end_seconds
        );
        Some(region)
    }

    /// Current handle positions converted to seconds
    pub fn region(&self, duration_seconds: f64) -> TrimRegion {
        let w = self.canvas_width as f64;
        TrimRegion {
            start_seconds: self.left_x as f64 / w * duration_seconds,
            end_seconds: self.right_x as f64 / w * duration_seconds,
        }
    }

    /// Rescale handles to a new canvas width, keeping their relative positions
    pub fn resize(&mut self, canvas_width: f32) {
        let new_width = Self::usable_width(canvas_width);
        let scale = new_width / self.canvas_width;
        let (left, right) = (self.left_x * scale, self.right_x * scale);
        self.canvas_width = new_width;
        self.state = TrimState::Idle;
        self.place(left, right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(left: f32, right: f32) -> TrimEditor {
        let mut e = TrimEditor::new(300.0, TrimConfig::default());
        e.place(left, right);
        e
    }

    #[test]
    fn test_region_validation() {
        assert!(TrimRegion::new(1.0, 3.0).is_ok());
        assert!(TrimRegion::new(3.0, 3.0).is_err());
        assert!(TrimRegion::new(3.0, 1.0).is_err());
        assert!(TrimRegion::new(f64::NAN, 1.0).is_err());

        let region = TrimRegion::new(1.0, 3.0).unwrap();
        assert!(region.validate(4.0).is_ok());
        assert_eq!(
            region.validate(2.0),
            Err(PlaybackError::InvalidTrimRegion { start: 1.0, end: 3.0 })
        );
        assert!(TrimRegion { start_seconds: -0.5, end_seconds: 1.0 }.validate(4.0).is_err());
    }

    #[test]
    fn test_drag_left_handle_and_commit() {
        let mut e = editor(50.0, 250.0);

        assert!(e.pointer_down(PointerPos::new(52.0, 4.0)));
        assert_eq!(e.state(), TrimState::DragLeft);
        e.pointer_move(PointerPos::new(40.0, 4.0));

        let region = e.pointer_up(4.0).unwrap();
        assert_eq!(e.left_x(), 40.0);
        assert_eq!(e.right_x(), 250.0);
        assert_eq!(e.state(), TrimState::Idle);
        assert!((region.start_seconds - 40.0 / 300.0 * 4.0).abs() < 1e-9);
        assert!((region.end_seconds - 250.0 / 300.0 * 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_hover_then_press() {
        let mut e = editor(50.0, 250.0);
        assert!(e.pointer_move(PointerPos::new(244.0, 6.0)));
        assert_eq!(e.state(), TrimState::HoverRight);
        assert!(e.handle(HandleSide::Right).selected);
        assert!(!e.handle(HandleSide::Right).dragged);

        assert!(e.pointer_down(PointerPos::new(244.0, 6.0)));
        assert_eq!(e.state(), TrimState::DragRight);
        assert!(e.handle(HandleSide::Right).dragged);
        assert!(!e.handle(HandleSide::Left).selected);
    }

    #[test]
    fn test_move_away_returns_to_idle() {
        let mut e = editor(50.0, 250.0);
        e.pointer_move(PointerPos::new(55.0, 4.0));
        assert_eq!(e.state(), TrimState::HoverLeft);
        e.pointer_move(PointerPos::new(150.0, 100.0));
        assert_eq!(e.state(), TrimState::Idle);
    }

    #[test]
    fn test_hit_radius_is_strict() {
        let mut e = editor(50.0, 250.0);
        // Left reference point is (55, 4); 15px away is a miss
        e.pointer_move(PointerPos::new(70.0, 4.0));
        assert_eq!(e.state(), TrimState::Idle);
        e.pointer_move(PointerPos::new(69.9, 4.0));
        assert_eq!(e.state(), TrimState::HoverLeft);
    }

    #[test]
    fn test_press_on_empty_space_does_nothing() {
        let mut e = editor(50.0, 250.0);
        assert!(!e.pointer_down(PointerPos::new(150.0, 50.0)));
        assert_eq!(e.state(), TrimState::Idle);
        assert!(e.pointer_up(4.0).is_none());
        assert_eq!((e.left_x(), e.right_x()), (50.0, 250.0));
    }

    #[test]
    fn test_nearest_handle_wins_when_close_together() {
        // Reference points at (105, 4) and (107, 4)
        let mut e = editor(100.0, 112.0);
        e.pointer_move(PointerPos::new(108.0, 4.0));
        assert_eq!(e.state(), TrimState::HoverRight);
        e.pointer_move(PointerPos::new(104.0, 4.0));
        assert_eq!(e.state(), TrimState::HoverLeft);
        // Equidistant: left wins
        e.pointer_move(PointerPos::new(106.0, 4.0));
        assert_eq!(e.state(), TrimState::HoverLeft);
    }

    #[test]
    fn test_drag_clamps_keep_ordering() {
        let mut e = editor(50.0, 250.0);
        e.pointer_down(PointerPos::new(55.0, 4.0));
        e.pointer_move(PointerPos::new(1000.0, 4.0));
        assert_eq!(e.left_x(), 249.0);
        e.pointer_move(PointerPos::new(-80.0, 4.0));
        assert_eq!(e.left_x(), 0.0);
        e.pointer_up(4.0);

        let mut e = editor(50.0, 250.0);
        e.pointer_down(PointerPos::new(245.0, 4.0));
        e.pointer_move(PointerPos::new(-10.0, 4.0));
        assert_eq!(e.right_x(), 51.0);
        e.pointer_move(PointerPos::new(900.0, 4.0));
        assert_eq!(e.right_x(), 300.0);
    }

    #[test]
    fn test_ordering_holds_for_arbitrary_event_sequences() {
        let mut e = editor(50.0, 250.0);
        let mut state = 0xdead_beefu32;
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        };

        for _ in 0..5000 {
            let x = (next() % 500) as f32 - 100.0;
            let y = (next() % 40) as f32 - 10.0;
            let pos = PointerPos::new(x, y);
            match next() % 3 {
                0 => {
                    e.pointer_down(pos);
                }
                1 => {
                    e.pointer_move(pos);
                }
                _ => {
                    if let Some(region) = e.pointer_up(4.0) {
                        assert!(region.start_seconds < region.end_seconds);
                    }
                    assert!(e.left_x() < e.right_x());
                    assert!(e.left_x() >= 0.0 && e.right_x() <= e.canvas_width());
                }
            }
        }
    }

    #[test]
    fn test_from_region_maps_seconds_to_pixels() {
        let region = TrimRegion::new(1.0, 3.0).unwrap();
        let e = TrimEditor::from_region(&region, 4.0, 300.0, TrimConfig::default());
        assert_eq!(e.left_x(), 75.0);
        assert_eq!(e.right_x(), 225.0);

        let full = TrimEditor::from_region(&TrimRegion::full(4.0), 4.0, 300.0, TrimConfig::default());
        assert_eq!(full.left_x(), 0.0);
        assert_eq!(full.right_x(), 300.0);
    }

    #[test]
    fn test_resize_scales_handles() {
        let mut e = editor(75.0, 225.0);
        e.resize(600.0);
        assert_eq!(e.left_x(), 150.0);
        assert_eq!(e.right_x(), 450.0);
        assert_eq!(e.canvas_width(), 600.0);
    }
}
