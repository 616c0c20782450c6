//! Sample view state
//!
//! Holds what the canvas needs to draw one sound: its envelope, the trim
//! editor, and the playhead x. The [`SoundModel`] itself stays with the
//! application and is passed into every call that needs it.

use std::sync::Arc;

use sampler_core::config::{PeaksConfig, TrimConfig};
use sampler_core::peaks::JobStatus;
use sampler_core::playback::PlaybackBackend;
use sampler_core::{
    EnvelopeCache, PeakEnvelope, PeakExtractor, PeakJob, PlaybackController, PointerPos, SoundId,
    SoundModel, Tick, TrimEditor, TrimRegion, SENTINEL_X,
};

use super::canvas::{PointerAction, SampleViewEvent};
use crate::render::{Surface, TrimOverlay, WaveformRenderer};
use crate::theme::SampleViewStyle;

/// Samples longer than this get their envelope computed over several ticks
pub const INCREMENTAL_PEAKS_THRESHOLD: usize = 2_000_000;

/// Envelope columns computed per tick for large samples
pub const COLUMNS_PER_TICK: usize = 64;

/// Whether the host should keep scheduling animation ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Drawing state for the selected sound
#[derive(Debug)]
pub struct SampleView {
    style: SampleViewStyle,
    trim_config: TrimConfig,
    extractor: PeakExtractor,
    cache: EnvelopeCache,
    pending: Option<PeakJob>,
    selected: Option<SoundId>,
    duration_seconds: f64,
    editor: Option<TrimEditor>,
    canvas_width: f32,
    playhead_x: f32,
}

impl SampleView {
    pub fn new(canvas_width: f32, peaks: &PeaksConfig, trim_config: TrimConfig) -> Self {
        let extractor = PeakExtractor {
            stride: peaks.stride,
        };
        Self {
            style: SampleViewStyle::default(),
            trim_config,
            extractor,
            cache: EnvelopeCache::new(extractor),
            pending: None,
            selected: None,
            duration_seconds: 0.0,
            editor: None,
            canvas_width,
            playhead_x: SENTINEL_X,
        }
    }

    pub fn with_style(mut self, style: SampleViewStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &SampleViewStyle {
        &self.style
    }

    pub fn selected(&self) -> Option<SoundId> {
        self.selected
    }

    pub fn canvas_width(&self) -> f32 {
        self.canvas_width
    }

    pub fn editor(&self) -> Option<&TrimEditor> {
        self.editor.as_ref()
    }

    pub fn playhead_x(&self) -> f32 {
        self.playhead_x
    }

    /// Envelope for the selected sound at the current width, once computed
    pub fn envelope(&self) -> Option<Arc<PeakEnvelope>> {
        self.selected?;
        if self.pending.is_some() {
            return None;
        }
        self.cache.current()
    }

    /// True while a large sample's envelope is still being computed
    pub fn is_computing(&self) -> bool {
        self.pending.is_some()
    }

    /// Make `sound` the displayed sound
    ///
    /// Rebuilds the trim handles from the sound's trim and (re)starts the
    /// envelope for the current width.
    pub fn select(&mut self, sound: &SoundModel) {
        self.selected = Some(sound.id());
        self.duration_seconds = sound.duration_seconds();
        self.editor = Some(TrimEditor::from_region(
            sound.trim(),
            self.duration_seconds,
            self.canvas_width,
            self.trim_config.clone(),
        ));
        self.playhead_x = SENTINEL_X;
        self.request_envelope(sound);
        log::debug!("SampleView: selected '{}'", sound.display_name());
    }

    /// Canvas width changed; handles keep their relative position
    pub fn resize(&mut self, sound: &SoundModel, canvas_width: f32) {
        if canvas_width == self.canvas_width {
            return;
        }
        self.canvas_width = canvas_width;
        if let Some(editor) = self.editor.as_mut() {
            editor.resize(canvas_width);
        }
        if self.selected == Some(sound.id()) {
            self.request_envelope(sound);
        }
    }

    fn envelope_width(&self) -> usize {
        if self.canvas_width.is_finite() && self.canvas_width > 0.0 {
            self.canvas_width as usize
        } else {
            0
        }
    }

    fn request_envelope(&mut self, sound: &SoundModel) {
        if let Some(mut job) = self.pending.take() {
            job.cancel();
        }

        let width = self.envelope_width();
        let key = (sound.sample().id(), width);
        if self.cache.current().is_some_and(|e| (e.sample_id(), e.width()) == key) {
            return;
        }

        if sound.sample().frame_count() > INCREMENTAL_PEAKS_THRESHOLD {
            self.cache.invalidate();
            self.pending = Some(PeakJob::new(self.extractor, sound.sample().clone(), width));
        } else {
            self.cache.get_or_compute(sound.sample(), width);
        }
    }

    /// Advance a pending envelope computation. Returns true when it was published.
    pub fn advance_envelope(&mut self, column_budget: usize) -> bool {
        let Some(job) = self.pending.as_mut() else {
            return false;
        };
        match job.advance(column_budget) {
            JobStatus::Finished => {
                let key = job.key();
                let envelope = job.take();
                self.pending = None;
                match envelope {
                    Some(envelope) => {
                        self.cache.publish(key, envelope);
                        true
                    }
                    None => false,
                }
            }
            JobStatus::Cancelled => {
                self.pending = None;
                false
            }
            JobStatus::Pending { .. } => false,
        }
    }

    fn is_selected(&self, sound: &SoundModel) -> bool {
        self.selected == Some(sound.id())
    }

    /// Returns true if a redraw is needed
    pub fn pointer_down(&mut self, pos: PointerPos) -> bool {
        self.editor.as_mut().is_some_and(|e| e.pointer_down(pos))
    }

    /// Returns true if a redraw is needed
    pub fn pointer_move(&mut self, pos: PointerPos) -> bool {
        self.editor.as_mut().is_some_and(|e| e.pointer_move(pos))
    }

    /// End a drag and commit the new trim into `sound`
    ///
    /// Returns the committed region. A region the sound rejects is logged
    /// and the handles are put back where the sound's trim says.
    pub fn pointer_up(&mut self, sound: &mut SoundModel) -> Option<TrimRegion> {
        let selected = self.is_selected(sound);
        let editor = self.editor.as_mut()?;
        // Always end the drag, even when the commit is refused
        let region = editor.pointer_up(self.duration_seconds)?;
        if !selected {
            log::warn!("SampleView: pointer_up for a sound that isn't selected, ignoring");
            return None;
        }

        match sound.set_trim(region) {
            Ok(()) => Some(region),
            Err(e) => {
                log::warn!("SampleView: trim rejected: {}", e);
                *editor = TrimEditor::from_region(
                    sound.trim(),
                    self.duration_seconds,
                    self.canvas_width,
                    self.trim_config.clone(),
                );
                None
            }
        }
    }

    /// Apply a canvas event to the view and, on release, to `sound`
    ///
    /// Returns the committed region when a drag ends.
    pub fn handle_event(&mut self, event: SampleViewEvent, sound: &mut SoundModel) -> Option<TrimRegion> {
        match event {
            SampleViewEvent::Pointer(action) => self.handle_pointer(action, sound),
            SampleViewEvent::Resized { width, then } => {
                self.resize(sound, width);
                then.and_then(|action| self.handle_pointer(action, sound))
            }
        }
    }

    fn handle_pointer(&mut self, action: PointerAction, sound: &mut SoundModel) -> Option<TrimRegion> {
        match action {
            PointerAction::Down(pos) => {
                self.pointer_down(pos);
                None
            }
            PointerAction::Move(pos) => {
                self.pointer_move(pos);
                None
            }
            PointerAction::Up => self.pointer_up(sound),
        }
    }

    /// One animation frame
    ///
    /// Moves the playhead and advances any pending envelope. Returns
    /// [`TickControl::Stop`] once there is nothing left to animate.
    pub fn tick<B: PlaybackBackend>(
        &mut self,
        controller: &mut PlaybackController<B>,
        sound: &mut SoundModel,
        now_ms: f64,
    ) -> TickControl {
        self.advance_envelope(COLUMNS_PER_TICK);

        let (left, right) = match &self.editor {
            Some(editor) if self.is_selected(sound) => (editor.left_x(), editor.right_x()),
            _ => (0.0, self.canvas_width),
        };

        let tick = controller.tick(sound, now_ms, left, right);
        if self.is_selected(sound) {
            self.playhead_x = tick.x();
        }

        match tick {
            Tick::Playing { .. } => TickControl::Continue,
            Tick::Ended | Tick::Idle if self.pending.is_some() => TickControl::Continue,
            Tick::Ended | Tick::Idle => TickControl::Stop,
        }
    }

    /// Draw waveform then overlay
    pub fn draw(&self, surface: &mut impl Surface) {
        let renderer = WaveformRenderer::new(self.style.background);
        let drawn = self
            .envelope()
            .is_some_and(|envelope| renderer.draw(&envelope, surface, self.style.waveform));
        if !drawn {
            surface.clear(self.style.background);
        }

        if let Some(editor) = &self.editor {
            TrimOverlay::new(self.style).draw(editor, self.playhead_x, surface);
        }
    }
}
