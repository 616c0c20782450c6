//! The sound aggregate and a bank of sounds

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::PlaybackResult;
use crate::playback::PlaybackInstance;
use crate::sample::Sample;
use crate::trim::TrimRegion;

/// Category used when none is given
pub const UNKNOWN_CATEGORY: &str = "Unknown";

static NEXT_SOUND_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(u64);

impl SoundId {
    fn next() -> Self {
        Self(NEXT_SOUND_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A sample plus everything that shapes how it plays
///
/// Invariants: `0 <= trim.start < trim.end <= duration`, `playback_speed > 0`,
/// and at most one active [`PlaybackInstance`]. Speed, loop, volume and the
/// active instance are changed through
/// [`PlaybackController`](crate::playback::PlaybackController) so the audible
/// side stays in step.
#[derive(Debug)]
pub struct SoundModel {
    id: SoundId,
    display_name: String,
    category: String,
    sample: Sample,
    trim: TrimRegion,
    playback_speed: f64,
    loop_enabled: bool,
    volume: f32,
    pub(crate) active_playback: Option<PlaybackInstance>,
}

impl SoundModel {
    /// New sound with full-length trim, speed 1.0, no loop, unity volume
    pub fn new(display_name: impl Into<String>, category: impl Into<String>, sample: Sample) -> Self {
        let trim = TrimRegion::full(sample.duration_seconds());
        Self {
            id: SoundId::next(),
            display_name: display_name.into(),
            category: category.into(),
            sample,
            trim,
            playback_speed: 1.0,
            loop_enabled: false,
            volume: 1.0,
            active_playback: None,
        }
    }

    pub fn id(&self) -> SoundId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    pub fn duration_seconds(&self) -> f64 {
        self.sample.duration_seconds()
    }

    pub fn trim(&self) -> &TrimRegion {
        &self.trim
    }

    /// Replace the trim region
    ///
    /// Rejected regions leave the current one untouched. An active instance
    /// keeps the trim it started with.
    pub fn set_trim(&mut self, trim: TrimRegion) -> PlaybackResult<()> {
        trim.validate(self.duration_seconds())?;
        self.trim = trim;
        Ok(())
    }

    pub fn playback_speed(&self) -> f64 {
        self.playback_speed
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn active_playback(&self) -> Option<&PlaybackInstance> {
        self.active_playback.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.active_playback.is_some()
    }

    pub(crate) fn set_playback_speed(&mut self, speed: f64) {
        self.playback_speed = speed;
    }

    pub(crate) fn set_loop_enabled(&mut self, looping: bool) {
        self.loop_enabled = looping;
    }

    pub(crate) fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    #[cfg(test)]
    pub(crate) fn force_trim(&mut self, trim: TrimRegion) {
        self.trim = trim;
    }
}

/// Ordered collection of sounds, addressed by id
#[derive(Debug, Default)]
pub struct SoundBank {
    sounds: Vec<SoundModel>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sound: SoundModel) -> SoundId {
        let id = sound.id();
        self.sounds.push(sound);
        id
    }

    /// Remove and return a sound. Stop it first if it is playing.
    pub fn remove(&mut self, id: SoundId) -> Option<SoundModel> {
        let index = self.sounds.iter().position(|s| s.id() == id)?;
        Some(self.sounds.remove(index))
    }

    pub fn get(&self, id: SoundId) -> Option<&SoundModel> {
        self.sounds.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: SoundId) -> Option<&mut SoundModel> {
        self.sounds.iter_mut().find(|s| s.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SoundModel> {
        self.sounds.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SoundModel> {
        self.sounds.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

impl From<Vec<SoundModel>> for SoundBank {
    fn from(sounds: Vec<SoundModel>) -> Self {
        Self { sounds }
    }
}
