//! Trimmed, looped, speed-adjustable playback
//!
//! ```text
//! ┌──────────────────────┐   VoiceCommand    ┌──────────────────────┐
//! │  PlaybackController  │──────push()──────►│  rtrb SPSC queue     │
//! │  (UI thread, owns    │                   └──────────┬───────────┘
//! │   instance timing)   │                              │ pop() per block
//! └──────────┬───────────┘                   ┌──────────▼───────────┐
//!            │ tick(now)                     │  VoiceMixer          │
//!            ▼                               │  (audio thread)      │
//!     playhead x / Ended                     └──────────────────────┘
//! ```
//!
//! The controller is the source of truth for progress; it never reads a
//! clock, the host passes `now_ms` into every call.

mod backend;
mod command;
mod controller;
mod voice;

#[cfg(feature = "cpal-backend")]
mod cpal_backend;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::trim::TrimRegion;

pub use backend::{CommandBackend, PlaybackBackend, SilentBackend};
pub use command::{command_channel, VoiceCommand, VoiceStart, DEFAULT_COMMAND_QUEUE_CAPACITY};
pub use controller::{PlaybackController, Tick};
pub use voice::{Voice, VoiceMixer, MAX_VOICES};

#[cfg(feature = "cpal-backend")]
pub use cpal_backend::{start_output, OutputHandle};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique id of one playback instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    pub(crate) fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// One in-flight rendition of a sound
///
/// Trim is a snapshot taken at `play()`. Speed and loop start as snapshots
/// too but are re-timed in place by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackInstance {
    id: InstanceId,
    trim: TrimRegion,
    speed: f64,
    looping: bool,
    /// Host time (ms) at which progress was zero
    reference_ms: f64,
}

impl PlaybackInstance {
    pub(crate) fn new(trim: TrimRegion, speed: f64, looping: bool, reference_ms: f64) -> Self {
        Self {
            id: InstanceId::next(),
            trim,
            speed,
            looping,
            reference_ms,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn trim(&self) -> &TrimRegion {
        &self.trim
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn reference_ms(&self) -> f64 {
        self.reference_ms
    }

    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.reference_ms
    }

    /// Progress fraction at `now_ms`, `None` once a non-looping pass is over
    pub fn progress(&self, now_ms: f64) -> Option<f64> {
        crate::playhead::progress(self.elapsed_ms(now_ms), &self.trim, self.speed, self.looping)
    }

    /// Move the reference so `progress` holds at `now_ms` under the current speed
    pub(crate) fn rebase(&mut self, now_ms: f64, progress: f64) {
        let adjusted = crate::playhead::adjusted_duration_ms(&self.trim, self.speed);
        self.reference_ms = now_ms - progress * adjusted;
    }

    pub(crate) fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub(crate) fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
}
