//! Sampler Core - sample decoding, waveform envelopes, trim editing and playback
//!
//! ```ignore
//! use sampler_core::{decode, PlaybackController, SoundModel};
//!
//! let sample = decode::load(bytes)?;
//! let mut sound = SoundModel::new("kick", "drums", sample);
//! let mut controller = PlaybackController::default();
//! controller.play(&mut sound, now_ms)?;
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod gc;
pub mod loader;
pub mod peaks;
pub mod playback;
pub mod playhead;
pub mod sample;
pub mod sound;
pub mod trim;

pub use error::{DecodeError, OutputError, PlaybackError};
pub use loader::{DescriptorLoader, LoadReport, SampleDescriptor};
pub use peaks::{EnvelopeCache, PeakEnvelope, PeakExtractor, PeakJob};
pub use playback::{PlaybackBackend, PlaybackController, PlaybackInstance, Tick};
pub use playhead::{PlayheadPosition, SENTINEL_X};
pub use sample::{Sample, SampleId};
pub use sound::{SoundBank, SoundId, SoundModel};
pub use trim::{HandleSide, PointerPos, TrimEditor, TrimHandle, TrimRegion, TrimState};
