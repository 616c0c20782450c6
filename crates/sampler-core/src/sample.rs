//! Decoded, immutable audio
//!
//! A [`Sample`] is what every other part of the engine reads from: the peak
//! extractor, the voice mixer on the audio thread, and the trim math (via
//! its duration). Frames are stored planar, one `Vec<f32>` per channel.

use std::sync::atomic::{AtomicU64, Ordering};

use basedrop::Shared;

use crate::gc::gc_handle;

static NEXT_SAMPLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a decoded sample
///
/// Two samples decoded from the same bytes still get different ids; the id
/// tracks the decoded instance, not its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleId(u64);

impl SampleId {
    fn next() -> Self {
        Self(NEXT_SAMPLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Planar frame data shared with the audio thread
pub type ChannelData = Shared<Vec<Vec<f32>>>;

/// Immutable decoded waveform
#[derive(Clone)]
pub struct Sample {
    id: SampleId,
    sample_rate: u32,
    frame_count: usize,
    channels: ChannelData,
}

impl Sample {
    /// Build a sample from planar channel data
    ///
    /// Channels longer than the shortest one are truncated so every channel
    /// has exactly `frame_count` frames. Returns `None` for a zero sample
    /// rate or when there are no channels.
    pub fn from_channels(sample_rate: u32, mut channels: Vec<Vec<f32>>) -> Option<Self> {
        if sample_rate == 0 || channels.is_empty() {
            return None;
        }

        let frame_count = channels.iter().map(Vec::len).min().unwrap_or(0);
        for channel in &mut channels {
            channel.truncate(frame_count);
        }

        Some(Self {
            id: SampleId::next(),
            sample_rate,
            frame_count,
            channels: Shared::new(&gc_handle(), channels),
        })
    }

    /// Build a sample from interleaved frames
    pub fn from_interleaved(sample_rate: u32, channel_count: usize, interleaved: &[f32]) -> Option<Self> {
        if channel_count == 0 {
            return None;
        }
        let frames = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in interleaved.chunks_exact(channel_count) {
            for (ch, &value) in frame.iter().enumerate() {
                channels[ch].push(value);
            }
        }
        Self::from_channels(sample_rate, channels)
    }

    pub fn id(&self) -> SampleId {
        self.id
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.sample_rate as f64
    }

    /// Frames of one channel, or `None` if the index is out of range
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Shared handle to the frame data, for handing to the audio thread
    pub fn shared_channels(&self) -> ChannelData {
        self.channels.clone()
    }
}

impl std::fmt::Debug for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sample")
            .field("id", &self.id)
            .field("sample_rate", &self.sample_rate)
            .field("channels", &self.channels.len())
            .field("frames", &self.frame_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_rate_and_frames() {
        let sample = Sample::from_channels(1000, vec![vec![0.0; 4000]]).unwrap();
        assert_eq!(sample.frame_count(), 4000);
        assert!((sample.duration_seconds() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_channels_truncated_to_shortest() {
        let sample = Sample::from_channels(44100, vec![vec![0.1; 10], vec![0.2; 7]]).unwrap();
        assert_eq!(sample.frame_count(), 7);
        assert_eq!(sample.channel(0).unwrap().len(), 7);
        assert_eq!(sample.channel(1).unwrap().len(), 7);
        assert!(sample.channel(2).is_none());
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert!(Sample::from_channels(0, vec![vec![0.0; 4]]).is_none());
        assert!(Sample::from_channels(44100, Vec::new()).is_none());
        assert!(Sample::from_interleaved(44100, 0, &[0.0; 4]).is_none());
    }

    #[test]
    fn test_deinterleave() {
        let sample = Sample::from_interleaved(8000, 2, &[1.0, -1.0, 0.5, -0.5, 0.25, -0.25]).unwrap();
        assert_eq!(sample.channel(0).unwrap(), &[1.0, 0.5, 0.25]);
        assert_eq!(sample.channel(1).unwrap(), &[-1.0, -0.5, -0.25]);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Sample::from_channels(8000, vec![vec![0.0; 1]]).unwrap();
        let b = Sample::from_channels(8000, vec![vec![0.0; 1]]).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }
}
