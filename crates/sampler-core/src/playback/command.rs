//! Lock-free command queue from the UI thread to the voice mixer
//!
//! The controller never touches audio state directly. It pushes
//! [`VoiceCommand`]s into a wait-free `rtrb` ring buffer and the audio
//! callback drains the queue at the start of every block, so every change
//! lands on a block boundary and neither side ever blocks.
//!
//! ```ignore
//! let (tx, rx) = command_channel(DEFAULT_COMMAND_QUEUE_CAPACITY);
//! // UI thread
//! tx.push(VoiceCommand::Stop { instance });
//! // audio thread
//! mixer.process_commands();
//! ```

use crate::sample::ChannelData;
use crate::trim::TrimRegion;

use super::InstanceId;

/// Default queue capacity when no config overrides it
pub const DEFAULT_COMMAND_QUEUE_CAPACITY: usize = 256;

/// Everything the audio thread needs to begin rendering an instance
///
/// Boxed inside [`VoiceCommand::Start`] to keep the command enum small.
pub struct VoiceStart {
    pub instance: InstanceId,
    /// Planar frames, RT-safe to drop on the audio thread
    pub channels: ChannelData,
    pub sample_rate: u32,
    pub trim: TrimRegion,
    pub speed: f64,
    pub looping: bool,
    pub gain: f32,
}

impl std::fmt::Debug for VoiceStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceStart")
            .field("instance", &self.instance)
            .field("channels", &format!("<Shared {} ch>", self.channels.len()))
            .field("sample_rate", &self.sample_rate)
            .field("trim", &self.trim)
            .field("speed", &self.speed)
            .field("looping", &self.looping)
            .field("gain", &self.gain)
            .finish()
    }
}

/// Commands sent from the UI thread to the audio thread
#[derive(Debug)]
pub enum VoiceCommand {
    /// Begin rendering a new instance
    Start(Box<VoiceStart>),
    /// Silence and remove an instance
    Stop { instance: InstanceId },
    /// Change rate, ramping linearly over `ramp_ms` (0 = immediate)
    SetSpeed {
        instance: InstanceId,
        speed: f64,
        ramp_ms: f64,
    },
    /// Re-flag looping without restarting
    SetLoop { instance: InstanceId, looping: bool },
    /// Output gain
    SetGain { instance: InstanceId, gain: f32 },
    /// Remove every voice
    StopAll,
}

/// Create a command channel `(Producer, Consumer)`
///
/// The producer is owned by the UI thread, the consumer by the audio thread.
pub fn command_channel(
    capacity: usize,
) -> (rtrb::Producer<VoiceCommand>, rtrb::Consumer<VoiceCommand>) {
    rtrb::RingBuffer::new(capacity.max(1))
}
