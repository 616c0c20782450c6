//! Where playback instances actually make sound
//!
//! [`PlaybackController`](super::PlaybackController) does the bookkeeping
//! (one instance per sound, re-timing, progress) and forwards the audible
//! side through a [`PlaybackBackend`]:
//!
//! - [`SilentBackend`]: no audio, records nothing; for headless hosts and tests
//! - [`CommandBackend`]: pushes [`VoiceCommand`]s to a [`VoiceMixer`](super::VoiceMixer)
//!   over a lock-free queue

use super::command::{command_channel, VoiceCommand, VoiceStart};
use super::InstanceId;

/// Sink for playback side effects
pub trait PlaybackBackend {
    fn start(&mut self, start: VoiceStart);
    fn stop(&mut self, instance: InstanceId);
    fn set_speed(&mut self, instance: InstanceId, speed: f64, ramp_ms: f64);
    fn set_loop(&mut self, instance: InstanceId, looping: bool);
    fn set_gain(&mut self, instance: InstanceId, gain: f32);
}

/// Backend that produces no audio
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentBackend;

impl PlaybackBackend for SilentBackend {
    fn start(&mut self, _start: VoiceStart) {}
    fn stop(&mut self, _instance: InstanceId) {}
    fn set_speed(&mut self, _instance: InstanceId, _speed: f64, _ramp_ms: f64) {}
    fn set_loop(&mut self, _instance: InstanceId, _looping: bool) {}
    fn set_gain(&mut self, _instance: InstanceId, _gain: f32) {}
}

/// Backend feeding a voice mixer on the audio thread
///
/// A full queue drops the command with a warning; the UI thread never waits.
pub struct CommandBackend {
    producer: rtrb::Producer<VoiceCommand>,
    dropped: usize,
}

impl CommandBackend {
    pub fn new(producer: rtrb::Producer<VoiceCommand>) -> Self {
        Self { producer, dropped: 0 }
    }

    /// Backend plus the consumer to hand to a [`VoiceMixer`](super::VoiceMixer)
    pub fn with_capacity(capacity: usize) -> (Self, rtrb::Consumer<VoiceCommand>) {
        let (tx, rx) = command_channel(capacity);
        (Self::new(tx), rx)
    }

    /// Commands lost to a full queue since creation
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn send(&mut self, command: VoiceCommand) {
        if let Err(rtrb::PushError::Full(command)) = self.producer.push(command) {
            self.dropped += 1;
            log::warn!("CommandBackend: command queue full, dropping {:?}", command);
        }
    }
}

impl PlaybackBackend for CommandBackend {
    fn start(&mut self, start: VoiceStart) {
        self.send(VoiceCommand::Start(Box::new(start)));
    }

    fn stop(&mut self, instance: InstanceId) {
        self.send(VoiceCommand::Stop { instance });
    }

    fn set_speed(&mut self, instance: InstanceId, speed: f64, ramp_ms: f64) {
        self.send(VoiceCommand::SetSpeed {
            instance,
            speed,
            ramp_ms,
        });
    }

    fn set_loop(&mut self, instance: InstanceId, looping: bool) {
        self.send(VoiceCommand::SetLoop { instance, looping });
    }

    fn set_gain(&mut self, instance: InstanceId, gain: f32) {
        self.send(VoiceCommand::SetGain { instance, gain });
    }
}
