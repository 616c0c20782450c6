//! Audio-thread rendering of playback instances
//!
//! One [`Voice`] per live instance. The mixer owns the command consumer and
//! a fixed pool of voice slots allocated up front, so `render` never
//! allocates. Source frames are read with linear interpolation at
//! `speed * source_rate / output_rate` frames per output frame.

use crate::sample::ChannelData;

use super::command::{VoiceCommand, VoiceStart};
use super::InstanceId;

/// Voices that can sound at once
pub const MAX_VOICES: usize = 32;

/// One playing instance on the audio thread
pub struct Voice {
    instance: InstanceId,
    channels: ChannelData,
    /// Source frames per output frame at speed 1.0
    rate_ratio: f64,
    start_frame: f64,
    end_frame: f64,
    position: f64,
    speed: f64,
    ramp_step: f64,
    ramp_target: f64,
    ramp_remaining: usize,
    looping: bool,
    gain: f32,
    finished: bool,
}

impl Voice {
    fn new(start: VoiceStart, output_rate: u32) -> Self {
        let frames = start.channels.iter().map(Vec::len).min().unwrap_or(0) as f64;
        let rate = start.sample_rate as f64;
        // Trim bounds snap to whole source frames
        let start_frame = (start.trim.start_seconds * rate).round().clamp(0.0, frames);
        let mut end_frame = (start.trim.end_seconds * rate).round().clamp(start_frame, frames);
        // A valid trim shorter than one frame still plays that frame
        if end_frame <= start_frame && start_frame < frames {
            end_frame = start_frame + 1.0;
        }

        Self {
            instance: start.instance,
            channels: start.channels,
            rate_ratio: rate / output_rate.max(1) as f64,
            start_frame,
            end_frame,
            position: start_frame,
            speed: start.speed,
            ramp_step: 0.0,
            ramp_target: start.speed,
            ramp_remaining: 0,
            looping: start.looping,
            gain: start.gain,
            finished: end_frame <= start_frame,
        }
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Current (possibly mid-ramp) speed
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Source frame position within the sample
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn set_speed(&mut self, speed: f64, ramp_ms: f64, output_rate: u32) {
        let ramp_frames = (ramp_ms.max(0.0) / 1000.0 * output_rate as f64).round() as usize;
        if ramp_frames == 0 {
            self.speed = speed;
            self.ramp_target = speed;
            self.ramp_remaining = 0;
        } else {
            self.ramp_target = speed;
            self.ramp_step = (speed - self.speed) / ramp_frames as f64;
            self.ramp_remaining = ramp_frames;
        }
    }

    fn read(&self, channel: usize, position: f64) -> f32 {
        let Some(data) = self.channels.get(channel % self.channels.len().max(1)) else {
            return 0.0;
        };
        let index = position as usize;
        let Some(&s0) = data.get(index) else {
            return 0.0;
        };
        let s1 = data.get(index + 1).copied().unwrap_or(s0);
        let frac = (position - index as f64) as f32;
        s0 + (s1 - s0) * frac
    }

    /// Mix into an interleaved buffer. Returns frames written.
    fn render(&mut self, out: &mut [f32], out_channels: usize) -> usize {
        if self.finished {
            return 0;
        }
        let len = self.end_frame - self.start_frame;
        let mut written = 0;
        for frame in out.chunks_exact_mut(out_channels) {
            if self.position >= self.end_frame {
                if self.looping && len > 0.0 {
                    self.position = self.start_frame + (self.position - self.end_frame) % len;
                } else {
                    self.finished = true;
                    break;
                }
            }

            for (ch, sample) in frame.iter_mut().enumerate() {
                *sample += self.read(ch, self.position) * self.gain;
            }
            written += 1;

            self.position += self.speed * self.rate_ratio;
            if self.ramp_remaining > 0 {
                self.ramp_remaining -= 1;
                self.speed = if self.ramp_remaining == 0 {
                    self.ramp_target
                } else {
                    self.speed + self.ramp_step
                };
            }
        }
        written
    }
}

/// Audio-thread mixer: drains commands, renders voices
pub struct VoiceMixer {
    commands: rtrb::Consumer<VoiceCommand>,
    voices: Vec<Voice>,
    output_rate: u32,
    output_channels: usize,
}

impl VoiceMixer {
    pub fn new(commands: rtrb::Consumer<VoiceCommand>, output_rate: u32, output_channels: usize) -> Self {
        Self {
            commands,
            voices: Vec::with_capacity(MAX_VOICES),
            output_rate,
            output_channels: output_channels.max(1),
        }
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    pub fn output_channels(&self) -> usize {
        self.output_channels
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voice(&self, instance: InstanceId) -> Option<&Voice> {
        self.voices.iter().find(|v| v.instance == instance)
    }

    fn voice_mut(&mut self, instance: InstanceId) -> Option<&mut Voice> {
        self.voices.iter_mut().find(|v| v.instance == instance)
    }

    /// Apply every pending command
    pub fn process_commands(&mut self) {
        while let Ok(command) = self.commands.pop() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: VoiceCommand) {
        match command {
            VoiceCommand::Start(start) => {
                if self.voices.len() >= MAX_VOICES {
                    // Steal the oldest voice rather than grow the pool
                    self.voices.remove(0);
                }
                let voice = Voice::new(*start, self.output_rate);
                self.voices.push(voice);
            }
            VoiceCommand::Stop { instance } => {
                self.voices.retain(|v| v.instance != instance);
            }
            VoiceCommand::SetSpeed {
                instance,
                speed,
                ramp_ms,
            } => {
                let rate = self.output_rate;
                if let Some(voice) = self.voice_mut(instance) {
                    voice.set_speed(speed, ramp_ms, rate);
                }
            }
            VoiceCommand::SetLoop { instance, looping } => {
                if let Some(voice) = self.voice_mut(instance) {
                    voice.looping = looping;
                }
            }
            VoiceCommand::SetGain { instance, gain } => {
                if let Some(voice) = self.voice_mut(instance) {
                    voice.gain = gain;
                }
            }
            VoiceCommand::StopAll => self.voices.clear(),
        }
    }

    /// Drain commands and render one block into an interleaved buffer
    ///
    /// The buffer is overwritten. Finished voices are removed afterwards.
    pub fn render(&mut self, out: &mut [f32]) {
        self.process_commands();

        out.fill(0.0);
        let channels = self.output_channels;
        for voice in &mut self.voices {
            voice.render(out, channels);
        }
        self.voices.retain(|v| !v.finished);
    }
}

#[cfg(test)]
mod tests {
    use super::super::command::command_channel;
    use super::*;
    use crate::sample::Sample;
    use crate::trim::TrimRegion;

    const RATE: u32 = 1000;

    fn ramp_sample(frames: usize) -> Sample {
        let data: Vec<f32> = (0..frames).map(|i| i as f32).collect();
        Sample::from_channels(RATE, vec![data]).unwrap()
    }

    fn start(sample: &Sample, trim: TrimRegion, speed: f64, looping: bool) -> (InstanceId, VoiceCommand) {
        let instance = InstanceId::next();
        let cmd = VoiceCommand::Start(Box::new(VoiceStart {
            instance,
            channels: sample.shared_channels(),
            sample_rate: sample.sample_rate(),
            trim,
            speed,
            looping,
            gain: 1.0,
        }));
        (instance, cmd)
    }

    #[test]
    fn test_renders_exactly_the_trimmed_frames() {
        let (mut tx, rx) = command_channel(16);
        let mut mixer = VoiceMixer::new(rx, RATE, 1);
        let sample = ramp_sample(100);
        let (_, cmd) = start(&sample, TrimRegion::new(0.010, 0.020).unwrap(), 1.0, false);
        tx.push(cmd).unwrap();

        let mut out = vec![0.0f32; 16];
        mixer.render(&mut out);

        let expected: Vec<f32> = (10..20).map(|i| i as f32).collect();
        assert_eq!(&out[..10], expected.as_slice());
        assert!(out[10..].iter().all(|&s| s == 0.0));
        assert!(mixer.voices().is_empty());
    }

    #[test]
    fn test_looping_wraps_to_trim_start() {
        let (mut tx, rx) = command_channel(16);
        let mut mixer = VoiceMixer::new(rx, RATE, 1);
        let sample = ramp_sample(100);
        let (id, cmd) = start(&sample, TrimRegion::new(0.010, 0.014).unwrap(), 1.0, true);
        tx.push(cmd).unwrap();

        let mut out = vec![0.0f32; 10];
        mixer.render(&mut out);
        assert_eq!(out, vec![10.0, 11.0, 12.0, 13.0, 10.0, 11.0, 12.0, 13.0, 10.0, 11.0]);
        assert!(mixer.voice(id).is_some());

        tx.push(VoiceCommand::Stop { instance: id }).unwrap();
        mixer.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(mixer.voices().is_empty());
    }

    #[test]
    fn test_sub_frame_loop_repeats_single_frame() {
        let (mut tx, rx) = command_channel(16);
        let mut mixer = VoiceMixer::new(rx, RATE, 1);
        let sample = ramp_sample(100);
        // Both bounds round to frame 10
        let (id, cmd) = start(&sample, TrimRegion::new(0.0101, 0.0102).unwrap(), 1.0, true);
        tx.push(cmd).unwrap();

        let mut out = vec![0.0f32; 4];
        mixer.render(&mut out);
        assert_eq!(out, vec![10.0; 4]);
        assert!(mixer.voice(id).is_some());
    }

    #[test]
    fn test_empty_trim_at_sample_end_stays_silent() {
        let (mut tx, rx) = command_channel(16);
        let mut mixer = VoiceMixer::new(rx, RATE, 1);
        let sample = ramp_sample(10);
        let (_, cmd) = start(&sample, TrimRegion::new(0.0100, 0.0101).unwrap(), 1.0, true);
        tx.push(cmd).unwrap();

        let mut out = vec![0.0f32; 4];
        mixer.render(&mut out);
        assert!(out.iter().all(|s| *s == 0.0));
        assert!(mixer.voices().is_empty());
    }

    #[test]
    fn test_double_speed_skips_frames() {
        let (mut tx, rx) = command_channel(16);
        let mut mixer = VoiceMixer::new(rx, RATE, 1);
        let sample = ramp_sample(100);
        let (_, cmd) = start(&sample, TrimRegion::new(0.0, 0.010).unwrap(), 2.0, false);
        tx.push(cmd).unwrap();

        let mut out = vec![0.0f32; 8];
        mixer.render(&mut out);
        assert_eq!(out, vec![0.0, 2.0, 4.0, 6.0, 8.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_half_speed_interpolates() {
        let (mut tx, rx) = command_channel(16);
        let mut mixer = VoiceMixer::new(rx, RATE, 1);
        let sample = ramp_sample(100);
        let (_, cmd) = start(&sample, TrimRegion::new(0.0, 0.050).unwrap(), 0.5, false);
        tx.push(cmd).unwrap();

        let mut out = vec![0.0f32; 4];
        mixer.render(&mut out);
        assert_eq!(out, vec![0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_smooth_speed_change_reaches_target_after_ramp() {
        let (mut tx, rx) = command_channel(16);
        let mut mixer = VoiceMixer::new(rx, RATE, 1);
        let sample = ramp_sample(10_000);
        let (id, cmd) = start(&sample, TrimRegion::new(0.0, 10.0).unwrap(), 1.0, true);
        tx.push(cmd).unwrap();
        tx.push(VoiceCommand::SetSpeed { instance: id, speed: 2.0, ramp_ms: 100.0 }).unwrap();

        // 100 ms at 1 kHz = 100 frames of ramp
        let mut out = vec![0.0f32; 50];
        mixer.render(&mut out);
        let mid = mixer.voice(id).unwrap().speed();
        assert!(mid > 1.0 && mid < 2.0, "mid-ramp speed {}", mid);

        mixer.render(&mut out);
        assert_eq!(mixer.voice(id).unwrap().speed(), 2.0);
    }

    #[test]
    fn test_immediate_speed_change() {
        let (mut tx, rx) = command_channel(16);
        let mut mixer = VoiceMixer::new(rx, RATE, 1);
        let sample = ramp_sample(1000);
        let (id, cmd) = start(&sample, TrimRegion::new(0.0, 1.0).unwrap(), 1.0, false);
        tx.push(cmd).unwrap();
        tx.push(VoiceCommand::SetSpeed { instance: id, speed: 1.5, ramp_ms: 0.0 }).unwrap();
        mixer.process_commands();
        assert_eq!(mixer.voice(id).unwrap().speed(), 1.5);
    }

    #[test]
    fn test_mono_source_fills_stereo_output_with_gain() {
        let (mut tx, rx) = command_channel(16);
        let mut mixer = VoiceMixer::new(rx, RATE, 2);
        let sample = ramp_sample(100);
        let (id, cmd) = start(&sample, TrimRegion::new(0.004, 0.006).unwrap(), 1.0, false);
        tx.push(cmd).unwrap();
        tx.push(VoiceCommand::SetGain { instance: id, gain: 0.5 }).unwrap();

        let mut out = vec![0.0f32; 6];
        mixer.render(&mut out);
        assert_eq!(out, vec![2.0, 2.0, 2.5, 2.5, 0.0, 0.0]);
    }

    #[test]
    fn test_loop_cleared_mid_pass_finishes_pass() {
        let (mut tx, rx) = command_channel(16);
        let mut mixer = VoiceMixer::new(rx, RATE, 1);
        let sample = ramp_sample(100);
        let (id, cmd) = start(&sample, TrimRegion::new(0.0, 0.004).unwrap(), 1.0, true);
        tx.push(cmd).unwrap();

        let mut out = vec![0.0f32; 6];
        mixer.render(&mut out);
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0, 0.0, 1.0]);

        tx.push(VoiceCommand::SetLoop { instance: id, looping: false }).unwrap();
        mixer.render(&mut out);
        assert_eq!(out, vec![2.0, 3.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(mixer.voices().is_empty());
    }

    #[test]
    fn test_sample_rate_ratio() {
        let (mut tx, rx) = command_channel(16);
        // 1 kHz source on a 2 kHz output plays at half the source step
        let mut mixer = VoiceMixer::new(rx, RATE * 2, 1);
        let sample = ramp_sample(100);
        let (_, cmd) = start(&sample, TrimRegion::new(0.0, 0.002).unwrap(), 1.0, false);
        tx.push(cmd).unwrap();

        let mut out = vec![0.0f32; 5];
        mixer.render(&mut out);
        assert_eq!(out, vec![0.0, 0.5, 1.0, 1.5, 0.0]);
    }
}
