//! Instance lifecycle and re-timing
//!
//! Every operation takes the [`SoundModel`] it acts on; the controller holds
//! no notion of a "current" sound. Time is whatever the host passes as
//! `now_ms` (monotonic milliseconds).

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, PlaybackResult};
use crate::playhead::{self, PlayheadPosition, SENTINEL_X};
use crate::sound::SoundModel;

use super::backend::{PlaybackBackend, SilentBackend};
use super::command::VoiceStart;
use super::{InstanceId, PlaybackInstance};

/// Result of one animation tick for a sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Instance running; playhead at `x`
    Playing { x: f32, progress: f64 },
    /// The non-looping pass just completed and the instance is gone
    Ended,
    /// Nothing playing
    Idle,
}

impl Tick {
    /// Playhead x, [`SENTINEL_X`] unless playing
    pub fn x(&self) -> f32 {
        match self {
            Self::Playing { x, .. } => *x,
            Self::Ended | Self::Idle => SENTINEL_X,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }
}

/// Starts, stops and re-times playback instances
pub struct PlaybackController<B: PlaybackBackend = SilentBackend> {
    backend: B,
    config: PlaybackConfig,
}

impl Default for PlaybackController<SilentBackend> {
    fn default() -> Self {
        Self::new(SilentBackend, PlaybackConfig::default())
    }
}

impl<B: PlaybackBackend> PlaybackController<B> {
    pub fn new(backend: B, config: PlaybackConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Start a new instance from the sound's trim, speed and loop
    ///
    /// Any instance already running for this sound is stopped first. On
    /// error nothing changes, including the previous instance.
    pub fn play(&mut self, sound: &mut SoundModel, now_ms: f64) -> PlaybackResult<InstanceId> {
        let trim = *sound.trim();
        trim.validate(sound.duration_seconds())?;
        let speed = sound.playback_speed();
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PlaybackError::InvalidSpeed(speed));
        }

        self.stop(sound);

        let instance = PlaybackInstance::new(trim, speed, sound.loop_enabled(), now_ms);
        let id = instance.id();
        self.backend.start(VoiceStart {
            instance: id,
            channels: sound.sample().shared_channels(),
            sample_rate: sound.sample().sample_rate(),
            trim,
            speed,
            looping: sound.loop_enabled(),
            gain: sound.volume(),
        });

        log::info!(
            "play: '{}' instance {} [{:.3}s, {:.3}s] speed {} loop {}",
            sound.display_name(),
            id.get(),
            trim.start_seconds,
            trim.end_seconds,
            speed,
            sound.loop_enabled()
        );

        sound.active_playback = Some(instance);
        Ok(id)
    }

    /// Halt the active instance, if any
    pub fn stop(&mut self, sound: &mut SoundModel) {
        if let Some(instance) = sound.active_playback.take() {
            self.backend.stop(instance.id());
            log::info!("stop: '{}' instance {}", sound.display_name(), instance.id().get());
        }
    }

    /// Change speed without restarting
    ///
    /// The active instance keeps its progress fraction: the reference time
    /// is moved so that `progress(now)` is the same before and after. With
    /// `smooth`, the audible rate ramps linearly over the configured ramp.
    pub fn set_playback_speed(
        &mut self,
        sound: &mut SoundModel,
        speed: f64,
        smooth: bool,
        now_ms: f64,
    ) -> PlaybackResult<()> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(PlaybackError::InvalidSpeed(speed));
        }

        sound.set_playback_speed(speed);

        let pass_over = sound
            .active_playback
            .as_ref()
            .is_some_and(|instance| instance.progress(now_ms).is_none());
        if pass_over {
            // A slower speed must not revive a finished pass
            self.end_instance(sound, "set_playback_speed");
            return Ok(());
        }

        if let Some(instance) = sound.active_playback.as_mut() {
            let old_speed = instance.speed();
            let progress = instance.progress(now_ms);
            instance.set_speed(speed);
            if let Some(p) = progress {
                instance.rebase(now_ms, p);
            }

            let ramp_ms = if smooth { self.config.speed_ramp_ms } else { 0.0 };
            self.backend.set_speed(instance.id(), speed, ramp_ms);

            log::debug!(
                "set_playback_speed: instance {} {} -> {} at progress {:?} (ramp {}ms)",
                instance.id().get(),
                old_speed,
                speed,
                progress,
                ramp_ms
            );
        }

        Ok(())
    }

    /// Toggle looping, re-flagging the active instance in place
    ///
    /// The progress fraction at `now_ms` is kept, so switching loop off during
    /// a later repetition finishes that repetition instead of ending at once.
    pub fn set_loop(&mut self, sound: &mut SoundModel, looping: bool, now_ms: f64) {
        sound.set_loop_enabled(looping);

        if let Some(instance) = sound.active_playback.as_mut() {
            if let Some(p) = instance.progress(now_ms) {
                instance.set_looping(looping);
                instance.rebase(now_ms, p);
                self.backend.set_loop(instance.id(), looping);
            }
        }
    }

    /// Set output gain; negative values clamp to silence
    pub fn set_volume(&mut self, sound: &mut SoundModel, gain: f32) {
        let gain = gain.max(0.0);
        sound.set_volume(gain);
        if let Some(instance) = sound.active_playback.as_ref() {
            self.backend.set_gain(instance.id(), gain);
        }
    }

    /// Destroy an instance whose non-looping pass has completed
    fn end_instance(&mut self, sound: &mut SoundModel, caller: &str) {
        if let Some(instance) = sound.active_playback.take() {
            self.backend.stop(instance.id());
            log::debug!("{}: instance {} ended", caller, instance.id().get());
        }
    }

    /// Advance the playhead for one animation frame
    ///
    /// Returns [`Tick::Ended`] exactly once when a non-looping pass completes;
    /// the instance is destroyed at that point and later ticks are `Idle`.
    pub fn tick(&mut self, sound: &mut SoundModel, now_ms: f64, left_x: f32, right_x: f32) -> Tick {
        let Some(instance) = sound.active_playback.as_ref() else {
            return Tick::Idle;
        };

        match playhead::tick(
            instance.elapsed_ms(now_ms),
            instance.trim(),
            instance.speed(),
            instance.is_looping(),
            left_x,
            right_x,
        ) {
            PlayheadPosition::At { x, progress } => Tick::Playing { x, progress },
            PlayheadPosition::Ended => {
                self.end_instance(sound, "tick");
                Tick::Ended
            }
        }
    }
}
