//! CPAL audio output
//!
//! Opens one output stream and moves a [`VoiceMixer`] into its callback.
//! The UI side keeps the returned [`CommandBackend`] and hands it to a
//! [`PlaybackController`](super::PlaybackController).
//!
//! Only f32 output streams are supported; a device whose default format
//! is something else is still used if it offers an f32 config.

use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, Stream, SupportedStreamConfig, SupportedStreamConfigRange};

use crate::config::{OutputConfig, PlaybackConfig};
use crate::error::{OutputError, OutputResult};

use super::backend::CommandBackend;
use super::voice::VoiceMixer;

/// Keeps the output stream alive. Drop this to stop audio.
pub struct OutputHandle {
    _stream: Stream,
    sample_rate: u32,
    channels: u16,
    device_name: String,
}

impl OutputHandle {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

fn find_device(config: &OutputConfig) -> OutputResult<cpal::Device> {
    let host = cpal::default_host();
    match &config.device_name {
        Some(wanted) => host
            .output_devices()
            .map_err(|e| OutputError::ConfigError(e.to_string()))?
            .find(|d| d.name().map(|n| &n == wanted).unwrap_or(false))
            .ok_or_else(|| OutputError::DeviceNotFound(wanted.clone())),
        None => host.default_output_device().ok_or(OutputError::NoDevice),
    }
}

/// Rate asked for when the device won't report a default config
const FALLBACK_SAMPLE_RATE: u32 = 48_000;

/// Pick an f32 output config, preferring stereo and then `target_rate`
///
/// The rate is clamped into the chosen range. `None` when the device has no
/// f32 config at all.
fn choose_f32_config(
    ranges: &[SupportedStreamConfigRange],
    target_rate: u32,
) -> Option<SupportedStreamConfig> {
    let in_range = |c: &&SupportedStreamConfigRange| {
        (c.min_sample_rate().0..=c.max_sample_rate().0).contains(&target_rate)
    };
    let f32_configs = || ranges.iter().filter(|c| c.sample_format() == SampleFormat::F32);

    let best = f32_configs()
        .filter(|c| c.channels() >= 2)
        .find(in_range)
        .or_else(|| f32_configs().find(|c| c.channels() >= 2))
        .or_else(|| f32_configs().find(in_range))
        .or_else(|| f32_configs().next())?;

    let rate = target_rate.clamp(best.min_sample_rate().0, best.max_sample_rate().0);
    if rate != target_rate {
        log::warn!(
            "start_output: device doesn't support {}Hz, using {}Hz",
            target_rate,
            rate
        );
    }
    Some(best.clone().with_sample_rate(SampleRate(rate)))
}

/// Open the configured device and start rendering
///
/// Returns the stream handle and the backend the controller should use.
pub fn start_output(
    output: &OutputConfig,
    playback: &PlaybackConfig,
) -> OutputResult<(OutputHandle, CommandBackend)> {
    if !output.enabled {
        return Err(OutputError::Disabled);
    }
    crate::gc::set_collect_interval(Duration::from_millis(playback.gc_interval_ms));

    let device = find_device(output)?;
    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    log::info!("start_output: using audio device {}", device_name);

    let target_rate = device
        .default_output_config()
        .map(|c| c.sample_rate().0)
        .unwrap_or(FALLBACK_SAMPLE_RATE);
    let ranges: Vec<SupportedStreamConfigRange> = device
        .supported_output_configs()
        .map_err(|e| OutputError::ConfigError(e.to_string()))?
        .collect();
    let supported = choose_f32_config(&ranges, target_rate).ok_or_else(|| {
        let formats: Vec<String> = ranges.iter().map(|r| format!("{:?}", r.sample_format())).collect();
        OutputError::UnsupportedFormat(formats.join(", "))
    })?;

    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels();
    let stream_config: cpal::StreamConfig = supported.into();

    let (backend, consumer) = CommandBackend::with_capacity(playback.command_queue_capacity);
    let mut mixer = VoiceMixer::new(consumer, sample_rate, channels as usize);

    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                mixer.render(data);
            },
            move |err| {
                log::warn!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| OutputError::StreamBuildError(e.to_string()))?;

    stream
        .play()
        .map_err(|e| OutputError::StreamPlayError(e.to_string()))?;

    log::info!(
        "start_output: {} channels, {}Hz, queue capacity {}",
        channels,
        sample_rate,
        playback.command_queue_capacity
    );

    Ok((
        OutputHandle {
            _stream: stream,
            sample_rate,
            channels,
            device_name,
        },
        backend,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpal::SupportedBufferSize;

    fn range(channels: u16, min: u32, max: u32, format: SampleFormat) -> SupportedStreamConfigRange {
        SupportedStreamConfigRange::new(
            channels,
            SampleRate(min),
            SampleRate(max),
            SupportedBufferSize::Unknown,
            format,
        )
    }

    #[test]
    fn test_f32_found_behind_i16_default() {
        let ranges = vec![
            range(2, 44_100, 48_000, SampleFormat::I16),
            range(2, 44_100, 96_000, SampleFormat::F32),
        ];
        let config = choose_f32_config(&ranges, 48_000).unwrap();
        assert_eq!(config.sample_format(), SampleFormat::F32);
        assert_eq!(config.channels(), 2);
        assert_eq!(config.sample_rate().0, 48_000);
    }

    #[test]
    fn test_prefers_stereo_then_clamps_rate() {
        let ranges = vec![
            range(1, 8_000, 192_000, SampleFormat::F32),
            range(2, 44_100, 44_100, SampleFormat::F32),
        ];
        let config = choose_f32_config(&ranges, 48_000).unwrap();
        assert_eq!(config.channels(), 2);
        assert_eq!(config.sample_rate().0, 44_100);
    }

    #[test]
    fn test_no_f32_config() {
        let ranges = vec![range(2, 44_100, 48_000, SampleFormat::I16)];
        assert!(choose_f32_config(&ranges, 48_000).is_none());
    }
}
