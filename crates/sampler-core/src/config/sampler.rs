//! Sampler configuration sections
//!
//! Every struct is `#[serde(default)]` so a partial YAML file only overrides
//! the keys it names.

use serde::{Deserialize, Serialize};

/// Top-level configuration, stored as YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub playback: PlaybackConfig,
    pub peaks: PeaksConfig,
    pub trim: TrimConfig,
    pub output: OutputConfig,
}

/// Playback scheduling and the UI -> audio command queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Length of the linear rate ramp used by smooth speed changes
    /// Default: 100 ms
    pub speed_ramp_ms: f64,

    /// Capacity of the lock-free command queue to the audio thread
    /// Default: 256
    pub command_queue_capacity: usize,

    /// How often the sample garbage collector frees dropped sample data
    /// Default: 100 ms
    pub gc_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed_ramp_ms: 100.0,
            command_queue_capacity: 256,
            gc_interval_ms: 100,
        }
    }
}

/// Peak extraction tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeaksConfig {
    /// Fixed frame stride within a column slice
    /// Default: none (one tenth of the slice)
    pub stride: Option<usize>,
}

/// Trim handle hit testing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Pointer must be strictly closer than this to a handle's reference point
    pub hit_radius: f32,
    /// Horizontal inset of the reference point from the handle line
    pub tip_offset_x: f32,
    /// Vertical offset of the reference point from the top edge
    pub tip_offset_y: f32,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            hit_radius: 15.0,
            tip_offset_x: 5.0,
            tip_offset_y: 4.0,
        }
    }
}

/// Audio output device selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Open an output stream at all
    pub enabled: bool,
    /// Device name; `None` uses the system default
    pub device_name: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            device_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "playback:\n  speed_ramp_ms: 50\ntrim:\n  hit_radius: 20\n";
        let config: SamplerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.playback.speed_ramp_ms, 50.0);
        assert_eq!(config.playback.command_queue_capacity, 256);
        assert_eq!(config.playback.gc_interval_ms, 100);
        assert_eq!(config.trim.hit_radius, 20.0);
        assert_eq!(config.trim.tip_offset_x, 5.0);
        assert_eq!(config.peaks.stride, None);
        assert!(config.output.enabled);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config: SamplerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, SamplerConfig::default());
    }
}
