//! Error types for the sampler core
//!
//! Each subsystem gets its own enum so callers can match on exactly the
//! failures that operation can produce.

use thiserror::Error;

/// Errors that can occur while turning bytes into a [`Sample`](crate::Sample)
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The container or codec isn't recognised
    #[error("Unsupported audio format: {0}")]
    Unsupported(String),

    /// The container has no decodable audio track
    #[error("No audio track found")]
    NoAudioTrack,

    /// The stream was recognised but the data is damaged
    #[error("Corrupt audio data: {0}")]
    Corrupt(String),

    /// Decoding succeeded but produced zero frames
    #[error("Decoded audio contains no frames")]
    Empty,

    /// Sample rate or channel layout missing from the stream
    #[error("Missing stream parameter: {0}")]
    MissingParameter(&'static str),
}

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised by playback and trim operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// Trim bounds are out of order, non-finite or outside the sample
    #[error("Invalid trim region: start={start}s end={end}s")]
    InvalidTrimRegion { start: f64, end: f64 },

    /// Playback speed must be finite and positive
    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(f64),
}

/// Result type for playback operations
pub type PlaybackResult<T> = Result<T, PlaybackError>;

/// Errors from the audio output device
#[derive(Error, Debug)]
pub enum OutputError {
    /// `output.enabled` is off in the config
    #[error("Audio output is disabled in the config")]
    Disabled,

    /// No default output device
    #[error("No audio output device available")]
    NoDevice,

    /// Named device not found
    #[error("Audio device not found: {0}")]
    DeviceNotFound(String),

    /// Failed to get device configuration
    #[error("Failed to get device config: {0}")]
    ConfigError(String),

    /// Failed to build audio stream
    #[error("Failed to build audio stream: {0}")]
    StreamBuildError(String),

    /// Failed to start/play stream
    #[error("Failed to start audio stream: {0}")]
    StreamPlayError(String),

    /// Device only offers formats we can't render to
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for audio output operations
pub type OutputResult<T> = Result<T, OutputError>;
