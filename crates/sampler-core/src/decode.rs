//! Bytes to [`Sample`] via symphonia
//!
//! Accepts anything the default symphonia probe recognises (WAV, FLAC, MP3,
//! OGG/Vorbis). Damaged packets in the middle of a stream are skipped with a
//! warning; a stream where nothing decodes is reported as corrupt.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{DecodeError, DecodeResult};
use crate::sample::Sample;

/// Decode an in-memory audio file, letting the probe guess the format
pub fn load(bytes: Vec<u8>) -> DecodeResult<Sample> {
    decode(bytes, Hint::new())
}

/// Decode an in-memory audio file with a file extension hint (`"wav"`, `"mp3"`, ...)
pub fn load_with_hint(bytes: Vec<u8>, extension: &str) -> DecodeResult<Sample> {
    let mut hint = Hint::new();
    hint.with_extension(extension);
    decode(bytes, hint)
}

fn decode(bytes: Vec<u8>, hint: Hint) -> DecodeResult<Sample> {
    let byte_len = bytes.len();
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let track_id = track.id;
    let declared_rate = track.codec_params.sample_rate;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

    let mut interleaved: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut buf_frames = 0usize;
    let mut stream_rate = declared_rate;
    let mut channel_count = 0usize;
    let mut failed_packets = 0usize;
    let mut last_error = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                log::warn!("decode: stream reset requested, stopping");
                break;
            }
            Err(e) => {
                log::warn!("decode: error reading packet: {}", e);
                last_error = Some(e.to_string());
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("decode: skipping damaged packet: {}", e);
                failed_packets += 1;
                last_error = Some(e.to_string());
                continue;
            }
            Err(e) => {
                log::warn!("decode: decoder failed: {}", e);
                last_error = Some(e.to_string());
                break;
            }
        };

        let spec = *decoded.spec();
        channel_count = spec.channels.count();
        stream_rate = Some(spec.rate);

        // Packets can grow (e.g. VBR), so reallocate when one doesn't fit
        if sample_buf.is_none() || decoded.capacity() > buf_frames {
            buf_frames = decoded.capacity();
            sample_buf = Some(SampleBuffer::new(buf_frames as u64, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            interleaved.extend_from_slice(buf.samples());
        }
    }

    if interleaved.is_empty() {
        return Err(match last_error {
            Some(e) => DecodeError::Corrupt(e),
            None => DecodeError::Empty,
        });
    }

    let sample_rate = stream_rate.ok_or(DecodeError::MissingParameter("sample rate"))?;
    if channel_count == 0 {
        return Err(DecodeError::MissingParameter("channel layout"));
    }

    let sample = Sample::from_interleaved(sample_rate, channel_count, &interleaved)
        .ok_or(DecodeError::MissingParameter("sample rate"))?;

    if sample.frame_count() == 0 {
        return Err(DecodeError::Empty);
    }

    log::info!(
        "decode: {} bytes -> {} ch, {}Hz, {} frames ({:.3}s), {} damaged packets skipped",
        byte_len,
        sample.channel_count(),
        sample.sample_rate(),
        sample.frame_count(),
        sample.duration_seconds(),
        failed_packets
    );

    Ok(sample)
}
