//! Decode a sample and print its envelope
//!
//! Usage: `sample-info <file> [width]`
//!
//! Reads `{config_dir}/sampler/config.yaml` for the peak stride. Set
//! `RUST_LOG=debug` for verbose output.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use sampler_core::config::{default_config_path, load_config, SamplerConfig};
use sampler_core::{decode, gc, PeakExtractor};

const DEFAULT_WIDTH: usize = 80;
const ROWS: usize = 8;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(path) = args.first().map(PathBuf::from) else {
        bail!("usage: sample-info <file> [width]");
    };
    let width = match args.get(1) {
        Some(w) => w.parse::<usize>().with_context(|| format!("invalid width: {}", w))?,
        None => DEFAULT_WIDTH,
    };

    let config: SamplerConfig = load_config(&default_config_path());
    gc::set_collect_interval(Duration::from_millis(config.playback.gc_interval_ms));

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {:?}", path))?;
    let sample = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => decode::load_with_hint(bytes, ext),
        None => decode::load(bytes),
    }
    .with_context(|| format!("Failed to decode {:?}", path))?;

    println!("file:        {}", path.display());
    println!("sample rate: {} Hz", sample.sample_rate());
    println!("channels:    {}", sample.channel_count());
    println!("frames:      {}", sample.frame_count());
    println!("duration:    {:.3} s", sample.duration_seconds());

    let extractor = PeakExtractor {
        stride: config.peaks.stride,
    };
    let envelope = extractor.extract(&sample, width);
    println!("max peak:    {:.3}", envelope.max_peak());
    println!();

    let scale = envelope.max_peak().max(f32::EPSILON);
    for row in (0..ROWS).rev() {
        let threshold = (row as f32 + 0.5) / ROWS as f32;
        let line: String = envelope
            .peaks()
            .iter()
            .map(|p| if p / scale >= threshold { '#' } else { ' ' })
            .collect();
        println!("{}", line);
    }

    Ok(())
}
