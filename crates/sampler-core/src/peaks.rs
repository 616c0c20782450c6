//! Amplitude envelopes for waveform display
//!
//! The sample is split into `width` equal slices (ceil division) and each
//! slice is reduced to a single peak: the maximum absolute amplitude per
//! channel, averaged across channels. Only every `stride`-th frame of a
//! slice is visited, so the cost is bounded by roughly `width * 10` frame
//! reads no matter how long the sample is.
//!
//! Three entry points:
//!
//! - [`PeakExtractor::extract`]: one synchronous pass
//! - [`PeakJob`]: the same computation split across calls, for very large
//!   samples where a full pass would stall a frame
//! - [`EnvelopeCache`]: keeps the envelope for the current (sample, width)
//!   and recomputes only when either changes

use std::sync::Arc;

use crate::sample::{Sample, SampleId};

/// Frames visited per slice when no stride override is given
pub const DEFAULT_VISITS_PER_SLICE: usize = 10;

/// Per-column peak amplitudes, each in `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct PeakEnvelope {
    sample_id: SampleId,
    peaks: Vec<f32>,
}

impl PeakEnvelope {
    fn empty(sample_id: SampleId) -> Self {
        Self {
            sample_id,
            peaks: Vec::new(),
        }
    }

    pub fn sample_id(&self) -> SampleId {
        self.sample_id
    }

    /// Number of columns (the render width this was computed for)
    pub fn width(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn peaks(&self) -> &[f32] {
        &self.peaks
    }

    /// Largest column value, 0.0 for an empty or silent envelope
    pub fn max_peak(&self) -> f32 {
        self.peaks.iter().copied().fold(0.0, f32::max)
    }
}

/// Stateless peak reducer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeakExtractor {
    /// Fixed frame stride within a slice; `None` derives it from the slice size
    pub stride: Option<usize>,
}

impl PeakExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stride(stride: usize) -> Self {
        Self {
            stride: Some(stride.max(1)),
        }
    }

    /// Compute the envelope for `sample` at `width` columns
    ///
    /// A width of zero yields an empty envelope. Columns past the end of a
    /// sample shorter than `width` are zero.
    pub fn extract(&self, sample: &Sample, width: usize) -> PeakEnvelope {
        let mut job = PeakJob::new(*self, sample.clone(), width);
        job.advance(width);
        job.take().unwrap_or_else(|| PeakEnvelope::empty(sample.id()))
    }

    fn slice_len(frame_count: usize, width: usize) -> usize {
        frame_count.div_ceil(width)
    }

    fn stride_for(&self, slice_len: usize) -> usize {
        match self.stride {
            Some(stride) => stride.max(1),
            None => (slice_len / DEFAULT_VISITS_PER_SLICE).max(1),
        }
    }

    fn column(sample: &Sample, start: usize, slice_len: usize, stride: usize) -> f32 {
        let frame_count = sample.frame_count();
        if start >= frame_count {
            return 0.0;
        }
        let end = (start + slice_len).min(frame_count);
        let channels = sample.channel_count();

        let mut sum = 0.0f32;
        for ch in 0..channels {
            let Some(data) = sample.channel(ch) else {
                continue;
            };
            let peak = data[start..end]
                .iter()
                .step_by(stride)
                .filter(|v| v.is_finite())
                .fold(0.0f32, |acc, v| acc.max(v.abs()));
            sum += peak;
        }

        (sum / channels as f32).clamp(0.0, 1.0)
    }
}

/// Progress of an incremental extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// More columns remain
    Pending { done: usize, total: usize },
    /// Envelope complete and ready to [`take`](PeakJob::take)
    Finished,
    /// [`cancel`](PeakJob::cancel) was called
    Cancelled,
}

/// Restartable, cancellable envelope computation
///
/// A job is bound to one (sample, width). When either changes, drop the job
/// and start a new one; there is no partial reuse. The envelope only becomes
/// visible through [`take`](Self::take) once every column is computed.
#[derive(Debug)]
pub struct PeakJob {
    extractor: PeakExtractor,
    sample: Sample,
    width: usize,
    slice_len: usize,
    stride: usize,
    peaks: Vec<f32>,
    cancelled: bool,
}

impl PeakJob {
    pub fn new(extractor: PeakExtractor, sample: Sample, width: usize) -> Self {
        let slice_len = if width == 0 {
            0
        } else {
            PeakExtractor::slice_len(sample.frame_count(), width)
        };
        let stride = extractor.stride_for(slice_len);
        Self {
            extractor,
            sample,
            width,
            slice_len,
            stride,
            peaks: Vec::with_capacity(width),
            cancelled: false,
        }
    }

    /// Key this job computes for
    pub fn key(&self) -> (SampleId, usize) {
        (self.sample.id(), self.width)
    }

    pub fn extractor(&self) -> PeakExtractor {
        self.extractor
    }

    /// Compute up to `column_budget` more columns
    pub fn advance(&mut self, column_budget: usize) -> JobStatus {
        if self.cancelled {
            return JobStatus::Cancelled;
        }

        let target = (self.peaks.len() + column_budget).min(self.width);
        while self.peaks.len() < target {
            let start = self.peaks.len() * self.slice_len;
            self.peaks
                .push(PeakExtractor::column(&self.sample, start, self.slice_len, self.stride));
        }

        self.status()
    }

    pub fn status(&self) -> JobStatus {
        if self.cancelled {
            JobStatus::Cancelled
        } else if self.peaks.len() >= self.width {
            JobStatus::Finished
        } else {
            JobStatus::Pending {
                done: self.peaks.len(),
                total: self.width,
            }
        }
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.peaks.clear();
    }

    /// Hand out the finished envelope; `None` while pending or after cancel
    pub fn take(&mut self) -> Option<PeakEnvelope> {
        if self.status() != JobStatus::Finished {
            return None;
        }
        Some(PeakEnvelope {
            sample_id: self.sample.id(),
            peaks: std::mem::take(&mut self.peaks),
        })
    }
}

/// Envelope for the most recent (sample, width) key
///
/// The stored envelope is swapped as a whole `Arc`, so anything holding the
/// previous one keeps a complete, consistent copy.
#[derive(Debug, Default)]
pub struct EnvelopeCache {
    extractor: PeakExtractor,
    entry: Option<((SampleId, usize), Arc<PeakEnvelope>)>,
    computations: usize,
}

impl EnvelopeCache {
    pub fn new(extractor: PeakExtractor) -> Self {
        Self {
            extractor,
            entry: None,
            computations: 0,
        }
    }

    /// Envelope for `sample` at `width`, recomputing on key change
    pub fn get_or_compute(&mut self, sample: &Sample, width: usize) -> Arc<PeakEnvelope> {
        let key = (sample.id(), width);
        if let Some((cached_key, envelope)) = &self.entry {
            if *cached_key == key {
                return Arc::clone(envelope);
            }
        }

        log::debug!(
            "EnvelopeCache: computing envelope for sample {} at width {}",
            key.0.get(),
            width
        );
        let envelope = Arc::new(self.extractor.extract(sample, width));
        self.computations += 1;
        self.entry = Some((key, Arc::clone(&envelope)));
        envelope
    }

    /// Store the result of a finished [`PeakJob`]
    pub fn publish(&mut self, key: (SampleId, usize), envelope: PeakEnvelope) -> Arc<PeakEnvelope> {
        let envelope = Arc::new(envelope);
        self.computations += 1;
        self.entry = Some((key, Arc::clone(&envelope)));
        envelope
    }

    pub fn current(&self) -> Option<Arc<PeakEnvelope>> {
        self.entry.as_ref().map(|(_, envelope)| Arc::clone(envelope))
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Number of envelopes computed over the cache's lifetime
    pub fn computations(&self) -> usize {
        self.computations
    }
}
