//! Sample introspection
//!
//! Level, DC, clipping and spectral-shape statistics of a mono sample, plus
//! the loop the stitcher would pick for it. Used to inspect recordings
//! before they are mapped into zones.
//!
//! # Example
//!
//! ```
//! use loopseam::analysis::summary::{analyze_sample, SummaryConfig};
//!
//! let samples: Vec<f32> = (0..4800).map(|i| 0.5 * (i as f32 * 0.05).sin()).collect();
//! let summary = analyze_sample(&samples, 48000, &SummaryConfig { loop_search: None, ..Default::default() })?;
//! assert!((summary.duration_seconds - 0.1).abs() < 1e-9);
//! # Ok::<(), loopseam::StitchError>(())
//! ```

use super::loop_stitcher::LoopStitcher;
use super::result::LoopScores;
use crate::config::StitchConfig;
use crate::error::StitchError;
use crate::features::spectral::distance::SpectralDistance;
use crate::features::spectral::stats::mean_stats;
use crate::preprocessing::normalization::{mean, peak, remove_dc_in_place, rms};
use serde::{Deserialize, Serialize};

/// Loop search performed as part of a summary
#[derive(Debug, Clone)]
pub struct LoopSearch {
    /// First sample of the search range (default: 10% of the buffer)
    pub start: Option<usize>,
    /// One past the last sample of the search range (default: 90% of the buffer)
    pub end: Option<usize>,
    /// Stitcher configuration
    pub config: StitchConfig,
}

impl Default for LoopSearch {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            config: StitchConfig::default(),
        }
    }
}

/// Summary parameters
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// STFT frame size for spectral statistics (default: 1024)
    pub fft_size: usize,

    /// STFT hop size (default: 256)
    pub hop_size: usize,

    /// Absolute level counted as clipped (default: 0.999)
    pub clip_threshold: f32,

    /// Loop search to include, `None` to skip it (default: search 10%-90%)
    pub loop_search: Option<LoopSearch>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            hop_size: 256,
            clip_threshold: 0.999,
            loop_search: Some(LoopSearch::default()),
        }
    }
}

/// Loop found while summarizing a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopInfo {
    /// Loop start sample
    pub start: usize,
    /// Loop end sample
    pub end: usize,
    /// Seam length the search used
    pub overlap: usize,
    /// Sub-scores of the winning candidate
    pub scores: LoopScores,
}

/// Introspection result for one sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Length in seconds
    pub duration_seconds: f64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Mean of the raw signal
    pub dc_offset: f32,
    /// RMS after DC removal
    pub rms: f32,
    /// Largest absolute raw sample
    pub peak: f32,
    /// Percentage of raw samples at or above the clip threshold
    pub clipping_percent: f32,
    /// Mean spectral centroid in Hz
    pub centroid_hz: f32,
    /// Mean 95% rolloff frequency in Hz
    pub rolloff95_hz: f32,
    /// Mean spectral flatness
    pub flatness: f32,
    /// Best loop, if a search was requested and succeeded
    pub loop_info: Option<LoopInfo>,
}

/// Summarize a mono sample
///
/// # Arguments
///
/// * `samples` - Mono samples
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Summary parameters
///
/// # Errors
///
/// - `InvalidInput` for an empty buffer or a zero sample rate
/// - `InvalidConfig` if the FFT size or the loop search configuration is invalid
///
/// A loop search that finds nothing (range too small, no candidate) is not an
/// error; `loop_info` is `None` then.
pub fn analyze_sample(
    samples: &[f32],
    sample_rate: u32,
    config: &SummaryConfig,
) -> Result<SampleSummary, StitchError> {
    log::debug!(
        "Summarizing sample: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    if samples.is_empty() {
        return Err(StitchError::InvalidInput("Empty audio samples".to_string()));
    }
    if sample_rate == 0 {
        return Err(StitchError::InvalidInput("Invalid sample rate".to_string()));
    }

    let dc_offset = mean(samples);
    let raw_peak = peak(samples);
    let clipped = samples
        .iter()
        .filter(|x| x.abs() >= config.clip_threshold)
        .count();

    let mut centered = samples.to_vec();
    remove_dc_in_place(&mut centered);

    let engine = SpectralDistance::new(config.fft_size, -60.0)?;
    let stats = mean_stats(&centered, sample_rate, &engine, config.hop_size);

    let loop_info = match &config.loop_search {
        Some(search) => find_loop_info(&centered, search)?,
        None => None,
    };

    Ok(SampleSummary {
        duration_seconds: samples.len() as f64 / sample_rate as f64,
        sample_rate,
        dc_offset,
        rms: rms(&centered),
        peak: raw_peak,
        clipping_percent: 100.0 * clipped as f32 / samples.len() as f32,
        centroid_hz: stats.centroid_hz,
        rolloff95_hz: stats.rolloff95_hz,
        flatness: stats.flatness,
        loop_info,
    })
}

fn find_loop_info(samples: &[f32], search: &LoopSearch) -> Result<Option<LoopInfo>, StitchError> {
    let stitcher = LoopStitcher::new(search.config.clone())?;
    let start = search.start.unwrap_or(samples.len() / 10);
    let end = search.end.unwrap_or(samples.len() * 9 / 10);

    match stitcher.find_loop(samples, start, end) {
        Ok(found) => Ok(Some(LoopInfo {
            start: found.start,
            end: found.end,
            overlap: stitcher.overlap(),
            scores: found.scores,
        })),
        Err(e) => {
            log::debug!("No loop for summary: {}", e);
            Ok(None)
        }
    }
}
