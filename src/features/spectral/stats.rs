//! Per-frame spectral shape statistics
//!
//! Computes centroid, 95% rolloff and flatness from a linear magnitude
//! spectrum of `N/2` bins, and averages them over a short-time analysis of a
//! whole buffer.

use super::distance::SpectralDistance;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-12;

/// Fraction of spectral mass below the rolloff frequency
const ROLLOFF_FRACTION: f32 = 0.95;

/// Spectral shape of one frame (or the mean over many)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpectralStats {
    /// Magnitude-weighted mean frequency in Hz
    pub centroid_hz: f32,
    /// Frequency below which 95% of the magnitude sum lies, in Hz
    pub rolloff95_hz: f32,
    /// Geometric over arithmetic mean of the magnitudes (0 = tonal, 1 = white)
    pub flatness: f32,
}

/// Spectral statistics of a single magnitude spectrum
///
/// # Arguments
///
/// * `magnitudes` - Linear magnitudes of bins `0..N/2`
/// * `sample_rate` - Sample rate in Hz
/// * `fft_size` - FFT size `N` used to produce the spectrum
pub fn frame_stats(magnitudes: &[f32], sample_rate: u32, fft_size: usize) -> SpectralStats {
    if magnitudes.is_empty() || fft_size == 0 {
        return SpectralStats::default();
    }

    let bin_hz = sample_rate as f32 / fft_size as f32;
    let total: f32 = magnitudes.iter().sum();

    let centroid_hz = if total > 0.0 {
        let weighted: f32 = magnitudes
            .iter()
            .enumerate()
            .map(|(k, &m)| k as f32 * m)
            .sum();
        weighted / total * bin_hz
    } else {
        0.0
    };

    let mut running = 0.0f32;
    let mut rolloff_bin = 0;
    for (k, &m) in magnitudes.iter().enumerate() {
        running += m;
        if running >= ROLLOFF_FRACTION * total {
            rolloff_bin = k;
            break;
        }
    }

    let count = magnitudes.len() as f32;
    let arith = total / count;
    let flatness = if arith > EPSILON {
        let mean_log = magnitudes.iter().map(|&m| (m + EPSILON).ln()).sum::<f32>() / count;
        (mean_log.exp() / (arith + EPSILON)).min(1.0)
    } else {
        0.0
    };

    SpectralStats {
        centroid_hz,
        rolloff95_hz: rolloff_bin as f32 * bin_hz,
        flatness,
    }
}

/// Mean spectral statistics over Hann-windowed frames of `samples`
///
/// Frames of `engine.fft_size()` samples are taken every `hop_size` samples.
/// Returns zeroed statistics when the buffer holds no complete frame.
pub fn mean_stats(
    samples: &[f32],
    sample_rate: u32,
    engine: &SpectralDistance,
    hop_size: usize,
) -> SpectralStats {
    let n = engine.fft_size();
    let hop = hop_size.max(1);
    let mut acc = SpectralStats::default();
    let mut frames = 0usize;

    let mut pos = 0;
    while pos + n <= samples.len() {
        if let Some(magnitudes) = engine.magnitude_spectrum(&samples[pos..pos + n]) {
            let s = frame_stats(&magnitudes, sample_rate, n);
            acc.centroid_hz += s.centroid_hz;
            acc.rolloff95_hz += s.rolloff95_hz;
            acc.flatness += s.flatness;
            frames += 1;
        }
        pos += hop;
    }

    log::debug!(
        "Spectral stats over {} frames (N={}, hop={})",
        frames,
        n,
        hop
    );

    if frames == 0 {
        return SpectralStats::default();
    }
    let f = frames as f32;
    SpectralStats {
        centroid_hz: acc.centroid_hz / f,
        rolloff95_hz: acc.rolloff95_hz / f,
        flatness: acc.flatness / f,
    }
}
