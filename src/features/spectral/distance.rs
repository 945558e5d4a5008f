//! Log-magnitude spectral distance between two frames
//!
//! Compares the perceptual spectral content of two equal-length frames, used
//! as the spectral term of the loop candidate score.
//!
//! # Algorithm
//!
//! 1. Take the first `N` samples of each frame and apply a Hann window
//! 2. Real FFT of size `N`; keep the magnitudes of the first `N/2` bins
//! 3. `20·log10(|X[k]| + 1e-12)`, thresholded from below at the log floor
//! 4. Euclidean norm of the per-bin difference of the two dB spectra
//!
//! Comparing in the log domain tracks loudness-domain continuity better than
//! linear magnitude or time-domain L2. The floor keeps near-silent bins from
//! dominating the distance.
//!
//! # Example
//!
//! ```
//! use loopseam::features::spectral::distance::SpectralDistance;
//!
//! let engine = SpectralDistance::new(256, -60.0)?;
//! let frame: Vec<f32> = (0..256).map(|i| (i as f32 * 0.2).sin()).collect();
//! assert_eq!(engine.distance(&frame, &frame), 0.0);
//! # Ok::<(), loopseam::StitchError>(())
//! ```

use crate::error::StitchError;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Default FFT size
pub const DEFAULT_FFT_SIZE: usize = 1024;

/// Default log-magnitude floor in dB
pub const DEFAULT_LOG_FLOOR_DB: f32 = -60.0;

/// Added to every magnitude before taking the logarithm
const MAGNITUDE_EPSILON: f32 = 1e-12;

/// Symmetric Hann window of length `n`
pub fn hann_window(n: usize) -> Vec<f32> {
    if n <= 1 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| {
            let t = 2.0 * std::f32::consts::PI * i as f32 / (n - 1) as f32;
            0.5 * (1.0 - t.cos())
        })
        .collect()
}

/// Spectral distance engine
///
/// Holds an immutable FFT plan, the analysis window and the log floor. Every
/// call re-windows and re-transforms its inputs; nothing carries over between
/// calls, so one engine can be shared across threads.
#[derive(Clone)]
pub struct SpectralDistance {
    fft_size: usize,
    log_floor_db: f32,
    window: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
}

impl fmt::Debug for SpectralDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralDistance")
            .field("fft_size", &self.fft_size)
            .field("log_floor_db", &self.log_floor_db)
            .finish()
    }
}

impl Default for SpectralDistance {
    fn default() -> Self {
        Self::build(DEFAULT_FFT_SIZE, DEFAULT_LOG_FLOOR_DB)
    }
}

impl SpectralDistance {
    /// Create an engine for frames of at least `fft_size` samples
    ///
    /// # Arguments
    ///
    /// * `fft_size` - Analysis size `N`, a power of two >= 2
    /// * `log_floor_db` - Lower threshold applied to the dB spectrum
    ///
    /// # Errors
    ///
    /// Returns `StitchError::InvalidConfig` if `fft_size` is not a power of two
    /// or the floor is not finite
    pub fn new(fft_size: usize, log_floor_db: f32) -> Result<Self, StitchError> {
        if fft_size < 2 || !fft_size.is_power_of_two() {
            return Err(StitchError::InvalidConfig(format!(
                "fft_size must be a power of two >= 2, got {}",
                fft_size
            )));
        }
        if !log_floor_db.is_finite() {
            return Err(StitchError::InvalidConfig(
                "log_floor_db must be finite".to_string(),
            ));
        }
        Ok(Self::build(fft_size, log_floor_db))
    }

    fn build(fft_size: usize, log_floor_db: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        Self {
            fft_size,
            log_floor_db,
            window: hann_window(fft_size),
            fft,
        }
    }

    /// Analysis size `N`
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Log-magnitude floor in dB
    pub fn log_floor_db(&self) -> f32 {
        self.log_floor_db
    }

    /// Magnitude spectrum (`N/2` bins) of the Hann-windowed first `N` samples
    ///
    /// Returns `None` when the frame is shorter than `N`.
    pub fn magnitude_spectrum(&self, frame: &[f32]) -> Option<Vec<f32>> {
        let n = self.fft_size;
        if frame.len() < n {
            return None;
        }

        let mut buffer: Vec<Complex<f32>> = frame[..n]
            .iter()
            .zip(self.window.iter())
            .map(|(&x, &w)| Complex::new(x * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        Some(buffer[..n / 2].iter().map(|c| c.norm()).collect())
    }

    /// Floored dB magnitude spectrum (`N/2` bins) of the first `N` samples
    ///
    /// Returns `None` when the frame is shorter than `N`.
    pub fn log_magnitude_spectrum(&self, frame: &[f32]) -> Option<Vec<f32>> {
        let mut spectrum = self.magnitude_spectrum(frame)?;
        for v in spectrum.iter_mut() {
            *v = (20.0 * (*v + MAGNITUDE_EPSILON).log10()).max(self.log_floor_db);
        }
        Some(spectrum)
    }

    /// Distance between two frames; `0.0` if either is shorter than `N`
    ///
    /// A frame shorter than the analysis size means no comparison is
    /// possible, which is reported as zero distance rather than an error.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match (
            self.log_magnitude_spectrum(a),
            self.log_magnitude_spectrum(b),
        ) {
            (Some(sa), Some(sb)) => spectrum_distance(&sa, &sb),
            _ => 0.0,
        }
    }
}

/// Euclidean norm of the difference of two dB spectra
#[inline]
pub fn spectrum_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn tone(len: usize, cycles_per_frame: f32, frame: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * cycles_per_frame * i as f32 / frame as f32).sin())
            .collect()
    }

    #[test]
    fn test_identical_frames_have_zero_distance() {
        let engine = SpectralDistance::new(512, -60.0).unwrap();
        let a = tone(600, 12.3, 512);
        assert_eq!(engine.distance(&a, &a), 0.0);
    }

    #[test]
    fn test_short_frames_have_zero_distance() {
        let engine = SpectralDistance::new(256, -60.0).unwrap();
        let a = tone(255, 4.0, 256);
        let b = tone(512, 40.0, 256);
        assert_eq!(engine.distance(&a, &b), 0.0);
        assert_eq!(engine.distance(&b, &a), 0.0);
        assert!(engine.log_magnitude_spectrum(&a).is_none());
    }

    #[test]
    fn test_different_tones_are_distant() {
        let engine = SpectralDistance::new(256, -60.0).unwrap();
        let low = tone(256, 8.0, 256);
        let high = tone(256, 60.0, 256);
        let near = tone(256, 8.0, 256)
            .iter()
            .map(|x| x * 0.99)
            .collect::<Vec<_>>();

        let far = engine.distance(&low, &high);
        let close = engine.distance(&low, &near);
        assert!(far > 10.0 * close.max(1e-3), "far={} close={}", far, close);
    }

    #[test]
    fn test_floor_hides_sub_floor_noise() {
        let engine = SpectralDistance::new(128, -60.0).unwrap();
        let silence = vec![0.0f32; 128];
        // -160 dBFS-ish dither, every bin stays below the floor
        let dither: Vec<f32> = (0..128)
            .map(|i| if i % 2 == 0 { 1e-8 } else { -1e-8 })
            .collect();
        assert_eq!(engine.distance(&silence, &dither), 0.0);

        let spectrum = engine.log_magnitude_spectrum(&silence).unwrap();
        assert_eq!(spectrum.len(), 64);
        assert!(spectrum.iter().all(|&v| v == -60.0));
    }

    #[test]
    fn test_only_first_n_samples_are_compared() {
        let engine = SpectralDistance::new(64, -60.0).unwrap();
        let mut a = tone(128, 4.0, 64);
        let b = a.clone();
        for x in a[64..].iter_mut() {
            *x = 0.9;
        }
        assert_eq!(engine.distance(&a, &b), 0.0);
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(SpectralDistance::new(1000, -60.0).is_err());
        assert!(SpectralDistance::new(1, -60.0).is_err());
        assert!(SpectralDistance::new(0, -60.0).is_err());
        assert!(SpectralDistance::new(256, f32::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_hann_window_shape() {
        let w = hann_window(64);
        assert!(w[0].abs() < 1e-6);
        assert!(w[63].abs() < 1e-6);
        for i in 0..32 {
            assert!((w[i] - w[63 - i]).abs() < 1e-5);
        }
        assert_eq!(hann_window(1), vec![1.0]);
        assert!(hann_window(0).is_empty());
    }
}
