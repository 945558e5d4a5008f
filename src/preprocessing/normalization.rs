//! Level utilities: DC removal, RMS, peak and loudness matching
//!
//! Clicks at a seam come from steps in amplitude or slope. A residual DC
//! offset between two windows is such a step, so every comparison and blend
//! in this crate can remove the per-window mean first.
//!
//! # Example
//!
//! ```
//! use loopseam::preprocessing::normalization::{remove_dc_in_place, rms};
//!
//! let mut window = vec![1.5f32, 0.5, 1.5, 0.5];
//! remove_dc_in_place(&mut window);
//! assert_eq!(window, vec![0.5, -0.5, 0.5, -0.5]);
//! assert!((rms(&window) - 0.5).abs() < 1e-6);
//! ```

/// Added under the square root of [`rms`] so silence never yields a
/// singular value downstream
pub const RMS_EPSILON: f32 = 1e-12;

/// Lower bound for RMS values used as divisors in loudness matching
pub const LOUDNESS_RMS_FLOOR: f32 = 1e-6;

/// Arithmetic mean of a buffer, `0.0` for an empty buffer
pub fn mean(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}

/// Subtract the arithmetic mean from every sample
///
/// No-op on an empty buffer.
pub fn remove_dc_in_place(samples: &mut [f32]) {
    if samples.is_empty() {
        return;
    }
    let m = mean(samples);
    for x in samples.iter_mut() {
        *x -= m;
    }
}

/// Root mean square: `sqrt(mean(x²) + 1e-12)`
///
/// Returns exactly `0.0` for an empty buffer (the epsilon is not applied).
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let power = samples.iter().map(|&x| x * x).sum::<f32>() / samples.len() as f32;
    (power + RMS_EPSILON).sqrt()
}

/// Largest absolute sample value, `0.0` for an empty buffer
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

/// Scale `target` so its RMS matches the RMS of `reference`
///
/// Both RMS values are floored at [`LOUDNESS_RMS_FLOOR`] so a silent frame
/// cannot produce an unbounded gain.
///
/// # Returns
///
/// The linear gain applied to `target`
pub fn match_loudness(reference: &[f32], target: &mut [f32]) -> f32 {
    let ref_rms = rms(reference).max(LOUDNESS_RMS_FLOOR);
    let target_rms = rms(target).max(LOUDNESS_RMS_FLOOR);
    let gain = ref_rms / target_rms;
    for x in target.iter_mut() {
        *x *= gain;
    }
    log::trace!(
        "Loudness match: ref_rms={:.6}, target_rms={:.6}, gain={:.4}",
        ref_rms,
        target_rms,
        gain
    );
    gain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_dc_zero_mean() {
        let mut x: Vec<f32> = (0..256).map(|i| 0.3 + (i as f32 * 0.1).sin()).collect();
        remove_dc_in_place(&mut x);
        assert!(mean(&x).abs() < 1e-5, "mean after DC removal: {}", mean(&x));
    }

    #[test]
    fn test_remove_dc_empty_is_noop() {
        let mut x: Vec<f32> = vec![];
        remove_dc_in_place(&mut x);
        assert!(x.is_empty());
    }

    #[test]
    fn test_rms_empty_is_exact_zero() {
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_rms_of_silence_is_epsilon_root() {
        let r = rms(&[0.0; 64]);
        assert!(r > 0.0);
        assert!((r - RMS_EPSILON.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_rms_of_constant() {
        assert!((rms(&[0.5; 100]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_peak() {
        assert_eq!(peak(&[0.1, -0.8, 0.4]), 0.8);
        assert_eq!(peak(&[]), 0.0);
    }

    #[test]
    fn test_match_loudness() {
        let reference = vec![0.5f32, -0.5, 0.5, -0.5];
        let mut target = vec![0.25f32, -0.25, 0.25, -0.25];
        let gain = match_loudness(&reference, &mut target);
        assert!((gain - 2.0).abs() < 1e-4);
        assert!((rms(&target) - rms(&reference)).abs() < 1e-5);
    }

    #[test]
    fn test_match_loudness_silent_target_is_bounded() {
        let reference = vec![0.5f32; 8];
        let mut target = vec![0.0f32; 8];
        let gain = match_loudness(&reference, &mut target);
        assert!(gain.is_finite());
        assert!(target.iter().all(|&x| x == 0.0));
    }
}
