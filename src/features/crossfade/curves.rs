//! Crossfade gain curves
//!
//! Provides the gain pairs `(gA, gB)` used to blend an outgoing signal A into
//! an incoming signal B:
//!
//! - **Equal power**: `gA = cos²θ`, `gB = sin²θ`. Power of two uncorrelated
//!   signals stays constant across the fade, so there is no loudness dip.
//! - **Hann**: amplitude-linear raised-cosine bump, `gB = 0.5 - 0.5cos(2πt)`.
//!   B peaks at the center of the span and A owns both ends.
//! - **Smoothstep**: amplitude-linear cubic ease `t²(3-2t)`.
//!
//! For every curve `gA[n] + gB[n] = 1` and `gA[0] = 1`.
//!
//! # Example
//!
//! ```
//! use loopseam::features::crossfade::curves::{crossfade_gains, CrossfadeCurve};
//!
//! let (ga, gb) = crossfade_gains(1024, CrossfadeCurve::EqualPower)?;
//! assert_eq!(ga.len(), 1024);
//! assert!((ga[0] - 1.0).abs() < 1e-6 && gb[0].abs() < 1e-6);
//! # Ok::<(), loopseam::StitchError>(())
//! ```

use crate::error::StitchError;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

/// Shape of a crossfade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CrossfadeCurve {
    /// cos²/sin² gains, constant perceived power for uncorrelated signals
    #[default]
    EqualPower,
    /// Cubic smoothstep ease, amplitude-linear
    Smoothstep,
    /// Raised-cosine bump, amplitude-linear (A at both ends, B at the center)
    Hann,
}

/// Clamp `x` to `[lo, hi]`
#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    x.max(lo).min(hi)
}

/// Cubic ease `t²(3-2t)` with `t` clamped to `[0, 1]`
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = clamp(t, 0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Equal-power gain pair `(cos²(πt/2), sin²(πt/2))` for a scalar position
///
/// `t` outside `[0, 1]` is clamped rather than rejected.
#[inline]
pub fn equal_power_scalar(t: f32) -> (f32, f32) {
    let t = clamp(t, 0.0, 1.0);
    let a = (FRAC_PI_2 * t).cos();
    let b = (FRAC_PI_2 * t).sin();
    (a * a, b * b)
}

/// Generate crossfade gains of length `length` for the given curve
///
/// # Arguments
///
/// * `length` - Number of samples in the fade (must be >= 2)
/// * `curve` - Fade shape
///
/// # Returns
///
/// `(gA, gB)`: gains for the outgoing and incoming signal
///
/// # Errors
///
/// Returns `StitchError::InvalidInput` if `length < 2`
pub fn crossfade_gains(
    length: usize,
    curve: CrossfadeCurve,
) -> Result<(Vec<f32>, Vec<f32>), StitchError> {
    if length < 2 {
        return Err(StitchError::InvalidInput(format!(
            "Crossfade length must be >= 2, got {}",
            length
        )));
    }

    let denom = (length - 1) as f32;
    let mut ga = Vec::with_capacity(length);
    let mut gb = Vec::with_capacity(length);

    match curve {
        CrossfadeCurve::EqualPower => {
            for n in 0..length {
                let theta = PI * n as f32 / (2.0 * denom);
                let (c, s) = (theta.cos(), theta.sin());
                ga.push(c * c);
                gb.push(s * s);
            }
        }
        CrossfadeCurve::Hann => {
            for n in 0..length {
                let t = n as f32 / denom;
                let b = 0.5 - 0.5 * (2.0 * PI * t).cos();
                ga.push(1.0 - b);
                gb.push(b);
            }
        }
        CrossfadeCurve::Smoothstep => {
            for n in 0..length {
                let b = smoothstep(n as f32 / denom);
                ga.push(1.0 - b);
                gb.push(b);
            }
        }
    }

    Ok((ga, gb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_power_scalar_endpoints() {
        let (a0, b0) = equal_power_scalar(0.0);
        assert!((a0 - 1.0).abs() < 1e-6);
        assert!(b0.abs() < 1e-6);

        let (a1, b1) = equal_power_scalar(1.0);
        assert!(a1.abs() < 1e-6);
        assert!((b1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_equal_power_scalar_sums_to_one() {
        for i in 0..=100 {
            let (a, b) = equal_power_scalar(i as f32 / 100.0);
            assert!((a + b - 1.0).abs() < 1e-6, "t={} sum={}", i, a + b);
        }
    }

    #[test]
    fn test_equal_power_scalar_clamps() {
        assert_eq!(equal_power_scalar(-3.0), equal_power_scalar(0.0));
        assert_eq!(equal_power_scalar(7.5), equal_power_scalar(1.0));
    }

    #[test]
    fn test_smoothstep() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(smoothstep(-1.0), 0.0);
        assert_eq!(smoothstep(2.0), 1.0);
    }

    #[test]
    fn test_gains_endpoints_and_sum() {
        for curve in [CrossfadeCurve::EqualPower, CrossfadeCurve::Smoothstep] {
            let (ga, gb) = crossfade_gains(257, curve).unwrap();
            assert_eq!(ga.len(), 257);
            assert_eq!(gb.len(), 257);
            assert!((ga[0] - 1.0).abs() < 1e-6, "{:?}", curve);
            assert!(gb[0].abs() < 1e-6, "{:?}", curve);
            assert!(ga[256].abs() < 1e-6, "{:?}", curve);
            assert!((gb[256] - 1.0).abs() < 1e-6, "{:?}", curve);
            for (a, b) in ga.iter().zip(gb.iter()) {
                assert!((a + b - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_hann_gains_peak_at_center() {
        let (ga, gb) = crossfade_gains(257, CrossfadeCurve::Hann).unwrap();
        assert!((ga[0] - 1.0).abs() < 1e-6);
        assert!((gb[128] - 1.0).abs() < 1e-6);
        assert!(gb[256].abs() < 1e-5);
        for (a, b) in ga.iter().zip(gb.iter()) {
            assert!((a + b - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gains_are_monotonic() {
        let (ga, gb) = crossfade_gains(64, CrossfadeCurve::EqualPower).unwrap();
        for n in 1..64 {
            assert!(ga[n] <= ga[n - 1] + 1e-7);
            assert!(gb[n] >= gb[n - 1] - 1e-7);
        }
    }

    #[test]
    fn test_minimum_length() {
        let (ga, gb) = crossfade_gains(2, CrossfadeCurve::Smoothstep).unwrap();
        assert_eq!(ga, vec![1.0, 0.0]);
        assert_eq!(gb, vec![0.0, 1.0]);
        assert!(crossfade_gains(1, CrossfadeCurve::EqualPower).is_err());
        assert!(crossfade_gains(0, CrossfadeCurve::EqualPower).is_err());
    }

    #[test]
    fn test_curve_serializes_like_pack_format() {
        assert_eq!(
            serde_json::to_string(&CrossfadeCurve::EqualPower).unwrap(),
            "\"equalPower\""
        );
        let curve: CrossfadeCurve = serde_json::from_str("\"smoothstep\"").unwrap();
        assert_eq!(curve, CrossfadeCurve::Smoothstep);
    }
}
