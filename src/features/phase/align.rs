//! Micro phase alignment by small circular shifts
//!
//! Residual phase mismatch at a loop seam (or between zone frames) is reduced
//! by trying every integer circular shift of one window in `[-max, +max]` and
//! keeping the one with the lowest mean absolute error. The search is
//! exhaustive, `O(max_shift · L)`, and meant for shifts of a few tens of
//! samples at most.
//!
//! # Example
//!
//! ```
//! use loopseam::features::phase::align::best_circular_align;
//!
//! let a = vec![0.0f32, 1.0, 0.0, -1.0];
//! assert_eq!(best_circular_align(&a, &a, 4), a);
//! ```

/// Winning shift of a circular alignment search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularShift {
    /// Shift `k` such that `aligned[i] = b[(i + k) mod L]`
    pub shift: isize,
    /// Mean absolute error at that shift
    pub error: f32,
}

/// Mean absolute error between `a[i]` and `b[(i + shift) mod len]`
#[inline]
fn shifted_l1(a: &[f32], b: &[f32], len: usize, shift: isize) -> f32 {
    let n = len as isize;
    let err: f32 = (0..len)
        .map(|i| {
            let j = (i as isize + shift).rem_euclid(n) as usize;
            (a[i] - b[j]).abs()
        })
        .sum();
    err / len as f32
}

/// Find the circular shift of `b` that best matches `a`
///
/// Shifts are tried from `-max_shift` to `+max_shift`; on an exact tie the
/// first shift tried is kept.
///
/// # Returns
///
/// `None` if either window is empty, otherwise the winning shift and its error
pub fn best_circular_shift(a: &[f32], b: &[f32], max_shift: usize) -> Option<CircularShift> {
    let len = a.len().min(b.len());
    if len == 0 {
        return None;
    }

    let max = max_shift as isize;
    let mut best = CircularShift {
        shift: 0,
        error: f32::INFINITY,
    };
    for k in -max..=max {
        let error = shifted_l1(a, b, len, k);
        if error < best.error {
            best = CircularShift { shift: k, error };
        }
    }
    Some(best)
}

/// Copy of `b` (truncated to `min(|a|, |b|)`) rotated by `shift`
pub fn rotate(b: &[f32], len: usize, shift: isize) -> Vec<f32> {
    let len = len.min(b.len());
    if shift == 0 || len == 0 {
        return b[..len].to_vec();
    }
    let n = len as isize;
    (0..len)
        .map(|i| b[(i as isize + shift).rem_euclid(n) as usize])
        .collect()
}

/// Align `b` to `a` and return the shifted copy of `b`
///
/// The result has length `min(|a|, |b|)`. If either window is empty, `b` is
/// returned unchanged.
///
/// # Arguments
///
/// * `a` - Reference window
/// * `b` - Window to rotate
/// * `max_shift` - Largest shift magnitude tried
pub fn best_circular_align(a: &[f32], b: &[f32], max_shift: usize) -> Vec<f32> {
    match best_circular_shift(a, b, max_shift) {
        Some(best) => rotate(b, a.len().min(b.len()), best.shift),
        None => b.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(len: usize, period: f32, phase: f32) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * (i as f32 + phase) / period).sin())
            .collect()
    }

    #[test]
    fn test_self_alignment_is_noop() {
        let a = vec![0.0f32, 1.0, 0.0, -1.0];
        for max_shift in 0..6 {
            assert_eq!(best_circular_align(&a, &a, max_shift), a);
        }

        let noise: Vec<f32> = (0..97).map(|i| ((i * 7919) % 101) as f32 / 50.0 - 1.0).collect();
        assert_eq!(best_circular_align(&noise, &noise, 8), noise);
        let best = best_circular_shift(&noise, &noise, 8).unwrap();
        assert_eq!(best.shift, 0);
        assert_eq!(best.error, 0.0);
    }

    #[test]
    fn test_recovers_known_shift() {
        let a = sine(256, 64.0, 0.0);
        // b lags a by 5 samples: b[i] = a[i - 5]
        let b = sine(256, 64.0, -5.0);
        let best = best_circular_shift(&a, &b, 8).unwrap();
        assert_eq!(best.shift, 5);
        assert!(best.error < 1e-4);

        let aligned = best_circular_align(&a, &b, 8);
        for (x, y) in a.iter().zip(aligned.iter()) {
            assert!((x - y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_negative_shift_wraps() {
        let a = vec![1.0f32, 2.0, 3.0, 4.0, 5.0];
        let b = vec![5.0f32, 1.0, 2.0, 3.0, 4.0];
        let best = best_circular_shift(&a, &b, 2).unwrap();
        assert_eq!(best.shift, 1);
        let c = vec![2.0f32, 3.0, 4.0, 5.0, 1.0];
        let best = best_circular_shift(&a, &c, 2).unwrap();
        assert_eq!(best.shift, -1);
        assert_eq!(best_circular_align(&a, &c, 2), a);
    }

    #[test]
    fn test_tie_keeps_most_negative_shift() {
        // Constant windows tie at every shift
        let a = vec![0.5f32; 16];
        let b = vec![0.25f32; 16];
        let best = best_circular_shift(&a, &b, 3).unwrap();
        assert_eq!(best.shift, -3);
    }

    #[test]
    fn test_truncates_to_shorter_window() {
        let a = vec![1.0f32, 2.0, 3.0];
        let b = vec![1.0f32, 2.0, 3.0, 4.0, 5.0];
        let out = best_circular_align(&a, &b, 2);
        assert_eq!(out, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_empty_window() {
        assert!(best_circular_shift(&[], &[1.0], 4).is_none());
        assert_eq!(best_circular_align(&[], &[1.0, 2.0], 4), vec![1.0, 2.0]);
    }
}
