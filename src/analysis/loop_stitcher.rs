//! Loop point search and seam synthesis
//!
//! Finds a `(start, end)` pair inside a sustained recording where playback can
//! jump from `end` back to `start` without an audible discontinuity, then
//! writes a crossfaded seam at `start`.
//!
//! # Algorithm
//!
//! 1. Reject search ranges narrower than `4L`
//! 2. Enumerate candidates: every start `s` in `[searchStart, searchEnd - 3L)`
//!    and every end `e` in `[s + 2L, searchEnd - L)` stepping by `max(1, L/8)`.
//!    Head window is `[s, s+L)`, tail window is `[e-L, e)`.
//! 3. Optionally remove each window's own mean
//! 4. Score `J = wAmp·ampErr + wSlope·slopeErr + wSpec·specDist`
//! 5. Keep the lowest `J`; ties keep the earliest candidate in `(s, e)` order
//! 6. Re-extract the winning windows and phase-align the tail onto the head
//! 7. Overwrite `[s, s+L)` with `gA·head + gB·tail`
//!
//! Striding `e` by `L/8` instead of 1 gives roughly an order of magnitude
//! speedup; neighbouring ends score almost identically.
//!
//! # Example
//!
//! ```
//! use loopseam::{CrossfadeCurve, LoopStitcher, StitchConfig};
//!
//! // 200 Hz at 8 kHz: 40-sample period, seam of 3 periods
//! let mut buffer: Vec<f32> = (0..2400)
//!     .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 40.0).sin() as f32)
//!     .collect();
//! let config = StitchConfig { fft_size: 64, ..StitchConfig::with_overlap(120) };
//! let stitcher = LoopStitcher::new(config)?;
//!
//! let found = stitcher.stitch_loop_in_place(&mut buffer, 100, 2300, CrossfadeCurve::EqualPower)?;
//! assert!(found.end - found.start >= 240);
//! # Ok::<(), loopseam::StitchError>(())
//! ```

use super::result::{LoopCandidate, LoopMatch, LoopScores};
use crate::config::{DcMode, StitchConfig};
use crate::error::StitchError;
use crate::features::crossfade::curves::{crossfade_gains, CrossfadeCurve};
use crate::features::phase::align::{best_circular_shift, rotate};
use crate::features::spectral::distance::{spectrum_distance, SpectralDistance};
use crate::preprocessing::normalization::remove_dc_in_place;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Amplitude mismatch: square root of the summed squared difference, divided by `L`
#[inline]
pub fn amplitude_error(head: &[f32], tail: &[f32]) -> f32 {
    let len = head.len().min(tail.len());
    if len == 0 {
        return 0.0;
    }
    let sum_sq: f32 = head
        .iter()
        .zip(tail.iter())
        .map(|(&a, &b)| {
            let d = a - b;
            d * d
        })
        .sum();
    sum_sq.sqrt() / len as f32
}

/// Slope mismatch: mean absolute difference of first differences
///
/// `(1/(L-1))·Σ_{i=1..L-1} |Δhead[i] - Δtail[i]|`. Catches slope breaks that
/// click even when amplitudes agree.
#[inline]
pub fn slope_error(head: &[f32], tail: &[f32]) -> f32 {
    let len = head.len().min(tail.len());
    if len < 2 {
        return 0.0;
    }
    let sum: f32 = (1..len)
        .map(|i| {
            let da = head[i] - head[i - 1];
            let db = tail[i] - tail[i - 1];
            (da - db).abs()
        })
        .sum();
    sum / (len - 1) as f32
}

/// Keep the better of two candidates: lower `J`, then earlier `(start, end)`
#[inline]
fn better(a: LoopCandidate, b: LoopCandidate) -> LoopCandidate {
    if b.scores.composite < a.scores.composite {
        b
    } else if a.scores.composite < b.scores.composite {
        a
    } else if (b.start, b.end) < (a.start, a.end) {
        b
    } else {
        a
    }
}

/// Sample bounds of one search over a particular buffer
struct SearchContext<'a> {
    buffer: &'a [f32],
    /// First sample a window may touch
    low: usize,
    /// One past the last sample a window may touch
    high: usize,
    /// Step between candidate ends
    end_stride: usize,
    /// dB spectra of every window start in `[low, high - 2L)`, `bins` values
    /// per position, if the spectral term is active
    spectra: Option<Vec<f32>>,
    /// Spectrum length `N/2`
    bins: usize,
}

impl SearchContext<'_> {
    /// Cached spectrum of the window starting at `pos`
    #[inline]
    fn spectrum(&self, pos: usize) -> Option<&[f32]> {
        self.spectra.as_ref().map(|cache| {
            let offset = (pos - self.low) * self.bins;
            &cache[offset..offset + self.bins]
        })
    }
}

/// Loop point finder and seam writer
///
/// Holds only immutable configuration; every call works on the buffer it is
/// given and keeps no reference to it afterwards.
#[derive(Debug, Clone)]
pub struct LoopStitcher {
    config: StitchConfig,
    spectral: SpectralDistance,
}

impl LoopStitcher {
    /// Create a stitcher from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `StitchError::InvalidConfig` if the configuration is rejected by
    /// [`StitchConfig::validate`]
    pub fn new(config: StitchConfig) -> Result<Self, StitchError> {
        config.validate()?;
        let spectral = SpectralDistance::new(config.fft_size, config.log_floor_db)?;
        Ok(Self { config, spectral })
    }

    /// Active configuration
    pub fn config(&self) -> &StitchConfig {
        &self.config
    }

    /// Seam length `L`
    pub fn overlap(&self) -> usize {
        self.config.overlap
    }

    /// Search `[search_start, search_end)` for the best loop without modifying
    /// the buffer
    ///
    /// # Errors
    ///
    /// - `SearchWindowTooSmall` if `search_end - search_start < 4L`
    /// - `NoCandidateFound` if the range (clipped to the buffer) holds no
    ///   `(start, end)` pair, or every candidate scored non-finite
    pub fn find_loop(
        &self,
        buffer: &[f32],
        search_start: usize,
        search_end: usize,
    ) -> Result<LoopCandidate, StitchError> {
        let started = Instant::now();
        let l = self.config.overlap;

        log::debug!(
            "Searching loop in [{}, {}) of {} samples, overlap={}",
            search_start,
            search_end,
            buffer.len(),
            l
        );

        let width = search_end.saturating_sub(search_start);
        if width < 4 * l {
            log::warn!(
                "Search window too small: {} samples, need at least {}",
                width,
                4 * l
            );
            return Err(StitchError::SearchWindowTooSmall {
                width,
                required: 4 * l,
            });
        }

        let low = search_start;
        let high = search_end.min(buffer.len());
        let start_end = match high.checked_sub(3 * l) {
            Some(s_end) if s_end > low => s_end,
            _ => {
                log::warn!(
                    "No loop candidate in [{}, {}) of {} samples",
                    search_start,
                    search_end,
                    buffer.len()
                );
                return Err(StitchError::NoCandidateFound);
            }
        };

        let ctx = SearchContext {
            buffer,
            low,
            high,
            end_stride: (l / 8).max(1),
            spectra: self.spectra_cache(buffer, low, high),
            bins: self.spectral.fft_size() / 2,
        };
        log::debug!(
            "Scanning {} loop starts, end stride {}, spectral cache: {}",
            start_end - low,
            ctx.end_stride,
            ctx.spectra.is_some()
        );

        let winner = self.scan_starts(&ctx, low, start_end);

        match winner {
            Some(mut best) => {
                if ctx.spectra.is_none() {
                    // Spectral term was skipped; still report its value
                    best.scores.spectral = self.spectral.distance(
                        &buffer[best.start..best.start + l],
                        &buffer[best.end - l..best.end],
                    );
                }
                log::debug!(
                    "Loop found: start={}, end={}, J={:.6} (amp={:.6}, slope={:.6}, spec={:.4}) in {:.1} ms",
                    best.start,
                    best.end,
                    best.scores.composite,
                    best.scores.amplitude,
                    best.scores.slope,
                    best.scores.spectral,
                    started.elapsed().as_secs_f32() * 1000.0
                );
                Ok(best)
            }
            None => {
                log::warn!("Every loop candidate scored non-finite");
                Err(StitchError::NoCandidateFound)
            }
        }
    }

    /// Find the best loop in `[search_start, search_end)` and write its seam
    ///
    /// On success `[start, start + L)` of `buffer` is overwritten with the
    /// crossfade of the head window into the phase-aligned tail window; the
    /// rest of the buffer is untouched. Playback is expected to loop from
    /// `end` back to `start`.
    ///
    /// With [`DcMode::PerWindow`] the seam is built from the mean-removed
    /// windows, so a signal with a DC offset steps by that offset at both
    /// seam edges. Use [`DcMode::None`] for material that carries DC.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Mono samples, modified in place on success
    /// * `search_start` - First sample of the search range
    /// * `search_end` - One past the last sample of the search range
    /// * `curve` - Seam crossfade curve
    ///
    /// # Errors
    ///
    /// Same as [`LoopStitcher::find_loop`]; the buffer is not modified
    pub fn stitch_loop_in_place(
        &self,
        buffer: &mut [f32],
        search_start: usize,
        search_end: usize,
        curve: CrossfadeCurve,
    ) -> Result<LoopMatch, StitchError> {
        let candidate = self.find_loop(buffer, search_start, search_end)?;
        let l = self.config.overlap;
        let (s, e) = (candidate.start, candidate.end);

        let mut head = buffer[s..s + l].to_vec();
        let mut tail = buffer[e - l..e].to_vec();
        if self.config.dc_mode == DcMode::PerWindow {
            remove_dc_in_place(&mut head);
            remove_dc_in_place(&mut tail);
        }

        let shift = best_circular_shift(&head, &tail, self.config.phase_max_shift)
            .map(|best| best.shift)
            .unwrap_or(0);
        let aligned = rotate(&tail, l, shift);

        let (ga, gb) = crossfade_gains(l, curve)?;
        for (i, out) in buffer[s..s + l].iter_mut().enumerate() {
            *out = ga[i] * head[i] + gb[i] * aligned[i];
        }

        log::debug!(
            "Seam written at [{}, {}) with {:?} curve, tail shift={}",
            s,
            s + l,
            curve,
            shift
        );

        Ok(LoopMatch {
            start: s,
            end: e,
            overlap: l,
            curve,
            shift,
            scores: candidate.scores,
        })
    }

    /// dB spectra of every window start the search can visit
    ///
    /// Head starts lie in `[low, high - 3L)` and tail starts in
    /// `[low + L, high - 2L)`, so one spectrum per position of
    /// `[low, high - 2L)` covers both. Spectra are stored back to back,
    /// `N/2` bins per position. Returns `None` when the spectral term cannot
    /// contribute (zero weight, or `L` shorter than the FFT size).
    fn spectra_cache(&self, buffer: &[f32], low: usize, high: usize) -> Option<Vec<f32>> {
        let l = self.config.overlap;
        if self.config.weights.spectral == 0.0 || l < self.spectral.fft_size() {
            return None;
        }
        let bins = self.spectral.fft_size() / 2;
        let count = high.saturating_sub(2 * l).saturating_sub(low);
        let mut cache = vec![0.0f32; count * bins];

        let fill = |(i, out): (usize, &mut [f32])| {
            let p = low + i;
            if let Some(spectrum) = self.spectral.log_magnitude_spectrum(&buffer[p..p + l]) {
                out.copy_from_slice(&spectrum);
            }
        };

        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                cache.par_chunks_mut(bins).enumerate().for_each(fill);
                return Some(cache);
            }
        }

        cache.chunks_mut(bins).enumerate().for_each(fill);
        Some(cache)
    }

    /// Best candidate over starts `[first, last)`
    fn scan_starts(&self, ctx: &SearchContext<'_>, first: usize, last: usize) -> Option<LoopCandidate> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return (first..last)
                    .into_par_iter()
                    .filter_map(|s| self.best_for_start(ctx, s))
                    .reduce_with(better);
            }
        }

        (first..last)
            .filter_map(|s| self.best_for_start(ctx, s))
            .reduce(better)
    }

    /// Best end for a fixed start `s`, first minimum in ascending `e`
    fn best_for_start(&self, ctx: &SearchContext<'_>, s: usize) -> Option<LoopCandidate> {
        let l = self.config.overlap;
        let weights = &self.config.weights;
        let per_window = self.config.dc_mode == DcMode::PerWindow;

        let mut head = ctx.buffer[s..s + l].to_vec();
        if per_window {
            remove_dc_in_place(&mut head);
        }
        let mut tail = vec![0.0f32; l];
        let mut best: Option<LoopCandidate> = None;

        let end_limit = ctx.high - l;
        let mut e = s + 2 * l;
        while e < end_limit {
            tail.copy_from_slice(&ctx.buffer[e - l..e]);
            if per_window {
                remove_dc_in_place(&mut tail);
            }

            let spectral = match (ctx.spectrum(s), ctx.spectrum(e - l)) {
                (Some(head_db), Some(tail_db)) => spectrum_distance(head_db, tail_db),
                _ => 0.0,
            };
            let scores = LoopScores::new(
                amplitude_error(&head, &tail),
                slope_error(&head, &tail),
                spectral,
                weights,
            );

            if scores.composite.is_finite()
                && best.map_or(true, |b| scores.composite < b.scores.composite)
            {
                best = Some(LoopCandidate {
                    start: s,
                    end: e,
                    scores,
                });
            }
            e += ctx.end_stride;
        }

        if let Some(b) = &best {
            log::trace!(
                "Start {}: best end {} (J={:.6})",
                s,
                b.end,
                b.scores.composite
            );
        }
        best
    }
}
