//! # loopseam
//!
//! Loop-point discovery and seam synthesis for sample-based instruments.
//! Given a sustained recording, finds a `(start, end)` pair where playback can
//! jump from `end` back to `start` without an audible click, and writes a
//! crossfaded seam at the loop start.
//!
//! ## Features
//!
//! - **Loop search**: exhaustive scan scored on amplitude, slope and
//!   log-magnitude spectral mismatch, parallel across loop starts (feature
//!   `parallel`)
//! - **Seam synthesis**: phase-aligned crossfade with equal-power, smoothstep
//!   or Hann curves
//! - **Zone crossfading**: blending of pitch-matched frames between adjacent
//!   velocity or pitch zones
//! - **Sample introspection**: level, clipping and spectral-shape summary
//!
//! ## Quick Start
//!
//! ```no_run
//! use loopseam::{stitch_loop_in_place, CrossfadeCurve, StitchConfig};
//!
//! // Mono f32 samples of a sustained note
//! let mut samples: Vec<f32> = vec![]; // Your audio data
//!
//! let found = stitch_loop_in_place(
//!     &mut samples,
//!     2000,
//!     46000,
//!     CrossfadeCurve::EqualPower,
//!     StitchConfig::default(),
//! )?;
//!
//! println!("Loop: {}..{} ({} samples)", found.start, found.end, found.len());
//! # Ok::<(), loopseam::StitchError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Buffer → Candidate search (DC removal, scoring) → Phase alignment → Seam crossfade → LoopRecord
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod preprocessing;

// Re-export main types
pub use analysis::loop_stitcher::LoopStitcher;
pub use analysis::result::{LoopCandidate, LoopMatch, LoopRecord, LoopScores};
pub use analysis::summary::{analyze_sample, SampleSummary, SummaryConfig};
pub use config::{DcMode, ScoreWeights, StitchConfig};
pub use error::StitchError;
pub use features::crossfade::zone::ZoneCrossfader;
pub use features::crossfade::CrossfadeCurve;
pub use features::spectral::SpectralDistance;
pub use preprocessing::smoothing::SlewLimiter;

/// Find the best loop in a buffer and write its crossfaded seam
///
/// Scans every `(start, end)` pair inside `[search_start, search_end)`, keeps
/// the one with the lowest composite score, phase-aligns the tail window onto
/// the head window and overwrites `[start, start + overlap)` with the seam.
///
/// # Arguments
///
/// * `buffer` - Mono samples, modified in place on success
/// * `search_start` - First sample of the search range
/// * `search_end` - One past the last sample of the search range
/// * `curve` - Seam crossfade curve
/// * `config` - Stitching configuration
///
/// # Returns
///
/// `LoopMatch` with the loop points, applied shift and candidate scores
///
/// # Errors
///
/// - `InvalidConfig` if `config` fails validation
/// - `SearchWindowTooSmall` if the range is narrower than `4 * overlap`
/// - `NoCandidateFound` if the range holds no valid candidate
///
/// The buffer is unchanged whenever an error is returned.
///
/// # Example
///
/// ```
/// use loopseam::{stitch_loop_in_place, CrossfadeCurve, StitchConfig};
///
/// let mut samples = vec![0.0f32; 100];
/// let result = stitch_loop_in_place(
///     &mut samples,
///     0,
///     100,
///     CrossfadeCurve::Hann,
///     StitchConfig::with_overlap(64),
/// );
/// assert!(result.is_err());
/// assert!(samples.iter().all(|&x| x == 0.0));
/// ```
pub fn stitch_loop_in_place(
    buffer: &mut [f32],
    search_start: usize,
    search_end: usize,
    curve: CrossfadeCurve,
    config: StitchConfig,
) -> Result<LoopMatch, StitchError> {
    LoopStitcher::new(config)?.stitch_loop_in_place(buffer, search_start, search_end, curve)
}

/// Find the best loop in a buffer without modifying it
///
/// # Errors
///
/// Same as [`stitch_loop_in_place`]
pub fn find_loop(
    buffer: &[f32],
    search_start: usize,
    search_end: usize,
    config: StitchConfig,
) -> Result<LoopCandidate, StitchError> {
    LoopStitcher::new(config)?.find_loop(buffer, search_start, search_end)
}
