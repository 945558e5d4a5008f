//! Loop search result types

use crate::config::ScoreWeights;
use crate::features::crossfade::CrossfadeCurve;
use serde::{Deserialize, Serialize};

/// Sub-scores of a loop candidate (lower is better)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopScores {
    /// `sqrt(Σ(head-tail)²) / L`
    pub amplitude: f32,

    /// Mean absolute first-difference mismatch
    pub slope: f32,

    /// Log-magnitude spectral distance between head and tail
    pub spectral: f32,

    /// Weighted composite `J`
    ///
    /// Only meaningful for ranking candidates of the same search; there is no
    /// absolute quality scale.
    pub composite: f32,
}

impl LoopScores {
    /// Combine sub-scores with the given weights
    pub fn new(amplitude: f32, slope: f32, spectral: f32, weights: &ScoreWeights) -> Self {
        Self {
            amplitude,
            slope,
            spectral,
            composite: weights.amplitude * amplitude
                + weights.slope * slope
                + weights.spectral * spectral,
        }
    }
}

/// Winning `(start, end)` pair of a loop search
///
/// Head window is `[start, start + L)`, tail window is `[end - L, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopCandidate {
    /// Loop start sample (inclusive)
    pub start: usize,
    /// Loop end sample (exclusive); playback jumps from here back to `start`
    pub end: usize,
    /// Scores of this candidate
    pub scores: LoopScores,
}

/// A loop whose seam has been written into the buffer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopMatch {
    /// Loop start sample (inclusive)
    pub start: usize,
    /// Loop end sample (exclusive)
    pub end: usize,
    /// Seam length `L` written at `[start, start + L)`
    pub overlap: usize,
    /// Crossfade curve used for the seam
    pub curve: CrossfadeCurve,
    /// Circular shift applied to the tail window by phase alignment
    pub shift: isize,
    /// Scores of the winning candidate from the search
    pub scores: LoopScores,
}

impl LoopMatch {
    /// Loop length in samples
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the loop has zero length (never produced by the stitcher)
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Record handed to the sampler pack persistence layer
    pub fn record(&self) -> LoopRecord {
        LoopRecord::from(self)
    }
}

/// Loop entry of a sample zone in a sampler pack: `{start, end, overlap, window}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopRecord {
    /// Loop start sample
    pub start: usize,
    /// Loop end sample
    pub end: usize,
    /// Seam length in samples
    pub overlap: usize,
    /// Seam crossfade curve
    pub window: CrossfadeCurve,
}

impl From<&LoopMatch> for LoopRecord {
    fn from(m: &LoopMatch) -> Self {
        Self {
            start: m.start,
            end: m.end,
            overlap: m.overlap,
            window: m.curve,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_uses_weights() {
        let scores = LoopScores::new(0.2, 0.4, 10.0, &ScoreWeights::default());
        assert!((scores.composite - (0.2 + 0.2 + 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_loop_record_json_shape() {
        let m = LoopMatch {
            start: 1000,
            end: 8000,
            overlap: 512,
            curve: CrossfadeCurve::EqualPower,
            shift: -2,
            scores: LoopScores::new(0.0, 0.0, 0.0, &ScoreWeights::default()),
        };
        assert_eq!(m.len(), 7000);
        let json = serde_json::to_value(m.record()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "start": 1000,
                "end": 8000,
                "overlap": 512,
                "window": "equalPower"
            })
        );
    }
}
