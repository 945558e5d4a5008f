//! Configuration parameters for loop stitching

use crate::error::StitchError;
use serde::{Deserialize, Serialize};

/// DC handling applied to the head and tail windows before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DcMode {
    /// Compare windows as recorded
    None,
    /// Subtract each window's own mean independently
    PerWindow,
}

/// Weights of the composite loop score `J`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of the amplitude (L2) mismatch
    pub amplitude: f32,
    /// Weight of the first-difference (slope) mismatch
    pub slope: f32,
    /// Weight of the log-magnitude spectral distance
    pub spectral: f32,
}

impl ScoreWeights {
    /// Create a weight triple
    pub fn new(amplitude: f32, slope: f32, spectral: f32) -> Self {
        Self {
            amplitude,
            slope,
            spectral,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            amplitude: 1.0,
            slope: 0.5,
            spectral: 0.3,
        }
    }
}

/// Loop stitching configuration parameters
#[derive(Debug, Clone)]
pub struct StitchConfig {
    /// Seam length `L` in samples (default: 1024)
    /// Should span 2-3 periods of the lowest relevant partial of the source
    pub overlap: usize,

    /// Composite score weights (default: amplitude 1.0, slope 0.5, spectral 0.3)
    pub weights: ScoreWeights,

    /// DC removal mode for compared windows (default: PerWindow)
    pub dc_mode: DcMode,

    /// FFT size for spectral distance, a power of two (default: 1024)
    pub fft_size: usize,

    /// Log-magnitude floor in dB for spectral distance (default: -60.0)
    pub log_floor_db: f32,

    /// Largest circular shift tried by fine phase alignment (default: 8)
    pub phase_max_shift: usize,

    /// Score loop starts on the rayon thread pool (default: true)
    #[cfg(feature = "parallel")]
    pub parallel: bool,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            overlap: 1024,
            weights: ScoreWeights::default(),
            dc_mode: DcMode::PerWindow,
            fft_size: 1024,
            log_floor_db: -60.0,
            phase_max_shift: 8,
            #[cfg(feature = "parallel")]
            parallel: true,
        }
    }
}

impl StitchConfig {
    /// Default configuration with a different seam length
    pub fn with_overlap(overlap: usize) -> Self {
        Self {
            overlap,
            ..Self::default()
        }
    }

    /// Check that every parameter is usable by the stitcher
    pub fn validate(&self) -> Result<(), StitchError> {
        if self.overlap < 2 {
            return Err(StitchError::InvalidConfig(format!(
                "overlap must be >= 2, got {}",
                self.overlap
            )));
        }

        // The search needs 4 * overlap samples of range
        if self.overlap.checked_mul(4).is_none() {
            return Err(StitchError::InvalidConfig(format!(
                "overlap too large: {}",
                self.overlap
            )));
        }

        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(StitchError::InvalidConfig(format!(
                "fft_size must be a power of two >= 2, got {}",
                self.fft_size
            )));
        }

        let w = self.weights;
        for (name, value) in [
            ("amplitude", w.amplitude),
            ("slope", w.slope),
            ("spectral", w.spectral),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(StitchError::InvalidConfig(format!(
                    "{} weight must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        if !self.log_floor_db.is_finite() {
            return Err(StitchError::InvalidConfig(
                "log_floor_db must be finite".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = StitchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.overlap, 1024);
        assert_eq!(config.weights, ScoreWeights::new(1.0, 0.5, 0.3));
        assert_eq!(config.dc_mode, DcMode::PerWindow);
        assert_eq!(config.phase_max_shift, 8);
    }

    #[test]
    fn test_rejects_tiny_overlap() {
        let config = StitchConfig::with_overlap(1);
        assert!(matches!(
            config.validate(),
            Err(StitchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_overflowing_overlap() {
        let config = StitchConfig {
            fft_size: 64,
            ..StitchConfig::with_overlap(usize::MAX / 4 + 1)
        };
        assert!(matches!(
            config.validate(),
            Err(StitchError::InvalidConfig(_))
        ));

        let config = StitchConfig {
            fft_size: 64,
            ..StitchConfig::with_overlap(usize::MAX / 4)
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_power_of_two_fft() {
        let config = StitchConfig {
            fft_size: 1000,
            ..StitchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_weight() {
        let config = StitchConfig {
            weights: ScoreWeights::new(1.0, -0.5, 0.3),
            ..StitchConfig::default()
        };
        assert!(config.validate().is_err());

        let config = StitchConfig {
            weights: ScoreWeights::new(f32::NAN, 0.5, 0.3),
            ..StitchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dc_mode_serializes_camel_case() {
        let json = serde_json::to_string(&DcMode::PerWindow).unwrap();
        assert_eq!(json, "\"perWindow\"");
    }
}
