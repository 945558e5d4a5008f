//! Error types for the loop stitching engine

use std::fmt;

/// Errors that can occur while searching for or writing a loop seam
///
/// The two search outcomes (`SearchWindowTooSmall`, `NoCandidateFound`) are
/// expected, recoverable results: the caller's buffer is never modified when
/// either is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StitchError {
    /// The search range is narrower than four overlaps
    SearchWindowTooSmall {
        /// Width of the requested search range in samples
        width: usize,
        /// Minimum width required (`4 * overlap`)
        required: usize,
    },

    /// The search range produced no valid `(start, end)` pair
    NoCandidateFound,

    /// Configuration rejected by validation
    InvalidConfig(String),

    /// Invalid input parameters
    InvalidInput(String),
}

impl fmt::Display for StitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StitchError::SearchWindowTooSmall { width, required } => write!(
                f,
                "Search window too small: {} samples, at least {} required",
                width, required
            ),
            StitchError::NoCandidateFound => write!(f, "No loop candidate found in search range"),
            StitchError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            StitchError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for StitchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = StitchError::SearchWindowTooSmall {
            width: 100,
            required: 4096,
        };
        assert_eq!(
            err.to_string(),
            "Search window too small: 100 samples, at least 4096 required"
        );
        assert_eq!(
            StitchError::InvalidConfig("overlap must be >= 2".to_string()).to_string(),
            "Invalid configuration: overlap must be >= 2"
        );
    }
}
