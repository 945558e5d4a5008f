//! Spectral analysis
//!
//! - Log-magnitude spectral distance (loop candidate scoring)
//! - Spectral shape statistics (sample summaries)

pub mod distance;
pub mod stats;

pub use distance::SpectralDistance;
