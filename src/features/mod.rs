//! Feature extraction modules
//!
//! This module contains the signal primitives the loop stitcher is built on:
//! - Crossfade curves and zone blending
//! - Spectral distance and spectral statistics
//! - Circular phase alignment

pub mod crossfade;
pub mod phase;
pub mod spectral;
