//! Signal preparation utilities
//!
//! This module contains helpers applied to windows before they are compared
//! or blended:
//! - DC removal, RMS, peak and loudness matching
//! - Parameter slew limiting

pub mod normalization;
pub mod smoothing;
