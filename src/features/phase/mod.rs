//! Phase alignment
//!
//! Integer circular-shift alignment of two windows under an L1 metric.

pub mod align;
