//! Crossfade curves and zone blending
//!
//! - Gain curves (equal-power, Hann, smoothstep)
//! - Equal-power frame blending between adjacent zones

pub mod curves;
pub mod zone;

pub use curves::CrossfadeCurve;
