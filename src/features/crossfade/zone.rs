//! Equal-power blending between adjacent sample zones
//!
//! Adjacent zones (key, velocity or articulation layers) are blended frame by
//! frame. The frames are expected to be time-aligned and already resampled to
//! the same pitch; this module removes DC, optionally matches loudness, and
//! applies an equal-power ramp.

use super::curves::{equal_power_scalar, smoothstep};
use crate::config::DcMode;
use crate::error::StitchError;
use crate::preprocessing::normalization::{match_loudness, remove_dc_in_place};

/// Frame blender for adjacent zones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneCrossfader {
    /// Scale frame B to the RMS of frame A before blending (default: true)
    pub match_loudness: bool,
    /// DC handling applied to both frames (default: PerWindow)
    pub dc_mode: DcMode,
}

impl Default for ZoneCrossfader {
    fn default() -> Self {
        Self {
            match_loudness: true,
            dc_mode: DcMode::PerWindow,
        }
    }
}

impl ZoneCrossfader {
    /// Create a crossfader with per-window DC removal
    pub fn new(match_loudness: bool) -> Self {
        Self {
            match_loudness,
            ..Self::default()
        }
    }

    /// Blend frame `a` into frame `b` at ramp position `t`
    ///
    /// # Arguments
    ///
    /// * `a` - Frame from the outgoing zone
    /// * `b` - Frame from the incoming zone, same length as `a`
    /// * `t` - Ramp position in `[0, 1]` (clamped), 0 = all A, 1 = all B
    ///
    /// # Errors
    ///
    /// Returns `StitchError::InvalidInput` if the frames differ in length
    pub fn crossfade_frame(&self, a: &[f32], b: &[f32], t: f32) -> Result<Vec<f32>, StitchError> {
        if a.len() != b.len() {
            return Err(StitchError::InvalidInput(format!(
                "Zone frames differ in length: {} vs {}",
                a.len(),
                b.len()
            )));
        }

        let mut a = a.to_vec();
        let mut b = b.to_vec();
        if self.dc_mode == DcMode::PerWindow {
            remove_dc_in_place(&mut a);
            remove_dc_in_place(&mut b);
        }
        if self.match_loudness {
            match_loudness(&a, &mut b);
        }

        let (ga, gb) = equal_power_scalar(t);
        Ok(a.iter().zip(b.iter()).map(|(&x, &y)| ga * x + gb * y).collect())
    }

    /// Ramp position for pitch `p` between zone centers `pa` and `pb` (semitones)
    ///
    /// # Errors
    ///
    /// Returns `StitchError::InvalidInput` if the centers coincide
    pub fn t_for_pitch(p: f32, pa: f32, pb: f32) -> Result<f32, StitchError> {
        axis_position(p, pa, pb, "pitch")
    }

    /// Ramp position for velocity `v` between layer velocities `va` and `vb` (0..1)
    ///
    /// # Errors
    ///
    /// Returns `StitchError::InvalidInput` if the layer velocities coincide
    pub fn t_for_velocity(v: f32, va: f32, vb: f32) -> Result<f32, StitchError> {
        axis_position(v, va, vb, "velocity")
    }
}

fn axis_position(x: f32, xa: f32, xb: f32, axis: &str) -> Result<f32, StitchError> {
    let span = xb - xa;
    if span == 0.0 || !span.is_finite() {
        return Err(StitchError::InvalidInput(format!(
            "Zone {} centers must differ, got {} and {}",
            axis, xa, xb
        )));
    }
    Ok(smoothstep((x - xa) / span))
}
