//! Parameter types configuring the despike pipeline.
//!
//! Both spreads are standard deviations in pixel units; in practice they
//! are chosen as multiples of the instrument beam width. The threshold is
//! expressed in the map's physical units (e.g. km/s for a velocity slice).
use super::SmoothError;
use serde::Deserialize;

/// Pipeline-wide parameters.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SmoothParams {
    /// Spread of the zero-sum detection stencil (pixels).
    pub mask_sigma: f32,
    /// Spread of the Gaussian used to fill blanked pixels (pixels).
    pub fill_sigma: f32,
    /// Absolute deviation at which a pixel is flagged (map units).
    pub threshold: f32,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            mask_sigma: 1.0,
            fill_sigma: 2.0,
            threshold: 100.0,
        }
    }
}

impl SmoothParams {
    /// Derive both spreads from a beam width, keeping the default
    /// threshold. `mask_scale` and `fill_scale` are the caller's chosen
    /// multipliers.
    pub fn from_beam(beam_sigma_px: f32, mask_scale: f32, fill_scale: f32) -> Self {
        Self {
            mask_sigma: mask_scale * beam_sigma_px,
            fill_sigma: fill_scale * beam_sigma_px,
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), SmoothError> {
        for (name, value) in [
            ("mask_sigma", self.mask_sigma),
            ("fill_sigma", self.fill_sigma),
            ("threshold", self.threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SmoothError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}
