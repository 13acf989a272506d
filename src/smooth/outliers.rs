//! Deviation thresholding that turns the contrast map into a pixel mask.
//!
//! A pixel is flagged when the magnitude of its local deviation reaches
//! the threshold. An undefined deviation sample (no defined neighbourhood)
//! carries no evidence either way and is left unflagged; the validity-mask
//! restoration at the end of the pipeline governs those pixels.
use crate::field::{FieldMask, ScalarField};

/// Counters emitted by the thresholding stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutlierDiagnostics {
    pub total: usize,
    pub flagged: usize,
    pub threshold: f32,
}

impl OutlierDiagnostics {
    pub fn flagged_fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.flagged as f32 / self.total as f32
        }
    }
}

/// Threshold the deviation map into a suspect mask.
pub fn flag_outliers(deviation: &ScalarField, threshold: f32) -> (FieldMask, OutlierDiagnostics) {
    let mut mask = FieldMask::filled(deviation.w, deviation.h, false);
    let mut flagged = 0usize;
    for (out, &dev) in mask.data.iter_mut().zip(&deviation.data) {
        if dev.is_finite() && dev.abs() >= threshold {
            *out = true;
            flagged += 1;
        }
    }
    let diag = OutlierDiagnostics {
        total: deviation.w * deviation.h,
        flagged,
        threshold,
    };
    (mask, diag)
}

/// Copy `field` with every flagged pixel blanked to NaN.
pub fn blank_flagged(field: &ScalarField, suspect: &FieldMask) -> ScalarField {
    let mut working = field.clone();
    for (v, &bad) in working.data.iter_mut().zip(&suspect.data) {
        if bad {
            *v = f32::NAN;
        }
    }
    working
}
