//! Despike pipeline orchestrating the mask-then-fill process.
//!
//! The [`Smoother`] exposes a simple API: feed a velocity slice plus its
//! validity mask and get the despiked field back. Internally it runs a
//! strict left-to-right pipeline: detection stencil → deviation map →
//! suspect mask → blank → Gaussian fill → footprint restoration. There is
//! no feedback loop and no state between invocations, so re-running with
//! identical inputs reproduces the output bit for bit.
//!
//! Typical usage:
//! ```no_run
//! use despike::field::ScalarField;
//! use despike::smooth::{SmoothParams, Smoother};
//!
//! # fn example(field: ScalarField) {
//! let mask = field.validity_mask();
//! let smoother = Smoother::new(SmoothParams::default());
//! match smoother.process(&field, &mask) {
//!     Ok(out) => println!("despiked {}x{} field", out.w, out.h),
//!     Err(err) => eprintln!("despike failed: {err}"),
//! }
//! # }
//! ```
use super::outliers::{blank_flagged, flag_outliers};
use super::{SmoothError, SmoothParams};
use crate::convolve::convolve;
use crate::diagnostics::{
    DeviationStage, FillStage, InputDescriptor, KernelStage, MaskStage, PipelineTrace,
    SmoothReport, TimingBreakdown,
};
use crate::field::{FieldMask, ScalarField};
use crate::kernel::Kernel2D;
use log::debug;
use std::time::Instant;

/// Despike driver holding the pipeline parameters.
#[derive(Clone, Debug, Default)]
pub struct Smoother {
    params: SmoothParams,
}

impl Smoother {
    /// Create a smoother with the supplied parameters.
    pub fn new(params: SmoothParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SmoothParams {
        &self.params
    }

    /// Update the detection stencil spread.
    pub fn set_mask_sigma(&mut self, sigma: f32) {
        self.params.mask_sigma = sigma;
    }

    /// Update the fill stencil spread.
    pub fn set_fill_sigma(&mut self, sigma: f32) {
        self.params.fill_sigma = sigma;
    }

    /// Update the flagging threshold (map units).
    pub fn set_threshold(&mut self, threshold: f32) {
        self.params.threshold = threshold;
    }

    /// Run the pipeline and return the despiked field.
    pub fn process(
        &self,
        field: &ScalarField,
        validity: &FieldMask,
    ) -> Result<ScalarField, SmoothError> {
        self.process_with_diagnostics(field, validity)
            .map(|report| report.field)
    }

    /// Run the pipeline and capture per-stage diagnostics.
    pub fn process_with_diagnostics(
        &self,
        field: &ScalarField,
        validity: &FieldMask,
    ) -> Result<SmoothReport, SmoothError> {
        self.params.validate()?;
        if (validity.w, validity.h) != (field.w, field.h) {
            return Err(SmoothError::ShapeMismatch {
                field: (field.w, field.h),
                mask: (validity.w, validity.h),
            });
        }

        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();

        let stage_start = Instant::now();
        let detection = Kernel2D::detection(self.params.mask_sigma)?;
        let fill_kernel = Kernel2D::gaussian(self.params.fill_sigma)?;
        timing.record("kernels", stage_start);
        debug!(
            "Smoother::process detection side={} fill side={}",
            detection.side(),
            fill_kernel.side()
        );

        let stage_start = Instant::now();
        let deviation = convolve(field, &detection, false, true);
        timing.record("deviation", stage_start);

        let stage_start = Instant::now();
        let (suspect, outlier_diag) = flag_outliers(&deviation, self.params.threshold);
        let working = blank_flagged(field, &suspect);
        timing.record("mask", stage_start);
        debug!(
            "Smoother::process flagged {}/{} pixels ({:.2}%)",
            outlier_diag.flagged,
            outlier_diag.total,
            outlier_diag.flagged_fraction() * 100.0
        );

        let stage_start = Instant::now();
        let mut final_field = convolve(&working, &fill_kernel, true, true);
        timing.record("fill", stage_start);

        // Re-impose the observed footprint: whatever the fill computed
        // outside it is discarded.
        let stage_start = Instant::now();
        let refilled = restore_footprint(&mut final_field, validity, &suspect);
        timing.record("restore", stage_start);
        debug!("Smoother::process refilled {refilled} flagged pixels");

        timing.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;

        let trace = PipelineTrace {
            input: InputDescriptor::from_field(field),
            detection_kernel: KernelStage::from_kernel(self.params.mask_sigma, &detection),
            deviation: DeviationStage::from_field(&deviation),
            mask: MaskStage {
                threshold: outlier_diag.threshold,
                flagged: outlier_diag.flagged,
                flagged_fraction: outlier_diag.flagged_fraction(),
            },
            fill_kernel: KernelStage::from_kernel(self.params.fill_sigma, &fill_kernel),
            fill: FillStage { refilled },
            timing,
        };

        Ok(SmoothReport {
            field: final_field,
            trace,
        })
    }
}

/// Blank every pixel outside the validity footprint and count how many
/// flagged pixels ended up with a finite fill value.
fn restore_footprint(field: &mut ScalarField, validity: &FieldMask, suspect: &FieldMask) -> usize {
    let mut refilled = 0usize;
    for i in 0..field.data.len() {
        if !validity.data[i] {
            field.data[i] = f32::NAN;
        } else if suspect.data[i] && field.data[i].is_finite() {
            refilled += 1;
        }
    }
    refilled
}

/// Run the full pipeline as a single call.
///
/// Convenience wrapper over [`Smoother`] matching the despike function
/// surface: field, validity mask, both spreads, and the flagging
/// threshold.
pub fn smooth(
    field: &ScalarField,
    validity: &FieldMask,
    mask_sigma: f32,
    fill_sigma: f32,
    threshold: f32,
) -> Result<ScalarField, SmoothError> {
    Smoother::new(SmoothParams {
        mask_sigma,
        fill_sigma,
        threshold,
    })
    .process(field, validity)
}
