//! Structured reports describing each despike stage.
//!
//! `SmoothReport` is the entry point returned by
//! [`Smoother::process_with_diagnostics`], bundling the despiked field with
//! a `PipelineTrace` describing every stage the pipeline executed. The
//! trace serializes to JSON for offline inspection; it never feeds back
//! into the pipeline.
//!
//! [`Smoother::process_with_diagnostics`]: crate::smooth::Smoother::process_with_diagnostics
use crate::field::ScalarField;
use crate::kernel::Kernel2D;
use serde::Serialize;
use std::time::Instant;

/// Dimensions and footprint of the input field.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub defined_px: usize,
    pub undefined_px: usize,
}

impl InputDescriptor {
    pub fn from_field(field: &ScalarField) -> Self {
        let defined_px = field.count_defined();
        Self {
            width: field.w,
            height: field.h,
            defined_px,
            undefined_px: field.w * field.h - defined_px,
        }
    }
}

/// Shape summary of a constructed stencil.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelStage {
    pub sigma: f32,
    pub side: usize,
    pub weight_sum: f32,
    pub center_weight: f32,
}

impl KernelStage {
    pub fn from_kernel(sigma: f32, kernel: &Kernel2D) -> Self {
        Self {
            sigma,
            side: kernel.side(),
            weight_sum: kernel.sum(),
            center_weight: kernel.center_weight(),
        }
    }
}

/// Value range of the deviation map (finite samples only).
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationStage {
    pub min: f32,
    pub max: f32,
    pub mean_abs: f32,
}

impl DeviationStage {
    pub fn from_field(deviation: &ScalarField) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut abs_sum = 0.0f64;
        let mut n = 0usize;
        for &v in &deviation.data {
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
                abs_sum += v.abs() as f64;
                n += 1;
            }
        }
        if n == 0 {
            return Self::default();
        }
        Self {
            min,
            max,
            mean_abs: (abs_sum / n as f64) as f32,
        }
    }
}

/// Outcome of thresholding the deviation map.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskStage {
    pub threshold: f32,
    pub flagged: usize,
    pub flagged_fraction: f32,
}

/// Outcome of the gap-filling convolution.
#[derive(Clone, Copy, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillStage {
    /// Flagged pixels that came back with a finite value.
    pub refilled: usize,
}

/// Timing entry for a single pipeline stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub stage: &'static str,
    pub elapsed_ms: f64,
}

/// Aggregated timing trace for the run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    /// Record the time elapsed since `start` under `stage`.
    pub fn record(&mut self, stage: &'static str, start: Instant) {
        self.stages.push(StageTiming {
            stage,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        });
    }
}

/// Full trace of a despike run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub detection_kernel: KernelStage,
    pub deviation: DeviationStage,
    pub mask: MaskStage,
    pub fill_kernel: KernelStage,
    pub fill: FillStage,
    pub timing: TimingBreakdown,
}

/// Despiked field plus the stage trace that produced it.
#[derive(Clone, Debug, Serialize)]
pub struct SmoothReport {
    #[serde(skip)]
    pub field: ScalarField,
    pub trace: PipelineTrace,
}
