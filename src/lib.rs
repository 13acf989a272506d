#![doc = include_str!("../README.md")]

pub mod config;
pub mod convolve;
pub mod diagnostics;
pub mod field;
pub mod kernel;
pub mod smooth;

// --- High-level re-exports -------------------------------------------------

// Main entry points: pipeline driver + field types.
pub use crate::field::{FieldMask, ScalarField};
pub use crate::smooth::{smooth, SmoothError, SmoothParams, Smoother};

// High-level diagnostics returned by the pipeline.
pub use crate::diagnostics::{PipelineTrace, SmoothReport};

// Building blocks that are generally useful on their own.
pub use crate::convolve::convolve;
pub use crate::kernel::{Kernel2D, KernelError};

/// Small prelude for quick experiments.
///
/// ```
/// use despike::prelude::*;
///
/// let mut field = ScalarField::filled(32, 32, 50.0);
/// field.set(16, 16, 500.0);
///
/// let mask = field.validity_mask();
/// let out = Smoother::new(SmoothParams::default())
///     .process(&field, &mask)
///     .unwrap();
/// assert!((out.get(16, 16) - 50.0).abs() < 1.0);
/// ```
pub mod prelude {
    pub use crate::field::{FieldMask, ScalarField};
    pub use crate::smooth::{smooth, SmoothParams, Smoother};
}
