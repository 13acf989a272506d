//! Despike pipeline: deviation masking followed by Gaussian gap filling.

pub mod outliers;
pub mod params;
pub mod pipeline;

pub use outliers::{blank_flagged, flag_outliers, OutlierDiagnostics};
pub use params::SmoothParams;
pub use pipeline::{smooth, Smoother};

use crate::kernel::KernelError;

/// Reasons why a despike run may be rejected.
///
/// All variants are detected before any pixel is computed; there is no
/// partial output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SmoothError {
    /// A spread or threshold value is non-positive or non-finite.
    InvalidParameter { name: &'static str, value: f32 },
    /// Validity mask shape disagrees with the field shape.
    ShapeMismatch {
        field: (usize, usize),
        mask: (usize, usize),
    },
    /// Kernel construction failed.
    Kernel(KernelError),
}

impl std::fmt::Display for SmoothError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmoothError::InvalidParameter { name, value } => {
                write!(f, "{name} must be positive and finite, got {value}")
            }
            SmoothError::ShapeMismatch { field, mask } => write!(
                f,
                "validity mask is {}x{} but field is {}x{}",
                mask.0, mask.1, field.0, field.1
            ),
            SmoothError::Kernel(err) => write!(f, "kernel construction failed: {err}"),
        }
    }
}

impl std::error::Error for SmoothError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SmoothError::Kernel(err) => Some(err),
            _ => None,
        }
    }
}

impl From<KernelError> for SmoothError {
    fn from(err: KernelError) -> Self {
        SmoothError::Kernel(err)
    }
}
