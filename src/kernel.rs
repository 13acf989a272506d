//! Isotropic 2D Gaussian stencils and the zero-sum detection transform.
//!
//! Conventions:
//! - `radius = ceil(4 * sigma)`, minimum 1; side = `2 * radius + 1`. The
//!   truncated tail mass at four standard deviations is below 1e-4.
//! - A standard kernel is normalized such that its weights sum to 1.
//! - A detection kernel sums to 0: every weight is negated and the centre
//!   weight is replaced by the summed magnitude of the off-centre weights.
//!   Convolving with it measures local contrast instead of smoothing.

/// Square convolution stencil with odd side length.
#[derive(Clone, Debug)]
pub struct Kernel2D {
    side: usize,
    data: Vec<f32>,
}

/// Reasons why kernel construction may fail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KernelError {
    NonPositiveSigma { sigma: f32 },
    Degenerate { side: usize },
}

impl std::fmt::Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NonPositiveSigma { sigma } => {
                write!(f, "kernel sigma must be positive and finite, got {sigma}")
            }
            KernelError::Degenerate { side } => {
                write!(
                    f,
                    "{side}×{side} kernel has no neighbourhood to contrast against"
                )
            }
        }
    }
}

impl std::error::Error for KernelError {}

impl Kernel2D {
    /// Wrap an existing weight grid. `side` must be odd and match the
    /// buffer length.
    pub fn from_vec(side: usize, data: Vec<f32>) -> Self {
        assert!(side % 2 == 1, "kernel side must be odd");
        assert_eq!(data.len(), side * side, "buffer length must equal side^2");
        Self { side, data }
    }

    /// Build a normalized isotropic Gaussian stencil of the given spread
    /// (standard deviation in pixel units).
    pub fn gaussian(sigma: f32) -> Result<Self, KernelError> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(KernelError::NonPositiveSigma { sigma });
        }
        let radius = ((4.0 * sigma).ceil() as usize).max(1);
        let side = 2 * radius + 1;
        let inv_two_sigma2 = 1.0 / (2.0 * sigma * sigma);

        let mut data = vec![0.0f32; side * side];
        let mut total = 0.0f32;
        for ky in 0..side {
            let dy = ky as isize - radius as isize;
            for kx in 0..side {
                let dx = kx as isize - radius as isize;
                let r2 = (dx * dx + dy * dy) as f32;
                let w = (-r2 * inv_two_sigma2).exp();
                data[ky * side + kx] = w;
                total += w;
            }
        }
        for w in &mut data {
            *w /= total;
        }
        Ok(Self { side, data })
    }

    /// Build the zero-sum detection stencil of the given spread.
    pub fn detection(sigma: f32) -> Result<Self, KernelError> {
        Self::gaussian(sigma)?.into_detection()
    }

    /// Convert a standard stencil into its detection form: negate every
    /// weight, then set the centre to the summed magnitude of the remaining
    /// (negative) weights so the whole grid sums to 0.
    pub fn into_detection(self) -> Result<Self, KernelError> {
        if self.side == 1 {
            // A lone centre weight would collapse to 0.
            return Err(KernelError::Degenerate { side: self.side });
        }
        let side = self.side;
        let center = self.center_index();
        let mut data: Vec<f32> = self.data.iter().map(|w| -w).collect();
        let off_center_mass: f32 = data
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != center)
            .map(|(_, w)| -w)
            .sum();
        data[center] = off_center_mass;
        Ok(Self { side, data })
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.side / 2
    }

    #[inline]
    pub fn get(&self, kx: usize, ky: usize) -> f32 {
        self.data[ky * self.side + kx]
    }

    #[inline]
    fn center_index(&self) -> usize {
        let r = self.radius();
        r * self.side + r
    }

    /// Weight of the centre cell.
    pub fn center_weight(&self) -> f32 {
        self.data[self.center_index()]
    }

    /// Total weight of the stencil.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_is_normalized_with_peak_at_center() {
        let k = Kernel2D::gaussian(1.3).expect("valid sigma");
        assert!((k.sum() - 1.0).abs() < 1e-5);
        let peak = k.center_weight();
        for ky in 0..k.side() {
            for kx in 0..k.side() {
                assert!(k.get(kx, ky) <= peak);
                assert!(k.get(kx, ky) > 0.0);
            }
        }
    }

    #[test]
    fn radius_covers_four_sigma() {
        let k = Kernel2D::gaussian(2.5).expect("valid sigma");
        assert_eq!(k.radius(), 10);
        assert_eq!(k.side(), 21);
    }

    #[test]
    fn detection_kernel_sums_to_zero() {
        for sigma in [0.3, 1.0, 2.7] {
            let k = Kernel2D::detection(sigma).expect("valid sigma");
            assert!(
                k.sum().abs() < 1e-5,
                "sigma={sigma}: detection kernel sum {} not ~0",
                k.sum()
            );
            assert!(k.center_weight() > 0.0);
            let c = k.side() / 2;
            for ky in 0..k.side() {
                for kx in 0..k.side() {
                    if (kx, ky) != (c, c) {
                        assert!(k.get(kx, ky) < 0.0, "off-centre weight must be negative");
                    }
                }
            }
        }
    }

    #[test]
    fn non_positive_sigma_is_rejected() {
        assert!(matches!(
            Kernel2D::gaussian(0.0),
            Err(KernelError::NonPositiveSigma { .. })
        ));
        assert!(Kernel2D::gaussian(-1.5).is_err());
        assert!(Kernel2D::gaussian(f32::NAN).is_err());
    }

    #[test]
    fn single_cell_kernel_cannot_become_detection() {
        let k = Kernel2D::from_vec(1, vec![1.0]);
        assert!(matches!(
            k.into_detection(),
            Err(KernelError::Degenerate { side: 1 })
        ));
    }
}
