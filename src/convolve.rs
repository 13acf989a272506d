//! NaN-aware 2D convolution over scalar fields.
//!
//! - Output has the same shape as the input; out-of-bounds window samples
//!   are treated as undefined.
//! - `undefined_fill == true`: undefined samples are excluded from each
//!   local weighted sum and stand in with the magnitude-weighted mean of
//!   the defined samples under the window. A zero-sum stencil therefore
//!   stays ~0 on locally constant data near gaps and borders, and a
//!   normalized stencil degrades to the weighted mean of whatever data is
//!   present (the gap-filling behaviour). A window with no defined samples
//!   yields NaN.
//! - `undefined_fill == false`: any undefined sample under the window
//!   propagates NaN to the output.
//! - `normalize == true` rescales the stencil to unit total weight; it
//!   requires a stencil with nonzero sum.
//!
//! Complexity: O(W·H·side²); each output row is independent, so the row
//! loop runs on rayon when the `parallel` feature is enabled.
use crate::field::ScalarField;
use crate::kernel::Kernel2D;

/// Convolve `field` with `kernel`. See the module docs for the boundary
/// and undefined-sample policies.
pub fn convolve(
    field: &ScalarField,
    kernel: &Kernel2D,
    normalize: bool,
    undefined_fill: bool,
) -> ScalarField {
    let kernel_sum = kernel.sum();
    assert!(
        !normalize || kernel_sum.abs() > f32::EPSILON,
        "normalizing convolution requires a stencil with nonzero weight sum"
    );
    let mut out = ScalarField::new(field.w, field.h);
    if field.w == 0 || field.h == 0 {
        return out;
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        let w = field.stride;
        out.data
            .par_chunks_mut(w)
            .enumerate()
            .for_each(|(y, out_row)| {
                convolve_row(field, kernel, kernel_sum, normalize, undefined_fill, y, out_row);
            });
    }
    #[cfg(not(feature = "parallel"))]
    for y in 0..field.h {
        let start = y * out.stride;
        let end = start + out.w;
        convolve_row(
            field,
            kernel,
            kernel_sum,
            normalize,
            undefined_fill,
            y,
            &mut out.data[start..end],
        );
    }

    out
}

fn convolve_row(
    field: &ScalarField,
    kernel: &Kernel2D,
    kernel_sum: f32,
    normalize: bool,
    undefined_fill: bool,
    y: usize,
    out_row: &mut [f32],
) {
    let side = kernel.side();
    let radius = kernel.radius() as isize;
    let h = field.h as isize;
    let w = field.w as isize;

    for (x, out_px) in out_row.iter_mut().enumerate() {
        let mut sum_wv = 0.0f32;
        let mut sum_w = 0.0f32;
        let mut sum_av = 0.0f32;
        let mut sum_a = 0.0f32;
        let mut fully_defined = true;

        for ky in 0..side {
            let sy = y as isize + ky as isize - radius;
            if sy < 0 || sy >= h {
                fully_defined = false;
                continue;
            }
            let src_row = field.row(sy as usize);
            for kx in 0..side {
                let sx = x as isize + kx as isize - radius;
                if sx < 0 || sx >= w {
                    fully_defined = false;
                    continue;
                }
                let v = src_row[sx as usize];
                if !v.is_finite() {
                    fully_defined = false;
                    continue;
                }
                let weight = kernel.get(kx, ky);
                sum_wv += weight * v;
                sum_w += weight;
                sum_av += weight.abs() * v;
                sum_a += weight.abs();
            }
        }

        *out_px = if fully_defined {
            if normalize {
                sum_wv / kernel_sum
            } else {
                sum_wv
            }
        } else if !undefined_fill || sum_a == 0.0 {
            f32::NAN
        } else {
            // Missing samples stand in with the local magnitude-weighted
            // mean, so the excluded weight mass does not skew the result.
            let local_mean = sum_av / sum_a;
            let raw = sum_wv + local_mean * (kernel_sum - sum_w);
            if normalize {
                raw / kernel_sum
            } else {
                raw
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_stencil_vanishes_on_constant_field() {
        let field = ScalarField::filled(9, 7, 50.0);
        let kernel = Kernel2D::detection(1.0).expect("valid sigma");
        let dev = convolve(&field, &kernel, false, true);
        for y in 0..dev.h {
            for x in 0..dev.w {
                assert!(
                    dev.get(x, y).abs() < 1e-2,
                    "deviation at ({x}, {y}) is {}",
                    dev.get(x, y)
                );
            }
        }
    }

    #[test]
    fn normalized_fill_replaces_gap_with_neighbour_mean() {
        let mut field = ScalarField::filled(7, 7, 12.5);
        field.set(3, 3, f32::NAN);
        let kernel = Kernel2D::gaussian(1.0).expect("valid sigma");
        let filled = convolve(&field, &kernel, true, true);
        assert!((filled.get(3, 3) - 12.5).abs() < 1e-3);
        assert!((filled.get(0, 0) - 12.5).abs() < 1e-3);
    }

    #[test]
    fn undefined_samples_propagate_without_fill_policy() {
        let mut field = ScalarField::filled(9, 9, 1.0);
        field.set(4, 4, f32::NAN);
        let kernel = Kernel2D::gaussian(0.5).expect("valid sigma");
        let out = convolve(&field, &kernel, true, false);
        assert!(out.get(4, 4).is_nan());
        assert!(out.get(3, 4).is_nan(), "gap must spread to the window");
        assert!(out.get(0, 0).is_nan(), "border windows reach out of bounds");
    }

    #[test]
    fn fully_undefined_window_yields_nan() {
        let field = ScalarField::filled(5, 5, f32::NAN);
        let kernel = Kernel2D::gaussian(1.0).expect("valid sigma");
        let out = convolve(&field, &kernel, true, true);
        assert!(out.data.iter().all(|v| v.is_nan()));
    }
}
