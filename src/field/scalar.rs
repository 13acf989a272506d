//! Owned single-channel f32 field in row-major layout (stride == width).
//!
//! The sample value NaN marks pixels outside the observed footprint. All
//! pipeline stages operate on copies; a field handed to the pipeline is
//! never mutated.
use super::mask::FieldMask;

#[derive(Clone, Debug)]
pub struct ScalarField {
    /// Field width in pixels
    pub w: usize,
    /// Field height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ScalarField {
    /// Construct a zero-initialized field of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    /// Construct a field of size `w × h` holding `value` everywhere.
    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), w * h, "buffer length must equal w * h");
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    /// Get the sample value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }

    #[inline]
    /// Set the sample value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.data[start..end]
    }

    /// Derive the validity mask: true wherever the sample is finite.
    pub fn validity_mask(&self) -> FieldMask {
        let data = self.data.iter().map(|v| v.is_finite()).collect();
        FieldMask {
            w: self.w,
            h: self.h,
            stride: self.stride,
            data,
        }
    }

    /// Number of defined (finite) samples.
    pub fn count_defined(&self) -> usize {
        self.data.iter().filter(|v| v.is_finite()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_mask_tracks_nan_samples() {
        let mut field = ScalarField::filled(3, 2, 1.0);
        field.set(1, 0, f32::NAN);
        let mask = field.validity_mask();
        assert!(!mask.get(1, 0));
        assert!(mask.get(0, 0) && mask.get(2, 1));
        assert_eq!(field.count_defined(), 5);
    }

    #[test]
    fn row_mut_writes_through_to_samples() {
        let mut field = ScalarField::new(4, 3);
        field.row_mut(1).copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);
        field.row_mut(2)[0] = -7.5;
        assert_eq!(field.get(2, 1), 3.0);
        assert_eq!(field.get(0, 2), -7.5);
        assert_eq!(field.row(0), &[0.0; 4]);
    }
}
