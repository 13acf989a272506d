use despike::field::ScalarField;

/// Uniform field of the given value.
pub fn uniform_field(width: usize, height: usize, value: f32) -> ScalarField {
    assert!(width > 0 && height > 0, "field dimensions must be positive");
    ScalarField::filled(width, height, value)
}

/// Uniform field with a single deviant pixel.
pub fn spike_field(
    width: usize,
    height: usize,
    background: f32,
    spike: f32,
    x: usize,
    y: usize,
) -> ScalarField {
    let mut field = uniform_field(width, height, background);
    field.set(x, y, spike);
    field
}

/// Uniform field framed by an undefined (NaN) border of the given width,
/// simulating pixels outside the observed footprint.
pub fn framed_field(width: usize, height: usize, value: f32, border: usize) -> ScalarField {
    let mut field = uniform_field(width, height, value);
    for y in 0..height {
        for x in 0..width {
            let inside =
                x >= border && x < width - border && y >= border && y < height - border;
            if !inside {
                field.set(x, y, f32::NAN);
            }
        }
    }
    field
}

/// Smooth deterministic ripple, useful when a flat field would make every
/// deviation exactly zero.
pub fn ripple_field(width: usize, height: usize) -> ScalarField {
    let mut field = ScalarField::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = 50.0 + 30.0 * (x as f32 * 0.7).sin() * (y as f32 * 0.5).cos();
            field.set(x, y, v);
        }
    }
    field
}
