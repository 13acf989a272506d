mod common;

use common::synthetic_field::{framed_field, ripple_field, spike_field, uniform_field};
use despike::field::FieldMask;
use despike::smooth::{smooth, SmoothError, SmoothParams, Smoother};

#[test]
fn single_spike_is_flagged_and_refilled() {
    let field = spike_field(5, 5, 50.0, 500.0, 2, 2);
    let mask = field.validity_mask();

    let smoother = Smoother::new(SmoothParams {
        mask_sigma: 1.0,
        fill_sigma: 1.0,
        threshold: 100.0,
    });
    let report = smoother
        .process_with_diagnostics(&field, &mask)
        .expect("valid inputs");

    assert_eq!(
        report.trace.mask.flagged, 1,
        "only the spike should exceed the threshold"
    );
    assert_eq!(report.trace.fill.refilled, 1);
    let center = report.field.get(2, 2);
    assert!(
        (center - 50.0).abs() < 1e-2,
        "spike should fill to the neighbourhood value, got {center}"
    );
}

#[test]
fn uniform_field_passes_through() {
    let field = uniform_field(16, 12, 75.0);
    let mask = field.validity_mask();
    let out = smooth(&field, &mask, 1.5, 2.0, 100.0).expect("valid inputs");

    assert_eq!(out.w, field.w);
    assert_eq!(out.h, field.h);
    for y in 0..out.h {
        for x in 0..out.w {
            assert!(
                (out.get(x, y) - 75.0).abs() < 1e-2,
                "constant field must survive despiking at ({x}, {y})"
            );
        }
    }
}

#[test]
fn undefined_footprint_is_restored_exactly() {
    let field = framed_field(12, 10, 42.0, 2);
    let mask = field.validity_mask();
    let out = smooth(&field, &mask, 1.0, 2.0, 100.0).expect("valid inputs");

    for y in 0..out.h {
        for x in 0..out.w {
            if mask.get(x, y) {
                assert!(
                    out.get(x, y).is_finite(),
                    "defined pixel ({x}, {y}) lost its value"
                );
            } else {
                assert!(
                    out.get(x, y).is_nan(),
                    "pixel ({x}, {y}) outside the footprint must stay undefined"
                );
            }
        }
    }
    assert_eq!(out.validity_mask(), mask);
}

#[test]
fn rerun_is_bit_identical() {
    let field = ripple_field(20, 15);
    let mask = field.validity_mask();
    let params = SmoothParams {
        mask_sigma: 1.2,
        fill_sigma: 2.4,
        threshold: 20.0,
    };
    let smoother = Smoother::new(params);

    let first = smoother.process(&field, &mask).expect("valid inputs");
    let second = smoother.process(&field, &mask).expect("valid inputs");
    for (a, b) in first.data.iter().zip(&second.data) {
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn raising_threshold_overwrites_fewer_pixels() {
    let field = ripple_field(24, 18);
    let mask = field.validity_mask();
    let smoother = |threshold: f32| {
        Smoother::new(SmoothParams {
            mask_sigma: 1.0,
            fill_sigma: 2.0,
            threshold,
        })
    };

    let strict = smoother(5.0)
        .process_with_diagnostics(&field, &mask)
        .expect("valid inputs");
    let loose = smoother(40.0)
        .process_with_diagnostics(&field, &mask)
        .expect("valid inputs");
    assert!(loose.trace.mask.flagged <= strict.trace.mask.flagged);
}

#[test]
fn negative_spread_is_rejected_before_any_work() {
    let field = uniform_field(8, 8, 1.0);
    let mask = field.validity_mask();
    let err = smooth(&field, &mask, -1.0, 1.0, 100.0).unwrap_err();
    assert_eq!(
        err,
        SmoothError::InvalidParameter {
            name: "mask_sigma",
            value: -1.0
        }
    );
}

#[test]
fn mismatched_mask_shape_is_rejected() {
    let field = uniform_field(8, 8, 1.0);
    let mask = FieldMask::filled(8, 7, true);
    let err = smooth(&field, &mask, 1.0, 1.0, 100.0).unwrap_err();
    assert!(matches!(err, SmoothError::ShapeMismatch { .. }));
}
