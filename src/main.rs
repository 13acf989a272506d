use despike::field::ScalarField;
use despike::smooth::{SmoothParams, Smoother};

fn main() {
    // Demo stub: builds a synthetic spiked field and despikes it
    let w = 64usize;
    let h = 64usize;
    let mut field = ScalarField::filled(w, h, 50.0);
    field.set(32, 32, 500.0);
    let mask = field.validity_mask();

    let smoother = Smoother::new(SmoothParams::default());
    match smoother.process_with_diagnostics(&field, &mask) {
        Ok(report) => println!(
            "flagged={} refilled={} spike {:.1} -> {:.1}",
            report.trace.mask.flagged,
            report.trace.fill.refilled,
            field.get(32, 32),
            report.field.get(32, 32)
        ),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
