use despike::config;
use despike::diagnostics::SmoothReport;
use despike::field::io::{load_field_json, save_field_json, save_preview_png, write_json_file};
use despike::smooth::Smoother;
use std::env;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "despike_demo".to_string());
    let config = config::parse_cli(&program)?;

    let field = load_field_json(&config.input_path)?;
    let mask = field.validity_mask();

    let smoother = Smoother::new(config.smooth);
    let report = smoother
        .process_with_diagnostics(&field, &mask)
        .map_err(|e| e.to_string())?;

    print_text_summary(&report);

    if let Some(path) = &config.output.field_out {
        save_field_json(&report.field, path)?;
        println!("Despiked field written to {}", path.display());
    }
    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report.trace)?;
        println!("JSON report written to {}", path.display());
    }
    if let Some(path) = &config.output.preview_out {
        save_preview_png(&report.field, path)?;
        println!("Preview written to {}", path.display());
    }
    Ok(())
}

fn print_text_summary(report: &SmoothReport) {
    let trace = &report.trace;
    println!(
        "input {}x{} ({} defined, {} undefined)",
        trace.input.width, trace.input.height, trace.input.defined_px, trace.input.undefined_px
    );
    println!(
        "deviation [{:.2}, {:.2}] mean |d|={:.2}",
        trace.deviation.min, trace.deviation.max, trace.deviation.mean_abs
    );
    println!(
        "flagged {} pixels ({:.2}%) at threshold {:.1}, refilled {}",
        trace.mask.flagged,
        trace.mask.flagged_fraction * 100.0,
        trace.mask.threshold,
        trace.fill.refilled
    );
    for stage in &trace.timing.stages {
        println!("  {:<10} {:>8.3} ms", stage.stage, stage.elapsed_ms);
    }
    println!("total {:.3} ms", trace.timing.total_ms);
}
