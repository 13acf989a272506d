//! I/O helpers for scalar fields and JSON.
//!
//! - `load_field_json`: read a 2D JSON array (`null` = undefined sample).
//! - `save_field_json`: write a field back to the same interchange format.
//! - `save_preview_png`: min/max-normalized grayscale preview, undefined
//!   pixels rendered black.
//! - `write_json_file`: pretty-print a stage report (or any serializable
//!   value) to disk.
use super::ScalarField;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load a field from a JSON 2D array of numbers-or-nulls.
pub fn load_field_json(path: &Path) -> Result<ScalarField, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read field {}: {e}", path.display()))?;
    let rows: Vec<Vec<Option<f32>>> = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse field {}: {e}", path.display()))?;

    let h = rows.len();
    let w = rows.first().map_or(0, |r| r.len());
    if w == 0 || h == 0 {
        return Err(format!("Field {} is empty", path.display()));
    }
    let mut data = Vec::with_capacity(w * h);
    for (y, row) in rows.iter().enumerate() {
        if row.len() != w {
            return Err(format!(
                "Field {} is ragged: row {y} has {} samples, expected {w}",
                path.display(),
                row.len()
            ));
        }
        data.extend(row.iter().copied().map(|v| v.unwrap_or(f32::NAN)));
    }
    Ok(ScalarField::from_vec(w, h, data))
}

/// Save a field as a JSON 2D array, mapping undefined samples to `null`.
pub fn save_field_json(field: &ScalarField, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let rows: Vec<Vec<Option<f32>>> = (0..field.h)
        .map(|y| {
            field
                .row(y)
                .iter()
                .map(|&v| v.is_finite().then_some(v))
                .collect()
        })
        .collect();
    let json = serde_json::to_string(&rows)
        .map_err(|e| format!("Failed to serialize field {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write field {}: {e}", path.display()))
}

/// Save a grayscale preview PNG, scaling the finite value range to [0, 255].
pub fn save_preview_png(field: &ScalarField, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let finite = field.data.iter().copied().filter(|v| v.is_finite());
    let min = finite.clone().fold(f32::INFINITY, f32::min);
    let max = finite.fold(f32::NEG_INFINITY, f32::max);
    let span = max - min;

    let mut out = GrayImage::new(field.w as u32, field.h as u32);
    for y in 0..field.h {
        let row = field.row(y);
        for (x, &px) in row.iter().enumerate() {
            let v = if !px.is_finite() {
                0
            } else if span > 0.0 {
                (((px - min) / span) * 255.0).clamp(0.0, 255.0) as u8
            } else {
                128
            };
            out.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a despike report (or any other value) as pretty JSON to
/// `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize report for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write report {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create output dir {}: {e}", parent.display())),
        _ => Ok(()),
    }
}
