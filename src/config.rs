//! Runtime configuration for the demo binary.
use crate::smooth::SmoothParams;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional output sinks.
#[derive(Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Despiked field, JSON interchange format.
    pub field_out: Option<PathBuf>,
    /// Stage report, pretty-printed JSON.
    pub json_out: Option<PathBuf>,
    /// Grayscale preview PNG of the despiked field.
    pub preview_out: Option<PathBuf>,
}

#[derive(Clone, Deserialize)]
pub struct RuntimeConfig {
    pub input_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub smooth: SmoothParams,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}

/// Resolve the config path from the command line (single argument).
pub fn parse_cli(program: &str) -> Result<RuntimeConfig, String> {
    let path = env::args()
        .nth(1)
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    load_config(Path::new(&path))
}
