//! Scanner config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use cwtally_core::error::{CwTallyError, Result};

pub use schema::{ScanConfig, ScanSection};

/// File looked up in the working directory by the binary.
pub const DEFAULT_CONFIG_PATH: &str = "cwtally.yaml";

pub fn load_from_file(path: impl AsRef<Path>) -> Result<ScanConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)
        .map_err(|e| CwTallyError::Config(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ScanConfig> {
    let cfg: ScanConfig = serde_yaml::from_str(s)
        .map_err(|e| CwTallyError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ScanConfig> {
    let path = path.as_ref();
    match path.try_exists() {
        Ok(false) => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(ScanConfig::default())
        }
        _ => load_from_file(path),
    }
}
