//! Validate command implementation.

use crate::core::validator::OutputValidator;
use crate::models::config::Config;
use crate::services::SystemTools;
use crate::{Error, Result};
use std::path::Path;

/// Validate every MKV file under a directory and report the results.
pub fn validate(path: &Path, config: &Config) -> Result<()> {
    if !path.exists() {
        return Err(Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(Error::NotADirectory(path.display().to_string()));
    }

    let tools = SystemTools::new();
    let validator = OutputValidator::new(config, &tools);
    let (_, invalid) = validator.validate_directory(path)?;

    if invalid > 0 {
        return Err(Error::other(format!("{} invalid file(s)", invalid)));
    }
    Ok(())
}
