//! Config loading, preset selection and file scaffolding.

use std::path::Path;

use hf_config::{LoopConfig, Preset};

use crate::error::{AppError, AppResult};

/// Config from `path` when given, otherwise the named preset.
pub fn resolve_config(path: Option<&Path>, preset: Preset) -> AppResult<LoopConfig> {
    match path {
        Some(path) => {
            let config = hf_config::load(path)?;
            tracing::info!(path = %path.display(), name = %config.name, "config loaded");
            Ok(config)
        }
        None => {
            tracing::info!(%preset, "using built-in preset");
            Ok(preset.config())
        }
    }
}

/// Write the preset to `path` (YAML, or JSON for `.json`). Refuses to
/// overwrite an existing file.
pub fn init_config(path: &Path, preset: Preset) -> AppResult<LoopConfig> {
    if path.exists() {
        return Err(AppError::InvalidInput(format!(
            "{} already exists",
            path.display()
        )));
    }
    let config = preset.config();
    hf_config::save(path, &config).map_err(|e| match e {
        hf_config::ConfigError::Io(source) => AppError::ConfigFileWrite {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })?;
    Ok(config)
}

/// Load and validate `path`, returning the parsed config.
pub fn validate_file(path: &Path) -> AppResult<LoopConfig> {
    Ok(hf_config::load(path)?)
}
