//! Filesystem utilities

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use log::{debug, info};

use crate::{get_xdg_data_dir, MODEL_DIR_NAME};

/// Pick the directory holding the model files
///
/// An explicit directory always wins. Otherwise `./weather_models` is used if
/// present, then `$XDG_DATA_HOME/weather-predictor/weather_models`. When
/// neither exists the local path is returned so the error names it.
pub fn resolve_model_dir(explicit: Option<&str>) -> PathBuf {
    if let Some(dir) = explicit {
        return PathBuf::from(dir);
    }

    let local = PathBuf::from(MODEL_DIR_NAME);
    if local.is_dir() {
        return local;
    }

    let xdg = get_xdg_data_dir().join(MODEL_DIR_NAME);
    if xdg.is_dir() {
        info!("Using model directory from XDG data dir: {}", xdg.display());
        return xdg;
    }

    debug!("No model directory found, defaulting to {}", local.display());
    local
}

/// Join `file_name` onto `dir` and make sure it is a regular file
pub fn require_file(dir: &Path, file_name: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(file_name);
    if !path.is_file() {
        return Err(anyhow!(
            "missing {} in model directory {}",
            file_name,
            dir.display()
        ));
    }
    Ok(path)
}
