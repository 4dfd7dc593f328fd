//! Weather Predictor Core Library
//!
//! Shared utilities for the predictor service:
//! - Configuration loading (XDG-compliant)
//! - Model directory discovery
//! - Common constants

mod config;
pub mod fs;

pub use config::{find_config_file, get_xdg_data_dir, load_config, ConfigSource};
pub use fs::{require_file, resolve_model_dir};

/// Application name used for XDG paths
pub const APP_NAME: &str = "weather-predictor";

/// Default predictor port
pub const DEFAULT_PREDICTOR_PORT: u16 = 9810;

/// Directory name holding the model metadata and climate statistics
pub const MODEL_DIR_NAME: &str = "weather_models";

/// Category enumeration and feature names
pub const METADATA_FILE: &str = "metadata.json";

/// Per-province historical climate averages
pub const CLIMATE_STATS_FILE: &str = "province_stats.csv";
