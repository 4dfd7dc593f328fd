use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::{env, path::PathBuf};
use time::{format_description::well_known::Iso8601, OffsetDateTime};
use weather_predictor_core::{
    find_config_file, load_config, resolve_model_dir, ConfigSource, DEFAULT_PREDICTOR_PORT,
};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Weather Predictor - rule-based weather prediction API"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $PREDICTOR_CONFIG, ./predictor.toml,
    /// $XDG_CONFIG_HOME/weather-predictor/predictor.toml, /etc/weather-predictor/predictor.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "PREDICTOR_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short, long, env = "PREDICTOR_HOST")]
    #[serde(alias = "host")]
    pub domain: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PREDICTOR_PORT")]
    pub port: Option<String>,

    /// Directory containing metadata.json and province_stats.csv
    #[arg(short, long, env = "PREDICTOR_MODEL_DIR")]
    pub model_dir: Option<String>,

    /// Fixed seed for the temperature/humidity jitter, makes responses reproducible
    #[arg(short, long, env = "PREDICTOR_JITTER_SEED")]
    pub jitter_seed: Option<u64>,
}

impl Cli {
    pub fn host(&self) -> String {
        self.domain
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_PREDICTOR_PORT.to_string())
    }

    pub fn model_dir(&self) -> PathBuf {
        resolve_model_dir(self.model_dir.as_deref())
    }

    /// Merge a file config underneath these values; set fields win
    pub fn merged_over(self, file_config: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file_config.level),
            domain: self.domain.or(file_config.domain),
            port: self.port.or(file_config.port),
            model_dir: self.model_dir.or(file_config.model_dir),
            jitter_seed: self.jitter_seed.or(file_config.jitter_seed),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("PREDICTOR_CONFIG", "predictor.toml")
    };

    // Logger isn't set up yet, so these go straight to stderr
    if let Some(path) = source.path() {
        eprintln!("Loading config from: {}", path.display());
    }

    let file_config: Cli = load_config(&source).unwrap_or_else(|e| {
        eprintln!("Ignoring config {}: {:#}", source, e);
        Cli::default()
    });

    // CLI args override file config (env vars are handled by clap)
    cli_args.merged_over(file_config)
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
