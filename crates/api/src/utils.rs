use clap::Parser;
use climate_api_core::{
    find_config_file, load_config, ConfigSource, DEFAULT_API_PORT, DEFAULT_DATABASE_PATH,
};
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Climate API - read-only Honolulu, Hawaii precipitation and temperature observations"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $CLIMATE_API_CONFIG, ./climate.toml,
    /// $XDG_CONFIG_HOME/climate-api/climate.toml, /etc/climate-api/climate.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "CLIMATE_API_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, env = "CLIMATE_API_HOST")]
    #[serde(alias = "domain")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "CLIMATE_API_PORT")]
    pub port: Option<String>,

    /// Path to the climate SQLite dataset
    #[arg(short, long, env = "CLIMATE_API_DATABASE")]
    #[serde(alias = "database_path")]
    pub database: Option<String>,
}

impl Cli {
    pub fn host(&self) -> String {
        self.host.clone().unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_API_PORT.to_string())
    }

    pub fn database_path(&self) -> String {
        self.database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
    }

    /// CLI values win over the config file
    pub fn merge(self, file_config: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file_config.level),
            host: self.host.or(file_config.host),
            port: self.port.or(file_config.port),
            database: self.database.or(file_config.database),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("CLIMATE_API_CONFIG", "climate.toml")
    };

    // the logger is not set up yet, so this goes straight to stderr
    let file_config: Cli = load_config(&source).unwrap_or_else(|e| {
        eprintln!("ignoring config file {}: {:#}", source, e);
        Cli::default()
    });

    // env vars are handled by clap
    cli_args.merge(file_config)
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
            let timestamp = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                timestamp,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
