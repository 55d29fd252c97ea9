//! Bootstrap configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables (host and port only)
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! A missing config file is not an error: the service logs a warning and
//! starts on defaults. A config file that was named explicitly but does not
//! exist, or one that fails to parse, is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable overriding the bind host
pub const ENV_HOST: &str = "ADA_MOCK_HOST";
/// Environment variable overriding the bind port
pub const ENV_PORT: &str = "ADA_MOCK_PORT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
/// Upper bound on the artificial upload delay, in seconds
pub const MAX_UPLOAD_DELAY_SECS: f64 = 2.0;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Contents of the TOML config file
///
/// Every field is optional; absent fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upload_delay_cap_secs: Option<f64>,
    pub session_ttl_secs: Option<u64>,
    pub sweep_interval_secs: Option<u64>,
    pub max_upload_bytes: Option<usize>,
    pub seed: Option<u64>,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line
///
/// Mirrors [`TomlConfig`] so the binary's argument parser can hand its
/// results over without this crate depending on clap.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub upload_delay_cap_secs: Option<f64>,
    pub session_ttl_secs: Option<u64>,
    pub sweep_interval_secs: Option<u64>,
    pub max_upload_bytes: Option<usize>,
    pub seed: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Always within `[0, MAX_UPLOAD_DELAY_SECS]`
    pub upload_delay_cap_secs: f64,
    /// Zero disables the idle session sweep
    pub session_ttl_secs: u64,
    pub sweep_interval_secs: u64,
    pub max_upload_bytes: usize,
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upload_delay_cap_secs: MAX_UPLOAD_DELAY_SECS,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            seed: None,
            log_level: default_log_level(),
        }
    }
}

impl ServiceConfig {
    /// Resolve configuration from CLI, environment, TOML file and defaults
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let toml_config = match &cli.config_path {
            Some(path) => load_toml_config(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => load_toml_config(&path)?,
                Some(path) => {
                    warn!(
                        "Config file not found at {}, using defaults",
                        path.display()
                    );
                    TomlConfig::default()
                }
                None => {
                    warn!("Could not determine config directory, using defaults");
                    TomlConfig::default()
                }
            },
        };

        Self::merge(cli, &toml_config, env_host(), env_port()?)
    }

    /// Layer the sources on top of compiled defaults
    ///
    /// Environment values are passed in rather than read here so the
    /// precedence rules can be exercised without touching process state.
    pub fn merge(
        cli: &CliOverrides,
        file: &TomlConfig,
        env_host: Option<String>,
        env_port: Option<u16>,
    ) -> Result<Self> {
        let defaults = Self::default();

        let host = cli
            .host
            .clone()
            .or(env_host)
            .or_else(|| file.host.clone())
            .unwrap_or(defaults.host);
        if host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }

        let port = cli.port.or(env_port).or(file.port).unwrap_or(defaults.port);

        let requested_delay = cli
            .upload_delay_cap_secs
            .or(file.upload_delay_cap_secs)
            .unwrap_or(defaults.upload_delay_cap_secs);
        let upload_delay_cap_secs = clamp_upload_delay(requested_delay);

        let sweep_interval_secs = cli
            .sweep_interval_secs
            .or(file.sweep_interval_secs)
            .unwrap_or(defaults.sweep_interval_secs);
        if sweep_interval_secs == 0 {
            return Err(Error::Config(
                "sweep_interval_secs must be greater than zero".to_string(),
            ));
        }

        let max_upload_bytes = cli
            .max_upload_bytes
            .or(file.max_upload_bytes)
            .unwrap_or(defaults.max_upload_bytes);
        if max_upload_bytes == 0 {
            return Err(Error::Config(
                "max_upload_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            upload_delay_cap_secs,
            session_ttl_secs: cli
                .session_ttl_secs
                .or(file.session_ttl_secs)
                .unwrap_or(defaults.session_ttl_secs),
            sweep_interval_secs,
            max_upload_bytes,
            seed: cli.seed.or(file.seed),
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| file.logging.level.clone()),
        })
    }

    /// `host:port` string suitable for binding a listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn upload_delay_cap(&self) -> Duration {
        crate::time::secs_f64_to_duration(self.upload_delay_cap_secs)
    }

    /// Idle time after which a session is swept, or `None` when disabled
    pub fn session_ttl(&self) -> Option<Duration> {
        (self.session_ttl_secs > 0).then(|| Duration::from_secs(self.session_ttl_secs))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Clamp a requested upload delay cap into `[0, MAX_UPLOAD_DELAY_SECS]`
pub fn clamp_upload_delay(requested: f64) -> f64 {
    if !requested.is_finite() || requested < 0.0 {
        warn!("Invalid upload_delay_cap_secs {}, using 0", requested);
        return 0.0;
    }
    if requested > MAX_UPLOAD_DELAY_SECS {
        warn!(
            "upload_delay_cap_secs {} exceeds maximum, capping at {}",
            requested, MAX_UPLOAD_DELAY_SECS
        );
        return MAX_UPLOAD_DELAY_SECS;
    }
    requested
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).inspect_err(|e| {
        warn!("Failed to read config file {}: {}", path.display(), e);
    })?;
    let config: TomlConfig = toml::from_str(&content)?;
    info!("Loaded config file {}", path.display());
    Ok(config)
}

/// Default config file location for the platform
///
/// `<config_dir>/ada-mock/config.toml`, e.g. `~/.config/ada-mock/config.toml`
/// on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ada-mock").join("config.toml"))
}

fn env_host() -> Option<String> {
    std::env::var(ENV_HOST).ok().filter(|h| !h.trim().is_empty())
}

fn env_port() -> Result<Option<u16>> {
    match std::env::var(ENV_PORT) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<u16>()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid {} '{}': {}", ENV_PORT, raw, e))),
        Err(_) => Ok(None),
    }
}
