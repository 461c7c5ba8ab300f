use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use mwood_models::{email_address::EmailAddress, Sensitive};
use serde::Deserialize;

mod duration;

pub use duration::Duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon separated list of config files to load instead of
/// [`DEFAULT_CONFIG_PATH`]. Later files override earlier ones.
pub const CONFIG_PATH_ENV_VAR: &str = "MWOOD_CONFIG";

/// Loads the configuration from the config files given via [`CONFIG_PATH_ENV_VAR`]
/// and applies any `MWOOD_*` environment variable overrides (e.g.
/// `MWOOD_HTTP__PORT` for `http.port`).
pub fn load() -> anyhow::Result<Config> {
    match std::env::var(CONFIG_PATH_ENV_VAR) {
        Ok(paths) => load_paths(&paths.split(':').collect::<Vec<_>>()),
        Err(std::env::VarError::NotPresent) => load_paths(&[DEFAULT_CONFIG_PATH]),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to read {CONFIG_PATH_ENV_VAR} variable"))
        }
    }
}

fn load_paths(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .add_source(Environment::with_prefix("MWOOD").separator("__"))
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: Option<EmailConfig>,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub real_ip: Option<RealIpConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

/// Connection settings for the smtp relay. The whole section is optional so
/// the server can come up without email and report inquiries as undeliverable
/// instead.
#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Login for the relay, also used as the sender address.
    pub username: EmailAddress,
    pub password: Sensitive<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    /// Mailbox inquiry emails are delivered to.
    pub email: EmailAddress,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            email: "info@mwooduae.com".parse().unwrap(),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration(std::time::Duration::from_secs(30)),
        }
    }
}
