use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DNS_TIMEOUT_SECS: u64 = 2;
const DEFAULT_DNS_ATTEMPTS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Service settings read from the environment.
///
/// A `.env` file in the working directory is loaded first if present.
///
/// | Variable | Default |
/// |---|---|
/// | `EMAIL_DIAGNOSIS_HOST` | `127.0.0.1` |
/// | `EMAIL_DIAGNOSIS_PORT` | `8080` |
/// | `DNS_TIMEOUT_SECS` | `2` |
/// | `DNS_ATTEMPTS` | `2` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub dns_timeout: Duration,
    pub dns_attempts: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            dns_timeout: Duration::from_secs(DEFAULT_DNS_TIMEOUT_SECS),
            dns_attempts: DEFAULT_DNS_ATTEMPTS,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        Ok(Self {
            host: lookup("EMAIL_DIAGNOSIS_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "EMAIL_DIAGNOSIS_PORT", DEFAULT_PORT)?,
            dns_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DNS_TIMEOUT_SECS",
                DEFAULT_DNS_TIMEOUT_SECS,
            )?),
            dns_attempts: parse_or(&lookup, "DNS_ATTEMPTS", DEFAULT_DNS_ATTEMPTS)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}
