//! Server configuration from environment variables.
//!
//! - `SKETCH_HOST`: bind address, default `0.0.0.0`
//! - `SKETCH_PORT`: TCP port, default 4242
//! - `SKETCH_OUTBOUND_CAPACITY`: per-session queue depth, default 1024

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use protocol::DEFAULT_PORT;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    Invalid { var: &'static str, expected: &'static str, value: String },
    #[error("SKETCH_OUTBOUND_CAPACITY must be at least 1")]
    ZeroCapacity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Lines queued for one session before it is evicted as too slow.
    pub outbound_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_owned(), port: DEFAULT_PORT, outbound_capacity: DEFAULT_OUTBOUND_CAPACITY }
    }
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value is present but does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let host = lookup("SKETCH_HOST")
            .map(|h| h.trim().to_owned())
            .filter(|h| !h.is_empty())
            .unwrap_or(defaults.host);
        let port = env_parse(&lookup, "SKETCH_PORT", "a port number", defaults.port)?;
        let outbound_capacity =
            env_parse(&lookup, "SKETCH_OUTBOUND_CAPACITY", "a positive integer", defaults.outbound_capacity)?;
        if outbound_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self { host, port, outbound_capacity })
    }

    /// `host:port` suitable for `TcpListener::bind`.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, expected, value: raw })
}
