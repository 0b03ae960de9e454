//! Service configuration from the environment.
//!
//! # Environment Variables
//!
//! - `PORT`: TCP port to listen on (default 3000)

use crate::error::ConfigError;
use std::env;
use std::net::{Ipv4Addr, SocketAddr};

/// Port used when `PORT` is unset or empty.
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
}

impl Config {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim()
                    .parse()
                    .map_err(|source| ConfigError::InvalidPort {
                        value: raw.clone(),
                        source,
                    })?
            }
            _ => DEFAULT_PORT,
        };

        Ok(Config { port })
    }

    /// Address to bind: all interfaces on the configured port.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config { port: DEFAULT_PORT }
    }
}
