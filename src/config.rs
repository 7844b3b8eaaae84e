//! Server configuration
//!
//! Everything is read from the environment; there is no config file.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Port used when `PORT` is not set
pub const DEFAULT_PORT: u16 = 2091;
/// Environment variable selecting the listen port
pub const PORT_ENV: &str = "PORT";
/// Environment variable overriding the widget HTML location
pub const WIDGET_PATH_ENV: &str = "SMILES_WIDGET_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {var} value {value:?}: expected a port number between 0 and 65535")]
    InvalidPort { var: &'static str, value: String },
}

/// Runtime settings for the HTTP listener
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    /// Explicit widget file; `None` means search the default locations.
    pub widget_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            widget_path: None,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(PORT_ENV) {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        let widget_path = lookup(WIDGET_PATH_ENV)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self { port, widget_path })
    }

    /// Address the listener binds to (all interfaces).
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort {
        var: PORT_ENV,
        value: raw.to_string(),
    })
}
