use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const ADDR_VAR: &str = "LAYERED_CHESS_ADDR";
pub const STATIC_DIR_VAR: &str = "LAYERED_CHESS_STATIC_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory served at `/`, if any.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `LAYERED_CHESS_ADDR` and `LAYERED_CHESS_STATIC_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = ServerConfig::default();

        if let Some(value) = lookup(ADDR_VAR) {
            config.bind_addr = value
                .parse()
                .map_err(|source| ConfigError::InvalidAddress { value, source })?;
        }

        if let Some(dir) = lookup(STATIC_DIR_VAR).filter(|d| !d.is_empty()) {
            config.static_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }
}
