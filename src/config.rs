//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Save file location.
    pub save_path: PathBuf,
    /// How long a new connection may take to send its handshake.
    pub auth_timeout: Duration,
    /// Outbound message queue depth per connection.
    pub outbound_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            save_path: PathBuf::from("nplanetary.json"),
            auth_timeout: Duration::from_secs(30),
            outbound_buffer: 16,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `NPLANETARY_BIND` and
    /// `NPLANETARY_AUTH_TIMEOUT_SECS`. Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(bind) = var("NPLANETARY_BIND") {
            match bind.parse() {
                Ok(addr) => config.bind_addr = addr,
                Err(e) => warn!("Ignoring NPLANETARY_BIND={:?}: {}", bind, e),
            }
        }

        if let Some(secs) = var("NPLANETARY_AUTH_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => config.auth_timeout = Duration::from_secs(secs),
                Err(e) => warn!("Ignoring NPLANETARY_AUTH_TIMEOUT_SECS={:?}: {}", secs, e),
            }
        }

        config
    }

    /// Same configuration with a different save file.
    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = path.into();
        self
    }
}
