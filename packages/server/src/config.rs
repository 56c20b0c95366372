//! Server configuration.

use std::time::Duration;

/// Default grace interval between `match_ended` and session teardown
pub const DEFAULT_EXIT_GRACE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Time the exit notification is given to reach clients before the session is destroyed
    pub exit_grace: Duration,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            exit_grace: DEFAULT_EXIT_GRACE,
        }
    }
}
