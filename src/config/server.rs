//! HTTP server configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.is_empty() {
            return Err(ValidationError::MissingRequired("SERVER_HOST"));
        }
        if self.port == 0 {
            return Err(ValidationError::InvalidPort(self.port));
        }
        Ok(())
    }
}
