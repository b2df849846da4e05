//! Listener configuration.

use std::net::SocketAddr;

use crate::error::ServerError;

/// Default port of the API listener.
pub const DEFAULT_API_PORT: u16 = 4513;
/// Default port of the Web listener.
pub const DEFAULT_WEB_PORT: u16 = 4514;
/// Default host both listeners bind to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Bind configuration for both listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port of the API listener (0 = ephemeral)
    pub api_port: u16,
    /// Port of the Web listener (0 = ephemeral)
    pub web_port: u16,
}

impl ListenerConfig {
    /// Configuration binding both listeners to ephemeral ports on localhost.
    pub fn ephemeral() -> Self {
        Self {
            api_port: 0,
            web_port: 0,
            ..Default::default()
        }
    }

    /// Socket address of the API listener.
    pub fn api_addr(&self) -> Result<SocketAddr, ServerError> {
        socket_addr(&self.host, self.api_port)
    }

    /// Socket address of the Web listener.
    pub fn web_addr(&self) -> Result<SocketAddr, ServerError> {
        socket_addr(&self.host, self.web_port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_port: DEFAULT_API_PORT,
            web_port: DEFAULT_WEB_PORT,
        }
    }
}

fn socket_addr(host: &str, port: u16) -> Result<SocketAddr, ServerError> {
    let raw = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    };
    raw.parse()
        .map_err(|_| ServerError::InvalidAddress(raw.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_ports() {
        let config = ListenerConfig::default();
        assert_eq!(config.api_addr().unwrap(), "127.0.0.1:4513".parse::<SocketAddr>().unwrap());
        assert_eq!(config.web_addr().unwrap(), "127.0.0.1:4514".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let config = ListenerConfig {
            host: "::1".to_string(),
            ..ListenerConfig::ephemeral()
        };
        assert_eq!(config.api_addr().unwrap(), "[::1]:0".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn hostnames_are_rejected() {
        let config = ListenerConfig {
            host: "localhost".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.web_addr(),
            Err(ServerError::InvalidAddress(addr)) if addr == "localhost:4514"
        ));
    }
}
