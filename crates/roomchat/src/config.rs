//! Process-level configuration read from the environment.

use std::net::{IpAddr, SocketAddr};

use roomchat_session::{SessionConfig, UnknownPolicy};

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Host used when `HOST` is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Errors from reading [`ServerConfig`] out of the environment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `PORT` was set but is not a valid port number.
    #[error("invalid PORT {0:?}")]
    InvalidPort(String),

    /// `ROOMCHAT_UNJOINED` named an unknown policy.
    #[error("invalid ROOMCHAT_UNJOINED: {0}")]
    UnjoinedPolicy(#[from] UnknownPolicy),
}

/// Where to listen and how sessions behave.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads `PORT`, `HOST` and `ROOMCHAT_UNJOINED`, falling back to the
    /// defaults for anything unset or empty.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if a variable is set to something that
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), with a custom variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = var("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(host) = var("HOST") {
            config.host = host.trim().to_string();
        }
        if let Some(policy) = var("ROOMCHAT_UNJOINED") {
            config.session.unjoined = policy.parse()?;
        }
        Ok(config)
    }

    /// The `host:port` string to bind the listener to.
    ///
    /// IPv6 literals are bracketed (`[::]:3000`). Hostnames and already
    /// bracketed hosts pass through unchanged.
    pub fn bind_addr(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, self.port).to_string(),
            Err(_) => format!("{}:{}", self.host, self.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomchat_session::UnjoinedPolicy;
    use std::collections::HashMap;

    fn lookup(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_empty_uses_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.session.unjoined, UnjoinedPolicy::Reject);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("ROOMCHAT_UNJOINED", "ignore"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.session.unjoined, UnjoinedPolicy::Ignore);
    }

    #[test]
    fn test_from_lookup_blank_values_fall_back() {
        let config =
            ServerConfig::from_lookup(lookup(&[("PORT", "  "), ("HOST", "")]))
                .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_bind_addr_brackets_ipv6_host() {
        let config =
            ServerConfig::from_lookup(lookup(&[("HOST", "::")])).unwrap();
        assert_eq!(config.bind_addr(), "[::]:3000");

        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "::1"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        let addr: SocketAddr = config.bind_addr().parse().unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.is_ipv6());
    }

    #[test]
    fn test_bind_addr_keeps_hostnames_and_bracketed_hosts() {
        let config =
            ServerConfig::from_lookup(lookup(&[("HOST", "localhost")])).unwrap();
        assert_eq!(config.bind_addr(), "localhost:3000");

        let config =
            ServerConfig::from_lookup(lookup(&[("HOST", "[::1]")])).unwrap();
        assert_eq!(config.bind_addr(), "[::1]:3000");
    }

    #[test]
    fn test_from_lookup_invalid_port_errors() {
        let err =
            ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("http".into()));

        let err = ServerConfig::from_lookup(lookup(&[("PORT", "70000")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn test_from_lookup_invalid_policy_errors() {
        let err = ServerConfig::from_lookup(lookup(&[(
            "ROOMCHAT_UNJOINED",
            "drop",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnjoinedPolicy(_)));
    }
}
