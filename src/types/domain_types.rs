// src/types/domain_types.rs
//! Domain-specific newtypes for configuration values.

use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

static METRIC_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$")
        .expect("Failed to compile metric segment regex - this is a bug in the code")
});

/// Address the HTTP transport binds to.
///
/// Accepts full socket addresses (`127.0.0.1:8080`, `[::1]:8080`) and the
/// `:port` shorthand, which binds every IPv4 interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenAddr(SocketAddr);

impl ListenAddr {
    /// Parses a listen address with validation
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("listen address"));
        }

        if let Some(port) = trimmed.strip_prefix(':') {
            let port: u16 = port
                .parse()
                .map_err(|e: std::num::ParseIntError| ValidationError::InvalidListenAddr {
                    input: input.to_string(),
                    reason: e.to_string(),
                })?;
            return Ok(Self(SocketAddr::new(
                IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                port,
            )));
        }

        trimmed
            .parse::<SocketAddr>()
            .map(Self)
            .map_err(|e| ValidationError::InvalidListenAddr {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        self.0
    }
}

impl fmt::Display for ListenAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One segment of a Prometheus metric name (namespace, subsystem or name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricName(String);

impl MetricName {
    /// Create a new metric name segment with validation
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ValidationError::EmptyField("metric name"));
        }

        if !METRIC_SEGMENT.is_match(&name) {
            return Err(ValidationError::InvalidMetricName {
                name,
                reason: "must match [a-zA-Z_][a-zA-Z0-9_]*".to_string(),
            });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr_shorthand() {
        let addr = ListenAddr::parse(":8080").unwrap();
        assert_eq!(addr.socket_addr(), "0.0.0.0:8080".parse().unwrap());
    }

    #[test]
    fn test_listen_addr_validation() {
        assert!(ListenAddr::parse("127.0.0.1:9000").is_ok());
        assert!(ListenAddr::parse("[::1]:9000").is_ok());
        assert!(ListenAddr::parse("").is_err());
        assert!(ListenAddr::parse(":http").is_err());
        assert!(ListenAddr::parse(":70000").is_err());
        assert!(ListenAddr::parse("localhost").is_err());
    }

    #[test]
    fn test_metric_name_validation() {
        assert!(MetricName::new("my_group").is_ok());
        assert!(MetricName::new("_private").is_ok());
        assert!(MetricName::new("string_service2").is_ok());
        assert!(MetricName::new("").is_err());
        assert!(MetricName::new("2fast").is_err());
        assert!(MetricName::new("string-service").is_err());
        assert!(MetricName::new("has space").is_err());
    }
}
