// src/config.rs
use crate::constants::{DEFAULT_LISTEN_ADDR, DEFAULT_METRICS_NAMESPACE, DEFAULT_METRICS_SUBSYSTEM};
use crate::error::AppError;
use crate::types::{ListenAddr, MetricName};
use clap::Parser;
use std::path::PathBuf;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Address to listen on (e.g. "127.0.0.1:8080"; ":8080" binds all interfaces)
    #[arg(short, long, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: String,

    /// Metrics namespace, the first segment of every exported metric name
    #[arg(long, default_value = DEFAULT_METRICS_NAMESPACE)]
    pub namespace: String,

    /// Metrics subsystem, the second segment of every exported metric name
    #[arg(long, default_value = DEFAULT_METRICS_SUBSYSTEM)]
    pub subsystem: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Also append log output to this file
    #[arg(long)]
    pub log_file: Option<String>,
}

/// Resolved server configuration, validated and ready to start the service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: ListenAddr,
    pub namespace: MetricName,
    pub subsystem: MetricName,
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Resolves a complete server configuration from CLI input.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let listen = ListenAddr::parse(&cli.listen)?;
        let namespace = MetricName::new(cli.namespace)?;
        let subsystem = MetricName::new(cli.subsystem)?;

        let log_file = cli.log_file.map(PathBuf::from);
        if let Some(path) = &log_file {
            if path.is_dir() {
                return Err(AppError::InvalidConfiguration(format!(
                    "log file {} is a directory",
                    path.display()
                )));
            }
        }

        Ok(ServerConfig {
            listen,
            namespace,
            subsystem,
            verbose: cli.verbose,
            log_file,
        })
    }

    /// Returns a copy listening on `addr` instead.
    pub fn with_listen(mut self, addr: ListenAddr) -> Self {
        self.listen = addr;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: ListenAddr::parse(DEFAULT_LISTEN_ADDR)
                .expect("Default listen address should be valid"),
            namespace: MetricName::new(DEFAULT_METRICS_NAMESPACE)
                .expect("Default namespace should be valid"),
            subsystem: MetricName::new(DEFAULT_METRICS_SUBSYSTEM)
                .expect("Default subsystem should be valid"),
            verbose: false,
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CommandLineInput {
        CommandLineInput::try_parse_from(std::iter::once("stringsvc").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn defaults_match_constants() {
        let config = ServerConfig::resolve(parse(&[])).unwrap();
        assert_eq!(config.listen.to_string(), "0.0.0.0:8080");
        assert_eq!(config.namespace.as_str(), "my_group");
        assert_eq!(config.subsystem.as_str(), "string_service");
        assert!(!config.verbose);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn resolves_overrides() {
        let config = ServerConfig::resolve(parse(&[
            "--listen",
            "127.0.0.1:9090",
            "--namespace",
            "acme",
            "--subsystem",
            "strings",
            "-v",
        ]))
        .unwrap();
        assert_eq!(config.listen.to_string(), "127.0.0.1:9090");
        assert_eq!(config.namespace.as_str(), "acme");
        assert_eq!(config.subsystem.as_str(), "strings");
        assert!(config.verbose);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(ServerConfig::resolve(parse(&["--listen", "nowhere"])).is_err());
        assert!(ServerConfig::resolve(parse(&["--namespace", "my-group"])).is_err());
        assert!(ServerConfig::resolve(parse(&["--log-file", "."])).is_err());
    }

    #[test]
    fn default_config_is_valid() {
        let config = ServerConfig::default();
        assert_eq!(config.listen.to_string(), "0.0.0.0:8080");
    }
}
