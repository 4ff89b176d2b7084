use thiserror::Error;

mod domain_types;

pub use domain_types::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid listen address: {input} - {reason}")]
    InvalidListenAddr { input: String, reason: String },

    #[error("Invalid metric name segment: {name} - {reason}")]
    InvalidMetricName { name: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),
}
