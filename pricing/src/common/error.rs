use thiserror::Error;

use crate::common::models::ContractParameter;

/// An input outside the mathematically valid domain of the requested operation.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DomainError {
    #[error("{parameter} must be finite, got {value}")]
    NotFinite {
        parameter: ContractParameter,
        value: f64,
    },
    #[error("{parameter} must be positive, got {value}")]
    NonPositive {
        parameter: ContractParameter,
        value: f64,
    },
    #[error("{parameter} must not be negative, got {value}")]
    Negative {
        parameter: ContractParameter,
        value: f64,
    },
    /// d1, d2 and the Greeks are singular at expiry or at zero volatility.
    #[error("singular at maturity {maturity} and volatility {volatility}")]
    Singular { maturity: f64, volatility: f64 },
}
