use pricing::{ContractParameter, DomainError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("a sweep needs at least one sample")]
    EmptyRange,
    #[error("invalid sample range [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },
    #[error("sample {index} of the {parameter} sweep is invalid: {source}")]
    InvalidSample {
        parameter: ContractParameter,
        index: usize,
        #[source]
        source: DomainError,
    },
    #[error("rows and columns both vary {0}")]
    SameAxis(ContractParameter),
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn domain_failures_keep_their_sample() {
        let err = SweepError::InvalidSample {
            parameter: ContractParameter::Maturity,
            index: 0,
            source: DomainError::Singular {
                maturity: 0.0,
                volatility: 0.2,
            },
        };
        assert!(err.to_string().starts_with("sample 0 of the maturity sweep is invalid"));
        let source = err.source().and_then(|e| e.downcast_ref::<DomainError>());
        assert!(matches!(source, Some(DomainError::Singular { .. })));
    }
}
