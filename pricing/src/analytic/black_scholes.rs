use crate::common::error::DomainError;
use crate::common::models::{OptionContract, OptionType};
use probability::distribution::{Continuous, Distribution, Gaussian};
use serde::{Deserialize, Serialize};

fn standard_normal() -> Gaussian {
    Gaussian::new(0.0, 1.0)
}

pub(crate) fn cdf(d: f64) -> f64 {
    standard_normal().distribution(d)
}

pub(crate) fn pdf(d: f64) -> f64 {
    standard_normal().density(d)
}

pub trait OptionPrice {
    type Params;
    fn put(params: &Self::Params) -> f64;
    fn call(params: &Self::Params) -> f64;

    fn price(params: &Self::Params, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => Self::call(params),
            OptionType::Put => Self::put(params),
        }
    }

    fn prices(params: &Self::Params) -> OptionPrices {
        OptionPrices {
            call: Self::call(params),
            put: Self::put(params),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionPrices {
    pub call: f64,
    pub put: f64,
}

impl OptionPrices {
    /// Deviation from put-call parity, `C - P - (S0 - K e^(-rT))`.
    pub fn parity_gap(&self, contract: &OptionContract) -> f64 {
        self.call - self.put - (contract.spot() - contract.strike() * discount_factor(contract))
    }
}

/// e^(-rT)
pub fn discount_factor(contract: &OptionContract) -> f64 {
    (-contract.rate() * contract.maturity()).exp()
}

/// European Put and Call option prices for stocks.
/// https://en.wikipedia.org/wiki/Black-Scholes_model
///
/// At expiry or with zero volatility the prices collapse to the intrinsic value.
pub struct BlackScholesMerton;

impl BlackScholesMerton {
    pub fn d1(contract: &OptionContract) -> Result<f64, DomainError> {
        non_degenerate(contract)?;
        Ok(d1_d2(contract).0)
    }

    pub fn d2(contract: &OptionContract) -> Result<f64, DomainError> {
        non_degenerate(contract)?;
        Ok(d1_d2(contract).1)
    }
}

pub(crate) fn non_degenerate(contract: &OptionContract) -> Result<(), DomainError> {
    if contract.is_degenerate() {
        return Err(DomainError::Singular {
            maturity: contract.maturity(),
            volatility: contract.volatility(),
        });
    }
    Ok(())
}

/// Unchecked; callers make sure `contract` is not degenerate.
pub(crate) fn d1_d2(contract: &OptionContract) -> (f64, f64) {
    let sigma_exp = contract.total_volatility();
    let d1 = ((contract.spot() / contract.strike()).ln()
        + (contract.rate() + contract.volatility().powi(2) / 2.0) * contract.maturity())
        / sigma_exp;
    let d2 = d1 - sigma_exp;
    (d1, d2)
}

fn intrinsic(contract: &OptionContract, option_type: OptionType) -> f64 {
    tracing::trace!(
        maturity = contract.maturity(),
        volatility = contract.volatility(),
        "degenerate contract, pricing at intrinsic value"
    );
    option_type.intrinsic_value(contract.spot(), contract.strike())
}

impl OptionPrice for BlackScholesMerton {
    type Params = OptionContract;

    fn call(contract: &OptionContract) -> f64 {
        if contract.is_degenerate() {
            return intrinsic(contract, OptionType::Call);
        }
        let (d1, d2) = d1_d2(contract);
        cdf(d1) * contract.spot() - cdf(d2) * contract.strike() * discount_factor(contract)
    }

    fn put(contract: &OptionContract) -> f64 {
        if contract.is_degenerate() {
            return intrinsic(contract, OptionType::Put);
        }
        let (d1, d2) = d1_d2(contract);
        cdf(-d2) * contract.strike() * discount_factor(contract) - cdf(-d1) * contract.spot()
    }
}
