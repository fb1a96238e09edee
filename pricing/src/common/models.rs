use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::error::DomainError;

/// The five inputs of the Black-Scholes-Merton model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractParameter {
    Spot,
    Strike,
    Maturity,
    Rate,
    Volatility,
}

impl ContractParameter {
    pub const ALL: [ContractParameter; 5] = [
        ContractParameter::Spot,
        ContractParameter::Strike,
        ContractParameter::Maturity,
        ContractParameter::Rate,
        ContractParameter::Volatility,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContractParameter::Spot => "spot",
            ContractParameter::Strike => "strike",
            ContractParameter::Maturity => "maturity",
            ContractParameter::Rate => "rate",
            ContractParameter::Volatility => "volatility",
        }
    }
}

impl fmt::Display for ContractParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// The payoff if exercised immediately (or at expiry with terminal price `spot`).
    pub fn intrinsic_value(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

/// A European option under the Black-Scholes-Merton model.
///
/// The value is immutable: a changed input means a new contract, see [`OptionContract::with`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawContract")]
pub struct OptionContract {
    /// the underlying's price today (S0)
    spot: f64,
    /// the strike or exercise price (K)
    strike: f64,
    /// time to expiration in years (T)
    maturity: f64,
    /// the annualized, continuously compounded risk-free rate (r)
    rate: f64,
    /// the annualized standard deviation of the underlying's log-returns (sigma)
    volatility: f64,
}

impl OptionContract {
    pub fn new(
        spot: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        volatility: f64,
    ) -> Result<Self, DomainError> {
        positive(ContractParameter::Spot, spot)?;
        positive(ContractParameter::Strike, strike)?;
        non_negative(ContractParameter::Maturity, maturity)?;
        finite(ContractParameter::Rate, rate)?;
        non_negative(ContractParameter::Volatility, volatility)?;

        Ok(Self {
            spot,
            strike,
            maturity,
            rate,
            volatility,
        })
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    pub fn get(&self, parameter: ContractParameter) -> f64 {
        match parameter {
            ContractParameter::Spot => self.spot,
            ContractParameter::Strike => self.strike,
            ContractParameter::Maturity => self.maturity,
            ContractParameter::Rate => self.rate,
            ContractParameter::Volatility => self.volatility,
        }
    }

    /// A new, validated contract equal to `self` except for `parameter`.
    pub fn with(&self, parameter: ContractParameter, value: f64) -> Result<Self, DomainError> {
        // works on a copy, `self` is never touched
        let mut next = *self;
        match parameter {
            ContractParameter::Spot => next.spot = value,
            ContractParameter::Strike => next.strike = value,
            ContractParameter::Maturity => next.maturity = value,
            ContractParameter::Rate => next.rate = value,
            ContractParameter::Volatility => next.volatility = value,
        }
        Self::new(
            next.spot,
            next.strike,
            next.maturity,
            next.rate,
            next.volatility,
        )
    }

    pub fn with_spot(&self, spot: f64) -> Result<Self, DomainError> {
        self.with(ContractParameter::Spot, spot)
    }

    pub fn with_strike(&self, strike: f64) -> Result<Self, DomainError> {
        self.with(ContractParameter::Strike, strike)
    }

    pub fn with_maturity(&self, maturity: f64) -> Result<Self, DomainError> {
        self.with(ContractParameter::Maturity, maturity)
    }

    pub fn with_rate(&self, rate: f64) -> Result<Self, DomainError> {
        self.with(ContractParameter::Rate, rate)
    }

    pub fn with_volatility(&self, volatility: f64) -> Result<Self, DomainError> {
        self.with(ContractParameter::Volatility, volatility)
    }

    /// The closed form divides by sigma * sqrt(T); this is true whenever that is zero,
    /// including tiny maturities and volatilities whose product underflows.
    pub fn is_degenerate(&self) -> bool {
        self.total_volatility() == 0.0
    }

    /// sigma * sqrt(T)
    pub fn total_volatility(&self) -> f64 {
        self.volatility * self.maturity.sqrt()
    }
}

#[derive(Deserialize)]
struct RawContract {
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
}

impl TryFrom<RawContract> for OptionContract {
    type Error = DomainError;

    fn try_from(raw: RawContract) -> Result<Self, Self::Error> {
        OptionContract::new(raw.spot, raw.strike, raw.maturity, raw.rate, raw.volatility)
    }
}

fn finite(parameter: ContractParameter, value: f64) -> Result<(), DomainError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DomainError::NotFinite { parameter, value })
    }
}

fn positive(parameter: ContractParameter, value: f64) -> Result<(), DomainError> {
    finite(parameter, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(DomainError::NonPositive { parameter, value })
    }
}

fn non_negative(parameter: ContractParameter, value: f64) -> Result<(), DomainError> {
    finite(parameter, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(DomainError::Negative { parameter, value })
    }
}
