pub mod analytic;
pub mod common;

pub use analytic::black_scholes::{BlackScholesMerton, OptionPrice, OptionPrices};
pub use analytic::greeks::{Greek, Greeks};
pub use common::error::DomainError;
pub use common::models::{ContractParameter, OptionContract, OptionType};
