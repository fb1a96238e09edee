use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analytic::black_scholes::{
    cdf, d1_d2, discount_factor, non_degenerate, pdf, BlackScholesMerton,
};
use crate::common::error::DomainError;
use crate::common::models::OptionContract;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Greek {
    Delta,
    Gamma,
    Vega,
    Theta,
    Rho,
}

impl Greek {
    pub const ALL: [Greek; 5] = [
        Greek::Delta,
        Greek::Gamma,
        Greek::Vega,
        Greek::Theta,
        Greek::Rho,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Greek::Delta => "delta",
            Greek::Gamma => "gamma",
            Greek::Vega => "vega",
            Greek::Theta => "theta",
            Greek::Rho => "rho",
        }
    }
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sensitivities of the call price.
/// https://en.wikipedia.org/wiki/Greeks_(finance)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// dC/dS
    pub delta: f64,
    /// d²C/dS²
    pub gamma: f64,
    /// dC/dsigma
    pub vega: f64,
    /// time decay, per year
    pub theta: f64,
    /// dC/dr
    pub rho: f64,
}

impl Greeks {
    pub fn get(&self, greek: Greek) -> f64 {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Vega => self.vega,
            Greek::Theta => self.theta,
            Greek::Rho => self.rho,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Greek, f64)> + '_ {
        Greek::ALL.into_iter().map(move |greek| (greek, self.get(greek)))
    }
}

// Put-side Greeks are not provided; a put consumer needs Delta - 1 and its own Theta and Rho.
impl BlackScholesMerton {
    /// Fails at degenerate points and wherever a sensitivity is not finite.
    pub fn greeks(contract: &OptionContract) -> Result<Greeks, DomainError> {
        non_degenerate(contract)?;
        let (d1, d2) = d1_d2(contract);
        let greeks = Greeks {
            delta: delta(d1),
            gamma: gamma(contract, d1),
            vega: vega(contract, d1),
            theta: theta(contract, d1, d2),
            rho: rho(contract, d2),
        };
        if greeks.iter().any(|(_, value)| !value.is_finite()) {
            return Err(DomainError::Singular {
                maturity: contract.maturity(),
                volatility: contract.volatility(),
            });
        }
        Ok(greeks)
    }

    pub fn greek(contract: &OptionContract, greek: Greek) -> Result<f64, DomainError> {
        Self::greeks(contract).map(|greeks| greeks.get(greek))
    }

    pub fn delta(contract: &OptionContract) -> Result<f64, DomainError> {
        Self::greek(contract, Greek::Delta)
    }

    pub fn gamma(contract: &OptionContract) -> Result<f64, DomainError> {
        Self::greek(contract, Greek::Gamma)
    }

    pub fn vega(contract: &OptionContract) -> Result<f64, DomainError> {
        Self::greek(contract, Greek::Vega)
    }

    pub fn theta(contract: &OptionContract) -> Result<f64, DomainError> {
        Self::greek(contract, Greek::Theta)
    }

    pub fn rho(contract: &OptionContract) -> Result<f64, DomainError> {
        Self::greek(contract, Greek::Rho)
    }
}

fn delta(d1: f64) -> f64 {
    cdf(d1)
}

fn gamma(c: &OptionContract, d1: f64) -> f64 {
    pdf(d1) / (c.spot() * c.total_volatility())
}

fn vega(c: &OptionContract, d1: f64) -> f64 {
    c.spot() * pdf(d1) * c.maturity().sqrt()
}

fn theta(c: &OptionContract, d1: f64, d2: f64) -> f64 {
    -(c.spot() * pdf(d1) * c.volatility()) / (2.0 * c.maturity().sqrt())
        - c.rate() * c.strike() * discount_factor(c) * cdf(d2)
}

fn rho(c: &OptionContract, d2: f64) -> f64 {
    c.strike() * c.maturity() * discount_factor(c) * cdf(d2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic::black_scholes::OptionPrice;
    use assert_approx_eq::assert_approx_eq;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-4;
    const BUMP: f64 = 1e-4;

    fn atm() -> OptionContract {
        OptionContract::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap()
    }

    #[test]
    fn textbook_greeks() {
        // d1 = 0.35, d2 = 0.15
        let greeks = BlackScholesMerton::greeks(&atm()).unwrap();
        assert_approx_eq!(greeks.delta, 0.636831, TOLERANCE);
        assert_approx_eq!(greeks.gamma, 0.018762, TOLERANCE);
        assert_approx_eq!(greeks.vega, 37.524035, TOLERANCE);
        assert_approx_eq!(greeks.theta, -6.414028, TOLERANCE);
        assert_approx_eq!(greeks.rho, 53.232482, TOLERANCE);
    }

    #[test]
    fn single_greeks_match_record() {
        let c = OptionContract::new(310.0, 250.0, 3.5, 0.05, 0.25).unwrap();
        let greeks = BlackScholesMerton::greeks(&c).unwrap();
        assert_eq!(BlackScholesMerton::delta(&c).unwrap(), greeks.delta);
        assert_eq!(BlackScholesMerton::gamma(&c).unwrap(), greeks.gamma);
        assert_eq!(BlackScholesMerton::vega(&c).unwrap(), greeks.vega);
        assert_eq!(BlackScholesMerton::theta(&c).unwrap(), greeks.theta);
        assert_eq!(BlackScholesMerton::rho(&c).unwrap(), greeks.rho);

        let listed: Vec<Greek> = greeks.iter().map(|(greek, _)| greek).collect();
        assert_eq!(listed, Greek::ALL.to_vec());
    }

    #[test]
    fn greeks_match_finite_differences() {
        let c = atm();
        let greeks = BlackScholesMerton::greeks(&c).unwrap();
        let central = |up: OptionContract, down: OptionContract| {
            (BlackScholesMerton::call(&up) - BlackScholesMerton::call(&down)) / (2.0 * BUMP)
        };

        let delta = central(
            c.with_spot(c.spot() + BUMP).unwrap(),
            c.with_spot(c.spot() - BUMP).unwrap(),
        );
        assert_approx_eq!(greeks.delta, delta, 1e-5);

        let vega = central(
            c.with_volatility(c.volatility() + BUMP).unwrap(),
            c.with_volatility(c.volatility() - BUMP).unwrap(),
        );
        assert_approx_eq!(greeks.vega, vega, 1e-3);

        let rho = central(
            c.with_rate(c.rate() + BUMP).unwrap(),
            c.with_rate(c.rate() - BUMP).unwrap(),
        );
        assert_approx_eq!(greeks.rho, rho, 1e-3);

        // theta is the decay as calendar time passes, i.e. -dC/dT
        let theta = -central(
            c.with_maturity(c.maturity() + BUMP).unwrap(),
            c.with_maturity(c.maturity() - BUMP).unwrap(),
        );
        assert_approx_eq!(greeks.theta, theta, 1e-3);
    }

    #[test]
    fn degenerate_contracts_have_no_greeks() {
        let expired = atm().with_maturity(0.0).unwrap();
        assert_eq!(
            BlackScholesMerton::greeks(&expired),
            Err(DomainError::Singular {
                maturity: 0.0,
                volatility: 0.2
            })
        );

        let flat = atm().with_volatility(0.0).unwrap();
        for greek in Greek::ALL {
            assert!(BlackScholesMerton::greek(&flat, greek).is_err());
        }
    }

    #[test]
    fn underflowing_total_volatility_has_no_greeks() {
        for strike in [100.0, 90.0] {
            let tiny = OptionContract::new(100.0, strike, 1e-250, 0.0, 1e-200).unwrap();
            assert!(matches!(
                BlackScholesMerton::greeks(&tiny),
                Err(DomainError::Singular { .. })
            ));
            assert!(BlackScholesMerton::gamma(&tiny).is_err());
        }
    }

    #[test]
    fn overflowing_gamma_is_singular() {
        // sigma * sqrt(T) is subnormal, gamma's denominator underflows to zero
        let c = OptionContract::new(1.0, 1.0, 1e-300, 0.0, 1e-160).unwrap();
        assert!(!c.is_degenerate());
        assert!(BlackScholesMerton::greeks(&c).is_err());
    }

    proptest! {
        #[test]
        fn delta_is_a_probability(
            spot in 1.0..500.0f64,
            strike in 1.0..500.0f64,
            maturity in 0.001..5.0f64,
            rate in 0.0..1.0f64,
            vola in 0.001..1.0f64,
        ) {
            let c = OptionContract::new(spot, strike, maturity, rate, vola).unwrap();
            let greeks = BlackScholesMerton::greeks(&c).unwrap();
            prop_assert!((0.0..=1.0).contains(&greeks.delta));
            prop_assert!(greeks.gamma >= 0.0 && greeks.vega >= 0.0 && greeks.rho >= 0.0);
            prop_assert!(greeks.iter().all(|(_, value)| value.is_finite()));
        }
    }
}
