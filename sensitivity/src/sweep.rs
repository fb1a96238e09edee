use pricing::{
    BlackScholesMerton, ContractParameter, Greek, Greeks, OptionContract, OptionPrice, OptionType,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SweepError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    #[default]
    Sequential,
    /// Samples are priced on the rayon thread pool; output order is unchanged.
    Parallel,
}

/// Re-prices a base contract across ranges of one or two of its inputs.
///
/// Every sample is priced from its own [`OptionContract`] built with
/// [`OptionContract::with`]; the base contract is only borrowed.
#[derive(Clone, Copy, Debug, Default)]
pub struct SweepEngine {
    evaluation: Evaluation,
}

/// Call and put price against one varying input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceSweep {
    pub parameter: ContractParameter,
    pub x_values: Vec<f64>,
    pub call_series: Vec<f64>,
    pub put_series: Vec<f64>,
}

impl PriceSweep {
    pub fn len(&self) -> usize {
        self.x_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }

    /// `(call, put)` per sample.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.call_series
            .iter()
            .copied()
            .zip(self.put_series.iter().copied())
    }
}

/// Call Greeks against one varying input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GreeksSweep {
    pub parameter: ContractParameter,
    pub x_values: Vec<f64>,
    pub greeks: Vec<Greeks>,
}

impl GreeksSweep {
    pub fn series(&self, greek: Greek) -> Vec<f64> {
        self.greeks.iter().map(|g| g.get(greek)).collect()
    }
}

/// Profit or loss at expiry of a long option bought at today's price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfitLossProfile {
    pub call_premium: f64,
    pub put_premium: f64,
    /// terminal spot prices
    pub x_values: Vec<f64>,
    pub call_profit: Vec<f64>,
    pub put_profit: Vec<f64>,
}

/// Validated contracts, one per sample, each differing from `base` only in `parameter`.
pub fn snapshots(
    base: &OptionContract,
    parameter: ContractParameter,
    samples: &[f64],
) -> Result<Vec<OptionContract>, SweepError> {
    if samples.is_empty() {
        return Err(SweepError::EmptyRange);
    }
    samples
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            base.with(parameter, value)
                .map_err(|source| SweepError::InvalidSample {
                    parameter,
                    index,
                    source,
                })
        })
        .collect()
}

impl SweepEngine {
    pub fn new(evaluation: Evaluation) -> Self {
        Self { evaluation }
    }

    pub fn sequential() -> Self {
        Self::new(Evaluation::Sequential)
    }

    pub fn parallel() -> Self {
        Self::new(Evaluation::Parallel)
    }

    pub fn evaluation(&self) -> Evaluation {
        self.evaluation
    }

    pub(crate) fn map<T, F>(&self, contracts: &[OptionContract], f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&OptionContract) -> T + Send + Sync,
    {
        match self.evaluation {
            Evaluation::Sequential => contracts.iter().map(f).collect(),
            Evaluation::Parallel => contracts.par_iter().map(f).collect(),
        }
    }

    pub fn price_sweep(
        &self,
        base: &OptionContract,
        parameter: ContractParameter,
        samples: &[f64],
    ) -> Result<PriceSweep, SweepError> {
        debug!(%parameter, points = samples.len(), evaluation = ?self.evaluation, "price sweep");
        let contracts = snapshots(base, parameter, samples)?;
        let (call_series, put_series): (Vec<f64>, Vec<f64>) = self
            .map(&contracts, |c| {
                let prices = BlackScholesMerton::prices(c);
                (prices.call, prices.put)
            })
            .into_iter()
            .unzip();

        Ok(PriceSweep {
            parameter,
            x_values: samples.to_vec(),
            call_series,
            put_series,
        })
    }

    /// Fails on the first degenerate sample, where the Greeks are singular.
    pub fn greeks_sweep(
        &self,
        base: &OptionContract,
        parameter: ContractParameter,
        samples: &[f64],
    ) -> Result<GreeksSweep, SweepError> {
        debug!(%parameter, points = samples.len(), evaluation = ?self.evaluation, "greeks sweep");
        let contracts = snapshots(base, parameter, samples)?;
        let greeks = self
            .map(&contracts, BlackScholesMerton::greeks)
            .into_iter()
            .enumerate()
            .map(|(index, greeks)| {
                greeks.map_err(|source| SweepError::InvalidSample {
                    parameter,
                    index,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GreeksSweep {
            parameter,
            x_values: samples.to_vec(),
            greeks,
        })
    }

    /// Premiums are priced once from `base`; each terminal spot only changes the payoff.
    pub fn profit_loss(
        &self,
        base: &OptionContract,
        terminal_spots: &[f64],
    ) -> Result<ProfitLossProfile, SweepError> {
        debug!(points = terminal_spots.len(), "profit/loss profile");
        let premiums = BlackScholesMerton::prices(base);
        let contracts = snapshots(base, ContractParameter::Spot, terminal_spots)?;
        let (call_profit, put_profit): (Vec<f64>, Vec<f64>) = self
            .map(&contracts, |c| {
                (
                    OptionType::Call.intrinsic_value(c.spot(), c.strike()) - premiums.call,
                    OptionType::Put.intrinsic_value(c.spot(), c.strike()) - premiums.put,
                )
            })
            .into_iter()
            .unzip();

        Ok(ProfitLossProfile {
            call_premium: premiums.call,
            put_premium: premiums.put,
            x_values: terminal_spots.to_vec(),
            call_profit,
            put_profit,
        })
    }
}
