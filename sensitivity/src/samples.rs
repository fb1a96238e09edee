use ndarray::Array1;
use pricing::OptionContract;
use serde::{Deserialize, Serialize};

use crate::error::SweepError;

/// Lowest spot or strike a price band will sample.
pub const PRICE_FLOOR: f64 = 0.01;
/// Shortest maturity of the time decay curve; the closed form has no value at T = 0.
pub const MATURITY_FLOOR: f64 = 0.01;

pub const CURVE_POINTS: usize = 100;
pub const GRID_POINTS: usize = 50;

/// Evenly spaced samples over `[low, high]`, both ends included.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    pub low: f64,
    pub high: f64,
    pub points: usize,
}

impl SampleRange {
    pub fn new(low: f64, high: f64, points: usize) -> Self {
        Self { low, high, points }
    }

    /// `center ± half_width`, floored at [`PRICE_FLOOR`].
    pub fn around(center: f64, half_width: f64, points: usize) -> Self {
        Self::new(
            (center - half_width).max(PRICE_FLOOR),
            center + half_width,
            points,
        )
    }

    /// Terminal spot prices for the profit/loss curves.
    pub fn spot_band(contract: &OptionContract) -> Self {
        Self::around(contract.spot(), 50.0, CURVE_POINTS)
    }

    /// Strike axis of the price heat map.
    pub fn strike_band(contract: &OptionContract) -> Self {
        Self::around(contract.spot(), 25.0, GRID_POINTS)
    }

    /// Remaining life from almost expired up to the contract's maturity.
    pub fn time_decay(contract: &OptionContract) -> Self {
        Self::new(MATURITY_FLOOR, contract.maturity(), CURVE_POINTS)
    }

    pub fn volatility_curve() -> Self {
        Self::new(0.05, 1.0, CURVE_POINTS)
    }

    pub fn volatility_axis() -> Self {
        Self::new(0.05, 1.0, GRID_POINTS)
    }

    pub fn linspace(&self) -> Result<Vec<f64>, SweepError> {
        if self.points == 0 {
            return Err(SweepError::EmptyRange);
        }
        if !self.low.is_finite() || !self.high.is_finite() || self.high < self.low {
            return Err(SweepError::InvalidRange {
                low: self.low,
                high: self.high,
            });
        }
        Ok(Array1::linspace(self.low, self.high, self.points).to_vec())
    }
}
