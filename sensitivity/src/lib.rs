pub mod error;
pub mod grid;
pub mod samples;
pub mod sweep;

pub use error::SweepError;
pub use grid::{GridAxis, PriceGrid};
pub use samples::SampleRange;
pub use sweep::{Evaluation, GreeksSweep, PriceSweep, ProfitLossProfile, SweepEngine};
