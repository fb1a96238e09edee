use pricing::{
    BlackScholesMerton, ContractParameter, Greeks, OptionContract, OptionPrice, OptionPrices,
};
use sensitivity::samples::MATURITY_FLOOR;
use sensitivity::{PriceGrid, PriceSweep, ProfitLossProfile, SampleRange, SweepEngine, SweepError};
use serde::Serialize;
use tracing::warn;

/// Everything the pricing dashboard renders for one contract.
#[derive(Debug, Serialize)]
pub struct Report {
    pub contract: OptionContract,
    pub prices: OptionPrices,
    /// absent at expiry or zero volatility
    pub greeks: Option<Greeks>,
    pub profit_loss: ProfitLossProfile,
    /// absent when the contract expires before the shortest sampled maturity
    pub time_decay: Option<PriceSweep>,
    pub volatility_curve: PriceSweep,
    pub heat_map: PriceGrid,
}

impl Report {
    pub fn build(contract: &OptionContract, engine: &SweepEngine) -> Result<Self, SweepError> {
        let greeks = match BlackScholesMerton::greeks(contract) {
            Ok(greeks) => Some(greeks),
            Err(e) => {
                warn!("no greeks: {e}");
                None
            }
        };

        let spots = SampleRange::spot_band(contract).linspace()?;
        let profit_loss = engine.profit_loss(contract, &spots)?;

        let time_decay = if contract.maturity() >= MATURITY_FLOOR {
            let maturities = SampleRange::time_decay(contract).linspace()?;
            Some(engine.price_sweep(contract, ContractParameter::Maturity, &maturities)?)
        } else {
            warn!(
                maturity = contract.maturity(),
                "maturity below {MATURITY_FLOOR}, no time decay curve"
            );
            None
        };

        let volas = SampleRange::volatility_curve().linspace()?;
        let volatility_curve = engine.price_sweep(contract, ContractParameter::Volatility, &volas)?;

        Ok(Self {
            contract: *contract,
            prices: BlackScholesMerton::prices(contract),
            greeks,
            profit_loss,
            time_decay,
            volatility_curve,
            heat_map: engine.strike_volatility_grid(contract)?,
        })
    }
}
