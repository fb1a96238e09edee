use clap::{Args, Parser, Subcommand};
use pricing::{ContractParameter, DomainError, OptionContract};
use sensitivity::samples::{SampleRange, CURVE_POINTS};
use sensitivity::{Evaluation, SweepEngine};

#[derive(Parser, Debug)]
#[command(
    name = "bsm",
    version,
    about = "Black-Scholes-Merton prices, Greeks and sensitivity sweeps as JSON"
)]
pub struct Cli {
    #[command(flatten)]
    pub contract: ContractArgs,

    /// Evaluate sweep samples on all cores.
    #[arg(long, global = true, env = "BSM_PARALLEL")]
    pub parallel: bool,

    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn engine(&self) -> SweepEngine {
        if self.parallel {
            SweepEngine::new(Evaluation::Parallel)
        } else {
            SweepEngine::new(Evaluation::Sequential)
        }
    }
}

/// Contract inputs, with the same limits as the pricing dashboard.
#[derive(Args, Debug, Clone, Copy)]
pub struct ContractArgs {
    /// Spot price S0
    #[arg(long, env = "BSM_SPOT", default_value_t = 100.0, value_parser = at_least_one)]
    pub spot: f64,
    /// Strike price K
    #[arg(long, env = "BSM_STRIKE", default_value_t = 100.0, value_parser = at_least_one)]
    pub strike: f64,
    /// Time to maturity T in years
    #[arg(long, env = "BSM_MATURITY", default_value_t = 1.0, value_parser = non_negative)]
    pub maturity: f64,
    /// Risk-free rate r
    #[arg(long, env = "BSM_RATE", default_value_t = 0.05, value_parser = unit_interval)]
    pub rate: f64,
    /// Volatility sigma
    #[arg(long, env = "BSM_VOLATILITY", default_value_t = 0.2, value_parser = unit_interval)]
    pub volatility: f64,
}

impl ContractArgs {
    pub fn contract(&self) -> Result<OptionContract, DomainError> {
        OptionContract::new(
            self.spot,
            self.strike,
            self.maturity,
            self.rate,
            self.volatility,
        )
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Call and put price
    Price,
    /// Call Greeks
    Greeks,
    /// Call and put price against one input
    Sweep(SweepArgs),
    /// Call Greeks against one input
    GreeksSweep(SweepArgs),
    /// Call prices over strike (rows) and volatility (columns)
    Grid,
    /// Profit or loss at expiry against the terminal spot
    Pnl,
    /// Everything the dashboard shows, in one document
    Report,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct SweepArgs {
    /// The input to vary
    #[arg(long, value_parser = parse_parameter)]
    pub parameter: ContractParameter,
    /// Lowest sample, defaults per parameter
    #[arg(long)]
    pub low: Option<f64>,
    /// Highest sample, defaults per parameter
    #[arg(long)]
    pub high: Option<f64>,
    /// Number of samples
    #[arg(long)]
    pub points: Option<usize>,
}

impl SweepArgs {
    /// The dashboard's range for the parameter, overridden by any explicit flag.
    pub fn range(&self, contract: &OptionContract) -> SampleRange {
        let preset = match self.parameter {
            ContractParameter::Spot | ContractParameter::Strike => SampleRange::spot_band(contract),
            ContractParameter::Maturity => SampleRange::time_decay(contract),
            ContractParameter::Rate => SampleRange::new(0.0, 1.0, CURVE_POINTS),
            ContractParameter::Volatility => SampleRange::volatility_curve(),
        };
        SampleRange::new(
            self.low.unwrap_or(preset.low),
            self.high.unwrap_or(preset.high),
            self.points.unwrap_or(preset.points),
        )
    }
}

fn parse_parameter(s: &str) -> Result<ContractParameter, String> {
    ContractParameter::ALL
        .into_iter()
        .find(|parameter| parameter.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| {
            let names: Vec<&str> = ContractParameter::ALL.iter().map(|p| p.name()).collect();
            format!("unknown parameter {s}, expected one of: {}", names.join(", "))
        })
}

fn parse_f64(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{s} is not a finite number"))
    }
}

fn at_least_one(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;
    if value >= 1.0 {
        Ok(value)
    } else {
        Err(format!("{value} is below 1.0"))
    }
}

fn non_negative(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is negative"))
    }
}

fn unit_interval(s: &str) -> Result<f64, String> {
    let value = parse_f64(s)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside [0, 1]"))
    }
}
