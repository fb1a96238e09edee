mod args;
mod report;

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use pricing::{BlackScholesMerton, OptionPrice};
use serde::Serialize;
use tracing::info;

use crate::args::{Cli, Command};
use crate::report::Report;

fn main() -> anyhow::Result<()> {
    // before parsing, so BSM_* variables from .env feed the flags
    dotenvy::dotenv().ok();

    // stdout carries the JSON, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let contract = cli.contract.contract().context("invalid contract")?;
    let engine = cli.engine();
    info!(
        spot = contract.spot(),
        strike = contract.strike(),
        maturity = contract.maturity(),
        rate = contract.rate(),
        volatility = contract.volatility(),
        evaluation = ?engine.evaluation(),
        "pricing contract"
    );

    match &cli.command {
        Command::Price => emit(&BlackScholesMerton::prices(&contract), cli.pretty),
        Command::Greeks => {
            let greeks = BlackScholesMerton::greeks(&contract).context("greeks unavailable")?;
            emit(&greeks, cli.pretty)
        }
        Command::Sweep(sweep) => {
            let samples = sweep.range(&contract).linspace()?;
            let result = engine.price_sweep(&contract, sweep.parameter, &samples)?;
            emit(&result, cli.pretty)
        }
        Command::GreeksSweep(sweep) => {
            let samples = sweep.range(&contract).linspace()?;
            let result = engine.greeks_sweep(&contract, sweep.parameter, &samples)?;
            emit(&result, cli.pretty)
        }
        Command::Grid => emit(&engine.strike_volatility_grid(&contract)?, cli.pretty),
        Command::Pnl => {
            let spots = sensitivity::SampleRange::spot_band(&contract).linspace()?;
            emit(&engine.profit_loss(&contract, &spots)?, cli.pretty)
        }
        Command::Report => emit(&Report::build(&contract, &engine)?, cli.pretty),
    }
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
