use std::sync::Arc;

use clap::Parser;
use engine::{
    Engine, ExchangeCmd, FileStore, FixedOutputLevel, MintCmd, StrainGauge, TransferCmd,
};
use serde::Serialize;

use crate::{
    cli::{Cli, Command},
    error::Result,
    settings::Settings,
};

mod cli;
mod error;
mod report;
mod settings;

fn main() {
    let cli = Cli::parse();
    let settings = match Settings::new(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to load settings: {err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tally={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli, settings) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, settings: Settings) -> Result<()> {
    let state_path = cli
        .state
        .unwrap_or_else(|| settings.ledger.state_path.clone());
    tracing::debug!("using state file {state_path}");

    let engine = Engine::builder()
        .store(Arc::new(FileStore::new(state_path)))
        .rates(settings.ledger.rate_table()?)
        .accumulator(Arc::new(StrainGauge::new()))
        .output_level(Arc::new(FixedOutputLevel(settings.ledger.output_level)))
        .missing_recipient(settings.ledger.missing_recipient)
        .build()?;

    let json = cli.json;
    match cli.command {
        Command::Open { user } => {
            engine.open_account(&user)?;
            let account = engine.account(user.trim())?;
            emit(json, &account, || report::balances(user.trim(), &account))?;
        }
        Command::Mint {
            user,
            currency,
            amount,
        } => {
            let result = engine.mint(MintCmd::new(user, currency.as_str(), amount))?;
            emit(json, &result, || report::mint(&result))?;
        }
        Command::Exchange {
            user,
            from,
            amount,
            to,
        } => {
            let result =
                engine.exchange(ExchangeCmd::new(user, from.as_str(), amount, to.as_str()))?;
            emit(json, &result, || report::exchange(&result))?;
        }
        Command::Transfer {
            sender,
            recipient,
            amount,
            mode,
        } => {
            let result =
                engine.transfer(TransferCmd::new(sender, recipient, amount).mode(mode.into()))?;
            emit(json, &result, || report::transfer(&result))?;
        }
        Command::Balance { user } => {
            let account = engine.account(&user)?;
            emit(json, &account, || report::balances(&user, &account))?;
        }
        Command::Rates => {
            let rates: Vec<(String, f64)> = engine
                .rates()
                .iter()
                .map(|(currency, factor)| (currency.to_string(), factor))
                .collect();
            emit(json, &rates, || report::rates(engine.rates()))?;
        }
    }

    Ok(())
}

/// Print `value` as JSON or as the text produced by `text`.
fn emit<T, F>(json: bool, value: &T, text: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}
