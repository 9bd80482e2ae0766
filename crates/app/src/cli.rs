use clap::{Parser, Subcommand, ValueEnum};
use engine::TransferMode;

#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "Multi-currency ledger: mint, exchange and transfer balances")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long, env = "TALLY_CONFIG")]
    pub config: Option<String>,

    /// Override the state file path.
    #[arg(long)]
    pub state: Option<String>,

    /// Print results as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision an empty account.
    Open { user: String },
    /// Credit an amount to an existing account.
    Mint {
        user: String,
        currency: String,
        amount: f64,
    },
    /// Convert part of a balance into another currency.
    Exchange {
        user: String,
        from: String,
        amount: f64,
        to: String,
    },
    /// Move reference currency to another account or out of the ledger.
    Transfer {
        sender: String,
        recipient: String,
        amount: f64,
        #[arg(long, value_enum, default_value_t = Mode::Internal)]
        mode: Mode,
    },
    /// Show the balances of an account.
    Balance { user: String },
    /// Show the rate table.
    Rates,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Internal,
    External,
    Atm,
}

impl From<Mode> for TransferMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Internal => TransferMode::Internal,
            Mode::External => TransferMode::External,
            Mode::Atm => TransferMode::Atm,
        }
    }
}
