//! Handles settings for the application. Configuration is read from an
//! optional TOML file (`config/tally.toml` unless `--config` says otherwise)
//! and from `TALLY__*` environment variables, e.g.
//! `TALLY__LEDGER__OUTPUT_LEVEL=2.5`.
use std::collections::HashMap;

use config::{Config, Environment, File};
use engine::{MissingRecipient, RateTable};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config/tally";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    /// Log level for the `tally` and `engine` targets.
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Ledger {
    /// JSON file holding the ledger state.
    pub state_path: String,
    /// Output level handed to the strain model for every operation.
    pub output_level: f64,
    pub missing_recipient: MissingRecipient,
    /// Extra or replacement factors layered over the built-in rate table.
    pub rates: HashMap<String, f64>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            state_path: "tally.json".to_string(),
            output_level: 1.0,
            missing_recipient: MissingRecipient::default(),
            rates: HashMap::new(),
        }
    }
}

impl Ledger {
    pub fn rate_table(&self) -> Result<RateTable> {
        Ok(RateTable::with_overrides(
            self.rates
                .iter()
                .map(|(code, factor)| (code.as_str(), *factor)),
        )?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub ledger: Ledger,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(false))
            .add_source(Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use engine::Currency;

    use super::*;

    #[test]
    fn defaults_without_sources() {
        let settings: Settings = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.ledger.output_level, 1.0);
        assert_eq!(settings.ledger.missing_recipient, MissingRecipient::Debit);
        assert_eq!(settings.ledger.rate_table().unwrap(), RateTable::default());
    }

    #[test]
    fn reads_toml_overrides() {
        let toml = r#"
            [app]
            level = "debug"

            [ledger]
            state_path = "/tmp/ledger.json"
            output_level = 2.5
            missing_recipient = "reject"

            [ledger.rates]
            GBP = 0.75
        "#;
        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.ledger.output_level, 2.5);
        assert_eq!(settings.ledger.missing_recipient, MissingRecipient::Reject);
        let rates = settings.ledger.rate_table().unwrap();
        assert_eq!(rates.rate_of(&Currency::from("GBP")), 0.75);
    }

    #[test]
    fn rejects_invalid_rates() {
        let mut ledger = Ledger::default();
        ledger.rates.insert("EUR".to_string(), 0.0);
        assert!(ledger.rate_table().is_err());
    }
}
