//! Transaction primitives.
//!
//! Ledger operations are not persisted as records: what a caller gets back is
//! one of the result types below, built once the new state has been committed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ComplianceRecord, Currency, EngineError, State};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferMode {
    /// Between two accounts of this ledger.
    #[default]
    Internal,
    /// To a recipient outside the ledger.
    External,
    /// Cash withdrawal.
    Atm,
}

impl TransferMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "INTERNAL",
            Self::External => "EXTERNAL",
            Self::Atm => "ATM",
        }
    }

    /// `true` for modes whose value leaves the ledger.
    pub fn is_external(self) -> bool {
        !matches!(self, Self::Internal)
    }
}

impl TryFrom<&str> for TransferMode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INTERNAL" => Ok(Self::Internal),
            "EXTERNAL" => Ok(Self::External),
            "ATM" => Ok(Self::Atm),
            other => Err(EngineError::InvalidPrecondition(format!(
                "invalid transfer mode: {other}"
            ))),
        }
    }
}

impl core::fmt::Display for TransferMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    /// Every leg of the transfer was applied.
    Settled,
    /// Internal transfer whose recipient has no account: the sender was
    /// debited and nobody was credited.
    Unclaimed,
}

impl TransferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Settled => "SETTLED",
            Self::Unclaimed => "UNCLAIMED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MintResult {
    pub transaction_id: Uuid,
    pub user: String,
    pub currency: Currency,
    pub amount: f64,
    /// Balance of `currency` after the mint.
    pub balance: f64,
    pub strain: f64,
    pub state: State,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExchangeResult {
    pub transaction_id: Uuid,
    pub user: String,
    pub from_currency: Currency,
    pub from_amount: f64,
    pub to_currency: Currency,
    pub to_amount: f64,
    /// `from_amount` expressed in the reference currency.
    pub reference_value: f64,
    pub strain: f64,
    pub state: State,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransferResult {
    pub transaction_id: Uuid,
    pub success: bool,
    pub mode: TransferMode,
    pub net_amount: f64,
    pub tax_amount: f64,
    pub mimic_data: Option<ComplianceRecord>,
    pub status: TransferStatus,
    pub strain: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parsing() {
        assert_eq!(TransferMode::try_from("atm").unwrap(), TransferMode::Atm);
        assert_eq!(
            TransferMode::try_from(" External ").unwrap(),
            TransferMode::External
        );
        assert!(TransferMode::try_from("wire").is_err());
    }

    #[test]
    fn only_internal_stays_inside() {
        assert!(!TransferMode::Internal.is_external());
        assert!(TransferMode::External.is_external());
        assert!(TransferMode::Atm.is_external());
    }

    #[test]
    fn status_serializes_as_tag() {
        assert_eq!(
            serde_json::to_string(&TransferStatus::Unclaimed).unwrap(),
            "\"UNCLAIMED\""
        );
    }
}
