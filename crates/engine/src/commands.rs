//! Command structs for engine operations.
//!
//! These types group parameters for write operations (mint/exchange/transfer),
//! keeping call sites readable and avoiding long argument lists.

use crate::{Currency, TransferMode};

/// Credit `amount` of `currency` to an existing account.
#[derive(Clone, Debug)]
pub struct MintCmd {
    pub user: String,
    pub currency: Currency,
    pub amount: f64,
}

impl MintCmd {
    #[must_use]
    pub fn new(user: impl Into<String>, currency: impl Into<Currency>, amount: f64) -> Self {
        Self {
            user: user.into(),
            currency: currency.into(),
            amount,
        }
    }
}

/// Convert `from_amount` of `from_currency` into `to_currency` on one account.
#[derive(Clone, Debug)]
pub struct ExchangeCmd {
    pub user: String,
    pub from_currency: Currency,
    pub from_amount: f64,
    pub to_currency: Currency,
}

impl ExchangeCmd {
    #[must_use]
    pub fn new(
        user: impl Into<String>,
        from_currency: impl Into<Currency>,
        from_amount: f64,
        to_currency: impl Into<Currency>,
    ) -> Self {
        Self {
            user: user.into(),
            from_currency: from_currency.into(),
            from_amount,
            to_currency: to_currency.into(),
        }
    }
}

/// Move `amount` of the reference currency away from `sender`.
///
/// Defaults to an internal transfer; see [`TransferCmd::mode`].
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
    pub mode: TransferMode,
}

impl TransferCmd {
    #[must_use]
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
            mode: TransferMode::Internal,
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: TransferMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn external(self) -> Self {
        self.mode(TransferMode::External)
    }

    #[must_use]
    pub fn atm(self) -> Self {
        self.mode(TransferMode::Atm)
    }
}
