//! Accounts and the state snapshot that holds them.
//!
//! An [`Account`] maps currency codes to non-negative balances. A [`State`] is
//! the full collection of accounts as handed out by a
//! [`StateStore`](crate::StateStore): the engine mutates a snapshot and gives
//! it back for commit, it never keeps one around.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, ResultEngine};

/// Key of the account collecting the reserve split of external transfers.
pub const RESERVE_ACCOUNT: &str = "Tax_Archive";

/// Per-user balances, one entry per currency ever touched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Account {
    balances: BTreeMap<Currency, f64>,
}

impl Account {
    pub fn new() -> Self {
        Self::default()
    }

    /// An account with an explicit `0` entry for each of `currencies`.
    pub fn zeroed<'a>(currencies: impl IntoIterator<Item = &'a Currency>) -> Self {
        Self {
            balances: currencies
                .into_iter()
                .map(|currency| (currency.clone(), 0.0))
                .collect(),
        }
    }

    /// Balance held in `currency`; a missing entry reads as `0`.
    #[must_use]
    pub fn balance(&self, currency: &Currency) -> f64 {
        self.balances.get(currency).copied().unwrap_or(0.0)
    }

    pub fn set_balance(&mut self, currency: Currency, amount: f64) {
        self.balances.insert(currency, amount);
    }

    /// Adds `amount` to the `currency` balance and returns the new balance.
    ///
    /// Fails with [`EngineError::InvalidPrecondition`] without touching the
    /// account when the result would not be a finite number.
    pub fn credit(&mut self, currency: &Currency, amount: f64) -> ResultEngine<f64> {
        let balance = self.balance(currency) + amount;
        if !balance.is_finite() {
            return Err(EngineError::InvalidPrecondition(format!(
                "{currency} balance would overflow: {} + {amount}",
                self.balance(currency)
            )));
        }
        self.balances.insert(currency.clone(), balance);
        Ok(balance)
    }

    /// Removes `amount` from the `currency` balance.
    ///
    /// Fails with [`EngineError::InsufficientBalance`] without touching the
    /// account when the balance is lower than `amount`.
    pub fn debit(&mut self, currency: &Currency, amount: f64) -> ResultEngine<()> {
        let current = self.balance(currency);
        if current < amount {
            return Err(EngineError::InsufficientBalance(format!(
                "{currency} balance {current} is lower than {amount}"
            )));
        }
        self.balances.insert(currency.clone(), current - amount);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Currency, f64)> {
        self.balances.iter().map(|(currency, amount)| (currency, *amount))
    }
}

/// Every account known to the ledger, keyed by user.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub accounts: BTreeMap<String, Account>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, user: &str) -> bool {
        self.accounts.contains_key(account_key(user))
    }

    pub fn account(&self, user: &str) -> ResultEngine<&Account> {
        let user = account_key(user);
        self.accounts
            .get(user)
            .ok_or_else(|| EngineError::AccountNotFound(user.to_string()))
    }

    pub fn account_mut(&mut self, user: &str) -> ResultEngine<&mut Account> {
        let user = account_key(user);
        self.accounts
            .get_mut(user)
            .ok_or_else(|| EngineError::AccountNotFound(user.to_string()))
    }

    /// Balance of `user` in `currency`, `0` for a missing entry.
    pub fn balance(&self, user: &str, currency: &Currency) -> ResultEngine<f64> {
        Ok(self.account(user)?.balance(currency))
    }

    /// Adds an empty account for `user`.
    pub fn insert_account(&mut self, user: &str) -> ResultEngine<&mut Account> {
        let user = account_key(user);
        if user.is_empty() {
            return Err(EngineError::InvalidPrecondition(
                "account key must not be empty".to_string(),
            ));
        }
        if user == RESERVE_ACCOUNT {
            return Err(EngineError::InvalidPrecondition(format!(
                "account key {RESERVE_ACCOUNT} is reserved"
            )));
        }
        if self.accounts.contains_key(user) {
            return Err(EngineError::InvalidPrecondition(format!(
                "account {user} already exists"
            )));
        }
        Ok(self.accounts.entry(user.to_string()).or_default())
    }

    /// The reserve account, created with zeroed `currencies` on first use.
    pub fn reserve_mut<'a>(
        &mut self,
        currencies: impl IntoIterator<Item = &'a Currency>,
    ) -> &mut Account {
        self.accounts
            .entry(RESERVE_ACCOUNT.to_string())
            .or_insert_with(|| Account::zeroed(currencies))
    }

    #[must_use]
    pub fn reserve(&self) -> Option<&Account> {
        self.accounts.get(RESERVE_ACCOUNT)
    }
}

/// Account keys are compared with surrounding whitespace removed.
fn account_key(user: &str) -> &str {
    user.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_balance_reads_as_zero() {
        let account = Account::new();
        assert_eq!(account.balance(&Currency::Eur), 0.0);
    }

    #[test]
    fn debit_rejects_overdraft_without_mutation() {
        let mut account = Account::new();
        account.credit(&Currency::Usd, 10.0).unwrap();
        let err = account.debit(&Currency::Usd, 10.5).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientBalance(_)));
        assert_eq!(account.balance(&Currency::Usd), 10.0);

        account.debit(&Currency::Usd, 10.0).unwrap();
        assert_eq!(account.balance(&Currency::Usd), 0.0);
    }

    #[test]
    fn credit_refuses_to_overflow() {
        let mut account = Account::new();
        assert_eq!(account.credit(&Currency::Usd, 1e308).unwrap(), 1e308);
        let err = account.credit(&Currency::Usd, 1e308).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPrecondition(_)));
        assert_eq!(account.balance(&Currency::Usd), 1e308);
    }

    #[test]
    fn insert_account_guards_keys() {
        let mut state = State::new();
        state.insert_account("alice").unwrap();
        assert!(state.insert_account("alice").is_err());
        assert!(state.insert_account("  ").is_err());
        assert!(state.insert_account(RESERVE_ACCOUNT).is_err());
        assert!(state.contains("alice"));
    }

    #[test]
    fn lookups_ignore_surrounding_whitespace() {
        let mut state = State::new();
        state.insert_account(" bob ").unwrap();
        assert!(state.contains("bob"));
        assert!(state.contains(" bob"));
        state.account_mut("bob\t").unwrap().credit(&Currency::Usd, 4.0).unwrap();
        assert_eq!(state.balance("  bob", &Currency::Usd).unwrap(), 4.0);

        let err = state.account(" carol ").unwrap_err();
        assert_eq!(err, EngineError::AccountNotFound("carol".to_string()));
    }

    #[test]
    fn reserve_is_zeroed_once() {
        let mut state = State::new();
        let currencies = [Currency::Usd, Currency::Eur];
        state.reserve_mut(&currencies).credit(&Currency::Usd, 2.0).unwrap();
        state.reserve_mut(&currencies).credit(&Currency::Usd, 3.0).unwrap();

        let reserve = state.reserve().unwrap();
        assert_eq!(reserve.balance(&Currency::Usd), 5.0);
        assert_eq!(reserve.iter().count(), 2);
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = State::new();
        state
            .insert_account("alice")
            .unwrap()
            .credit(&Currency::Jpy, 1300.0)
            .unwrap();

        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"accounts":{"alice":{"JPY":1300.0}}}"#);
        let back: State = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
