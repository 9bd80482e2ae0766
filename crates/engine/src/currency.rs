use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// ISO-like currency code used as a balance key.
///
/// The ledger knows a fixed set of denominations, but balances may be kept in
/// any code: unknown codes are carried verbatim in [`Currency::Other`] and
/// convert at par with the reference currency (see [`RateTable::rate_of`]).
///
/// Codes are normalized (trimmed, upper-cased) on the way in, so `" usd"` and
/// `"USD"` name the same balance.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    Usd,
    Jpy,
    Eur,
    Btc,
    Eth,
    Matic,
    Other(String),
}

impl Currency {
    /// The currency every rate-table factor is expressed against.
    pub const REFERENCE: Currency = Currency::Usd;

    /// Canonical currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Currency::Usd => "USD",
            Currency::Jpy => "JPY",
            Currency::Eur => "EUR",
            Currency::Btc => "BTC",
            Currency::Eth => "ETH",
            Currency::Matic => "MATIC",
            Currency::Other(code) => code.as_str(),
        }
    }

    #[must_use]
    pub fn is_reference(&self) -> bool {
        *self == Self::REFERENCE
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.code())
    }
}

impl From<&str> for Currency {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "USD" => Currency::Usd,
            "JPY" => Currency::Jpy,
            "EUR" => Currency::Eur,
            "BTC" => Currency::Btc,
            "ETH" => Currency::Eth,
            "MATIC" => Currency::Matic,
            other => Currency::Other(other.to_string()),
        }
    }
}

impl From<String> for Currency {
    fn from(value: String) -> Self {
        Currency::from(value.as_str())
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.code().to_string()
    }
}

/// Static conversion table: currency → factor relative to [`Currency::REFERENCE`].
///
/// A factor `f` means `amount_in_reference = amount / f`, e.g. `JPY 130`
/// says 130 yen are worth one dollar.
///
/// The table is built once and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
    factors: BTreeMap<Currency, f64>,
}

impl Default for RateTable {
    fn default() -> Self {
        let factors = BTreeMap::from([
            (Currency::Jpy, 130.0),
            (Currency::Eur, 0.9),
            (Currency::Btc, 0.00005),
            (Currency::Eth, 0.001),
            (Currency::Matic, 1.5),
            (Currency::Usd, 1.0),
        ]);
        Self { factors }
    }
}

impl RateTable {
    /// Builds a table from explicit factors.
    ///
    /// The reference currency is always present with factor `1`; an attempt
    /// to give it another factor is rejected, as is any factor that is not a
    /// finite number `> 0`.
    pub fn new<I, C>(factors: I) -> ResultEngine<Self>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Currency>,
    {
        let mut table = BTreeMap::from([(Currency::REFERENCE, 1.0)]);
        for (currency, factor) in factors {
            let currency = currency.into();
            validate_factor(&currency, factor)?;
            table.insert(currency, factor);
        }
        Ok(Self { factors: table })
    }

    /// Returns the default table with `overrides` layered on top.
    pub fn with_overrides<I, C>(overrides: I) -> ResultEngine<Self>
    where
        I: IntoIterator<Item = (C, f64)>,
        C: Into<Currency>,
    {
        let defaults = Self::default().factors;
        let overrides: Vec<(Currency, f64)> = overrides
            .into_iter()
            .map(|(currency, factor)| (currency.into(), factor))
            .collect();
        Self::new(defaults.into_iter().chain(overrides))
    }

    /// Conversion factor for `currency`; unknown codes fall back to `1.0`.
    #[must_use]
    pub fn rate_of(&self, currency: &Currency) -> f64 {
        self.factors.get(currency).copied().unwrap_or(1.0)
    }

    /// Value of `amount` expressed in the reference currency.
    #[must_use]
    pub fn to_reference(&self, amount: f64, currency: &Currency) -> f64 {
        amount / self.rate_of(currency)
    }

    /// Amount of `currency` worth `value` units of the reference currency.
    #[must_use]
    pub fn from_reference(&self, value: f64, currency: &Currency) -> f64 {
        value * self.rate_of(currency)
    }

    /// Every currency with an explicit entry.
    pub fn known_currencies(&self) -> impl Iterator<Item = &Currency> {
        self.factors.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Currency, f64)> {
        self.factors.iter().map(|(currency, factor)| (currency, *factor))
    }
}

fn validate_factor(currency: &Currency, factor: f64) -> ResultEngine<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(EngineError::InvalidPrecondition(format!(
            "rate for {currency} must be a finite number > 0, got {factor}"
        )));
    }
    if currency.is_reference() && factor != 1.0 {
        return Err(EngineError::InvalidPrecondition(format!(
            "rate for reference currency {currency} is fixed at 1"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_normalized() {
        assert_eq!(Currency::from(" usd "), Currency::Usd);
        assert_eq!(Currency::from("matic"), Currency::Matic);
        assert_eq!(Currency::from("doge"), Currency::Other("DOGE".to_string()));
        assert_eq!(Currency::from("doge").to_string(), "DOGE");
    }

    #[test]
    fn unknown_currency_converts_at_par() {
        let rates = RateTable::default();
        assert_eq!(rates.rate_of(&Currency::from("XAU")), 1.0);
        assert_eq!(rates.to_reference(42.0, &Currency::from("XAU")), 42.0);
    }

    #[test]
    fn default_table_matches_known_rates() {
        let rates = RateTable::default();
        assert_eq!(rates.rate_of(&Currency::Usd), 1.0);
        assert_eq!(rates.rate_of(&Currency::Jpy), 130.0);
        assert_eq!(rates.rate_of(&Currency::Eur), 0.9);
        assert_eq!(rates.to_reference(260.0, &Currency::Jpy), 2.0);
        assert_eq!(rates.known_currencies().count(), 6);
    }

    #[test]
    fn overrides_extend_and_replace() {
        let rates = RateTable::with_overrides([("EUR", 0.8), ("GBP", 0.75)]).unwrap();
        assert_eq!(rates.rate_of(&Currency::Eur), 0.8);
        assert_eq!(rates.rate_of(&Currency::from("GBP")), 0.75);
        assert_eq!(rates.rate_of(&Currency::Jpy), 130.0);
    }

    #[test]
    fn rejects_invalid_factors() {
        assert!(RateTable::new([("EUR", 0.0)]).is_err());
        assert!(RateTable::new([("EUR", -1.0)]).is_err());
        assert!(RateTable::new([("EUR", f64::NAN)]).is_err());
        assert!(RateTable::new([("USD", 2.0)]).is_err());
        assert!(RateTable::new([("USD", 1.0)]).is_ok());
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&Currency::Eth).unwrap();
        assert_eq!(json, "\"ETH\"");
        let parsed: Currency = serde_json::from_str("\"sol\"").unwrap();
        assert_eq!(parsed, Currency::Other("SOL".to_string()));
    }
}
