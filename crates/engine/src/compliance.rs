//! Metadata and reserve split for transfers leaving the ledger.
//!
//! External and ATM transfers hand a record shaped like a bank transfer
//! message to whoever settles them outside the ledger. The record is purely
//! structural: nothing here checks it against a real clearing system.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{Currency, TransferMode};

/// Fraction of an external or ATM transfer kept in the reserve account.
pub const RESERVE_RATIO: f64 = 0.10;

const HASH_LEN: usize = 12;
const COMPLIANCE_STATUS: &str = "VERIFIED_BY_MSGAI_CORE";
const LEGAL_FOOTPRINT: &str = "ALIGNED_WITH_SOLAR_RATIO";
const MIMICRY_PROTOCOL: &str = "ISO_20022_COMPATIBLE";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerType {
    CashDispenseReady,
    ExternalBankTransfer,
}

impl LedgerType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CashDispenseReady => "CASH_DISPENSE_READY",
            Self::ExternalBankTransfer => "EXTERNAL_BANK_TRANSFER",
        }
    }
}

impl From<TransferMode> for LedgerType {
    fn from(mode: TransferMode) -> Self {
        match mode {
            TransferMode::Atm => Self::CashDispenseReady,
            TransferMode::Internal | TransferMode::External => Self::ExternalBankTransfer,
        }
    }
}

/// Record attached to the result of an external or ATM transfer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub transaction_auth_id: String,
    pub compliance_status: String,
    pub ledger_type: LedgerType,
    pub legal_footprint: String,
    pub amount_iso: String,
    pub currency_iso: Currency,
    pub mimicry_protocol: String,
    pub issued_at: DateTime<Utc>,
}

/// Ratio of `amount` withheld for `mode`: nothing for internal transfers.
#[must_use]
pub fn reserve_ratio(mode: TransferMode) -> f64 {
    match mode {
        TransferMode::Internal => 0.0,
        TransferMode::External | TransferMode::Atm => RESERVE_RATIO,
    }
}

/// Splits `amount` into `(tax, net)`; `tax + net == amount` up to float
/// precision.
#[must_use]
pub fn reserve_split(amount: f64, mode: TransferMode) -> (f64, f64) {
    let tax = amount * reserve_ratio(mode);
    (tax, amount - tax)
}

/// Builds the record for a transfer of `amount` to `recipient`, stamped now.
#[must_use]
pub fn generate_metadata(amount: f64, recipient: &str, mode: TransferMode) -> ComplianceRecord {
    generate_metadata_at(amount, recipient, mode, Utc::now())
}

/// Same as [`generate_metadata`] with an explicit timestamp.
///
/// The authorization id embeds the first 12 characters of the base64 encoding
/// of amount, recipient and timestamp. Collisions are possible and accepted.
#[must_use]
pub fn generate_metadata_at(
    amount: f64,
    recipient: &str,
    mode: TransferMode,
    issued_at: DateTime<Utc>,
) -> ComplianceRecord {
    let timestamp = issued_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let encoded = STANDARD.encode(format!("LOGOS_{amount}_{recipient}_{timestamp}"));
    let hash: String = encoded.chars().take(HASH_LEN).collect();

    ComplianceRecord {
        transaction_auth_id: format!("AUTH-{hash}"),
        compliance_status: COMPLIANCE_STATUS.to_string(),
        ledger_type: mode.into(),
        legal_footprint: LEGAL_FOOTPRINT.to_string(),
        amount_iso: two_decimals(amount),
        currency_iso: Currency::REFERENCE,
        mimicry_protocol: MIMICRY_PROTOCOL.to_string(),
        issued_at,
    }
}

/// Fixed two-decimal rendering where exact ties round away from zero.
fn two_decimals(amount: f64) -> String {
    // The only binary values sitting exactly on a third-decimal tie are odd
    // multiples of 1/8.
    let eighths = amount * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        let cents = (amount * 100.0).abs().ceil().copysign(amount);
        return format!("{:.2}", cents / 100.0);
    }
    format!("{amount:.2}")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn split_withholds_ten_percent_outside_the_ledger() {
        assert_eq!(reserve_split(20.0, TransferMode::External), (2.0, 18.0));
        assert_eq!(reserve_split(20.0, TransferMode::Atm), (2.0, 18.0));
        assert_eq!(reserve_split(20.0, TransferMode::Internal), (0.0, 20.0));
    }

    #[test]
    fn split_parts_add_up() {
        for amount in [0.01, 1.0, 3.33, 99.99, 12_345.678] {
            let (tax, net) = reserve_split(amount, TransferMode::External);
            assert_eq!(tax, amount * RESERVE_RATIO);
            assert!((tax + net - amount).abs() <= f64::EPSILON * amount);
        }
    }

    #[test]
    fn record_fields() {
        let record = generate_metadata_at(18.0, "external-1", TransferMode::External, fixed_time());
        assert!(record.transaction_auth_id.starts_with("AUTH-"));
        assert_eq!(record.transaction_auth_id.len(), "AUTH-".len() + 12);
        assert_eq!(record.compliance_status, "VERIFIED_BY_MSGAI_CORE");
        assert_eq!(record.ledger_type, LedgerType::ExternalBankTransfer);
        assert_eq!(record.amount_iso, "18.00");
        assert_eq!(record.currency_iso, Currency::Usd);
        assert_eq!(record.mimicry_protocol, "ISO_20022_COMPATIBLE");
    }

    #[test]
    fn atm_records_are_cash_dispense() {
        let record = generate_metadata_at(9.5, "atm-7", TransferMode::Atm, fixed_time());
        assert_eq!(record.ledger_type, LedgerType::CashDispenseReady);
        assert_eq!(record.amount_iso, "9.50");
    }

    #[test]
    fn amount_ties_round_up() {
        assert_eq!(two_decimals(1.125), "1.13");
        assert_eq!(two_decimals(0.125), "0.13");
        assert_eq!(two_decimals(2.375), "2.38");
        assert_eq!(two_decimals(0.5), "0.50");
        // 1.005 is stored just below the tie.
        assert_eq!(two_decimals(1.005), "1.00");
        assert_eq!(two_decimals(1.126), "1.13");

        let record = generate_metadata_at(1.125, "bank", TransferMode::External, fixed_time());
        assert_eq!(record.amount_iso, "1.13");
    }

    #[test]
    fn auth_id_is_deterministic_for_a_timestamp() {
        let a = generate_metadata_at(18.0, "external-1", TransferMode::External, fixed_time());
        let b = generate_metadata_at(18.0, "external-1", TransferMode::External, fixed_time());
        assert_eq!(a, b);

        // "LOGOS_18_ex" encodes to "TE9HT1NfMThf".
        assert_eq!(a.transaction_auth_id, "AUTH-TE9HT1NfMThf");
    }

    #[test]
    fn ledger_type_serializes_screaming() {
        let json = serde_json::to_string(&LedgerType::CashDispenseReady).unwrap();
        assert_eq!(json, format!("\"{}\"", LedgerType::CashDispenseReady.as_str()));
    }
}
