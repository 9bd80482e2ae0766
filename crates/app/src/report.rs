//! Human-readable rendering of ledger results.

use engine::{Account, ExchangeResult, MintResult, RateTable, TransferResult, TransferStatus};

pub fn mint(result: &MintResult) -> String {
    format!(
        "minted {:.2} {} for {} (balance {:.2} {}, strain +{:.6})",
        result.amount,
        result.currency,
        result.user,
        result.balance,
        result.currency,
        result.strain
    )
}

pub fn exchange(result: &ExchangeResult) -> String {
    format!(
        "{} exchanged {:.2} {} into {:.2} {} (worth {:.2} USD, strain +{:.6})",
        result.user,
        result.from_amount,
        result.from_currency,
        result.to_amount,
        result.to_currency,
        result.reference_value,
        result.strain
    )
}

pub fn transfer(result: &TransferResult) -> String {
    let mut lines = vec![format!(
        "{} transfer {}: net {:.2} USD, reserve {:.2} USD (strain +{:.6})",
        result.mode,
        result.status.as_str(),
        result.net_amount,
        result.tax_amount,
        result.strain
    )];
    if result.status == TransferStatus::Unclaimed {
        lines.push("recipient has no account: nothing was credited".to_string());
    }
    if let Some(record) = &result.mimic_data {
        lines.push(format!(
            "{} {} {} {} ({})",
            record.transaction_auth_id,
            record.ledger_type.as_str(),
            record.amount_iso,
            record.currency_iso,
            record.compliance_status
        ));
    }
    lines.join("\n")
}

pub fn balances(user: &str, account: &Account) -> String {
    let mut lines = vec![format!("{user}:")];
    lines.extend(
        account
            .iter()
            .map(|(currency, amount)| format!("  {currency:<6} {amount:>16.6}")),
    );
    if lines.len() == 1 {
        lines.push("  (no balances)".to_string());
    }
    lines.join("\n")
}

pub fn rates(rates: &RateTable) -> String {
    rates
        .iter()
        .map(|(currency, factor)| format!("{currency:<6} {factor}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use engine::{Currency, TransferMode};

    use super::*;

    #[test]
    fn unclaimed_transfer_is_called_out() {
        let result = TransferResult {
            transaction_id: Default::default(),
            success: true,
            mode: TransferMode::Internal,
            net_amount: 10.0,
            tax_amount: 0.0,
            mimic_data: None,
            status: TransferStatus::Unclaimed,
            strain: 0.0001,
        };
        let text = transfer(&result);
        assert!(text.starts_with("INTERNAL transfer UNCLAIMED: net 10.00 USD"));
        assert!(text.contains("nothing was credited"));
    }

    #[test]
    fn empty_account_has_placeholder() {
        assert_eq!(balances("bob", &Account::new()), "bob:\n  (no balances)");

        let mut account = Account::new();
        account.credit(&Currency::Eur, 1.5).unwrap();
        assert!(balances("bob", &account).contains("EUR"));
    }
}
