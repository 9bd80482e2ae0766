use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, EngineError, ResultEngine, TransferCmd, TransferMode, TransferResult,
    TransferStatus, compliance,
};

use super::{Engine, ensure_positive};

/// What an internal transfer does when the recipient has no account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRecipient {
    /// Debit the sender anyway and credit nobody. The value is lost and the
    /// result is tagged [`TransferStatus::Unclaimed`].
    #[default]
    Debit,
    /// Fail with `AccountNotFound` before touching any balance.
    Reject,
}

impl Engine {
    /// Move `cmd.amount` of the reference currency away from `cmd.sender`.
    ///
    /// - internal: the recipient account is credited with the full amount, if
    ///   it exists (see [`MissingRecipient`]);
    /// - external/ATM: the reserve share is credited to the reserve account,
    ///   the rest leaves the ledger and is described by the compliance record.
    pub fn transfer(&self, cmd: TransferCmd) -> ResultEngine<TransferResult> {
        let TransferCmd {
            sender,
            recipient,
            amount,
            mode,
        } = cmd;
        ensure_positive(amount, "transfer amount")?;
        let reference = Currency::REFERENCE;

        let committed = self.write(|session| {
            let available = session.balance(&sender, &reference)?;
            if available < amount {
                return Err(EngineError::InsufficientBalance(format!(
                    "{reference} balance {available} is lower than {amount}"
                )));
            }
            let recipient_known = session.has_account(&recipient);
            if mode == TransferMode::Internal
                && !recipient_known
                && self.missing_recipient == MissingRecipient::Reject
            {
                return Err(EngineError::AccountNotFound(recipient.clone()));
            }

            let (tax_amount, net_amount) = compliance::reserve_split(amount, mode);
            let weight = if mode.is_external() {
                self.strain.weights.external_transfer
            } else {
                self.strain.weights.internal_transfer
            };
            let strain = self.strain_for(self.rates.to_reference(amount, &reference), weight)?;

            session.account_mut(&sender)?.debit(&reference, amount)?;
            let status = match mode {
                TransferMode::Internal if recipient_known => {
                    session.account_mut(&recipient)?.credit(&reference, amount)?;
                    TransferStatus::Settled
                }
                TransferMode::Internal => TransferStatus::Unclaimed,
                TransferMode::External | TransferMode::Atm => {
                    session
                        .reserve_mut(self.rates.known_currencies())
                        .credit(&reference, tax_amount)?;
                    TransferStatus::Settled
                }
            };
            Ok((net_amount, tax_amount, status, strain))
        })?;
        let (net_amount, tax_amount, status, strain) = committed.value;
        self.add_strain(strain);

        let mimic_data = mode
            .is_external()
            .then(|| compliance::generate_metadata(net_amount, &recipient, mode));

        match status {
            TransferStatus::Settled => tracing::info!(
                "{mode} transfer of {amount} from {sender} to {recipient}: net {net_amount}, reserve {tax_amount}"
            ),
            TransferStatus::Unclaimed => tracing::warn!(
                "internal transfer of {amount} from {sender}: recipient {recipient} has no account, nothing credited"
            ),
        }

        Ok(TransferResult {
            transaction_id: Uuid::new_v4(),
            success: true,
            mode,
            net_amount,
            tax_amount,
            mimic_data,
            status,
            strain,
        })
    }
}
