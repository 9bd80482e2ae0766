use uuid::Uuid;

use crate::{EngineError, ExchangeCmd, ExchangeResult, ResultEngine};

use super::{Engine, ensure_positive};

impl Engine {
    /// Convert part of one balance into another currency on the same account.
    ///
    /// Exchanging a currency into itself leaves the balance alone but still
    /// contributes strain.
    pub fn exchange(&self, cmd: ExchangeCmd) -> ResultEngine<ExchangeResult> {
        let ExchangeCmd {
            user,
            from_currency,
            from_amount,
            to_currency,
        } = cmd;
        ensure_positive(from_amount, "exchange amount")?;

        let committed = self.write(|session| {
            let available = session.balance(&user, &from_currency)?;
            if available < from_amount {
                return Err(EngineError::InsufficientBalance(format!(
                    "{from_currency} balance {available} is lower than {from_amount}"
                )));
            }

            let reference_value = self.rates.to_reference(from_amount, &from_currency);
            let strain = self.strain_for(reference_value, self.strain.weights.exchange)?;
            if from_currency == to_currency {
                return Ok((reference_value, from_amount, strain));
            }

            let to_amount = self.rates.from_reference(reference_value, &to_currency);
            if !to_amount.is_finite() {
                return Err(EngineError::InvalidPrecondition(format!(
                    "{from_amount} {from_currency} does not fit in {to_currency}"
                )));
            }
            let account = session.account_mut(&user)?;
            account.debit(&from_currency, from_amount)?;
            account.credit(&to_currency, to_amount)?;
            Ok((reference_value, to_amount, strain))
        })?;
        let (reference_value, to_amount, strain) = committed.value;
        self.add_strain(strain);

        tracing::info!(
            "exchanged {from_amount} {from_currency} into {to_amount} {to_currency} for {user}"
        );
        Ok(ExchangeResult {
            transaction_id: Uuid::new_v4(),
            user,
            from_currency,
            from_amount,
            to_currency,
            to_amount,
            reference_value,
            strain,
            state: committed.state,
        })
    }
}
