use uuid::Uuid;

use crate::{MintCmd, MintResult, ResultEngine};

use super::{Engine, ensure_positive};

impl Engine {
    /// Credit `cmd.amount` of `cmd.currency` to an existing account.
    ///
    /// The credited amount is never converted; the rate table only feeds the
    /// strain computation.
    pub fn mint(&self, cmd: MintCmd) -> ResultEngine<MintResult> {
        let MintCmd {
            user,
            currency,
            amount,
        } = cmd;
        ensure_positive(amount, "mint amount")?;

        let committed = self.write(|session| {
            session.account(&user)?;
            let reference_value = self.rates.to_reference(amount, &currency);
            let strain = self.strain_for(reference_value, self.strain.weights.mint)?;

            let balance = session.account_mut(&user)?.credit(&currency, amount)?;
            Ok((balance, strain))
        })?;
        let (balance, strain) = committed.value;
        self.add_strain(strain);

        tracing::info!("minted {amount} {currency} for {user}, balance {balance}");
        Ok(MintResult {
            transaction_id: Uuid::new_v4(),
            user,
            currency,
            amount,
            balance,
            strain,
            state: committed.state,
        })
    }
}
