use crate::{Account, Currency, ResultEngine, State};

use super::Engine;

impl Engine {
    /// Provision an empty account for `user`.
    ///
    /// Fails with `InvalidPrecondition` when the key is empty, reserved or
    /// already taken.
    pub fn open_account(&self, user: &str) -> ResultEngine<()> {
        self.write(|session| session.insert_account(user))?;
        tracing::info!("opened account {}", user.trim());
        Ok(())
    }

    /// Current state as seen by the store.
    pub fn snapshot(&self) -> ResultEngine<State> {
        self.store.get_state()
    }

    pub fn account(&self, user: &str) -> ResultEngine<Account> {
        Ok(self.store.get_state()?.account(user)?.clone())
    }

    pub fn balance(&self, user: &str, currency: &Currency) -> ResultEngine<f64> {
        self.store.get_state()?.balance(user, currency)
    }

    /// The reserve account, if an external transfer has created it.
    pub fn reserve(&self) -> ResultEngine<Option<Account>> {
        Ok(self.store.get_state()?.reserve().cloned())
    }
}
