//! State stores and the session used to mutate a snapshot.
//!
//! The engine never owns account state. A [`StateStore`] hands out a full
//! snapshot on [`get_state`](StateStore::get_state) and replaces its contents
//! on [`update_state`](StateStore::update_state); a [`Session`] wraps one such
//! snapshot for the lifetime of a single operation and makes the commit an
//! explicit step.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use crate::{Account, Currency, ResultEngine, State};

/// Snapshot-based storage for the ledger state.
///
/// `get_state` must return a value the caller can mutate freely; nothing is
/// visible to other readers until `update_state` is called with it. Writes
/// replace the whole state (last writer wins).
pub trait StateStore: Send + Sync {
    fn get_state(&self) -> ResultEngine<State>;
    fn update_state(&self, state: State) -> ResultEngine<()>;
}

/// Keeps the state in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new(state: State) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl StateStore for MemoryStore {
    fn get_state(&self) -> ResultEngine<State> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn update_state(&self, state: State) -> ResultEngine<()> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        Ok(())
    }
}

/// Keeps the state as a JSON document on disk.
///
/// A missing file reads as an empty state. Writes go to a sibling temporary
/// file first and are renamed over the target.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStore {
    fn get_state(&self) -> ResultEngine<State> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(State::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn update_state(&self, state: State) -> ResultEngine<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&state)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// One snapshot in flight.
///
/// Created by reading the store once; dropping it without calling
/// [`commit`](Session::commit) discards every change.
pub struct Session<'s> {
    store: &'s dyn StateStore,
    state: State,
}

impl<'s> Session<'s> {
    pub fn open(store: &'s dyn StateStore) -> ResultEngine<Self> {
        let state = store.get_state()?;
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn account(&self, user: &str) -> ResultEngine<&Account> {
        self.state.account(user)
    }

    pub fn account_mut(&mut self, user: &str) -> ResultEngine<&mut Account> {
        self.state.account_mut(user)
    }

    pub fn has_account(&self, user: &str) -> bool {
        self.state.contains(user)
    }

    pub fn balance(&self, user: &str, currency: &Currency) -> ResultEngine<f64> {
        self.state.balance(user, currency)
    }

    pub fn set_balance(&mut self, user: &str, currency: Currency, amount: f64) -> ResultEngine<()> {
        self.state.account_mut(user)?.set_balance(currency, amount);
        Ok(())
    }

    pub fn insert_account(&mut self, user: &str) -> ResultEngine<()> {
        self.state.insert_account(user)?;
        Ok(())
    }

    pub fn reserve_mut<'a>(
        &mut self,
        currencies: impl IntoIterator<Item = &'a Currency>,
    ) -> &mut Account {
        self.state.reserve_mut(currencies)
    }

    /// Hands the snapshot back to the store and returns a copy of what was
    /// written.
    pub fn commit(self) -> ResultEngine<State> {
        self.store.update_state(self.state.clone())?;
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn temp_path() -> PathBuf {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_stores");
        root.join(format!("store_{}.json", Uuid::new_v4()))
    }

    #[test]
    fn dropped_session_leaves_store_untouched() {
        let store = MemoryStore::default();
        {
            let mut session = Session::open(&store).unwrap();
            session.insert_account("alice").unwrap();
        }
        assert!(store.get_state().unwrap().accounts.is_empty());

        let mut session = Session::open(&store).unwrap();
        session.insert_account("alice").unwrap();
        session.set_balance("alice", Currency::Usd, 5.0).unwrap();
        session.commit().unwrap();
        assert_eq!(
            store.get_state().unwrap().balance("alice", &Currency::Usd).unwrap(),
            5.0
        );
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let store = FileStore::new(temp_path());
        assert_eq!(store.get_state().unwrap(), State::default());
    }

    #[test]
    fn file_store_persists_snapshots() {
        let path = temp_path();
        let store = FileStore::new(&path);

        let mut state = State::default();
        state
            .insert_account("bob")
            .unwrap()
            .credit(&Currency::Eur, 12.5)
            .unwrap();
        store.update_state(state.clone()).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get_state().unwrap(), state);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn file_store_reports_corrupt_json() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"{not json").unwrap();

        let err = FileStore::new(&path).get_state().unwrap_err();
        assert!(matches!(err, crate::EngineError::Json(_)));

        fs::remove_file(path).unwrap();
    }
}
