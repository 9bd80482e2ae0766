use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    EngineError, OutputLevelSource, RateTable, ResultEngine, Session, State, StateStore,
    StrainAccumulator, StrainModel, StrainWeights,
};

mod accounts;
mod exchange;
mod mint;
mod transfer;

pub use transfer::MissingRecipient;

/// The ledger engine.
///
/// Every write reads the whole state once, validates, mutates the snapshot and
/// commits it once. Writes are serialized behind a single lock held from the
/// read to the commit: the store replaces the whole snapshot on each commit,
/// so two interleaved writes would lose one of them even when they touch
/// different accounts.
///
/// Strain is forwarded to the accumulator only after the commit succeeded.
pub struct Engine {
    store: Arc<dyn StateStore>,
    rates: RateTable,
    strain: StrainModel,
    accumulator: Arc<dyn StrainAccumulator>,
    output_level: Arc<dyn OutputLevelSource>,
    missing_recipient: MissingRecipient,
    commit_lock: Mutex<()>,
}

/// Value produced by a write together with the state it committed.
struct Committed<T> {
    value: T,
    state: State,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn missing_recipient(&self) -> MissingRecipient {
        self.missing_recipient
    }

    /// Run `op` on a fresh snapshot, committing on success and discarding the
    /// snapshot on error.
    fn write<T, F>(&self, op: F) -> ResultEngine<Committed<T>>
    where
        F: FnOnce(&mut Session<'_>) -> ResultEngine<T>,
    {
        let _guard = self
            .commit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut session = Session::open(self.store.as_ref())?;
        let value = op(&mut session)?;
        let state = session.commit()?;
        Ok(Committed { value, state })
    }

    /// Query the output level and weigh `reference_value`.
    fn strain_for(&self, reference_value: f64, weight: f64) -> ResultEngine<f64> {
        self.strain
            .contribution(self.output_level.as_ref(), reference_value, weight)
    }

    fn add_strain(&self, contribution: f64) {
        self.strain.forward(self.accumulator.as_ref(), contribution);
    }
}

fn ensure_positive(amount: f64, label: &str) -> ResultEngine<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::InvalidPrecondition(format!(
            "{label} must be > 0, got {amount}"
        )));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn StateStore>>,
    rates: Option<RateTable>,
    weights: Option<StrainWeights>,
    accumulator: Option<Arc<dyn StrainAccumulator>>,
    output_level: Option<Arc<dyn OutputLevelSource>>,
    missing_recipient: MissingRecipient,
}

impl EngineBuilder {
    /// Pass the required state store
    pub fn store(mut self, store: Arc<dyn StateStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Override the default rate table
    pub fn rates(mut self, rates: RateTable) -> EngineBuilder {
        self.rates = Some(rates);
        self
    }

    /// Override the default strain weights
    pub fn weights(mut self, weights: StrainWeights) -> EngineBuilder {
        self.weights = Some(weights);
        self
    }

    /// Pass the required strain accumulator
    pub fn accumulator(mut self, accumulator: Arc<dyn StrainAccumulator>) -> EngineBuilder {
        self.accumulator = Some(accumulator);
        self
    }

    /// Pass the required output-level source
    pub fn output_level(mut self, source: Arc<dyn OutputLevelSource>) -> EngineBuilder {
        self.output_level = Some(source);
        self
    }

    /// Choose what an internal transfer does when the recipient has no account
    pub fn missing_recipient(mut self, policy: MissingRecipient) -> EngineBuilder {
        self.missing_recipient = policy;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let missing = |what: &str| EngineError::InvalidPrecondition(format!("missing {what}"));
        Ok(Engine {
            store: self.store.ok_or_else(|| missing("state store"))?,
            rates: self.rates.unwrap_or_default(),
            strain: StrainModel::new(self.weights.unwrap_or_default()),
            accumulator: self.accumulator.ok_or_else(|| missing("strain accumulator"))?,
            output_level: self
                .output_level
                .ok_or_else(|| missing("output level source"))?,
            missing_recipient: self.missing_recipient,
            commit_lock: Mutex::new(()),
        })
    }
}
