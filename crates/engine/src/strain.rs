//! Strain: transactional friction damped by the output level.
//!
//! Every ledger operation contributes `(reference_value * weight) / output_level`
//! to a process-wide [`StrainAccumulator`]. The weight depends on the kind of
//! operation, the output level comes from an [`OutputLevelSource`] queried
//! once per operation.

use std::sync::{Mutex, PoisonError};

use crate::{EngineError, ResultEngine};

/// Receives strain contributions. There is no way to take strain back.
pub trait StrainAccumulator: Send + Sync {
    fn add_strain(&self, amount: f64);
}

/// Supplies the current output level, which must be strictly positive.
pub trait OutputLevelSource: Send + Sync {
    fn output_level(&self) -> f64;
}

impl<F> OutputLevelSource for F
where
    F: Fn() -> f64 + Send + Sync,
{
    fn output_level(&self) -> f64 {
        self()
    }
}

/// An output level that never changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedOutputLevel(pub f64);

impl OutputLevelSource for FixedOutputLevel {
    fn output_level(&self) -> f64 {
        self.0
    }
}

/// In-process accumulator.
#[derive(Debug, Default)]
pub struct StrainGauge {
    total: Mutex<f64>,
}

impl StrainGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strain accumulated so far.
    pub fn total(&self) -> f64 {
        *self.total.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StrainAccumulator for StrainGauge {
    fn add_strain(&self, amount: f64) {
        *self.total.lock().unwrap_or_else(PoisonError::into_inner) += amount;
    }
}

/// Per-operation weights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrainWeights {
    pub mint: f64,
    pub exchange: f64,
    pub internal_transfer: f64,
    pub external_transfer: f64,
}

pub const MINT_WEIGHT: f64 = 0.005;
pub const EXCHANGE_WEIGHT: f64 = 0.001;
pub const INTERNAL_TRANSFER_WEIGHT: f64 = 0.00001;
pub const EXTERNAL_TRANSFER_WEIGHT: f64 = 0.001;

impl Default for StrainWeights {
    fn default() -> Self {
        Self {
            mint: MINT_WEIGHT,
            exchange: EXCHANGE_WEIGHT,
            internal_transfer: INTERNAL_TRANSFER_WEIGHT,
            external_transfer: EXTERNAL_TRANSFER_WEIGHT,
        }
    }
}

/// `(reference_value * weight) / output_level`.
///
/// Fails with [`EngineError::InvalidPrecondition`] when `output_level` is not
/// a finite number `> 0` or when the contribution itself is not finite.
pub fn strain_contribution(
    reference_value: f64,
    output_level: f64,
    weight: f64,
) -> ResultEngine<f64> {
    if !output_level.is_finite() || output_level <= 0.0 {
        return Err(EngineError::InvalidPrecondition(format!(
            "output level must be > 0, got {output_level}"
        )));
    }
    let contribution = (reference_value * weight) / output_level;
    if !contribution.is_finite() {
        return Err(EngineError::InvalidPrecondition(format!(
            "strain for value {reference_value} is not finite"
        )));
    }
    Ok(contribution)
}

/// Binds the weights to the accumulator and output-level collaborators.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StrainModel {
    pub weights: StrainWeights,
}

impl StrainModel {
    pub fn new(weights: StrainWeights) -> Self {
        Self { weights }
    }

    /// Queries `source` and computes the contribution for `reference_value`.
    pub fn contribution(
        &self,
        source: &dyn OutputLevelSource,
        reference_value: f64,
        weight: f64,
    ) -> ResultEngine<f64> {
        strain_contribution(reference_value, source.output_level(), weight)
    }

    pub fn forward(&self, accumulator: &dyn StrainAccumulator, contribution: f64) {
        tracing::debug!("adding strain {contribution}");
        accumulator.add_strain(contribution);
    }
}
