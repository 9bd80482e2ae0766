//! Multi-currency account ledger.
//!
//! The [`Engine`] applies mint, exchange and transfer operations to a state
//! snapshot owned by a [`StateStore`], converting through a static
//! [`RateTable`] and feeding a [`StrainAccumulator`] with the friction each
//! operation produces. Transfers leaving the ledger withhold a reserve share
//! and return a [`ComplianceRecord`].
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use engine::{Currency, Engine, FixedOutputLevel, MemoryStore, MintCmd, StrainGauge};
//!
//! let gauge = Arc::new(StrainGauge::new());
//! let engine = Engine::builder()
//!     .store(Arc::new(MemoryStore::default()))
//!     .accumulator(gauge.clone())
//!     .output_level(Arc::new(FixedOutputLevel(1.0)))
//!     .build()
//!     .unwrap();
//!
//! engine.open_account("alice").unwrap();
//! let minted = engine.mint(MintCmd::new("alice", "USD", 50.0)).unwrap();
//! assert_eq!(minted.balance, 50.0);
//! assert_eq!(engine.balance("alice", &Currency::Usd).unwrap(), 50.0);
//! assert!(gauge.total() > 0.0);
//! ```

pub use accounts::{Account, RESERVE_ACCOUNT, State};
pub use commands::{ExchangeCmd, MintCmd, TransferCmd};
pub use compliance::{
    ComplianceRecord, LedgerType, RESERVE_RATIO, generate_metadata, generate_metadata_at,
    reserve_split,
};
pub use currency::{Currency, RateTable};
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder, MissingRecipient};
pub use store::{FileStore, MemoryStore, Session, StateStore};
pub use strain::{
    FixedOutputLevel, OutputLevelSource, StrainAccumulator, StrainGauge, StrainModel,
    StrainWeights, strain_contribution,
};
pub use transactions::{ExchangeResult, MintResult, TransferMode, TransferResult, TransferStatus};

mod accounts;
mod commands;
pub mod compliance;
mod currency;
mod error;
mod ops;
mod store;
pub mod strain;
mod transactions;

pub type ResultEngine<T> = Result<T, EngineError>;
