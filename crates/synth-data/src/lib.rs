//! Synthetic data for ContractSynth cases
//!
//! Everything random in this crate is drawn from one [`SeededRandom`]
//! threaded explicitly through the call chain, so a seed fully determines
//! the generated contract and the bank statement built on top of it.

pub mod error;
pub mod generator;
pub mod pools;
pub mod reconcile;
pub mod rng;
pub mod statement;

pub use error::SynthError;
pub use generator::{generate, generate_with};
pub use reconcile::{
    parse_external, parse_external_value, reconcile, ReconcileOptions, DEFAULT_TOLERANCE,
};
pub use rng::SeededRandom;
pub use statement::{
    simulate, BankAccount, BankStatement, BankTransaction, StatementConfig, StatementMetadata,
    StatementPeriod,
};
