//! Records shared by every ContractSynth crate: the contract data model,
//! the mutation vocabulary and Vietnamese long-form date handling.

pub mod date;
pub mod mutation;
pub mod types;

pub use date::{format_vn_date, parse_vn_date};
pub use mutation::{MutationCategory, MutationCode, MutationDef, MUTATIONS};
pub use types::{CompanyInfo, ContractData, LineItem, PaymentPhase};
