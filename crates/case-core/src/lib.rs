//! Case protocol between ContractSynth and the text generator
//!
//! [`build_user_prompt`] and [`SYSTEM_INSTRUCTION`] describe a case to the
//! generator; [`parse_case_response`] reads its delimited reply back into a
//! [`ParsedCase`].

pub mod error;
pub mod prompt;
pub mod response;

pub use error::CaseError;
pub use prompt::{
    build_chat_request, build_user_prompt, mutation_details, CaseRequest, ChatMessage,
    ChatRequest, CONTRACT_TYPES, DEFAULT_LOCALE, SYSTEM_INSTRUCTION,
};
pub use response::{parse_case_response, Anomaly, ParsedCase};
