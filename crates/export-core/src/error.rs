use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Nothing to invoice for contract {0}")]
    EmptyInvoice(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown invoice mode: {0} (expected C1, C2, C3 or C4)")]
pub struct UnknownInvoiceMode(pub String);
