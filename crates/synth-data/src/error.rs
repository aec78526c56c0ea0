use thiserror::Error;

/// Errors raised while accepting contract data from outside the generator
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Invalid contract JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Contract JSON must be an object, got {0}")]
    NotAnObject(&'static str),
}
