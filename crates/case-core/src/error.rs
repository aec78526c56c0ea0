use synth_data::SynthError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("Invalid JSON in {block} block: {source}")]
    InvalidJson {
        block: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize prompt data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid contract record: {0}")]
    Contract(#[from] SynthError),
}
