use thiserror::Error;

use crate::generation::GenerationId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("No home directory")]
    NoHomeDir,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cannot proceed to phase {to} from {from}")]
    InvalidPhaseTransition { from: String, to: String },

    #[error("Unknown phase: {0}")]
    UnknownPhase(String),

    #[error("Unknown generation type: {0}")]
    UnknownGenerationType(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Generation cancelled: {id}")]
    GenerationCancelled { id: GenerationId },

    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type Result<T> = std::result::Result<T, Error>;
