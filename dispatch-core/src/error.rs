use std::time::Duration;

use thiserror::Error;

use crate::types::MessageKind;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Unsupported message kind: {0}")]
    UnsupportedKind(MessageKind),

    #[error("Collaborator failure: {0}")]
    Collaborator(String),

    #[error("Storage fault: {0}")]
    Storage(String),

    #[error("Event processing timed out after {0:?}")]
    Timeout(Duration),

    #[error("Config error: {0}")]
    Config(String),
}

impl DispatchError {
    /// Wraps a collaborator (completion, transcription, delivery) error, keeping its context chain.
    pub fn collaborator(e: impl std::fmt::Display) -> Self {
        DispatchError::Collaborator(format!("{:#}", e))
    }

    /// Wraps a memory store error, keeping its context chain.
    pub fn storage(e: impl std::fmt::Display) -> Self {
        DispatchError::Storage(format!("{:#}", e))
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
