// Typed errors with thiserror. Surface meaningful messages to JS.
// Inside the engine, host write failures are logged and dropped, never propagated.

use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
