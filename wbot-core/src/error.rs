use storage::StorageError;
use thiserror::Error;

/// Outbound transport failure.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid outbound activity: {0}")]
    InvalidActivity(String),
}

/// Failure loading or committing user state. Transient; the whole turn may be retried.
#[derive(Error, Debug)]
pub enum StateStoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cannot derive state key: {0}")]
    MissingKey(String),
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Send failed: {0}")]
    Send(#[from] SendError),

    #[error("State error: {0}")]
    State(#[from] StateStoreError),

    #[error("Invalid activity: {0}")]
    InvalidActivity(String),
}

/// A handler failed; the dispatcher reports which one and does not interpret the cause.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("{handler} handler failed: {source}")]
    Handler {
        handler: &'static str,
        #[source]
        source: HandlerError,
    },
}

/// Error surfaced to the caller of a turn.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("State commit error: {0}")]
    State(#[from] StateStoreError),
}

pub type HandlerResult<T = ()> = std::result::Result<T, HandlerError>;
