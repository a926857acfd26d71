//! Error types shared by the engine abstraction and the format adapters.

use thiserror::Error;

/// Errors raised by plugin engines and adapter helpers.
///
/// None of these ever cross the host ABI boundary: the format adapters log
/// them and answer the host with the protocol's neutral value instead.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin initialization failed: {0}")]
    InitializationFailed(String),

    #[error("processing error: {0}")]
    ProcessingError(String),

    #[error("state error: {0}")]
    StateError(String),

    #[error("unsupported channel layout: {0}")]
    LayoutError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type PluginResult<T> = Result<T, PluginError>;
