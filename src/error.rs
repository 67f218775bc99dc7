//! Error types for the acquisition cycle.
//!
//! Each collaborator (decoder, Bluetooth transport, InfluxDB sink, configuration)
//! has its own error enum. [`CycleError`] is what one acquisition cycle returns.

use bluer::Uuid;
use thiserror::Error;

/// Failure to turn a raw frame into a [`Reading`](crate::bluetooth::decoder::Reading).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The frame is not exactly the expected number of bytes.
    #[error("malformed frame: expected {expected} bytes, got {actual}")]
    MalformedFrame { expected: usize, actual: usize },

    /// The frame declares a format version this decoder does not know.
    #[error("unsupported sensor format version {0}")]
    UnsupportedFormatVersion(u8),
}

/// Connect, read or disconnect failure on the Bluetooth link.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("bluetooth error: {0}")]
    Bluetooth(#[from] bluer::Error),

    #[error("characteristic {0} not found on device")]
    CharacteristicNotFound(Uuid),

    #[error("device services were not resolved within {0} ms")]
    ServicesNotResolved(u64),
}

/// Failure to write a measurement to the database.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("invalid database url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("http request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The server answered, but not with a success status.
    #[error("write rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        // Error text must not carry the request url
        PersistenceError::Http(err.without_url())
    }
}

/// Missing or unusable configuration value.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Anything that aborts one acquisition cycle.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
