//! Error types for keypad programming

use macropad_transport::{ProtocolVersion, TransportError};
use thiserror::Error;

/// Errors from encoding or sending a keypad configuration
#[derive(Error, Debug)]
pub enum MacropadError {
    /// A symbolic name (key, modifier, media key, ...) was not recognized
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Invalid action slot: {0} (expected 1-6)")]
    InvalidAction(u8),

    /// Feature not available on the negotiated protocol; nothing was sent
    #[error("{feature} is not supported on protocol {version}")]
    UnsupportedOnProtocol {
        feature: String,
        version: ProtocolVersion,
    },

    /// Report `index` of `total` failed; reports before it were already written
    #[error("Write failed on report {} of {total}: {source}", .index + 1)]
    TransportWriteFailed {
        index: usize,
        total: usize,
        #[source]
        source: TransportError,
    },

    #[error("Protocol not initialized (call negotiate() first)")]
    ProtocolNotInitialized,

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, MacropadError>;
