//! Register engine error types

use cm6206_transport::TransportError;
use thiserror::Error;

/// Errors from register operations
#[derive(Error, Debug)]
pub enum RegisterError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Bulk initialization stopped at a register; earlier registers stay written
    #[error("Bulk write failed at register {index}: {source}")]
    BulkWrite {
        index: u8,
        #[source]
        source: TransportError,
    },

    /// Malformed register or bitfield table
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Register index, mask or value outside its domain
    #[error("Out of range: {0}")]
    Range(String),
}

impl RegisterError {
    /// The underlying transport error, if any
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e) | Self::BulkWrite { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

/// Result alias for register operations
pub type Result<T> = std::result::Result<T, RegisterError>;
