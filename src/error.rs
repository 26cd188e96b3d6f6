//! Error types for node connections.

use thiserror::Error;

/// Result type alias for NodeSync operations.
pub type Result<T> = std::result::Result<T, NodeSyncError>;

/// Errors surfaced to callers. An empty cache is not an error; it reads back
/// as `None`.
#[derive(Debug, Error)]
pub enum NodeSyncError {
    /// The connection provider could not open a handle: bad port, device
    /// absent, port busy, permission denied, or no single port to
    /// auto-detect.
    #[error("Connection unavailable on {}: {reason}", .port.as_deref().unwrap_or("auto-detected port"))]
    ConnectionUnavailable {
        /// Requested port, `None` when auto-selected
        port: Option<String>,
        reason: String,
    },

    /// Listing serial ports failed.
    #[error("Failed to enumerate ports: {0}")]
    PortEnumeration(String),

    /// Settings could not be read, parsed or written.
    #[error("Settings error: {0}")]
    Settings(String),

    /// Logging could not be set up.
    #[error("Logging error: {0}")]
    Logging(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeSyncError {
    pub(crate) fn unavailable(port: Option<&str>, reason: impl ToString) -> Self {
        NodeSyncError::ConnectionUnavailable {
            port: port.map(str::to_string),
            reason: reason.to_string(),
        }
    }

    /// True for any failure to obtain a connection handle.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, NodeSyncError::ConnectionUnavailable { .. })
    }
}
