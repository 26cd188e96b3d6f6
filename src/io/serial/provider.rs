// src/io/serial/provider.rs
//
// Connection provider backed by the serialport crate.

use std::fmt;
use std::io::{Read, Write};

use serialport::SerialPort;

use super::ports::{list_ports, pick_port, select_candidates};
use super::utils::SerialLineConfig;
use crate::error::{NodeSyncError, Result};
use crate::io::ConnectionProvider;

// ============================================================================
// NodeConnection
// ============================================================================

/// An open serial link to a node. Closed when dropped.
pub struct NodeConnection {
    port: Box<dyn SerialPort>,
    port_name: String,
    baud_rate: u32,
}

impl NodeConnection {
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// The underlying port, for settings the wrapper does not expose.
    pub fn serial_port(&mut self) -> &mut dyn SerialPort {
        self.port.as_mut()
    }
}

impl fmt::Debug for NodeConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeConnection")
            .field("port", &self.port_name)
            .field("baud_rate", &self.baud_rate)
            .finish()
    }
}

impl Read for NodeConnection {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for NodeConnection {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.port.flush()
    }
}

// ============================================================================
// SerialProvider
// ============================================================================

/// Opens nodes on local serial ports.
#[derive(Clone, Debug, Default)]
pub struct SerialProvider {
    line: SerialLineConfig,
}

impl SerialProvider {
    pub fn new(line: SerialLineConfig) -> Self {
        Self { line }
    }

    pub fn line(&self) -> &SerialLineConfig {
        &self.line
    }

    /// Port to open when the caller did not name one. Every failure here is
    /// `ConnectionUnavailable` with no port.
    pub fn detect_port(&self) -> Result<String> {
        let ports = list_ports().map_err(|e| NodeSyncError::unavailable(None, e))?;
        tracing::trace!("[serial] Enumerated {} port(s)", ports.len());
        let candidates = select_candidates(&ports);
        tracing::debug!("[serial] Auto-detect candidates: {:?}", candidates);
        pick_port(candidates)
    }
}

impl ConnectionProvider for SerialProvider {
    type Handle = NodeConnection;

    fn open(&self, port: Option<&str>) -> Result<NodeConnection> {
        let port_name = match port {
            Some(p) => p.to_string(),
            None => self.detect_port()?,
        };

        tracing::debug!(
            "[serial] Opening {} at {} baud",
            port_name,
            self.line.baud_rate
        );

        let opened = self
            .line
            .builder(&port_name)
            .open()
            .map_err(|e| NodeSyncError::unavailable(Some(port_name.as_str()), e))?;

        tracing::trace!("[serial] {} open", port_name);

        Ok(NodeConnection {
            port: opened,
            port_name,
            baud_rate: self.line.baud_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_port_is_connection_unavailable() {
        let provider = SerialProvider::default();
        let port = if cfg!(windows) {
            "COM250"
        } else {
            "/dev/nodesync-does-not-exist"
        };
        match provider.open(Some(port)) {
            Err(NodeSyncError::ConnectionUnavailable { port: Some(p), .. }) => assert_eq!(p, port),
            other => panic!("expected ConnectionUnavailable, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_auto_detect_failure_is_connection_unavailable() {
        // Opens only when exactly one node is attached to this machine.
        if let Err(e) = SerialProvider::default().open(None) {
            assert!(
                matches!(e, NodeSyncError::ConnectionUnavailable { .. }),
                "unexpected error: {:?}",
                e
            );
        }
    }

    #[test]
    fn test_provider_keeps_line_config() {
        let line = SerialLineConfig {
            baud_rate: 38_400,
            ..SerialLineConfig::default()
        };
        let provider = SerialProvider::new(line.clone());
        assert_eq!(provider.line(), &line);
    }
}
