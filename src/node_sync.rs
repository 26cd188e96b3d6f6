// Node synchronisation entry points
//
// `NodeSync` owns one open interface to a node. `prepare_node_sync` does the
// same setup but leaves the interface in a caller-supplied session cache.
// Connection failures are returned to the caller, never just logged.

use std::fmt::Debug;

use crate::error::Result;
use crate::io::{ConnectionProvider, NodeConnection, SerialProvider};
use crate::logging::DebugLevel;
use crate::session_cache::SessionHandleCache;
use crate::settings::Settings;

fn describe_port(port: Option<&str>) -> &str {
    port.unwrap_or("auto-detected port")
}

/// An open connection to a node plus how it was opened.
#[derive(Debug)]
pub struct NodeSync<H = NodeConnection> {
    interface: H,
    port: Option<String>,
    debug: DebugLevel,
}

impl<H> NodeSync<H> {
    /// Open `port` through `provider`; `None` lets the provider pick.
    pub fn open<P>(provider: &P, port: Option<&str>, debug: DebugLevel) -> Result<Self>
    where
        P: ConnectionProvider<Handle = H> + ?Sized,
    {
        let interface = provider.open(port).map_err(|e| {
            tracing::warn!(
                "[node_sync] Error initializing NodeSync on {}: {}",
                describe_port(port),
                e
            );
            e
        })?;

        if debug.is_enabled() {
            tracing::info!("[node_sync] NodeSync initialized on {}.", describe_port(port));
        }

        Ok(NodeSync {
            interface,
            port: port.map(str::to_string),
            debug,
        })
    }

    /// Requested port; `None` when it was auto-detected.
    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    pub fn debug_level(&self) -> DebugLevel {
        self.debug
    }

    pub fn interface(&self) -> &H {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut H {
        &mut self.interface
    }

    pub fn into_interface(self) -> H {
        self.interface
    }

    /// Move the interface into `cache`, returning whatever it replaced.
    pub fn store_in(self, cache: &mut SessionHandleCache<H>) -> Option<H>
    where
        H: Debug,
    {
        if self.debug >= DebugLevel::Advanced {
            tracing::debug!(
                "[node_sync] Storing interface for {} in session cache",
                describe_port(self.port.as_deref())
            );
        }
        cache.set_handle(self.interface)
    }
}

impl NodeSync<NodeConnection> {
    /// Open a serial node as described by `settings`.
    pub fn connect(settings: &Settings) -> Result<Self> {
        let provider = SerialProvider::new(settings.line.clone());
        NodeSync::open(&provider, settings.port.as_deref(), settings.debug_level)
    }
}

/// Open a node through `provider` and leave its interface in `cache`.
///
/// The cache's debug flag follows `debug`. On failure the cache is untouched.
pub fn prepare_node_sync<P>(
    cache: &mut SessionHandleCache<P::Handle>,
    provider: &P,
    port: Option<&str>,
    debug: DebugLevel,
) -> Result<()>
where
    P: ConnectionProvider + ?Sized,
    P::Handle: Debug,
{
    let interface = provider.open(port)?;
    cache.set_debug(debug.is_enabled());
    cache.set_handle(interface);
    tracing::info!("[node_sync] Node sync prepared on {}.", describe_port(port));
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
