// src/io/mod.rs
//
// Connection providers for mesh-radio nodes.
// A provider opens the physical link and hands back an opaque handle; the
// rest of the crate never looks inside it.

pub mod serial;

pub use serial::{list_ports, NodeConnection, Parity, PortInfo, SerialLineConfig, SerialProvider};

use crate::error::Result;

/// Opens connection handles.
///
/// `port` selects a device path. `None` asks the provider to pick one
/// itself, which is unreliable when several compatible devices are attached.
pub trait ConnectionProvider {
    type Handle;

    fn open(&self, port: Option<&str>) -> Result<Self::Handle>;
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    type Handle = P::Handle;

    fn open(&self, port: Option<&str>) -> Result<Self::Handle> {
        (**self).open(port)
    }
}
