// src/io/serial/mod.rs
//
// Serial transport for mesh-radio nodes.
//
// - Port enumeration and auto-selection
// - Line configuration (baud, framing bits, parity, timeout)
// - `SerialProvider`, the ConnectionProvider that opens `NodeConnection`s

pub mod ports;
pub mod provider;
pub(crate) mod utils;

pub use ports::{list_ports, select_candidates, PortInfo};
pub use provider::{NodeConnection, SerialProvider};
pub use utils::{Parity, SerialLineConfig};
