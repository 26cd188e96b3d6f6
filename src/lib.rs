//! Serial connection wrapper for mesh-radio nodes.
//!
//! Opens a node on a named or auto-detected serial port and keeps the open
//! interface in a session cache, so other parts of a program can reach it
//! without reconnecting.
//!
//! ```no_run
//! use nodesync_lib::{prepare_node_sync, DebugLevel, SerialProvider, SessionHandleCache};
//!
//! let mut cache = SessionHandleCache::new();
//! prepare_node_sync(&mut cache, &SerialProvider::default(), Some("/dev/ttyUSB0"), DebugLevel::Basic)?;
//! if let Some(interface) = cache.get_handle() {
//!     println!("connected: {:?}", interface);
//! }
//! # Ok::<(), nodesync_lib::NodeSyncError>(())
//! ```

pub mod error;
pub mod io;
pub mod logging;
pub mod node_sync;
pub mod session_cache;
pub mod settings;

pub use error::{NodeSyncError, Result};
pub use io::{list_ports, ConnectionProvider, NodeConnection, PortInfo, SerialLineConfig, SerialProvider};
pub use logging::{init_logging, DebugLevel};
pub use node_sync::{prepare_node_sync, NodeSync};
pub use session_cache::{SessionHandleCache, SharedHandleCache};
pub use settings::Settings;
