// Session handle cache
//
// Holds the last-used node interface for the lifetime of the process so
// unrelated parts of a program can reach the active connection without
// reopening it. Nothing is persisted.
//
// The cache is an explicit value passed to whoever needs it. There is no
// module-level global.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// ============================================================================
// SessionHandleCache
// ============================================================================

/// Single-slot store for an opaque connection handle.
///
/// The only requirement on the handle is `Debug`, used for the diagnostic
/// line `get_handle` writes when the debug flag is on.
///
/// Two states: absent and present. `set_handle` moves absent→present or
/// overwrites present→present. Nothing moves back to absent.
#[derive(Debug)]
pub struct SessionHandleCache<H> {
    handle: Option<H>,
    debug: bool,
}

impl<H> Default for SessionHandleCache<H> {
    fn default() -> Self {
        Self {
            handle: None,
            debug: false,
        }
    }
}

impl<H: Debug> SessionHandleCache<H> {
    /// Empty cache with diagnostics disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty cache with an explicit diagnostic setting.
    pub fn with_debug(debug: bool) -> Self {
        Self {
            handle: None,
            debug,
        }
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Toggle diagnostics. Never touches the stored handle.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn is_set(&self) -> bool {
        self.handle.is_some()
    }

    /// Store `handle`, replacing whatever was there.
    ///
    /// The replaced handle is handed back so the caller can close it;
    /// dropping the return value drops the old handle.
    pub fn set_handle(&mut self, handle: H) -> Option<H> {
        let previous = self.handle.replace(handle);
        if self.debug {
            tracing::info!(
                "[session_cache] Interface set (replaced existing: {}).",
                previous.is_some()
            );
        }
        previous
    }

    /// The stored handle, or `None` if nothing has been set.
    pub fn get_handle(&self) -> Option<&H> {
        match self.handle {
            None => {
                if self.debug {
                    tracing::info!("[session_cache] No interface set, returning none.");
                }
                None
            }
            Some(ref handle) => {
                if self.debug {
                    tracing::info!("[session_cache] Returning interface: {:?}.", handle);
                }
                Some(handle)
            }
        }
    }

    /// Mutable access for callers that drive I/O on the handle in place.
    pub fn get_handle_mut(&mut self) -> Option<&mut H> {
        if self.debug {
            tracing::info!(
                "[session_cache] Mutable access, interface present: {}.",
                self.handle.is_some()
            );
        }
        self.handle.as_mut()
    }
}

// ============================================================================
// SharedHandleCache
// ============================================================================

/// Thread-safe cache: both operations run under one mutex so a reader never
/// observes a half-finished write. Handles are kept behind `Arc` so readers
/// keep them alive after the lock is released.
#[derive(Debug)]
pub struct SharedHandleCache<H> {
    inner: Mutex<SessionHandleCache<Arc<H>>>,
}

impl<H> Default for SharedHandleCache<H> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(SessionHandleCache::default()),
        }
    }
}

impl<H: Debug> SharedHandleCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug(debug: bool) -> Self {
        Self {
            inner: Mutex::new(SessionHandleCache::with_debug(debug)),
        }
    }

    pub fn set_debug(&self, debug: bool) {
        self.lock().set_debug(debug);
    }

    pub fn set_handle(&self, handle: H) -> Option<Arc<H>> {
        self.lock().set_handle(Arc::new(handle))
    }

    pub fn get_handle(&self) -> Option<Arc<H>> {
        self.lock().get_handle().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionHandleCache<Arc<H>>> {
        // A panic while holding the lock cannot leave the slot half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ============================================================================
// Tests
// ============================================================================
