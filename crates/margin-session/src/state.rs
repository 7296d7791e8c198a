//! # Session State
//!
//! Registry of open editing sessions, keyed by product id.
//!
//! ## Thread Safety
//! The map is wrapped in `Arc<Mutex<T>>`: several callers may open, edit or
//! close sessions concurrently, but only one touches the registry at a time.
//! Closures passed to `with_session*` run under the lock and must not block.
//!
//! ## Saving
//! A save awaits the store, and a `std::sync::Mutex` guard must not be held
//! across an await. `save` therefore saves a copy of the session and, once
//! the store answered, writes the new baselines back under the lock. The
//! session stays registered and editable the whole time:
//!
//! ```text
//! lock ─► clone session ─► unlock ─► store writes ─► lock ─► absorb_save ─► unlock
//!                                  (edits allowed)
//! ```
//!
//! Dropping the save future part way leaves the registered session as it
//! was, still dirty. A session re-opened while a save is in flight is a new
//! session: the stale save does not touch it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::manager::ChannelManager;
use crate::store::ChannelStore;

/// One registered session; `generation` changes on every `open`.
#[derive(Debug)]
struct Entry {
    generation: u64,
    manager: ChannelManager,
}

#[derive(Debug, Default)]
struct Registry {
    sessions: HashMap<String, Entry>,
    next_generation: u64,
}

/// Shared registry of Channel Managers.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    registry: Arc<Mutex<Registry>>,
}

impl SessionState {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session. A session already open for the same product is
    /// replaced and returned.
    pub fn open(&self, manager: ChannelManager) -> Option<ChannelManager> {
        let product_id = manager.product_id().to_string();
        debug!(product_id = %product_id, "Registering session");

        let mut registry = self.lock();
        registry.next_generation += 1;
        let entry = Entry {
            generation: registry.next_generation,
            manager,
        };
        registry
            .sessions
            .insert(product_id, entry)
            .map(|old| old.manager)
    }

    /// Removes a session, returning it with any unsaved edits.
    pub fn close(&self, product_id: &str) -> Option<ChannelManager> {
        debug!(product_id = %product_id, "Closing session");
        self.lock().sessions.remove(product_id).map(|e| e.manager)
    }

    pub fn is_open(&self, product_id: &str) -> bool {
        self.lock().sessions.contains_key(product_id)
    }

    pub fn open_count(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Executes a function with read access to one session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let dirty = state.with_session(&id, |m| m.is_dirty())?;
    /// ```
    pub fn with_session<F, R>(&self, product_id: &str, f: F) -> SessionResult<R>
    where
        F: FnOnce(&ChannelManager) -> R,
    {
        let registry = self.lock();
        let entry = registry
            .sessions
            .get(product_id)
            .ok_or_else(|| SessionError::NotOpen(product_id.to_string()))?;
        Ok(f(&entry.manager))
    }

    /// Executes a function with write access to one session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_session_mut(&id, |m| m.set_enabled(ChannelType::Shopee, true))??;
    /// ```
    pub fn with_session_mut<F, R>(&self, product_id: &str, f: F) -> SessionResult<R>
    where
        F: FnOnce(&mut ChannelManager) -> R,
    {
        let mut registry = self.lock();
        let entry = registry
            .sessions
            .get_mut(product_id)
            .ok_or_else(|| SessionError::NotOpen(product_id.to_string()))?;
        Ok(f(&mut entry.manager))
    }

    /// Saves one session through `store`.
    ///
    /// Edits made while the store call runs are kept and stay dirty.
    pub async fn save<S>(&self, product_id: &str, store: &S) -> SessionResult<()>
    where
        S: ChannelStore + ?Sized,
    {
        let (generation, mut copy) = {
            let registry = self.lock();
            let entry = registry
                .sessions
                .get(product_id)
                .ok_or_else(|| SessionError::NotOpen(product_id.to_string()))?;
            (entry.generation, entry.manager.clone())
        };
        let sent = copy.channels().to_vec();

        let result = copy.save(store).await;

        let mut registry = self.lock();
        match registry.sessions.get_mut(product_id) {
            Some(entry) if entry.generation == generation => {
                entry.manager.absorb_save(&sent, &copy);
            }
            _ => {
                debug!(product_id = %product_id, "Session replaced during save");
            }
        }
        result
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().expect("Session mutex poisoned")
    }
}
