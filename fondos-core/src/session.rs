//! The currently recognized user.
//!
//! At most one user id is active. The store is the durable copy; `Session`
//! keeps the in-memory view in step with it.

use anyhow::Result;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Durable storage for the active user id.
pub trait SessionStore {
    /// Stored id, or `None` when logged out.
    fn load(&self) -> Result<Option<String>>;
    /// Persist `user_id`, replacing any previous one.
    fn save(&self, user_id: &str) -> Result<()>;
    /// Forget the stored id. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// Process-local store, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user_id: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(user_id.into()))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        Ok(slot.clone())
    }

    fn save(&self, user_id: &str) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        *slot = Some(user_id.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}

/// In-memory session backed by a durable store.
pub struct Session<S: SessionStore> {
    store: S,
    current: Option<String>,
}

impl<S: SessionStore> Session<S> {
    /// Start from whatever the store holds.
    pub fn open(store: S) -> Result<Self> {
        let current = store.load()?;
        Ok(Self { store, current })
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Persist first, then update memory, so a failed write leaves both unchanged.
    pub fn set(&mut self, user_id: &str) -> Result<()> {
        self.store.save(user_id)?;
        info!(user = user_id, "session set");
        self.current = Some(user_id.to_string());
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()?;
        if let Some(prev) = self.current.take() {
            info!(user = %prev, "session cleared");
        }
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_read_back() {
        let mut session = Session::open(MemorySessionStore::new()).unwrap();
        assert!(!session.is_active());

        session.set("123").unwrap();
        assert_eq!(session.current(), Some("123"));
        assert_eq!(session.store().load().unwrap().as_deref(), Some("123"));
    }

    #[test]
    fn test_clear_yields_absence() {
        let mut session = Session::open(MemorySessionStore::with_user("123")).unwrap();
        assert_eq!(session.current(), Some("123"));

        session.clear().unwrap();
        assert_eq!(session.current(), None);
        assert_eq!(session.store().load().unwrap(), None);

        // clearing twice is fine
        session.clear().unwrap();
    }

    #[test]
    fn test_set_overwrites() {
        let mut session = Session::open(MemorySessionStore::new()).unwrap();
        session.set("123").unwrap();
        session.set("456").unwrap();
        assert_eq!(session.current(), Some("456"));
    }

    #[test]
    fn test_open_reads_initial_value() {
        let store = MemorySessionStore::new();
        store.save("789").unwrap();
        let session = Session::open(store.clone()).unwrap();
        assert_eq!(session.current(), Some("789"));
    }
}
