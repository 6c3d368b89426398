//! In-memory session store

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use super::traits::SessionStoreTrait;

/// Session store that keeps values in process memory
///
/// Suitable for tests and single-process embedding. Values survive
/// [`SessionStoreTrait::regenerate_id`]; only the identifier changes.
#[derive(Debug)]
pub struct InMemorySessionStore {
    id: Mutex<Uuid>,
    values: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self { id: Mutex::new(Uuid::new_v4()), values: Mutex::new(HashMap::new()) }
    }

    /// Current session identifier.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        *self.id.lock()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.lock().contains_key(key)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStoreTrait for InMemorySessionStore {
    async fn load(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.values.lock().get(key).cloned())
    }

    async fn save(&self, key: &str, value: String) -> Result<(), String> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), String> {
        self.values.lock().remove(key);
        Ok(())
    }

    async fn regenerate_id(&self) -> Result<(), String> {
        *self.id.lock() = Uuid::new_v4();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_round_trip_and_remove() {
        let store = InMemorySessionStore::new();
        store.save("k", "v".to_string()).await.unwrap();
        assert_eq!(store.load("k").await.unwrap().as_deref(), Some("v"));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.load("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_regenerate_id_rotates_identifier() {
        let store = InMemorySessionStore::new();
        let before = store.session_id();
        store.regenerate_id().await.unwrap();
        assert_ne!(store.session_id(), before);
    }
}
