// In-memory durable state, for ephemeral runs and tests
use crate::application::durable_state::{DurableState, DurableStateError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct MemoryDurableState {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryDurableState {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds consistent strings
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
impl MemoryDurableState {
    pub fn seed(&self, key: &str, value: &str) {
        self.entries().insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DurableState for MemoryDurableState {
    async fn read(&self, key: &str) -> Result<Option<String>, DurableStateError> {
        Ok(self.entries().get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), DurableStateError> {
        self.entries().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DurableStateError> {
        self.entries().remove(key);
        Ok(())
    }
}
