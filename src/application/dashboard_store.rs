// Dashboard store - authoritative record collection plus session identity
use crate::application::durable_state::{DurableState, DurableStateError};
use crate::domain::dashboard::DashboardRecord;
use crate::domain::session::User;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

pub const USER_KEY: &str = "pm_user";
pub const DASHBOARDS_KEY: &str = "pm_dashboards";

/// The one store instance, shared by the services that consume it
pub type SharedStore = Arc<Mutex<DashboardStore>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dashboard id must not be empty")]
    EmptyId,

    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Persist(#[from] DurableStateError),
}

/// Ordered dashboard records keyed by id, mirrored to durable state.
///
/// Every mutation is written through before it is committed in memory, so
/// a failed write leaves both copies as they were.
pub struct DashboardStore {
    state: Arc<dyn DurableState>,
    user: Option<User>,
    records: Vec<DashboardRecord>,
}

impl DashboardStore {
    /// Rehydrate from durable state. Missing or unreadable entries start
    /// empty; they are never an error.
    pub async fn load(state: Arc<dyn DurableState>) -> Self {
        let user = rehydrate::<User>(state.as_ref(), USER_KEY).await;
        let stored = rehydrate::<Vec<DashboardRecord>>(state.as_ref(), DASHBOARDS_KEY)
            .await
            .unwrap_or_default();

        // Collapse duplicate ids the same way repeated saves would have
        let mut records: Vec<DashboardRecord> = Vec::with_capacity(stored.len());
        for record in stored {
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => {
                    tracing::warn!("Duplicate dashboard id {} in durable state", record.id);
                    *existing = record;
                }
                None => records.push(record),
            }
        }

        tracing::debug!(
            "Rehydrated {} dashboards, session {}",
            records.len(),
            if user.is_some() { "present" } else { "absent" }
        );

        Self {
            state,
            user,
            records,
        }
    }

    pub fn list(&self) -> &[DashboardRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&DashboardRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Replace the record with the same id in place, or append it.
    pub async fn upsert(&mut self, record: DashboardRecord) -> Result<(), StoreError> {
        if record.id.trim().is_empty() {
            return Err(StoreError::EmptyId);
        }

        let replaced = match self.records.iter().position(|r| r.id == record.id) {
            Some(idx) => Some((idx, std::mem::replace(&mut self.records[idx], record))),
            None => {
                self.records.push(record);
                None
            }
        };

        if let Err(e) = self.persist_records().await {
            match replaced {
                Some((idx, previous)) => self.records[idx] = previous,
                None => {
                    self.records.pop();
                }
            }
            return Err(e);
        }

        Ok(())
    }

    /// Remove the record with `id`. Returns whether anything was removed;
    /// an absent id is a no-op and touches nothing.
    pub async fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(idx) = self.records.iter().position(|r| r.id == id) else {
            return Ok(false);
        };

        let removed = self.records.remove(idx);
        if let Err(e) = self.persist_records().await {
            self.records.insert(idx, removed);
            return Err(e);
        }

        Ok(true)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub async fn set_user(&mut self, user: User) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&user).map_err(|source| StoreError::Serialize {
            key: USER_KEY,
            source,
        })?;
        self.state.write(USER_KEY, &raw).await?;
        self.user = Some(user);
        Ok(())
    }

    pub async fn clear_user(&mut self) -> Result<(), StoreError> {
        self.state.remove(USER_KEY).await?;
        self.user = None;
        Ok(())
    }

    async fn persist_records(&self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.records).map_err(|source| StoreError::Serialize {
            key: DASHBOARDS_KEY,
            source,
        })?;
        self.state.write(DASHBOARDS_KEY, &raw).await?;
        Ok(())
    }
}

async fn rehydrate<T: DeserializeOwned>(state: &dyn DurableState, key: &str) -> Option<T> {
    match state.read(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Discarding malformed durable state under {}: {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Durable state unreadable, starting empty: {}", e);
            None
        }
    }
}
