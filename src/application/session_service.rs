// Session service - login and logout of the single local identity
use crate::application::dashboard_store::{SharedStore, StoreError};
use crate::domain::session::{SessionError, User};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Invalid(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct SessionService {
    store: SharedStore,
}

impl SessionService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn current(&self) -> Option<User> {
        self.store.lock().await.current_user().cloned()
    }

    /// Replace any existing identity with the new one
    pub async fn login(&self, name: &str, email: &str) -> Result<User, LoginError> {
        let user = User::new(name, email)?;
        self.store.lock().await.set_user(user.clone()).await?;
        tracing::info!("Logged in as {}", user.email);
        Ok(user)
    }

    pub async fn logout(&self) -> Result<(), StoreError> {
        self.store.lock().await.clear_user().await?;
        tracing::info!("Logged out");
        Ok(())
    }
}
