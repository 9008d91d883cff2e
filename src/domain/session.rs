// Session identity - the single logged-in user
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("name is required")]
    MissingName,
    #[error("email is required")]
    MissingEmail,
    #[error("invalid email address: {0}")]
    InvalidEmail(String),
}

impl User {
    /// Build an identity from login form input. No password, no server check.
    pub fn new(name: &str, email: &str) -> Result<Self, SessionError> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(SessionError::MissingName);
        }
        if email.is_empty() {
            return Err(SessionError::MissingEmail);
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(SessionError::InvalidEmail(email.to_string())),
        }

        Ok(Self {
            email: email.to_string(),
            name: name.to_string(),
        })
    }
}
