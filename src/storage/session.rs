use std::sync::Arc;

use super::db::DatabaseError;
use super::store::KeyValueStore;
use super::tables::SESSION_EMAIL_KEY;
use super::InboxError;

/// The locally remembered "signed in" email. Nothing is verified; the email
/// is only a label attached to links created while it is set.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn current_email(&self) -> Result<Option<String>, DatabaseError> {
        Ok(self
            .store
            .get(SESSION_EMAIL_KEY)?
            .filter(|email| !email.trim().is_empty()))
    }

    pub fn sign_in(&self, email: &str) -> Result<String, InboxError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(InboxError::EmptyEmail);
        }

        self.store.set(SESSION_EMAIL_KEY, email)?;
        tracing::debug!(email = %email, "Signed in");
        Ok(email.to_string())
    }

    pub fn sign_out(&self) -> Result<(), DatabaseError> {
        self.store.remove(SESSION_EMAIL_KEY)
    }
}
