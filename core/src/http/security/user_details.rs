//! User lookup for authentication collaborators.
//!
//! # Example
//! ```rust,ignore
//! use actix_access_core::http::security::user_details::UserDetailsService;
//! use async_trait::async_trait;
//!
//! struct DirectoryService {
//!     pool: PgPool,
//! }
//!
//! #[async_trait]
//! impl UserDetailsService for DirectoryService {
//!     async fn load_user_by_username(&self, username: &str) -> Result<Option<User>, AccessError> {
//!         // Load from database...
//!         Ok(Some(user))
//!     }
//!
//!     async fn load_user_by_external_id(&self, id: &str) -> Result<Option<User>, AccessError> {
//!         // Look up by the identity provider's subject...
//!         Ok(None)
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::http::error::AccessError;
use crate::http::security::User;

// =============================================================================
// User Details Service Trait
// =============================================================================

/// Async lookup of users from any data source.
#[async_trait]
pub trait UserDetailsService: Send + Sync {
    /// Returns `Ok(None)` when no such user exists.
    async fn load_user_by_username(&self, username: &str) -> Result<Option<User>, AccessError>;

    /// Looks a user up by the identifier their identity provider asserts
    /// (for proxy PKI, the certificate subject DN).
    async fn load_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, AccessError>;

    async fn user_exists(&self, username: &str) -> Result<bool, AccessError> {
        Ok(self.load_user_by_username(username).await?.is_some())
    }
}

// =============================================================================
// User Details Manager Trait
// =============================================================================

/// Write access to the user directory.
#[async_trait]
pub trait UserDetailsManager: UserDetailsService {
    async fn create_user(&self, user: &User) -> Result<(), AccessError>;

    /// Replaces a stored user. Fails with a storage error if it does not exist.
    async fn update_user(&self, user: &User) -> Result<(), AccessError>;

    /// Removes a stored user. Fails with a storage error if it does not exist.
    async fn delete_user(&self, username: &str) -> Result<(), AccessError>;
}

// =============================================================================
// In-Memory User Details Service
// =============================================================================

/// In-memory implementation, keyed by username.
#[derive(Clone, Default)]
pub struct InMemoryUserDetailsService {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserDetailsService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User) {
        let mut users = self.users.write().await;
        users.insert(user.get_username().to_string(), user);
    }

    pub async fn add_users(&self, users: Vec<User>) {
        let mut store = self.users.write().await;
        for user in users {
            store.insert(user.get_username().to_string(), user);
        }
    }
}

#[async_trait]
impl UserDetailsService for InMemoryUserDetailsService {
    async fn load_user_by_username(&self, username: &str) -> Result<Option<User>, AccessError> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn load_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, AccessError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.get_external_id() == Some(external_id))
            .cloned())
    }
}

#[async_trait]
impl UserDetailsManager for InMemoryUserDetailsService {
    async fn create_user(&self, user: &User) -> Result<(), AccessError> {
        let mut users = self.users.write().await;
        let username = user.get_username().to_string();
        if users.contains_key(&username) {
            return Err(AccessError::storage(format!("user {username} already exists")));
        }
        users.insert(username, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<(), AccessError> {
        let mut users = self.users.write().await;
        let username = user.get_username().to_string();
        if !users.contains_key(&username) {
            return Err(AccessError::storage(format!("user {username} not found")));
        }
        users.insert(username, user.clone());
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), AccessError> {
        let mut users = self.users.write().await;
        users
            .remove(username)
            .map(|_| ())
            .ok_or_else(|| AccessError::storage(format!("user {username} not found")))
    }
}
