//! Session-based authentication with proxy auto-login.
//!
//! The session stores only the username; the user itself is reloaded from the
//! [`UserDetailsService`] on each request so role changes apply immediately.
//!
//! # Example
//! ```rust,ignore
//! use actix_session::{storage::CookieSessionStore, SessionMiddleware};
//!
//! let directory = Arc::new(InMemoryUserDetailsService::new());
//! let authenticator = Arc::new(SessionAuthenticator::new(directory));
//!
//! App::new()
//!     .wrap(SecurityTransform::new().authenticator(authenticator.clone()))
//!     .wrap(SessionMiddleware::new(CookieSessionStore::default(), key))
//! ```

use std::sync::Arc;

use actix_session::{Session, SessionExt};
use actix_web::HttpRequest;
use async_trait::async_trait;

use crate::http::error::{AccessError, Rejection};
use crate::http::security::config::Authenticator;
use crate::http::security::context::AccessContext;
use crate::http::security::requirement::Outcome;
use crate::http::security::user_details::UserDetailsService;
use crate::http::security::User;

/// Header set by a TLS-terminating proxy with the client certificate subject.
pub const DEFAULT_LOGIN_HEADER: &str = "x-ssl-client-s-dn";

const DEFAULT_USER_KEY: &str = "username";

// =============================================================================
// Session Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    user_key: String,
    login_header: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            user_key: DEFAULT_USER_KEY.to_string(),
            login_header: DEFAULT_LOGIN_HEADER.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session key holding the username.
    pub fn user_key(mut self, key: &str) -> Self {
        self.user_key = key.to_string();
        self
    }

    /// Trusted header read during auto-login.
    pub fn login_header(mut self, header: &str) -> Self {
        self.login_header = header.to_string();
        self
    }

    pub fn get_user_key(&self) -> &str {
        &self.user_key
    }

    pub fn get_login_header(&self) -> &str {
        &self.login_header
    }
}

// =============================================================================
// Session Authenticator
// =============================================================================

pub struct SessionAuthenticator {
    directory: Arc<dyn UserDetailsService>,
    config: SessionConfig,
}

impl SessionAuthenticator {
    pub fn new(directory: Arc<dyn UserDetailsService>) -> Self {
        Self::with_config(directory, SessionConfig::default())
    }

    pub fn with_config(directory: Arc<dyn UserDetailsService>, config: SessionConfig) -> Self {
        SessionAuthenticator { directory, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Stores `user` in the session under a fresh session id.
    pub fn login(session: &Session, user: &User, config: &SessionConfig) -> Result<(), AccessError> {
        session.renew();
        session
            .insert(&config.user_key, user.get_username())
            .map_err(|e| AccessError::session(e.to_string()))
    }

    pub fn logout(session: &Session, config: &SessionConfig) {
        session.remove(&config.user_key);
    }

    fn session_username(session: &Session, config: &SessionConfig) -> Result<Option<String>, AccessError> {
        session
            .get::<String>(&config.user_key)
            .map_err(|e| AccessError::session(e.to_string()))
    }
}

#[async_trait(?Send)]
impl Authenticator for SessionAuthenticator {
    async fn authenticate(&self, req: &HttpRequest) -> Result<Option<User>, AccessError> {
        let session = req.get_session();
        let Some(username) = Self::session_username(&session, &self.config)? else {
            return Ok(None);
        };

        let user = self.directory.load_user_by_username(&username).await?;
        if user.is_none() {
            // The account went away after the session was issued.
            Self::logout(&session, &self.config);
        }
        Ok(user)
    }

    async fn authenticate_and_login(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        let Some(external_id) = ctx.header(&self.config.login_header) else {
            return Ok(Outcome::Denied(Rejection::no_login()));
        };

        let Some(user) = self.directory.load_user_by_external_id(external_id).await? else {
            tracing::debug!(external_id, "auto-login found no matching user");
            return Ok(Outcome::Denied(Rejection::no_login()));
        };

        Self::login(&ctx.request().get_session(), &user, &self.config)?;
        tracing::debug!(username = user.get_username(), "auto-login succeeded");
        ctx.establish(user);
        Ok(Outcome::Granted)
    }
}
