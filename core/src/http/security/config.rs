//! Access configuration and the authentication trait.
//!
//! [`AccessConfig`] is loaded once at startup and handed to requirement
//! constructors; nothing reads configuration from global state while a
//! request is being evaluated.

use actix_web::HttpRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::http::error::{AccessError, Rejection};
use crate::http::security::context::AccessContext;
use crate::http::security::requirement::Outcome;
use crate::http::security::user::User;

/// Authentication strategy under which users cannot edit their own profile.
pub const PROXY_PKI_STRATEGY: &str = "proxy-pki";

const DEFAULT_DISMISSED_MESSAGES_PERIOD_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// Process-wide settings consumed by requirements and account services.
///
/// Field names follow the deployment's JSON configuration
/// (`auth.autoLogin`, `orgLevelConfig.required`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessConfig {
    pub auth: AuthConfig,
    pub org_level_config: OrgLevelConfig,
    pub expose_server_errors: bool,
    /// How long (ms) a message stays visible to users who have not dismissed it.
    pub dismissed_messages_time_period: u64,
    pub app: AppConfig,
    pub mailer: MailerConfig,
    pub contact_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfig {
    pub strategy: String,
    pub auto_login: bool,
    pub required_roles: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrgLevelConfig {
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub instance_name: String,
    pub client_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MailerConfig {
    pub from: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        AccessConfig {
            auth: AuthConfig::default(),
            org_level_config: OrgLevelConfig::default(),
            expose_server_errors: false,
            dismissed_messages_time_period: DEFAULT_DISMISSED_MESSAGES_PERIOD_MS,
            app: AppConfig::default(),
            mailer: MailerConfig::default(),
            contact_email: String::new(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            strategy: "local".to_string(),
            auto_login: false,
            required_roles: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            instance_name: "Application".to_string(),
            client_url: "http://localhost:3000".to_string(),
        }
    }
}

impl AccessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON configuration document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn strategy(mut self, strategy: impl Into<String>) -> Self {
        self.auth.strategy = strategy.into();
        self
    }

    pub fn auto_login(mut self, auto_login: bool) -> Self {
        self.auth.auto_login = auto_login;
        self
    }

    pub fn required_roles(mut self, roles: Vec<&str>) -> Self {
        self.auth.required_roles = Some(roles.into_iter().map(String::from).collect());
        self
    }

    pub fn org_levels_required(mut self, required: bool) -> Self {
        self.org_level_config.required = required;
        self
    }

    pub fn expose_server_errors(mut self, expose: bool) -> Self {
        self.expose_server_errors = expose;
        self
    }

    pub fn dismissed_messages_time_period(mut self, period_ms: u64) -> Self {
        self.dismissed_messages_time_period = period_ms;
        self
    }

    pub fn app(mut self, instance_name: impl Into<String>, client_url: impl Into<String>) -> Self {
        self.app = AppConfig {
            instance_name: instance_name.into(),
            client_url: client_url.into(),
        };
        self
    }

    pub fn mail_from(mut self, from: impl Into<String>) -> Self {
        self.mailer.from = from.into();
        self
    }

    pub fn contact_email(mut self, email: impl Into<String>) -> Self {
        self.contact_email = email.into();
        self
    }
}

/// Resolves the principal of a request and performs automatic login.
///
/// Futures are `?Send`: authenticators run on the Actix worker that owns the
/// request and may touch its session.
#[async_trait(?Send)]
pub trait Authenticator: Send + Sync {
    /// Returns the user the request is already authenticated as, if any.
    async fn authenticate(&self, req: &HttpRequest) -> Result<Option<User>, AccessError>;

    /// Attempts to authenticate the request and establish a session.
    ///
    /// The default implementation reuses [`authenticate`](Self::authenticate)
    /// and places the user into the context on success.
    async fn authenticate_and_login(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        match self.authenticate(ctx.request()).await? {
            Some(user) => {
                ctx.establish(user);
                Ok(Outcome::Granted)
            }
            None => Ok(Outcome::Denied(Rejection::no_login())),
        }
    }
}
