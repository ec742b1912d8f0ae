//! Concrete access requirements.
//!
//! Each requirement takes the configuration it needs at construction time.

use std::sync::Arc;

use async_trait::async_trait;

use crate::http::error::{AccessError, Rejection};
use crate::http::security::config::{AccessConfig, Authenticator, PROXY_PKI_STRATEGY};
use crate::http::security::context::AccessContext;
use crate::http::security::requirement::{Outcome, Requirement};
use crate::http::security::user::{ROLE_ADMIN, ROLE_AUDITOR, ROLE_EDITOR, ROLE_USER};

// =============================================================================
// Login
// =============================================================================

/// Requires an authenticated principal, optionally attempting auto-login.
pub struct RequiresLogin {
    auto_login: bool,
    authenticator: Option<Arc<dyn Authenticator>>,
}

impl RequiresLogin {
    pub fn new(config: &AccessConfig) -> Self {
        RequiresLogin {
            auto_login: config.auth.auto_login,
            authenticator: None,
        }
    }

    /// Sets the collaborator used when `auth.autoLogin` is enabled.
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }
}

#[async_trait(?Send)]
impl Requirement for RequiresLogin {
    async fn check(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        if ctx.is_authenticated() {
            return Ok(Outcome::Granted);
        }

        match (&self.authenticator, self.auto_login) {
            (Some(authenticator), true) => authenticator.authenticate_and_login(ctx).await,
            (None, true) => {
                tracing::warn!("auto-login is enabled but no authenticator is configured");
                Ok(Outcome::Denied(Rejection::no_login()))
            }
            (_, false) => Ok(Outcome::Denied(Rejection::no_login())),
        }
    }

    fn name(&self) -> &str {
        "requires_login"
    }
}

// =============================================================================
// Roles
// =============================================================================

/// Requires the principal to hold every role in a set.
pub struct RequiresRoles {
    name: &'static str,
    roles: Vec<String>,
    rejection: Rejection,
}

impl RequiresRoles {
    /// Denies with `403 missing-roles` unless overridden.
    pub fn new(roles: Vec<&str>) -> Self {
        RequiresRoles {
            name: "requires_roles",
            roles: roles.into_iter().map(String::from).collect(),
            rejection: Rejection::missing_roles(),
        }
    }

    /// Replaces the rejection returned when a role is missing.
    pub fn rejection(mut self, rejection: Rejection) -> Self {
        self.rejection = rejection;
        self
    }

    fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

#[async_trait(?Send)]
impl Requirement for RequiresRoles {
    async fn check(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        let has_roles =
            ctx.with_principal(|user| user.is_some_and(|u| u.has_all_roles(&self.roles)));
        Ok(Outcome::grant_if(has_roles, || self.rejection.clone()))
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// `user` role; a missing role means the account is inactive.
pub fn requires_user_role() -> RequiresRoles {
    RequiresRoles::new(vec![ROLE_USER])
        .rejection(Rejection::inactive())
        .named("requires_user_role")
}

pub fn requires_editor_role() -> RequiresRoles {
    RequiresRoles::new(vec![ROLE_EDITOR]).named("requires_editor_role")
}

pub fn requires_auditor_role() -> RequiresRoles {
    RequiresRoles::new(vec![ROLE_AUDITOR]).named("requires_auditor_role")
}

pub fn requires_admin_role() -> RequiresRoles {
    RequiresRoles::new(vec![ROLE_ADMIN]).named("requires_admin_role")
}

// =============================================================================
// External Roles
// =============================================================================

/// Requires the external roles listed in `auth.requiredRoles`.
pub struct RequiresExternalRoles {
    required: Vec<String>,
}

impl RequiresExternalRoles {
    pub fn new(config: &AccessConfig) -> Self {
        RequiresExternalRoles {
            required: config.auth.required_roles.clone().unwrap_or_default(),
        }
    }
}

#[async_trait(?Send)]
impl Requirement for RequiresExternalRoles {
    async fn check(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        if self.required.is_empty() {
            return Ok(Outcome::Granted);
        }

        let granted = ctx.with_principal(|user| {
            user.is_some_and(|u| {
                u.bypasses_access_check() || u.has_all_external_roles(&self.required)
            })
        });
        Ok(Outcome::grant_if(granted, Rejection::no_access))
    }

    fn name(&self) -> &str {
        "requires_external_roles"
    }
}

// =============================================================================
// Organization Levels
// =============================================================================

/// Requires organization levels to be selected when the deployment asks for
/// them. Admins are exempt.
pub struct RequiresOrganizationLevels {
    required: bool,
}

impl RequiresOrganizationLevels {
    pub fn new(config: &AccessConfig) -> Self {
        RequiresOrganizationLevels {
            required: config.org_level_config.required,
        }
    }
}

#[async_trait(?Send)]
impl Requirement for RequiresOrganizationLevels {
    async fn check(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        if !self.required {
            return Ok(Outcome::Granted);
        }

        let granted = ctx.with_principal(|user| {
            user.is_some_and(|u| {
                u.has_role(ROLE_ADMIN) || !u.get_organization_levels().is_empty()
            })
        });
        Ok(Outcome::grant_if(granted, Rejection::required_org))
    }

    fn name(&self) -> &str {
        "requires_organization_levels"
    }
}

// =============================================================================
// Profile Editing
// =============================================================================

/// Requires that the principal may edit their own profile.
///
/// Under the `proxy-pki` strategy profile data comes from the identity
/// provider, so only users with `bypassAccessCheck` may change it.
pub struct RequiresProfileEdit {
    proxy_pki: bool,
}

impl RequiresProfileEdit {
    pub fn new(config: &AccessConfig) -> Self {
        RequiresProfileEdit {
            proxy_pki: config.auth.strategy == PROXY_PKI_STRATEGY,
        }
    }
}

#[async_trait(?Send)]
impl Requirement for RequiresProfileEdit {
    async fn check(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        let outcome = ctx.with_principal(|user| match user {
            None => Outcome::Denied(Rejection::no_login()),
            Some(u) => Outcome::grant_if(
                !self.proxy_pki || u.bypasses_access_check(),
                Rejection::not_authorized,
            ),
        });
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "requires_profile_edit"
    }
}
