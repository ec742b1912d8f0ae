//! Named access profiles.
//!
//! A profile is a fixed composition of requirements that routes attach as a
//! unit. The standard profiles all share the same prefix:
//!
//! | profile              | requirements, in order                                      |
//! |----------------------|-------------------------------------------------------------|
//! | `has_access`         | login, agreement, org levels, user role, external roles     |
//! | `has_editor_access`  | `has_access`, editor role                                   |
//! | `has_auditor_access` | `has_access`, auditor role                                  |
//! | `has_admin_access`   | login, admin role                                           |
//!
//! The end-user-agreement requirement is supplied by the application.

use std::sync::Arc;

use async_trait::async_trait;

use crate::http::error::AccessError;
use crate::http::security::combinator::{requires_all, requires_any, Combinator};
use crate::http::security::config::{AccessConfig, Authenticator};
use crate::http::security::context::AccessContext;
use crate::http::security::requirement::{Outcome, Requirement, SharedRequirement};
use crate::http::security::requirements::{
    requires_admin_role, requires_auditor_role, requires_editor_role, requires_user_role,
    RequiresExternalRoles, RequiresLogin, RequiresOrganizationLevels,
};

/// A named, immutable combinator.
#[derive(Clone)]
pub struct AccessProfile {
    name: &'static str,
    inner: Arc<Combinator>,
}

impl AccessProfile {
    pub fn all(name: &'static str, requirements: Vec<SharedRequirement>) -> Self {
        AccessProfile {
            name,
            inner: Arc::new(requires_all(requirements)),
        }
    }

    pub fn any(name: &'static str, requirements: Vec<SharedRequirement>) -> Self {
        AccessProfile {
            name,
            inner: Arc::new(requires_any(requirements)),
        }
    }

    pub fn combinator(&self) -> &Combinator {
        &self.inner
    }
}

#[async_trait(?Send)]
impl Requirement for AccessProfile {
    async fn check(&self, ctx: &AccessContext) -> Result<Outcome, AccessError> {
        let outcome = self.inner.check(ctx).await?;
        if let Outcome::Denied(rejection) = &outcome {
            tracing::debug!(profile = self.name, kind = rejection.kind(), "access denied");
        }
        Ok(outcome)
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// The standard profiles, built once from configuration.
#[derive(Clone)]
pub struct AccessProfiles {
    login: SharedRequirement,
    has_access: AccessProfile,
    has_editor_access: AccessProfile,
    has_auditor_access: AccessProfile,
    has_admin_access: AccessProfile,
}

impl AccessProfiles {
    /// `end_user_agreement` runs right after login in `has_access`; use a
    /// requirement that always grants when the deployment has no agreement.
    pub fn new(
        config: &AccessConfig,
        authenticator: Option<Arc<dyn Authenticator>>,
        end_user_agreement: SharedRequirement,
    ) -> Self {
        let mut login = RequiresLogin::new(config);
        if let Some(authenticator) = authenticator {
            login = login.authenticator(authenticator);
        }
        let login: SharedRequirement = Arc::new(login);

        let has_access = AccessProfile::all(
            "has_access",
            vec![
                login.clone(),
                end_user_agreement,
                Arc::new(RequiresOrganizationLevels::new(config)),
                Arc::new(requires_user_role()),
                Arc::new(RequiresExternalRoles::new(config)),
            ],
        );
        let has_access_req: SharedRequirement = Arc::new(has_access.clone());

        AccessProfiles {
            has_editor_access: AccessProfile::all(
                "has_editor_access",
                vec![has_access_req.clone(), Arc::new(requires_editor_role())],
            ),
            has_auditor_access: AccessProfile::all(
                "has_auditor_access",
                vec![has_access_req, Arc::new(requires_auditor_role())],
            ),
            has_admin_access: AccessProfile::all(
                "has_admin_access",
                vec![login.clone(), Arc::new(requires_admin_role())],
            ),
            has_access,
            login,
        }
    }

    /// The login requirement every profile starts with, for routes that only
    /// need an authenticated user.
    pub fn requires_login(&self) -> SharedRequirement {
        self.login.clone()
    }

    pub fn has_access(&self) -> AccessProfile {
        self.has_access.clone()
    }

    pub fn has_editor_access(&self) -> AccessProfile {
        self.has_editor_access.clone()
    }

    pub fn has_auditor_access(&self) -> AccessProfile {
        self.has_auditor_access.clone()
    }

    pub fn has_admin_access(&self) -> AccessProfile {
        self.has_admin_access.clone()
    }
}
