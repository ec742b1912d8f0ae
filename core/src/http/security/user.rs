//! Principal model used by every access requirement.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base role of an active account.
pub const ROLE_USER: &str = "user";
/// Role allowed to create and change content.
pub const ROLE_EDITOR: &str = "editor";
/// Role allowed to read audit information.
pub const ROLE_AUDITOR: &str = "auditor";
/// Administrative role; bypasses the organization level requirement.
pub const ROLE_ADMIN: &str = "admin";

/// Represents an authenticated user with application roles, external roles
/// and organization level selections.
///
/// # Example
/// ```
/// use actix_access_core::http::security::User;
///
/// let user = User::new("alice")
///     .roles(&["user".into(), "editor".into()])
///     .external_roles(&["ROLE_A".into()])
///     .organization_levels(&["division-1".into()]);
///
/// assert!(user.has_role("editor"));
/// assert!(user.has_all_external_roles(&["ROLE_A".into()]));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    username: String,
    name: String,
    email: String,
    organization: String,
    external_id: Option<String>,
    roles: Vec<String>,
    external_roles: Vec<String>,
    organization_levels: Vec<String>,
    bypass_access_check: bool,
}

impl User {
    /// Creates a new user with no roles.
    pub fn new(username: impl Into<String>) -> Self {
        User {
            username: username.into(),
            ..User::default()
        }
    }

    pub fn get_username(&self) -> &str {
        &self.username
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_email(&self) -> &str {
        &self.email
    }

    pub fn get_organization(&self) -> &str {
        &self.organization
    }

    /// Identifier asserted by an external identity provider (e.g. a
    /// certificate DN forwarded by a proxy).
    pub fn get_external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn get_roles(&self) -> &[String] {
        &self.roles
    }

    pub fn get_external_roles(&self) -> &[String] {
        &self.external_roles
    }

    pub fn get_organization_levels(&self) -> &[String] {
        &self.organization_levels
    }

    /// Whether external role checks are skipped for this user.
    pub fn bypasses_access_check(&self) -> bool {
        self.bypass_access_check
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Adds roles to the user (builder pattern).
    pub fn roles(mut self, roles: &[String]) -> Self {
        for role in roles {
            if !self.roles.contains(role) {
                self.roles.push(role.clone());
            }
        }
        self
    }

    /// Adds external roles to the user (builder pattern).
    pub fn external_roles(mut self, roles: &[String]) -> Self {
        for role in roles {
            if !self.external_roles.contains(role) {
                self.external_roles.push(role.clone());
            }
        }
        self
    }

    /// Adds organization level selections (builder pattern).
    pub fn organization_levels(mut self, levels: &[String]) -> Self {
        for level in levels {
            if !self.organization_levels.contains(level) {
                self.organization_levels.push(level.clone());
            }
        }
        self
    }

    pub fn bypass_access_check(mut self, bypass: bool) -> Self {
        self.bypass_access_check = bypass;
        self
    }

    /// Replaces the role set. Role changes happen here, never in a requirement.
    pub fn set_roles(&mut self, roles: Vec<String>) {
        self.roles = roles;
    }

    pub fn set_external_roles(&mut self, roles: Vec<String>) {
        self.external_roles = roles;
    }

    pub fn set_organization_levels(&mut self, levels: Vec<String>) {
        self.organization_levels = levels;
    }

    /// Checks if the user has a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Checks if the user has ANY of the specified roles (OR logic).
    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Checks if the user has ALL of the specified roles (AND logic).
    pub fn has_all_roles(&self, roles: &[String]) -> bool {
        roles.iter().all(|role| self.has_role(role))
    }

    /// Checks if the user's external roles are a superset of `required`.
    pub fn has_all_external_roles(&self, required: &[String]) -> bool {
        required
            .iter()
            .all(|role| self.external_roles.contains(role))
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User {{ username: {}, roles: {:?}, external_roles: {:?} }}",
            self.username, self.roles, self.external_roles
        )
    }
}
