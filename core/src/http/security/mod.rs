//! Authentication and authorization for Actix Web.
//!
//! # Module Structure
//!
//! - `requirement` - The `Requirement` trait, `Outcome` and closure requirements
//! - `combinator` - `requires_all` / `requires_any`
//! - `requirements` - Login, role, external role, org level and profile edit checks
//! - `profile` - Named access profiles (`has_access`, `has_admin_access`, ...)
//! - `middleware` - `gate`, the `Has` guard and `SecurityTransform`
//! - `config` - `AccessConfig` and the `Authenticator` trait
//! - `context` - Per-request view of the principal and headers
//! - `authenticator` - Session authenticator with proxy auto-login
//! - `user_details` - User lookup (`UserDetailsService`)
//! - `extractor` - `AuthenticatedUser` and `OptionalUser`
//! - `audit` - Audit trail of user actions
//! - `user` - User model

pub use audit::{AuditEvent, AuditEventHandler, AuditLogger, InMemoryEventStore, TracingHandler};
pub use authenticator::{SessionAuthenticator, SessionConfig};
pub use combinator::{requires_all, requires_any, Combinator, Mode};
pub use config::{AccessConfig, Authenticator};
pub use context::AccessContext;
pub use extractor::{AuthenticatedUser, OptionalUser};
pub use middleware::{gate, has, has_all, has_any, Has, SecurityTransform};
pub use profile::{AccessProfile, AccessProfiles};
pub use requirement::{requirement_fn, Outcome, Requirement, SharedRequirement};
pub use requirements::{
    requires_admin_role, requires_auditor_role, requires_editor_role, requires_user_role,
    RequiresExternalRoles, RequiresLogin, RequiresOrganizationLevels, RequiresProfileEdit,
    RequiresRoles,
};
pub use user::{User, ROLE_ADMIN, ROLE_AUDITOR, ROLE_EDITOR, ROLE_USER};
pub use user_details::{InMemoryUserDetailsService, UserDetailsManager, UserDetailsService};

mod extractor;
mod user;

pub mod audit;
pub mod authenticator;
pub mod combinator;
pub mod config;
pub mod context;
pub mod middleware;
pub mod profile;
pub mod requirement;
pub mod requirements;
pub mod user_details;
