use std::borrow::Cow;

use actix_web::{error, http::StatusCode, HttpResponse};
use derive_more::{Display, Error};

use crate::http::error::ErrorResponse;

/// A denied access decision.
///
/// Carries the HTTP status, a short machine-readable `kind` and a message for
/// the client. Rejections are ordinary values returned by requirements; they
/// never signal a defect.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{kind} ({status}): {message}")]
pub struct Rejection {
    status: StatusCode,
    kind: Cow<'static, str>,
    message: Cow<'static, str>,
}

impl Rejection {
    /// Creates a rejection.
    ///
    /// Statuses outside the 4xx/5xx range are replaced by `500`.
    pub fn new(
        status: StatusCode,
        kind: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let status = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        Rejection {
            status,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// `401 no-login`: there is no authenticated principal.
    pub fn no_login() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "no-login", "User is not logged in")
    }

    /// `403 missing-roles`: the principal lacks one of the required roles.
    pub fn missing_roles() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "missing-roles",
            "User is missing required roles",
        )
    }

    /// `403 inactive`: the principal does not hold the base `user` role.
    pub fn inactive() -> Self {
        Self::new(StatusCode::FORBIDDEN, "inactive", "User account is inactive")
    }

    /// `403 noaccess`: external roles required by the deployment are missing.
    pub fn no_access() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "noaccess",
            "User is missing required roles",
        )
    }

    /// `403 requiredOrg`: organization levels have not been selected.
    pub fn required_org() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "requiredOrg",
            "User must select organization levels.",
        )
    }

    /// `403 not-authorized`: the principal may not edit their profile.
    pub fn not_authorized() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "not-authorized",
            "User not authorized to edit their profile",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl error::ResponseError for Rejection {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorResponse::from(self))
    }
}
