use actix_web::{error, http::StatusCode, HttpResponse};
use derive_more::{Display, Error};

use crate::http::error::ErrorResponse;

/// An unexpected failure while evaluating a requirement or serving an
/// account operation.
///
/// These are never turned into a [`Rejection`](crate::http::error::Rejection):
/// the client sees a generic server error and the cause is logged.
#[derive(Debug, Display, Error)]
pub enum AccessError {
    #[display("storage error: {reason}")]
    Storage { reason: String },
    #[display("session error: {reason}")]
    Session { reason: String },
    #[display("mail delivery failed: {reason}")]
    Mail { reason: String },
    #[display("audit failed: {reason}")]
    Audit { reason: String },
}

impl AccessError {
    pub fn storage(reason: impl Into<String>) -> Self {
        AccessError::Storage {
            reason: reason.into(),
        }
    }

    pub fn session(reason: impl Into<String>) -> Self {
        AccessError::Session {
            reason: reason.into(),
        }
    }

    pub fn mail(reason: impl Into<String>) -> Self {
        AccessError::Mail {
            reason: reason.into(),
        }
    }

    pub fn audit(reason: impl Into<String>) -> Self {
        AccessError::Audit {
            reason: reason.into(),
        }
    }

    /// Converts into an Actix error whose response honours
    /// `expose_server_errors`. Middleware uses this, since the plain
    /// [`ResponseError`](error::ResponseError) rendering has no configuration.
    pub fn into_actix_error(self, expose_server_errors: bool) -> error::Error {
        let response = ErrorResponse::from_result(
            Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
            None,
            &self.to_string(),
            expose_server_errors,
        )
        .into_response();
        error::InternalError::from_response(self, response).into()
    }
}

impl error::ResponseError for AccessError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorResponse::from_result(
            Some(self.status_code().as_u16()),
            None,
            &self.to_string(),
            false,
        );
        HttpResponse::build(self.status_code()).json(body)
    }
}
