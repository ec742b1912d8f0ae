use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

use crate::http::error::{AccessError, Rejection};

const SERVER_ERROR_KIND: &str = "server-error";
const SERVER_ERROR_MESSAGE: &str = "A server error has occurred.";

/// JSON body of every error response: `{"status": .., "type": .., "message": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    pub message: String,
}

impl ErrorResponse {
    /// Normalizes an error result into a client response body.
    ///
    /// A missing status, or one outside `[400, 600)`, becomes `500`. Server
    /// errors are logged and their message is replaced by a generic one
    /// unless `expose_server_errors` is set.
    pub fn from_result(
        status: Option<u16>,
        kind: Option<&str>,
        message: &str,
        expose_server_errors: bool,
    ) -> Self {
        let status = status
            .filter(|s| (400..600).contains(s))
            .unwrap_or(500);

        if status >= 500 {
            tracing::error!(status, kind = kind.unwrap_or_default(), "{}", message);

            let message = if expose_server_errors {
                message.to_string()
            } else {
                SERVER_ERROR_MESSAGE.to_string()
            };

            return ErrorResponse {
                status,
                kind: SERVER_ERROR_KIND.to_string(),
                message,
            };
        }

        ErrorResponse {
            status,
            kind: kind.unwrap_or_default().to_string(),
            message: message.to_string(),
        }
    }

    /// Builds the HTTP response carrying this body.
    pub fn into_response(self) -> HttpResponse {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(self)
    }
}

impl From<&Rejection> for ErrorResponse {
    fn from(rejection: &Rejection) -> Self {
        ErrorResponse {
            status: rejection.status().as_u16(),
            kind: rejection.kind().to_string(),
            message: rejection.message().to_string(),
        }
    }
}

/// Anything a handler may want to report to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResult {
    pub status: Option<u16>,
    pub kind: Option<String>,
    pub message: String,
}

impl ErrorResult {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        ErrorResult {
            status: Some(status),
            kind: None,
            message: message.into(),
        }
    }
}

impl From<Rejection> for ErrorResult {
    fn from(rejection: Rejection) -> Self {
        ErrorResult {
            status: Some(rejection.status().as_u16()),
            kind: Some(rejection.kind().to_string()),
            message: rejection.message().to_string(),
        }
    }
}

impl From<AccessError> for ErrorResult {
    fn from(err: AccessError) -> Self {
        ErrorResult {
            status: None,
            kind: None,
            message: err.to_string(),
        }
    }
}

/// Renders an error result as a JSON response, defaulting to `500`.
pub fn handle_error_response(
    result: impl Into<ErrorResult>,
    expose_server_errors: bool,
) -> HttpResponse {
    let result = result.into();
    ErrorResponse::from_result(
        result.status,
        result.kind.as_deref(),
        &result.message,
        expose_server_errors,
    )
    .into_response()
}
