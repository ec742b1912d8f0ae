//! Route handlers, one module per area.

pub mod admin;
pub mod audit;
pub mod auth;
pub mod messages;

use actix_web::HttpResponse;
use serde::Serialize;

use actix_access_core::http::error::{handle_error_response, ErrorResult};
use actix_access_core::http::security::AccessConfig;

/// Renders a handler result as JSON, or as an error body on failure.
pub(crate) fn respond<T, E>(result: Result<T, E>, config: &AccessConfig) -> HttpResponse
where
    T: Serialize,
    E: Into<ErrorResult>,
{
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(err) => handle_error_response(err, config.expose_server_errors),
    }
}
