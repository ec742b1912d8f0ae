//! Session sign-out.

use actix_session::SessionExt;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

use actix_access_core::http::security::SessionAuthenticator;

use crate::AppState;

/// Drops the session's user. Always succeeds, signed in or not.
pub async fn signout(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    SessionAuthenticator::logout(&req.get_session(), state.authenticator.config());
    HttpResponse::NoContent().finish()
}
