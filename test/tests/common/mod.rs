//! Common test utilities and configuration.
//!
//! This module provides shared test infrastructure including:
//! - The proxy PKI test configuration
//! - Test app builder
//! - Login and session cookie helpers

#![allow(dead_code)]

use actix_http::Request;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use serde_json::Value;

use actix_access_core::http::security::{AccessConfig, SecurityTransform};
use actix_access_test::{configure, AppState};

pub const LOGIN_HEADER: &str = "x-ssl-client-s-dn";
pub const SESSION_COOKIE: &str = "id";

pub const ALICE: &str = "CN=alice,OU=people";
pub const EDDIE: &str = "CN=eddie,OU=people";
pub const AUDREY: &str = "CN=audrey,OU=people";
pub const ROOT: &str = "CN=root,OU=admins";
pub const NEWBIE: &str = "CN=newbie,OU=people";

// =============================================================================
// Test Configuration
// =============================================================================

/// Proxy PKI with auto-login, org levels and the `ROLE_A` external role.
pub fn test_config() -> AccessConfig {
    AccessConfig::new()
        .strategy("proxy-pki")
        .auto_login(true)
        .required_roles(vec!["ROLE_A"])
        .org_levels_required(true)
        .app("Portal", "https://portal.example")
        .mail_from("noreply@portal.example")
        .contact_email("help@portal.example")
}

/// Seeded state with the end user agreement published.
pub async fn test_state(config: AccessConfig) -> AppState {
    let state = AppState::new(config, true);
    state.seed_users().await;
    state
}

/// Creates a test application sharing `state`.
pub async fn create_test_app(
    state: &AppState,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_secure(false)
        .build();

    test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(
                SecurityTransform::new()
                    .authenticator(state.authenticator())
                    .expose_server_errors(state.config.expose_server_errors),
            )
            .wrap(session)
            .configure(|cfg| configure(cfg, state)),
    )
    .await
}

// =============================================================================
// Helpers
// =============================================================================

pub fn session_cookie(resp: &ServiceResponse) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}

/// Logs in through the proxy header and accepts the agreement.
///
/// Returns the session cookie for later requests.
pub async fn login<S>(app: &S, subject: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/eua/accept")
        .insert_header((LOGIN_HEADER, subject))
        .to_request();

    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "login failed: {}", resp.status());
    session_cookie(&resp).expect("session cookie")
}

/// Asserts the `{status, type, message}` error body.
pub async fn assert_rejected(resp: ServiceResponse, status: u16, kind: &str) {
    assert_eq!(resp.status().as_u16(), status);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], status);
    assert_eq!(body["type"], kind);
}
