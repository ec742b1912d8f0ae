//! Session and proxy auto-login tests.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use actix_access_core::http::security::{UserDetailsManager, UserDetailsService};

use common::{
    assert_rejected, create_test_app, login, session_cookie, test_config, test_state, ALICE,
    LOGIN_HEADER,
};

// =============================================================================
// Auto-login
// =============================================================================

#[actix_web::test]
async fn test_auto_login_establishes_session() {
    let state = test_state(test_config()).await;
    let app = create_test_app(&state).await;

    let req = test::TestRequest::post()
        .uri("/api/eua/accept")
        .insert_header((LOGIN_HEADER, ALICE))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp).expect("session cookie");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["accepted"], true);

    // The session alone is enough from here on.
    let req = test::TestRequest::get()
        .uri("/api/user/me")
        .cookie(cookie)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["username"], "alice");
}

#[actix_web::test]
async fn test_unknown_subject_is_not_logged_in() {
    let state = test_state(test_config()).await;
    let app = create_test_app(&state).await;

    let req = test::TestRequest::post()
        .uri("/api/eua/accept")
        .insert_header((LOGIN_HEADER, "CN=mallory"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_rejected(resp, 401, "no-login").await;
}

#[actix_web::test]
async fn test_header_ignored_without_auto_login() {
    let state = test_state(test_config().auto_login(false)).await;
    let app = create_test_app(&state).await;

    let req = test::TestRequest::post()
        .uri("/api/eua/accept")
        .insert_header((LOGIN_HEADER, ALICE))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_rejected(resp, 401, "no-login").await;
    assert!(!state.eua.has_accepted("alice").await);
}

#[actix_web::test]
async fn test_auto_login_on_guarded_route() {
    let state = test_state(test_config()).await;
    state.eua.accept("alice").await;
    let app = create_test_app(&state).await;

    let req = test::TestRequest::get()
        .uri("/api/user/me")
        .insert_header((LOGIN_HEADER, ALICE))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["username"], "alice");
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[actix_web::test]
async fn test_role_changes_apply_to_existing_session() {
    let state = test_state(test_config()).await;
    let app = create_test_app(&state).await;
    let cookie = login(&app, ALICE).await;

    let alice = state
        .users
        .load_user_by_username("alice")
        .await
        .unwrap()
        .unwrap();
    let mut demoted = alice.clone();
    demoted.set_roles(vec![]);
    state.users.update_user(&demoted).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/user/me")
        .cookie(cookie)
        .to_request();
    assert_rejected(test::call_service(&app, req).await, 403, "inactive").await;
}

#[actix_web::test]
async fn test_signout_ends_session() {
    let state = test_state(test_config()).await;
    let app = create_test_app(&state).await;
    let cookie = login(&app, ALICE).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/signout")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let mut req = test::TestRequest::get().uri("/api/user/me");
    if let Some(cookie) = session_cookie(&resp) {
        req = req.cookie(cookie);
    }
    let resp = test::call_service(&app, req.to_request()).await;
    assert_rejected(resp, 401, "no-login").await;
}
