//! Demo application wiring the access requirements to routes.
//!
//! The binary in `main.rs` serves it; the integration tests drive the same
//! routes through `actix_web::test`.

pub mod handlers;

use actix_web::web;

use actix_access_core::http::security::{has, Has, Requirement};

pub use state::AppState;

/// Registers every route with its access profile.
///
/// | route                               | guard                                |
/// |-------------------------------------|--------------------------------------|
/// | `POST   /api/auth/signout`          | none                                 |
/// | `POST   /api/eua/accept`            | login                                |
/// | `POST   /api/user/org-levels`       | login                                |
/// | `GET    /api/user/me`               | `has_access`                         |
/// | `POST   /api/user/profile`          | `has_access` + profile edit          |
/// | `POST   /api/user/preferences`      | `has_access`                         |
/// | `PUT    /api/user/preferences`      | `has_access`                         |
/// | `GET    /api/users/{username}`      | `has_access`                         |
/// | `GET    /api/messages/recent`       | `has_access`                         |
/// | `POST   /api/messages/dismiss`      | `has_access`                         |
/// | `POST   /api/messages`              | `has_editor_access`                  |
/// | `GET    /api/audit`                 | `has_auditor_access`                 |
/// | `GET    /api/admin/user/{username}` | `has_admin_access`                   |
/// | `POST   /api/admin/user/{username}` | `has_admin_access`                   |
/// | `DELETE /api/admin/user/{username}` | `has_admin_access`                   |
///
/// The requirements come from `state`, so every worker shares one build.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    let profiles = &state.profiles;

    cfg.service(
        web::resource("/api/auth/signout").route(web::post().to(handlers::auth::signout)),
    )
    .service(
        web::resource("/api/eua/accept")
            .wrap(guard(state, profiles.requires_login()))
            .route(web::post().to(handlers::eua::accept)),
    )
    .service(
        web::resource("/api/user/org-levels")
            .wrap(guard(state, profiles.requires_login()))
            .route(web::post().to(handlers::user::update_org_levels)),
    )
    .service(
        web::resource("/api/user/me")
            .wrap(guard(state, profiles.has_access()))
            .route(web::get().to(handlers::user::me)),
    )
    .service(
        web::resource("/api/user/profile")
            .wrap(guard(state, state.can_edit_profile.clone()))
            .route(web::post().to(handlers::user::update_profile)),
    )
    .service(
        web::resource("/api/user/preferences")
            .wrap(guard(state, profiles.has_access()))
            .route(web::post().to(handlers::preferences::search))
            .route(web::put().to(handlers::preferences::save)),
    )
    .service(
        web::resource("/api/users/{username}")
            .wrap(guard(state, profiles.has_access()))
            .route(web::get().to(handlers::user::get_user)),
    )
    .service(
        web::resource("/api/messages/recent")
            .wrap(guard(state, profiles.has_access()))
            .route(web::get().to(handlers::messages::recent)),
    )
    .service(
        web::resource("/api/messages/dismiss")
            .wrap(guard(state, profiles.has_access()))
            .route(web::post().to(handlers::messages::dismiss)),
    )
    .service(
        web::resource("/api/messages")
            .wrap(guard(state, profiles.has_editor_access()))
            .route(web::post().to(handlers::messages::create)),
    )
    .service(
        web::resource("/api/audit")
            .wrap(guard(state, profiles.has_auditor_access()))
            .route(web::get().to(handlers::audit::events)),
    )
    .service(
        web::resource("/api/admin/user/{username}")
            .wrap(guard(state, profiles.has_admin_access()))
            .route(web::get().to(handlers::admin::get_user))
            .route(web::post().to(handlers::admin::update_user))
            .route(web::delete().to(handlers::admin::delete_user)),
    );
}

fn guard<R: Requirement + 'static>(state: &AppState, requirement: R) -> Has<R> {
    has(requirement).expose_server_errors(state.config.expose_server_errors)
}
