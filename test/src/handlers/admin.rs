//! Administrative user management.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use actix_access_core::http::error::ErrorResult;
use actix_access_core::http::security::{
    AccessContext, AuthenticatedUser, User, UserDetailsManager, UserDetailsService, ROLE_USER,
};

use crate::handlers::respond;
use crate::AppState;

/// Access fields an administrator may change. Unset fields are kept.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserUpdate {
    pub roles: Option<Vec<String>>,
    pub external_roles: Option<Vec<String>>,
    pub organization_levels: Option<Vec<String>>,
    pub bypass_access_check: Option<bool>,
}

impl AdminUserUpdate {
    fn apply(self, mut user: User) -> User {
        if let Some(roles) = self.roles {
            user.set_roles(roles);
        }
        if let Some(external_roles) = self.external_roles {
            user.set_external_roles(external_roles);
        }
        if let Some(levels) = self.organization_levels {
            user.set_organization_levels(levels);
        }
        if let Some(bypass) = self.bypass_access_check {
            user = user.bypass_access_check(bypass);
        }
        user
    }
}

pub async fn update_user(
    req: HttpRequest,
    admin: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<AdminUserUpdate>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let ctx = AccessContext::new(req);
    let result = apply_update(&ctx, &admin, &path, body.into_inner(), &state).await;
    respond(result, &state.config)
}

/// Saves the change, audits it, then tells the user if they were just
/// approved.
async fn apply_update(
    ctx: &AccessContext,
    admin: &User,
    username: &str,
    update: AdminUserUpdate,
    state: &AppState,
) -> Result<User, ErrorResult> {
    let Some(before) = state.users.load_user_by_username(username).await? else {
        return Err(ErrorResult::new(400, "Could not find user"));
    };

    let after = update.apply(before.clone());
    state.users.update_user(&after).await?;
    state
        .audit
        .log_user_action(
            ctx,
            admin,
            "admin user updated",
            "user",
            "admin update",
            json!({ "before": before, "after": after }),
        )
        .await?;

    if !before.has_role(ROLE_USER) && after.has_role(ROLE_USER) {
        if let Err(err) = state.new_user_email.send(&after).await {
            tracing::error!(username = after.get_username(), error = %err, "new user email failed");
            return Err(ErrorResult::new(400, "Email failed to send"));
        }
    }

    Ok(after)
}

pub async fn get_user(path: web::Path<String>, state: web::Data<AppState>) -> HttpResponse {
    let result = match state.users.load_user_by_username(&path).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(ErrorResult::new(400, "User does not exist")),
        Err(err) => Err(err.into()),
    };
    respond(result, &state.config)
}

pub async fn delete_user(
    req: HttpRequest,
    admin: AuthenticatedUser,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let ctx = AccessContext::new(req);
    let result = remove_user(&ctx, &admin, &path, &state).await;
    respond(result, &state.config)
}

/// Audits the deletion before removing the user, so a failed audit keeps
/// the account.
async fn remove_user(
    ctx: &AccessContext,
    admin: &User,
    username: &str,
    state: &AppState,
) -> Result<User, ErrorResult> {
    let Some(user) = state.users.load_user_by_username(username).await? else {
        return Err(ErrorResult::new(400, "Could not find user"));
    };

    state
        .audit
        .log_user_action(
            ctx,
            admin,
            "admin user deleted",
            "user",
            "admin delete",
            json!(user),
        )
        .await?;
    state.users.delete_user(username).await?;

    Ok(user)
}
