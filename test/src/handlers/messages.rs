//! System messages.

use actix_web::{web, HttpRequest, HttpResponse};
use rand::Rng;
use serde::Deserialize;

use actix_access_core::account::Message;
use actix_access_core::http::security::audit::now_millis;
use actix_access_core::http::security::{AccessContext, AuthenticatedUser};

use crate::handlers::respond;
use crate::AppState;

pub async fn recent(user: AuthenticatedUser, state: web::Data<AppState>) -> HttpResponse {
    respond(state.messages.recent_messages(&user).await, &state.config)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DismissRequest {
    pub message_ids: Vec<String>,
}

pub async fn dismiss(
    req: HttpRequest,
    user: AuthenticatedUser,
    body: web::Json<DismissRequest>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let ctx = AccessContext::new(req);
    let result = state.messages.dismiss(&body.message_ids, &user, &ctx).await;
    respond(result, &state.config)
}

#[derive(Debug, Deserialize)]
pub struct NewMessage {
    pub title: String,
    #[serde(rename = "type", default)]
    pub message_type: String,
    #[serde(default)]
    pub body: String,
}

pub async fn create(
    user: AuthenticatedUser,
    body: web::Json<NewMessage>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let new = body.into_inner();
    let message = Message {
        id: format!("{:016x}", rand::thread_rng().gen::<u64>()),
        title: new.title,
        message_type: new.message_type,
        body: new.body,
        creator: user.get_username().to_string(),
        created: now_millis(),
    };

    let result = state.messages.create(message.clone()).await.map(|()| message);
    respond(result, &state.config)
}
