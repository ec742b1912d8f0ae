use actix_web::{web, Responder};

use crate::AppState;

/// Recorded audit events, oldest first.
pub async fn events(state: web::Data<AppState>) -> impl Responder {
    web::Json(state.audit_events.get_events().await)
}
