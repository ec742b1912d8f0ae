//! Audit trail of user actions.
//!
//! Services record what a user did to which object; handlers decide where the
//! record goes. A handler failure fails the action being audited.
//!
//! # Example
//!
//! ```ignore
//! use actix_access_core::http::security::audit::{AuditEvent, AuditLogger, TracingHandler};
//!
//! let audit = AuditLogger::new().add_handler(TracingHandler);
//!
//! audit
//!     .log(AuditEvent::new("message dismissed", "message", "dismissed").actor(&user))
//!     .await?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::http::error::AccessError;
use crate::http::security::context::AccessContext;
use crate::http::security::User;

/// Request headers copied onto audit events.
const AUDITED_HEADERS: [&str; 2] = ["user-agent", "x-real-ip"];

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn generate_event_id() -> String {
    use rand::Rng;
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp, random)
}

// =============================================================================
// Audit Event
// =============================================================================

/// Who performed an audited action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditActor {
    pub name: String,
    pub username: String,
    pub email: String,
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub id: String,
    /// Unix epoch milliseconds.
    pub created: u64,
    pub message: String,
    pub event_type: String,
    pub event_action: String,
    pub actor: AuditActor,
    pub object: Value,
    pub headers: BTreeMap<String, String>,
}

impl AuditEvent {
    pub fn new(
        message: impl Into<String>,
        event_type: impl Into<String>,
        event_action: impl Into<String>,
    ) -> Self {
        AuditEvent {
            id: generate_event_id(),
            created: now_millis(),
            message: message.into(),
            event_type: event_type.into(),
            event_action: event_action.into(),
            actor: AuditActor::default(),
            object: Value::Null,
            headers: BTreeMap::new(),
        }
    }

    pub fn actor(mut self, user: &User) -> Self {
        self.actor.name = user.get_name().to_string();
        self.actor.username = user.get_username().to_string();
        self.actor.email = user.get_email().to_string();
        self
    }

    pub fn object(mut self, object: Value) -> Self {
        self.object = object;
        self
    }

    /// Copies the client address and audited headers from the request.
    pub fn request(mut self, ctx: &AccessContext) -> Self {
        self.actor.ip = ctx.client_ip().map(String::from);
        for name in AUDITED_HEADERS {
            if let Some(value) = ctx.header(name) {
                self.headers.insert(name.to_string(), value.to_string());
            }
        }
        self
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[async_trait]
pub trait AuditEventHandler: Send + Sync {
    async fn handle(&self, event: &AuditEvent) -> Result<(), AccessError>;
}

/// Emits each event as an `info` record on the `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHandler;

#[async_trait]
impl AuditEventHandler for TracingHandler {
    async fn handle(&self, event: &AuditEvent) -> Result<(), AccessError> {
        let record =
            serde_json::to_string(event).map_err(|e| AccessError::audit(e.to_string()))?;
        tracing::info!(target: "audit", id = %event.id, "{record}");
        Ok(())
    }
}

/// Handler that calls a closure.
pub struct ClosureHandler<F>
where
    F: Fn(&AuditEvent) -> Result<(), AccessError> + Send + Sync,
{
    handler: F,
}

impl<F> ClosureHandler<F>
where
    F: Fn(&AuditEvent) -> Result<(), AccessError> + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> AuditEventHandler for ClosureHandler<F>
where
    F: Fn(&AuditEvent) -> Result<(), AccessError> + Send + Sync,
{
    async fn handle(&self, event: &AuditEvent) -> Result<(), AccessError> {
        (self.handler)(event)
    }
}

/// In-memory event store for tests and debugging.
#[derive(Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<Vec<AuditEvent>>>,
    max_events: usize,
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            max_events: 10000,
        }
    }

    /// Oldest events are dropped beyond this count.
    pub fn max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    pub async fn get_events(&self) -> Vec<AuditEvent> {
        self.events.read().await.clone()
    }

    pub async fn get_events_by_user(&self, username: &str) -> Vec<AuditEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.actor.username == username)
            .cloned()
            .collect()
    }

    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

#[async_trait]
impl AuditEventHandler for InMemoryEventStore {
    async fn handle(&self, event: &AuditEvent) -> Result<(), AccessError> {
        let mut events = self.events.write().await;
        events.push(event.clone());
        if events.len() > self.max_events {
            events.remove(0);
        }
        Ok(())
    }
}

// =============================================================================
// Audit Logger
// =============================================================================

#[derive(Clone, Default)]
pub struct AuditLogger {
    handlers: Arc<Vec<Arc<dyn AuditEventHandler>>>,
}

impl AuditLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracing() -> Self {
        Self::new().add_handler(TracingHandler)
    }

    pub fn add_handler<H: AuditEventHandler + 'static>(mut self, handler: H) -> Self {
        Arc::make_mut(&mut self.handlers).push(Arc::new(handler));
        self
    }

    pub fn with_handler<F>(self, handler: F) -> Self
    where
        F: Fn(&AuditEvent) -> Result<(), AccessError> + Send + Sync + 'static,
    {
        self.add_handler(ClosureHandler::new(handler))
    }

    /// Passes the event to every handler in order, stopping at the first error.
    pub async fn log(&self, event: AuditEvent) -> Result<(), AccessError> {
        for handler in self.handlers.iter() {
            handler.handle(&event).await?;
        }
        Ok(())
    }

    /// Records an action performed by `user` within the request `ctx`.
    pub async fn log_user_action(
        &self,
        ctx: &AccessContext,
        user: &User,
        message: &str,
        event_type: &str,
        event_action: &str,
        object: Value,
    ) -> Result<(), AccessError> {
        let event = AuditEvent::new(message, event_type, event_action)
            .actor(user)
            .object(object)
            .request(ctx);
        self.log(event).await
    }
}
