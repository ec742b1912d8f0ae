//! System messages and per-user dismissals.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use crate::http::error::AccessError;
use crate::http::security::audit::{now_millis, AuditLogger};
use crate::http::security::{AccessConfig, AccessContext, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub message_type: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub creator: String,
    /// Unix epoch milliseconds.
    pub created: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DismissedMessage {
    pub message_id: String,
    pub user_id: String,
    pub created: u64,
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Messages created at or after `cutoff` (epoch ms).
    async fn messages_since(&self, cutoff: u64) -> Result<Vec<Message>, AccessError>;

    async fn dismissed_by(&self, user_id: &str) -> Result<Vec<DismissedMessage>, AccessError>;

    async fn save_message(&self, message: Message) -> Result<(), AccessError>;

    async fn save_dismissal(&self, dismissal: DismissedMessage) -> Result<(), AccessError>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

#[derive(Clone, Default)]
pub struct InMemoryMessageStore {
    messages: Arc<RwLock<Vec<Message>>>,
    dismissals: Arc<RwLock<Vec<DismissedMessage>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn messages_since(&self, cutoff: u64) -> Result<Vec<Message>, AccessError> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .filter(|m| m.created >= cutoff)
            .cloned()
            .collect())
    }

    async fn dismissed_by(&self, user_id: &str) -> Result<Vec<DismissedMessage>, AccessError> {
        let dismissals = self.dismissals.read().await;
        Ok(dismissals
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save_message(&self, message: Message) -> Result<(), AccessError> {
        self.messages.write().await.push(message);
        Ok(())
    }

    async fn save_dismissal(&self, dismissal: DismissedMessage) -> Result<(), AccessError> {
        self.dismissals.write().await.push(dismissal);
        Ok(())
    }
}

// =============================================================================
// Message Service
// =============================================================================

#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    audit: AuditLogger,
    recent_period_ms: u64,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageStore>, audit: AuditLogger, config: &AccessConfig) -> Self {
        MessageService {
            store,
            audit,
            recent_period_ms: config.dismissed_messages_time_period,
        }
    }

    /// Messages from the configured recent period that `user` has not dismissed.
    pub async fn recent_messages(&self, user: &User) -> Result<Vec<Message>, AccessError> {
        let cutoff = now_millis().saturating_sub(self.recent_period_ms);

        let (messages, dismissed) = futures_util::future::try_join(
            self.store.messages_since(cutoff),
            self.store.dismissed_by(user.get_username()),
        )
        .await?;

        Ok(messages
            .into_iter()
            .filter(|m| !dismissed.iter().any(|d| d.message_id == m.id))
            .collect())
    }

    /// Dismisses each message for `user`, auditing before saving.
    ///
    /// Stops at the first audit or storage failure; dismissals already saved
    /// are kept.
    pub async fn dismiss(
        &self,
        message_ids: &[String],
        user: &User,
        ctx: &AccessContext,
    ) -> Result<Vec<DismissedMessage>, AccessError> {
        let mut dismissed = Vec::with_capacity(message_ids.len());

        for message_id in message_ids {
            let dismissal = DismissedMessage {
                message_id: message_id.clone(),
                user_id: user.get_username().to_string(),
                created: now_millis(),
            };

            self.audit
                .log_user_action(
                    ctx,
                    user,
                    "message dismissed",
                    "message",
                    "dismissed",
                    json!(dismissal),
                )
                .await?;
            self.store.save_dismissal(dismissal.clone()).await?;
            dismissed.push(dismissal);
        }

        Ok(dismissed)
    }

    pub async fn create(&self, message: Message) -> Result<(), AccessError> {
        self.store.save_message(message).await
    }
}
