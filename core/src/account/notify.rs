//! Outgoing mail and the account-approved notification.

use std::sync::Arc;

use async_trait::async_trait;
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::http::error::AccessError;
use crate::http::security::{AccessConfig, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    pub from: String,
    pub reply_to: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), AccessError>;
}

/// Keeps sent mail in memory.
#[derive(Clone, Default)]
pub struct InMemoryMailer {
    sent: Arc<RwLock<Vec<Email>>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Email> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, email: &Email) -> Result<(), AccessError> {
        self.sent.write().await.push(email.clone());
        Ok(())
    }
}

/// Tells a user their account was approved.
#[derive(Clone)]
pub struct NewUserEmail {
    mailer: Arc<dyn Mailer>,
    from: String,
    instance_name: String,
    client_url: String,
    contact_email: String,
}

impl NewUserEmail {
    pub fn new(mailer: Arc<dyn Mailer>, config: &AccessConfig) -> Self {
        NewUserEmail {
            mailer,
            from: config.mailer.from.clone(),
            instance_name: config.app.instance_name.clone(),
            client_url: config.app.client_url.clone(),
            contact_email: config.contact_email.clone(),
        }
    }

    pub fn subject(&self) -> String {
        format!("Your {} account has been approved!", self.instance_name)
    }

    /// Every interpolated value is HTML-escaped.
    fn body(&self, user: &User) -> String {
        let app = encode_text(&self.instance_name);
        let url = encode_text(&self.client_url);
        let href = encode_double_quoted_attribute(&self.client_url);
        let contact = encode_text(&self.contact_email);
        let mailto = encode_double_quoted_attribute(&self.contact_email);
        format!(
            "<p>Hello {name},</p>\
             <p>Your {app} account has been approved. \
             Visit <a href=\"{href}\">{url}</a> to get started.</p>\
             <p>See <a href=\"{href}/help\">{url}/help</a> for help, \
             or contact <a href=\"mailto:{mailto}\">{contact}</a>.</p>",
            name = encode_text(user.get_name()),
        )
    }

    pub fn build(&self, user: &User) -> Email {
        Email {
            from: self.from.clone(),
            reply_to: self.from.clone(),
            to: user.get_email().to_string(),
            subject: self.subject(),
            html: self.body(user),
        }
    }

    pub async fn send(&self, user: &User) -> Result<(), AccessError> {
        let email = self.build(user);
        self.mailer.send(&email).await?;
        tracing::debug!(to = %email.to, "sent new user email");
        Ok(())
    }
}
