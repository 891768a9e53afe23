//! Quote request relay.
//!
//! A submitted quote request turns into two emails sent through the email
//! provider:
//!
//! 1. a notification to the business (`relay.business_recipient`), then
//! 2. an acknowledgment to the customer.
//!
//! If the notification fails the customer gets nothing and the caller sees
//! the error. There is no retry; the contact page keeps the form filled in
//! so the visitor can try again.
//!
//! The provider sits behind the [`Mailer`] trait. [`ResendMailer`] talks to
//! a Resend-compatible HTTP API.

use crate::config::{RelayConfig, SiteConfig};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const SEND_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid quote request: {0}")]
    Invalid(String),
    #[error("Email provider API key not set (expected in ${0})")]
    MissingApiKey(String),
    #[error("Invalid email provider URL: {0}")]
    BadUrl(#[from] url::ParseError),
    #[error("Email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Email provider rejected the message (HTTP {status}): {message}")]
    Provider { status: u16, message: String },
}

impl RelayError {
    /// Whether the submitter, not the provider, is at fault.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

/// A contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Service id chosen in the form; empty when none was picked.
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub message: String,
}

impl QuoteRequest {
    /// Reject submissions that cannot be delivered.
    pub fn validate(&self) -> Result<(), RelayError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(RelayError::Invalid(format!("{field} is required")));
            }
            if value.contains(['\r', '\n']) {
                return Err(RelayError::Invalid(format!("{field} must be a single line")));
            }
        }
        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
            && !email.contains(char::is_whitespace);
        if !valid_email {
            return Err(RelayError::Invalid(format!(
                "'{email}' is not an email address"
            )));
        }
        Ok(())
    }
}

/// One outgoing message, in the provider's JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Something that can deliver an [`Email`], returning the provider's id.
pub trait Mailer: Send + Sync {
    fn send(&self, email: &Email) -> impl Future<Output = Result<String, RelayError>> + Send;
}

/// Mailer for a Resend-compatible HTTP API.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_url: Url,
    api_key: String,
}

#[derive(Deserialize)]
struct SendResponse {
    id: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

impl ResendMailer {
    pub fn new(api_url: &str, api_key: impl Into<String>) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_url: Url::parse(api_url)?,
            api_key: api_key.into(),
        })
    }

    /// Build from config, reading the API key from the configured
    /// environment variable.
    pub fn from_config(relay: &RelayConfig) -> Result<Self, RelayError> {
        let api_key = std::env::var(&relay.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| RelayError::MissingApiKey(relay.api_key_env.clone()))?;
        Self::new(&relay.api_url, api_key)
    }
}

impl Mailer for ResendMailer {
    async fn send(&self, email: &Email) -> Result<String, RelayError> {
        let response = self
            .client
            .post(self.api_url.clone())
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(RelayError::Provider {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<SendResponse>().await?.id)
    }
}

/// Provider ids of the two messages sent for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReceipt {
    pub notification_id: String,
    pub acknowledgment_id: String,
}

/// Turns quote requests into emails and hands them to a [`Mailer`].
#[derive(Debug)]
pub struct QuoteRelay<M> {
    mailer: M,
    site: SiteConfig,
}

impl<M: Mailer> QuoteRelay<M> {
    pub fn new(mailer: M, config: &SiteConfig) -> Self {
        Self {
            mailer,
            site: config.clone(),
        }
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Validate, notify the business, then acknowledge the customer.
    pub async fn relay(&self, request: &QuoteRequest) -> Result<RelayReceipt, RelayError> {
        request.validate()?;
        tracing::info!(name = %request.name, service = %request.service, "sending quote request");

        let notification_id = self.mailer.send(&self.notification(request)).await?;
        tracing::info!(id = %notification_id, "quote request notification sent");

        let acknowledgment_id = self.mailer.send(&self.acknowledgment(request)).await?;
        tracing::info!(id = %acknowledgment_id, "quote request acknowledgment sent");

        Ok(RelayReceipt {
            notification_id,
            acknowledgment_id,
        })
    }

    /// Display name for the submitted service id, or `None` if empty.
    fn service_label<'a>(&'a self, request: &'a QuoteRequest) -> Option<&'a str> {
        let id = request.service.trim();
        if id.is_empty() {
            return None;
        }
        Some(self.site.service_title(id).unwrap_or(id))
    }

    /// Message to the business.
    pub fn notification(&self, request: &QuoteRequest) -> Email {
        let message = request.message.trim();
        let body: Markup = html! {
            h2 { "New Quote Request" }
            p { strong { "Name:" } " " (request.name) }
            p { strong { "Email:" } " " (request.email) }
            p { strong { "Phone:" } " " (request.phone) }
            p { strong { "Service:" } " " (self.service_label(request).unwrap_or("Not specified")) }
            p { strong { "Message:" } }
            p {
                @if message.is_empty() { "No additional message provided" } @else { (message) }
            }
            hr;
            p { em { "This quote request was submitted through your website contact form." } }
        };
        Email {
            from: self.site.relay.from.clone(),
            to: vec![self.site.relay.business_recipient.clone()],
            subject: format!("New Quote Request from {}", request.name.trim()),
            html: body.into_string(),
        }
    }

    /// Message to the customer.
    pub fn acknowledgment(&self, request: &QuoteRequest) -> Email {
        let message = request.message.trim();
        let body: Markup = html! {
            h2 { "Thank you for your quote request, " (request.name) "!" }
            p {
                "We have received your flooring quote request and will contact you within "
                "24 hours to schedule your free consultation."
            }
            h3 { "Your Request Details:" }
            p { strong { "Service:" } " " (self.service_label(request).unwrap_or("General consultation")) }
            p { strong { "Phone:" } " " (request.phone) }
            @if !message.is_empty() {
                p { strong { "Additional Details:" } " " (message) }
            }
            p { "If you have any urgent questions, please call us at " (self.site.business.phone) "." }
            p { "Best regards," br; (self.site.business.name) " Team" }
        };
        Email {
            from: self.site.relay.from.clone(),
            to: vec![request.email.trim().to_string()],
            subject: "Quote Request Received - We'll Contact You Soon!".to_string(),
            html: body.into_string(),
        }
    }
}
