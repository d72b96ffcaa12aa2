//! SendGrid Dispatcher - Implementation of EmailDispatcher for SendGrid.
//!
//! Sends through the v3 mail-send endpoint. The from address must be a
//! verified sender on the SendGrid account.
//!
//! # Configuration
//!
//! ```ignore
//! let config = SendGridConfig::new(api_key, "noreply@bankconcierge.app", "Bank Concierge");
//! let dispatcher = SendGridDispatcher::new(config);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde_json::json;
use std::time::Duration;

use crate::ports::{DispatchError, EmailDispatcher, OutgoingEmail};

/// Configuration for the SendGrid dispatcher.
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Verified sender address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
    /// Base URL for the API (default: https://api.sendgrid.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl SendGridConfig {
    /// Creates a new configuration.
    pub fn new(
        api_key: impl Into<String>,
        from_email: impl Into<String>,
        from_name: impl Into<String>,
    ) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            from_email: from_email.into(),
            from_name: from_name.into(),
            base_url: "https://api.sendgrid.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// SendGrid email dispatcher implementation.
pub struct SendGridDispatcher {
    config: SendGridConfig,
    client: Client,
}

impl SendGridDispatcher {
    /// Creates a new SendGrid dispatcher with the given configuration.
    pub fn new(config: SendGridConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the mail-send endpoint URL.
    fn send_url(&self) -> String {
        format!("{}/v3/mail/send", self.config.base_url)
    }

    /// Builds the v3 mail-send payload.
    fn to_payload(&self, email: &OutgoingEmail) -> serde_json::Value {
        let mut payload = json!({
            "personalizations": [{ "to": [{ "email": email.to }] }],
            "from": {
                "email": self.config.from_email,
                "name": self.config.from_name,
            },
            "subject": email.subject,
            "content": [
                { "type": "text/plain", "value": email.text },
                { "type": "text/html", "value": email.html },
            ],
        });

        if let Some(ref reply_to) = email.reply_to {
            payload["reply_to"] = json!({ "email": reply_to });
        }

        payload
    }
}

#[async_trait]
impl EmailDispatcher for SendGridDispatcher {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DispatchError> {
        let payload = self.to_payload(&email);

        let response = self
            .client
            .post(self.send_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DispatchError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    DispatchError::Network(format!("Connection failed: {}", e))
                } else {
                    DispatchError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(DispatchError::AuthenticationFailed),
            _ => Err(DispatchError::Rejected(format!(
                "Status {}: {}",
                status, error_body
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> SendGridDispatcher {
        SendGridDispatcher::new(SendGridConfig::new(
            "SG.test",
            "noreply@bankconcierge.app",
            "Bank Concierge",
        ))
    }

    #[test]
    fn payload_carries_both_content_types() {
        let email = OutgoingEmail::new(
            "support@globalbank.com",
            "Card lost",
            "plain body",
            "<p>html body</p>",
        );
        let payload = dispatcher().to_payload(&email);

        assert_eq!(
            payload["personalizations"][0]["to"][0]["email"],
            "support@globalbank.com"
        );
        assert_eq!(payload["content"][0]["type"], "text/plain");
        assert_eq!(payload["content"][1]["type"], "text/html");
        assert_eq!(payload["subject"], "Card lost");
    }

    #[test]
    fn payload_includes_reply_to_when_present() {
        let email = OutgoingEmail::new("to@bank.com", "S", "t", "h")
            .with_reply_to("user@example.com");
        let payload = dispatcher().to_payload(&email);
        assert_eq!(payload["reply_to"]["email"], "user@example.com");
    }

    #[test]
    fn payload_omits_reply_to_when_absent() {
        let email = OutgoingEmail::new("to@bank.com", "S", "t", "h");
        let payload = dispatcher().to_payload(&email);
        assert!(payload.get("reply_to").is_none());
    }
}
