//! Email configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Email configuration (SendGrid)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SendGrid API key
    pub sendgrid_api_key: String,

    /// From email address (must be a verified sender)
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sendgrid_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("SENDGRID_API_KEY"));
        }
        if !self.sendgrid_api_key.starts_with("SG.") {
            return Err(ValidationError::InvalidSendGridKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sendgrid_api_key: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@bankconcierge.app".to_string()
}

fn default_from_name() -> String {
    "Bank Concierge".to_string()
}

fn default_timeout() -> u64 {
    30
}
