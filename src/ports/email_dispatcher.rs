//! Email dispatcher port - interface for transactional email delivery.
//!
//! The core hands a fully-formed send request across this boundary and only
//! learns success or failure. Transport detail stays in the error for the
//! log; it never reaches conversation state.

use async_trait::async_trait;

/// A fully-formed outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
    /// HTML body.
    pub html: String,
    /// Optional reply-to address.
    pub reply_to: Option<String>,
}

impl OutgoingEmail {
    /// Creates an outgoing email without a reply-to address.
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        text: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
            html: html.into(),
            reply_to: None,
        }
    }

    /// Sets the reply-to address.
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

/// Errors that can occur during email dispatch.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Provider rejected the request.
    #[error("provider rejected the send: {0}")]
    Rejected(String),

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

/// Port for dispatching outgoing email.
///
/// Implementations must bound the send with a timeout; any transport error
/// is reported as a [`DispatchError`], never panicked on.
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    /// Sends an email, reporting success or failure.
    async fn send(&self, email: OutgoingEmail) -> Result<(), DispatchError>;
}
