//! Email draft value object.

use crate::domain::bank::Bank;
use serde::{Deserialize, Serialize};

/// An unsent, structured email proposal derived from assistant output.
///
/// `body_text` holds only the complaint body; the greeting and sign-off are
/// reconstructed at render time so the outgoing mail reads as a full letter.
/// Drafts live only in the pending slot and are never persisted past it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDraft {
    /// Subject line, without the `Subject:` marker.
    subject: String,

    /// Complaint body between the salutation and the sign-off.
    body_text: String,

    /// The bank the complaint is addressed to.
    bank: Bank,

    /// Optional reply-to address for the user.
    reply_to: Option<String>,
}

impl EmailDraft {
    /// Creates a draft addressed to the given bank.
    pub fn new(
        subject: impl Into<String>,
        body_text: impl Into<String>,
        bank: Bank,
    ) -> Self {
        Self {
            subject: subject.into(),
            body_text: body_text.into(),
            bank,
            reply_to: None,
        }
    }

    /// Sets the reply-to address.
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Returns the subject line.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the complaint body.
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    /// Returns the recipient bank.
    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// Returns the reply-to address, if any.
    pub fn reply_to(&self) -> Option<&str> {
        self.reply_to.as_deref()
    }

    /// Renders the full letter as plain text: greeting, body, sign-off.
    pub fn letter_text(&self) -> String {
        format!(
            "Dear {} Customer Service,\n\n{}\n\nSincerely,\n[Your Name]",
            self.bank.name(),
            self.body_text
        )
    }

    /// Renders the full letter as minimal HTML (line breaks become `<br>`).
    pub fn letter_html(&self) -> String {
        let escaped = escape_html(&self.letter_text());
        escaped.replace('\n', "<br>\n")
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
