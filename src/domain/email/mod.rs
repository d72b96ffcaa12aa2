//! Complaint email domain: drafts, extraction, and the pending slot.
//!
//! An assistant reply that follows the drafting format is parsed into an
//! [`EmailDraft`], parked in the [`PendingEmailSlot`], and dispatched only
//! after the user confirms.

mod draft;
mod extractor;
mod pending;

pub use draft::EmailDraft;
pub use extractor::{extract_draft, DraftExtraction};
pub use pending::PendingEmailSlot;
