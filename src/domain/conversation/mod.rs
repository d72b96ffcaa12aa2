//! Conversation domain: turns, bounded history, and the session aggregate.
//!
//! A session owns an ordered, capacity-bounded log of turns plus the single
//! pending-email slot that gates complaint dispatch. All mutation goes
//! through the session so the invariants hold in one place.

mod history;
mod message;
mod prompt;
mod session;

pub use history::{MessageHistory, DEFAULT_HISTORY_CAPACITY};
pub use message::{Message, Role};
pub use prompt::support_system_prompt;
pub use session::{ChatSession, SessionMode, MAX_TITLE_LENGTH};
