//! Shared kernel for the domain layer.
//!
//! Strongly-typed identifiers, timestamps, and the common error types
//! every domain module builds on.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode};
pub use ids::{MessageId, SessionId, UserId};
pub use timestamp::Timestamp;
