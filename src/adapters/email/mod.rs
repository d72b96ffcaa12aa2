//! Email dispatch adapters.
//!
//! - **SendGridDispatcher** - SendGrid v3 mail-send API
//! - **MockEmailDispatcher** - recording/failing dispatcher for tests

mod mock_dispatcher;
mod sendgrid_dispatcher;

pub use mock_dispatcher::MockEmailDispatcher;
pub use sendgrid_dispatcher::{SendGridConfig, SendGridDispatcher};
