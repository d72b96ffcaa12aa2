//! Mock Email Dispatcher for testing.
//!
//! Records every send and can be switched into a failing mode so the
//! dispatch-failure path is testable without a real provider.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::ports::{DispatchError, EmailDispatcher, OutgoingEmail};

/// Mock dispatcher that records sends and optionally fails them.
#[derive(Debug, Clone, Default)]
pub struct MockEmailDispatcher {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    failing: Arc<Mutex<bool>>,
}

impl MockEmailDispatcher {
    /// Creates a dispatcher that accepts every send.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher that rejects every send.
    pub fn failing() -> Self {
        let dispatcher = Self::default();
        *dispatcher.failing.lock().unwrap() = true;
        dispatcher
    }

    /// Switches failure mode on or off.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    /// Returns the emails accepted so far.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Returns how many emails were accepted.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailDispatcher for MockEmailDispatcher {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DispatchError> {
        if *self.failing.lock().unwrap() {
            return Err(DispatchError::Rejected("mock dispatcher failing".to_string()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutgoingEmail {
        OutgoingEmail::new("to@bank.com", "Subject", "text", "html")
    }

    #[tokio::test]
    async fn records_accepted_sends() {
        let dispatcher = MockEmailDispatcher::new();
        dispatcher.send(email()).await.unwrap();

        assert_eq!(dispatcher.sent_count(), 1);
        assert_eq!(dispatcher.sent()[0].to, "to@bank.com");
    }

    #[tokio::test]
    async fn failing_mode_rejects_without_recording() {
        let dispatcher = MockEmailDispatcher::failing();
        let result = dispatcher.send(email()).await;

        assert!(matches!(result, Err(DispatchError::Rejected(_))));
        assert_eq!(dispatcher.sent_count(), 0);
    }

    #[tokio::test]
    async fn failure_mode_can_be_toggled() {
        let dispatcher = MockEmailDispatcher::failing();
        dispatcher.set_failing(false);
        assert!(dispatcher.send(email()).await.is_ok());
    }
}
