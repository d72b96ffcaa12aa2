//! Ports: async trait boundaries between the core and its collaborators.
//!
//! Adapters implement these; application handlers depend on them.

mod ai_provider;
mod email_dispatcher;
mod session_store;

pub use ai_provider::{
    AiError, AiProvider, ChatMessage, ChatRole, CompletionRequest, CompletionResponse,
    ProviderInfo,
};
pub use email_dispatcher::{DispatchError, EmailDispatcher, OutgoingEmail};
pub use session_store::{SessionStore, SessionStoreError};
