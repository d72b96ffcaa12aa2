//! SubmitTurn command handler - the conversation turn controller.
//!
//! Consumes one user input per call and decides whether it is a confirmation
//! command or a fresh query. A query goes to the model; the reply is
//! inspected for an email draft, which is parked in the session's pending
//! slot until the user confirms with the literal token `send`.
//!
//! Every collaborator failure is converted into a user-visible chat message
//! here; nothing propagates far enough to take the session down.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::domain::bank::BankDirectory;
use crate::domain::conversation::{support_system_prompt, ChatSession, Role};
use crate::domain::email::{extract_draft, DraftExtraction, EmailDraft};
use crate::domain::foundation::{SessionId, UserId};
use crate::ports::{
    AiProvider, ChatRole, CompletionRequest, EmailDispatcher, OutgoingEmail, SessionStore,
};

/// The literal user input that authorizes sending the pending draft.
pub const CONFIRMATION_TOKEN: &str = "send";

/// Reply sent when the user confirms but nothing is pending.
const NO_PENDING_EMAIL_REPLY: &str = "No pending email to send.";

/// Generic notice for a failed dispatch; transport detail stays in the log.
const DISPATCH_FAILED_REPLY: &str =
    "I'm sorry, I wasn't able to send the email. Please ask me to draft it again if you'd like to retry.";

/// Generic apology for a failed model call.
const MODEL_FAILED_REPLY: &str =
    "I'm sorry, something went wrong while answering. Please try again.";

/// Command to submit one conversation turn.
#[derive(Debug, Clone)]
pub struct SubmitTurnCommand {
    /// Session to continue; `None` starts a fresh session.
    pub session_id: Option<SessionId>,
    /// Optional (unverified) owner for a fresh session.
    pub owner_id: Option<UserId>,
    /// The user's input.
    pub message: String,
}

impl SubmitTurnCommand {
    /// Creates a command for an existing session.
    pub fn new(session_id: SessionId, message: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id),
            owner_id: None,
            message: message.into(),
        }
    }

    /// Creates a command that starts a fresh session.
    pub fn fresh(message: impl Into<String>) -> Self {
        Self {
            session_id: None,
            owner_id: None,
            message: message.into(),
        }
    }

    /// Sets the owner for a fresh session.
    pub fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }
}

/// Closed tag set the presentation layer switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnReplyKind {
    /// Ordinary conversational reply.
    Text,
    /// A draft is parked and awaits the confirmation token.
    DraftReady,
    /// The pending email was dispatched.
    Sent,
    /// A collaborator failed; the text is a generic notice.
    Error,
}

/// Result of submitting a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    /// The session this turn belongs to (fresh sessions get a new id).
    pub session_id: SessionId,
    /// What the reply is, as an explicit tag.
    pub kind: TurnReplyKind,
    /// The text to show the user.
    pub text: String,
    /// True when a draft is pending and `send` will dispatch it.
    pub pending_confirmation: bool,
}

/// Errors that can occur when submitting a turn.
///
/// Collaborator failures do not appear here; they become [`TurnReply`]s with
/// [`TurnReplyKind::Error`]. Only request-shaped problems and a broken
/// session store surface as errors.
#[derive(Debug, Error)]
pub enum SubmitTurnError {
    /// Message content is empty or whitespace only.
    #[error("Validation error: message cannot be empty")]
    EmptyMessage,

    /// The session store failed while loading.
    #[error("Session store error: {0}")]
    StoreError(String),
}

/// Handler for SubmitTurn commands.
pub struct SubmitTurnHandler<S, A, E>
where
    S: SessionStore + ?Sized,
    A: AiProvider + ?Sized,
    E: EmailDispatcher + ?Sized,
{
    session_store: Arc<S>,
    ai_provider: Arc<A>,
    email_dispatcher: Arc<E>,
    bank_directory: Arc<BankDirectory>,
    history_capacity: usize,
}

impl<S, A, E> SubmitTurnHandler<S, A, E>
where
    S: SessionStore + ?Sized + 'static,
    A: AiProvider + ?Sized + 'static,
    E: EmailDispatcher + ?Sized + 'static,
{
    /// Creates a new handler with the given dependencies.
    pub fn new(
        session_store: Arc<S>,
        ai_provider: Arc<A>,
        email_dispatcher: Arc<E>,
        bank_directory: Arc<BankDirectory>,
        history_capacity: usize,
    ) -> Self {
        Self {
            session_store,
            ai_provider,
            email_dispatcher,
            bank_directory,
            history_capacity,
        }
    }

    /// Handles one conversation turn.
    ///
    /// # Errors
    ///
    /// - `EmptyMessage` if the input is blank
    /// - `StoreError` if the session store fails while loading
    pub async fn handle(&self, cmd: SubmitTurnCommand) -> Result<TurnReply, SubmitTurnError> {
        let content = cmd.message.trim();
        if content.is_empty() {
            return Err(SubmitTurnError::EmptyMessage);
        }

        let mut session = self.load_or_create(&cmd).await?;

        let reply = if is_confirmation(content) {
            self.handle_confirmation(&mut session).await
        } else {
            self.handle_query(&mut session, content).await
        };

        // Best-effort persistence: a failed save is logged, not fatal.
        if let Err(e) = self.session_store.save(&session).await {
            warn!(session_id = %session.id(), error = %e, "failed to persist session");
        }

        Ok(reply)
    }

    async fn load_or_create(
        &self,
        cmd: &SubmitTurnCommand,
    ) -> Result<ChatSession, SubmitTurnError> {
        if let Some(id) = cmd.session_id {
            match self.session_store.find(&id).await {
                Ok(Some(session)) => return Ok(session),
                Ok(None) => {}
                Err(e) => return Err(SubmitTurnError::StoreError(e.to_string())),
            }
        }
        Ok(ChatSession::new(
            cmd.session_id.unwrap_or_default(),
            cmd.owner_id.clone(),
            self.history_capacity,
        ))
    }

    /// The confirmation path: take the pending draft and dispatch it.
    ///
    /// The slot is cleared before the outcome is known, so a failed send
    /// cannot be replayed by a second confirmation.
    async fn handle_confirmation(&self, session: &mut ChatSession) -> TurnReply {
        let Some(draft) = session.take_pending_draft() else {
            return self.reply(session, TurnReplyKind::Text, NO_PENDING_EMAIL_REPLY);
        };

        match self.email_dispatcher.send(outgoing_email(&draft)).await {
            Ok(()) => self.reply(
                session,
                TurnReplyKind::Sent,
                format!("Email sent to {}.", draft.bank().name()),
            ),
            Err(e) => {
                error!(
                    session_id = %session.id(),
                    bank = draft.bank().name(),
                    error = %e,
                    "email dispatch failed"
                );
                self.reply(session, TurnReplyKind::Error, DISPATCH_FAILED_REPLY)
            }
        }
    }

    /// The query path: record the turn, ask the model, inspect the reply.
    async fn handle_query(&self, session: &mut ChatSession, content: &str) -> TurnReply {
        if let Err(e) = session.record_user_turn(content) {
            // Content was validated non-empty above; treat as a model-side
            // failure rather than crashing the turn.
            error!(session_id = %session.id(), error = %e, "failed to record user turn");
            return self.reply(session, TurnReplyKind::Error, MODEL_FAILED_REPLY);
        }

        let request = self.completion_request(session);
        let model_reply = match self.ai_provider.complete(request).await {
            Ok(response) => response.content,
            Err(e) => {
                // The user's turn stays recorded; no synthetic assistant turn.
                error!(session_id = %session.id(), error = %e, "model call failed");
                return self.reply(session, TurnReplyKind::Error, MODEL_FAILED_REPLY);
            }
        };

        if let Err(e) = session.record_assistant_turn(&model_reply) {
            error!(session_id = %session.id(), error = %e, "failed to record assistant turn");
            return self.reply(session, TurnReplyKind::Error, MODEL_FAILED_REPLY);
        }

        match extract_draft(&model_reply, &self.bank_directory) {
            DraftExtraction::Draft(draft) => {
                let preview = draft_preview(&draft);
                session.set_pending_draft(draft);
                self.reply(session, TurnReplyKind::DraftReady, preview)
            }
            DraftExtraction::UnknownBank { name } => self.reply(
                session,
                TurnReplyKind::Text,
                format!(
                    "I'm sorry, but I couldn't find {} in my list of supported banks. \
                     Can you please specify a bank from the list I provided earlier?",
                    name
                ),
            ),
            DraftExtraction::NotADraft => self.reply(session, TurnReplyKind::Text, model_reply),
        }
    }

    fn completion_request(&self, session: &ChatSession) -> CompletionRequest {
        let mut request = CompletionRequest::new()
            .with_system_prompt(support_system_prompt(&self.bank_directory))
            .with_temperature(0.0);

        for message in session.history().iter() {
            let role = match message.role() {
                Role::System => ChatRole::System,
                Role::User => ChatRole::User,
                Role::Assistant => ChatRole::Assistant,
            };
            request = request.with_message(role, message.content());
        }

        request
    }

    fn reply(
        &self,
        session: &ChatSession,
        kind: TurnReplyKind,
        text: impl Into<String>,
    ) -> TurnReply {
        TurnReply {
            session_id: *session.id(),
            kind,
            text: text.into(),
            pending_confirmation: !session.has_no_pending_draft(),
        }
    }
}

/// Checks whether the input is the confirmation token.
fn is_confirmation(content: &str) -> bool {
    content.trim().eq_ignore_ascii_case(CONFIRMATION_TOKEN)
}

/// Builds the outgoing email for a confirmed draft.
fn outgoing_email(draft: &EmailDraft) -> OutgoingEmail {
    let mut email = OutgoingEmail::new(
        draft.bank().contact_email(),
        draft.subject(),
        draft.letter_text(),
        draft.letter_html(),
    );
    if let Some(reply_to) = draft.reply_to() {
        email = email.with_reply_to(reply_to);
    }
    email
}

/// Renders the draft preview with the confirmation instruction.
fn draft_preview(draft: &EmailDraft) -> String {
    format!(
        "Here is the email I am about to send to {bank}:\n\n\
         To: {to}\n\
         Subject: {subject}\n\n\
         {letter}\n\n\
         If you want to send this email, reply with '{token}'.",
        bank = draft.bank().name(),
        to = draft.bank().contact_email(),
        subject = draft.subject(),
        letter = draft.letter_text(),
        token = CONFIRMATION_TOKEN,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAiProvider;
    use crate::adapters::email::MockEmailDispatcher;
    use crate::adapters::storage::InMemorySessionStore;

    const DRAFT_REPLY: &str = "Subject: Stolen card\n\
        Dear GlobalBank Customer Service,\n\
        \n\
        My card was stolen yesterday and I would like it blocked immediately.\n\
        \n\
        Sincerely,\n\
        [User's Name (to be filled by the user)]";

    struct Fixture {
        store: Arc<InMemorySessionStore>,
        provider: Arc<MockAiProvider>,
        dispatcher: Arc<MockEmailDispatcher>,
        handler: SubmitTurnHandler<InMemorySessionStore, MockAiProvider, MockEmailDispatcher>,
    }

    fn fixture(provider: MockAiProvider, dispatcher: MockEmailDispatcher) -> Fixture {
        let store = Arc::new(InMemorySessionStore::new());
        let provider = Arc::new(provider);
        let dispatcher = Arc::new(dispatcher);
        let handler = SubmitTurnHandler::new(
            Arc::clone(&store),
            Arc::clone(&provider),
            Arc::clone(&dispatcher),
            Arc::new(BankDirectory::builtin()),
            20,
        );
        Fixture {
            store,
            provider,
            dispatcher,
            handler,
        }
    }

    mod input_validation {
        use super::*;

        #[tokio::test]
        async fn rejects_empty_message() {
            let fx = fixture(MockAiProvider::new(), MockEmailDispatcher::new());
            let result = fx.handler.handle(SubmitTurnCommand::fresh("   \n\t ")).await;
            assert!(matches!(result, Err(SubmitTurnError::EmptyMessage)));
        }
    }

    mod plain_queries {
        use super::*;

        #[tokio::test]
        async fn relays_model_reply_verbatim() {
            let fx = fixture(
                MockAiProvider::new().with_response("Call the fraud line right away."),
                MockEmailDispatcher::new(),
            );

            let reply = fx
                .handler
                .handle(SubmitTurnCommand::fresh("my card was stolen"))
                .await
                .unwrap();

            assert_eq!(reply.kind, TurnReplyKind::Text);
            assert_eq!(reply.text, "Call the fraud line right away.");
            assert!(!reply.pending_confirmation);
        }

        #[tokio::test]
        async fn records_both_turns_in_history() {
            let fx = fixture(
                MockAiProvider::new().with_response("Happy to help."),
                MockEmailDispatcher::new(),
            );

            let reply = fx
                .handler
                .handle(SubmitTurnCommand::fresh("hello"))
                .await
                .unwrap();

            let session = fx.store.find(&reply.session_id).await.unwrap().unwrap();
            assert_eq!(session.history().len(), 2);
            assert_eq!(session.title(), Some("hello"));
        }

        #[tokio::test]
        async fn later_turns_reuse_the_session() {
            let fx = fixture(
                MockAiProvider::new().with_response("Reply."),
                MockEmailDispatcher::new(),
            );

            let first = fx
                .handler
                .handle(SubmitTurnCommand::fresh("first"))
                .await
                .unwrap();
            let second = fx
                .handler
                .handle(SubmitTurnCommand::new(first.session_id, "second"))
                .await
                .unwrap();

            assert_eq!(first.session_id, second.session_id);
            let session = fx.store.find(&first.session_id).await.unwrap().unwrap();
            assert_eq!(session.history().len(), 4);
        }

        #[tokio::test]
        async fn sends_system_prompt_and_history_to_model() {
            let fx = fixture(
                MockAiProvider::new().with_response("Reply."),
                MockEmailDispatcher::new(),
            );

            fx.handler
                .handle(SubmitTurnCommand::fresh("what banks do you support?"))
                .await
                .unwrap();

            let calls = fx.provider.calls();
            assert_eq!(calls.len(), 1);
            let prompt = calls[0].system_prompt.as_deref().unwrap();
            assert!(prompt.contains("GlobalBank"));
            assert_eq!(calls[0].messages.last().unwrap().content, "what banks do you support?");
        }
    }

    mod drafting_flow {
        use super::*;

        #[tokio::test]
        async fn draft_reply_parks_a_pending_email() {
            let fx = fixture(
                MockAiProvider::new().with_response(DRAFT_REPLY),
                MockEmailDispatcher::new(),
            );

            let reply = fx
                .handler
                .handle(SubmitTurnCommand::fresh("complain to GlobalBank for me"))
                .await
                .unwrap();

            assert_eq!(reply.kind, TurnReplyKind::DraftReady);
            assert!(reply.pending_confirmation);
            assert!(reply.text.contains("Subject: Stolen card"));
            assert!(reply.text.contains("reply with 'send'"));

            let session = fx.store.find(&reply.session_id).await.unwrap().unwrap();
            assert!(!session.has_no_pending_draft());
        }

        #[tokio::test]
        async fn unknown_bank_asks_for_clarification_and_leaves_slot_empty() {
            let fx = fixture(
                MockAiProvider::new().with_response(
                    "Subject: Complaint\nDear Unknown Corp Customer Service,\nPlease fix this.",
                ),
                MockEmailDispatcher::new(),
            );

            let reply = fx
                .handler
                .handle(SubmitTurnCommand::fresh("complain for me"))
                .await
                .unwrap();

            assert_eq!(reply.kind, TurnReplyKind::Text);
            assert!(reply.text.contains("Unknown Corp"));
            assert!(!reply.pending_confirmation);

            let session = fx.store.find(&reply.session_id).await.unwrap().unwrap();
            assert!(session.has_no_pending_draft());
        }

        #[tokio::test]
        async fn newer_draft_supersedes_older_one() {
            let second_draft = "Subject: Locked account\n\
                Dear UnionBank Customer Service,\n\
                \n\
                My online banking access is locked.\n\
                \n\
                Sincerely,\n\
                [User's Name (to be filled by the user)]";
            let fx = fixture(
                MockAiProvider::new()
                    .with_response(DRAFT_REPLY)
                    .with_response(second_draft),
                MockEmailDispatcher::new(),
            );

            let first = fx
                .handler
                .handle(SubmitTurnCommand::fresh("complain to GlobalBank"))
                .await
                .unwrap();
            fx.handler
                .handle(SubmitTurnCommand::new(first.session_id, "actually, UnionBank"))
                .await
                .unwrap();

            let session = fx.store.find(&first.session_id).await.unwrap().unwrap();
            let pending = session.peek_pending_draft().unwrap();
            assert_eq!(pending.bank().name(), "UnionBank");
        }

        #[tokio::test]
        async fn ordinary_reply_leaves_existing_draft_pending() {
            let fx = fixture(
                MockAiProvider::new()
                    .with_response(DRAFT_REPLY)
                    .with_response("Anything else I can help with?"),
                MockEmailDispatcher::new(),
            );

            let first = fx
                .handler
                .handle(SubmitTurnCommand::fresh("complain to GlobalBank"))
                .await
                .unwrap();
            let second = fx
                .handler
                .handle(SubmitTurnCommand::new(first.session_id, "thanks"))
                .await
                .unwrap();

            assert_eq!(second.kind, TurnReplyKind::Text);
            assert!(second.pending_confirmation);

            let session = fx.store.find(&first.session_id).await.unwrap().unwrap();
            assert!(!session.has_no_pending_draft());
        }
    }

    mod confirmation_flow {
        use super::*;

        #[tokio::test]
        async fn send_dispatches_the_pending_draft() {
            let fx = fixture(
                MockAiProvider::new().with_response(DRAFT_REPLY),
                MockEmailDispatcher::new(),
            );

            let first = fx
                .handler
                .handle(SubmitTurnCommand::fresh("complain to GlobalBank"))
                .await
                .unwrap();
            let confirm = fx
                .handler
                .handle(SubmitTurnCommand::new(first.session_id, "send"))
                .await
                .unwrap();

            assert_eq!(confirm.kind, TurnReplyKind::Sent);
            assert_eq!(confirm.text, "Email sent to GlobalBank.");
            assert!(!confirm.pending_confirmation);

            let sent = fx.dispatcher.sent();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].to, "support@globalbank.com");
            assert_eq!(sent[0].subject, "Stolen card");
            assert!(sent[0].text.starts_with("Dear GlobalBank Customer Service,"));
            assert!(sent[0].html.contains("<br>"));
        }

        #[tokio::test]
        async fn confirmation_token_is_case_and_whitespace_insensitive() {
            let fx = fixture(
                MockAiProvider::new().with_response(DRAFT_REPLY),
                MockEmailDispatcher::new(),
            );

            let first = fx
                .handler
                .handle(SubmitTurnCommand::fresh("complain to GlobalBank"))
                .await
                .unwrap();
            let confirm = fx
                .handler
                .handle(SubmitTurnCommand::new(first.session_id, "  SEND \n"))
                .await
                .unwrap();

            assert_eq!(confirm.kind, TurnReplyKind::Sent);
        }

        #[tokio::test]
        async fn empty_slot_confirmation_is_a_no_op() {
            let fx = fixture(MockAiProvider::new(), MockEmailDispatcher::new());

            let reply = fx
                .handler
                .handle(SubmitTurnCommand::fresh("send"))
                .await
                .unwrap();

            assert_eq!(reply.kind, TurnReplyKind::Text);
            assert_eq!(reply.text, "No pending email to send.");
            assert_eq!(fx.dispatcher.sent_count(), 0);
            assert_eq!(fx.provider.call_count(), 0);
        }

        #[tokio::test]
        async fn second_confirmation_finds_nothing_to_send() {
            let fx = fixture(
                MockAiProvider::new().with_response(DRAFT_REPLY),
                MockEmailDispatcher::new(),
            );

            let first = fx
                .handler
                .handle(SubmitTurnCommand::fresh("complain to GlobalBank"))
                .await
                .unwrap();
            fx.handler
                .handle(SubmitTurnCommand::new(first.session_id, "send"))
                .await
                .unwrap();
            let again = fx
                .handler
                .handle(SubmitTurnCommand::new(first.session_id, "send"))
                .await
                .unwrap();

            assert_eq!(again.text, "No pending email to send.");
            assert_eq!(fx.dispatcher.sent_count(), 1);
        }

        #[tokio::test]
        async fn confirmation_turns_are_not_recorded_in_history() {
            let fx = fixture(
                MockAiProvider::new().with_response(DRAFT_REPLY),
                MockEmailDispatcher::new(),
            );

            let first = fx
                .handler
                .handle(SubmitTurnCommand::fresh("complain to GlobalBank"))
                .await
                .unwrap();
            fx.handler
                .handle(SubmitTurnCommand::new(first.session_id, "send"))
                .await
                .unwrap();

            let session = fx.store.find(&first.session_id).await.unwrap().unwrap();
            // One user turn plus one assistant turn; "send" is a command,
            // not conversation.
            assert_eq!(session.history().len(), 2);
        }
    }

    mod dispatch_failures {
        use super::*;

        #[tokio::test]
        async fn failed_dispatch_reports_generic_error_and_clears_slot() {
            let fx = fixture(
                MockAiProvider::new().with_response(DRAFT_REPLY),
                MockEmailDispatcher::failing(),
            );

            let first = fx
                .handler
                .handle(SubmitTurnCommand::fresh("complain to GlobalBank"))
                .await
                .unwrap();
            let confirm = fx
                .handler
                .handle(SubmitTurnCommand::new(first.session_id, "send"))
                .await
                .unwrap();

            assert_eq!(confirm.kind, TurnReplyKind::Error);
            assert!(!confirm.pending_confirmation);

            // The slot is already cleared: no silent retry is possible.
            let again = fx
                .handler
                .handle(SubmitTurnCommand::new(first.session_id, "send"))
                .await
                .unwrap();
            assert_eq!(again.text, "No pending email to send.");
            assert_eq!(fx.dispatcher.sent_count(), 0);
        }
    }

    mod model_failures {
        use super::*;

        #[tokio::test]
        async fn model_error_yields_apology_and_keeps_user_turn() {
            let fx = fixture(
                MockAiProvider::new().with_unavailable("overloaded"),
                MockEmailDispatcher::new(),
            );

            let reply = fx
                .handler
                .handle(SubmitTurnCommand::fresh("my card was stolen"))
                .await
                .unwrap();

            assert_eq!(reply.kind, TurnReplyKind::Error);
            assert_eq!(reply.text, MODEL_FAILED_REPLY);

            let session = fx.store.find(&reply.session_id).await.unwrap().unwrap();
            assert_eq!(session.history().len(), 1);
            assert_eq!(session.history().last().unwrap().role(), Role::User);
        }

        #[tokio::test]
        async fn model_timeout_is_surfaced_like_any_failure() {
            let fx = fixture(
                MockAiProvider::new().with_timeout(),
                MockEmailDispatcher::new(),
            );

            let reply = fx
                .handler
                .handle(SubmitTurnCommand::fresh("hello"))
                .await
                .unwrap();

            assert_eq!(reply.kind, TurnReplyKind::Error);
        }

        #[tokio::test]
        async fn model_error_leaves_pending_draft_untouched() {
            let fx = fixture(
                MockAiProvider::new()
                    .with_response(DRAFT_REPLY)
                    .with_unavailable("overloaded"),
                MockEmailDispatcher::new(),
            );

            let first = fx
                .handler
                .handle(SubmitTurnCommand::fresh("complain to GlobalBank"))
                .await
                .unwrap();
            let second = fx
                .handler
                .handle(SubmitTurnCommand::new(first.session_id, "one more thing"))
                .await
                .unwrap();

            assert_eq!(second.kind, TurnReplyKind::Error);
            assert!(second.pending_confirmation);
        }
    }
}
