//! Chat command and query handlers.

mod get_history;
mod submit_turn;

pub use get_history::{GetHistoryError, GetHistoryHandler, SessionTranscript};
pub use submit_turn::{
    SubmitTurnCommand, SubmitTurnError, SubmitTurnHandler, TurnReply, TurnReplyKind,
    CONFIRMATION_TOKEN,
};
