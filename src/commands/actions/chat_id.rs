//! Chat identifier command handler.
//!
//! Replies with the identifier of the chat the command was posted in, so it can be
//! pasted in the control panel to start a raffle there.

use crate::commands::{CommandContext, CommandResult, markdown_response::format_chat_id};

/// Replies with the identifier of the current chat.
pub fn handle_chat_id(context: &CommandContext) -> CommandResult {
    CommandResult::reply(format_chat_id(&context.message.chat_id))
}
