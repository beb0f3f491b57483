//! Chat command parsing and execution.
//!
//! # Overview
//!
//! 1. **Parsing** - [`Commander::parse`] turns a message body into a [`command::Command`],
//!    or `None` when the message is not a command (ordinary chat, unknown command,
//!    command with extra words). Non-commands are never answered.
//! 2. **Execution** - [`Commander::execute`] routes the command to its action handler.
//! 3. **Response** - handlers return a [`CommandResult`] holding the optional Markdown
//!    reply the bot posts back to the message.
//!
//! # Available Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `/sticker`, `/figurinha` | Turn the attached or replied image into a sticker |
//! | `/dado` | Roll a six-sided die |
//! | `/id` | Show the current chat identifier |
//! | `/sorteio` | Open a raffle in the current chat |
//! | `/entrar` | Enter the raffle of the current chat |
//! | `/ganhador` | Draw the winner of the raffle of the current chat |
//! | `/ajuda`, `/menu` | Display help information |
//!
//! # Error Handling
//!
//! Raffle outcomes (already open, nobody entered) are regular replies. Failures of
//! the messaging session (download, send) are logged and answered with a generic
//! error message: they never stop the bot.

use std::sync::Arc;

use crate::{
    raffle::RaffleController,
    session::{InboundMessage, MessagingSession},
};

mod actions;
mod command;
mod commander;
mod markdown_response;

pub use crate::commands::{command::Command, commander::Commander};

/// Runtime context for command execution.
///
/// # Fields
///
/// * `message` - The inbound message holding the command
/// * `session` - Messaging session used to download media and send replies
/// * `raffle` - The raffle shared with the control panel
pub struct CommandContext {
    /// Message the command was read from
    pub message: InboundMessage,
    /// Messaging session of the bot
    pub session: Arc<dyn MessagingSession>,
    /// Shared raffle controller
    pub raffle: Arc<RaffleController>,
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Markdown reply to the command message, if any
    pub response: Option<String>,
}

impl CommandResult {
    /// A result answering the command message with `response`.
    pub fn reply(response: String) -> Self {
        CommandResult {
            response: Some(response),
        }
    }

    /// A result without reply, for commands that already posted their output
    /// or that must be ignored silently.
    pub fn silent() -> Self {
        CommandResult { response: None }
    }
}
