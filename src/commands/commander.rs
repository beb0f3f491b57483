//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, the entry point for processing chat
//! commands. It coordinates command parsing and execution, routing commands to their
//! handlers.
//!
//! # Flow
//!
//! ```text
//! Inbound message → parse() → Command → execute() → CommandResult
//! ```
//!
//! # Examples
//!
//! ```ignore
//! let commander = Commander::new();
//!
//! if let Some(command) = commander.parse(&message.body) {
//!     let context = CommandContext { message, session, raffle };
//!     let result = commander.execute(&command, &context).await;
//! }
//! ```

use command_parser::Parser;
use log::{debug, error};

use crate::commands::{
    CommandContext, CommandResult,
    actions::{
        handle_chat_id, handle_dice, handle_draw_raffle, handle_enter_raffle, handle_help,
        handle_start_raffle, handle_sticker,
    },
    command::Command,
    markdown_response::format_internal_error,
};

/// Command orchestrator for parsing and executing chat commands.
///
/// # Command Prefix
///
/// All commands start with `/`. Messages that are not exactly a known command are
/// silently ignored.
pub struct Commander {
    /// Command parser for processing user commands
    parser: Parser,
}

impl Commander {
    /// Creates a new Commander, recognizing `/` as the command prefix.
    pub fn new() -> Self {
        let parser = Parser::new('/', '-');
        Commander { parser }
    }

    /// Parses a message body into a command.
    ///
    /// Returns `None` for everything that is not a known command without arguments:
    /// such messages are never answered.
    pub fn parse(&self, body: &str) -> Option<Command> {
        match Command::parse(&self.parser, body) {
            Ok(command) => Some(command),
            Err(e) => {
                debug!("ignoring message: {:?}", e);
                None
            }
        }
    }

    /// Executes a parsed command and returns the reply to post, if any.
    ///
    /// A handler failure is logged and answered with a generic error message.
    ///
    /// # Command Handlers
    ///
    /// - [`Command::Sticker`] → [`handle_sticker`]
    /// - [`Command::Dice`] → [`handle_dice`]
    /// - [`Command::ChatId`] → [`handle_chat_id`]
    /// - [`Command::StartRaffle`] → [`handle_start_raffle`]
    /// - [`Command::EnterRaffle`] → [`handle_enter_raffle`]
    /// - [`Command::DrawRaffle`] → [`handle_draw_raffle`]
    /// - [`Command::Help`] → [`handle_help`]
    pub async fn execute(&self, command: &Command, context: &CommandContext) -> CommandResult {
        let result = match command {
            Command::Sticker => handle_sticker(context).await,
            Command::Dice => Ok(handle_dice()),
            Command::ChatId => Ok(handle_chat_id(context)),
            Command::StartRaffle => Ok(handle_start_raffle(context).await),
            Command::EnterRaffle => Ok(handle_enter_raffle(context).await),
            Command::DrawRaffle => Ok(handle_draw_raffle(context).await),
            Command::Help => Ok(handle_help()),
        };

        result.unwrap_or_else(|e| {
            error!(
                "failed to execute {:?} in {}: {:?}",
                command, context.message.chat_id, e
            );
            CommandResult::reply(format_internal_error())
        })
    }
}
