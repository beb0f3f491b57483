//! Command parsing.
//!
//! This module converts chat message text into structured [`Command`] enums.
//! Commands are matched on the whole normalized message: a known command followed
//! by extra words is not a command.

use command_parser::Parser;
use log::debug;

/// Represents a parsed chat command.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Command {
    /// Turn an image into a sticker (`/sticker`, `/figurinha`)
    Sticker,
    /// Roll a six-sided die (`/dado`)
    Dice,
    /// Show the identifier of the current chat (`/id`)
    ChatId,
    /// Open a raffle in the current chat (`/sorteio`)
    StartRaffle,
    /// Enter the raffle open in the current chat (`/entrar`)
    EnterRaffle,
    /// Draw the winner of the raffle open in the current chat (`/ganhador`)
    DrawRaffle,
    /// Display help information (`/ajuda`, `/menu`)
    Help,
}

/// Reasons a message is not a command. None of them is reported to the user.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParsingError {
    /// The message does not start with the command prefix
    UnableToParse,
    /// The command is followed by extra words, options included
    UnexpectedArguments,
    /// The command name is not recognized
    Unknown,
}

impl Command {
    /// Parses a message body into a Command.
    ///
    /// The body is trimmed and lowercased before matching, so `  /DADO ` is a [`Command::Dice`].
    ///
    /// # Errors
    ///
    /// - [`CommandParsingError::UnableToParse`] for regular chat messages
    /// - [`CommandParsingError::UnexpectedArguments`] for `/dado 20` and alike
    /// - [`CommandParsingError::Unknown`] for unknown command names
    pub fn parse(parser: &Parser, body: &str) -> Result<Self, CommandParsingError> {
        let normalized = body.trim().to_lowercase();

        // The parser ignores the last word, so we add a dummy word at the end
        let input = normalized + " dummy";

        let command = match parser.parse(&input) {
            Ok(cmd) => cmd,
            Err(_) => return Err(CommandParsingError::UnableToParse),
        };

        debug!("parsing command: {:?}", command);

        if !command.arguments.is_empty()
            || !command.options.is_empty()
            || !command.parameters.is_empty()
        {
            return Err(CommandParsingError::UnexpectedArguments);
        }

        match command.name.as_str() {
            "sticker" | "figurinha" => Ok(Command::Sticker),
            "dado" => Ok(Command::Dice),
            "id" => Ok(Command::ChatId),
            "sorteio" => Ok(Command::StartRaffle),
            "entrar" => Ok(Command::EnterRaffle),
            "ganhador" => Ok(Command::DrawRaffle),
            "ajuda" | "menu" => Ok(Command::Help),
            _ => Err(CommandParsingError::Unknown),
        }
    }
}
