//! Command action handlers.
//!
//! Individual handler functions for each chat command. Each handler receives a
//! [`CommandContext`](crate::commands::CommandContext), processes the command,
//! and returns a [`CommandResult`](crate::commands::CommandResult).
//!
//! # Handler Pattern
//!
//! Handlers follow a consistent pattern:
//! 1. Receive the context holding the message, the session and the raffle
//! 2. Perform the command
//! 3. Return the Markdown reply, or a silent result when the output was already posted
//!
//! Only [`handle_sticker`] calls the messaging session itself and can fail; raffle
//! announcements are sent by the [`RaffleController`](crate::raffle::RaffleController).
//!
//! # Available Handlers
//!
//! - [`handle_sticker`] - Convert an image to a sticker
//! - [`handle_dice`] - Roll a die
//! - [`handle_chat_id`] - Show the chat identifier
//! - [`handle_start_raffle`], [`handle_enter_raffle`], [`handle_draw_raffle`] - Raffle commands
//! - [`handle_help`] - Display help information

mod chat_id;
mod dice;
mod help;
mod raffle;
mod sticker;

pub use crate::commands::actions::{
    chat_id::handle_chat_id,
    dice::handle_dice,
    help::handle_help,
    raffle::{handle_draw_raffle, handle_enter_raffle, handle_start_raffle},
    sticker::handle_sticker,
};
