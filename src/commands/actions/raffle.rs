//! Raffle command handlers.
//!
//! Thin adapters from the `/sorteio`, `/entrar` and `/ganhador` commands to the
//! [`RaffleController`](crate::raffle::RaffleController). Announcements (raffle
//! opened, winner) are posted by the controller; these handlers only reply with
//! the outcomes that concern the sender.

use log::debug;

use crate::{
    commands::{
        CommandContext, CommandResult,
        markdown_response::{
            format_no_entrants, format_raffle_already_active, format_raffle_already_joined,
            format_raffle_joined,
        },
    },
    raffle::{EnterOutcome, Origin, RaffleError},
};

/// Opens a raffle in the current chat.
pub async fn handle_start_raffle(context: &CommandContext) -> CommandResult {
    match context
        .raffle
        .start(&context.message.chat_id, Origin::Chat)
        .await
    {
        Ok(()) => CommandResult::silent(),
        Err(_) => CommandResult::reply(format_raffle_already_active()),
    }
}

/// Adds the sender to the raffle of the current chat.
pub async fn handle_enter_raffle(context: &CommandContext) -> CommandResult {
    let message = &context.message;

    match context
        .raffle
        .enter(&message.chat_id, &message.sender_id)
        .await
    {
        EnterOutcome::Joined => CommandResult::reply(format_raffle_joined()),
        EnterOutcome::AlreadyJoined => CommandResult::reply(format_raffle_already_joined()),
        EnterOutcome::Ignored => {
            debug!("no raffle open in {}", message.chat_id);
            CommandResult::silent()
        }
    }
}

/// Draws the winner of the raffle of the current chat.
pub async fn handle_draw_raffle(context: &CommandContext) -> CommandResult {
    match context.raffle.draw_in(&context.message.chat_id).await {
        Ok(_) => CommandResult::silent(),
        Err(RaffleError::NoEntrants) => CommandResult::reply(format_no_entrants()),
        Err(e) => {
            debug!("ignoring draw in {}: {}", context.message.chat_id, e);
            CommandResult::silent()
        }
    }
}
