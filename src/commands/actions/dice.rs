//! Dice command handler.

use log::debug;
use rand::Rng;

use crate::commands::{CommandResult, markdown_response::format_dice};

/// Rolls a six-sided die and replies with the result.
pub fn handle_dice() -> CommandResult {
    let value = roll_die(&mut rand::rng());
    debug!("rolled {}", value);

    CommandResult::reply(format_dice(value))
}

/// Returns a uniform value in `1..=6`.
fn roll_die<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.random_range(1..=6)
}
