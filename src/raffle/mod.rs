//! Giveaway (raffle) management.
//!
//! A raffle is scoped to one chat. It is started from the chat (`/sorteio`) or from
//! the control panel, participants opt in with `/entrar`, and a winner is drawn
//! uniformly at random with `/ganhador` or from the panel.
//!
//! - [`RaffleState`]: the state machine itself, pure and synchronous
//! - [`RaffleController`]: the shared entry point, guarding the state with a single
//!   lock and announcing transitions in the chat once the lock is released
//! - `announcement`: the texts of those announcements
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──start──▶ Open ──draw / cancel──▶ Idle
//! ```
//!
//! Raffles are kept in memory only and never expire: an open raffle stays open until
//! it is drawn or cancelled, and a restart forgets it.

use thiserror::Error;

mod announcement;
mod controller;
mod state;

pub use crate::raffle::{controller::RaffleController, state::RaffleState};

/// Raffle outcomes that are reported to the user instead of performed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RaffleError {
    /// A raffle is already open somewhere
    #[error("a raffle is already running")]
    AlreadyActive,
    /// No raffle is open, or nobody entered the open one
    #[error("nobody entered the raffle")]
    NoEntrants,
    /// The command came from a chat that does not host the open raffle
    #[error("no raffle is running in this chat")]
    NotInChat,
}

/// Result of an entry attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterOutcome {
    /// The contact was added to the entrants
    Joined,
    /// The contact was already an entrant, nothing changed
    AlreadyJoined,
    /// No raffle is open in this chat, the attempt was dropped
    Ignored,
}

/// Where a raffle was started from. Only changes the announcement wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Started with the `/sorteio` chat command
    Chat,
    /// Started from the web control panel
    Panel,
}

/// A drawn winner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Winner {
    /// Chat the raffle was running in
    pub chat_id: String,
    /// Contact identifier of the winner
    pub contact_id: String,
}

/// Read-only snapshot of the raffle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RaffleStatus {
    /// Whether a raffle is open
    pub active: bool,
    /// Chat hosting the open raffle
    pub chat_id: Option<String>,
    /// Number of entrants so far
    pub entrant_count: usize,
}
