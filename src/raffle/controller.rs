//! Shared raffle entry point.
//!
//! This module provides the [`RaffleController`], used in the same way by the chat
//! commands and by the control panel. The controller is the only owner of the
//! [`RaffleState`]: every operation takes the state lock for its whole
//! read-modify-write sequence, so operations coming from both entry points are
//! linearizable.
//!
//! Announcements in the chat are sent once the lock is released. A failed send is
//! logged and does not undo the state change.

use std::sync::Arc;

use log::{error, info};
use tokio::sync::Mutex;

use crate::{
    raffle::{
        EnterOutcome, Origin, RaffleError, RaffleState, RaffleStatus, Winner,
        announcement::{format_raffle_started, format_winner},
    },
    session::MessagingSession,
};

/// Thread-safe raffle manager announcing transitions through a [`MessagingSession`].
///
/// # Examples
///
/// ```no_run
/// # async fn example(session: std::sync::Arc<dyn MessagingSession>) {
/// let controller = RaffleController::new(session);
///
/// controller.start("!room:example.org", Origin::Chat).await.unwrap();
/// controller.enter("!room:example.org", "@alice:example.org").await;
/// let winner = controller.draw().await.unwrap();
/// assert_eq!(winner.contact_id, "@alice:example.org");
/// # }
/// ```
pub struct RaffleController {
    /// Raffle state, guarded for the whole duration of each operation
    state: Mutex<RaffleState>,
    /// Session used to announce the raffle and its winner
    session: Arc<dyn MessagingSession>,
}

impl RaffleController {
    /// Creates a controller with an idle raffle.
    pub fn new(session: Arc<dyn MessagingSession>) -> Self {
        RaffleController {
            state: Mutex::new(RaffleState::new()),
            session,
        }
    }

    /// Opens a raffle in `chat_id` and announces it there.
    ///
    /// # Errors
    ///
    /// [`RaffleError::AlreadyActive`] if a raffle is already open. Nothing is sent.
    pub async fn start(&self, chat_id: &str, origin: Origin) -> Result<(), RaffleError> {
        self.state.lock().await.start(chat_id)?;
        info!("raffle started in {} from {:?}", chat_id, origin);

        let announcement = format_raffle_started(origin);
        if let Err(e) = self.session.send_text(chat_id, &announcement).await {
            error!("failed to announce raffle in {}: {:?}", chat_id, e);
        }

        Ok(())
    }

    /// Registers `contact_id` in the raffle open in `chat_id`.
    pub async fn enter(&self, chat_id: &str, contact_id: &str) -> EnterOutcome {
        self.state.lock().await.enter(chat_id, contact_id)
    }

    /// Draws the winner of the open raffle, wherever it runs, and announces it.
    ///
    /// # Errors
    ///
    /// [`RaffleError::NoEntrants`] if no raffle is open or nobody entered.
    pub async fn draw(&self) -> Result<Winner, RaffleError> {
        self.draw_scoped(None).await
    }

    /// Draws the winner of the raffle open in `chat_id` and announces it.
    ///
    /// # Errors
    ///
    /// - [`RaffleError::NotInChat`] if no raffle is open in `chat_id`
    /// - [`RaffleError::NoEntrants`] if nobody entered
    pub async fn draw_in(&self, chat_id: &str) -> Result<Winner, RaffleError> {
        self.draw_scoped(Some(chat_id)).await
    }

    /// Closes the raffle without a winner. Does nothing when no raffle is open.
    pub async fn cancel(&self) {
        self.state.lock().await.cancel();
        info!("raffle cancelled");
    }

    /// Returns a snapshot of the raffle.
    pub async fn status(&self) -> RaffleStatus {
        self.state.lock().await.status()
    }

    async fn draw_scoped(&self, scope: Option<&str>) -> Result<Winner, RaffleError> {
        let winner = self.state.lock().await.draw(scope, &mut rand::rng())?;
        info!("{} won the raffle in {}", winner.contact_id, winner.chat_id);

        let announcement = format_winner(&winner.contact_id);
        if let Err(e) = self
            .session
            .send_mention(&winner.chat_id, &announcement, &winner.contact_id)
            .await
        {
            error!(
                "failed to announce raffle winner in {}: {:?}",
                winner.chat_id, e
            );
        }

        Ok(winner)
    }
}
