//! Raffle state machine.

use log::debug;
use rand::{Rng, seq::IndexedRandom};

use crate::raffle::{EnterOutcome, RaffleError, RaffleStatus, Winner};

/// State of the single raffle a bot instance can run.
///
/// Invariants, kept by every method:
/// - `chat_id` is set if and only if `active` is true
/// - `entrants` is empty when `active` is false
/// - a contact appears at most once in `entrants`
///
/// The state is not synchronized; [`crate::raffle::RaffleController`] owns it behind a lock.
#[derive(Debug, Default)]
pub struct RaffleState {
    active: bool,
    chat_id: Option<String>,
    entrants: Vec<String>,
}

impl RaffleState {
    /// Creates an idle raffle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a raffle in `chat_id`.
    ///
    /// # Errors
    ///
    /// [`RaffleError::AlreadyActive`] if a raffle is already open. The state is left untouched.
    pub fn start(&mut self, chat_id: &str) -> Result<(), RaffleError> {
        if self.active {
            return Err(RaffleError::AlreadyActive);
        }

        self.active = true;
        self.chat_id = Some(chat_id.to_owned());
        self.entrants.clear();

        debug!("raffle opened in {}", chat_id);
        Ok(())
    }

    /// Adds `contact_id` to the entrants of the raffle open in `chat_id`.
    ///
    /// Attempts from any other chat, or while no raffle is open, are ignored.
    pub fn enter(&mut self, chat_id: &str, contact_id: &str) -> EnterOutcome {
        if !self.is_open_in(chat_id) {
            return EnterOutcome::Ignored;
        }

        if self.entrants.iter().any(|entrant| entrant == contact_id) {
            return EnterOutcome::AlreadyJoined;
        }

        self.entrants.push(contact_id.to_owned());
        debug!("{} entered the raffle ({} entrants)", contact_id, self.entrants.len());
        EnterOutcome::Joined
    }

    /// Picks a winner uniformly among the entrants and closes the raffle.
    ///
    /// When `scope` is set, the draw only applies to the raffle open in that chat.
    ///
    /// # Errors
    ///
    /// - [`RaffleError::NotInChat`] if `scope` is set and no raffle is open there
    /// - [`RaffleError::NoEntrants`] if nobody entered, or no raffle is open at all
    ///
    /// On error the state is left untouched, so an open raffle can still be drawn later.
    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        scope: Option<&str>,
        rng: &mut R,
    ) -> Result<Winner, RaffleError> {
        if let Some(chat_id) = scope
            && !self.is_open_in(chat_id)
        {
            return Err(RaffleError::NotInChat);
        }

        let (Some(chat_id), Some(contact_id)) = (&self.chat_id, self.entrants.choose(rng)) else {
            return Err(RaffleError::NoEntrants);
        };

        let winner = Winner {
            chat_id: chat_id.clone(),
            contact_id: contact_id.clone(),
        };
        self.cancel();

        Ok(winner)
    }

    /// Closes the raffle, whatever its state.
    pub fn cancel(&mut self) {
        self.active = false;
        self.chat_id = None;
        self.entrants.clear();
    }

    /// Returns a snapshot of the raffle.
    pub fn status(&self) -> RaffleStatus {
        RaffleStatus {
            active: self.active,
            chat_id: self.chat_id.clone(),
            entrant_count: self.entrants.len(),
        }
    }

    /// Returns the entrants in the order they joined.
    #[cfg(test)]
    pub fn entrants(&self) -> &[String] {
        &self.entrants
    }

    fn is_open_in(&self, chat_id: &str) -> bool {
        self.active && self.chat_id.as_deref() == Some(chat_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    const CHAT_A: &str = "!chat_a:example.org";
    const CHAT_B: &str = "!chat_b:example.org";

    fn open_raffle(entrants: &[&str]) -> RaffleState {
        let mut state = RaffleState::new();
        state.start(CHAT_A).unwrap();
        for entrant in entrants {
            state.enter(CHAT_A, entrant);
        }
        state
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = RaffleState::new();
        assert_eq!(state.status(), RaffleStatus::default());
        assert!(state.entrants().is_empty());
    }

    #[test]
    fn test_start_from_idle() {
        let mut state = RaffleState::new();
        assert!(state.start(CHAT_A).is_ok());

        let status = state.status();
        assert!(status.active);
        assert_eq!(status.chat_id.as_deref(), Some(CHAT_A));
        assert_eq!(status.entrant_count, 0);
    }

    #[test]
    fn test_start_while_active_does_not_mutate() {
        let mut state = open_raffle(&["@alice:example.org"]);

        assert_eq!(state.start(CHAT_B), Err(RaffleError::AlreadyActive));
        assert_eq!(state.status().chat_id.as_deref(), Some(CHAT_A));
        assert_eq!(state.entrants(), ["@alice:example.org"]);
    }

    #[test]
    fn test_enter_keeps_insertion_order() {
        let mut state = open_raffle(&[]);

        assert_eq!(state.enter(CHAT_A, "@bob:example.org"), EnterOutcome::Joined);
        assert_eq!(state.enter(CHAT_A, "@alice:example.org"), EnterOutcome::Joined);
        assert_eq!(state.entrants(), ["@bob:example.org", "@alice:example.org"]);
    }

    #[test]
    fn test_enter_twice() {
        let mut state = open_raffle(&[]);

        assert_eq!(state.enter(CHAT_A, "@bob:example.org"), EnterOutcome::Joined);
        assert_eq!(
            state.enter(CHAT_A, "@bob:example.org"),
            EnterOutcome::AlreadyJoined
        );
        assert_eq!(state.status().entrant_count, 1);
    }

    #[test]
    fn test_enter_from_other_chat_is_ignored() {
        let mut state = open_raffle(&[]);

        assert_eq!(state.enter(CHAT_B, "@bob:example.org"), EnterOutcome::Ignored);
        assert!(state.entrants().is_empty());
    }

    #[test]
    fn test_enter_while_idle_is_ignored() {
        let mut state = RaffleState::new();

        assert_eq!(state.enter(CHAT_A, "@bob:example.org"), EnterOutcome::Ignored);
        assert_eq!(state.status(), RaffleStatus::default());
    }

    #[test]
    fn test_draw_picks_an_entrant_and_resets() {
        let entrants = ["@alice:example.org", "@bob:example.org", "@carol:example.org"];
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let mut state = open_raffle(&entrants);
            let winner = state.draw(None, &mut rng).unwrap();

            assert_eq!(winner.chat_id, CHAT_A);
            assert!(entrants.contains(&winner.contact_id.as_str()));
            assert_eq!(state.status(), RaffleStatus::default());
            assert!(state.entrants().is_empty());
        }
    }

    #[test]
    fn test_draw_reaches_every_entrant() {
        let entrants = ["@alice:example.org", "@bob:example.org", "@carol:example.org"];
        let mut rng = StdRng::seed_from_u64(7);
        let mut winners = HashSet::new();

        for _ in 0..200 {
            let mut state = open_raffle(&entrants);
            winners.insert(state.draw(None, &mut rng).unwrap().contact_id);
        }

        assert_eq!(winners.len(), entrants.len());
    }

    #[test]
    fn test_draw_without_entrants_keeps_raffle_open() {
        let mut state = open_raffle(&[]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(state.draw(None, &mut rng), Err(RaffleError::NoEntrants));
        assert!(state.status().active);
        assert_eq!(state.status().chat_id.as_deref(), Some(CHAT_A));

        state.enter(CHAT_A, "@alice:example.org");
        assert!(state.draw(None, &mut rng).is_ok());
    }

    #[test]
    fn test_draw_while_idle() {
        let mut state = RaffleState::new();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(state.draw(None, &mut rng), Err(RaffleError::NoEntrants));
        assert_eq!(state.status(), RaffleStatus::default());
    }

    #[test]
    fn test_draw_scoped_to_other_chat() {
        let mut state = open_raffle(&["@alice:example.org"]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            state.draw(Some(CHAT_B), &mut rng),
            Err(RaffleError::NotInChat)
        );
        assert_eq!(state.status().entrant_count, 1);
    }

    #[test]
    fn test_draw_scoped_while_idle() {
        let mut state = RaffleState::new();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            state.draw(Some(CHAT_A), &mut rng),
            Err(RaffleError::NotInChat)
        );
    }

    #[test]
    fn test_draw_scoped_without_entrants() {
        let mut state = open_raffle(&[]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            state.draw(Some(CHAT_A), &mut rng),
            Err(RaffleError::NoEntrants)
        );
        assert!(state.status().active);
    }

    #[test]
    fn test_cancel_from_any_state() {
        let mut idle = RaffleState::new();
        idle.cancel();
        assert_eq!(idle.status(), RaffleStatus::default());

        let mut open = open_raffle(&["@alice:example.org", "@bob:example.org"]);
        open.cancel();
        assert_eq!(open.status(), RaffleStatus::default());
        assert!(open.entrants().is_empty());

        // A cancelled raffle can be started again
        assert!(open.start(CHAT_B).is_ok());
    }

    #[test]
    fn test_scenario_single_entrant_wins() {
        let mut state = RaffleState::new();
        let mut rng = StdRng::seed_from_u64(3);

        state.start("chatA").unwrap();
        state.enter("chatA", "contactX");
        state.enter("chatA", "contactX");
        assert_eq!(state.status().entrant_count, 1);

        let winner = state.draw(None, &mut rng).unwrap();
        assert_eq!(winner.contact_id, "contactX");
        assert!(!state.status().active);
    }
}
