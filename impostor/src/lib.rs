//! # Impostor
//!
//! A round-based social deduction word game. Every participant but one knows
//! a secret word; the impostor has to bluff through clues, discussion, and a
//! vote while the crew tries to spot them.
//!
//! ## Architecture
//!
//! The game is a pure state machine over immutable snapshots. Each phase
//! hands over to the next:
//!
//! - **Lobby**: no game yet
//! - **Setup**: impostor assigned, turn order shuffled, secret word drawn
//! - **ClueRound**: three rounds of one-word clues, one seat at a time
//! - **Discussion**: each automated seat says one thing
//! - **Voting**: everyone votes for a suspect
//! - **Reveal**: all votes are in
//! - **Results**: accused, impostor, and winning side are known
//!
//! ## Core Modules
//!
//! - [`game`]: entities, transitions, resolution, and routing rules
//! - [`bot`]: the generator contract and the offline bot
//! - [`session`]: the async driver owning the current snapshot
//!
//! ## Example
//!
//! ```
//! use impostor::game::{ScriptedRng, SessionState, SetupPlan, WordList, entities::default_roster};
//! use impostor::game::state_machine::{setup, start_clue_round};
//!
//! let mut rng = ScriptedRng::default();
//! let plan = SetupPlan::draw(&default_roster(), &mut rng, &WordList).unwrap();
//! let state = start_clue_round(&setup(&SessionState::new(), plan).unwrap()).unwrap();
//! assert_eq!(state.current_round, 1);
//! ```

/// Automated players and the generation contract.
pub mod bot;

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    GameError, GameEvent, GameResult, Phase, SessionState,
    constants::{self, MAX_CLUE_LENGTH, TOTAL_ROUNDS},
    entities,
};

/// Async session driver.
pub mod session;
pub use session::{SessionActor, SessionConfig, SessionError, SessionHandle};
