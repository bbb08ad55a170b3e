//! Impostor game engine: the state machine and the rules around it.
//!
//! This module provides:
//! - Entities and the per-seat view
//! - Pure phase transitions over immutable snapshots
//! - Vote tallying and outcome resolution
//! - Routing rules deciding who acts next and what they are told
//! - Injectable randomness and the secret word supply

pub mod constants;
pub mod entities;
pub mod orchestration;
pub mod resolver;
pub mod rng;
pub mod state_machine;
pub mod words;

pub use entities::{
    Clue, ControlKind, DiscussionMessage, GameView, Participant, ParticipantId, ParticipantView,
    Phase, RequestedAction, StyleProfile, Vote, WinningSide,
};
pub use orchestration::{AutoAdvance, NextStep};
pub use resolver::{Resolution, TieBreak};
pub use rng::{GameRng, ScriptedRng, SeededRng};
pub use state_machine::{GameError, GameEvent, GameResult, SessionState, SetupPlan, Transition};
pub use words::{FixedWord, WordList, WordSupplier};
