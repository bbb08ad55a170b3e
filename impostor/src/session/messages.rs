//! Session actor message types.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use super::errors::SessionResult;
use crate::bot::models::GenerationResult;
use crate::game::{
    entities::{GameView, ParticipantId, Phase, RequestedAction},
    state_machine::SessionState,
};

/// Messages that can be sent to a SessionActor
#[derive(Debug)]
pub enum SessionMessage {
    /// Set up a new game with the configured roster, abandoning any game in
    /// progress
    NewGame {
        response: oneshot::Sender<SessionResult<Arc<SessionState>>>,
    },

    /// The human's clue
    SubmitClue {
        participant_id: ParticipantId,
        word: String,
        response: oneshot::Sender<SessionResult<Arc<SessionState>>>,
    },

    /// The human's vote
    SubmitVote {
        voter_id: ParticipantId,
        suspect_id: ParticipantId,
        response: oneshot::Sender<SessionResult<Arc<SessionState>>>,
    },

    /// Back to an empty lobby
    Reset {
        response: oneshot::Sender<SessionResult<Arc<SessionState>>>,
    },

    /// Get the full snapshot (roles included)
    GetSnapshot {
        response: oneshot::Sender<Arc<SessionState>>,
    },

    /// Get the snapshot as one seat may see it
    GetView {
        participant_id: ParticipantId,
        response: oneshot::Sender<Option<GameView>>,
    },

    /// Phases entered since the current game left the lobby
    GetPhaseLog {
        response: oneshot::Sender<Vec<Phase>>,
    },

    /// Subscribe to state change notifications
    Subscribe {
        subscriber: String,
        sender: mpsc::Sender<SessionNotification>,
    },

    /// Unsubscribe from state change notifications
    Unsubscribe { subscriber: String },

    /// Stop the actor
    Close { response: oneshot::Sender<()> },
}

/// Notification sent when session state changes
#[derive(Debug, Clone)]
pub enum SessionNotification {
    /// A transition was applied
    StateChanged(Arc<SessionState>),
    /// The driver is blocked on the human seat
    AwaitingHuman {
        participant: ParticipantId,
        action: RequestedAction,
    },
}

/// Identifies one generator round-trip.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Ticket {
    pub generation: u64,
    pub participant: ParticipantId,
    pub action: RequestedAction,
}

/// A finished generator round-trip, routed back into the actor.
#[derive(Debug)]
pub(crate) struct Completion {
    pub ticket: Ticket,
    pub response: GenerationResult<String>,
}
