//! Impostor game state machine.
//!
//! Every transition is a pure function from one [`SessionState`] snapshot to
//! the next. Events are plain data ([`GameEvent`]) so a driver can queue,
//! log, or replay them; anything random is drawn before the event is built
//! (see [`SetupPlan::draw`]).

use chrono::{DateTime, Utc};
use enum_dispatch::enum_dispatch;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

use super::constants::{MAX_CLUE_LENGTH, MIN_PARTICIPANTS, TOTAL_ROUNDS};
use super::entities::{
    Clue, DiscussionMessage, GameView, Participant, ParticipantId, ParticipantView, Phase, Vote,
    WinningSide,
};
use super::resolver::{TieBreak, resolve_votes, tally_votes};
use super::rng::GameRng;
use super::words::WordSupplier;

/// Reasons a transition was refused. The snapshot is never changed when one
/// of these is returned.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("enter a clue")]
    EmptyClue,
    #[error("one word only")]
    MultiTokenClue,
    #[error("can't use the secret word")]
    ClueIsSecretWord,
    #[error("too long (max {max} characters)")]
    ClueTooLong { max: usize },
    #[error("already gave a clue this round")]
    AlreadyClued,
    #[error("can't vote for yourself")]
    SelfVote,
    #[error("say something")]
    EmptyDiscussion,
    #[error("the human seat only observes discussion")]
    HumanCannotDiscuss,
    #[error("not your turn")]
    OutOfTurn,
    #[error("unknown participant {0}")]
    UnknownParticipant(ParticipantId),
    #[error("expected phase {expected}, currently {actual}")]
    PhaseMismatch { expected: Phase, actual: Phase },
    #[error("invalid roster: {0}")]
    InvalidRoster(String),
    #[error("secret word is empty")]
    EmptySecretWord,
    #[error("invalid game state: {0}")]
    InternalStateError(String),
}

pub type GameResult<T> = Result<T, GameError>;

/// Immutable snapshot of one game session.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SessionState {
    pub session_id: Uuid,
    /// Bumped by every setup and reset. Work issued for an older generation
    /// is stale.
    pub generation: u64,
    pub phase: Phase,
    /// Turn order.
    pub participants: Vec<Participant>,
    /// `None` only before setup.
    pub secret_word: Option<String>,
    pub current_round: u8,
    pub total_rounds: u8,
    pub clues: Vec<Clue>,
    pub votes: Vec<Vote>,
    pub discussion: Vec<DiscussionMessage>,
    pub current_turn_index: usize,
    pub winning_side: Option<WinningSide>,
    pub revealed_impostor_id: Option<ParticipantId>,
    pub accused_id: Option<ParticipantId>,
    pub tie_break: TieBreak,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Empty lobby.
    pub fn new() -> Self {
        Self::with_tie_break(TieBreak::default())
    }

    pub fn with_tie_break(tie_break: TieBreak) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            generation: 0,
            phase: Phase::Lobby,
            participants: Vec::new(),
            secret_word: None,
            current_round: 0,
            total_rounds: TOTAL_ROUNDS,
            clues: Vec::new(),
            votes: Vec::new(),
            discussion: Vec::new(),
            current_turn_index: 0,
            winning_side: None,
            revealed_impostor_id: None,
            accused_id: None,
            tie_break,
        }
    }

    /// Apply `event`, producing the next snapshot.
    pub fn apply(&self, event: &GameEvent) -> GameResult<Self> {
        event.apply_to(self)
    }

    /// The participant whose clue is due. Only defined during the clue round.
    pub fn active_participant(&self) -> Option<&Participant> {
        if self.phase != Phase::ClueRound {
            return None;
        }
        self.participants.get(self.current_turn_index)
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Case-insensitive lookup by display name.
    pub fn participant_by_name(&self, name: &str) -> Option<&Participant> {
        let name = name.trim().to_lowercase();
        self.participants
            .iter()
            .find(|p| p.display_name.to_lowercase() == name)
    }

    pub fn human(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_human())
    }

    pub fn impostor(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_impostor())
    }

    /// Automated seats in turn order.
    pub fn automated(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.control.is_automated())
    }

    pub fn clues_for_round(&self, round: u8) -> Vec<&Clue> {
        self.clues.iter().filter(|c| c.round == round).collect()
    }

    pub fn clues_for_participant(&self, id: &ParticipantId) -> Vec<&Clue> {
        self.clues.iter().filter(|c| &c.participant_id == id).collect()
    }

    /// Votes received per participant in turn order, zero counts included.
    pub fn vote_tally(&self) -> Vec<(ParticipantId, usize)> {
        tally_votes(&self.votes, &self.participants)
    }

    pub fn has_voted(&self, id: &ParticipantId) -> bool {
        self.votes.iter().any(|v| &v.voter_id == id)
    }

    /// Whether `id` already gave a clue in the current round.
    pub fn has_given_clue(&self, id: &ParticipantId) -> bool {
        self.clues
            .iter()
            .any(|c| &c.participant_id == id && c.round == self.current_round)
    }

    pub fn has_spoken(&self, id: &ParticipantId) -> bool {
        self.discussion.iter().any(|m| &m.participant_id == id)
    }

    /// What `viewer` is allowed to see. The impostor never gets the secret
    /// word, and nobody sees other roles before results.
    pub fn view_for(&self, viewer: &ParticipantId) -> Option<GameView> {
        let me = self.participant(viewer)?;
        let revealed = self.phase == Phase::Results;
        let participants = self
            .participants
            .iter()
            .map(|p| {
                if revealed {
                    ParticipantView::revealed(p)
                } else {
                    ParticipantView::redacted(p)
                }
            })
            .collect();

        Some(GameView {
            viewer: me.id.clone(),
            is_impostor: me.is_impostor(),
            phase: self.phase,
            participants,
            secret_word: if me.is_impostor() {
                None
            } else {
                self.secret_word.clone()
            },
            current_round: self.current_round,
            total_rounds: self.total_rounds,
            active_participant: self.active_participant().map(|p| p.id.clone()),
            clues: self.clues.clone(),
            discussion: self.discussion.clone(),
            tally: self.vote_tally(),
            has_voted: self.has_voted(viewer),
            winning_side: self.winning_side,
            revealed_impostor_id: self.revealed_impostor_id.clone(),
            accused_id: self.accused_id.clone(),
        })
    }

    fn require_phase(&self, expected: Phase) -> GameResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::PhaseMismatch {
                expected,
                actual: self.phase,
            })
        }
    }

    fn require_participant(&self, id: &ParticipantId) -> GameResult<&Participant> {
        self.participant(id)
            .ok_or_else(|| GameError::UnknownParticipant(id.clone()))
    }
}

/// A state transition carried by a [`GameEvent`].
#[enum_dispatch]
pub trait Transition {
    fn apply_to(&self, state: &SessionState) -> GameResult<SessionState>;
}

/// Everything that can happen to a session.
#[enum_dispatch(Transition)]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    Setup(SetupPlan),
    StartClueRound(StartClueRound),
    SubmitClue(ClueSubmission),
    SubmitDiscussion(DiscussionSubmission),
    StartVoting(StartVoting),
    SubmitVote(VoteSubmission),
    Resolve(Resolve),
    Reset(Reset),
}

/// The outcome of setup's random draws: turn order with the impostor
/// already assigned, and the secret word.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SetupPlan {
    pub session_id: Uuid,
    pub participants: Vec<Participant>,
    pub secret_word: String,
}

impl SetupPlan {
    /// Pick the impostor uniformly over `roster`, shuffle turn order, and
    /// draw the secret word.
    pub fn draw(
        roster: &[Participant],
        rng: &mut dyn GameRng,
        words: &dyn WordSupplier,
    ) -> GameResult<Self> {
        validate_roster(roster)?;
        let impostor = rng.pick_index(roster.len());
        let participants = rng
            .permutation(roster.len())
            .into_iter()
            .filter_map(|idx| roster.get(idx).map(|p| p.with_impostor(idx == impostor)))
            .collect();
        let secret_word = words.random_word(rng).trim().to_lowercase();
        Ok(Self {
            session_id: Uuid::new_v4(),
            participants,
            secret_word,
        })
    }
}

impl Transition for SetupPlan {
    fn apply_to(&self, state: &SessionState) -> GameResult<SessionState> {
        validate_roster(&self.participants)?;
        if self.participants.iter().filter(|p| p.is_impostor()).count() != 1 {
            return Err(GameError::InvalidRoster(
                "exactly one participant must be the impostor".to_string(),
            ));
        }
        let secret_word = self.secret_word.trim().to_lowercase();
        if secret_word.is_empty() {
            return Err(GameError::EmptySecretWord);
        }

        debug!(
            "setting up session {} (generation {})",
            self.session_id,
            state.generation + 1
        );
        Ok(SessionState {
            session_id: self.session_id,
            generation: state.generation + 1,
            phase: Phase::Setup,
            participants: self.participants.clone(),
            secret_word: Some(secret_word),
            current_round: 1,
            ..SessionState::with_tie_break(state.tie_break)
        })
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct StartClueRound;

impl Transition for StartClueRound {
    fn apply_to(&self, state: &SessionState) -> GameResult<SessionState> {
        state.require_phase(Phase::Setup)?;
        Ok(SessionState {
            phase: Phase::ClueRound,
            current_turn_index: 0,
            ..state.clone()
        })
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ClueSubmission {
    pub participant_id: ParticipantId,
    pub raw_word: String,
    pub at: DateTime<Utc>,
}

impl Transition for ClueSubmission {
    fn apply_to(&self, state: &SessionState) -> GameResult<SessionState> {
        state.require_phase(Phase::ClueRound)?;
        state.require_participant(&self.participant_id)?;
        if state.has_given_clue(&self.participant_id) {
            return Err(GameError::AlreadyClued);
        }
        if state.active_participant().map(|p| &p.id) != Some(&self.participant_id) {
            return Err(GameError::OutOfTurn);
        }
        let word = validate_clue(&self.raw_word, state.secret_word.as_deref())?;

        let mut next = state.clone();
        next.clues.push(Clue {
            participant_id: self.participant_id.clone(),
            word,
            round: state.current_round,
            created_at: self.at,
        });
        next.current_turn_index += 1;
        if next.current_turn_index >= next.participants.len() {
            next.current_turn_index = 0;
            if next.current_round >= next.total_rounds {
                next.phase = Phase::Discussion;
            } else {
                next.current_round += 1;
            }
        }
        Ok(next)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DiscussionSubmission {
    pub participant_id: ParticipantId,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Transition for DiscussionSubmission {
    fn apply_to(&self, state: &SessionState) -> GameResult<SessionState> {
        state.require_phase(Phase::Discussion)?;
        if state.require_participant(&self.participant_id)?.is_human() {
            return Err(GameError::HumanCannotDiscuss);
        }
        let text = self.text.trim();
        if text.is_empty() {
            return Err(GameError::EmptyDiscussion);
        }

        let mut next = state.clone();
        next.discussion.push(DiscussionMessage {
            participant_id: self.participant_id.clone(),
            text: text.to_string(),
            created_at: self.at,
        });
        Ok(next)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct StartVoting;

impl Transition for StartVoting {
    fn apply_to(&self, state: &SessionState) -> GameResult<SessionState> {
        state.require_phase(Phase::Discussion)?;
        Ok(SessionState {
            phase: Phase::Voting,
            votes: Vec::new(),
            current_turn_index: 0,
            ..state.clone()
        })
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct VoteSubmission {
    pub voter_id: ParticipantId,
    pub suspect_id: ParticipantId,
}

impl Transition for VoteSubmission {
    fn apply_to(&self, state: &SessionState) -> GameResult<SessionState> {
        state.require_phase(Phase::Voting)?;
        state.require_participant(&self.voter_id)?;
        if self.voter_id == self.suspect_id {
            return Err(GameError::SelfVote);
        }
        state.require_participant(&self.suspect_id)?;

        let mut next = state.clone();
        next.votes.retain(|v| v.voter_id != self.voter_id);
        next.votes.push(Vote {
            voter_id: self.voter_id.clone(),
            suspect_id: self.suspect_id.clone(),
        });
        let voters: HashSet<&ParticipantId> = next.votes.iter().map(|v| &v.voter_id).collect();
        if voters.len() == next.participants.len() {
            next.phase = Phase::Reveal;
        }
        Ok(next)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Resolve;

impl Transition for Resolve {
    fn apply_to(&self, state: &SessionState) -> GameResult<SessionState> {
        state.require_phase(Phase::Reveal)?;
        let resolution = resolve_votes(&state.votes, &state.participants, state.tie_break)?;
        Ok(SessionState {
            phase: Phase::Results,
            winning_side: Some(resolution.winning_side),
            revealed_impostor_id: Some(resolution.revealed_impostor_id),
            accused_id: resolution.accused,
            ..state.clone()
        })
    }
}

/// Back to an empty lobby. Keeps the tie-break policy.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Reset;

impl Transition for Reset {
    fn apply_to(&self, state: &SessionState) -> GameResult<SessionState> {
        Ok(SessionState {
            generation: state.generation + 1,
            ..SessionState::with_tie_break(state.tie_break)
        })
    }
}

/// Check a roster can be set up: enough seats, unique ids and names, and
/// exactly one human.
pub fn validate_roster(roster: &[Participant]) -> GameResult<()> {
    if roster.len() < MIN_PARTICIPANTS {
        return Err(GameError::InvalidRoster(format!(
            "need {MIN_PARTICIPANTS}+ participants, got {}",
            roster.len()
        )));
    }

    let mut ids = HashSet::with_capacity(roster.len());
    let mut names = HashSet::with_capacity(roster.len());
    for p in roster {
        if p.id.as_str().is_empty() || p.display_name.is_empty() {
            return Err(GameError::InvalidRoster(
                "participant ids and names can't be empty".to_string(),
            ));
        }
        // Vote responses are cut to their first token.
        if p.display_name.chars().any(char::is_whitespace) {
            return Err(GameError::InvalidRoster(format!(
                "name '{}' must be a single word",
                p.display_name
            )));
        }
        if !ids.insert(&p.id) {
            return Err(GameError::InvalidRoster(format!("duplicate id {}", p.id)));
        }
        // Votes are matched by name.
        if !names.insert(p.display_name.to_lowercase()) {
            return Err(GameError::InvalidRoster(format!(
                "duplicate name {}",
                p.display_name
            )));
        }
    }

    match roster.iter().filter(|p| p.is_human()).count() {
        1 => Ok(()),
        n => Err(GameError::InvalidRoster(format!(
            "need exactly one human, got {n}"
        ))),
    }
}

/// Normalize a raw clue to a single lower-cased token, rejecting anything
/// that can't be stored.
pub fn validate_clue(raw: &str, secret_word: Option<&str>) -> GameResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GameError::EmptyClue);
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(GameError::MultiTokenClue);
    }
    let word = trimmed.to_lowercase();
    if secret_word.is_some_and(|s| s.trim().to_lowercase() == word) {
        return Err(GameError::ClueIsSecretWord);
    }
    if word.chars().count() > MAX_CLUE_LENGTH {
        return Err(GameError::ClueTooLong {
            max: MAX_CLUE_LENGTH,
        });
    }
    Ok(word)
}

pub fn setup(state: &SessionState, plan: SetupPlan) -> GameResult<SessionState> {
    state.apply(&plan.into())
}

pub fn start_clue_round(state: &SessionState) -> GameResult<SessionState> {
    state.apply(&StartClueRound.into())
}

pub fn submit_clue(
    state: &SessionState,
    participant_id: &ParticipantId,
    raw_word: &str,
) -> GameResult<SessionState> {
    let event = ClueSubmission {
        participant_id: participant_id.clone(),
        raw_word: raw_word.to_string(),
        at: Utc::now(),
    };
    state.apply(&event.into())
}

pub fn submit_discussion(
    state: &SessionState,
    participant_id: &ParticipantId,
    text: &str,
) -> GameResult<SessionState> {
    let event = DiscussionSubmission {
        participant_id: participant_id.clone(),
        text: text.to_string(),
        at: Utc::now(),
    };
    state.apply(&event.into())
}

pub fn start_voting(state: &SessionState) -> GameResult<SessionState> {
    state.apply(&StartVoting.into())
}

pub fn submit_vote(
    state: &SessionState,
    voter_id: &ParticipantId,
    suspect_id: &ParticipantId,
) -> GameResult<SessionState> {
    let event = VoteSubmission {
        voter_id: voter_id.clone(),
        suspect_id: suspect_id.clone(),
    };
    state.apply(&event.into())
}

pub fn resolve(state: &SessionState) -> GameResult<SessionState> {
    state.apply(&Resolve.into()).inspect_err(|err| {
        if matches!(err, GameError::InternalStateError(_)) {
            error!("resolution failed for session {}: {err}", state.session_id);
        }
    })
}

pub fn reset(state: &SessionState) -> GameResult<SessionState> {
    state.apply(&Reset.into())
}
