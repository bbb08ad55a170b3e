//! Who acts next, what they are told, and how their answer becomes an event.
//!
//! These rules are pure. The session driver calls [`next_step`] after every
//! transition, builds a [`GenerationRequest`] for automated seats, and turns
//! whatever comes back (or doesn't) into a [`GameEvent`] through
//! [`interpret_response`].

use chrono::Utc;
use log::warn;
use serde::{Deserialize, Serialize};

use super::constants::{FALLBACK_CLUES, FALLBACK_DISCUSSION};
use super::entities::{Participant, ParticipantId, ParticipantView, Phase, RequestedAction};
use super::rng::GameRng;
use super::state_machine::{
    ClueSubmission, DiscussionSubmission, GameError, GameEvent, GameResult, Resolve,
    SessionState, StartClueRound, StartVoting, VoteSubmission, validate_clue,
};
use crate::bot::models::{GenerationError, GenerationRequest};

/// Transitions the driver applies on its own.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AutoAdvance {
    StartClueRound,
    StartVoting,
    Resolve,
}

impl AutoAdvance {
    pub fn event(self) -> GameEvent {
        match self {
            Self::StartClueRound => StartClueRound.into(),
            Self::StartVoting => StartVoting.into(),
            Self::Resolve => Resolve.into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum NextStep {
    /// Wait for the human to submit.
    AwaitHuman {
        participant: ParticipantId,
        action: RequestedAction,
    },
    /// Ask the generator on behalf of an automated seat.
    Generate {
        participant: ParticipantId,
        action: RequestedAction,
    },
    Advance(AutoAdvance),
    /// Nothing to do until someone starts a new game.
    Idle,
}

impl NextStep {
    fn input(participant: &Participant, action: RequestedAction) -> Self {
        let participant_id = participant.id.clone();
        if participant.is_human() {
            Self::AwaitHuman {
                participant: participant_id,
                action,
            }
        } else {
            Self::Generate {
                participant: participant_id,
                action,
            }
        }
    }
}

/// Decide what has to happen next for `state`.
///
/// - clue round: the seat at the current turn index.
/// - discussion: each automated seat once, in turn order, then voting.
/// - voting: the human first, then automated seats in turn order.
pub fn next_step(state: &SessionState) -> NextStep {
    match state.phase {
        Phase::Lobby | Phase::Results => NextStep::Idle,
        Phase::Setup => NextStep::Advance(AutoAdvance::StartClueRound),
        Phase::ClueRound => match state.active_participant() {
            Some(p) => NextStep::input(p, RequestedAction::Clue),
            None => NextStep::Idle,
        },
        Phase::Discussion => match state.automated().find(|p| !state.has_spoken(&p.id)) {
            Some(p) => NextStep::input(p, RequestedAction::Discussion),
            None => NextStep::Advance(AutoAdvance::StartVoting),
        },
        Phase::Voting => {
            let pending = state
                .human()
                .filter(|h| !state.has_voted(&h.id))
                .or_else(|| state.automated().find(|p| !state.has_voted(&p.id)));
            match pending {
                Some(p) => NextStep::input(p, RequestedAction::Vote),
                None => NextStep::Idle,
            }
        }
        Phase::Reveal => NextStep::Advance(AutoAdvance::Resolve),
    }
}

/// Build what `participant` is told. The impostor gets `None` for the
/// secret word and nobody learns anyone else's role.
pub fn build_request(
    state: &SessionState,
    participant: &ParticipantId,
    action: RequestedAction,
) -> GameResult<GenerationRequest> {
    let acting = state
        .participant(participant)
        .ok_or_else(|| GameError::UnknownParticipant(participant.clone()))?;

    Ok(GenerationRequest {
        requested_action: action,
        acting: ParticipantView {
            is_impostor: Some(acting.is_impostor()),
            ..ParticipantView::redacted(acting)
        },
        secret_word: if acting.is_impostor() {
            None
        } else {
            state.secret_word.clone()
        },
        prior_clues: state.clues.clone(),
        current_round: state.current_round,
        participants: state
            .participants
            .iter()
            .map(ParticipantView::redacted)
            .collect(),
        prior_discussion: state.discussion.clone(),
    })
}

/// First whitespace-delimited token of the first non-empty line.
pub fn first_token(text: &str) -> Option<&str> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.split_whitespace().next())
}

/// Turn a generator response into the event for `participant`, substituting
/// a local fallback whenever the response is missing or unusable.
pub fn interpret_response(
    state: &SessionState,
    participant: &ParticipantId,
    action: RequestedAction,
    response: Result<String, GenerationError>,
    rng: &mut dyn GameRng,
) -> GameResult<GameEvent> {
    let acting = state
        .participant(participant)
        .ok_or_else(|| GameError::UnknownParticipant(participant.clone()))?;
    let text = match response {
        Ok(text) => Some(text),
        Err(err) => {
            warn!("{action} for {} failed: {err}", acting.id);
            None
        }
    };

    let event = match action {
        RequestedAction::Clue => {
            let secret = state.secret_word.as_deref();
            let word = text
                .as_deref()
                .and_then(first_token)
                .and_then(|token| validate_clue(token, secret).ok())
                .unwrap_or_else(|| {
                    warn!("using fallback clue for {}", acting.id);
                    fallback_clue(secret, rng)
                });
            ClueSubmission {
                participant_id: acting.id.clone(),
                raw_word: word,
                at: Utc::now(),
            }
            .into()
        }
        RequestedAction::Discussion => {
            let line = text
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    warn!("using fallback discussion line for {}", acting.id);
                    FALLBACK_DISCUSSION.to_string()
                });
            DiscussionSubmission {
                participant_id: acting.id.clone(),
                text: line,
                at: Utc::now(),
            }
            .into()
        }
        RequestedAction::Vote => {
            let matched = text
                .as_deref()
                .and_then(first_token)
                .and_then(|token| match_suspect(state, acting, token));
            let suspect = match matched {
                Some(id) => id,
                None => {
                    warn!("using fallback vote for {}", acting.id);
                    fallback_suspect(state, acting, rng)?
                }
            };
            VoteSubmission {
                voter_id: acting.id.clone(),
                suspect_id: suspect,
            }
            .into()
        }
    };
    Ok(event)
}

/// A fallback clue that is never the secret word.
pub fn fallback_clue(secret_word: Option<&str>, rng: &mut dyn GameRng) -> String {
    let candidates: Vec<&str> = FALLBACK_CLUES
        .iter()
        .copied()
        .filter(|w| secret_word.is_none_or(|s| !s.eq_ignore_ascii_case(w)))
        .collect();
    candidates[rng.pick_index(candidates.len())].to_string()
}

/// Display-name match against every seat but the voter's own. Surrounding
/// punctuation on the token is ignored.
fn match_suspect(
    state: &SessionState,
    voter: &Participant,
    token: &str,
) -> Option<ParticipantId> {
    let name = token.trim_matches(|c: char| !c.is_alphanumeric());
    state
        .participant_by_name(name)
        .filter(|p| p.id != voter.id)
        .map(|p| p.id.clone())
}

/// Uniformly random seat other than the voter.
fn fallback_suspect(
    state: &SessionState,
    voter: &Participant,
    rng: &mut dyn GameRng,
) -> GameResult<ParticipantId> {
    let others: Vec<&Participant> = state
        .participants
        .iter()
        .filter(|p| p.id != voter.id)
        .collect();
    if others.is_empty() {
        return Err(GameError::InternalStateError(
            "no one else to vote for".to_string(),
        ));
    }
    Ok(others[rng.pick_index(others.len())].id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        entities::default_roster,
        rng::ScriptedRng,
        state_machine::{SetupPlan, setup, start_clue_round, submit_clue, submit_vote},
        words::FixedWord,
    };

    fn id(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    /// Impostor is "alex" (index 1); identity turn order; secret "elephant".
    fn set_up() -> SessionState {
        let mut rng = ScriptedRng::new(vec![1], vec![]);
        let plan =
            SetupPlan::draw(&default_roster(), &mut rng, &FixedWord::new("elephant")).unwrap();
        setup(&SessionState::new(), plan).unwrap()
    }

    fn drive_to(phase: Phase) -> SessionState {
        let mut state = set_up();
        let mut rng = ScriptedRng::default();
        while state.phase != phase {
            let event = match next_step(&state) {
                NextStep::Advance(advance) => advance.event(),
                NextStep::AwaitHuman {
                    participant,
                    action,
                }
                | NextStep::Generate {
                    participant,
                    action,
                } => interpret_response(
                    &state,
                    &participant,
                    action,
                    Ok("Casey".to_string()),
                    &mut rng,
                )
                .unwrap(),
                NextStep::Idle => panic!("stuck in {}", state.phase),
            };
            state = state.apply(&event).unwrap();
        }
        state
    }

    #[test]
    fn test_setup_advances_to_clue_round() {
        assert_eq!(
            next_step(&set_up()),
            NextStep::Advance(AutoAdvance::StartClueRound)
        );
        assert_eq!(next_step(&SessionState::new()), NextStep::Idle);
    }

    #[test]
    fn test_clue_round_routes_active_seat() {
        let state = start_clue_round(&set_up()).unwrap();
        assert_eq!(
            next_step(&state),
            NextStep::AwaitHuman {
                participant: id("human"),
                action: RequestedAction::Clue
            }
        );
        let state = submit_clue(&state, &id("human"), "gray").unwrap();
        assert_eq!(
            next_step(&state),
            NextStep::Generate {
                participant: id("alex"),
                action: RequestedAction::Clue
            }
        );
    }

    #[test]
    fn test_discussion_skips_human_then_votes() {
        let state = drive_to(Phase::Discussion);
        assert_eq!(
            next_step(&state),
            NextStep::Generate {
                participant: id("alex"),
                action: RequestedAction::Discussion
            }
        );
        let state = drive_to(Phase::Voting);
        assert_eq!(state.discussion.len(), 3);
        assert!(!state.has_spoken(&id("human")));
    }

    #[test]
    fn test_voting_waits_for_human_first() {
        let state = drive_to(Phase::Voting);
        assert_eq!(
            next_step(&state),
            NextStep::AwaitHuman {
                participant: id("human"),
                action: RequestedAction::Vote
            }
        );
        let state = submit_vote(&state, &id("human"), &id("alex")).unwrap();
        assert_eq!(
            next_step(&state),
            NextStep::Generate {
                participant: id("alex"),
                action: RequestedAction::Vote
            }
        );
    }

    #[test]
    fn test_reveal_resolves() {
        let state = drive_to(Phase::Reveal);
        assert_eq!(next_step(&state), NextStep::Advance(AutoAdvance::Resolve));
        let state = drive_to(Phase::Results);
        assert_eq!(next_step(&state), NextStep::Idle);
    }

    #[test]
    fn test_impostor_request_hides_secret() {
        let state = start_clue_round(&set_up()).unwrap();
        let request = build_request(&state, &id("alex"), RequestedAction::Clue).unwrap();
        assert_eq!(request.secret_word, None);
        assert!(request.is_impostor());
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("elephant"));

        let crew = build_request(&state, &id("bailey"), RequestedAction::Clue).unwrap();
        assert_eq!(crew.secret_word.as_deref(), Some("elephant"));
        assert!(!crew.is_impostor());
        assert!(crew.participants.iter().all(|p| p.is_impostor.is_none()));
    }

    #[test]
    fn test_first_token() {
        assert_eq!(first_token("  Trunk is my clue\nmore"), Some("Trunk"));
        assert_eq!(first_token("\n\n gray\n"), Some("gray"));
        assert_eq!(first_token("   \n "), None);
    }

    #[test]
    fn test_clue_response_is_cleaned() {
        let state = start_clue_round(&set_up()).unwrap();
        let state = submit_clue(&state, &id("human"), "gray").unwrap();
        let mut rng = ScriptedRng::default();
        let event = interpret_response(
            &state,
            &id("alex"),
            RequestedAction::Clue,
            Ok("Tusk\nbecause elephants".to_string()),
            &mut rng,
        )
        .unwrap();
        let next = state.apply(&event).unwrap();
        assert_eq!(next.clues.last().unwrap().word, "tusk");
    }

    #[test]
    fn test_unusable_clue_falls_back() {
        let state = start_clue_round(&set_up()).unwrap();
        let state = submit_clue(&state, &id("human"), "gray").unwrap();
        for response in [
            Ok("elephant".to_string()),
            Ok(String::new()),
            Err(GenerationError::Timeout),
        ] {
            let mut rng = ScriptedRng::new(vec![3], vec![]);
            let event =
                interpret_response(&state, &id("alex"), RequestedAction::Clue, response, &mut rng)
                    .unwrap();
            let next = state.apply(&event).unwrap();
            assert_eq!(next.clues.last().unwrap().word, "stuff");
        }
    }

    #[test]
    fn test_fallback_clue_never_secret() {
        let mut rng = ScriptedRng::new(vec![0, 1, 2, 3, 4], vec![]);
        for _ in 0..5 {
            assert_ne!(fallback_clue(Some("thing"), &mut rng), "thing");
        }
    }

    #[test]
    fn test_vote_matches_name_case_insensitively() {
        let state = drive_to(Phase::Voting);
        let state = submit_vote(&state, &id("human"), &id("alex")).unwrap();
        let mut rng = ScriptedRng::default();
        let event = interpret_response(
            &state,
            &id("alex"),
            RequestedAction::Vote,
            Ok("bailey. Their clues were off".to_string()),
            &mut rng,
        )
        .unwrap();
        assert_eq!(
            event,
            GameEvent::SubmitVote(VoteSubmission {
                voter_id: id("alex"),
                suspect_id: id("bailey")
            })
        );
    }

    #[test]
    fn test_unmatched_or_self_vote_falls_back_to_other() {
        let state = drive_to(Phase::Voting);
        for response in [Ok("Nobody".to_string()), Ok("Alex".to_string())] {
            for pick in 0..3 {
                let mut rng = ScriptedRng::new(vec![pick], vec![]);
                let event = interpret_response(
                    &state,
                    &id("alex"),
                    RequestedAction::Vote,
                    response.clone(),
                    &mut rng,
                )
                .unwrap();
                let GameEvent::SubmitVote(vote) = event else {
                    panic!("expected a vote");
                };
                assert_ne!(vote.suspect_id, id("alex"));
            }
        }
    }

    #[test]
    fn test_empty_discussion_falls_back() {
        let state = drive_to(Phase::Discussion);
        let mut rng = ScriptedRng::default();
        let event = interpret_response(
            &state,
            &id("bailey"),
            RequestedAction::Discussion,
            Ok("   ".to_string()),
            &mut rng,
        )
        .unwrap();
        let next = state.apply(&event).unwrap();
        assert_eq!(next.discussion[0].text, FALLBACK_DISCUSSION);
    }
}
