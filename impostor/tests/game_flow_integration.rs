/// Integration tests for game flow scenarios
///
/// These tests drive the pure state machine through whole games and the
/// resolution scenarios a player would recognize.
use impostor::game::{
    GameError, Participant, ParticipantId, Phase, ScriptedRng, SessionState, SetupPlan,
    StyleProfile, TieBreak, WinningSide, WordList,
    entities::default_roster,
    resolver::resolve_votes,
    state_machine::{
        reset, resolve, setup, start_clue_round, start_voting, submit_clue, submit_discussion,
        submit_vote,
    },
    words::FixedWord,
};

fn id(s: &str) -> ParticipantId {
    ParticipantId::new(s)
}

/// Four seats a, b, c, d with "a" human. `impostor` is a roster index.
fn abcd_roster() -> Vec<Participant> {
    vec![
        Participant::human("a", "A", ""),
        Participant::automated("b", "B", StyleProfile::Analytical, ""),
        Participant::automated("c", "C", StyleProfile::Creative, ""),
        Participant::automated("d", "D", StyleProfile::Cautious, ""),
    ]
}

fn set_up_abcd(impostor: usize, tie_break: TieBreak) -> SessionState {
    let mut rng = ScriptedRng::new(vec![impostor], vec![]);
    let plan = SetupPlan::draw(&abcd_roster(), &mut rng, &FixedWord::new("piano")).unwrap();
    setup(&SessionState::with_tie_break(tie_break), plan).unwrap()
}

/// Clue rounds and discussion played out, voting open.
fn to_voting(state: SessionState) -> SessionState {
    let mut state = start_clue_round(&state).unwrap();
    while state.phase == Phase::ClueRound {
        let seat = state.active_participant().unwrap().id.clone();
        state = submit_clue(&state, &seat, "keys").unwrap();
    }
    let bots: Vec<ParticipantId> = state.automated().map(|p| p.id.clone()).collect();
    for bot in &bots {
        state = submit_discussion(&state, bot, "hmm").unwrap();
    }
    start_voting(&state).unwrap()
}

fn cast(state: SessionState, votes: &[(&str, &str)]) -> SessionState {
    votes.iter().fold(state, |state, (voter, suspect)| {
        submit_vote(&state, &id(voter), &id(suspect)).unwrap()
    })
}

#[test]
fn test_full_game_visits_every_phase_once() {
    let mut phases = Vec::new();
    let mut state = SessionState::new();
    phases.push(state.phase);

    let mut rng = ScriptedRng::new(vec![3, 0], vec![vec![2, 0, 3, 1]]);
    let plan = SetupPlan::draw(&default_roster(), &mut rng, &WordList).unwrap();
    state = setup(&state, plan).unwrap();
    phases.push(state.phase);

    state = start_clue_round(&state).unwrap();
    phases.push(state.phase);

    for _ in 0..3 * 4 {
        let seat = state.active_participant().unwrap().id.clone();
        state = submit_clue(&state, &seat, "gray").unwrap();
    }
    assert_eq!(state.clues.len(), 12);
    phases.push(state.phase);

    let bots: Vec<ParticipantId> = state.automated().map(|p| p.id.clone()).collect();
    assert_eq!(bots.len(), 3);
    for bot in &bots {
        state = submit_discussion(&state, bot, "I have a feeling about this one.").unwrap();
    }
    assert!(!state.has_spoken(&id("human")));

    state = start_voting(&state).unwrap();
    phases.push(state.phase);

    let impostor = state.impostor().unwrap().id.clone();
    let seats: Vec<ParticipantId> = state.participants.iter().map(|p| p.id.clone()).collect();
    for voter in &seats {
        let suspect = if *voter == impostor {
            seats.iter().find(|s| *s != voter).unwrap()
        } else {
            &impostor
        };
        state = submit_vote(&state, voter, suspect).unwrap();
    }
    phases.push(state.phase);

    state = resolve(&state).unwrap();
    phases.push(state.phase);

    assert_eq!(
        phases,
        [
            Phase::Lobby,
            Phase::Setup,
            Phase::ClueRound,
            Phase::Discussion,
            Phase::Voting,
            Phase::Reveal,
            Phase::Results
        ]
    );
    assert_eq!(state.winning_side, Some(WinningSide::Crew));
    assert_eq!(state.revealed_impostor_id, Some(impostor));
}

#[test]
fn test_setup_yields_one_impostor_and_one_human() {
    for pick in 0..4 {
        let mut rng = ScriptedRng::new(vec![pick], vec![vec![1, 2, 3, 0]]);
        let plan = SetupPlan::draw(&default_roster(), &mut rng, &WordList).unwrap();
        let state = setup(&SessionState::new(), plan).unwrap();
        assert_eq!(state.participants.iter().filter(|p| p.is_impostor()).count(), 1);
        assert_eq!(state.participants.iter().filter(|p| p.is_human()).count(), 1);
        assert!(state.secret_word.is_some());
    }
}

#[test]
fn test_majority_on_impostor_is_crew_win() {
    let state = to_voting(set_up_abcd(2, TieBreak::default()));
    // Three voters only: d -> a, so voting stays open.
    let state = cast(state, &[("a", "c"), ("b", "c"), ("d", "a")]);
    assert_eq!(state.phase, Phase::Voting);
    let resolution = resolve_votes(&state.votes, &state.participants, state.tie_break).unwrap();
    assert_eq!(resolution.accused, Some(id("c")));
    assert_eq!(resolution.winning_side, WinningSide::Crew);
    assert_eq!(resolution.revealed_impostor_id, id("c"));
}

#[test]
fn test_tie_is_deterministic() {
    let votes = [("a", "b"), ("b", "a"), ("c", "a"), ("d", "b")];
    let first = cast(to_voting(set_up_abcd(2, TieBreak::default())), &votes);
    let first = resolve(&first).unwrap();
    assert_eq!(first.accused_id, Some(id("a")));
    assert_eq!(first.winning_side, Some(WinningSide::Impostor));

    for _ in 0..5 {
        let again = resolve(&cast(
            to_voting(set_up_abcd(2, TieBreak::default())),
            &votes,
        ))
        .unwrap();
        assert_eq!(again.accused_id, first.accused_id);
        assert_eq!(again.winning_side, first.winning_side);
        assert_eq!(again.revealed_impostor_id, first.revealed_impostor_id);
    }
}

#[test]
fn test_tie_with_no_accusation_policy() {
    let votes = [("a", "b"), ("b", "a"), ("c", "a"), ("d", "b")];
    let state = cast(to_voting(set_up_abcd(0, TieBreak::NoAccusation)), &votes);
    let state = resolve(&state).unwrap();
    assert_eq!(state.accused_id, None);
    assert_eq!(state.winning_side, Some(WinningSide::Impostor));
    assert_eq!(state.revealed_impostor_id, Some(id("a")));
}

#[test]
fn test_multi_word_clue_is_rejected() {
    let state = start_clue_round(&set_up_abcd(1, TieBreak::default())).unwrap();
    let before = state.clues.len();
    assert_eq!(
        submit_clue(&state, &id("a"), "hello world"),
        Err(GameError::MultiTokenClue)
    );
    assert_eq!(state.clues.len(), before);
}

#[test]
fn test_secret_word_clue_is_rejected() {
    let state = start_clue_round(&set_up_abcd(1, TieBreak::default())).unwrap();
    assert_eq!(
        submit_clue(&state, &id("a"), "PIANO"),
        Err(GameError::ClueIsSecretWord)
    );
}

#[test]
fn test_transitions_out_of_phase_are_rejected() {
    let lobby = SessionState::new();
    assert!(matches!(
        start_voting(&lobby),
        Err(GameError::PhaseMismatch {
            expected: Phase::Discussion,
            actual: Phase::Lobby
        })
    ));
    assert!(matches!(
        submit_vote(&lobby, &id("a"), &id("b")),
        Err(GameError::PhaseMismatch { .. })
    ));
    let setup_state = set_up_abcd(1, TieBreak::default());
    assert!(matches!(
        submit_clue(&setup_state, &id("a"), "keys"),
        Err(GameError::PhaseMismatch { .. })
    ));
    assert!(matches!(
        submit_discussion(&setup_state, &id("b"), "hi"),
        Err(GameError::PhaseMismatch { .. })
    ));
}

#[test]
fn test_new_game_after_results() {
    let state = cast(
        to_voting(set_up_abcd(3, TieBreak::default())),
        &[("a", "d"), ("b", "d"), ("c", "d"), ("d", "a")],
    );
    let results = resolve(&state).unwrap();
    assert_eq!(results.phase, Phase::Results);

    let mut rng = ScriptedRng::new(vec![0], vec![]);
    let plan = SetupPlan::draw(&abcd_roster(), &mut rng, &FixedWord::new("kite")).unwrap();
    let next = setup(&results, plan).unwrap();
    assert_eq!(next.phase, Phase::Setup);
    assert_eq!(next.generation, results.generation + 1);
    assert_eq!(next.winning_side, None);
    assert_eq!(next.secret_word.as_deref(), Some("kite"));

    let lobby = reset(&next).unwrap();
    assert_eq!(lobby.phase, Phase::Lobby);
}

#[test]
fn test_snapshot_round_trips_through_json() {
    let state = to_voting(set_up_abcd(1, TieBreak::NoAccusation));
    let json = serde_json::to_string(&state).unwrap();
    let back: SessionState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
    assert_eq!(back.impostor().unwrap().id, id("b"));
}
