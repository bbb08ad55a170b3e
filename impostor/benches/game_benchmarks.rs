use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use impostor::game::{
    Participant, ParticipantId, Phase, SeededRng, SessionState, SetupPlan, StyleProfile, TieBreak,
    Vote, WordList,
    entities::default_roster,
    orchestration::next_step,
    resolver::resolve_votes,
    state_machine::{
        resolve, setup, start_clue_round, start_voting, submit_clue, submit_discussion,
        submit_vote,
    },
};
use std::hint::black_box;

/// A roster of `n` seats: one human and `n - 1` automated players.
fn roster(n: usize) -> Vec<Participant> {
    let styles = [
        StyleProfile::Analytical,
        StyleProfile::Creative,
        StyleProfile::Cautious,
    ];
    std::iter::once(Participant::human("human", "You", ""))
        .chain((1..n).map(|i| {
            Participant::automated(
                &format!("bot{i}"),
                &format!("Bot{i}"),
                styles[i % styles.len()],
                "",
            )
        }))
        .collect()
}

fn set_up(roster: &[Participant], seed: u64) -> SessionState {
    let mut rng = SeededRng::new(Some(seed));
    let plan = SetupPlan::draw(roster, &mut rng, &WordList).unwrap();
    setup(&SessionState::new(), plan).unwrap()
}

/// Play a whole game through the pure transitions.
fn play(state: SessionState) -> SessionState {
    let mut state = start_clue_round(&state).unwrap();
    while state.phase == Phase::ClueRound {
        let seat = state.active_participant().unwrap().id.clone();
        state = submit_clue(&state, &seat, "gray").unwrap();
    }
    let bots: Vec<ParticipantId> = state.automated().map(|p| p.id.clone()).collect();
    for bot in &bots {
        state = submit_discussion(&state, bot, "hmm").unwrap();
    }
    state = start_voting(&state).unwrap();
    let seats: Vec<ParticipantId> = state.participants.iter().map(|p| p.id.clone()).collect();
    for (i, voter) in seats.iter().enumerate() {
        let suspect = &seats[(i + 1) % seats.len()];
        state = submit_vote(&state, voter, suspect).unwrap();
    }
    resolve(&state).unwrap()
}

/// Benchmark drawing and applying a setup plan
fn bench_setup(c: &mut Criterion) {
    let roster = default_roster();
    c.bench_function("setup_default_roster", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            black_box(set_up(&roster, seed))
        });
    });
}

/// Benchmark a full game at different table sizes
fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_game");

    for seats in [4, 8, 16] {
        let roster = roster(seats);
        group.bench_with_input(BenchmarkId::from_parameter(seats), &roster, |b, roster| {
            b.iter_batched(
                || set_up(roster, 7),
                play,
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark vote resolution with a split vote
fn bench_resolve_votes(c: &mut Criterion) {
    let state = set_up(&roster(16), 3);
    let seats: Vec<ParticipantId> = state.participants.iter().map(|p| p.id.clone()).collect();
    let votes: Vec<Vote> = seats
        .iter()
        .enumerate()
        .map(|(i, voter)| Vote {
            voter_id: voter.clone(),
            suspect_id: seats[(i + 1 + i % 2) % seats.len()].clone(),
        })
        .collect();

    c.bench_function("resolve_votes_16", |b| {
        b.iter(|| {
            resolve_votes(
                black_box(&votes),
                &state.participants,
                TieBreak::FirstInRosterOrder,
            )
        });
    });
}

/// Benchmark routing decisions (runs after every applied event)
fn bench_next_step(c: &mut Criterion) {
    let state = start_clue_round(&set_up(&default_roster(), 11)).unwrap();
    c.bench_function("next_step_clue_round", |b| {
        b.iter(|| next_step(black_box(&state)));
    });
}

criterion_group!(
    game_operations,
    bench_setup,
    bench_full_game,
    bench_resolve_votes,
    bench_next_step,
);

criterion_main!(game_operations);
