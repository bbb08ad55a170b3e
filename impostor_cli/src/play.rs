//! Terminal rendering and prompts for the human seat.

use anyhow::Error;
use impostor::{
    Phase, SessionError, SessionHandle, SessionState,
    game::{ParticipantId, RequestedAction, WinningSide},
    session::SessionNotification,
};
use std::{io::Write, sync::Arc};
use tokio::{
    io::{AsyncBufRead, Lines},
    sync::mpsc,
};

/// Remembers what has already been printed for the current game.
#[derive(Debug, Default)]
pub struct Table {
    phase: Option<Phase>,
    round: u8,
    clues: usize,
    discussion: usize,
}

impl Table {
    /// Lines describing everything new in `state` since the last call.
    pub fn render(&mut self, state: &SessionState) -> Vec<String> {
        let mut lines = Vec::new();

        for clue in state.clues.iter().skip(self.clues) {
            lines.push(format!("  {}: {}", name_of(state, &clue.participant_id), clue.word));
        }
        self.clues = state.clues.len();

        for message in state.discussion.iter().skip(self.discussion) {
            lines.push(format!(
                "  {}: \"{}\"",
                name_of(state, &message.participant_id),
                message.text
            ));
        }
        self.discussion = state.discussion.len();

        let new_phase = self.phase != Some(state.phase);
        let new_round = state.phase == Phase::ClueRound && state.current_round != self.round;
        if new_phase || new_round {
            lines.extend(header(state));
        }
        self.phase = Some(state.phase);
        self.round = state.current_round;

        lines
    }
}

fn name_of(state: &SessionState, id: &ParticipantId) -> String {
    state
        .participant(id)
        .map(|p| p.display_name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn header(state: &SessionState) -> Vec<String> {
    match state.phase {
        Phase::Lobby => vec![],
        Phase::Setup => {
            let Some(view) = state.human().and_then(|h| state.view_for(&h.id)) else {
                return vec![];
            };
            let seats: Vec<&str> = view
                .participants
                .iter()
                .map(|p| p.display_name.as_str())
                .collect();
            let role = match view.secret_word {
                Some(word) => format!("The secret word is: {word}"),
                None => "You are the IMPOSTOR. You don't know the word, so blend in.".to_string(),
            };
            vec![
                String::new(),
                format!("Players: {}", seats.join(", ")),
                role,
            ]
        }
        Phase::ClueRound => vec![format!(
            "--- Round {} of {} ---",
            state.current_round, state.total_rounds
        )],
        Phase::Discussion => vec!["--- Discussion ---".to_string()],
        Phase::Voting => vec!["--- Voting ---".to_string()],
        Phase::Reveal => vec!["All votes are in.".to_string()],
        Phase::Results => results(state),
    }
}

fn results(state: &SessionState) -> Vec<String> {
    let mut lines = vec!["--- Results ---".to_string()];
    for (id, count) in state.vote_tally() {
        lines.push(format!("  {}: {count} vote(s)", name_of(state, &id)));
    }
    match &state.accused_id {
        Some(id) => lines.push(format!("The group accused {}.", name_of(state, id))),
        None => lines.push("The vote was split; nobody was accused.".to_string()),
    }
    if let Some(id) = &state.revealed_impostor_id {
        lines.push(format!("{} was the impostor.", name_of(state, id)));
    }
    if let (Some(side), Some(human)) = (state.winning_side, state.human()) {
        let won = (side == WinningSide::Impostor) == human.is_impostor();
        lines.push(format!(
            "The {side} side wins. {}",
            if won { "You win!" } else { "You lose." }
        ));
    }
    lines
}

/// Resolve typed input to a suspect: a 1-based number from the printed list,
/// or a display name.
pub fn pick_suspect(
    state: &SessionState,
    voter: &ParticipantId,
    input: &str,
) -> Option<ParticipantId> {
    let input = input.trim();
    if let Ok(number) = input.parse::<usize>() {
        return candidates(state, voter)
            .get(number.checked_sub(1)?)
            .map(|id| (*id).clone());
    }
    state.participant_by_name(input).map(|p| p.id.clone())
}

fn candidates<'a>(state: &'a SessionState, voter: &ParticipantId) -> Vec<&'a ParticipantId> {
    state
        .participants
        .iter()
        .map(|p| &p.id)
        .filter(|id| *id != voter)
        .collect()
}

/// Print `text` and read one line. `None` at end of input.
pub async fn prompt<R>(input: &mut Lines<R>, text: &str) -> Result<Option<String>, Error>
where
    R: AsyncBufRead + Unpin,
{
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(input.next_line().await?)
}

/// Follow one game until results. `None` if input ended first.
pub async fn play_game<R>(
    handle: &SessionHandle,
    notifications: &mut mpsc::Receiver<SessionNotification>,
    input: &mut Lines<R>,
) -> Result<Option<Arc<SessionState>>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut table = Table::default();

    while let Some(notification) = notifications.recv().await {
        match notification {
            SessionNotification::StateChanged(state) => {
                for line in table.render(&state) {
                    println!("{line}");
                }
                if state.phase == Phase::Results {
                    return Ok(Some(state));
                }
            }
            SessionNotification::AwaitingHuman {
                participant,
                action,
            } => {
                let state = handle.snapshot().await?;
                if !answer(handle, &state, &participant, action, input).await? {
                    return Ok(None);
                }
            }
        }
    }

    Ok(None)
}

/// Ask until the session accepts the answer. `false` at end of input.
async fn answer<R>(
    handle: &SessionHandle,
    state: &SessionState,
    participant: &ParticipantId,
    action: RequestedAction,
    input: &mut Lines<R>,
) -> Result<bool, Error>
where
    R: AsyncBufRead + Unpin,
{
    if action == RequestedAction::Vote {
        for (i, id) in candidates(state, participant).into_iter().enumerate() {
            println!("  {}. {}", i + 1, name_of(state, id));
        }
    }

    loop {
        let text = match action {
            RequestedAction::Clue => "Your clue (one word): ",
            RequestedAction::Vote => "Who is the impostor? ",
            RequestedAction::Discussion => return Ok(true),
        };
        let Some(line) = prompt(input, text).await? else {
            return Ok(false);
        };

        let result = match action {
            RequestedAction::Vote => match pick_suspect(state, participant, &line) {
                Some(suspect) => handle.submit_vote(participant, &suspect).await,
                None => {
                    println!("No player called '{}'", line.trim());
                    continue;
                }
            },
            _ => handle.submit_clue(participant, &line).await,
        };

        match result {
            Ok(_) => return Ok(true),
            Err(SessionError::Rejected(e)) => println!("{e}"),
            Err(e) => return Err(e.into()),
        }
    }
}
