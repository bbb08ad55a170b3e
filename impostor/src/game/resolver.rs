//! Vote tallying and outcome resolution.

use log::error;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

use super::entities::{Participant, ParticipantId, Vote, WinningSide};
use super::state_machine::GameError;

/// What happens when several participants share the highest vote count.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// The tied participant seated first in the roster is accused.
    #[default]
    FirstInRosterOrder,
    /// Nobody is accused and the impostor wins.
    NoAccusation,
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::FirstInRosterOrder => "first-in-roster-order",
            Self::NoAccusation => "no-accusation",
        };
        write!(f, "{repr}")
    }
}

impl std::str::FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first-in-roster-order" | "first" | "roster" => Ok(Self::FirstInRosterOrder),
            "no-accusation" | "none" => Ok(Self::NoAccusation),
            other => Err(format!("unknown tie-break policy '{other}'")),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Resolution {
    pub winning_side: WinningSide,
    pub revealed_impostor_id: ParticipantId,
    /// `None` when no votes were cast, or on a tie under
    /// [`TieBreak::NoAccusation`].
    pub accused: Option<ParticipantId>,
    /// Votes received per participant, in roster order.
    pub tally: Vec<(ParticipantId, usize)>,
}

/// Votes received by every participant in roster order, zero counts
/// included. Votes naming unknown participants are ignored.
pub fn tally_votes(votes: &[Vote], participants: &[Participant]) -> Vec<(ParticipantId, usize)> {
    let mut counts: HashMap<&ParticipantId, usize> = HashMap::with_capacity(participants.len());
    for vote in votes {
        *counts.entry(&vote.suspect_id).or_default() += 1;
    }
    participants
        .iter()
        .map(|p| (p.id.clone(), counts.get(&p.id).copied().unwrap_or(0)))
        .collect()
}

/// Decide who was accused and which side won.
///
/// The participant with strictly the most votes is accused; ties are settled
/// by `tie_break`. The crew wins only if the accused is the impostor. With no
/// votes at all nobody is accused and the impostor wins.
///
/// # Errors
///
/// [`GameError::InternalStateError`] when the roster is empty or does not
/// hold exactly one impostor. Both mean setup was bypassed.
pub fn resolve_votes(
    votes: &[Vote],
    participants: &[Participant],
    tie_break: TieBreak,
) -> Result<Resolution, GameError> {
    if participants.is_empty() {
        error!("resolve called with an empty roster");
        return Err(GameError::InternalStateError(
            "empty roster at resolution".to_string(),
        ));
    }

    let mut impostors = participants.iter().filter(|p| p.is_impostor());
    let (Some(impostor), None) = (impostors.next(), impostors.next()) else {
        error!("resolve called without exactly one impostor");
        return Err(GameError::InternalStateError(
            "roster must hold exactly one impostor".to_string(),
        ));
    };

    let tally = tally_votes(votes, participants);
    let max = tally.iter().map(|(_, count)| *count).max().unwrap_or(0);

    let accused = if max == 0 {
        None
    } else {
        let mut leaders = tally.iter().filter(|(_, count)| *count == max);
        match (leaders.next(), leaders.next(), tie_break) {
            (Some((id, _)), None, _) => Some(id.clone()),
            (Some((id, _)), Some(_), TieBreak::FirstInRosterOrder) => Some(id.clone()),
            _ => None,
        }
    };

    let winning_side = match &accused {
        Some(id) if *id == impostor.id => WinningSide::Crew,
        _ => WinningSide::Impostor,
    };

    Ok(Resolution {
        winning_side,
        revealed_impostor_id: impostor.id.clone(),
        accused,
        tally,
    })
}
