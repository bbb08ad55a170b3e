use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{DEFAULT_HUMAN_ID, DEFAULT_HUMAN_NAME};

/// Stable identity of a seat. Unique within a session and never reused
/// for a different participant.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// Opaque play-style tag handed to the generation collaborator. The state
/// machine never looks at it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleProfile {
    Analytical,
    Creative,
    Cautious,
}

impl fmt::Display for StyleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Analytical => "analytical",
            Self::Creative => "creative",
            Self::Cautious => "cautious",
        };
        write!(f, "{repr}")
    }
}

/// Who produces a seat's input. Only automated seats carry a style.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ControlKind {
    Human,
    Automated { style: StyleProfile },
}

impl ControlKind {
    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }

    pub fn is_automated(&self) -> bool {
        matches!(self, Self::Automated { .. })
    }

    pub fn style(&self) -> Option<StyleProfile> {
        match self {
            Self::Human => None,
            Self::Automated { style } => Some(*style),
        }
    }
}

/// One seat in the game.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    pub control: ControlKind,
    /// Display-only.
    pub avatar: String,
    /// Assigned once during setup.
    is_impostor: bool,
}

impl Participant {
    pub fn human(id: &str, display_name: &str, avatar: &str) -> Self {
        Self {
            id: ParticipantId::new(id),
            display_name: display_name.trim().to_string(),
            control: ControlKind::Human,
            avatar: avatar.to_string(),
            is_impostor: false,
        }
    }

    pub fn automated(id: &str, display_name: &str, style: StyleProfile, avatar: &str) -> Self {
        Self {
            id: ParticipantId::new(id),
            display_name: display_name.trim().to_string(),
            control: ControlKind::Automated { style },
            avatar: avatar.to_string(),
            is_impostor: false,
        }
    }

    pub fn is_impostor(&self) -> bool {
        self.is_impostor
    }

    pub fn is_human(&self) -> bool {
        self.control.is_human()
    }

    /// Copy of this participant with the impostor flag set as given. Only
    /// setup decides who the impostor is.
    pub(crate) fn with_impostor(&self, is_impostor: bool) -> Self {
        Self {
            is_impostor,
            ..self.clone()
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.avatar, self.display_name)
    }
}

/// The human seat plus the three automated opponents of the standard game.
pub fn default_roster() -> Vec<Participant> {
    vec![
        Participant::human(DEFAULT_HUMAN_ID, DEFAULT_HUMAN_NAME, "👤"),
        Participant::automated("alex", "Alex", StyleProfile::Analytical, "🤖"),
        Participant::automated("bailey", "Bailey", StyleProfile::Creative, "🎭"),
        Participant::automated("casey", "Casey", StyleProfile::Cautious, "🦊"),
    ]
}

/// A single-token hint. `word` is stored normalized (trimmed, lower-cased).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Clue {
    pub participant_id: ParticipantId,
    pub word: String,
    pub round: u8,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (round {}): {}", self.participant_id, self.round, self.word)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Vote {
    pub voter_id: ParticipantId,
    pub suspect_id: ParticipantId,
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.voter_id, self.suspect_id)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DiscussionMessage {
    pub participant_id: ParticipantId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Game phases, in the order a game moves through them.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Lobby,
    Setup,
    ClueRound,
    Discussion,
    Voting,
    Reveal,
    Results,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Lobby => "lobby",
            Self::Setup => "setup",
            Self::ClueRound => "clue-round",
            Self::Discussion => "discussion",
            Self::Voting => "voting",
            Self::Reveal => "reveal",
            Self::Results => "results",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WinningSide {
    Impostor,
    Crew,
}

impl fmt::Display for WinningSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Impostor => "impostor",
            Self::Crew => "crew",
        };
        write!(f, "{repr}")
    }
}

/// Kind of input a seat is asked to produce.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedAction {
    Clue,
    Discussion,
    Vote,
}

impl fmt::Display for RequestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Clue => "clue",
            Self::Discussion => "discussion",
            Self::Vote => "vote",
        };
        write!(f, "{repr}")
    }
}

/// What one seat may know about another participant. The impostor flag is
/// `None` until it is public.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ParticipantView {
    pub id: ParticipantId,
    pub display_name: String,
    pub control: ControlKind,
    pub avatar: String,
    pub is_impostor: Option<bool>,
}

impl ParticipantView {
    pub fn redacted(participant: &Participant) -> Self {
        Self {
            id: participant.id.clone(),
            display_name: participant.display_name.clone(),
            control: participant.control,
            avatar: participant.avatar.clone(),
            is_impostor: None,
        }
    }

    pub fn revealed(participant: &Participant) -> Self {
        Self {
            is_impostor: Some(participant.is_impostor()),
            ..Self::redacted(participant)
        }
    }
}

/// Session snapshot as seen from one seat. This is what the presentation
/// layer renders for a participant.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameView {
    pub viewer: ParticipantId,
    /// Whether the viewer is the impostor. Every seat knows its own role.
    pub is_impostor: bool,
    pub phase: Phase,
    pub participants: Vec<ParticipantView>,
    /// `None` for the impostor, always.
    pub secret_word: Option<String>,
    pub current_round: u8,
    pub total_rounds: u8,
    pub active_participant: Option<ParticipantId>,
    pub clues: Vec<Clue>,
    pub discussion: Vec<DiscussionMessage>,
    pub tally: Vec<(ParticipantId, usize)>,
    pub has_voted: bool,
    pub winning_side: Option<WinningSide>,
    pub revealed_impostor_id: Option<ParticipantId>,
    pub accused_id: Option<ParticipantId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_view_hides_role() {
        let p = Participant::human("human", "You", "👤").with_impostor(true);
        assert_eq!(ParticipantView::redacted(&p).is_impostor, None);
        assert_eq!(ParticipantView::revealed(&p).is_impostor, Some(true));
    }

    #[test]
    fn test_participant_id_is_trimmed() {
        assert_eq!(ParticipantId::new("  alex "), ParticipantId::new("alex"));
        assert_eq!(ParticipantId::from("casey").as_str(), "casey");
    }

    #[test]
    fn test_phase_display_matches_serde() {
        for phase in [
            Phase::Lobby,
            Phase::Setup,
            Phase::ClueRound,
            Phase::Discussion,
            Phase::Voting,
            Phase::Reveal,
            Phase::Results,
        ] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{phase}\""));
        }
    }

    #[test]
    fn test_style_only_on_automated_seats() {
        let human = Participant::human("human", "You", "👤");
        let bot = Participant::automated("alex", "Alex", StyleProfile::Analytical, "🤖");
        assert_eq!(human.control.style(), None);
        assert_eq!(bot.control.style(), Some(StyleProfile::Analytical));
        assert!(human.is_human());
        assert!(!bot.is_human());
    }

    #[test]
    fn test_control_kind_is_tagged() {
        let json = serde_json::to_value(ControlKind::Automated {
            style: StyleProfile::Creative,
        })
        .unwrap();
        assert_eq!(json["kind"], "automated");
        assert_eq!(json["style"], "creative");
    }

    #[test]
    fn test_default_roster_has_one_human() {
        let roster = default_roster();
        assert_eq!(roster.len(), 4);
        assert_eq!(roster.iter().filter(|p| p.is_human()).count(), 1);
        assert!(roster.iter().all(|p| !p.is_impostor()));
    }
}
