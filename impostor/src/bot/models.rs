//! Generation request/response models and bot pacing.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::game::{
    entities::{Clue, DiscussionMessage, ParticipantView, RequestedAction, StyleProfile},
    rng::GameRng,
};

/// Everything an automated seat is told when asked for input.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub requested_action: RequestedAction,
    /// The acting seat. Its own role is filled in; nobody else's is.
    pub acting: ParticipantView,
    /// `None` when the acting seat is the impostor.
    pub secret_word: Option<String>,
    pub prior_clues: Vec<Clue>,
    pub current_round: u8,
    pub participants: Vec<ParticipantView>,
    pub prior_discussion: Vec<DiscussionMessage>,
}

impl GenerationRequest {
    pub fn is_impostor(&self) -> bool {
        self.acting.is_impostor == Some(true)
    }

    pub fn style(&self) -> Option<StyleProfile> {
        self.acting.control.style()
    }

    /// Other seats, in turn order.
    pub fn others(&self) -> impl Iterator<Item = &ParticipantView> {
        self.participants.iter().filter(|p| p.id != self.acting.id)
    }
}

/// Errors a generator can report. All of them are recovered with a local
/// fallback by the session driver.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GenerationError {
    #[error("generation timed out")]
    Timeout,
    #[error("generator unavailable: {0}")]
    Unavailable(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// How long a bot "thinks" before answering.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PacingParams {
    /// Average thinking time in milliseconds (base)
    pub base_think_time_ms: u64,

    /// Random variance in thinking time (±milliseconds)
    pub think_time_variance_ms: u64,
}

/// Pacing never goes below this.
pub const MIN_THINK_TIME_MS: u64 = 300;

impl PacingParams {
    /// No delay at all. Used by tests and benchmarks.
    pub fn instant() -> Self {
        Self {
            base_think_time_ms: 0,
            think_time_variance_ms: 0,
        }
    }

    /// Per-style defaults.
    pub fn for_style(style: StyleProfile) -> Self {
        match style {
            StyleProfile::Analytical => Self {
                base_think_time_ms: 1300, // Weighs every clue
                think_time_variance_ms: 700,
            },
            StyleProfile::Creative => Self {
                base_think_time_ms: 1000,
                think_time_variance_ms: 600,
            },
            StyleProfile::Cautious => Self {
                base_think_time_ms: 1500,
                think_time_variance_ms: 500,
            },
        }
    }

    /// Thinking delay with randomization.
    pub fn think_delay(&self, rng: &mut dyn GameRng) -> Duration {
        if self.base_think_time_ms == 0 && self.think_time_variance_ms == 0 {
            return Duration::ZERO;
        }
        let span = self.think_time_variance_ms.saturating_mul(2) as usize + 1;
        let offset = rng.pick_index(span) as u64;
        let delay = self
            .base_think_time_ms
            .saturating_add(offset)
            .saturating_sub(self.think_time_variance_ms);
        Duration::from_millis(delay.max(MIN_THINK_TIME_MS))
    }
}
