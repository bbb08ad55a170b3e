//! Session configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::game::{
    constants::DEFAULT_HUMAN_NAME,
    entities::{Participant, default_roster},
    resolver::TieBreak,
    state_machine::validate_roster,
};

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seats for every new game, before shuffling
    pub roster: Vec<Participant>,

    /// Upper bound on one generator round-trip (default: 10s)
    pub generation_timeout_ms: u64,

    /// What happens when the top vote count is shared
    pub tie_break: TieBreak,

    /// Seed for setup draws and fallbacks; `None` draws from OS entropy
    pub seed: Option<u64>,

    /// Inbox capacity of the actor (default: 100)
    pub inbox_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            roster: default_roster(),
            generation_timeout_ms: 10_000,
            tie_break: TieBreak::default(),
            seed: None,
            inbox_capacity: 100,
        }
    }
}

impl SessionConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.generation_timeout_ms == 0 {
            return Err("Generation timeout must be positive".to_string());
        }

        if self.inbox_capacity == 0 {
            return Err("Inbox capacity must be positive".to_string());
        }

        validate_roster(&self.roster).map_err(|e| e.to_string())
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_timeout_ms)
    }

    /// Rename the human seat. Blank names keep the default.
    pub fn with_player_name(mut self, name: &str) -> Self {
        let name = match name.trim() {
            "" => DEFAULT_HUMAN_NAME,
            trimmed => trimmed,
        };
        for participant in self.roster.iter_mut().filter(|p| p.is_human()) {
            participant.display_name = name.to_string();
        }
        self
    }
}
