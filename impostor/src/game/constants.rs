//! Fixed rules of the game.

/// Number of clue rounds played before discussion opens.
pub const TOTAL_ROUNDS: u8 = 3;

/// Longest clue (in characters) accepted at the boundary.
pub const MAX_CLUE_LENGTH: usize = 20;

/// Smallest roster a game can be set up with.
pub const MIN_PARTICIPANTS: usize = 3;

/// Vocabulary used when an automated clue can't be obtained or is unusable.
pub const FALLBACK_CLUES: [&str; 5] = ["thing", "object", "item", "stuff", "something"];

/// Line used when an automated discussion message can't be obtained.
pub const FALLBACK_DISCUSSION: &str = "I'm not sure who to suspect...";

/// Id of the human seat in the default roster.
pub const DEFAULT_HUMAN_ID: &str = "human";

/// Display name of the human seat in the default roster.
pub const DEFAULT_HUMAN_NAME: &str = "You";
