//! Automated players.
//!
//! This module implements:
//! - [`Generator`]: the contract the session driver uses to get an automated
//!   seat's clue, discussion line, or vote
//! - [`LocalBot`]: an offline heuristic generator with human-like pacing
//!
//! Any other backend (a hosted language model, a scripted test double) plugs
//! in by implementing [`Generator`]. The driver never trusts the returned
//! text: it is cleaned and, when unusable, replaced by a local fallback.

pub mod decision;
pub mod generator;
pub mod models;

pub use decision::LocalBot;
pub use generator::Generator;
pub use models::{GenerationError, GenerationRequest, GenerationResult, PacingParams};
