//! Offline bot decision-making with style-based behavior.
//!
//! Crew bots know the secret word's category and hint at it with sibling
//! words. The impostor guesses the category from the clues it has heard and
//! blends in. Suspicion goes to whoever's clues fit the category least.

use async_trait::async_trait;
use std::{collections::HashMap, sync::Mutex, time::Duration};

use super::generator::Generator;
use super::models::{GenerationError, GenerationRequest, GenerationResult, PacingParams};
use crate::game::{
    constants::FALLBACK_DISCUSSION,
    entities::{ParticipantId, ParticipantView, RequestedAction, StyleProfile},
    orchestration::fallback_clue,
    rng::{GameRng, SeededRng},
    words::{WORD_CATEGORIES, WordCategory, WordList},
};

/// Heuristic generator that needs no network.
#[derive(Debug)]
pub struct LocalBot {
    /// `None` means per-style defaults.
    pacing: Option<PacingParams>,
    rng: Mutex<SeededRng>,
}

impl Default for LocalBot {
    fn default() -> Self {
        Self::new(None)
    }
}

impl LocalBot {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            pacing: None,
            rng: Mutex::new(SeededRng::new(seed)),
        }
    }

    /// Same pacing for every seat regardless of style.
    pub fn with_pacing(mut self, pacing: PacingParams) -> Self {
        self.pacing = Some(pacing);
        self
    }

    /// Decide what to say and how long to "think" first.
    pub fn decide(&self, request: &GenerationRequest) -> GenerationResult<(String, Duration)> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| GenerationError::Unavailable("bot rng lock poisoned".to_string()))?;

        let text = match request.requested_action {
            RequestedAction::Clue => choose_clue(request, &mut *rng),
            RequestedAction::Discussion => discussion_line(request, &mut *rng),
            RequestedAction::Vote => choose_suspect(request, &mut *rng)
                .map(|p| p.display_name.clone())
                .ok_or_else(|| GenerationError::Malformed("no one to vote for".to_string()))?,
        };

        let pacing = self.pacing.unwrap_or_else(|| {
            request
                .style()
                .map(PacingParams::for_style)
                .unwrap_or_else(PacingParams::instant)
        });
        Ok((text, pacing.think_delay(&mut *rng)))
    }
}

#[async_trait]
impl Generator for LocalBot {
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult<String> {
        let (text, delay) = self.decide(request)?;
        if !delay.is_zero() {
            log::debug!("{} thinking for {}ms", request.acting.id, delay.as_millis());
            tokio::time::sleep(delay).await;
        }
        Ok(text)
    }
}

fn is_single_token(word: &str) -> bool {
    !word.contains(char::is_whitespace)
}

fn secret_category(request: &GenerationRequest) -> Option<&'static WordCategory> {
    request.secret_word.as_deref().and_then(WordList::category_of)
}

/// Does `word` point at `category`?
fn fits(category: &WordCategory, word: &str) -> bool {
    category.contains(word)
        || category
            .name
            .split_whitespace()
            .any(|part| part.eq_ignore_ascii_case(word))
}

/// Most common category among the other seats' clues. Ties go to the
/// category seen first.
fn inferred_category(request: &GenerationRequest) -> Option<&'static WordCategory> {
    let mut counts: HashMap<&'static str, (usize, usize)> = HashMap::new();
    for (idx, clue) in request
        .prior_clues
        .iter()
        .filter(|c| c.participant_id != request.acting.id)
        .enumerate()
    {
        if let Some(category) = WordList::category_of(&clue.word) {
            counts.entry(category.name).or_insert((0, idx)).0 += 1;
        }
    }
    let (name, _) = counts
        .into_iter()
        .max_by(|(_, (a, a_first)), (_, (b, b_first))| a.cmp(b).then(b_first.cmp(a_first)))?;
    WORD_CATEGORIES.iter().find(|c| c.name == name)
}

fn choose_clue(request: &GenerationRequest, rng: &mut dyn GameRng) -> String {
    let secret = request.secret_word.as_deref();
    let category = if request.is_impostor() {
        inferred_category(request)
    } else {
        secret_category(request)
    };
    let Some(category) = category else {
        return if request.is_impostor() {
            bluff_word(request, rng)
        } else {
            fallback_clue(secret, rng)
        };
    };

    let used = |w: &str| request.prior_clues.iter().any(|c| c.word.eq_ignore_ascii_case(w));
    let candidates: Vec<&str> = category
        .words
        .iter()
        .copied()
        .filter(|&w| is_single_token(w) && !used(w))
        .filter(|&w| secret.is_none_or(|s| !s.eq_ignore_ascii_case(w)))
        .collect();

    let category_hint = category.name.to_lowercase();
    let hint_usable = is_single_token(&category_hint) && !used(category_hint.as_str());
    match request.style() {
        Some(StyleProfile::Cautious) if hint_usable => category_hint,
        Some(StyleProfile::Analytical) if !candidates.is_empty() => candidates[0].to_string(),
        _ if !candidates.is_empty() => candidates[rng.pick_index(candidates.len())].to_string(),
        _ => fallback_clue(secret, rng),
    }
}

/// Impostor with nothing to go on: a word from a random category.
fn bluff_word(request: &GenerationRequest, rng: &mut dyn GameRng) -> String {
    let category = &WORD_CATEGORIES[rng.pick_index(WORD_CATEGORIES.len())];
    WordList::random_from_category(category.name, rng)
        .filter(|w| is_single_token(w))
        .unwrap_or_else(|| fallback_clue(request.secret_word.as_deref(), rng))
}

/// Clues per other seat that don't point at the secret word's category.
fn suspicion(request: &GenerationRequest) -> Vec<(ParticipantId, usize)> {
    let category = secret_category(request);
    request
        .others()
        .map(|p| {
            let off = request
                .prior_clues
                .iter()
                .filter(|c| c.participant_id == p.id)
                .filter(|c| category.is_none_or(|cat| !fits(cat, &c.word)))
                .count();
            (p.id.clone(), off)
        })
        .collect()
}

/// Other seat named most often in discussion so far.
fn most_mentioned<'a>(request: &'a GenerationRequest) -> Option<&'a ParticipantView> {
    request
        .others()
        .map(|p| {
            let name = p.display_name.to_lowercase();
            let mentions = request
                .prior_discussion
                .iter()
                .filter(|m| m.text.to_lowercase().contains(&name))
                .count();
            (p, mentions)
        })
        .filter(|(_, mentions)| *mentions > 0)
        .max_by_key(|(_, mentions)| *mentions)
        .map(|(p, _)| p)
}

fn choose_suspect<'a>(
    request: &'a GenerationRequest,
    rng: &mut dyn GameRng,
) -> Option<&'a ParticipantView> {
    let others: Vec<&ParticipantView> = request.others().collect();
    if others.is_empty() {
        return None;
    }

    if request.is_impostor() {
        return most_mentioned(request).or_else(|| Some(others[rng.pick_index(others.len())]));
    }

    let scores = suspicion(request);
    let max = scores.iter().map(|(_, n)| *n).max().unwrap_or(0);
    if max == 0 {
        return Some(others[rng.pick_index(others.len())]);
    }
    scores
        .iter()
        .find(|(_, n)| *n == max)
        .and_then(|(id, _)| others.iter().copied().find(|p| &p.id == id))
}

fn discussion_line(request: &GenerationRequest, rng: &mut dyn GameRng) -> String {
    let Some(suspect) = choose_suspect(request, rng) else {
        return FALLBACK_DISCUSSION.to_string();
    };
    let name = &suspect.display_name;
    let odd_clue = request
        .prior_clues
        .iter()
        .rev()
        .find(|c| c.participant_id == suspect.id)
        .map(|c| c.word.as_str());

    match (request.style(), odd_clue) {
        (Some(StyleProfile::Analytical), Some(word)) => {
            format!("{name}'s clue \"{word}\" doesn't fit with the rest.")
        }
        (Some(StyleProfile::Creative), _) => {
            format!("Something about {name}'s clues feels off to me.")
        }
        _ => format!("I'm not certain, but {name} seems a little vague."),
    }
}
