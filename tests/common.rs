//! Shared fixtures: a small deterministic catalog, a pinned clock and an engine wired to both.

use chrono::{TimeZone, Utc};
use picword::config::GameConfig;
use picword::puzzle::{Puzzle, PuzzleCatalog};
use picword::round::{ManualClock, RoundEngine};
use std::sync::Arc;

pub fn puzzle(id: &str, word: &str) -> Puzzle {
    Puzzle {
        id: id.to_string(),
        word: word.to_string(),
        images: std::array::from_fn(|i| format!("img/{}_{}.jpg", id, i + 1)),
        difficulty: 1,
    }
}

/// sports: GOAL; food: PASTA; music: empty.
pub fn small_catalog() -> PuzzleCatalog {
    PuzzleCatalog::new()
        .with_category("sports", "Sports", vec![puzzle("spt_001", "GOAL")])
        .and_then(|c| c.with_category("food", "Food", vec![puzzle("food_001", "PASTA")]))
        .and_then(|c| c.with_category("music", "Music", vec![]))
        .expect("fixture catalog")
}

pub fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap())
}

#[allow(dead_code)] // not every test binary builds an engine directly
pub fn engine_with(config: GameConfig, clock: &ManualClock) -> RoundEngine {
    RoundEngine::new(config, Arc::new(small_catalog()))
        .with_clock(Box::new(clock.clone()))
        .with_seed(7)
}

/// Pick the letters of `word` one at a time from the bank.
#[allow(dead_code)]
pub fn spell(engine: &mut RoundEngine, word: &str) -> Vec<picword::round::SelectOutcome> {
    word.chars()
        .map(|c| {
            let slot = engine
                .bank()
                .find_available(c)
                .unwrap_or_else(|| panic!("letter {} not in bank", c));
            engine.select_letter(slot)
        })
        .collect()
}
