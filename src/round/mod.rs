//! # Round Engine
//!
//! Everything that governs a single puzzle attempt: selection, the letter bank, guess
//! accumulation, answer checking, hints, timing and scoring.
//!
//! ## Components
//!
//! - [`engine`] - The [`RoundEngine`] state machine
//! - [`bank`] - Shuffled letter bank and guess state
//! - [`clock`] - Injected wall clock and the per-round elapsed timer
//! - [`scoring`] - Score function and hint budget
//! - [`ticker`] - Cancellable periodic tick for hosts running a clock display
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──start_round──▶ Loaded ──▶ InProgress ──solve──▶ Solved
//!                                      │                    │
//!                                      └──skip──▶ Skipped   │
//!                                                  │        │
//!                         load_next_puzzle ◀───────┴────────┘
//! ```

pub mod bank;
pub mod clock;
pub mod engine;
pub mod scoring;
pub mod ticker;

pub use bank::{GuessState, GuessedLetter, LetterBank, LetterBankEntry};
pub use clock::{Clock, ManualClock, RoundClock, SystemClock};
pub use engine::{HintOutcome, RoundEngine, SelectOutcome};
pub use scoring::{calculate_score, HintBudget, ScoreRules};
pub use ticker::RoundTicker;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Puzzle selection policy for a run of rounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "category", rename_all = "lowercase")]
pub enum Mode {
    /// One puzzle per calendar day, identical for every player.
    Daily,
    /// Random puzzle from one named category.
    Category(String),
    /// Random category, then a random puzzle in it.
    Unlimited,
}

impl Mode {
    pub fn category(&self) -> Option<&str> {
        match self {
            Mode::Category(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Daily => write!(f, "daily"),
            Mode::Category(name) => write!(f, "category:{}", name),
            Mode::Unlimited => write!(f, "unlimited"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Idle,
    Loaded,
    InProgress,
    Solved,
    Skipped,
}

/// Outcome of one finished round (solved or skipped). Produced exactly once per round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResult {
    pub success: bool,
    pub score: u32,
    pub hints_used: u32,
    pub time_taken_seconds: u64,
    pub puzzle_id: String,
    pub mode: Mode,
    /// Category the puzzle was drawn from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
