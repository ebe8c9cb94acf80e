//! Notifications sent to the presentation layer.
//!
//! Each event carries everything needed to render it, so presenters never have to
//! reach back into engine internals.

use crate::round::{LetterBankEntry, Mode, RoundResult};
use crate::session::AchievementId;

/// Snapshot of a freshly loaded puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleView {
    pub puzzle_id: String,
    pub difficulty: u32,
    pub images: [String; 4],
    /// Number of letter slots to fill.
    pub slots: usize,
    pub bank: Vec<char>,
    pub mode: Mode,
    pub category: Option<String>,
    pub hints_allowed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PuzzleLoaded(PuzzleView),
    GuessUpdated {
        guess: Vec<char>,
        slots: usize,
        bank: Vec<LetterBankEntry>,
    },
    /// A full guess did not match; the guess was cleared and its letters released.
    Mismatch { attempt: String },
    HintApplied {
        position: usize,
        bank_index: usize,
        remaining: u32,
    },
    HintExhausted,
    TimerTick { elapsed_seconds: u64 },
    /// The round clock stopped; hosts cancel their periodic ticker here.
    ClockStopped,
    RoundComplete {
        result: RoundResult,
        session_score: u32,
    },
    /// An unfinished round was discarded (mode switch or restart). No result is produced.
    RoundAbandoned { puzzle_id: String },
    AchievementsUnlocked(Vec<AchievementId>),
    /// User-visible, non-fatal error.
    Error(String),
}
