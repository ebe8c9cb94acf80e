//! # picword - Four Pictures, One Word
//!
//! A word-guessing game engine: players assemble a hidden word, hinted at by four
//! images, by picking letters from a shuffled bank. The crate holds the round state
//! machine and scoring rules, the cross-round profile tracker with achievements, and
//! the glue a front end needs (event stream, persistence, leaderboard client).
//!
//! ## Features
//!
//! - **Round Engine**: puzzle selection (daily, category, unlimited), letter bank,
//!   answer checking, hint budget, elapsed-time scoring.
//! - **Session Tracker**: games played and won, streaks, six achievements, JSON
//!   profile snapshots written through after every round.
//! - **Leaderboard**: routing of scores to daily / all-time / category boards, with
//!   an optional HTTP client (`leaderboard-http` feature).
//! - **Terminal front end**: the `picword` binary plays rounds interactively.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use picword::config::GameConfig;
//! use picword::puzzle::PuzzleCatalog;
//! use picword::round::{Mode, RoundEngine, SelectOutcome};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), picword::errors::GameError> {
//! let mut engine = RoundEngine::new(GameConfig::default(), Arc::new(PuzzleCatalog::builtin()));
//! engine.start_round(Mode::Category("sports".into()))?;
//! let word = engine.puzzle().map(|p| p.word.clone()).unwrap_or_default();
//! for letter in word.chars() {
//!     if let Some(slot) = engine.bank().find_available(letter) {
//!         if let SelectOutcome::Solved(result) = engine.select_letter(slot) {
//!             println!("scored {}", result.score);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`round`] - Round engine, letter bank, clock, scoring
//! - [`session`] - Profile stats, achievements, snapshot stores
//! - [`puzzle`] - Puzzle records, the puzzle source seam, built-in catalog
//! - [`game`] - Coordinator tying engine, tracker, leaderboard and presenter together
//! - [`events`] - Notifications for the presentation layer
//! - [`leaderboard`] - Score routing and the HTTP client
//! - [`identity`] - Who is playing
//! - [`render`] - Terminal text formatting
//! - [`config`] - TOML configuration
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Presentation   │ ← terminal loop / UI bridge
//! └─────────────────┘
//!          │ events ▲ input
//! ┌─────────────────┐
//! │   GameSession   │ ← coordinator
//! └─────────────────┘
//!     │         │
//! ┌────────┐ ┌────────────────┐
//! │ Round  │ │ SessionTracker │ → ProfileStore, ScoreSink
//! │ Engine │ └────────────────┘
//! └────────┘
//! ```

pub mod config;
pub mod errors;
pub mod events;
pub mod game;
pub mod identity;
pub mod leaderboard;
pub mod puzzle;
pub mod render;
pub mod round;
pub mod session;
