//! The round state machine.
//!
//! Contract:
//! - All operations run to completion synchronously; callers serialize them.
//! - Invalid input (consumed slot, full guess, no round in progress) is a no-op, never an error.
//! - Each terminated round (solve or skip) yields exactly one [`RoundResult`]; an
//!   abandoned round yields none.
//! - Notifications accumulate in an outbox drained with [`RoundEngine::drain_events`].

use super::bank::{GuessState, LetterBank};
use super::clock::{Clock, RoundClock, SystemClock};
use super::scoring::{calculate_score, HintBudget, ScoreRules};
use super::{Mode, RoundResult, RoundState};
use crate::config::GameConfig;
use crate::errors::GameError;
use crate::events::{GameEvent, PuzzleView};
use crate::puzzle::{Puzzle, PuzzleSource};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Result of [`RoundEngine::select_letter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Nothing changed (no round in progress, full guess, bad or consumed slot).
    Ignored,
    /// Letter appended; the guess is not complete yet.
    Placed,
    /// The guess completed the word.
    Solved(RoundResult),
    /// The guess was complete but wrong; it has been cleared.
    Mismatch,
}

/// Result of [`RoundEngine::use_hint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintOutcome {
    /// No round in progress.
    Ignored,
    /// Budget already spent; nothing changed.
    Exhausted,
    /// No unconsumed bank slot holds the target letter; nothing changed.
    NoTarget,
    Applied {
        position: usize,
        bank_index: usize,
        outcome: SelectOutcome,
    },
}

pub struct RoundEngine {
    config: GameConfig,
    rules: ScoreRules,
    source: Arc<dyn PuzzleSource + Send + Sync>,
    clock: Box<dyn Clock>,
    rng: StdRng,
    state: RoundState,
    mode: Option<Mode>,
    puzzle: Option<Puzzle>,
    category: Option<String>,
    bank: LetterBank,
    guess: GuessState,
    hints: HintBudget,
    round_clock: RoundClock,
    session_score: u32,
    last_result: Option<RoundResult>,
    outbox: Vec<GameEvent>,
}

impl RoundEngine {
    pub fn new(config: GameConfig, source: Arc<dyn PuzzleSource + Send + Sync>) -> Self {
        let rules = ScoreRules::from(&config);
        let hints = HintBudget::new(config.hints_allowed);
        Self {
            config,
            rules,
            source,
            clock: Box::new(SystemClock),
            rng: StdRng::from_entropy(),
            state: RoundState::Idle,
            mode: None,
            puzzle: None,
            category: None,
            bank: LetterBank::default(),
            guess: GuessState::default(),
            hints,
            round_clock: RoundClock::new(),
            session_score: 0,
            last_result: None,
            outbox: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a deterministic RNG for selection, bank layout and hint targets.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Begin a run in `mode`: discard any unfinished round, zero the session score and load a puzzle.
    ///
    /// On failure the engine is left exactly as it was.
    pub fn start_round(&mut self, mode: Mode) -> Result<(), GameError> {
        let (category, puzzle) = self.pick_or_report(&mode)?;
        self.abandon_active();
        self.session_score = 0;
        debug!("round run started in {} mode", mode);
        self.mode = Some(mode);
        self.install(category, puzzle);
        Ok(())
    }

    /// Load the next puzzle for the current mode. The session score carries over.
    pub fn load_next_puzzle(&mut self) -> Result<(), GameError> {
        let Some(mode) = self.mode.clone() else {
            self.outbox
                .push(GameEvent::Error(GameError::NoActiveRound.to_string()));
            return Err(GameError::NoActiveRound);
        };
        let (category, puzzle) = self.pick_or_report(&mode)?;
        self.abandon_active();
        self.install(category, puzzle);
        Ok(())
    }

    /// Pick bank slot `bank_index` for the next letter of the guess.
    pub fn select_letter(&mut self, bank_index: usize) -> SelectOutcome {
        if self.state != RoundState::InProgress || self.guess.is_full() {
            return SelectOutcome::Ignored;
        }
        let Some(letter) = self.bank.consume(bank_index) else {
            return SelectOutcome::Ignored;
        };
        self.guess.push(letter, bank_index);
        self.emit_guess();
        if self.guess.is_full() {
            self.evaluate()
        } else {
            SelectOutcome::Placed
        }
    }

    /// Spend a hint: place the correct letter for a random unfilled position into the next slot.
    pub fn use_hint(&mut self) -> HintOutcome {
        if self.state != RoundState::InProgress {
            return HintOutcome::Ignored;
        }
        if self.hints.is_exhausted() {
            self.outbox.push(GameEvent::HintExhausted);
            return HintOutcome::Exhausted;
        }
        let word: Vec<char> = match &self.puzzle {
            Some(p) => p.word.chars().collect(),
            None => return HintOutcome::Ignored,
        };
        let filled = self.guess.len();
        if filled >= word.len() {
            return HintOutcome::NoTarget;
        }
        let position = self.rng.gen_range(filled..word.len());
        let target = word[position];
        let Some(bank_index) = self.bank.find_available(target) else {
            warn!(
                "hint: no unconsumed bank slot holds '{}' (position {}); ignoring",
                target, position
            );
            return HintOutcome::NoTarget;
        };
        // Counted before the letter lands so a hint that completes the word is charged.
        self.hints.consume();
        self.outbox.push(GameEvent::HintApplied {
            position,
            bank_index,
            remaining: self.hints.remaining(),
        });
        debug!(
            "hint applied: position {} letter '{}' from slot {} ({} left)",
            position,
            target,
            bank_index,
            self.hints.remaining()
        );
        let outcome = self.select_letter(bank_index);
        HintOutcome::Applied {
            position,
            bank_index,
            outcome,
        }
    }

    /// Give up on the current puzzle. Returns the (unsuccessful) result, or `None` if
    /// no round is in progress.
    pub fn skip(&mut self) -> Option<RoundResult> {
        if self.state != RoundState::InProgress {
            return None;
        }
        self.stop_clock();
        let result = self.build_result(false, 0);
        self.state = RoundState::Skipped;
        info!(
            "puzzle {} skipped after {}s ({} hints)",
            result.puzzle_id, result.time_taken_seconds, result.hints_used
        );
        self.finish(result.clone());
        Some(result)
    }

    /// Advance the round clock from the injected clock. Returns true when the elapsed
    /// seconds changed; always false once the round is frozen.
    pub fn tick(&mut self) -> bool {
        if self.state != RoundState::InProgress {
            return false;
        }
        let now = self.clock.now();
        if self.round_clock.tick(now) {
            self.outbox.push(GameEvent::TimerTick {
                elapsed_seconds: self.round_clock.elapsed_seconds(),
            });
            true
        } else {
            false
        }
    }

    /// Score for the current puzzle given the time and hints spent so far.
    pub fn calculate_score(&self) -> u32 {
        calculate_score(
            &self.rules,
            self.round_clock.elapsed_seconds(),
            self.hints.used(),
        )
    }

    /// Take all pending notifications.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn mode(&self) -> Option<&Mode> {
        self.mode.as_ref()
    }

    pub fn puzzle(&self) -> Option<&Puzzle> {
        self.puzzle.as_ref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn bank(&self) -> &LetterBank {
        &self.bank
    }

    pub fn guess(&self) -> &GuessState {
        &self.guess
    }

    pub fn hints(&self) -> &HintBudget {
        &self.hints
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.round_clock.elapsed_seconds()
    }

    pub fn clock_running(&self) -> bool {
        self.round_clock.is_running()
    }

    pub fn session_score(&self) -> u32 {
        self.session_score
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn source(&self) -> &Arc<dyn PuzzleSource + Send + Sync> {
        &self.source
    }

    /// Replace the bank layout of the current round, e.g. to replay a known board.
    ///
    /// Refused unless a round is in progress with an empty guess and the letters hold
    /// every answer letter.
    pub fn set_bank_layout(&mut self, letters: &[char]) -> bool {
        if self.state != RoundState::InProgress || !self.guess.is_empty() {
            return false;
        }
        let Some(puzzle) = &self.puzzle else {
            return false;
        };
        let mut remaining = letters.to_vec();
        for c in puzzle.word.chars() {
            match remaining.iter().position(|&x| x == c) {
                Some(pos) => {
                    remaining.swap_remove(pos);
                }
                None => return false,
            }
        }
        self.bank = LetterBank::from_letters(letters.iter().copied());
        true
    }

    fn pick_or_report(&mut self, mode: &Mode) -> Result<(String, Puzzle), GameError> {
        self.pick_puzzle(mode).map_err(|e| {
            warn!("puzzle selection failed for {} mode: {}", mode, e);
            self.outbox.push(GameEvent::Error(e.to_string()));
            e
        })
    }

    fn pick_puzzle(&mut self, mode: &Mode) -> Result<(String, Puzzle), GameError> {
        match mode {
            Mode::Daily => self
                .source
                .daily_puzzle(self.clock.today())
                .ok_or_else(|| GameError::EmptyPuzzlePool("the daily challenge".to_string())),
            Mode::Category(name) => {
                if !self.source.has_category(name) {
                    return Err(GameError::UnknownCategory(name.clone()));
                }
                self.source
                    .puzzles_by_category(name)
                    .choose(&mut self.rng)
                    .cloned()
                    .map(|p| (name.clone(), p))
                    .ok_or_else(|| GameError::EmptyPuzzlePool(name.clone()))
            }
            Mode::Unlimited => {
                let playable: Vec<String> = self
                    .source
                    .categories()
                    .into_iter()
                    .filter(|c| !self.source.puzzles_by_category(c).is_empty())
                    .collect();
                let category = playable
                    .choose(&mut self.rng)
                    .cloned()
                    .ok_or_else(|| GameError::EmptyPuzzlePool("unlimited play".to_string()))?;
                self.source
                    .puzzles_by_category(&category)
                    .choose(&mut self.rng)
                    .cloned()
                    .map(|p| (category.clone(), p))
                    .ok_or(GameError::EmptyPuzzlePool(category))
            }
        }
    }

    fn install(&mut self, category: String, puzzle: Puzzle) {
        self.guess = GuessState::with_capacity(puzzle.word_len());
        self.hints.reset();
        self.round_clock.reset();
        self.bank = LetterBank::generate(&puzzle.word, self.config.extra_letters, &mut self.rng);
        self.category = Some(category);
        self.last_result = None;
        self.state = RoundState::Loaded;

        let view = PuzzleView {
            puzzle_id: puzzle.id.clone(),
            difficulty: puzzle.difficulty,
            images: std::array::from_fn(|i| puzzle.image_or_placeholder(i)),
            slots: puzzle.word_len(),
            bank: self.bank.letters(),
            mode: self.mode.clone().unwrap_or(Mode::Unlimited),
            category: self.category.clone(),
            hints_allowed: self.hints.allowed(),
        };
        debug!(
            "puzzle {} loaded ({} letters, bank of {})",
            puzzle.id,
            view.slots,
            self.bank.len()
        );
        self.puzzle = Some(puzzle);
        self.outbox.push(GameEvent::PuzzleLoaded(view));

        self.round_clock.start(self.clock.now());
        self.state = RoundState::InProgress;
    }

    /// Drop an unfinished round without producing a result.
    fn abandon_active(&mut self) {
        if !matches!(self.state, RoundState::InProgress | RoundState::Loaded) {
            return;
        }
        self.stop_clock();
        let puzzle_id = self
            .puzzle
            .as_ref()
            .map(|p| p.id.clone())
            .unwrap_or_default();
        debug!("round for puzzle {} abandoned", puzzle_id);
        self.outbox.push(GameEvent::RoundAbandoned { puzzle_id });
        self.state = RoundState::Idle;
    }

    fn stop_clock(&mut self) {
        if self.round_clock.freeze(self.clock.now()) {
            self.outbox.push(GameEvent::ClockStopped);
        }
    }

    fn evaluate(&mut self) -> SelectOutcome {
        let attempt = self.guess.as_word();
        let correct = self
            .puzzle
            .as_ref()
            .map(|p| p.word == attempt)
            .unwrap_or(false);
        if correct {
            self.stop_clock();
            let score = self.calculate_score();
            self.session_score = self.session_score.saturating_add(score);
            let result = self.build_result(true, score);
            self.state = RoundState::Solved;
            info!(
                "puzzle {} solved in {}s with {} hints: {} points (session {})",
                result.puzzle_id,
                result.time_taken_seconds,
                result.hints_used,
                score,
                self.session_score
            );
            self.finish(result.clone());
            SelectOutcome::Solved(result)
        } else {
            for guessed in self.guess.clear() {
                self.bank.release(guessed.bank_index);
            }
            debug!("guess '{}' rejected; letters released", attempt);
            self.outbox.push(GameEvent::Mismatch { attempt });
            self.emit_guess();
            SelectOutcome::Mismatch
        }
    }

    fn build_result(&self, success: bool, score: u32) -> RoundResult {
        RoundResult {
            success,
            score,
            hints_used: self.hints.used(),
            time_taken_seconds: self.round_clock.elapsed_seconds(),
            puzzle_id: self
                .puzzle
                .as_ref()
                .map(|p| p.id.clone())
                .unwrap_or_default(),
            mode: self.mode.clone().unwrap_or(Mode::Unlimited),
            category: self.category.clone(),
        }
    }

    fn finish(&mut self, result: RoundResult) {
        self.last_result = Some(result.clone());
        self.outbox.push(GameEvent::RoundComplete {
            result,
            session_score: self.session_score,
        });
    }

    fn emit_guess(&mut self) {
        self.outbox.push(GameEvent::GuessUpdated {
            guess: self.guess.chars(),
            slots: self.guess.capacity(),
            bank: self.bank.entries().to_vec(),
        });
    }
}
