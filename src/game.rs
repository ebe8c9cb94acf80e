//! Game coordinator.
//!
//! [`GameSession`] wires a [`RoundEngine`] to the [`SessionTracker`], a leaderboard
//! [`ScoreSink`] and a [`Presenter`]. Every operation forwards the engine's events to
//! the presenter in order; a completed round is recorded, its unlocks announced, and
//! its scores handed to the sink when the player is signed in.

use crate::errors::GameError;
use crate::events::GameEvent;
use crate::leaderboard::{submissions_for, ScoreSink};
use crate::round::{HintOutcome, Mode, RoundEngine, RoundResult, SelectOutcome};
use crate::session::SessionTracker;
use log::debug;

/// Receiver for game events (terminal renderer, test recorder, UI bridge).
pub trait Presenter {
    fn present(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> Presenter for F {
    fn present(&mut self, event: &GameEvent) {
        self(event)
    }
}

pub struct GameSession<P: Presenter> {
    engine: RoundEngine,
    tracker: SessionTracker,
    sink: Box<dyn ScoreSink>,
    presenter: P,
}

impl<P: Presenter> GameSession<P> {
    pub fn new(
        engine: RoundEngine,
        tracker: SessionTracker,
        sink: Box<dyn ScoreSink>,
        presenter: P,
    ) -> Self {
        Self {
            engine,
            tracker,
            sink,
            presenter,
        }
    }

    pub fn start(&mut self, mode: Mode) -> Result<(), GameError> {
        let res = self.engine.start_round(mode);
        self.flush();
        res
    }

    pub fn next_puzzle(&mut self) -> Result<(), GameError> {
        let res = self.engine.load_next_puzzle();
        self.flush();
        res
    }

    pub fn select_letter(&mut self, bank_index: usize) -> SelectOutcome {
        let outcome = self.engine.select_letter(bank_index);
        self.flush();
        outcome
    }

    pub fn use_hint(&mut self) -> HintOutcome {
        let outcome = self.engine.use_hint();
        self.flush();
        outcome
    }

    pub fn skip(&mut self) -> Option<RoundResult> {
        let result = self.engine.skip();
        self.flush();
        result
    }

    /// Advance the round clock. Returns true when the displayed time changed.
    pub fn tick(&mut self) -> bool {
        let changed = self.engine.tick();
        self.flush();
        changed
    }

    /// Pick up a sign-in or sign-out. Returns true when the active profile changed.
    pub fn refresh_identity(&mut self) -> bool {
        self.tracker.refresh_identity()
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn flush(&mut self) {
        for event in self.engine.drain_events() {
            self.presenter.present(&event);
            if let GameEvent::RoundComplete { result, .. } = &event {
                self.on_round_complete(result);
            }
        }
    }

    fn on_round_complete(&mut self, result: &RoundResult) {
        let unlocked = self.tracker.record_round_result(result);
        if !unlocked.is_empty() {
            self.presenter
                .present(&GameEvent::AchievementsUnlocked(unlocked));
        }

        let submissions = submissions_for(result);
        if submissions.is_empty() {
            return;
        }
        match self.tracker.bearer_token() {
            Some(token) if self.tracker.is_authenticated() => {
                for submission in submissions {
                    self.sink.submit(submission, &token);
                }
            }
            _ => debug!(
                "'{}' is not signed in; score not submitted",
                self.tracker.username()
            ),
        }
    }
}
