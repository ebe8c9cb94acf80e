//! Score calculation and the per-round hint budget.

use crate::config::GameConfig;

/// Points always left after the time deduction (before hints).
pub const TIME_PENALTY_FLOOR: u32 = 10;

/// Scoring inputs taken from [`GameConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreRules {
    pub base_points: u32,
    pub time_penalty: u32,
    pub hint_penalty: u32,
    pub timer_enabled: bool,
}

impl From<&GameConfig> for ScoreRules {
    fn from(config: &GameConfig) -> Self {
        Self {
            base_points: config.base_points_per_puzzle,
            time_penalty: config.time_penalty,
            hint_penalty: config.hint_penalty,
            timer_enabled: config.timer_enabled,
        }
    }
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self::from(&GameConfig::default())
    }
}

/// Score for a solved puzzle. Always within `0..=base_points`.
///
/// The time deduction is `elapsed * time_penalty`, capped so it never takes the score
/// below [`TIME_PENALTY_FLOOR`]; each hint then costs `hint_penalty`, floored at zero.
pub fn calculate_score(rules: &ScoreRules, elapsed_seconds: u64, hints_used: u32) -> u32 {
    let base = rules.base_points as u64;
    let after_time = if rules.timer_enabled {
        let max_time_penalty = base.saturating_sub(TIME_PENALTY_FLOOR as u64);
        let time_penalty = elapsed_seconds
            .saturating_mul(rules.time_penalty as u64)
            .min(max_time_penalty);
        base - time_penalty
    } else {
        base
    };
    let hint_total = (hints_used as u64).saturating_mul(rules.hint_penalty as u64);
    after_time.saturating_sub(hint_total) as u32
}

/// Hints allowed and consumed for the current puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintBudget {
    allowed: u32,
    used: u32,
}

impl HintBudget {
    pub fn new(allowed: u32) -> Self {
        Self { allowed, used: 0 }
    }

    pub fn allowed(&self) -> u32 {
        self.allowed
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn remaining(&self) -> u32 {
        self.allowed - self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.allowed
    }

    /// Spend one hint. Returns false, changing nothing, when none are left.
    pub fn consume(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.used += 1;
        true
    }

    pub fn reset(&mut self) {
        self.used = 0;
    }
}
