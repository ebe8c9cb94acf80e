//! Achievement catalog and unlock predicates.
//!
//! Predicates are pure and run against the stats as they stand *after* the round
//! that triggered evaluation has been applied.

use super::stats::ProfileStats;
use crate::round::RoundResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstWin,
    #[serde(rename = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    Streak7,
    NoHints,
    SpeedDemon,
    Completionist,
}

impl AchievementId {
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementId::FirstWin => "first_win",
            AchievementId::Streak3 => "streak_3",
            AchievementId::Streak7 => "streak_7",
            AchievementId::NoHints => "no_hints",
            AchievementId::SpeedDemon => "speed_demon",
            AchievementId::Completionist => "completionist",
        }
    }

    pub fn info(self) -> &'static Achievement {
        // Catalog order follows declaration order
        &ACHIEVEMENTS[self as usize]
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unlock condition for a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// `gamesWon >= n`
    GamesWon(u32),
    /// `currentStreak >= n`
    Streak(u32),
    /// The winning round used no hints.
    NoHintsUsed,
    /// The winning round took at most this many seconds.
    SolvedWithin(u64),
    /// A win recorded in every playable category.
    AllCategories,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: Requirement,
}

pub const ACHIEVEMENTS: [Achievement; 6] = [
    Achievement {
        id: AchievementId::FirstWin,
        name: "First Victory",
        description: "Solve your first puzzle",
        icon: "trophy",
        requirement: Requirement::GamesWon(1),
    },
    Achievement {
        id: AchievementId::Streak3,
        name: "On Fire",
        description: "Solve 3 puzzles in a row",
        icon: "fire",
        requirement: Requirement::Streak(3),
    },
    Achievement {
        id: AchievementId::Streak7,
        name: "Unstoppable",
        description: "Solve 7 puzzles in a row",
        icon: "fire-alt",
        requirement: Requirement::Streak(7),
    },
    Achievement {
        id: AchievementId::NoHints,
        name: "Clear Mind",
        description: "Solve a puzzle without using hints",
        icon: "lightbulb",
        requirement: Requirement::NoHintsUsed,
    },
    Achievement {
        id: AchievementId::SpeedDemon,
        name: "Speed Demon",
        description: "Solve a puzzle in under 10 seconds",
        icon: "tachometer-alt",
        requirement: Requirement::SolvedWithin(10),
    },
    Achievement {
        id: AchievementId::Completionist,
        name: "Completionist",
        description: "Solve puzzles from all categories",
        icon: "check-double",
        requirement: Requirement::AllCategories,
    },
];

/// What a predicate may look at.
pub struct EvaluationContext<'a> {
    pub stats: &'a ProfileStats,
    pub result: &'a RoundResult,
    pub categories_won: &'a BTreeSet<String>,
    /// Categories that count toward [`Requirement::AllCategories`].
    pub playable_categories: &'a [String],
}

impl Requirement {
    pub fn is_met(&self, ctx: &EvaluationContext<'_>) -> bool {
        match *self {
            Requirement::GamesWon(n) => ctx.stats.games_won >= n,
            Requirement::Streak(n) => ctx.stats.current_streak >= n,
            Requirement::NoHintsUsed => ctx.result.hints_used == 0,
            Requirement::SolvedWithin(secs) => ctx.result.time_taken_seconds <= secs,
            Requirement::AllCategories => {
                !ctx.playable_categories.is_empty()
                    && ctx
                        .playable_categories
                        .iter()
                        .all(|c| ctx.categories_won.contains(c))
            }
        }
    }
}

/// Entries not in `unlocked` whose requirement now holds, in catalog order.
pub fn newly_unlocked(
    unlocked: &BTreeSet<AchievementId>,
    ctx: &EvaluationContext<'_>,
) -> Vec<AchievementId> {
    ACHIEVEMENTS
        .iter()
        .filter(|a| !unlocked.contains(&a.id) && a.requirement.is_met(ctx))
        .map(|a| a.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::Mode;

    fn win(hints: u32, secs: u64) -> RoundResult {
        RoundResult {
            success: true,
            score: 50,
            hints_used: hints,
            time_taken_seconds: secs,
            puzzle_id: "spt_001".into(),
            mode: Mode::Unlimited,
            category: Some("sports".into()),
        }
    }

    #[test]
    fn catalog_order_matches_ids() {
        for (i, a) in ACHIEVEMENTS.iter().enumerate() {
            assert_eq!(a.id as usize, i);
            assert_eq!(a.id.info().name, a.name);
        }
    }

    #[test]
    fn ids_serialize_as_snake_case() {
        let json = serde_json::to_string(&vec![AchievementId::Streak3, AchievementId::SpeedDemon]).unwrap();
        assert_eq!(json, r#"["streak_3","speed_demon"]"#);
        let back: AchievementId = serde_json::from_str("\"first_win\"").unwrap();
        assert_eq!(back, AchievementId::FirstWin);
    }

    #[test]
    fn first_fast_clean_win_unlocks_three() {
        let stats = ProfileStats {
            games_played: 1,
            games_won: 1,
            current_streak: 1,
            best_streak: 1,
        };
        let result = win(0, 8);
        let won: BTreeSet<String> = ["sports".to_string()].into();
        let playable = vec!["sports".to_string(), "food".to_string()];
        let ctx = EvaluationContext {
            stats: &stats,
            result: &result,
            categories_won: &won,
            playable_categories: &playable,
        };
        assert_eq!(
            newly_unlocked(&BTreeSet::new(), &ctx),
            vec![
                AchievementId::FirstWin,
                AchievementId::NoHints,
                AchievementId::SpeedDemon
            ]
        );
    }

    #[test]
    fn completionist_needs_every_playable_category() {
        let stats = ProfileStats::default();
        let result = win(2, 60);
        let playable = vec!["sports".to_string(), "food".to_string()];
        let check = |won: &BTreeSet<String>, playable: &[String]| {
            Requirement::AllCategories.is_met(&EvaluationContext {
                stats: &stats,
                result: &result,
                categories_won: won,
                playable_categories: playable,
            })
        };

        let mut won = BTreeSet::new();
        won.insert("sports".to_string());
        assert!(!check(&won, &playable));
        won.insert("food".to_string());
        assert!(check(&won, &playable));
        assert!(!check(&won, &[]));
    }
}
