//! Profile counters and the persisted snapshot shape.

use super::achievement::AchievementId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const GUEST_USERNAME: &str = "Guest User";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub games_played: u32,
    pub games_won: u32,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl ProfileStats {
    /// Apply one round outcome. `best_streak` only ever grows.
    pub fn record(&mut self, success: bool) {
        self.games_played = self.games_played.saturating_add(1);
        if success {
            self.games_won = self.games_won.saturating_add(1);
            self.current_streak = self.current_streak.saturating_add(1);
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
    }

    /// Win percentage, 0 when nothing has been played.
    pub fn win_rate(&self) -> u32 {
        if self.games_played == 0 {
            0
        } else {
            ((self.games_won as u64 * 100) / self.games_played as u64) as u32
        }
    }
}

/// Everything persisted for one player.
///
/// JSON shape: `{username, stats:{gamesPlayed,...}, achievements:[id], categoriesWon:[name]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub username: String,
    #[serde(default)]
    pub stats: ProfileStats,
    #[serde(default)]
    pub achievements: BTreeSet<AchievementId>,
    #[serde(default)]
    pub categories_won: BTreeSet<String>,
}

impl ProfileSnapshot {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            stats: ProfileStats::default(),
            achievements: BTreeSet::new(),
            categories_won: BTreeSet::new(),
        }
    }

    pub fn guest() -> Self {
        Self::new(GUEST_USERNAME)
    }

    pub fn has_achievement(&self, id: AchievementId) -> bool {
        self.achievements.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_resets_streak_but_keeps_best() {
        let mut stats = ProfileStats::default();
        stats.record(true);
        stats.record(true);
        stats.record(false);
        stats.record(true);
        assert_eq!(
            stats,
            ProfileStats {
                games_played: 4,
                games_won: 3,
                current_streak: 1,
                best_streak: 2,
            }
        );
        assert_eq!(stats.win_rate(), 75);
    }

    #[test]
    fn snapshot_json_uses_camel_case() {
        let mut snap = ProfileSnapshot::new("ada");
        snap.stats.record(true);
        snap.achievements.insert(AchievementId::FirstWin);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["stats"]["gamesWon"], 1);
        assert_eq!(json["stats"]["bestStreak"], 1);
        assert_eq!(json["achievements"][0], "first_win");
        assert!(json["categoriesWon"].as_array().unwrap().is_empty());
    }

    #[test]
    fn older_snapshots_without_category_coverage_still_load() {
        let json = r#"{"username":"ada","stats":{"gamesPlayed":2,"gamesWon":1,"currentStreak":0,"bestStreak":1},"achievements":["first_win"]}"#;
        let snap: ProfileSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.stats.games_played, 2);
        assert!(snap.has_achievement(AchievementId::FirstWin));
        assert!(snap.categories_won.is_empty());
    }
}
