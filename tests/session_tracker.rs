//! Integration tests for profile stats, achievements and snapshot persistence.

use picword::identity::{GuestIdentity, SharedIdentity, StaticIdentity};
use picword::round::{Mode, RoundResult};
use picword::session::{
    AchievementId, JsonProfileStore, MemoryProfileStore, ProfileStore, SessionTracker,
    GUEST_USERNAME,
};
use std::sync::Arc;
use tempfile::tempdir;

fn result(success: bool, hints: u32, secs: u64) -> RoundResult {
    RoundResult {
        success,
        score: if success { 60 } else { 0 },
        hints_used: hints,
        time_taken_seconds: secs,
        puzzle_id: "spt_001".into(),
        mode: Mode::Unlimited,
        category: Some("sports".into()),
    }
}

fn categories() -> Vec<String> {
    vec!["sports".into(), "food".into()]
}

#[test]
fn test_streak_achievements_unlock_at_thresholds() {
    let mut tracker = SessionTracker::new(
        Arc::new(MemoryProfileStore::new()),
        Arc::new(GuestIdentity),
        categories(),
    );

    let mut unlocked_at = Vec::new();
    for round in 1..=7 {
        for id in tracker.record_round_result(&result(true, 1, 30)) {
            unlocked_at.push((round, id));
        }
    }
    assert_eq!(
        unlocked_at,
        vec![
            (1, AchievementId::FirstWin),
            (3, AchievementId::Streak3),
            (7, AchievementId::Streak7)
        ]
    );
    assert_eq!(tracker.stats().best_streak, 7);
}

#[test]
fn test_best_streak_never_decreases() {
    let mut tracker = SessionTracker::new(
        Arc::new(MemoryProfileStore::new()),
        Arc::new(GuestIdentity),
        categories(),
    );
    let pattern = [true, true, true, false, true, false, false, true, true];
    let mut best = 0;
    for success in pattern {
        tracker.record_round_result(&result(success, 1, 30));
        let stats = tracker.stats();
        assert!(stats.best_streak >= best);
        assert!(stats.best_streak >= stats.current_streak);
        best = stats.best_streak;
    }
    let stats = tracker.stats();
    assert_eq!(stats.games_played, 9);
    assert_eq!(stats.games_won, 6);
    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.best_streak, 3);
}

#[test]
fn test_failed_round_unlocks_nothing() {
    let mut tracker = SessionTracker::new(
        Arc::new(MemoryProfileStore::new()),
        Arc::new(GuestIdentity),
        categories(),
    );
    // Fast and hint-free, but a skip
    assert!(tracker.record_round_result(&result(false, 0, 2)).is_empty());
    assert!(tracker.achievements().is_empty());
    assert_eq!(tracker.stats().current_streak, 0);
}

#[test]
fn test_every_result_is_written_through() {
    let dir = tempdir().unwrap();
    let store = Arc::new(JsonProfileStore::new(dir.path()));
    let mut tracker = SessionTracker::new(
        store.clone(),
        Arc::new(StaticIdentity::new("ada", None)),
        categories(),
    );

    tracker.record_round_result(&result(true, 0, 5));
    let saved = store.load("ada").unwrap().expect("profile written");
    assert_eq!(saved.stats.games_won, 1);
    assert!(saved.has_achievement(AchievementId::SpeedDemon));
    assert!(saved.categories_won.contains("sports"));

    tracker.record_round_result(&result(false, 0, 5));
    let saved = store.load("ada").unwrap().unwrap();
    assert_eq!(saved.stats.games_played, 2);
    assert_eq!(saved.stats.current_streak, 0);

    // A new tracker for the same player picks up where the last one stopped
    let reopened = SessionTracker::new(
        store,
        Arc::new(StaticIdentity::new("ada", None)),
        categories(),
    );
    assert_eq!(reopened.profile(), &saved);
}

#[test]
fn test_sign_in_switches_profile() {
    let store = Arc::new(MemoryProfileStore::new());
    let identity = SharedIdentity::new();
    let mut tracker = SessionTracker::new(store.clone(), Arc::new(identity.clone()), categories());
    assert_eq!(tracker.username(), GUEST_USERNAME);
    assert!(!tracker.is_authenticated());

    tracker.record_round_result(&result(true, 2, 40));
    assert!(!tracker.refresh_identity());

    identity.sign_in("bo", "token-bo");
    assert!(tracker.refresh_identity());
    assert_eq!(tracker.username(), "bo");
    assert_eq!(tracker.stats().games_played, 0);
    assert_eq!(tracker.bearer_token().as_deref(), Some("token-bo"));

    identity.sign_out();
    assert!(tracker.refresh_identity());
    assert_eq!(tracker.username(), GUEST_USERNAME);
    assert_eq!(tracker.stats().games_won, 1);
}
