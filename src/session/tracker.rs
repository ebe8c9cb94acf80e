//! Cross-round profile state: counters, streaks, achievements and category coverage.
//!
//! Every recorded result is written through to the [`ProfileStore`] immediately.
//! A failed write is logged and the in-memory profile stays authoritative.

use super::achievement::{newly_unlocked, AchievementId, EvaluationContext};
use super::stats::{ProfileSnapshot, ProfileStats, GUEST_USERNAME};
use super::store::ProfileStore;
use crate::identity::IdentityProvider;
use crate::round::RoundResult;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct SessionTracker {
    store: Arc<dyn ProfileStore>,
    identity: Arc<dyn IdentityProvider>,
    playable_categories: Vec<String>,
    profile: ProfileSnapshot,
}

impl SessionTracker {
    /// Load (or create) the profile for whoever `identity` names.
    ///
    /// `playable_categories` is the set a player must win in for `completionist`.
    pub fn new(
        store: Arc<dyn ProfileStore>,
        identity: Arc<dyn IdentityProvider>,
        playable_categories: Vec<String>,
    ) -> Self {
        let username = profile_name(identity.as_ref());
        let profile = load_or_fresh(store.as_ref(), &username);
        Self {
            store,
            identity,
            playable_categories,
            profile,
        }
    }

    /// Apply one finished round and return the achievements it unlocked.
    ///
    /// Losses reset the streak and never unlock anything.
    pub fn record_round_result(&mut self, result: &RoundResult) -> Vec<AchievementId> {
        self.profile.stats.record(result.success);

        let unlocked = if result.success {
            if let Some(category) = &result.category {
                self.profile.categories_won.insert(category.clone());
            }
            let ctx = EvaluationContext {
                stats: &self.profile.stats,
                result,
                categories_won: &self.profile.categories_won,
                playable_categories: &self.playable_categories,
            };
            newly_unlocked(&self.profile.achievements, &ctx)
        } else {
            Vec::new()
        };
        self.profile.achievements.extend(unlocked.iter().copied());

        debug!(
            "'{}' recorded {} on {}: played={} won={} streak={} best={}",
            self.profile.username,
            if result.success { "win" } else { "loss" },
            result.puzzle_id,
            self.profile.stats.games_played,
            self.profile.stats.games_won,
            self.profile.stats.current_streak,
            self.profile.stats.best_streak
        );
        for id in &unlocked {
            info!(
                "achievement unlocked for '{}': {}",
                self.profile.username,
                id.info().name
            );
        }

        self.persist();
        unlocked
    }

    /// Re-read the identity; when the player changed, swap in their profile.
    /// Returns true if the active profile changed.
    pub fn refresh_identity(&mut self) -> bool {
        let username = profile_name(self.identity.as_ref());
        if username == self.profile.username {
            return false;
        }
        debug!(
            "identity changed from '{}' to '{}'",
            self.profile.username, username
        );
        self.profile = load_or_fresh(self.store.as_ref(), &username);
        true
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.identity.bearer_token()
    }

    pub fn username(&self) -> &str {
        &self.profile.username
    }

    pub fn profile(&self) -> &ProfileSnapshot {
        &self.profile
    }

    pub fn stats(&self) -> &ProfileStats {
        &self.profile.stats
    }

    pub fn achievements(&self) -> &BTreeSet<AchievementId> {
        &self.profile.achievements
    }

    pub fn playable_categories(&self) -> &[String] {
        &self.playable_categories
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.profile) {
            warn!("failed to save profile '{}': {}", self.profile.username, e);
        }
    }
}

fn profile_name(identity: &dyn IdentityProvider) -> String {
    identity
        .username()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| GUEST_USERNAME.to_string())
}

fn load_or_fresh(store: &dyn ProfileStore, username: &str) -> ProfileSnapshot {
    match store.load(username) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => ProfileSnapshot::new(username),
        Err(e) => {
            warn!(
                "could not load profile '{}', starting fresh: {}",
                username, e
            );
            ProfileSnapshot::new(username)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StoreError;
    use crate::identity::GuestIdentity;
    use crate::round::Mode;
    use crate::session::MemoryProfileStore;

    struct FailingStore;

    impl ProfileStore for FailingStore {
        fn load(&self, _: &str) -> Result<Option<ProfileSnapshot>, StoreError> {
            Err(StoreError::Internal("offline".into()))
        }

        fn save(&self, _: &ProfileSnapshot) -> Result<(), StoreError> {
            Err(StoreError::Internal("offline".into()))
        }
    }

    fn result(success: bool, hints: u32, secs: u64, category: &str) -> RoundResult {
        RoundResult {
            success,
            score: if success { 50 } else { 0 },
            hints_used: hints,
            time_taken_seconds: secs,
            puzzle_id: format!("{}_001", category),
            mode: Mode::Category(category.to_string()),
            category: Some(category.to_string()),
        }
    }

    fn tracker(store: Arc<dyn ProfileStore>) -> SessionTracker {
        SessionTracker::new(
            store,
            Arc::new(GuestIdentity),
            vec!["sports".into(), "food".into()],
        )
    }

    #[test]
    fn unlocks_are_reported_once() {
        let mut t = tracker(Arc::new(MemoryProfileStore::new()));
        let first = t.record_round_result(&result(true, 1, 30, "sports"));
        assert_eq!(first, vec![AchievementId::FirstWin]);
        let second = t.record_round_result(&result(true, 1, 30, "sports"));
        assert!(second.is_empty());
    }

    #[test]
    fn loss_never_evaluates_achievements() {
        let mut t = tracker(Arc::new(MemoryProfileStore::new()));
        let unlocked = t.record_round_result(&result(false, 0, 1, "sports"));
        assert!(unlocked.is_empty());
        assert_eq!(t.stats().games_played, 1);
        assert!(t.profile().categories_won.is_empty());
    }

    #[test]
    fn completionist_after_every_category_won() {
        let mut t = tracker(Arc::new(MemoryProfileStore::new()));
        t.record_round_result(&result(true, 2, 60, "sports"));
        let unlocked = t.record_round_result(&result(true, 2, 60, "food"));
        assert!(unlocked.contains(&AchievementId::Completionist));
    }

    #[test]
    fn save_failure_keeps_memory_state() {
        let mut t = tracker(Arc::new(FailingStore));
        t.record_round_result(&result(true, 0, 5, "sports"));
        assert_eq!(t.stats().games_won, 1);
        assert_eq!(t.username(), GUEST_USERNAME);
    }
}
