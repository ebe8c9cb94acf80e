//! # Session Tracker
//!
//! Cross-round state for one player: games played and won, the win streak, unlocked
//! achievements and per-category win coverage. Profiles persist through a
//! [`ProfileStore`] after every recorded result.

pub mod achievement;
pub mod stats;
pub mod store;
pub mod tracker;

pub use achievement::{Achievement, AchievementId, Requirement, ACHIEVEMENTS};
pub use stats::{ProfileSnapshot, ProfileStats, GUEST_USERNAME};
pub use store::{safe_filename, JsonProfileStore, MemoryProfileStore, ProfileStore};
pub use tracker::SessionTracker;
