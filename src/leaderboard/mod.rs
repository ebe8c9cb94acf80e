//! Leaderboard routing and submission.
//!
//! A finished, successful round by an authenticated player turns into one or more
//! [`ScoreSubmission`]s (see [`submissions_for`]), handed to a [`ScoreSink`]. Sinks
//! must not block: the HTTP sink spawns its requests and only logs failures. Hosts
//! keep a [`PendingSubmissions`] handle and flush it before shutting the runtime down.

#[cfg(feature = "leaderboard-http")]
pub mod http;

#[cfg(feature = "leaderboard-http")]
pub use http::{HttpScoreSink, LeaderboardClient};

use crate::round::{Mode, RoundResult};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tokio::time::timeout;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Timeframe {
    Daily,
    Weekly,
    AllTime,
    /// Per-category board, addressed as `category_<name>`.
    Category(String),
}

impl Timeframe {
    /// Path segment used by the leaderboard API.
    pub fn as_str(&self) -> String {
        match self {
            Timeframe::Daily => "daily".to_string(),
            Timeframe::Weekly => "weekly".to_string(),
            Timeframe::AllTime => "allTime".to_string(),
            Timeframe::Category(name) => format!("category_{}", name),
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Timeframe::Daily),
            "weekly" => Ok(Timeframe::Weekly),
            "allTime" | "all-time" | "alltime" => Ok(Timeframe::AllTime),
            other => match other.strip_prefix("category_") {
                Some(name) if !name.is_empty() => Ok(Timeframe::Category(name.to_string())),
                _ => Err(format!(
                    "unknown timeframe '{}' (expected daily, weekly, allTime or category_<name>)",
                    other
                )),
            },
        }
    }
}

impl Serialize for Timeframe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_str())
    }
}

/// One score bound for one board. Serialized as the request body `{score, puzzleId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    #[serde(skip)]
    pub timeframe: Timeframe,
    pub score: u32,
    pub puzzle_id: Option<String>,
}

/// Boards a result should be posted to. Empty for unsuccessful rounds.
///
/// Daily rounds go to the daily board with their puzzle id; everything else goes to
/// `allTime`, and category play also to that category's board.
pub fn submissions_for(result: &RoundResult) -> Vec<ScoreSubmission> {
    if !result.success {
        return Vec::new();
    }
    match &result.mode {
        Mode::Daily => vec![ScoreSubmission {
            timeframe: Timeframe::Daily,
            score: result.score,
            puzzle_id: Some(result.puzzle_id.clone()),
        }],
        mode => {
            let mut out = vec![ScoreSubmission {
                timeframe: Timeframe::AllTime,
                score: result.score,
                puzzle_id: None,
            }];
            if let Some(category) = mode.category() {
                out.push(ScoreSubmission {
                    timeframe: Timeframe::Category(category.to_string()),
                    score: result.score,
                    puzzle_id: None,
                });
            }
            out
        }
    }
}

/// A row on a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub rank: u32,
    pub username: String,
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Receiver for score submissions. `token` is the player's bearer token.
pub trait ScoreSink: Send {
    fn submit(&mut self, submission: ScoreSubmission, token: &str);
}

/// Logs submissions instead of sending them; used when no leaderboard API is configured.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl ScoreSink for LoggingSink {
    fn submit(&mut self, submission: ScoreSubmission, _token: &str) {
        info!(
            "leaderboard disabled, not submitting {} points to {}",
            submission.score, submission.timeframe
        );
    }
}

/// Keeps every submission in memory. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    submitted: Arc<Mutex<Vec<(ScoreSubmission, String)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> Vec<(ScoreSubmission, String)> {
        self.submitted
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl ScoreSink for RecordingSink {
    fn submit(&mut self, submission: ScoreSubmission, token: &str) {
        if let Ok(mut s) = self.submitted.lock() {
            s.push((submission, token.to_string()));
        }
    }
}

/// Submissions still in flight. Clones share the same task set.
#[derive(Debug, Clone, Default)]
pub struct PendingSubmissions {
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl PendingSubmissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_on<F>(&self, task: F, runtime: &Handle)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.spawn_on(task, runtime);
    }

    /// Tasks spawned and not yet collected by [`flush`](Self::flush).
    pub fn len(&self) -> usize {
        self.tasks.lock().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait up to `limit` for every pending submission. Whatever is still running
    /// afterwards is aborted and logged; returns how many were abandoned.
    pub async fn flush(&self, limit: Duration) -> usize {
        let mut tasks = {
            let mut guard = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *guard)
        };
        if tasks.is_empty() {
            return 0;
        }
        debug!("waiting for {} leaderboard submission(s)", tasks.len());
        let drained = timeout(limit, async {
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    warn!("leaderboard submission task failed: {}", e);
                }
            }
        })
        .await;
        if drained.is_ok() {
            return 0;
        }
        let abandoned = tasks.len();
        warn!(
            "{} leaderboard submission(s) still pending after {:?}; abandoning",
            abandoned, limit
        );
        tasks.abort_all();
        abandoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(mode: Mode, success: bool) -> RoundResult {
        RoundResult {
            success,
            score: 70,
            hints_used: 0,
            time_taken_seconds: 6,
            puzzle_id: "mov_002".into(),
            category: Some("movies".into()),
            mode,
        }
    }

    #[test]
    fn timeframe_parsing_accepts_all_time_alias() {
        assert_eq!("all-time".parse::<Timeframe>().unwrap(), Timeframe::AllTime);
        assert_eq!("allTime".parse::<Timeframe>().unwrap(), Timeframe::AllTime);
        assert_eq!(
            "category_food".parse::<Timeframe>().unwrap(),
            Timeframe::Category("food".into())
        );
        assert!("monthly".parse::<Timeframe>().is_err());
        assert!("category_".parse::<Timeframe>().is_err());
    }

    #[test]
    fn daily_result_goes_to_daily_board_with_puzzle() {
        let subs = submissions_for(&result(Mode::Daily, true));
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].timeframe, Timeframe::Daily);
        assert_eq!(subs[0].puzzle_id.as_deref(), Some("mov_002"));
    }

    #[test]
    fn category_result_goes_to_all_time_and_category() {
        let subs = submissions_for(&result(Mode::Category("movies".into()), true));
        let boards: Vec<String> = subs.iter().map(|s| s.timeframe.as_str()).collect();
        assert_eq!(boards, vec!["allTime", "category_movies"]);
        assert!(submissions_for(&result(Mode::Unlimited, false)).is_empty());
    }

    #[test]
    fn submission_body_is_score_and_puzzle_id() {
        let sub = ScoreSubmission {
            timeframe: Timeframe::Daily,
            score: 40,
            puzzle_id: Some("ani_003".into()),
        };
        assert_eq!(
            serde_json::to_string(&sub).unwrap(),
            r#"{"score":40,"puzzleId":"ani_003"}"#
        );
    }

    #[tokio::test]
    async fn flush_waits_for_finished_submissions() {
        let pending = PendingSubmissions::new();
        let done = Arc::new(Mutex::new(false));
        let flag = done.clone();
        pending.spawn_on(
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                *flag.lock().unwrap() = true;
            },
            &Handle::current(),
        );
        assert_eq!(pending.len(), 1);

        assert_eq!(pending.flush(Duration::from_secs(2)).await, 0);
        assert!(*done.lock().unwrap());
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn flush_abandons_stuck_submissions_after_limit() {
        let pending = PendingSubmissions::new();
        pending.spawn_on(std::future::pending::<()>(), &Handle::current());
        assert_eq!(pending.flush(Duration::from_millis(20)).await, 1);
        assert!(pending.is_empty());
        assert_eq!(pending.flush(Duration::from_millis(20)).await, 0);
    }
}
