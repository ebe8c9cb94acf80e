//! HTTP leaderboard client.
//!
//! Talks to `<api_base_url>/api/leaderboard/<timeframe>`: `GET` returns the standings,
//! `POST {score, puzzleId}` with a bearer token records a score. Standings are cached
//! per timeframe; a failed fetch falls back to whatever is cached, however old.

use super::{LeaderboardEntry, PendingSubmissions, ScoreSink, ScoreSubmission, Timeframe};
use crate::config::LeaderboardConfig;
use crate::errors::LeaderboardError;
use log::{debug, warn};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::time::timeout;

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: Instant,
    entries: Vec<LeaderboardEntry>,
}

/// Connection details shared by the client and the fire-and-forget sink.
#[derive(Debug, Clone)]
struct Endpoint {
    client: reqwest::Client,
    base_url: String,
    timeout_seconds: u64,
}

impl Endpoint {
    fn url(&self, timeframe: &Timeframe) -> String {
        format!(
            "{}/api/leaderboard/{}",
            self.base_url.trim_end_matches('/'),
            timeframe.as_str()
        )
    }

    async fn get(&self, timeframe: &Timeframe) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let request = self.client.get(self.url(timeframe));
        let response = timeout(Duration::from_secs(self.timeout_seconds), request.send())
            .await
            .map_err(|_| LeaderboardError::Timeout(self.timeout_seconds))??;
        if !response.status().is_success() {
            return Err(LeaderboardError::Status(response.status().as_u16()));
        }
        Ok(response.json::<Vec<LeaderboardEntry>>().await?)
    }

    async fn post(
        &self,
        submission: &ScoreSubmission,
        token: &str,
    ) -> Result<serde_json::Value, LeaderboardError> {
        let request = self
            .client
            .post(self.url(&submission.timeframe))
            .bearer_auth(token)
            .json(submission);
        let response = timeout(Duration::from_secs(self.timeout_seconds), request.send())
            .await
            .map_err(|_| LeaderboardError::Timeout(self.timeout_seconds))??;
        if !response.status().is_success() {
            return Err(LeaderboardError::Status(response.status().as_u16()));
        }
        Ok(response.json::<serde_json::Value>().await?)
    }
}

pub struct LeaderboardClient {
    endpoint: Endpoint,
    config: LeaderboardConfig,
    cache: HashMap<String, CacheEntry>,
}

impl LeaderboardClient {
    pub fn new(config: LeaderboardConfig) -> Self {
        Self {
            endpoint: Endpoint {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                timeout_seconds: config.timeout_seconds,
            },
            config,
            cache: HashMap::new(),
        }
    }

    /// How long fetched standings stay fresh. Category boards use the all-time expiry.
    pub fn cache_ttl(&self, timeframe: &Timeframe) -> Duration {
        let minutes = match timeframe {
            Timeframe::Daily => self.config.daily_cache_minutes,
            Timeframe::Weekly => self.config.weekly_cache_minutes,
            Timeframe::AllTime | Timeframe::Category(_) => self.config.all_time_cache_minutes,
        };
        Duration::from_secs(minutes * 60)
    }

    /// Standings for `timeframe`, from cache when fresh unless `force_refresh`.
    ///
    /// On a failed request any cached copy is returned instead; the error surfaces only
    /// when there is nothing cached.
    pub async fn fetch(
        &mut self,
        timeframe: &Timeframe,
        force_refresh: bool,
    ) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let key = timeframe.as_str();
        if !force_refresh {
            if let Some(entry) = self.cache.get(&key) {
                if entry.fetched_at.elapsed() < self.cache_ttl(timeframe) {
                    debug!("using cached {} leaderboard", key);
                    return Ok(entry.entries.clone());
                }
            }
        }

        match self.endpoint.get(timeframe).await {
            Ok(entries) => {
                self.cache.insert(
                    key,
                    CacheEntry {
                        fetched_at: Instant::now(),
                        entries: entries.clone(),
                    },
                );
                Ok(entries)
            }
            Err(e) => {
                warn!("failed to fetch {} leaderboard: {}", key, e);
                match self.cache.get(&key) {
                    Some(entry) => {
                        debug!(
                            "falling back to cached {} leaderboard (age: {:.1}min)",
                            key,
                            entry.fetched_at.elapsed().as_secs_f64() / 60.0
                        );
                        Ok(entry.entries.clone())
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// Post a score and drop the cached standings for that board.
    pub async fn submit(
        &mut self,
        submission: &ScoreSubmission,
        token: Option<&str>,
    ) -> Result<serde_json::Value, LeaderboardError> {
        let token = token.ok_or(LeaderboardError::NotAuthenticated)?;
        let response = self.endpoint.post(submission, token).await?;
        self.cache.remove(&submission.timeframe.as_str());
        Ok(response)
    }

    /// The row for `username` on `timeframe`, if present.
    pub async fn user_rank(
        &mut self,
        timeframe: &Timeframe,
        username: &str,
    ) -> Result<Option<LeaderboardEntry>, LeaderboardError> {
        let entries = self.fetch(timeframe, false).await?;
        Ok(find_user(&entries, username))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
        debug!("leaderboard cache cleared");
    }

    /// Sink that posts through this client's endpoint on the given runtime.
    pub fn sink(&self, runtime: Handle) -> HttpScoreSink {
        HttpScoreSink {
            endpoint: self.endpoint.clone(),
            runtime,
            pending: PendingSubmissions::new(),
        }
    }

    #[cfg(test)]
    fn prime(&mut self, timeframe: &Timeframe, entries: Vec<LeaderboardEntry>, age: Duration) {
        let fetched_at = Instant::now()
            .checked_sub(age)
            .unwrap_or_else(Instant::now);
        self.cache
            .insert(timeframe.as_str(), CacheEntry { fetched_at, entries });
    }
}

fn find_user(entries: &[LeaderboardEntry], username: &str) -> Option<LeaderboardEntry> {
    entries
        .iter()
        .find(|e| e.username == username || e.user_id.as_deref() == Some(username))
        .cloned()
}

/// Fire-and-forget submission: each score is posted on a spawned task and failures
/// are only logged, so round transitions never wait on the network. The tasks are
/// tracked in [`pending`](Self::pending) for the host to flush on exit.
pub struct HttpScoreSink {
    endpoint: Endpoint,
    runtime: Handle,
    pending: PendingSubmissions,
}

impl HttpScoreSink {
    pub fn pending(&self) -> PendingSubmissions {
        self.pending.clone()
    }

    /// Longest a single post can take before its own timeout fires.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint.timeout_seconds)
    }
}

impl ScoreSink for HttpScoreSink {
    fn submit(&mut self, submission: ScoreSubmission, token: &str) {
        let endpoint = self.endpoint.clone();
        let token = token.to_string();
        let task = async move {
            match endpoint.post(&submission, &token).await {
                Ok(_) => debug!(
                    "submitted {} points to {} leaderboard",
                    submission.score, submission.timeframe
                ),
                Err(e) => warn!(
                    "score submission to {} leaderboard failed: {}",
                    submission.timeframe, e
                ),
            }
        };
        self.pending.spawn_on(task, &self.runtime);
    }
}
