//! # Configuration Management Module
//!
//! Centralized, type-safe configuration for picword with TOML persistence and
//! sensible defaults for every value.
//!
//! ## Configuration Structure
//!
//! - [`GameConfig`] - Round rules: hint budget, scoring, timer, letter bank size
//! - [`StorageConfig`] - Where profile snapshots are written
//! - [`PuzzlesConfig`] - Optional external puzzle catalog
//! - [`LoggingConfig`] - Logging level and optional log file
//! - [`LeaderboardConfig`] - Remote leaderboard endpoint and cache lifetimes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use picword::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("picword.toml").await?;
//!     println!("Hints per puzzle: {}", config.game.hints_allowed);
//!
//!     Config::create_default("picword.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [game]
//! hints_allowed = 3
//! base_points_per_puzzle = 100
//! time_penalty = 5
//! hint_penalty = 20
//! timer_enabled = true
//! extra_letters = 6
//!
//! [storage]
//! data_dir = "./data"
//! ```
//!
//! Every section is optional; missing sections and keys fall back to defaults.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Round rules shared by the engine and the scoring function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Hints available per puzzle.
    pub hints_allowed: u32,
    /// Points for solving a puzzle before any deduction.
    pub base_points_per_puzzle: u32,
    /// Points deducted per elapsed second (capped so at least 10 remain).
    pub time_penalty: u32,
    /// Points deducted per hint used.
    pub hint_penalty: u32,
    /// When false, elapsed time does not affect the score.
    pub timer_enabled: bool,
    /// Random filler letters added to the bank on top of the answer's letters.
    pub extra_letters: usize,
    /// Period of the round clock ticker in milliseconds.
    pub tick_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hints_allowed: 3,
            base_points_per_puzzle: 100,
            time_penalty: 5,
            hint_penalty: 20,
            timer_enabled: true,
            extra_letters: 6,
            tick_interval_ms: 1000,
        }
    }
}

impl GameConfig {
    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.base_points_per_puzzle == 0 {
            return Err(anyhow!("game.base_points_per_puzzle must be greater than 0"));
        }
        if self.extra_letters > 26 {
            return Err(anyhow!(
                "game.extra_letters must be at most 26 (got {})",
                self.extra_letters
            ));
        }
        if self.tick_interval_ms < 50 {
            return Err(anyhow!(
                "game.tick_interval_ms must be >= 50 (got {})",
                self.tick_interval_ms
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PuzzlesConfig {
    /// JSON catalog to use instead of the built-in puzzles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("picword.log".to_string()),
        }
    }
}

/// Remote leaderboard settings. Submissions are only logged when disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub enabled: bool,
    /// Base URL of the leaderboard API, e.g. `https://picword.example.org`.
    pub api_base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    pub daily_cache_minutes: u64,
    pub weekly_cache_minutes: u64,
    pub all_time_cache_minutes: u64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            enabled: false, // Disabled until an API endpoint is provided
            api_base_url: String::new(),
            timeout_seconds: 5,
            daily_cache_minutes: 5,
            weekly_cache_minutes: 30,
            all_time_cache_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub puzzles: PuzzlesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.game.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_defaults_match_classic_rules() {
        let game = GameConfig::default();
        assert_eq!(game.hints_allowed, 3);
        assert_eq!(game.base_points_per_puzzle, 100);
        assert_eq!(game.time_penalty, 5);
        assert_eq!(game.hint_penalty, 20);
        assert!(game.timer_enabled);
        assert_eq!(game.extra_letters, 6);
        assert!(game.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [game]
            hints_allowed = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.game.hints_allowed, 5);
        assert_eq!(config.game.base_points_per_puzzle, 100);
        assert_eq!(config.storage.data_dir, "./data");
        assert!(!config.leaderboard.enabled);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut game = GameConfig::default();
        game.extra_letters = 27;
        assert!(game.validate().is_err());

        let mut game = GameConfig::default();
        game.base_points_per_puzzle = 0;
        assert!(game.validate().is_err());

        let mut game = GameConfig::default();
        game.tick_interval_ms = 10;
        assert!(game.validate().is_err());
    }

    #[tokio::test]
    async fn test_create_default_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("picword.toml");
        let path = path.to_str().unwrap();
        Config::create_default(path).await.unwrap();
        let loaded = Config::load(path).await.unwrap();
        assert_eq!(loaded.game, GameConfig::default());
        assert_eq!(loaded.logging.level, "info");
    }

    #[tokio::test]
    async fn test_load_missing_file_reports_path() {
        let err = Config::load("/nonexistent/picword.toml").await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/picword.toml"));
    }
}
