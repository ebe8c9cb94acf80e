use thiserror::Error;

/// Errors surfaced by the round engine and the game coordinator.
///
/// None of these are fatal: the engine keeps its previous state whenever one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The selected mode or category has no puzzles to draw from.
    #[error("no puzzles available for {0}")]
    EmptyPuzzlePool(String),

    /// Category mode was requested with a name the puzzle source does not know.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// An operation that needs a loaded puzzle was called before any round started.
    #[error("no round has been started")]
    NoActiveRound,
}

/// Errors raised by profile snapshot persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Wrapper around IO errors (directory creation, lock, rename).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around JSON encode/decode failures.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error (poisoned lock, unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors raised while loading or validating a puzzle catalog.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A puzzle record violates the word/image/difficulty rules.
    #[error("invalid puzzle {id}: {reason}")]
    InvalidPuzzle { id: String, reason: String },

    #[error("duplicate puzzle id: {0}")]
    DuplicateId(String),

    #[error("duplicate category id: {0}")]
    DuplicateCategory(String),
}

/// Errors raised by the HTTP leaderboard client.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// Score submission requires an identified player.
    #[error("user must be signed in to submit scores")]
    NotAuthenticated,

    #[error("request timeout after {0}s")]
    Timeout(u64),

    #[error("leaderboard returned status: {0}")]
    Status(u16),

    #[cfg(feature = "leaderboard-http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
