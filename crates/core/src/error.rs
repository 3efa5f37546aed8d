//! Error types for the match engine.
//!
//! Only construction and out-of-bounds input are errors. Input that arrives
//! while the board is animating or after game over is ignored, see
//! [`crate::session::SelectOutcome::Ignored`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A coordinate outside the board; nothing was changed.
    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    InvalidCoordinate { row: usize, col: usize, size: usize },
    /// The session could not be started.
    #[error("invalid session configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid size must be at least 1")]
    ZeroGridSize,
    #[error("symbol set is empty")]
    EmptySymbolSet,
    #[error("symbol set has {got} symbols, at least {min} are needed for the board to settle")]
    TooFewSymbols { got: usize, min: usize },
    #[error("symbol set has {got} symbols, only {max} exist")]
    TooManySymbols { got: usize, max: usize },
    #[error("target score must be greater than 0")]
    ZeroTarget,
    #[error("move budget must be greater than 0")]
    ZeroMoveBudget,
    #[error("power-up chance {0}% is above 100%")]
    PercentOutOfRange(u8),
    #[error("grid rows must form a non-empty square ({0})")]
    MalformedGrid(String),
}

/// Returned by a [`crate::reward::RewardSink`] that could not record a grant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("reward `{item}` for player `{player}` was not granted: {reason}")]
pub struct RewardError {
    pub player: String,
    pub item: String,
    pub reason: String,
}
