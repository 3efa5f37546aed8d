//! Match engine - pure, deterministic, and testable
//!
//! Everything that decides what happens on the board lives here. The crate
//! has no terminal, clock or file access; randomness is injected through
//! [`RandomSource`], so the same seed always replays the same game.
//!
//! # Module Structure
//!
//! - [`rng`]: injectable random source, the seedable LCG and a scripted source for tests
//! - [`grid`]: N x N board, tile spawning, compaction and refill
//! - [`matcher`]: wildcard-aware run detection, power-up zones, hints
//! - [`cascade`]: clear / compact / refill passes until the board settles
//! - [`scoring`]: points per pass and the collected-tile tally
//! - [`config`]: session parameters and the free play / challenge presets
//! - [`reward`]: reward thresholds and the sink they are granted to
//! - [`session`]: the selection and swap state machine
//! - [`snapshot`]: owned view of a session for renderers
//! - [`error`]: engine and configuration errors
//!
//! # Game Rules
//!
//! | Rule | Value |
//! |------|-------|
//! | Minimum run | 3 in a row or column |
//! | Wildcard | matches any tile |
//! | Row clear | also clears its whole row and column |
//! | Area clear | also clears the 3x3 block around it |
//! | Points | 10 per cleared cell (scored modes only) |
//! | Power-ups | free play 15/10/6/3 % by difficulty, bounded modes 10 % |
//!
//! Power-ups only fire when the run scan itself catches them. A power-up that
//! is swept up by another power-up's zone is cleared without firing.
//!
//! # Example
//!
//! ```
//! use coral_match_core::{MatchSession, SessionConfig, AnimationTiming};
//!
//! let config = SessionConfig::challenge().with_timing(AnimationTiming::instant());
//! let mut session = MatchSession::seeded(config, 12345).unwrap();
//!
//! let (a, b) = session.hint().expect("fresh boards always have a move");
//! session.select_cell(a).unwrap();
//! session.select_cell(b).unwrap();
//!
//! assert!(session.score() > 0);
//! assert_eq!(session.moves_remaining(), Some(29));
//! ```
//!
//! # Timing
//!
//! Call [`MatchSession::tick`] every frame with elapsed milliseconds. Only the
//! swap, revert and cascade presentation delays depend on it; the board
//! itself is always resolved by the time `select_cell` returns.

pub mod cascade;
pub mod config;
pub mod error;
pub mod grid;
pub mod matcher;
pub mod reward;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use coral_match_types as types;

// Re-export commonly used types for convenience
pub use config::{AnimationTiming, SessionConfig};
pub use error::{ConfigError, EngineError, RewardError};
pub use grid::{Grid, TileSpawner};
pub use reward::{NoRewards, PlayerId, RewardLedger, RewardRequest, RewardSink, RewardThreshold};
pub use rng::{RandomSource, SimpleRng};
#[cfg(any(test, feature = "test-util"))]
pub use rng::ScriptedRng;
pub use scoring::CollectedTally;
pub use session::{MatchSession, Phase, SelectOutcome};
pub use snapshot::MatchSnapshot;
