//! Session configuration and mode presets.
//!
//! A [`SessionConfig`] fully parametrizes one game: board size, symbol set,
//! power-up chance, scoring, move budget, score target, reward thresholds and
//! presentation timing. Invalid configurations are rejected before a session
//! starts.

use serde::{Deserialize, Serialize};

use crate::cascade::CascadeRules;
use crate::error::ConfigError;
use crate::grid::TileSpawner;
use crate::reward::RewardThreshold;
use crate::types::{
    Difficulty, Symbol, BOUNDED_POWER_UP_PERCENT, CASCADE_STEP_MS, CHALLENGE_MOVE_BUDGET,
    DEFAULT_GRID_SIZE, MIN_SYMBOL_COUNT, POINTS_PER_TILE, REVERT_MS, SWAP_MS,
};

/// Presentation delays. The engine ignores input while they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationTiming {
    pub swap_ms: u32,
    pub revert_ms: u32,
    pub cascade_step_ms: u32,
}

impl AnimationTiming {
    /// No delays: every input resolves to `Idle` (or game over) immediately
    pub fn instant() -> Self {
        Self {
            swap_ms: 0,
            revert_ms: 0,
            cascade_step_ms: 0,
        }
    }
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            swap_ms: SWAP_MS,
            revert_ms: REVERT_MS,
            cascade_step_ms: CASCADE_STEP_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub grid_size: usize,
    pub symbol_count: usize,
    pub power_up_percent: u8,
    pub points_per_tile: u32,
    /// Free play collects but does not score
    pub scored: bool,
    /// `None` means unlimited moves
    pub move_budget: Option<u32>,
    pub target_score: Option<u32>,
    pub rewards: Vec<RewardThreshold>,
    #[serde(default)]
    pub timing: AnimationTiming,
}

impl SessionConfig {
    /// Endless, unscored play; difficulty sets symbols and power-up chance
    pub fn free_play(difficulty: Difficulty) -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            symbol_count: difficulty.symbol_count(),
            power_up_percent: difficulty.free_play_power_up_percent(),
            points_per_tile: POINTS_PER_TILE,
            scored: false,
            move_budget: None,
            target_score: None,
            rewards: Vec::new(),
            timing: AnimationTiming::default(),
        }
    }

    /// Score attack with a fixed move budget
    pub fn challenge() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            symbol_count: Difficulty::Normal.symbol_count(),
            power_up_percent: BOUNDED_POWER_UP_PERCENT,
            points_per_tile: POINTS_PER_TILE,
            scored: true,
            move_budget: Some(CHALLENGE_MOVE_BUDGET),
            target_score: None,
            rewards: vec![
                RewardThreshold::above(200, "golden-seahorse"),
                RewardThreshold::above(500, "pearl-crown"),
            ],
            timing: AnimationTiming::default(),
        }
    }

    /// A bounded, scored level with a target (adventure levels)
    pub fn level(difficulty: Difficulty, move_budget: u32, target_score: u32) -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            symbol_count: difficulty.symbol_count(),
            power_up_percent: BOUNDED_POWER_UP_PERCENT,
            points_per_tile: POINTS_PER_TILE,
            scored: true,
            move_budget: Some(move_budget),
            target_score: Some(target_score),
            rewards: Vec::new(),
            timing: AnimationTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: AnimationTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_reward(mut self, threshold: RewardThreshold) -> Self {
        self.rewards.push(threshold);
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.move_budget.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        if self.symbol_count == 0 {
            return Err(ConfigError::EmptySymbolSet);
        }
        if self.symbol_count < MIN_SYMBOL_COUNT {
            return Err(ConfigError::TooFewSymbols {
                got: self.symbol_count,
                min: MIN_SYMBOL_COUNT,
            });
        }
        if self.symbol_count > Symbol::ALL.len() {
            return Err(ConfigError::TooManySymbols {
                got: self.symbol_count,
                max: Symbol::ALL.len(),
            });
        }
        if self.power_up_percent > 100 {
            return Err(ConfigError::PercentOutOfRange(self.power_up_percent));
        }
        if self.target_score == Some(0) {
            return Err(ConfigError::ZeroTarget);
        }
        if self.move_budget == Some(0) {
            return Err(ConfigError::ZeroMoveBudget);
        }
        Ok(())
    }

    pub fn spawner(&self) -> TileSpawner {
        TileSpawner::new(self.symbol_count, self.power_up_percent)
    }

    pub fn cascade_rules(&self) -> CascadeRules {
        CascadeRules {
            spawner: self.spawner(),
            points_per_tile: self.points_per_tile,
            scored: self.scored,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::free_play(Difficulty::Normal)
    }
}
