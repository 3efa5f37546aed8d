use serde::{Deserialize, Serialize};

use coral_match_core::{RewardThreshold, SessionConfig};
use coral_match_types::Difficulty;

/// Map position, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn delta(&self, to: Position) -> (f32, f32) {
        (to.x - self.x, to.y - self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelNode {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub move_budget: u32,
    pub target_score: u32,
    pub position: Position,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub locked: bool,
    /// Neighbour ids, in the order ties are broken
    #[serde(default)]
    pub neighbors: Vec<u32>,
    /// Item granted when the level is won
    #[serde(default)]
    pub reward: Option<String>,
    #[serde(default)]
    pub best_score: Option<u32>,
}

impl LevelNode {
    pub fn new(id: u32, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            difficulty: Difficulty::Normal,
            move_budget: 20,
            target_score: 500,
            position,
            completed: false,
            locked: true,
            neighbors: Vec::new(),
            reward: None,
            best_score: None,
        }
    }

    pub fn with_goal(mut self, difficulty: Difficulty, move_budget: u32, target_score: u32) -> Self {
        self.difficulty = difficulty;
        self.move_budget = move_budget;
        self.target_score = target_score;
        self
    }

    pub fn with_neighbors(mut self, neighbors: impl Into<Vec<u32>>) -> Self {
        self.neighbors = neighbors.into();
        self
    }

    pub fn with_reward(mut self, item: impl Into<String>) -> Self {
        self.reward = Some(item.into());
        self
    }

    pub fn unlocked(mut self) -> Self {
        self.locked = false;
        self
    }

    /// Engine parameters for playing this level
    pub fn session_config(&self) -> SessionConfig {
        let config = SessionConfig::level(self.difficulty, self.move_budget, self.target_score);
        match &self.reward {
            Some(item) => config.with_reward(RewardThreshold::on_win(item.clone())),
            None => config,
        }
    }
}
