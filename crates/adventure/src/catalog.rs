//! Built-in reef map and JSON map files
//!
//! Map file format:
//!
//! ```json
//! {
//!   "name": "Reef",
//!   "levels": [
//!     { "id": 1, "name": "Shallows", "difficulty": "easy", "move_budget": 25,
//!       "target_score": 300, "position": { "x": 4.0, "y": 18.0 },
//!       "neighbors": [2], "reward": "shell-charm" }
//!   ]
//! }
//! ```
//!
//! Missing `locked` means unlocked, so hand-written maps should lock every
//! level except the entry point.

use serde::{Deserialize, Serialize};

use coral_match_types::Difficulty;

use crate::error::MapError;
use crate::level::{LevelNode, Position};
use crate::navigator::LevelMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapFile {
    #[serde(default)]
    name: Option<String>,
    levels: Vec<LevelNode>,
}

/// Six-level reef: a fork after the shallows that joins again at the trench.
///
/// ```text
///   Shallows -- Kelp Forest -- Sunken Ship
///                   |               |
///              Coral Garden -- Pearl Grotto -- Abyssal Trench
/// ```
pub fn default_map() -> LevelMap {
    let levels = vec![
        LevelNode::new(1, "Shallows", Position::new(4.0, 4.0))
            .with_goal(Difficulty::Easy, 25, 300)
            .with_neighbors([2])
            .with_reward("shell-charm")
            .unlocked(),
        LevelNode::new(2, "Kelp Forest", Position::new(20.0, 4.0))
            .with_goal(Difficulty::Easy, 22, 450)
            .with_neighbors([1, 3, 4]),
        LevelNode::new(3, "Sunken Ship", Position::new(36.0, 4.0))
            .with_goal(Difficulty::Normal, 20, 600)
            .with_neighbors([2, 5])
            .with_reward("brass-compass"),
        LevelNode::new(4, "Coral Garden", Position::new(20.0, 12.0))
            .with_goal(Difficulty::Normal, 20, 650)
            .with_neighbors([2, 5]),
        LevelNode::new(5, "Pearl Grotto", Position::new(36.0, 12.0))
            .with_goal(Difficulty::Hard, 18, 800)
            .with_neighbors([3, 4, 6])
            .with_reward("pearl-lantern"),
        LevelNode::new(6, "Abyssal Trench", Position::new(52.0, 12.0))
            .with_goal(Difficulty::Expert, 15, 900)
            .with_neighbors([5])
            .with_reward("trench-crown"),
    ];
    match LevelMap::new(levels) {
        Ok(map) => map,
        // The table above is fixed; a failure here is a bug in it.
        Err(err) => unreachable!("built-in map is invalid: {}", err),
    }
}

/// Load a map from JSON
pub fn from_json(json: &str) -> Result<LevelMap, MapError> {
    let file: MapFile = serde_json::from_str(json)?;
    if let Some(name) = &file.name {
        log::debug!("loading map {:?} with {} levels", name, file.levels.len());
    }
    LevelMap::new(file.levels)
}

/// Serialize a map, progress included
pub fn to_json(map: &LevelMap) -> Result<String, MapError> {
    let file = MapFile {
        name: None,
        levels: map.nodes().to_vec(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}
