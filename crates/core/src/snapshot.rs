use serde::{Deserialize, Serialize};

use crate::scoring::CollectedTally;
use crate::session::Phase;
use crate::types::{Cell, Coord, Outcome};

/// Owned copy of everything a renderer or observer needs from a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub size: usize,
    /// Row-major, `size * size` cells
    pub cells: Vec<Cell>,
    pub phase: Phase,
    pub selected: Option<Coord>,
    pub score: u32,
    pub scored: bool,
    pub moves_remaining: Option<u32>,
    pub moves_made: u32,
    pub target_score: Option<u32>,
    pub combo: u32,
    pub collected: CollectedTally,
    pub outcome: Option<Outcome>,
    pub episode_id: u32,
}

impl MatchSnapshot {
    pub fn cell(&self, at: Coord) -> Cell {
        if at.row >= self.size || at.col >= self.size {
            return None;
        }
        self.cells.get(at.row * self.size + at.col).copied().flatten()
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.size;
        self.cells.get(start..start + self.size).unwrap_or(&[])
    }

    pub fn playable(&self) -> bool {
        self.outcome.is_none() && self.phase.accepts_input()
    }

    pub fn game_over(&self) -> bool {
        self.outcome.is_some()
    }
}

impl Default for MatchSnapshot {
    fn default() -> Self {
        Self {
            size: 0,
            cells: Vec::new(),
            phase: Phase::Idle,
            selected: None,
            score: 0,
            scored: false,
            moves_remaining: None,
            moves_made: 0,
            target_score: None,
            combo: 0,
            collected: CollectedTally::new(),
            outcome: None,
            episode_id: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Symbol, Tile};

    #[test]
    fn test_cell_lookup_is_bounds_checked() {
        let mut snap = MatchSnapshot::default();
        snap.size = 2;
        snap.cells = vec![
            Some(Tile::Ordinary(Symbol::Coral)),
            None,
            Some(Tile::Wildcard),
            Some(Tile::RowClear(Symbol::Kelp)),
        ];
        assert_eq!(snap.cell(Coord::new(1, 0)), Some(Tile::Wildcard));
        assert_eq!(snap.cell(Coord::new(0, 1)), None);
        assert_eq!(snap.cell(Coord::new(0, 2)), None);
        assert_eq!(snap.row(1).len(), 2);
        assert!(snap.row(2).is_empty());
    }

    #[test]
    fn test_snapshot_serializes_phase_tag() {
        let mut snap = MatchSnapshot::default();
        snap.phase = Phase::GameOver {
            outcome: Outcome::Won,
        };
        snap.outcome = Some(Outcome::Won);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"phase\":\"game_over\""));
        let back: MatchSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
        assert!(back.game_over());
        assert!(!back.playable());
    }
}
