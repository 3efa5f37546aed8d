//! Level map navigation
//!
//! The map is a list of [`LevelNode`]s joined by neighbour ids. One node at a
//! time holds the focus. Arrow input moves the focus along an edge toward the
//! neighbour that best lines up with the requested direction:
//!
//! 1. only neighbours of the focused node are candidates
//! 2. a candidate must lie strictly on the requested side (`Up` needs a
//!    smaller y, `Right` a larger x, ...)
//! 3. the candidate with the largest dot product between the direction and
//!    the offset to it wins; ties keep the earlier neighbour
//!
//! Locked levels can hold the focus but cannot be entered.

use std::collections::HashMap;

use coral_match_types::Direction;

use crate::error::MapError;
use crate::level::LevelNode;

/// Result of selecting a level
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Entered(LevelNode),
    Locked,
}

#[derive(Debug, Clone)]
pub struct LevelMap {
    nodes: Vec<LevelNode>,
    /// id -> index into `nodes`
    index: HashMap<u32, usize>,
    focused: Option<usize>,
}

impl LevelMap {
    /// Validate and index a set of levels. The focus starts on the first
    /// unlocked level.
    pub fn new(nodes: Vec<LevelNode>) -> Result<Self, MapError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id, i).is_some() {
                return Err(MapError::DuplicateId(node.id));
            }
        }

        for node in &nodes {
            if !node.position.x.is_finite() || !node.position.y.is_finite() {
                return Err(MapError::NonFinitePosition(node.id));
            }
            node.session_config()
                .validate()
                .map_err(|source| MapError::InvalidLevel {
                    id: node.id,
                    source,
                })?;
            for &neighbor in &node.neighbors {
                let Some(&other) = index.get(&neighbor) else {
                    return Err(MapError::UnknownNeighbor {
                        node: node.id,
                        neighbor,
                    });
                };
                if !nodes[other].neighbors.contains(&node.id) {
                    log::warn!(
                        "level {} links to {} but not the other way round",
                        node.id,
                        neighbor
                    );
                }
            }
        }

        let focused = nodes.iter().position(|n| !n.locked);
        Ok(Self {
            nodes,
            index,
            focused,
        })
    }

    pub fn nodes(&self) -> &[LevelNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_node(&self) -> Option<&LevelNode> {
        self.focused.and_then(|i| self.nodes.get(i))
    }

    pub fn node_by_id(&self, id: u32) -> Option<&LevelNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Move the focus along an edge. Returns false (and keeps the focus)
    /// when no neighbour lies in that direction.
    pub fn move_focus(&mut self, direction: Direction) -> bool {
        let Some(from) = self.focused else {
            return false;
        };
        match self.best_neighbor(from, direction) {
            Some(to) => {
                self.focused = Some(to);
                true
            }
            None => false,
        }
    }

    fn best_neighbor(&self, from: usize, direction: Direction) -> Option<usize> {
        let origin = self.nodes[from].position;
        let (ux, uy) = direction.unit();

        let mut best: Option<(usize, f32)> = None;
        for id in &self.nodes[from].neighbors {
            let Some(candidate) = self.index_of(*id) else {
                continue;
            };
            let (dx, dy) = origin.delta(self.nodes[candidate].position);
            let on_side = match direction {
                Direction::Up => dy < 0.0,
                Direction::Down => dy > 0.0,
                Direction::Left => dx < 0.0,
                Direction::Right => dx > 0.0,
            };
            if !on_side {
                continue;
            }
            let score = ux * dx + uy * dy;
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Focus a level and enter it if unlocked
    pub fn select(&mut self, index: usize) -> Result<Selection, MapError> {
        let node = self.nodes.get(index).ok_or(MapError::UnknownIndex(index))?;
        self.focused = Some(index);
        if node.locked {
            Ok(Selection::Locked)
        } else {
            Ok(Selection::Entered(node.clone()))
        }
    }

    /// Enter the focused level, if any
    pub fn select_focused(&mut self) -> Option<Result<Selection, MapError>> {
        self.focused.map(|i| self.select(i))
    }

    /// Record a won level and unlock its neighbours. Returns the ids that
    /// were newly unlocked.
    pub fn complete_level(&mut self, id: u32, score: u32) -> Result<Vec<u32>, MapError> {
        let at = self.index_of(id).ok_or(MapError::UnknownId(id))?;
        let node = &mut self.nodes[at];
        node.completed = true;
        node.best_score = Some(node.best_score.map_or(score, |best| best.max(score)));
        let neighbors = node.neighbors.clone();

        let mut unlocked = Vec::new();
        for neighbor in neighbors {
            if let Some(i) = self.index_of(neighbor) {
                if self.nodes[i].locked {
                    self.nodes[i].locked = false;
                    unlocked.push(neighbor);
                }
            }
        }
        log::info!(
            "level {} completed with {}, unlocked {:?}",
            id,
            score,
            unlocked
        );
        Ok(unlocked)
    }

    pub fn completed_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.completed).count()
    }
}
