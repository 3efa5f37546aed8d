//! Scoring module - points and the collected-tile tally
//!
//! Rules:
//! - Every cleared cell is worth `points_per_tile`, including cells cleared by
//!   a power-up's zone.
//! - Points are only credited in scored modes (challenge, adventure); free play
//!   only grows the collection.
//! - Every cleared tile that carries a symbol (ordinary or power-up) adds one to
//!   that symbol's tally. Wildcards carry no symbol and are not collected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Symbol, Tile};

/// Points for one pass
pub fn pass_points(cleared_cells: usize, points_per_tile: u32, scored: bool) -> u32 {
    if !scored {
        return 0;
    }
    (cleared_cells as u32).saturating_mul(points_per_tile)
}

/// Count of collected tiles per symbol; only ever grows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedTally(BTreeMap<Symbol, u32>);

impl CollectedTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one cleared tile, returns whether it was collectable
    pub fn collect(&mut self, tile: Tile) -> bool {
        match tile.symbol() {
            Some(symbol) => {
                self.add(symbol, 1);
                true
            }
            None => false,
        }
    }

    pub fn add(&mut self, symbol: Symbol, count: u32) {
        if count == 0 {
            return;
        }
        let entry = self.0.entry(symbol).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn merge(&mut self, other: &CollectedTally) {
        for (symbol, count) in other.iter() {
            self.add(symbol, count);
        }
    }

    pub fn get(&self, symbol: Symbol) -> u32 {
        self.0.get(&symbol).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u32)> + '_ {
        self.0.iter().map(|(s, c)| (*s, *c))
    }
}
