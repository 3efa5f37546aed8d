//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data (with serde derives so the shell can dump them),
//! usable from the engine, the adventure map and the terminal shell alike.
//!
//! # Grid
//!
//! - **Size**: 8x8 by default (`DEFAULT_GRID_SIZE`), square, row 0 at the top
//! - **Runs**: 3 or more mutually matching tiles in a row or column (`MIN_RUN_LENGTH`)
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_GRID_SIZE` | 8 | Side length of the board |
//! | `MIN_RUN_LENGTH` | 3 | Shortest run that clears |
//! | `POINTS_PER_TILE` | 10 | Score per cleared cell in scored modes |
//! | `BOUNDED_POWER_UP_PERCENT` | 10 | Power-up chance in challenge/adventure |
//! | `CHALLENGE_MOVE_BUDGET` | 30 | Moves available in challenge mode |
//!
//! # Presentation Timing
//!
//! Timing values are in milliseconds and only pace the shell; the engine
//! resolves every cascade synchronously.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SWAP_MS` | 150 | Swap animation |
//! | `REVERT_MS` | 300 | Delay before a non-matching swap is undone |
//! | `CASCADE_STEP_MS` | 220 | Pause between cascade passes |
//!
//! # Difficulty
//!
//! | Difficulty | Symbols | Free-play power-up % |
//! |------------|---------|----------------------|
//! | Easy | 4 | 15 |
//! | Normal | 5 | 10 |
//! | Hard | 6 | 6 |
//! | Expert | 7 | 3 |
//!
//! # Examples
//!
//! ```
//! use coral_match_types::{Coord, Difficulty, Symbol, Tile};
//!
//! let a = Tile::Ordinary(Symbol::Coral);
//! let bomb = Tile::AreaClear(Symbol::Coral);
//! assert!(a.matches(&bomb));
//! assert!(a.matches(&Tile::Wildcard));
//! assert!(!a.matches(&Tile::Ordinary(Symbol::Kelp)));
//!
//! assert!(Coord::new(2, 3).is_adjacent(Coord::new(2, 4)));
//! assert!(!Coord::new(2, 3).is_adjacent(Coord::new(3, 4)));
//!
//! assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
//! assert_eq!(Difficulty::Hard.symbol_count(), 6);
//! ```

use serde::{Deserialize, Serialize};

/// Default board side length (8x8)
pub const DEFAULT_GRID_SIZE: usize = 8;

/// Shortest run of matching tiles that clears
pub const MIN_RUN_LENGTH: usize = 3;

/// Smallest symbol set a session accepts (anything smaller cannot settle)
pub const MIN_SYMBOL_COUNT: usize = 3;

/// Points per cleared cell in scored modes
pub const POINTS_PER_TILE: u32 = 10;

/// Power-up chance (percent) for every refill in bounded modes
pub const BOUNDED_POWER_UP_PERCENT: u8 = 10;

/// Moves available in challenge mode
pub const CHALLENGE_MOVE_BUDGET: u32 = 30;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Swap animation duration
pub const SWAP_MS: u32 = 150;

/// Delay before a non-matching swap is rolled back
pub const REVERT_MS: u32 = 300;

/// Pause between two cascade passes
pub const CASCADE_STEP_MS: u32 = 220;

/// Upper bound on cascade passes within one resolution
pub const MAX_CASCADE_PASSES: usize = 256;

/// Attempts at regenerating a board that has no valid move
pub const MAX_RESHUFFLE_ATTEMPTS: usize = 32;

/// The eight sea-creature symbols.
///
/// A session plays with the first `n` of [`Symbol::ALL`], where `n` comes from
/// the difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Coral,
    Shell,
    Starfish,
    Pearl,
    Kelp,
    Urchin,
    Anemone,
    Seahorse,
}

impl Symbol {
    /// Every symbol, in catalogue order
    pub const ALL: [Symbol; 8] = [
        Symbol::Coral,
        Symbol::Shell,
        Symbol::Starfish,
        Symbol::Pearl,
        Symbol::Kelp,
        Symbol::Urchin,
        Symbol::Anemone,
        Symbol::Seahorse,
    ];

    /// Symbol at catalogue position `index`
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Coral => "coral",
            Symbol::Shell => "shell",
            Symbol::Starfish => "starfish",
            Symbol::Pearl => "pearl",
            Symbol::Kelp => "kelp",
            Symbol::Urchin => "urchin",
            Symbol::Anemone => "anemone",
            Symbol::Seahorse => "seahorse",
        }
    }
}

/// A tile on the board.
///
/// - **Ordinary**: a plain symbol
/// - **Wildcard**: matches anything
/// - **RowClear**: matches like its symbol; clearing it also clears its row and column
/// - **AreaClear**: matches like its symbol; clearing it also clears the 3x3 block around it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    Ordinary(Symbol),
    Wildcard,
    RowClear(Symbol),
    AreaClear(Symbol),
}

impl Tile {
    /// The symbol this tile matches as, `None` for wildcards
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            Tile::Ordinary(s) | Tile::RowClear(s) | Tile::AreaClear(s) => Some(*s),
            Tile::Wildcard => None,
        }
    }

    /// Wildcard-aware matching predicate
    pub fn matches(&self, other: &Tile) -> bool {
        match (self.symbol(), other.symbol()) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// Tiles with a side effect (row/column clear, area clear, wildcard)
    pub fn is_power_up(&self) -> bool {
        !matches!(self, Tile::Ordinary(_))
    }
}

/// A board cell.
///
/// - `None`: empty (only while a cascade pass is clearing)
/// - `Some(Tile)`: occupied
pub type Cell = Option<Tile>;

/// Board coordinate, row 0 at the top. Defaults to the top-left cell.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 4-neighbourhood adjacency (no diagonals)
    pub fn is_adjacent(&self, other: Coord) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// Step one cell in `dir`, `None` when it would leave a `size`x`size` board
    pub fn step(&self, dir: Direction, size: usize) -> Option<Coord> {
        let (dr, dc) = dir.offset();
        let row = self.row.checked_add_signed(dr as isize)?;
        let col = self.col.checked_add_signed(dc as isize)?;
        (row < size && col < size).then_some(Coord { row, col })
    }
}

/// Input direction, shared by the board cursor and the adventure map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row delta, col delta)
    pub fn offset(&self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Unit vector in screen space (y grows downward)
    pub fn unit(&self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

/// Difficulty: drives symbol-set size and the free-play power-up chance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    /// Size of the active symbol set
    pub fn symbol_count(&self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Normal => 5,
            Difficulty::Hard => 6,
            Difficulty::Expert => 7,
        }
    }

    /// Power-up chance for free play; falls as difficulty rises
    pub fn free_play_power_up_percent(&self) -> u8 {
        match self {
            Difficulty::Easy => 15,
            Difficulty::Normal => 10,
            Difficulty::Hard => 6,
            Difficulty::Expert => 3,
        }
    }
}

/// Game mode chosen by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Endless, unscored; only the collection grows
    FreePlay(Difficulty),
    /// Scored with a move budget
    Challenge,
    /// Level picked on the adventure map
    Adventure,
}

impl GameMode {
    /// Parse from string (case-insensitive); free play takes the given difficulty
    pub fn from_str(s: &str, difficulty: Difficulty) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "free" | "freeplay" | "free_play" => Some(GameMode::FreePlay(difficulty)),
            "challenge" => Some(GameMode::Challenge),
            "adventure" => Some(GameMode::Adventure),
            _ => None,
        }
    }
}

/// Terminal state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Score reached the target
    Won,
    /// Move budget exhausted without reaching a target
    OutOfMoves,
    /// The player left the session
    Ended,
}

/// Engine-side event, drained by the shell after each input or tick.
///
/// The engine never plays sounds or effects itself; the shell maps these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    Selected { at: Coord },
    SelectionCleared,
    Swapped { a: Coord, b: Coord, matched: bool },
    SwapReverted { a: Coord, b: Coord },
    CascadePass { pass: u32, cleared: u32, points: u32 },
    Settled { passes: u32, cleared: u32 },
    BoardReshuffled,
    GameOver { outcome: Outcome, score: u32 },
    RewardRequested { item: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_matches_everything() {
        for s in Symbol::ALL {
            assert!(Tile::Wildcard.matches(&Tile::Ordinary(s)));
            assert!(Tile::RowClear(s).matches(&Tile::Wildcard));
        }
        assert!(Tile::Wildcard.matches(&Tile::Wildcard));
    }

    #[test]
    fn specials_match_as_their_symbol() {
        let coral = Tile::Ordinary(Symbol::Coral);
        assert!(coral.matches(&Tile::RowClear(Symbol::Coral)));
        assert!(!coral.matches(&Tile::AreaClear(Symbol::Pearl)));
    }

    #[test]
    fn coord_step_stays_in_bounds() {
        let c = Coord::new(0, 0);
        assert_eq!(c.step(Direction::Up, 8), None);
        assert_eq!(c.step(Direction::Left, 8), None);
        assert_eq!(c.step(Direction::Right, 8), Some(Coord::new(0, 1)));
        assert_eq!(Coord::new(7, 7).step(Direction::Down, 8), None);
    }

    #[test]
    fn adjacency_excludes_diagonals_and_self() {
        let c = Coord::new(3, 3);
        assert!(c.is_adjacent(Coord::new(2, 3)));
        assert!(c.is_adjacent(Coord::new(3, 2)));
        assert!(!c.is_adjacent(Coord::new(4, 4)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coord::new(3, 5)));
    }

    #[test]
    fn power_up_chance_falls_with_difficulty() {
        let chances: Vec<u8> = [
            Difficulty::Easy,
            Difficulty::Normal,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
        .iter()
        .map(|d| d.free_play_power_up_percent())
        .collect();
        assert!(chances.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn symbol_index_roundtrip() {
        for (i, s) in Symbol::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
            assert_eq!(Symbol::from_index(i), Some(*s));
        }
        assert_eq!(Symbol::from_index(8), None);
    }

    #[test]
    fn game_mode_parsing() {
        assert_eq!(
            GameMode::from_str("Free", Difficulty::Hard),
            Some(GameMode::FreePlay(Difficulty::Hard))
        );
        assert_eq!(
            GameMode::from_str("challenge", Difficulty::Easy),
            Some(GameMode::Challenge)
        );
        assert_eq!(GameMode::from_str("maze", Difficulty::Easy), None);
    }
}
