//! Adventure mode - the level map and how the player moves across it
//!
//! Levels sit at 2-D positions and link to their neighbours. The focus moves
//! along links with the arrow keys, a locked level can be looked at but not
//! entered, and winning a level unlocks every level linked to it.
//!
//! # Example
//!
//! ```
//! use coral_match_adventure::{catalog, Selection};
//! use coral_match_types::Direction;
//!
//! let mut map = catalog::default_map();
//! map.move_focus(Direction::Right);
//! assert_eq!(map.select_focused().unwrap().unwrap(), Selection::Locked);
//!
//! map.complete_level(1, 400).unwrap();
//! assert!(matches!(map.select_focused().unwrap().unwrap(), Selection::Entered(_)));
//! ```

pub mod catalog;
pub mod error;
pub mod level;
pub mod navigator;

pub use error::MapError;
pub use level::{LevelNode, Position};
pub use navigator::{LevelMap, Selection};
