//! Terminal input module.
//!
//! Maps `crossterm` key and mouse events into [`ShellAction`]s. The same actions drive
//! both screens: arrows move the board cursor or the map focus, confirm
//! selects a cell or enters a level.

pub mod map;

pub use coral_match_types as types;

pub use map::{handle_key_event, handle_mouse_event, should_quit, ShellAction};
