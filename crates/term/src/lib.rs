//! Terminal rendering for the board and the adventure map.
//!
//! Views draw into a [`Canvas`] of styled glyphs; the [`TerminalRenderer`]
//! diffs canvases between frames and writes only what changed. No widget
//! toolkit is involved.
//!
//! - [`canvas`]: glyph grid, colours, text and box helpers
//! - [`board_view`]: a match session snapshot with cursor and side panel
//! - [`map_view`]: the adventure level map with the focused level's details
//! - [`renderer`]: crossterm output, raw mode and alternate screen

pub mod board_view;
pub mod canvas;
pub mod map_view;
pub mod renderer;

pub use coral_match_adventure as adventure;
pub use coral_match_core as core;
pub use coral_match_types as types;

pub use board_view::{BoardHud, BoardView, Viewport};
pub use canvas::{Canvas, Glyph, GlyphStyle, Rgb};
pub use map_view::MapView;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
