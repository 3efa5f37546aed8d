//! Coral Match (workspace facade crate).
//!
//! Re-exports the workspace crates under short names so the binary, the
//! integration tests and the benches share one import path:
//! `coral_match::{core, adventure, input, term, types}`.

pub mod config;

pub use coral_match_adventure as adventure;
pub use coral_match_core as core;
pub use coral_match_input as input;
pub use coral_match_term as term;
pub use coral_match_types as types;
