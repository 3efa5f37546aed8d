use thiserror::Error;

use coral_match_core::ConfigError;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("level id {0} appears more than once")]
    DuplicateId(u32),
    #[error("level {node} lists unknown neighbour {neighbor}")]
    UnknownNeighbor { node: u32, neighbor: u32 },
    #[error("no level at index {0}")]
    UnknownIndex(usize),
    #[error("no level with id {0}")]
    UnknownId(u32),
    #[error("level {id} is not playable: {source}")]
    InvalidLevel {
        id: u32,
        #[source]
        source: ConfigError,
    },
    #[error("level position for {0} is not a finite number")]
    NonFinitePosition(u32),
    #[error("malformed map file: {0}")]
    Parse(#[from] serde_json::Error),
}
