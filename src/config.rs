//! Shell configuration from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `CORAL_MODE` | `adventure` | `free`, `challenge` or `adventure` |
//! | `CORAL_DIFFICULTY` | `normal` | free-play difficulty |
//! | `CORAL_SEED` | clock | board seed |
//! | `CORAL_PLAYER` | `player` | id sent with reward grants |
//! | `CORAL_MAP_PATH` | built-in reef | JSON adventure map |
//! | `CORAL_LOG_PATH` | none | log file; logging is off without it |
//! | `CORAL_LOG_LEVEL` | `info` | `error` .. `trace` |
//!
//! Unparseable values fall back to the default.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use log::LevelFilter;

use crate::core::PlayerId;
use crate::types::{Difficulty, GameMode};

#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub seed: u32,
    pub player: PlayerId,
    pub map_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Adventure,
            difficulty: Difficulty::Normal,
            seed: 1,
            player: PlayerId::new("player"),
            map_path: None,
            log_path: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl ShellConfig {
    pub fn from_env() -> Self {
        use std::env;

        let mut config = Self::from_lookup(|key| env::var(key).ok());
        if env::var("CORAL_SEED").ok().and_then(|s| s.parse::<u32>().ok()).is_none() {
            config.seed = clock_seed();
        }
        config
    }

    /// Build from any key lookup; a missing seed stays at the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };

        let difficulty = get("CORAL_DIFFICULTY")
            .and_then(|s| Difficulty::from_str(&s))
            .unwrap_or(defaults.difficulty);

        let mode = get("CORAL_MODE")
            .and_then(|s| GameMode::from_str(&s, difficulty))
            .unwrap_or(defaults.mode);

        let seed = get("CORAL_SEED")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.seed);

        let player = get("CORAL_PLAYER")
            .map(PlayerId::new)
            .unwrap_or(defaults.player);

        let log_level = get("CORAL_LOG_LEVEL")
            .and_then(|s| LevelFilter::from_str(&s).ok())
            .unwrap_or(defaults.log_level);

        Self {
            mode,
            difficulty,
            seed,
            player,
            map_path: get("CORAL_MAP_PATH").map(PathBuf::from),
            log_path: get("CORAL_LOG_PATH").map(PathBuf::from),
            log_level,
        }
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32 ^ d.subsec_nanos())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ShellConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn test_free_play_takes_difficulty() {
        let config = ShellConfig::from_lookup(lookup(&[
            ("CORAL_MODE", "free"),
            ("CORAL_DIFFICULTY", "Expert"),
            ("CORAL_SEED", "99"),
            ("CORAL_PLAYER", " diver-7 "),
        ]));
        assert_eq!(config.mode, GameMode::FreePlay(Difficulty::Expert));
        assert_eq!(config.seed, 99);
        assert_eq!(config.player, PlayerId::new("diver-7"));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = ShellConfig::from_lookup(lookup(&[
            ("CORAL_MODE", "arcade"),
            ("CORAL_SEED", "-4"),
            ("CORAL_LOG_LEVEL", "loud"),
            ("CORAL_LOG_PATH", "   "),
        ]));
        assert_eq!(config.mode, GameMode::Adventure);
        assert_eq!(config.seed, 1);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.log_path, None);
    }

    #[test]
    fn test_paths_and_level() {
        let config = ShellConfig::from_lookup(lookup(&[
            ("CORAL_MAP_PATH", "maps/reef.json"),
            ("CORAL_LOG_PATH", "coral.log"),
            ("CORAL_LOG_LEVEL", "debug"),
        ]));
        assert_eq!(config.map_path, Some(PathBuf::from("maps/reef.json")));
        assert_eq!(config.log_path, Some(PathBuf::from("coral.log")));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }
}
