//! Reward requests emitted at the end of a session.
//!
//! The engine does not own item persistence. When a session reaches a
//! terminal state it checks its thresholds and hands every crossed one to a
//! [`RewardSink`]. Failures are logged and otherwise ignored.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::RewardError;
use crate::types::Outcome;

/// Opaque player identifier supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Grant `item` when the final score is strictly above `min_score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardThreshold {
    pub min_score: u32,
    pub item: String,
    /// Only grant when the session was won
    #[serde(default)]
    pub requires_win: bool,
}

impl RewardThreshold {
    pub fn above(min_score: u32, item: impl Into<String>) -> Self {
        Self {
            min_score,
            item: item.into(),
            requires_win: false,
        }
    }

    /// Granted on any win, regardless of score
    pub fn on_win(item: impl Into<String>) -> Self {
        Self {
            min_score: 0,
            item: item.into(),
            requires_win: true,
        }
    }

    pub fn is_met(&self, score: u32, outcome: Outcome) -> bool {
        if self.requires_win && outcome != Outcome::Won {
            return false;
        }
        if self.requires_win && self.min_score == 0 {
            return true;
        }
        score > self.min_score
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRequest {
    pub player: PlayerId,
    pub item: String,
    pub score: u32,
}

/// Receives reward grants
pub trait RewardSink {
    fn grant(&mut self, request: &RewardRequest) -> Result<(), RewardError>;
}

/// Discards every grant
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRewards;

impl RewardSink for NoRewards {
    fn grant(&mut self, _request: &RewardRequest) -> Result<(), RewardError> {
        Ok(())
    }
}

/// Keeps granted requests in memory
#[derive(Debug, Clone, Default)]
pub struct RewardLedger {
    granted: Vec<RewardRequest>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn granted(&self) -> &[RewardRequest] {
        &self.granted
    }

    pub fn owns(&self, player: &PlayerId, item: &str) -> bool {
        self.granted
            .iter()
            .any(|r| &r.player == player && r.item == item)
    }
}

impl RewardSink for RewardLedger {
    fn grant(&mut self, request: &RewardRequest) -> Result<(), RewardError> {
        self.granted.push(request.clone());
        Ok(())
    }
}

/// Shared sink, so the caller can read it back while a session holds it
impl<S: RewardSink> RewardSink for Rc<RefCell<S>> {
    fn grant(&mut self, request: &RewardRequest) -> Result<(), RewardError> {
        self.borrow_mut().grant(request)
    }
}

/// Thresholds crossed by a final score
pub fn crossed<'a>(
    thresholds: &'a [RewardThreshold],
    score: u32,
    outcome: Outcome,
) -> impl Iterator<Item = &'a RewardThreshold> + 'a {
    thresholds.iter().filter(move |t| t.is_met(score, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_exclusive() {
        let t = RewardThreshold::above(200, "golden-seahorse");
        assert!(!t.is_met(200, Outcome::OutOfMoves));
        assert!(t.is_met(201, Outcome::OutOfMoves));
    }

    #[test]
    fn test_win_only_threshold() {
        let t = RewardThreshold::on_win("reef-key");
        assert!(t.is_met(0, Outcome::Won));
        assert!(!t.is_met(10_000, Outcome::OutOfMoves));
        assert!(!t.is_met(10_000, Outcome::Ended));
    }

    #[test]
    fn test_crossed_filters() {
        let thresholds = vec![
            RewardThreshold::above(200, "golden-seahorse"),
            RewardThreshold::above(500, "pearl-crown"),
        ];
        let items: Vec<&str> = crossed(&thresholds, 350, Outcome::OutOfMoves)
            .map(|t| t.item.as_str())
            .collect();
        assert_eq!(items, vec!["golden-seahorse"]);
    }

    #[test]
    fn test_ledger_records() {
        let mut ledger = RewardLedger::new();
        let player = PlayerId::new("diver-1");
        ledger
            .grant(&RewardRequest {
                player: player.clone(),
                item: "pearl-crown".to_string(),
                score: 600,
            })
            .unwrap();
        assert!(ledger.owns(&player, "pearl-crown"));
        assert!(!ledger.owns(&PlayerId::new("other"), "pearl-crown"));
    }
}
