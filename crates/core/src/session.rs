//! Match session - the state machine one game runs on
//!
//! ```text
//! Idle --select--> Selected --select adjacent--> Swapping --tick--> Resolving --tick--> Idle
//!                     |                              |
//!                     +--select elsewhere--> Idle    +--no match, tick--> Idle (reverted)
//!
//! any matched swap that ends the game --> GameOver(outcome)
//! ```
//!
//! The cascade resolves synchronously the moment a matching swap lands.
//! `Swapping` and `Resolving` only hold the board still while the shell
//! animates; input during them is ignored. With
//! [`AnimationTiming::instant`](crate::config::AnimationTiming::instant) both
//! phases are skipped.

use serde::{Deserialize, Serialize};

use crate::cascade::{resolve, CascadeReport, CascadeRules};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::matcher::{find_hint, find_matches, has_valid_move};
use crate::reward::{crossed, NoRewards, PlayerId, RewardRequest, RewardSink};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::CollectedTally;
use crate::snapshot::MatchSnapshot;
use crate::types::{Coord, EngineEvent, Outcome, MAX_RESHUFFLE_ATTEMPTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Selected { at: Coord },
    /// Two tiles are exchanging; `reverting` swaps that found no match go back
    Swapping {
        a: Coord,
        b: Coord,
        remaining_ms: u32,
        reverting: bool,
    },
    Resolving { remaining_ms: u32 },
    GameOver { outcome: Outcome },
}

impl Phase {
    /// Input is only accepted in `Idle` and `Selected`
    pub fn accepts_input(&self) -> bool {
        matches!(self, Phase::Idle | Phase::Selected { .. })
    }
}

/// Result of a cell selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// First cell recorded
    Selected,
    /// Second cell was not adjacent (or the same cell); nothing moved
    SelectionCleared,
    /// Adjacent cells exchanged
    Swapped { matched: bool },
    /// Board busy or game over
    Ignored,
}

pub struct MatchSession<R: RandomSource = SimpleRng> {
    config: SessionConfig,
    rules: CascadeRules,
    grid: Grid,
    rng: R,
    phase: Phase,
    score: u32,
    moves_remaining: Option<u32>,
    moves_made: u32,
    combo: u32,
    collected: CollectedTally,
    outcome: Option<Outcome>,
    /// Board right after a matching swap, before the cascade
    swapped: Option<Grid>,
    last_cascade: CascadeReport,
    events: Vec<EngineEvent>,
    player: PlayerId,
    rewards: Box<dyn RewardSink>,
    /// Increments on restart
    episode_id: u32,
}

impl MatchSession<SimpleRng> {
    /// Session driven by the built-in generator
    pub fn seeded(config: SessionConfig, seed: u32) -> Result<Self> {
        Self::new(config, SimpleRng::new(seed))
    }
}

impl<R: RandomSource> MatchSession<R> {
    /// Start a session on a freshly generated board
    pub fn new(config: SessionConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let grid = Grid::generate(config.grid_size, &config.spawner(), &mut rng);
        let mut session = Self::build(config, grid, rng);
        session.ensure_playable();
        Ok(session)
    }

    /// Start a session on an explicit board. The board size overrides
    /// `config.grid_size`.
    pub fn with_grid(mut config: SessionConfig, grid: Grid, rng: R) -> Result<Self> {
        config.grid_size = grid.size();
        config.validate()?;
        Ok(Self::build(config, grid, rng))
    }

    fn build(config: SessionConfig, grid: Grid, rng: R) -> Self {
        Self {
            rules: config.cascade_rules(),
            moves_remaining: config.move_budget,
            config,
            grid,
            rng,
            phase: Phase::Idle,
            score: 0,
            moves_made: 0,
            combo: 0,
            collected: CollectedTally::new(),
            outcome: None,
            swapped: None,
            last_cascade: CascadeReport::default(),
            events: Vec::new(),
            player: PlayerId::default(),
            rewards: Box::new(NoRewards),
            episode_id: 0,
        }
    }

    /// Route reward grants for `player` to `sink`
    pub fn with_rewards(mut self, player: PlayerId, sink: Box<dyn RewardSink>) -> Self {
        self.player = player;
        self.rewards = sink;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_remaining(&self) -> Option<u32> {
        self.moves_remaining
    }

    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn collected(&self) -> &CollectedTally {
        &self.collected
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn selected(&self) -> Option<Coord> {
        match self.phase {
            Phase::Selected { at } => Some(at),
            _ => None,
        }
    }

    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    /// Passes of the most recent cascade
    pub fn last_cascade(&self) -> &CascadeReport {
        &self.last_cascade
    }

    /// Take every event since the last call
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Click or keyboard-confirm a cell.
    ///
    /// Out-of-bounds coordinates are rejected before anything else and leave
    /// the session untouched.
    pub fn select_cell(&mut self, at: Coord) -> Result<SelectOutcome> {
        self.grid.check(at)?;
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Selected { at };
                self.events.push(EngineEvent::Selected { at });
                Ok(SelectOutcome::Selected)
            }
            Phase::Selected { at: prev } => self.swap(prev, at),
            _ => Ok(SelectOutcome::Ignored),
        }
    }

    /// Exchange two cells. Clears any selection, reporting it only when one
    /// existed; cells that are not adjacent are left where they are.
    pub fn swap(&mut self, a: Coord, b: Coord) -> Result<SelectOutcome> {
        self.grid.check(a)?;
        self.grid.check(b)?;
        if !self.phase.accepts_input() {
            return Ok(SelectOutcome::Ignored);
        }

        if let Phase::Selected { .. } = self.phase {
            self.events.push(EngineEvent::SelectionCleared);
        }
        self.phase = Phase::Idle;
        if !a.is_adjacent(b) {
            return Ok(SelectOutcome::SelectionCleared);
        }

        self.grid.swap(a, b);
        let matched = !find_matches(&self.grid).is_empty();
        self.events.push(EngineEvent::Swapped { a, b, matched });

        if matched {
            self.apply_match(a, b);
        } else {
            self.combo = 0;
            self.start_revert(a, b);
        }
        Ok(SelectOutcome::Swapped { matched })
    }

    fn start_revert(&mut self, a: Coord, b: Coord) {
        let delay = self.config.timing.revert_ms;
        if delay == 0 {
            self.finish_revert(a, b);
        } else {
            self.phase = Phase::Swapping {
                a,
                b,
                remaining_ms: delay,
                reverting: true,
            };
        }
    }

    fn finish_revert(&mut self, a: Coord, b: Coord) {
        self.grid.swap(a, b);
        self.events.push(EngineEvent::SwapReverted { a, b });
        self.phase = Phase::Idle;
    }

    fn apply_match(&mut self, a: Coord, b: Coord) {
        if let Some(moves) = self.moves_remaining.as_mut() {
            *moves = moves.saturating_sub(1);
        }
        self.moves_made += 1;
        self.combo += 1;
        self.swapped = Some(self.grid.clone());

        let report = resolve(&mut self.grid, &self.rules, &mut self.rng);
        for pass in &report.passes {
            self.score = self.score.saturating_add(pass.points);
            self.collected.merge(&pass.collected);
            self.events.push(EngineEvent::CascadePass {
                pass: pass.pass,
                cleared: pass.cleared.len() as u32,
                points: pass.points,
            });
        }
        self.events.push(EngineEvent::Settled {
            passes: report.pass_count(),
            cleared: report.cleared() as u32,
        });
        self.last_cascade = report;
        self.ensure_playable();

        if let Some(outcome) = self.evaluate_outcome() {
            self.finish(outcome);
            return;
        }

        let delay = self.config.timing.swap_ms;
        if delay == 0 {
            self.enter_resolving();
        } else {
            self.phase = Phase::Swapping {
                a,
                b,
                remaining_ms: delay,
                reverting: false,
            };
        }
    }

    fn enter_resolving(&mut self) {
        let total = self
            .config
            .timing
            .cascade_step_ms
            .saturating_mul(self.last_cascade.pass_count());
        if total == 0 {
            self.settle();
        } else {
            self.phase = Phase::Resolving {
                remaining_ms: total,
            };
        }
    }

    fn settle(&mut self) {
        self.swapped = None;
        self.phase = Phase::Idle;
    }

    /// Win is checked first, so reaching the target on the last move wins.
    fn evaluate_outcome(&self) -> Option<Outcome> {
        if let Some(target) = self.config.target_score {
            if self.score >= target {
                return Some(Outcome::Won);
            }
        }
        if self.moves_remaining == Some(0) {
            return Some(Outcome::OutOfMoves);
        }
        None
    }

    fn finish(&mut self, outcome: Outcome) {
        self.phase = Phase::GameOver { outcome };
        self.outcome = Some(outcome);
        self.events.push(EngineEvent::GameOver {
            outcome,
            score: self.score,
        });
        log::info!(
            "session over: {:?} with score {} after {} moves",
            outcome,
            self.score,
            self.moves_made
        );

        // Leaving a session early earns nothing
        if outcome == Outcome::Ended {
            return;
        }
        let requests: Vec<RewardRequest> = crossed(&self.config.rewards, self.score, outcome)
            .map(|t| RewardRequest {
                player: self.player.clone(),
                item: t.item.clone(),
                score: self.score,
            })
            .collect();
        for request in requests {
            self.events.push(EngineEvent::RewardRequested {
                item: request.item.clone(),
            });
            if let Err(err) = self.rewards.grant(&request) {
                log::warn!("{}", err);
            }
        }
    }

    /// Replace a board with no valid move
    fn ensure_playable(&mut self) {
        if has_valid_move(&self.grid) {
            return;
        }
        let spawner = self.config.spawner();
        for attempt in 1..=MAX_RESHUFFLE_ATTEMPTS {
            self.grid = Grid::generate(self.grid.size(), &spawner, &mut self.rng);
            if has_valid_move(&self.grid) {
                log::debug!("dead board reshuffled (attempt {})", attempt);
                self.events.push(EngineEvent::BoardReshuffled);
                return;
            }
        }
        log::warn!(
            "no playable board after {} reshuffles",
            MAX_RESHUFFLE_ATTEMPTS
        );
        self.events.push(EngineEvent::BoardReshuffled);
    }

    /// Advance presentation timers. Returns true when the phase changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        match self.phase {
            Phase::Swapping {
                a,
                b,
                remaining_ms,
                reverting,
            } => {
                let left = remaining_ms.saturating_sub(elapsed_ms);
                if left > 0 {
                    self.phase = Phase::Swapping {
                        a,
                        b,
                        remaining_ms: left,
                        reverting,
                    };
                    return false;
                }
                if reverting {
                    self.finish_revert(a, b);
                } else {
                    self.enter_resolving();
                }
                true
            }
            Phase::Resolving { remaining_ms } => {
                let left = remaining_ms.saturating_sub(elapsed_ms);
                if left > 0 {
                    self.phase = Phase::Resolving { remaining_ms: left };
                    return false;
                }
                self.settle();
                true
            }
            _ => false,
        }
    }

    /// Leave the session. Returns false if it was already over.
    pub fn end(&mut self) -> bool {
        if self.is_over() {
            return false;
        }
        if let Phase::Swapping {
            a,
            b,
            reverting: true,
            ..
        } = self.phase
        {
            self.finish_revert(a, b);
        }
        self.swapped = None;
        self.finish(Outcome::Ended);
        true
    }

    /// New board and fresh counters, same configuration
    pub fn restart(&mut self) {
        self.grid = Grid::generate(self.config.grid_size, &self.config.spawner(), &mut self.rng);
        self.phase = Phase::Idle;
        self.score = 0;
        self.moves_remaining = self.config.move_budget;
        self.moves_made = 0;
        self.combo = 0;
        self.collected = CollectedTally::new();
        self.outcome = None;
        self.swapped = None;
        self.last_cascade = CascadeReport::default();
        self.episode_id = self.episode_id.wrapping_add(1);
        self.ensure_playable();
    }

    /// A swap that would match, if the game is still running
    pub fn hint(&self) -> Option<(Coord, Coord)> {
        if self.is_over() {
            return None;
        }
        find_hint(&self.grid)
    }

    /// The board the shell should draw right now.
    ///
    /// While a matching swap is shown this is the pre-cascade board; while
    /// resolving it steps through the recorded passes.
    pub fn presented_grid(&self) -> &Grid {
        match self.phase {
            Phase::Swapping {
                reverting: false, ..
            } => self.swapped.as_ref().unwrap_or(&self.grid),
            Phase::Resolving { remaining_ms } => {
                let step = self.config.timing.cascade_step_ms.max(1);
                let passes = self.last_cascade.passes.len();
                let total = step.saturating_mul(passes as u32);
                let shown = (total.saturating_sub(remaining_ms) / step) as usize;
                self.last_cascade
                    .passes
                    .get(shown.min(passes.saturating_sub(1)))
                    .map(|p| &p.grid_after)
                    .unwrap_or(&self.grid)
            }
            _ => &self.grid,
        }
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        let mut out = MatchSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    /// Fill an existing snapshot, reusing its allocations
    pub fn snapshot_into(&self, out: &mut MatchSnapshot) {
        let grid = self.presented_grid();
        out.size = grid.size();
        out.cells.clear();
        out.cells.extend_from_slice(grid.cells());
        out.phase = self.phase;
        out.selected = self.selected();
        out.score = self.score;
        out.scored = self.config.scored;
        out.moves_remaining = self.moves_remaining;
        out.moves_made = self.moves_made;
        out.target_score = self.config.target_score;
        out.combo = self.combo;
        out.collected = self.collected.clone();
        out.outcome = self.outcome;
        out.episode_id = self.episode_id;
    }
}
