//! Board and session invariants checked across many seeded games.

use coral_match::core::matcher::find_matches;
use coral_match::core::{AnimationTiming, Grid, MatchSession, Phase, SelectOutcome, SessionConfig};
use coral_match::types::{Coord, Difficulty, Direction, EngineEvent, Tile};

fn headless(config: SessionConfig) -> SessionConfig {
    config.with_timing(AnimationTiming::instant())
}

fn assert_settled(grid: &Grid, context: &str) {
    assert!(grid.is_full(), "{}: board has empty cells", context);
    assert!(find_matches(grid).is_empty(), "{}: board holds a run", context);
}

fn wildcards_at(grid: &Grid, cells: &[Coord]) -> usize {
    cells
        .iter()
        .filter(|at| grid.tile(**at) == Some(Tile::Wildcard))
        .count()
}

/// First adjacent pair whose exchange creates no run
fn dead_swap(grid: &Grid) -> Option<(Coord, Coord)> {
    let mut trial = grid.clone();
    for a in grid.coords() {
        for dir in [Direction::Right, Direction::Down] {
            let Some(b) = a.step(dir, grid.size()) else {
                continue;
            };
            trial.swap(a, b);
            let dead = find_matches(&trial).is_empty();
            trial.swap(a, b);
            if dead {
                return Some((a, b));
            }
        }
    }
    None
}

#[test]
fn settled_board_after_every_move() {
    for seed in 1..40u32 {
        let config = headless(SessionConfig::free_play(Difficulty::Easy));
        let mut session = MatchSession::seeded(config, seed).unwrap();
        assert_settled(session.grid(), &format!("seed {} start", seed));

        for step in 0..25 {
            let (a, b) = session.hint().expect("session keeps a playable board");
            let out = session.swap(a, b).unwrap();
            assert_eq!(out, SelectOutcome::Swapped { matched: true });
            assert_eq!(session.phase(), Phase::Idle);
            assert_settled(session.grid(), &format!("seed {} step {}", seed, step));
        }
    }
}

#[test]
fn every_pass_refills_what_it_cleared() {
    for seed in 1..30u32 {
        let mut config = headless(SessionConfig::challenge());
        config.power_up_percent = 30;
        let mut session = MatchSession::seeded(config, seed).unwrap();

        while !session.is_over() {
            let (a, b) = session.hint().unwrap();
            let mut before = session.grid().clone();
            before.swap(a, b);
            session.swap(a, b).unwrap();
            let report = session.last_cascade();
            assert!(!report.is_empty());
            for pass in &report.passes {
                assert_eq!(pass.cleared.len(), pass.refilled, "seed {}", seed);
                // Wildcards are scored but never collected
                let wildcards = wildcards_at(&before, &pass.cleared);
                assert_eq!(
                    pass.collected.total() as usize,
                    pass.cleared.len() - wildcards,
                    "seed {}",
                    seed
                );
                assert!(pass.grid_after.is_full());
                before = pass.grid_after.clone();
            }
        }
    }
}

#[test]
fn score_and_tally_never_decrease() {
    for seed in 1..30u32 {
        let config = headless(SessionConfig::challenge());
        let mut session = MatchSession::seeded(config, seed).unwrap();
        let mut score = 0;
        let mut total = 0;

        while !session.is_over() {
            let (a, b) = session.hint().unwrap();
            session.swap(a, b).unwrap();
            assert!(session.score() > score, "seed {}", seed);
            assert!(session.collected().total() > total, "seed {}", seed);
            score = session.score();
            total = session.collected().total();

            if let Some((a, b)) = dead_swap(session.grid()) {
                session.swap(a, b).unwrap();
                assert_eq!(session.score(), score);
                assert_eq!(session.collected().total(), total);
            }
        }
        assert_eq!(session.moves_remaining(), Some(0));
    }
}

#[test]
fn unmatched_swap_restores_the_board() {
    for seed in 1..50u32 {
        let config = SessionConfig::free_play(Difficulty::Normal);
        let mut session = MatchSession::seeded(config, seed).unwrap();
        let Some((a, b)) = dead_swap(session.grid()) else {
            continue;
        };
        let before = session.grid().clone();

        session.select_cell(a).unwrap();
        let out = session.select_cell(b).unwrap();
        assert_eq!(out, SelectOutcome::Swapped { matched: false });

        // Input is ignored until the revert finishes
        assert_eq!(session.select_cell(a).unwrap(), SelectOutcome::Ignored);
        while session.phase() != Phase::Idle {
            session.tick(16);
        }
        assert_eq!(session.grid(), &before, "seed {}", seed);
        assert_eq!(session.combo(), 0);
        let events = session.drain_events();
        assert!(events.contains(&EngineEvent::SwapReverted { a, b }));
    }
}

#[test]
fn non_adjacent_pairs_are_rejected() {
    let config = headless(SessionConfig::challenge());
    let mut session = MatchSession::seeded(config, 9).unwrap();
    let before = session.grid().clone();
    let size = before.size();

    let pairs = [
        (Coord::new(0, 0), Coord::new(1, 1)),
        (Coord::new(2, 2), Coord::new(2, 4)),
        (Coord::new(0, 0), Coord::new(size - 1, size - 1)),
        (Coord::new(3, 3), Coord::new(3, 3)),
    ];
    for (a, b) in pairs {
        session.select_cell(a).unwrap();
        assert_eq!(
            session.select_cell(b).unwrap(),
            SelectOutcome::SelectionCleared
        );
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.grid(), &before);
    }
    assert_eq!(session.moves_remaining(), Some(30));
    assert_eq!(session.score(), 0);
}

#[test]
fn out_of_range_cells_are_errors() {
    let mut session = MatchSession::seeded(SessionConfig::default(), 3).unwrap();
    assert!(session.select_cell(Coord::new(8, 0)).is_err());
    assert!(session.swap(Coord::new(0, 0), Coord::new(0, 99)).is_err());
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn same_seed_replays_the_same_game() {
    let play = |seed| {
        let config = headless(SessionConfig::challenge());
        let mut session = MatchSession::seeded(config, seed).unwrap();
        while !session.is_over() {
            let (a, b) = session.hint().unwrap();
            session.swap(a, b).unwrap();
        }
        (session.score(), session.grid().clone())
    };
    assert_eq!(play(21), play(21));
}
