//! End-to-end rule scenarios on hand-built boards.

use coral_match::core::cascade::{clear_pass, CascadeRules};
use coral_match::core::{
    AnimationTiming, Grid, MatchSession, Phase, ScriptedRng, SelectOutcome, SessionConfig,
    TileSpawner,
};
use coral_match::types::Symbol::{self, *};
use coral_match::types::{Coord, Difficulty, Outcome, Tile};

fn o(s: Symbol) -> Tile {
    Tile::Ordinary(s)
}

fn headless(mut config: SessionConfig) -> SessionConfig {
    config.timing = AnimationTiming::instant();
    config.power_up_percent = 0;
    config
}

/// A=Coral, B=Shell, C=Starfish, D=Pearl
fn abcd_board() -> Grid {
    Grid::from_rows(vec![
        vec![o(Coral), o(Coral), o(Shell)],
        vec![o(Starfish), o(Pearl), o(Coral)],
        vec![o(Shell), o(Coral), o(Coral)],
    ])
    .unwrap()
}

#[test]
fn basic_match_clears_exactly_the_run() {
    // Swapping (0,2) and (1,2) completes A A A across row 0.
    // Refills draw Pearl, Starfish, Kelp, which form no new run.
    let mut session = MatchSession::with_grid(
        headless(SessionConfig::challenge()),
        abcd_board(),
        ScriptedRng::new(vec![3, 2, 4]),
    )
    .unwrap();

    session.select_cell(Coord::new(0, 2)).unwrap();
    let out = session.select_cell(Coord::new(1, 2)).unwrap();
    assert_eq!(out, SelectOutcome::Swapped { matched: true });

    let cascade = session.last_cascade();
    assert_eq!(cascade.pass_count(), 1);
    assert_eq!(
        cascade.passes[0].cleared,
        vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)]
    );
    assert_eq!(session.score(), 3 * 10);
    assert_eq!(session.collected().get(Coral), 3);
    assert_eq!(session.collected().total(), 3);
    assert_eq!(session.moves_remaining(), Some(29));
}

#[test]
fn no_op_swap_restores_board_after_revert_delay() {
    let mut config = SessionConfig::challenge();
    config.timing = AnimationTiming {
        swap_ms: 150,
        revert_ms: 300,
        cascade_step_ms: 220,
    };
    let mut session =
        MatchSession::with_grid(config, abcd_board(), ScriptedRng::new(vec![0])).unwrap();
    let before = session.grid().clone();

    session.select_cell(Coord::new(1, 0)).unwrap();
    let out = session.select_cell(Coord::new(1, 1)).unwrap();
    assert_eq!(out, SelectOutcome::Swapped { matched: false });
    assert!(matches!(session.phase(), Phase::Swapping { reverting: true, .. }));

    let mut elapsed = 0;
    while session.phase() != Phase::Idle {
        session.tick(16);
        elapsed += 16;
        assert!(elapsed <= 320);
    }
    assert_eq!(session.grid(), &before);
    assert_eq!(session.score(), 0);
    assert!(session.collected().is_empty());
    assert_eq!(session.moves_remaining(), Some(30));
}

fn rules() -> CascadeRules {
    CascadeRules {
        spawner: TileSpawner::new(6, 0),
        points_per_tile: 10,
        scored: true,
    }
}

#[test]
fn area_clear_takes_its_three_by_three_block() {
    let bomb = Tile::AreaClear(Coral);
    let mut grid = Grid::from_rows(vec![
        vec![o(Shell), o(Kelp), o(Pearl), o(Urchin), o(Shell)],
        vec![o(Pearl), o(Shell), o(Kelp), o(Pearl), o(Urchin)],
        vec![o(Kelp), bomb, o(Coral), o(Coral), o(Pearl)],
        vec![o(Urchin), o(Pearl), o(Shell), o(Kelp), o(Urchin)],
        vec![o(Shell), o(Urchin), o(Pearl), o(Shell), o(Kelp)],
    ])
    .unwrap();

    let pass = clear_pass(&mut grid, &rules(), &mut ScriptedRng::new(vec![5]), 1).unwrap();

    let mut expected: Vec<Coord> = (1..=3)
        .flat_map(|r| (0..=2).map(move |c| Coord::new(r, c)))
        .collect();
    expected.push(Coord::new(2, 3));
    expected.sort();
    assert_eq!(pass.cleared, expected);
    assert_eq!(pass.triggered, vec![Coord::new(2, 1)]);
    assert_eq!(pass.points, 100);
    assert_eq!(pass.collected.get(Coral), 3);
    assert_eq!(pass.collected.get(Pearl), 2);
    assert_eq!(pass.collected.get(Shell), 2);
    assert_eq!(pass.collected.get(Kelp), 2);
    assert_eq!(pass.collected.get(Urchin), 1);
    assert_eq!(pass.refilled, 10);
}

#[test]
fn area_clear_in_a_corner_stays_in_bounds() {
    let mut grid = Grid::from_rows(vec![
        vec![Tile::AreaClear(Coral), o(Coral), o(Coral), o(Kelp)],
        vec![o(Shell), o(Pearl), o(Kelp), o(Urchin)],
        vec![o(Pearl), o(Kelp), o(Urchin), o(Shell)],
        vec![o(Kelp), o(Urchin), o(Shell), o(Pearl)],
    ])
    .unwrap();
    let pass = clear_pass(&mut grid, &rules(), &mut ScriptedRng::new(vec![5]), 1).unwrap();
    assert_eq!(
        pass.cleared,
        vec![
            Coord::new(0, 0),
            Coord::new(0, 1),
            Coord::new(0, 2),
            Coord::new(1, 0),
            Coord::new(1, 1),
        ]
    );
    assert_eq!(pass.points, 50);
}

#[test]
fn wildcard_scores_but_is_not_collected() {
    let mut grid = Grid::from_rows(vec![
        vec![o(Coral), Tile::Wildcard, o(Coral), o(Kelp)],
        vec![o(Shell), o(Pearl), o(Kelp), o(Urchin)],
        vec![o(Pearl), o(Kelp), o(Urchin), o(Shell)],
        vec![o(Kelp), o(Urchin), o(Shell), o(Pearl)],
    ])
    .unwrap();
    let pass = clear_pass(&mut grid, &rules(), &mut ScriptedRng::new(vec![5]), 1).unwrap();
    assert_eq!(
        pass.cleared,
        vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)]
    );
    assert_eq!(pass.points, 30);
    assert_eq!(pass.collected.get(Coral), 2);
    assert_eq!(pass.collected.total(), 2);
    assert_eq!(pass.refilled, 3);
}

#[test]
fn row_clear_takes_row_and_column() {
    let mut grid = Grid::from_rows(vec![
        vec![o(Shell), o(Kelp), o(Pearl), o(Urchin)],
        vec![Tile::RowClear(Coral), o(Coral), o(Coral), o(Kelp)],
        vec![o(Pearl), o(Shell), o(Urchin), o(Shell)],
        vec![o(Kelp), o(Urchin), o(Shell), o(Pearl)],
    ])
    .unwrap();
    let pass = clear_pass(&mut grid, &rules(), &mut ScriptedRng::new(vec![5]), 1).unwrap();
    // Row 1 plus column 0
    assert_eq!(pass.cleared.len(), 4 + 3);
    assert!(pass.cleared.contains(&Coord::new(3, 0)));
    assert!(pass.cleared.contains(&Coord::new(1, 3)));
    assert_eq!(pass.points, 70);
}

#[test]
fn last_move_exhausts_bounded_session() {
    let grid = Grid::from_rows(vec![
        vec![o(Shell), o(Coral), o(Coral), o(Kelp)],
        vec![o(Coral), o(Kelp), o(Pearl), o(Shell)],
        vec![o(Pearl), o(Shell), o(Kelp), o(Pearl)],
        vec![o(Kelp), o(Pearl), o(Shell), o(Kelp)],
    ])
    .unwrap();
    let config = headless(SessionConfig::level(Difficulty::Normal, 1, 5_000));
    let mut session = MatchSession::with_grid(config, grid, ScriptedRng::new(vec![3, 1, 4, 1, 5])).unwrap();

    session.select_cell(Coord::new(0, 0)).unwrap();
    session.select_cell(Coord::new(1, 0)).unwrap();

    assert_eq!(session.moves_remaining(), Some(0));
    assert_eq!(session.outcome(), Some(Outcome::OutOfMoves));
    assert_eq!(
        session.phase(),
        Phase::GameOver {
            outcome: Outcome::OutOfMoves
        }
    );
    assert_eq!(
        session.select_cell(Coord::new(2, 2)).unwrap(),
        SelectOutcome::Ignored
    );
}
