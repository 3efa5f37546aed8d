//! Cascade resolution - clear, compact, refill, repeat until settled
//!
//! One pass:
//! 1. find every run (rows, then columns)
//! 2. add the zones of power-ups caught in those runs (first order only)
//! 3. tally and score the marked cells
//! 4. empty the marked cells
//! 5. compact each column downward
//! 6. refill the empty cells from the top
//!
//! Passes repeat until one finds no run. Resolution is synchronous; the
//! per-pass grids are kept so a shell can animate them afterwards.

use crate::grid::{Grid, TileSpawner};
use crate::matcher::{expand_specials, find_matches};
use crate::rng::RandomSource;
use crate::scoring::{pass_points, CollectedTally};
use crate::types::{Coord, MAX_CASCADE_PASSES};

/// Parameters a cascade needs from the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeRules {
    pub spawner: TileSpawner,
    pub points_per_tile: u32,
    pub scored: bool,
}

/// What one pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePass {
    /// 1-based pass number within the resolution
    pub pass: u32,
    /// Cleared cells, row-major
    pub cleared: Vec<Coord>,
    /// Number of runs the scan found
    pub runs: usize,
    /// Power-ups that fired
    pub triggered: Vec<Coord>,
    pub collected: CollectedTally,
    pub points: u32,
    pub refilled: usize,
    /// Board after compaction and refill
    pub grid_after: Grid,
}

/// All passes of one resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub passes: Vec<CascadePass>,
}

impl CascadeReport {
    /// True when the board was already settled
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn pass_count(&self) -> u32 {
        self.passes.len() as u32
    }

    pub fn cleared(&self) -> usize {
        self.passes.iter().map(|p| p.cleared.len()).sum()
    }

    pub fn points(&self) -> u32 {
        self.passes
            .iter()
            .fold(0u32, |acc, p| acc.saturating_add(p.points))
    }

    pub fn collected(&self) -> CollectedTally {
        let mut tally = CollectedTally::new();
        for pass in &self.passes {
            tally.merge(&pass.collected);
        }
        tally
    }
}

/// Run a single pass. Returns `None` (and leaves the grid alone) when the
/// board has no run.
pub fn clear_pass<R: RandomSource>(
    grid: &mut Grid,
    rules: &CascadeRules,
    rng: &mut R,
    pass: u32,
) -> Option<CascadePass> {
    let mut set = find_matches(grid);
    if set.is_empty() {
        return None;
    }
    expand_specials(grid, &mut set);

    let cleared = set.coords();
    let mut collected = CollectedTally::new();
    for at in &cleared {
        if let Some(tile) = grid.take(*at) {
            collected.collect(tile);
        }
    }
    let points = pass_points(cleared.len(), rules.points_per_tile, rules.scored);

    for col in 0..grid.size() {
        grid.compact_column(col);
    }
    let refilled = grid.refill(&rules.spawner, rng);
    debug_assert_eq!(refilled, cleared.len());

    log::debug!(
        "cascade pass {}: {} runs, {} cleared, {} power-ups fired, {} points",
        pass,
        set.runs().len(),
        cleared.len(),
        set.triggered().len(),
        points
    );

    Some(CascadePass {
        pass,
        cleared,
        runs: set.runs().len(),
        triggered: set.triggered().to_vec(),
        collected,
        points,
        refilled,
        grid_after: grid.clone(),
    })
}

/// Resolve the board to a settled state
pub fn resolve<R: RandomSource>(grid: &mut Grid, rules: &CascadeRules, rng: &mut R) -> CascadeReport {
    let mut report = CascadeReport::default();
    while let Some(pass) = clear_pass(grid, rules, rng, report.pass_count() + 1) {
        report.passes.push(pass);
        if report.passes.len() >= MAX_CASCADE_PASSES {
            log::warn!(
                "cascade stopped after {} passes without settling",
                MAX_CASCADE_PASSES
            );
            break;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_matches;
    use crate::rng::{ScriptedRng, SimpleRng};
    use crate::types::Symbol::{self, *};
    use crate::types::Tile;

    fn o(s: Symbol) -> Tile {
        Tile::Ordinary(s)
    }

    fn rules(symbols: usize, power_ups: u8) -> CascadeRules {
        CascadeRules {
            spawner: TileSpawner::new(symbols, power_ups),
            points_per_tile: 10,
            scored: true,
        }
    }

    #[test]
    fn test_settled_board_is_untouched() {
        let mut grid = Grid::generate(8, &TileSpawner::new(5, 0), &mut SimpleRng::new(3));
        let before = grid.clone();
        let report = resolve(&mut grid, &rules(5, 10), &mut SimpleRng::new(3));
        assert!(report.is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_single_pass_clears_and_refills_column() {
        // Column 0 holds three corals; refills are Kelp, Pearl, Urchin.
        let mut grid = Grid::from_rows(vec![
            vec![o(Coral), o(Shell), o(Kelp)],
            vec![o(Coral), o(Kelp), o(Shell)],
            vec![o(Coral), o(Shell), o(Kelp)],
        ])
        .unwrap();
        let mut rng = ScriptedRng::new(vec![4, 3, 5]);
        let pass = clear_pass(&mut grid, &rules(6, 0), &mut rng, 1).unwrap();

        assert_eq!(pass.cleared.len(), 3);
        assert_eq!(pass.refilled, 3);
        assert_eq!(pass.points, 30);
        assert_eq!(pass.collected.get(Coral), 3);
        assert_eq!(
            grid.column(0),
            vec![Some(o(Kelp)), Some(o(Pearl)), Some(o(Urchin))]
        );
    }

    #[test]
    fn test_tiles_fall_before_refill() {
        // Row 2 clears; rows 0 and 1 fall by one.
        let mut grid = Grid::from_rows(vec![
            vec![o(Kelp), o(Shell), o(Pearl)],
            vec![o(Shell), o(Pearl), o(Kelp)],
            vec![o(Coral), o(Coral), o(Coral)],
        ])
        .unwrap();
        let mut rng = ScriptedRng::new(vec![5]);
        clear_pass(&mut grid, &rules(6, 0), &mut rng, 1).unwrap();

        assert_eq!(grid.row(1), &[Some(o(Kelp)), Some(o(Shell)), Some(o(Pearl))]);
        assert_eq!(grid.row(2), &[Some(o(Shell)), Some(o(Pearl)), Some(o(Kelp))]);
        assert_eq!(grid.row(0), &[Some(o(Urchin)); 3]);
    }

    #[test]
    fn test_unscored_rules_still_collect() {
        let mut grid = Grid::from_rows(vec![
            vec![o(Coral), o(Coral), o(Coral)],
            vec![o(Shell), o(Kelp), o(Shell)],
            vec![o(Kelp), o(Shell), o(Kelp)],
        ])
        .unwrap();
        let mut rules = rules(6, 0);
        rules.scored = false;
        let pass = clear_pass(&mut grid, &rules, &mut ScriptedRng::new(vec![3, 4, 5]), 1).unwrap();
        assert_eq!(pass.points, 0);
        assert_eq!(pass.collected.get(Coral), 3);
    }

    #[test]
    fn test_resolve_reaches_settled_board() {
        for seed in 1..150u32 {
            let mut rng = SimpleRng::new(seed);
            let spawner = TileSpawner::new(4, 20);
            let mut grid = Grid::empty(8);
            grid.refill(&spawner, &mut rng);

            let report = resolve(&mut grid, &rules(4, 20), &mut rng);
            assert!(grid.is_full(), "seed {}", seed);
            assert!(find_matches(&grid).is_empty(), "seed {}", seed);
            for pass in &report.passes {
                assert_eq!(pass.cleared.len(), pass.refilled, "seed {}", seed);
                assert!(pass.grid_after.is_full());
            }
        }
    }

    #[test]
    fn test_report_totals() {
        let mut grid = Grid::empty(8);
        let mut rng = SimpleRng::new(77);
        grid.refill(&TileSpawner::new(3, 0), &mut rng);
        let report = resolve(&mut grid, &rules(3, 0), &mut rng);

        let cleared: usize = report.passes.iter().map(|p| p.cleared.len()).sum();
        assert_eq!(report.cleared(), cleared);
        assert_eq!(report.points(), cleared as u32 * 10);
        assert_eq!(report.collected().total() as usize, cleared);
    }

    #[test]
    fn test_endless_cascade_is_capped() {
        // Every refill is a wildcard, so each pass leaves a board full of runs.
        let mut grid = Grid::from_rows(vec![
            vec![o(Coral), o(Coral), o(Coral)],
            vec![o(Shell), o(Shell), o(Shell)],
            vec![o(Kelp), o(Kelp), o(Kelp)],
        ])
        .unwrap();
        let mut rng = ScriptedRng::new(vec![0]);
        let report = resolve(&mut grid, &rules(3, 100), &mut rng);

        assert_eq!(report.pass_count() as usize, MAX_CASCADE_PASSES);
        assert!(grid.is_full());
        assert!(grid.cells().iter().all(|c| *c == Some(Tile::Wildcard)));
        assert_eq!(report.passes[0].collected.total(), 9);
        // Wildcards never count toward the tally.
        let last = report.passes.last().unwrap();
        assert_eq!(last.cleared.len(), 9);
        assert_eq!(last.collected.total(), 0);
    }
}
