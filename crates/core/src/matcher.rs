//! Match detection - runs, power-up zones and move hints
//!
//! A run is a maximal stretch of a row or column in which every tile carries
//! the same symbol, wildcards standing in for any symbol. Rows are scanned
//! before columns, but both mark into one pending-clear set, so the order is
//! not observable.

use crate::grid::Grid;
use crate::types::{Cell, Coord, Direction, Symbol, Tile, MIN_RUN_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

/// One run of matching tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    pub axis: Axis,
    pub start: Coord,
    pub len: usize,
}

impl Run {
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.len).map(move |i| match self.axis {
            Axis::Row => Coord::new(self.start.row, self.start.col + i),
            Axis::Column => Coord::new(self.start.row + i, self.start.col),
        })
    }
}

/// Cells marked for clearing in one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet {
    size: usize,
    marked: Vec<bool>,
    runs: Vec<Run>,
    triggered: Vec<Coord>,
}

impl MatchSet {
    fn new(size: usize) -> Self {
        Self {
            size,
            marked: vec![false; size * size],
            runs: Vec::new(),
            triggered: Vec::new(),
        }
    }

    /// True when no run was found
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn contains(&self, at: Coord) -> bool {
        at.row < self.size && at.col < self.size && self.marked[at.row * self.size + at.col]
    }

    /// Number of marked cells
    pub fn len(&self) -> usize {
        self.marked.iter().filter(|m| **m).count()
    }

    /// Marked cells in row-major order
    pub fn coords(&self) -> Vec<Coord> {
        let size = self.size;
        self.marked
            .iter()
            .enumerate()
            .filter(|(_, m)| **m)
            .map(|(i, _)| Coord::new(i / size, i % size))
            .collect()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Power-ups whose zone was added by [`expand_specials`]
    pub fn triggered(&self) -> &[Coord] {
        &self.triggered
    }

    fn mark(&mut self, at: Coord) {
        if at.row < self.size && at.col < self.size {
            self.marked[at.row * self.size + at.col] = true;
        }
    }
}

/// Maximal runs of at least `MIN_RUN_LENGTH` in one line, as (start, len).
///
/// With wildcards two runs may overlap (`A A * B B` holds `A A *` and `* B B`).
pub fn scan_line(line: &[Cell]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut covered_to = 0;

    for start in 0..line.len() {
        let end = run_end(line, start);
        // A run ending where an earlier one ended is contained in it.
        if end > covered_to && end - start >= MIN_RUN_LENGTH {
            runs.push((start, end - start));
        }
        covered_to = covered_to.max(end);
    }
    runs
}

/// Exclusive end of the longest run starting at `start`
fn run_end(line: &[Cell], start: usize) -> usize {
    let mut anchor: Option<Symbol> = None;
    let mut end = start;
    while let Some(Some(tile)) = line.get(end) {
        match (anchor, tile.symbol()) {
            (_, None) => {}
            (None, Some(s)) => anchor = Some(s),
            (Some(a), Some(s)) if a == s => {}
            _ => break,
        }
        end += 1;
    }
    end
}

/// Scan every row, then every column, and mark all runs
pub fn find_matches(grid: &Grid) -> MatchSet {
    let size = grid.size();
    let mut set = MatchSet::new(size);

    for row in 0..size {
        for (start, len) in scan_line(grid.row(row)) {
            set.runs.push(Run {
                axis: Axis::Row,
                start: Coord::new(row, start),
                len,
            });
        }
    }
    for col in 0..size {
        for (start, len) in scan_line(&grid.column(col)) {
            set.runs.push(Run {
                axis: Axis::Column,
                start: Coord::new(start, col),
                len,
            });
        }
    }

    let runs = set.runs.clone();
    for run in &runs {
        for at in run.cells() {
            set.mark(at);
        }
    }
    set
}

/// Add the zones of power-ups caught in the runs.
///
/// Only power-ups marked by the run scan are expanded. A power-up reached
/// only through another power-up's zone is cleared but does not fire in the
/// same pass.
pub fn expand_specials(grid: &Grid, set: &mut MatchSet) {
    let seeds: Vec<(Coord, Tile)> = set
        .coords()
        .into_iter()
        .filter_map(|at| grid.tile(at).map(|t| (at, t)))
        .filter(|(_, t)| matches!(t, Tile::RowClear(_) | Tile::AreaClear(_)))
        .collect();

    for (at, tile) in seeds {
        match tile {
            Tile::RowClear(_) => grid.cross(at).into_iter().for_each(|c| set.mark(c)),
            Tile::AreaClear(_) => grid.area(at).into_iter().for_each(|c| set.mark(c)),
            _ => continue,
        }
        set.triggered.push(at);
    }
}

/// True if `at` sits inside a run along its row or column
pub fn in_run(grid: &Grid, at: Coord) -> bool {
    if !grid.contains(at) {
        return false;
    }
    let in_line = |line: &[Cell], pos: usize| {
        scan_line(line)
            .iter()
            .any(|(start, len)| (*start..start + len).contains(&pos))
    };
    in_line(grid.row(at.row), at.col) || in_line(grid.column(at.col).as_slice(), at.row)
}

/// First swap (row-major; right before down) that would create a run
pub fn find_hint(grid: &Grid) -> Option<(Coord, Coord)> {
    let mut trial = grid.clone();
    for a in grid.coords() {
        for dir in [Direction::Right, Direction::Down] {
            let Some(b) = a.step(dir, grid.size()) else {
                continue;
            };
            trial.swap(a, b);
            let hit = in_run(&trial, a) || in_run(&trial, b);
            trial.swap(a, b);
            if hit {
                return Some((a, b));
            }
        }
    }
    None
}

pub fn has_valid_move(grid: &Grid) -> bool {
    find_hint(grid).is_some()
}
