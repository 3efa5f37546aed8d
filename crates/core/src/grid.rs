//! Grid module - the square board of tiles
//!
//! The grid is an N x N matrix (8x8 by default) where each cell holds a tile or,
//! while a cascade pass is clearing, nothing.
//! Uses a flat vector in row-major order (row * size + col).
//! Coordinates: (row, col), row 0 at the top; tiles fall toward higher rows.

use arrayvec::ArrayVec;

use crate::error::{ConfigError, EngineError};
use crate::rng::RandomSource;
use crate::types::{Cell, Coord, Direction, Symbol, Tile};

/// Produces fresh tiles for the initial board and for refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSpawner {
    symbol_count: usize,
    power_up_percent: u8,
}

impl TileSpawner {
    /// `symbol_count` is clamped to the symbol catalogue, `power_up_percent` to 100
    pub fn new(symbol_count: usize, power_up_percent: u8) -> Self {
        Self {
            symbol_count: symbol_count.clamp(1, Symbol::ALL.len()),
            power_up_percent: power_up_percent.min(100),
        }
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    pub fn power_up_percent(&self) -> u8 {
        self.power_up_percent
    }

    /// The active symbol set
    pub fn symbols(&self) -> &'static [Symbol] {
        &Symbol::ALL[..self.symbol_count]
    }

    /// Uniform draw from the active symbol set
    pub fn symbol<R: RandomSource>(&self, rng: &mut R) -> Symbol {
        self.symbols()[rng.next_below(self.symbol_count as u32) as usize]
    }

    /// Draw a refill tile: a power-up with the configured chance, otherwise an
    /// ordinary symbol.
    pub fn spawn<R: RandomSource>(&self, rng: &mut R) -> Tile {
        if !rng.roll_percent(self.power_up_percent) {
            return Tile::Ordinary(self.symbol(rng));
        }
        match rng.next_below(3) {
            0 => Tile::Wildcard,
            1 => Tile::RowClear(self.symbol(rng)),
            _ => Tile::AreaClear(self.symbol(rng)),
        }
    }
}

/// The game board - N x N cells using flat vector storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    /// Flat vector of cells, row-major order (row * size + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a board with every cell empty
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build a board from explicit rows (test fixtures, custom puzzles)
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, ConfigError> {
        let size = rows.len();
        if size == 0 {
            return Err(ConfigError::MalformedGrid("no rows".to_string()));
        }
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(ConfigError::MalformedGrid(format!(
                "row {} has {} cells, expected {}",
                r,
                row.len(),
                size
            )));
        }
        let cells = rows.into_iter().flatten().map(Some).collect();
        Ok(Self { size, cells })
    }

    /// Generate a starting board of ordinary symbols with no run already on it.
    ///
    /// Cells are filled row-major; a draw that would complete a run with the
    /// two cells to its left or the two cells above is redrawn.
    pub fn generate<R: RandomSource>(size: usize, spawner: &TileSpawner, rng: &mut R) -> Self {
        let mut grid = Self::empty(size);
        for row in 0..size {
            for col in 0..size {
                let at = Coord::new(row, col);
                let symbol = grid.pick_starting_symbol(at, spawner, rng);
                grid.set(at, Some(Tile::Ordinary(symbol)));
            }
        }
        grid
    }

    fn pick_starting_symbol<R: RandomSource>(
        &self,
        at: Coord,
        spawner: &TileSpawner,
        rng: &mut R,
    ) -> Symbol {
        let left = self.same_pair(at, Direction::Left);
        let up = self.same_pair(at, Direction::Up);
        let allowed = |s: Symbol| left != Some(s) && up != Some(s);

        for _ in 0..8 {
            let s = spawner.symbol(rng);
            if allowed(s) {
                return s;
            }
        }
        // At most two symbols are excluded, so with three or more one is left.
        spawner
            .symbols()
            .iter()
            .copied()
            .find(|s| allowed(*s))
            .unwrap_or_else(|| spawner.symbol(rng))
    }

    /// Symbol shared by the two cells before `at` in `dir`, if they agree
    fn same_pair(&self, at: Coord, dir: Direction) -> Option<Symbol> {
        let a = at.step(dir, self.size)?;
        let b = a.step(dir, self.size)?;
        let sa = self.tile(a)?.symbol()?;
        let sb = self.tile(b)?.symbol()?;
        (sa == sb).then_some(sa)
    }

    /// Calculate flat index from a coordinate
    #[inline(always)]
    fn index(&self, at: Coord) -> Option<usize> {
        if at.row >= self.size || at.col >= self.size {
            return None;
        }
        Some(at.row * self.size + at.col)
    }

    /// Side length of the board
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, at: Coord) -> bool {
        self.index(at).is_some()
    }

    /// Reject coordinates outside the board
    pub fn check(&self, at: Coord) -> Result<(), EngineError> {
        if self.contains(at) {
            Ok(())
        } else {
            Err(EngineError::InvalidCoordinate {
                row: at.row,
                col: at.col,
                size: self.size,
            })
        }
    }

    /// Get cell at `at`
    /// Returns None if out of bounds
    pub fn get(&self, at: Coord) -> Option<Cell> {
        self.index(at).map(|idx| self.cells[idx])
    }

    /// Tile at `at`, None if out of bounds or empty
    pub fn tile(&self, at: Coord) -> Option<Tile> {
        self.get(at).flatten()
    }

    /// Set cell at `at`
    /// Returns false if out of bounds
    pub fn set(&mut self, at: Coord, cell: Cell) -> bool {
        match self.index(at) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Empty the cell at `at`, returning what was there
    pub fn take(&mut self, at: Coord) -> Cell {
        self.index(at).and_then(|idx| self.cells[idx].take())
    }

    /// Exchange two cells
    /// Returns false (and changes nothing) if either is out of bounds
    pub fn swap(&mut self, a: Coord, b: Coord) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    /// Get a reference to the internal cells (row-major)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    /// One column, top to bottom
    pub fn column(&self, col: usize) -> Vec<Cell> {
        (0..self.size)
            .map(|row| self.cells[row * self.size + col])
            .collect()
    }

    /// Convert to nested rows for snapshots and display
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.size.max(1)).map(|r| r.to_vec()).collect()
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// The in-bounds 3x3 block centred on `at` (including `at`)
    pub fn area(&self, at: Coord) -> ArrayVec<Coord, 9> {
        let mut out = ArrayVec::new();
        for row in at.row.saturating_sub(1)..=at.row + 1 {
            for col in at.col.saturating_sub(1)..=at.col + 1 {
                let c = Coord::new(row, col);
                if self.contains(c) {
                    out.push(c);
                }
            }
        }
        out
    }

    /// Every cell in the row and the column through `at`
    pub fn cross(&self, at: Coord) -> Vec<Coord> {
        let mut out: Vec<Coord> = (0..self.size).map(|col| Coord::new(at.row, col)).collect();
        out.extend(
            (0..self.size)
                .filter(|row| *row != at.row)
                .map(|row| Coord::new(row, at.col)),
        );
        out
    }

    /// Slide the tiles of one column down over empty cells.
    ///
    /// Relative order is preserved and the empties end up as a contiguous
    /// prefix at the top. Returns the number of empty cells.
    pub fn compact_column(&mut self, col: usize) -> usize {
        if col >= self.size {
            return 0;
        }
        let size = self.size;
        let mut write_row = size;

        // Scan from bottom to top, moving each tile to the lowest free slot.
        for read_row in (0..size).rev() {
            let read = read_row * size + col;
            if self.cells[read].is_some() {
                write_row -= 1;
                if write_row != read_row {
                    let write = write_row * size + col;
                    self.cells[write] = self.cells[read].take();
                }
            }
        }
        write_row
    }

    /// Fill every empty cell with a fresh tile, top row first.
    /// Returns how many cells were filled.
    pub fn refill<R: RandomSource>(&mut self, spawner: &TileSpawner, rng: &mut R) -> usize {
        let mut filled = 0;
        for cell in self.cells.iter_mut().filter(|c| c.is_none()) {
            *cell = Some(spawner.spawn(rng));
            filled += 1;
        }
        filled
    }
}
