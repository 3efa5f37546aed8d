//! BoardView: draws a `MatchSnapshot` into a canvas.
//!
//! Pure (no I/O), so layouts can be checked in unit tests.

use crate::canvas::{Canvas, GlyphStyle, Rgb};
use crate::core::{MatchSnapshot, Phase};
use crate::types::{Coord, Outcome, Symbol, Tile};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Shell-side state drawn on top of the board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardHud {
    pub cursor: Coord,
    pub hint: Option<(Coord, Coord)>,
    pub title: String,
    pub message: Option<String>,
}

const BOARD_BG: Rgb = Rgb::new(10, 40, 70);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

pub struct BoardView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        // 3x1 keeps cells roughly square in most terminal fonts.
        Self {
            cell_w: 3,
            cell_h: 1,
        }
    }
}

impl BoardView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Top-left corner of the board frame for a given board size
    pub fn origin(&self, size: usize, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size(size);
        (
            viewport.width.saturating_sub(frame_w + 24) / 2,
            viewport.height.saturating_sub(frame_h) / 2,
        )
    }

    fn frame_size(&self, size: usize) -> (u16, u16) {
        (
            size as u16 * self.cell_w + 2,
            size as u16 * self.cell_h + 2,
        )
    }

    /// Board cell under terminal position `(x, y)`
    pub fn cell_at(&self, size: usize, viewport: Viewport, x: u16, y: u16) -> Option<Coord> {
        let (ox, oy) = self.origin(size, viewport);
        let col = x.checked_sub(ox + 1)? / self.cell_w;
        let row = y.checked_sub(oy + 1)? / self.cell_h;
        let at = Coord::new(row as usize, col as usize);
        (at.row < size && at.col < size).then_some(at)
    }

    pub fn render(&self, snap: &MatchSnapshot, hud: &BoardHud, viewport: Viewport) -> Canvas {
        let mut canvas = Canvas::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut canvas);
        canvas
    }

    /// Render into an existing canvas, reusing its allocation.
    pub fn render_into(
        &self,
        snap: &MatchSnapshot,
        hud: &BoardHud,
        viewport: Viewport,
        canvas: &mut Canvas,
    ) {
        canvas.resize(viewport.width, viewport.height);
        canvas.clear(GlyphStyle::default().glyph(' '));

        let (frame_w, frame_h) = self.frame_size(snap.size);
        let (start_x, start_y) = self.origin(snap.size, viewport);

        let border = GlyphStyle::fg_on(Rgb::new(120, 190, 220), PANEL_BG);
        canvas.draw_box(start_x, start_y, frame_w, frame_h, border);
        canvas.put_str(start_x + 2, start_y, &format!(" {} ", hud.title), border.bold());

        let busy = !snap.phase.accepts_input();
        for row in 0..snap.size {
            for col in 0..snap.size {
                let at = Coord::new(row, col);
                let mut style = GlyphStyle::fg_on(Rgb::new(90, 110, 130), BOARD_BG);
                let mut ch = '·';
                if let Some(tile) = snap.cell(at) {
                    let (glyph, fg) = tile_glyph(tile);
                    ch = glyph;
                    style.fg = fg;
                    style.bold = tile.is_power_up();
                }
                if busy {
                    style.dim = true;
                }
                if snap.selected == Some(at) {
                    style.bg = Rgb::new(200, 170, 60);
                    style.fg = Rgb::new(0, 0, 0);
                } else if hud.hint.is_some_and(|(a, b)| a == at || b == at) {
                    style.bg = Rgb::new(40, 100, 60);
                }
                if hud.cursor == at && snap.playable() {
                    style.reverse = true;
                }
                self.draw_cell(canvas, start_x, start_y, at, ch, style);
            }
        }

        self.draw_side_panel(canvas, snap, viewport, start_x + frame_w + 2, start_y);

        let help = GlyphStyle::fg_on(Rgb::new(140, 140, 140), PANEL_BG).dim();
        let help_y = start_y.saturating_add(frame_h);
        canvas.put_str(
            start_x,
            help_y,
            "arrows move  enter select  ? hint  r restart  esc back  q quit",
            help,
        );
        if let Some(message) = &hud.message {
            let style = GlyphStyle::fg_on(Rgb::new(240, 220, 140), PANEL_BG);
            canvas.put_str(start_x, help_y.saturating_add(1), message, style);
        }

        if let Some(outcome) = snap.outcome {
            let text = match outcome {
                Outcome::Won => " REEF CLEARED ",
                Outcome::OutOfMoves => " OUT OF MOVES ",
                Outcome::Ended => " SESSION ENDED ",
            };
            let style = GlyphStyle::fg_on(Rgb::new(255, 255, 255), Rgb::new(20, 20, 20)).bold();
            canvas.put_centered(start_x, frame_w, start_y + frame_h / 2, text, style);
        }
    }

    fn draw_cell(
        &self,
        canvas: &mut Canvas,
        start_x: u16,
        start_y: u16,
        at: Coord,
        ch: char,
        style: GlyphStyle,
    ) {
        let px = start_x + 1 + at.col as u16 * self.cell_w;
        let py = start_y + 1 + at.row as u16 * self.cell_h;
        canvas.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        canvas.put_char(px + self.cell_w / 2, py + self.cell_h / 2, ch, style);
    }

    fn draw_side_panel(
        &self,
        canvas: &mut Canvas,
        snap: &MatchSnapshot,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x.saturating_add(12) >= viewport.width {
            return;
        }
        let label = GlyphStyle::fg_on(Rgb::new(220, 220, 220), PANEL_BG).bold();
        let value = GlyphStyle::fg_on(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = start_y;
        canvas.put_str(panel_x, y, "SCORE", label);
        y += 1;
        if snap.scored {
            canvas.put_u32(panel_x, y, snap.score, value);
        } else {
            canvas.put_str(panel_x, y, "free play", value.dim());
        }
        y += 2;

        canvas.put_str(panel_x, y, "MOVES", label);
        y += 1;
        match snap.moves_remaining {
            Some(left) => canvas.put_u32(panel_x, y, left, value),
            None => canvas.put_str(panel_x, y, "unlimited", value.dim()),
        };
        y += 2;

        if let Some(target) = snap.target_score {
            canvas.put_str(panel_x, y, "TARGET", label);
            y += 1;
            canvas.put_u32(panel_x, y, target, value);
            y += 2;
        }

        canvas.put_str(panel_x, y, "COMBO", label);
        y += 1;
        canvas.put_u32(panel_x, y, snap.combo, value);
        y += 2;

        canvas.put_str(panel_x, y, "COLLECTED", label);
        y += 1;
        for (symbol, count) in snap.collected.iter() {
            if y >= viewport.height {
                break;
            }
            let style = GlyphStyle::fg_on(symbol_color(symbol), PANEL_BG);
            canvas.put_char(panel_x, y, symbol_char(symbol), style.bold());
            let x = canvas.put_str(panel_x + 2, y, symbol.as_str(), value);
            canvas.put_u32(x + 1, y, count, value);
            y += 1;
        }

        if let Phase::Resolving { .. } = snap.phase {
            canvas.put_str(panel_x, y.saturating_add(1), "cascading...", value.dim());
        }
    }
}

pub fn symbol_char(symbol: Symbol) -> char {
    match symbol {
        Symbol::Coral => 'C',
        Symbol::Shell => 'S',
        Symbol::Starfish => '*',
        Symbol::Pearl => 'o',
        Symbol::Kelp => 'K',
        Symbol::Urchin => 'U',
        Symbol::Anemone => 'A',
        Symbol::Seahorse => 'H',
    }
}

pub fn symbol_color(symbol: Symbol) -> Rgb {
    match symbol {
        Symbol::Coral => Rgb::new(255, 110, 110),
        Symbol::Shell => Rgb::new(240, 220, 180),
        Symbol::Starfish => Rgb::new(255, 165, 0),
        Symbol::Pearl => Rgb::new(250, 250, 250),
        Symbol::Kelp => Rgb::new(100, 220, 120),
        Symbol::Urchin => Rgb::new(170, 120, 230),
        Symbol::Anemone => Rgb::new(240, 100, 200),
        Symbol::Seahorse => Rgb::new(240, 220, 80),
    }
}

/// Glyph and colour for a tile; power-ups keep their symbol's colour
pub fn tile_glyph(tile: Tile) -> (char, Rgb) {
    match tile {
        Tile::Ordinary(s) => (symbol_char(s), symbol_color(s)),
        Tile::Wildcard => ('?', Rgb::new(255, 255, 255)),
        Tile::RowClear(s) => ('+', symbol_color(s)),
        Tile::AreaClear(s) => ('#', symbol_color(s)),
    }
}
