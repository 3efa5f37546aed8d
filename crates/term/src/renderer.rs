//! Canvas output for a crossterm terminal.
//!
//! The renderer owns the previous [`Canvas`] and compares the next one glyph
//! by glyph. Differing glyphs on a row are grouped into `(x, y, len)` runs and
//! each run costs one cursor move; a style is only re-sent when it changes
//! along the way. A resize (or [`TerminalRenderer::invalidate`]) falls back to
//! a clear plus one run per row. Bytes are staged in a `Vec<u8>` so the encode
//! functions can be tested without a terminal.
//!
//! Mouse capture is switched on while the renderer owns the screen, so board
//! cells and map levels can be clicked.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::board_view::Viewport;
use crate::canvas::{Canvas, GlyphStyle, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<Canvas>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(32 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(EnableMouseCapture)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(DisableMouseCapture)?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Current terminal size
    pub fn viewport(&self) -> Result<Viewport> {
        let (width, height) = terminal::size()?;
        Ok(Viewport::new(width, height))
    }

    /// Force the next draw to be a full redraw (after a resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a canvas and swap it with the previous frame.
    ///
    /// Callers keep one canvas and pass it in every frame; after the call it
    /// holds the previous frame, ready to be overwritten.
    pub fn draw_swap(&mut self, canvas: &mut Canvas) -> Result<()> {
        let full = self.last.is_none();
        let mut prev = self
            .last
            .take()
            .unwrap_or_else(|| Canvas::new(canvas.width(), canvas.height()));
        let resized = prev.width() != canvas.width() || prev.height() != canvas.height();

        self.buf.clear();
        if full || resized {
            encode_full_into(canvas, &mut self.buf)?;
            prev.resize(canvas.width(), canvas.height());
        } else {
            encode_diff_into(&prev, canvas, &mut self.buf)?;
        }
        self.flush_buf()?;

        std::mem::swap(&mut prev, canvas);
        self.last = Some(prev);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode a full redraw into `out` without touching stdout.
pub fn encode_full_into(canvas: &Canvas, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut runs = RunEncoder::new(out);
    for y in 0..canvas.height() {
        runs.encode(canvas, 0, y, canvas.width())?;
    }
    runs.finish()
}

/// Encode only the changed runs between two frames of the same size.
pub fn encode_diff_into(prev: &Canvas, next: &Canvas, out: &mut Vec<u8>) -> Result<()> {
    let mut runs = RunEncoder::new(out);
    for (x, y, len) in changed_runs(prev, next) {
        runs.encode(next, x, y, len)?;
    }
    runs.finish()
}

/// Writes horizontal glyph runs, emitting SGR changes only when the style
/// differs from the last glyph written.
struct RunEncoder<'a> {
    out: &'a mut Vec<u8>,
    style: Option<GlyphStyle>,
}

impl<'a> RunEncoder<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn encode(&mut self, canvas: &Canvas, x: u16, y: u16, len: u16) -> Result<()> {
        if len == 0 {
            return Ok(());
        }
        self.out.queue(cursor::MoveTo(x, y))?;
        for glyph in (x..x.saturating_add(len)).map(|gx| canvas.get(gx, y).unwrap_or_default()) {
            if self.style != Some(glyph.style) {
                self.set_style(glyph.style)?;
            }
            self.out.queue(Print(glyph.ch))?;
        }
        Ok(())
    }

    fn set_style(&mut self, style: GlyphStyle) -> Result<()> {
        // Attributes are reset first so a dropped bold/dim/reverse does not leak.
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(SetForegroundColor(Color::from(style.fg)))?;
        self.out.queue(SetBackgroundColor(Color::from(style.bg)))?;
        for (on, attr) in [
            (style.bold, Attribute::Bold),
            (style.dim, Attribute::Dim),
            (style.reverse, Attribute::Reverse),
        ] {
            if on {
                self.out.queue(SetAttribute(attr))?;
            }
        }
        self.style = Some(style);
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    }
}

/// `(x, y, len)` runs of glyphs that differ; a size change dirties every row
fn changed_runs(prev: &Canvas, next: &Canvas) -> Vec<(u16, u16, u16)> {
    let w = next.width();
    let h = next.height();
    if prev.width() != w || prev.height() != h {
        return (0..h).map(|y| (0, y, w)).collect();
    }

    let mut runs = Vec::new();
    for y in 0..h {
        let mut x = 0;
        while x < w {
            if prev.get(x, y) == next.get(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            x += 1;
            while x < w && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            runs.push((start, y, x - start));
        }
    }
    runs
}
