//! Canvas and style types for terminal rendering.

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
    pub reverse: bool,
}

impl GlyphStyle {
    pub const fn fg_on(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            dim: false,
            reverse: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub const fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn glyph(self, ch: char) -> Glyph {
        Glyph { ch, style: self }
    }
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self::fg_on(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0))
    }
}

/// One styled terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub style: GlyphStyle,
}

impl Default for Glyph {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: GlyphStyle::default(),
        }
    }
}

/// 2D grid of styled glyphs, flushed to the terminal by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    glyphs: Vec<Glyph>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            glyphs: vec![Glyph::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize, keeping the allocation when possible.
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        let len = (width as usize) * (height as usize);
        self.glyphs.resize(len, Glyph::default());
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Glyph> {
        self.idx(x, y).map(|i| self.glyphs[i])
    }

    /// Out-of-bounds writes are dropped
    pub fn set(&mut self, x: u16, y: u16, glyph: Glyph) {
        if let Some(i) = self.idx(x, y) {
            self.glyphs[i] = glyph;
        }
    }

    pub fn clear(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: GlyphStyle) {
        self.set(x, y, Glyph { ch, style });
    }

    /// Write a string, clipped at the right edge. Returns the column after it.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: GlyphStyle) -> u16 {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.put_char(cx, y, ch, style);
            cx += 1;
        }
        cx
    }

    pub fn put_u32(&mut self, x: u16, y: u16, value: u32, style: GlyphStyle) -> u16 {
        self.put_str(x, y, &value.to_string(), style)
    }

    /// Write `s` centred within `[x, x + w)`
    pub fn put_centered(&mut self, x: u16, w: u16, y: u16, s: &str, style: GlyphStyle) {
        let len = s.chars().count() as u16;
        let start = x.saturating_add(w.saturating_sub(len) / 2);
        self.put_str(start, y, s, style);
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: GlyphStyle) {
        for dy in 0..h {
            for dx in 0..w {
                self.put_char(x.saturating_add(dx), y.saturating_add(dy), ch, style);
            }
        }
    }

    /// Single-line box outline
    pub fn draw_box(&mut self, x: u16, y: u16, w: u16, h: u16, style: GlyphStyle) {
        if w < 2 || h < 2 {
            return;
        }

        self.put_char(x, y, '┌', style);
        self.put_char(x + w - 1, y, '┐', style);
        self.put_char(x, y + h - 1, '└', style);
        self.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            self.put_char(x + dx, y, '─', style);
            self.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            self.put_char(x, y + dy, '│', style);
            self.put_char(x + w - 1, y + dy, '│', style);
        }
    }
}
