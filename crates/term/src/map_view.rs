//! MapView: draws the adventure `LevelMap` into a canvas.
//!
//! Level positions are scaled to fit the viewport above an info panel for
//! the focused level. Links are drawn as dotted lines underneath the nodes.

use crate::adventure::{LevelMap, LevelNode};
use crate::board_view::Viewport;
use crate::canvas::{Canvas, GlyphStyle, Rgb};

const INFO_ROWS: u16 = 6;
const SEA: Rgb = Rgb::new(5, 25, 50);

#[derive(Debug, Clone, Copy, Default)]
pub struct MapView;

impl MapView {
    pub fn render(&self, map: &LevelMap, message: Option<&str>, viewport: Viewport) -> Canvas {
        let mut canvas = Canvas::new(viewport.width, viewport.height);
        self.render_into(map, message, viewport, &mut canvas);
        canvas
    }

    pub fn render_into(
        &self,
        map: &LevelMap,
        message: Option<&str>,
        viewport: Viewport,
        canvas: &mut Canvas,
    ) {
        canvas.resize(viewport.width, viewport.height);
        canvas.clear(GlyphStyle::fg_on(Rgb::new(40, 70, 100), SEA).glyph(' '));

        let area_h = viewport.height.saturating_sub(INFO_ROWS);
        let layout = Layout::fit(map.nodes(), viewport.width, area_h);
        let link = GlyphStyle::fg_on(Rgb::new(70, 120, 160), SEA);

        for node in map.nodes() {
            for id in &node.neighbors {
                // Draw each link once
                if *id < node.id {
                    continue;
                }
                if let Some(other) = map.node_by_id(*id) {
                    let from = layout.place(node);
                    let to = layout.place(other);
                    draw_link(canvas, from, to, link);
                }
            }
        }

        for (i, node) in map.nodes().iter().enumerate() {
            let mut style = node_style(node);
            if map.focused() == Some(i) {
                style = style.reverse();
            }
            let (label, x, y) = layout.label(node);
            canvas.put_str(x, y, &label, style);
        }

        self.draw_info(canvas, map, message, viewport, area_h);
    }

    /// Index of the level whose label covers terminal cell `(x, y)`
    pub fn node_at(&self, map: &LevelMap, viewport: Viewport, x: u16, y: u16) -> Option<usize> {
        let area_h = viewport.height.saturating_sub(INFO_ROWS);
        let layout = Layout::fit(map.nodes(), viewport.width, area_h);
        map.nodes().iter().position(|node| {
            let (label, lx, ly) = layout.label(node);
            ly == y && (lx..lx.saturating_add(label.len() as u16)).contains(&x)
        })
    }

    fn draw_info(
        &self,
        canvas: &mut Canvas,
        map: &LevelMap,
        message: Option<&str>,
        viewport: Viewport,
        top: u16,
    ) {
        let panel = GlyphStyle::fg_on(Rgb::new(210, 210, 210), Rgb::new(0, 0, 0));
        canvas.fill_rect(0, top, viewport.width, INFO_ROWS, ' ', panel);

        let mut y = top;
        match map.focused_node() {
            Some(node) => {
                let x = canvas.put_str(1, y, &node.name, panel.bold());
                let status = if node.completed {
                    "completed"
                } else if node.locked {
                    "locked"
                } else {
                    "open"
                };
                canvas.put_str(x + 2, y, status, node_style(node));
                y += 1;
                canvas.put_str(
                    1,
                    y,
                    &format!(
                        "{} | {} moves | target {}",
                        node.difficulty.as_str(),
                        node.move_budget,
                        node.target_score
                    ),
                    panel,
                );
                y += 1;
                if let Some(best) = node.best_score {
                    canvas.put_str(1, y, &format!("best {}", best), panel);
                    y += 1;
                }
                if let Some(item) = &node.reward {
                    canvas.put_str(1, y, &format!("reward: {}", item), panel.dim());
                    y += 1;
                }
            }
            None => {
                canvas.put_str(1, y, "no level is open", panel.dim());
                y += 1;
            }
        }

        if let Some(message) = message {
            canvas.put_str(1, y, message, GlyphStyle { fg: Rgb::new(240, 220, 140), ..panel });
        }
        let help = "arrows move  enter play  q quit";
        canvas.put_str(1, top + INFO_ROWS - 1, help, panel.dim());
    }
}

fn node_style(node: &LevelNode) -> GlyphStyle {
    if node.completed {
        GlyphStyle::fg_on(Rgb::new(110, 230, 140), SEA).bold()
    } else if node.locked {
        GlyphStyle::fg_on(Rgb::new(110, 110, 120), SEA).dim()
    } else {
        GlyphStyle::fg_on(Rgb::new(250, 230, 120), SEA).bold()
    }
}

/// Linear map from level positions to canvas cells
struct Layout {
    min_x: f32,
    min_y: f32,
    scale_x: f32,
    scale_y: f32,
    left: u16,
    top: u16,
}

impl Layout {
    const MARGIN: u16 = 3;

    fn fit(nodes: &[LevelNode], width: u16, height: u16) -> Self {
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for n in nodes {
            min_x = min_x.min(n.position.x);
            min_y = min_y.min(n.position.y);
            max_x = max_x.max(n.position.x);
            max_y = max_y.max(n.position.y);
        }
        if nodes.is_empty() {
            (min_x, min_y, max_x, max_y) = (0.0, 0.0, 0.0, 0.0);
        }

        let usable_w = width.saturating_sub(2 * Self::MARGIN).max(1) as f32;
        let usable_h = height.saturating_sub(2).max(1) as f32;
        let span_x = max_x - min_x;
        let span_y = max_y - min_y;
        let scale_x = if span_x > 0.0 { (usable_w - 1.0) / span_x } else { 0.0 };
        let scale_y = if span_y > 0.0 { (usable_h - 1.0) / span_y } else { 0.0 };

        Self {
            min_x,
            min_y,
            scale_x,
            scale_y,
            left: if span_x > 0.0 { Self::MARGIN } else { width / 2 },
            top: if span_y > 0.0 { 1 } else { height / 2 },
        }
    }

    /// `[id]` label centred on the node, with its starting cell
    fn label(&self, node: &LevelNode) -> (String, u16, u16) {
        let (x, y) = self.place(node);
        let label = format!("[{}]", node.id);
        let x = x.saturating_sub(label.len() as u16 / 2);
        (label, x, y)
    }

    fn place(&self, node: &LevelNode) -> (u16, u16) {
        let x = (node.position.x - self.min_x) * self.scale_x;
        let y = (node.position.y - self.min_y) * self.scale_y;
        (
            self.left.saturating_add(x.round().max(0.0) as u16),
            self.top.saturating_add(y.round().max(0.0) as u16),
        )
    }
}

fn draw_link(canvas: &mut Canvas, from: (u16, u16), to: (u16, u16), style: GlyphStyle) {
    let dx = to.0 as f32 - from.0 as f32;
    let dy = to.1 as f32 - from.1 as f32;
    let steps = dx.abs().max(dy.abs()) as u16;
    for i in 1..steps {
        let t = i as f32 / steps as f32;
        let x = (from.0 as f32 + dx * t).round() as u16;
        let y = (from.1 as f32 + dy * t).round() as u16;
        canvas.put_char(x, y, '·', style);
    }
}
