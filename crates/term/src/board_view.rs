//! BoardView: maps a [`Coordinator`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). Pieces are drawn at their *rendered*
//! positions, so collapses and refills are visible as falls.

use crate::camera::CameraFrame;
use crate::core::{CascadeReport, Coordinator};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::highlight::HighlightLayer;
use crate::types::{Coord, MatchValue, ScreenLayout, TileKind};

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

/// Host-side facts shown in the side panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusView {
    pub seed: u32,
    /// Most recent completed cascade, kept by the host after `take_report()`
    pub last_cascade: Option<CascadeReport>,
    pub cascades: u32,
}

const TILE_BG: Rgb = Rgb::new(30, 30, 40);
const OBSTACLE_BG: Rgb = Rgb::new(70, 70, 78);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

const PALETTE: [Rgb; 8] = [
    Rgb::new(220, 80, 80),
    Rgb::new(80, 200, 110),
    Rgb::new(80, 130, 230),
    Rgb::new(240, 210, 80),
    Rgb::new(200, 110, 220),
    Rgb::new(80, 220, 220),
    Rgb::new(255, 160, 60),
    Rgb::new(230, 230, 230),
];

/// Colour of a piece value.
pub fn value_color(value: MatchValue) -> Rgb {
    PALETTE[value.index() % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoardView;

impl BoardView {
    pub fn new() -> Self {
        Self
    }

    /// Where the board lands on screen for this viewport.
    pub fn layout(&self, game: &Coordinator, viewport: Viewport) -> ScreenLayout {
        let grid = game.grid();
        let columns = grid.width() as u16;
        let rows = grid.height() as u16;
        let camera = CameraFrame::fit_viewport(
            columns,
            rows,
            game.board().config().border_size,
            viewport.width,
            viewport.height,
        );
        let (cell_w, cell_h) = camera.cell_size(viewport.height);

        let frame_w = columns * cell_w + 2;
        let frame_h = rows * cell_h + 2;
        ScreenLayout {
            origin_x: viewport.width.saturating_sub(frame_w) / 2 + 1,
            origin_y: viewport.height.saturating_sub(frame_h) / 2 + 1,
            cell_w,
            cell_h,
            columns,
            rows,
        }
    }

    /// Render into an existing framebuffer and return the layout used, so
    /// pointer input can be mapped back onto the board.
    pub fn render_into(
        &self,
        game: &Coordinator,
        highlights: &HighlightLayer,
        status: &StatusView,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) -> ScreenLayout {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let layout = self.layout(game, viewport);
        let grid = game.grid();

        let frame_x = layout.origin_x - 1;
        let frame_y = layout.origin_y - 1;
        let frame_w = layout.columns * layout.cell_w + 2;
        let frame_h = layout.rows * layout.cell_h + 2;
        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        draw_border(fb, frame_x, frame_y, frame_w, frame_h, border);

        for tile in grid.tiles() {
            let (ch, style) = match tile.kind {
                TileKind::Obstacle => ('▒', CellStyle::new(Rgb::new(120, 120, 130), OBSTACLE_BG)),
                TileKind::Normal => match highlights.get(tile.coord) {
                    Some(v) => (' ', CellStyle::new(TILE_BG, value_color(v).scaled(1, 2))),
                    None => (
                        '·',
                        CellStyle {
                            dim: true,
                            ..CellStyle::new(Rgb::new(90, 90, 100), TILE_BG)
                        },
                    ),
                },
            };
            fill_cell(fb, &layout, tile.coord, ch, style);
        }

        for piece in grid.pieces() {
            let (x, y) = piece.position();
            let at = Coord::new(x.round() as i32, y.round() as i32);
            if !grid.is_within_bounds(at) {
                continue;
            }
            let bg = highlights
                .get(at)
                .map(|v| value_color(v).scaled(1, 2))
                .unwrap_or(TILE_BG);
            let style = CellStyle {
                bold: true,
                ..CellStyle::new(value_color(piece.value()), bg)
            };
            fill_cell(fb, &layout, at, '●', style);
        }

        self.draw_side_panel(fb, game, status, viewport, frame_x + frame_w, frame_y);
        layout
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        game: &Coordinator,
        highlights: &HighlightLayer,
        status: &StatusView,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, highlights, status, viewport, &mut fb);
        fb
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        game: &Coordinator,
        status: &StatusView,
        viewport: Viewport,
        frame_right: u16,
        start_y: u16,
    ) {
        let panel_x = frame_right.saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG)
        };
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let dim = CellStyle { dim: true, ..value };

        let mut y = start_y;
        fb.put_str(panel_x, y, "INPUT", label);
        y = y.saturating_add(1);
        fb.put_str(
            panel_x,
            y,
            if game.input_enabled() { "OPEN" } else { "LOCKED" },
            value,
        );
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "PHASE", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, game.phase().as_str(), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "CASCADES", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, status.cascades, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "LAST", label);
        y = y.saturating_add(1);
        match status.last_cascade {
            Some(report) => {
                fb.put_str(panel_x, y, "W", dim);
                fb.put_u32(panel_x + 2, y, report.waves, value);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "C", dim);
                fb.put_u32(panel_x + 2, y, report.pieces_cleared, value);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "R", dim);
                fb.put_u32(panel_x + 2, y, report.refills, value);
            }
            None => fb.put_str(panel_x, y, "-", value),
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "SEED", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, status.seed, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "q quit", dim);
        fb.put_str(panel_x, y.saturating_add(1), "r new", dim);
        fb.put_str(panel_x, y.saturating_add(2), "m matches", dim);
    }
}

fn fill_cell(fb: &mut FrameBuffer, layout: &ScreenLayout, at: Coord, ch: char, style: CellStyle) {
    if let Some((x, y)) = layout.screen_origin(at) {
        fb.fill_rect(x, y, layout.cell_w, layout.cell_h, ch, style);
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}
