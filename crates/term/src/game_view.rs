//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{color, get_spawn_shape, GameSnapshot, Phase};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Cell as StageCell, PieceKind, STAGE_HEIGHT, STAGE_WIDTH};

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const FLASH_FG: Rgb = Rgb::new(255, 255, 255);

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Draws the stage, the side panel and the start / game-over overlays.
pub struct GameView {
    /// Stage cell width in terminal columns.
    cell_w: u16,
    /// Stage cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render a snapshot and the high-score ranking into an existing
    /// framebuffer, resizing it to the viewport first.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        ranking: &[u32],
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let stage_px_w = (STAGE_WIDTH as u16) * self.cell_w;
        let stage_px_h = (STAGE_HEIGHT as u16) * self.cell_h;
        let frame_w = stage_px_w + 2;
        let frame_h = stage_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let bg = CellStyle::new(Rgb::new(80, 80, 90), PLAY_BG);
        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        fb.fill_rect(start_x + 1, start_y + 1, stage_px_w, stage_px_h, ' ', bg);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for (y, row) in snap.stage.iter().enumerate() {
            let flashing = snap.is_clearing_row(y);
            for (x, cell) in row.iter().enumerate() {
                let (x, y) = (x as u16, y as u16);
                match (cell, flashing) {
                    (StageCell::Empty, _) => self.draw_empty_cell(fb, start_x, start_y, x, y),
                    (_, true) => {
                        let style = CellStyle {
                            bold: true,
                            ..CellStyle::new(FLASH_FG, PLAY_BG)
                        };
                        self.fill_cell_rect(fb, start_x, start_y, x, y, '▓', style);
                    }
                    (StageCell::Falling(kind), false) => {
                        self.draw_stage_cell(fb, start_x, start_y, x, y, *kind, true)
                    }
                    (StageCell::Merged(kind), false) => {
                        self.draw_stage_cell(fb, start_x, start_y, x, y, *kind, false)
                    }
                }
            }
        }

        self.draw_side_panel(fb, snap, ranking, viewport, start_x, start_y, frame_w);

        match snap.phase {
            Phase::NotStarted => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 0, "START");
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 2, "press space");
            }
            Phase::GameOver => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 0, "GAME OVER");
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 2, "space: restart");
            }
            Phase::Active | Phase::Clearing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, ranking: &[u32], viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, ranking, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
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

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = CellStyle {
            dim: true,
            ..CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG)
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '·', style);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_stage_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        kind: PieceKind,
        bold: bool,
    ) {
        let style = CellStyle {
            bold,
            ..CellStyle::new(color(kind), PLAY_BG)
        };
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    /// Draw a piece's spawn shape at panel coordinates, two columns per mino.
    /// Returns the number of rows used.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, kind: PieceKind, dim: bool) -> u16 {
        let shape = get_spawn_shape(kind);
        let top = shape.top_row() as i8;
        let style = CellStyle {
            dim,
            ..CellStyle::new(color(kind), PANEL_BG)
        };
        let mut rows = 0;
        for (col, row) in shape.minos() {
            let row = (row - top) as u16;
            let px = x.saturating_add(col as u16 * 2);
            fb.put_str(px, y.saturating_add(row), "██", style);
            rows = rows.max(row + 1);
        }
        rows
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        ranking: &[u32],
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG)
        };
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        let dim = CellStyle { dim: true, ..value };

        let mut y = start_y;
        for (name, n) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("ROWS", snap.rows_cleared),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), n, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        let used = if snap.is_started() {
            self.draw_preview(fb, panel_x, y, snap.next, false)
        } else {
            fb.put_str(panel_x, y, "-", value);
            1
        };
        y = y.saturating_add(used.max(2) + 1);

        let hold_label = if snap.can_hold { label } else { CellStyle { dim: true, ..label } };
        fb.put_str(panel_x, y, "HOLD", hold_label);
        y = y.saturating_add(1);
        let used = match snap.hold {
            Some(kind) => self.draw_preview(fb, panel_x, y, kind, !snap.can_hold),
            None => {
                fb.put_str(panel_x, y, "-", value);
                1
            }
        };
        y = y.saturating_add(used.max(2) + 1);

        fb.put_str(panel_x, y, "RANKING", label);
        y = y.saturating_add(1);
        if ranking.is_empty() {
            fb.put_str(panel_x, y, "-", dim);
        }
        for (i, score) in ranking.iter().enumerate() {
            if y >= viewport.height {
                break;
            }
            let w = fb.put_u32(panel_x, y, (i as u32) + 1, dim);
            fb.put_char(panel_x + w, y, '.', dim);
            fb.put_u32(panel_x + 4, y, *score, value);
            y = y.saturating_add(1);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        line: u16,
        text: &str,
    ) {
        let y = start_y.saturating_add(frame_h / 2).saturating_add(line);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle {
            bold: true,
            ..CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG)
        };
        fb.put_str(x, y, text, style);
    }
}
