//! GameView: maps a [`BoardSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{BoardSnapshot, RoundPhase};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Color, Position};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_MIN_WIDTH: u16 = 12;

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

/// Round and cursor state drawn next to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudView {
    pub phase: RoundPhase,
    pub remaining_seconds: u32,
    pub cursor: Option<Position>,
    pub picked: Option<Position>,
}

impl Default for HudView {
    fn default() -> Self {
        Self {
            phase: RoundPhase::Waiting,
            remaining_seconds: 0,
            cursor: None,
            picked: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the gem board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
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

    /// Render the board and HUD into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(
        &self,
        snap: &BoardSnapshot,
        hud: &HudView,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().glyph(' '));

        let board_px_w = (snap.columns as u16) * self.cell_w;
        let board_px_h = (snap.rows as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let border = if snap.input_enabled {
            border
        } else {
            border.dim()
        };

        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            board_px_w,
            board_px_h,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG),
        );
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for row in 0..snap.rows {
            for column in 0..snap.columns {
                let (ch, mut style) = match snap.cell(column, row) {
                    Some(color) if snap.is_marked(column, row) => {
                        ('▒', CellStyle::new(gem_rgb(color), BOARD_BG).bold())
                    }
                    Some(color) => ('█', CellStyle::new(gem_rgb(color), BOARD_BG)),
                    None => ('·', CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim()),
                };

                let here = Position::new(column, row);
                if hud.picked == Some(here) {
                    style.bg = Rgb::new(90, 90, 110);
                    style.bold = true;
                }
                if hud.cursor == Some(here) && hud.phase == RoundPhase::Playing {
                    style.reverse = true;
                }

                self.fill_cell_rect(fb, start_x, start_y, column as u16, row as u16, ch, style);
            }
        }

        self.draw_side_panel(fb, snap, hud, viewport, start_x, start_y, frame_w);

        match hud.phase {
            RoundPhase::Waiting => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PRESS SPACE")
            }
            RoundPhase::Finished => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "TIME UP")
            }
            RoundPhase::Playing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &BoardSnapshot, hud: &HudView, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    /// Map a terminal coordinate back to a board cell, for mouse picks.
    pub fn hit_test(
        &self,
        snap: &BoardSnapshot,
        viewport: Viewport,
        x: u16,
        y: u16,
    ) -> Option<Position> {
        let frame_w = (snap.columns as u16) * self.cell_w + 2;
        let frame_h = (snap.rows as u16) * self.cell_h + 2;
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let px = x.checked_sub(start_x + 1)?;
        let py = y.checked_sub(start_y + 1)?;
        let column = px / self.cell_w;
        let row = py / self.cell_h;
        let position = Position::new(u8::try_from(column).ok()?, u8::try_from(row).ok()?);
        snap.contains(position).then_some(position)
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

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &BoardSnapshot,
        hud: &HudView,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < PANEL_MIN_WIDTH {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        let mut y = start_y;
        fb.put_str(panel_x, y, "TIME", label);
        y = y.saturating_add(1);
        let time_style = if hud.remaining_seconds <= 10 && hud.phase == RoundPhase::Playing {
            CellStyle {
                fg: Rgb::new(240, 90, 90),
                ..value
            }
        } else {
            value
        };
        fb.put_u32(panel_x, y, hud.remaining_seconds, time_style);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "STATE", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, snap.state.as_str(), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "CASCADE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.cascade, value);
        y = y.saturating_add(2);

        let hint = value.dim();
        for line in ["arrows move", "space pick", "esc cancel", "q quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, hint);
            y = y.saturating_add(1);
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn gem_rgb(color: Color) -> Rgb {
    match color {
        Color::Red => Rgb::new(220, 70, 70),
        Color::Green => Rgb::new(90, 200, 100),
        Color::Blue => Rgb::new(80, 130, 230),
        Color::Purple => Rgb::new(180, 100, 220),
        Color::Yellow => Rgb::new(240, 210, 70),
    }
}
