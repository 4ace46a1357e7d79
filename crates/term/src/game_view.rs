//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Only the visible rows are drawn; the buffer rows above them never show,
//! even when the active piece is partly inside them.

use crate::core::pieces::Shape;
use crate::core::{ColorResolver, GameSnapshot, Tetromino, Theme, ThemeStyle};
use crate::fb::{CellStyle, FrameBuffer};
use crate::types::{Color, BOARD_WIDTH, BUFFER_ROWS, VISIBLE_HEIGHT};

const BLOCK: char = '█';
const GHOST: char = '░';
const CLEARING: char = '▒';
const EMPTY: char = '·';

/// Rows reserved for the held piece preview
const HOLD_ROWS: u16 = 4;
/// Rows reserved per upcoming piece (spawn shapes are at most two tall)
const NEXT_ROWS: u16 = 3;

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

/// Terminal renderer for the game screen.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
    theme: Theme,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

/// Where the board frame landed in the framebuffer
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
            theme: Theme::default(),
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when
    /// the terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        let style = self.theme.style();
        let container = CellStyle::new(style.text, style.container_bg);

        fb.resize(viewport.width, viewport.height);
        fb.clear(container.cell(' '));

        let board_w = BOARD_WIDTH as u16 * self.cell_w;
        let board_h = VISIBLE_HEIGHT as u16 * self.cell_h;
        let frame = Frame {
            x: 0,
            y: 0,
            w: board_w + 2,
            h: board_h + 2,
        };
        let panel_w = 20;
        let total_w = frame.w + 2 + panel_w;
        let frame = Frame {
            x: viewport.width.saturating_sub(total_w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(frame.h) / 2,
                AnchorY::Top => 0,
            },
            ..frame
        };

        let bg = CellStyle::new(style.empty_cell, style.board_bg);
        fb.fill_rect(frame.x + 1, frame.y + 1, board_w, board_h, ' ', bg);
        draw_border(fb, frame, CellStyle::new(style.board_border, style.container_bg));

        self.draw_board(fb, snap, frame, &style);
        self.draw_side_panel(fb, snap, viewport, frame, &style);

        if snap.game_over {
            self.draw_overlay_text(fb, frame, "GAME OVER", &style);
            self.draw_overlay_hint(fb, frame, "r: new game", &style);
        } else if snap.is_paused {
            self.draw_overlay_text(fb, frame, "PAUSED", &style);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_board(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, frame: Frame, style: &ThemeStyle) {
        let buffer = BUFFER_ROWS as usize;

        for vy in 0..VISIBLE_HEIGHT as usize {
            let clearing = snap.completed_rows.contains(&vy);
            for x in 0..BOARD_WIDTH as usize {
                match snap.display_cell(x, vy + buffer, &self.theme) {
                    Some(color) if clearing => {
                        let s = CellStyle::new(color, style.board_bg).dim();
                        self.fill_cell(fb, frame, x as u16, vy as u16, CLEARING, s);
                    }
                    Some(color) => {
                        let s = CellStyle::new(color, style.board_bg).bold();
                        self.fill_cell(fb, frame, x as u16, vy as u16, BLOCK, s);
                    }
                    None => {
                        let s = CellStyle::new(style.board_border, style.board_bg).dim();
                        self.fill_cell(fb, frame, x as u16, vy as u16, EMPTY, s);
                    }
                }
            }
        }

        let Some(active) = snap.current_piece else {
            return;
        };
        let color = self.theme.resolve(active.tetromino.color);

        if let Some(ghost_y) = snap.ghost_y.filter(|&g| g != active.y) {
            let s = CellStyle::new(color, style.board_bg).dim();
            self.draw_piece_cells(fb, frame, &active.tetromino.shape, active.x, ghost_y, GHOST, s);
        }

        let s = CellStyle::new(color, style.board_bg).bold();
        self.draw_piece_cells(fb, frame, &active.tetromino.shape, active.x, active.y, BLOCK, s);
    }

    /// Draw a shape anchored at board coordinates, skipping buffer rows
    #[allow(clippy::too_many_arguments)]
    fn draw_piece_cells(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        shape: &Shape,
        x: i8,
        y: i8,
        ch: char,
        style: CellStyle,
    ) {
        for (col, row) in shape.minos() {
            let bx = x as i16 + col as i16;
            let vy = y as i16 + row as i16 - BUFFER_ROWS as i16;
            if (0..BOARD_WIDTH as i16).contains(&bx) && (0..VISIBLE_HEIGHT as i16).contains(&vy) {
                self.fill_cell(fb, frame, bx as u16, vy as u16, ch, style);
            }
        }
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, cell_x: u16, cell_y: u16, ch: char, style: CellStyle) {
        let px = frame.x + 1 + cell_x * self.cell_w;
        let py = frame.y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame: Frame,
        style: &ThemeStyle,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x.saturating_add(12) > viewport.width {
            return;
        }

        let label = CellStyle::new(style.text, style.container_bg).bold();
        let value = CellStyle::new(style.text, style.container_bg);

        let mut y = frame.y;
        for (name, v) in [
            ("SCORE", snap.score),
            ("HIGH", snap.high_score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x + 7, y, v, value);
            y = y.saturating_add(1);
        }
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "HOLD", label);
        if !snap.can_hold {
            fb.put_str(panel_x + 5, y, "(used)", value.dim());
        }
        y = y.saturating_add(1);
        if let Some(held) = snap.held_piece {
            self.draw_preview(fb, panel_x, y, &held, !snap.can_hold, style);
        } else {
            fb.put_str(panel_x, y, "-", value);
        }
        y = y.saturating_add(HOLD_ROWS + 1);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for piece in &snap.next_pieces {
            if y >= viewport.height {
                break;
            }
            self.draw_preview(fb, panel_x, y, piece, false, style);
            y = y.saturating_add(NEXT_ROWS);
        }
    }

    /// Draw a piece's current shape in a side-panel slot
    fn draw_preview(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        piece: &Tetromino,
        dim: bool,
        style: &ThemeStyle,
    ) {
        let color: Color = self.theme.resolve(piece.color);
        let mut s = CellStyle::new(color, style.container_bg);
        if dim {
            s = s.dim();
        }
        for (col, row) in piece.shape.minos() {
            let px = x + col as u16 * self.cell_w;
            let py = y + row as u16;
            fb.fill_rect(px, py, self.cell_w, 1, BLOCK, s);
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, frame: Frame, text: &str, style: &ThemeStyle) {
        let mid_y = frame.y.saturating_add(frame.h / 2);
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        let s = CellStyle::new(style.container_bg, style.text).bold();
        fb.put_str(x, mid_y, text, s);
    }

    fn draw_overlay_hint(&self, fb: &mut FrameBuffer, frame: Frame, text: &str, style: &ThemeStyle) {
        let y = frame.y.saturating_add(frame.h / 2).saturating_add(2);
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        fb.put_str(x, y, text, CellStyle::new(style.text, style.board_bg));
    }
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
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
