//! Terminal frontend: draws session snapshots with the framebuffer renderer.

use anyhow::Result;

use crate::core::{GameSnapshot, Theme};
use crate::driver::Frontend;
use crate::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

pub struct TerminalFrontend {
    renderer: TerminalRenderer,
    view: GameView,
    fb: FrameBuffer,
}

impl TerminalFrontend {
    pub fn new() -> Self {
        Self {
            renderer: TerminalRenderer::new(),
            view: GameView::default(),
            fb: FrameBuffer::new(0, 0),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        self.renderer.enter()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.renderer.exit()
    }
}

impl Default for TerminalFrontend {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontend for TerminalFrontend {
    fn present(&mut self, snapshot: &GameSnapshot, theme: Theme) -> Result<()> {
        if self.view.theme() != theme {
            self.view.set_theme(theme);
            self.renderer.invalidate();
        }

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        self.view.render_into(snapshot, Viewport::new(w, h), &mut self.fb);
        self.renderer.draw_swap(&mut self.fb)
    }
}
