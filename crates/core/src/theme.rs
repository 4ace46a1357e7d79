//! Theme module - color palette and display-color resolution
//!
//! The engine stores a color identity per cell. What actually gets drawn is
//! decided by a [`ColorResolver`] supplied by the presentation layer, so a
//! theme switch never rewrites board state.

use crate::types::{Color, PieceKind};

/// Colors shuffled onto piece kinds at the start of every game
pub const AVAILABLE_COLORS: [Color; 16] = [
    Color::rgb(0xef, 0x44, 0x44), // red
    Color::rgb(0xf9, 0x73, 0x16), // orange
    Color::rgb(0xea, 0xb3, 0x08), // yellow
    Color::rgb(0x22, 0xc5, 0x5e), // green
    Color::rgb(0x06, 0xb6, 0xd4), // cyan
    Color::rgb(0x3b, 0x82, 0xf6), // blue
    Color::rgb(0x8b, 0x5c, 0xf6), // violet
    Color::rgb(0xa8, 0x55, 0xf7), // purple
    Color::rgb(0xec, 0x48, 0x99), // pink
    Color::rgb(0xf4, 0x3f, 0x5e), // rose
    Color::rgb(0x84, 0xcc, 0x16), // lime
    Color::rgb(0x10, 0xb9, 0x81), // emerald
    Color::rgb(0x14, 0xb8, 0xa6), // teal
    Color::rgb(0x63, 0x66, 0xf1), // indigo
    Color::rgb(0xd9, 0x46, 0xef), // fuchsia
    Color::rgb(0xf5, 0x9e, 0x0b), // amber
];

/// Single ink color used for every block in the classic theme
pub const CLASSIC_INK: Color = Color::rgb(0x2d, 0x33, 0x19);

/// Fixed per-kind color, used before a palette has been shuffled
pub fn default_color(kind: PieceKind) -> Color {
    match kind {
        PieceKind::A | PieceKind::S | PieceKind::S2 => Color::rgb(0x22, 0xc5, 0x5e),
        PieceKind::I => Color::rgb(0x06, 0xb6, 0xd4),
        PieceKind::J => Color::rgb(0x3b, 0x82, 0xf6),
        PieceKind::L => Color::rgb(0xf9, 0x73, 0x16),
        PieceKind::O => Color::rgb(0xea, 0xb3, 0x08),
        PieceKind::T => Color::rgb(0xa8, 0x55, 0xf7),
        PieceKind::Z => Color::rgb(0xef, 0x44, 0x44),
        PieceKind::U => Color::rgb(0xec, 0x48, 0x99),
    }
}

/// Maps a stored color identity to the color that should be displayed.
pub trait ColorResolver {
    fn resolve(&self, color: Color) -> Color;
}

impl<F> ColorResolver for F
where
    F: Fn(Color) -> Color,
{
    fn resolve(&self, color: Color) -> Color {
        self(color)
    }
}

/// Board and container colors for a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeStyle {
    pub board_bg: Color,
    pub board_border: Color,
    pub empty_cell: Color,
    pub container_bg: Color,
    /// Labels and numbers drawn on `container_bg`
    pub text: Color,
    /// Overrides every block color when set
    pub block: Option<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Colorful,
    /// Handheld-style green: every block drawn in [`CLASSIC_INK`]
    Classic,
}

impl Theme {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "colorful" => Some(Theme::Colorful),
            "classic" => Some(Theme::Classic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Colorful => "colorful",
            Theme::Classic => "classic",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Colorful => Theme::Classic,
            Theme::Classic => Theme::Colorful,
        }
    }

    pub fn style(&self) -> ThemeStyle {
        match self {
            Theme::Colorful => ThemeStyle {
                board_bg: Color::rgb(0xf3, 0xf4, 0xf6),
                board_border: Color::rgb(0xe5, 0xe7, 0xeb),
                empty_cell: Color::rgb(0xf3, 0xf4, 0xf6),
                container_bg: Color::rgb(0xe5, 0xe7, 0xeb),
                text: Color::rgb(0x1f, 0x29, 0x37),
                block: None,
            },
            Theme::Classic => ThemeStyle {
                board_bg: Color::rgb(0x9c, 0xa8, 0x94),
                board_border: Color::rgb(0x8b, 0x8d, 0x7a),
                empty_cell: Color::rgb(0x9c, 0xa8, 0x94),
                container_bg: Color::rgb(0xb8, 0xc5, 0xa6),
                text: CLASSIC_INK,
                block: Some(CLASSIC_INK),
            },
        }
    }
}

impl ColorResolver for Theme {
    fn resolve(&self, color: Color) -> Color {
        self.style().block.unwrap_or(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_overrides_every_color() {
        for c in AVAILABLE_COLORS {
            assert_eq!(Theme::Classic.resolve(c), CLASSIC_INK);
            assert_eq!(Theme::Colorful.resolve(c), c);
        }
    }

    #[test]
    fn test_closure_resolver() {
        let invert = |c: Color| Color::rgb(255 - c.r, 255 - c.g, 255 - c.b);
        assert_eq!(invert.resolve(Color::rgb(0, 10, 255)), Color::rgb(255, 245, 0));
    }

    #[test]
    fn test_theme_names() {
        assert_eq!(Theme::from_str("Classic"), Some(Theme::Classic));
        assert_eq!(Theme::from_str(Theme::Colorful.as_str()), Some(Theme::Colorful));
        assert_eq!(Theme::from_str("neon"), None);
        assert_eq!(Theme::Colorful.toggled(), Theme::Classic);
    }

    #[test]
    fn test_palette_covers_every_kind() {
        assert!(AVAILABLE_COLORS.len() >= PieceKind::COUNT);
    }
}
