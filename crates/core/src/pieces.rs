//! Pieces module - shape matrices, rotation, and wall kicks
//!
//! Every piece is a small binary matrix (at most 4x4). Rotation builds a new
//! matrix by transposing and reversing the rows, which turns the piece 90°
//! clockwise. There is no per-kind kick table: every piece tries the same six
//! offsets in order.

use serde::{Serialize, Serializer};

use crate::types::{Color, PieceKind};

/// Largest row/column count any shape can reach
pub const MAX_SHAPE_DIM: usize = 4;

/// Offset of a single mino relative to the shape's top-left corner, as (col, row)
pub type MinoOffset = (i8, i8);

/// Kick offsets tried by [`try_rotate`], in priority order.
///
/// Only sideways and upward nudges: a rotation never pushes a piece down.
pub const WALL_KICKS: [(i8, i8); 6] = [(0, 0), (-1, 0), (1, 0), (0, -1), (-1, -1), (1, -1)];

/// A binary shape matrix.
///
/// Stored inline so pieces stay `Copy`; cells outside `rows x cols` are
/// always empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    bits: [[bool; MAX_SHAPE_DIM]; MAX_SHAPE_DIM],
}

impl Shape {
    /// Build a shape from rows of 0/1 values.
    ///
    /// Rows are expected to share one length; anything past 4x4 is ignored.
    pub fn from_matrix(matrix: &[&[u8]]) -> Self {
        let rows = matrix.len().min(MAX_SHAPE_DIM);
        let cols = matrix
            .iter()
            .map(|r| r.len())
            .max()
            .unwrap_or(0)
            .min(MAX_SHAPE_DIM);

        let mut bits = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        for (r, row) in matrix.iter().take(rows).enumerate() {
            for (c, &v) in row.iter().take(cols).enumerate() {
                bits[r][c] = v != 0;
            }
        }

        Self {
            rows: rows as u8,
            cols: cols as u8,
            bits,
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Occupied cells as (col, row) offsets, row-major
    pub fn minos(&self) -> impl Iterator<Item = MinoOffset> + '_ {
        (0..self.rows as usize).flat_map(move |r| {
            (0..self.cols as usize)
                .filter(move |&c| self.bits[r][c])
                .map(move |c| (c as i8, r as i8))
        })
    }

    /// Number of occupied cells
    pub fn mino_count(&self) -> usize {
        self.minos().count()
    }

    /// The shape turned 90° clockwise (transpose, then reverse each row).
    ///
    /// ```
    /// use tetrion_core::pieces::Shape;
    ///
    /// let j = Shape::from_matrix(&[&[1, 0, 0], &[1, 1, 1]]);
    /// let turned = j.rotated_cw();
    /// assert_eq!(turned.to_matrix(), vec![vec![1, 1], vec![1, 0], vec![1, 0]]);
    /// ```
    pub fn rotated_cw(&self) -> Self {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut bits = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        for (i, out_row) in bits.iter_mut().enumerate().take(cols) {
            for (j, cell) in out_row.iter_mut().enumerate().take(rows) {
                *cell = self.bits[rows - 1 - j][i];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            bits,
        }
    }

    /// Matrix form (rows of 0/1)
    pub fn to_matrix(&self) -> Vec<Vec<u8>> {
        (0..self.rows as usize)
            .map(|r| {
                (0..self.cols as usize)
                    .map(|c| u8::from(self.bits[r][c]))
                    .collect()
            })
            .collect()
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_matrix().serialize(serializer)
    }
}

/// Spawn-orientation shape for a piece kind
pub fn base_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::A => Shape::from_matrix(&[&[1]]),
        PieceKind::I => Shape::from_matrix(&[&[1, 1, 1, 1]]),
        PieceKind::J => Shape::from_matrix(&[&[1, 0, 0], &[1, 1, 1]]),
        PieceKind::L => Shape::from_matrix(&[&[0, 0, 1], &[1, 1, 1]]),
        PieceKind::O => Shape::from_matrix(&[&[1, 1], &[1, 1]]),
        PieceKind::S => Shape::from_matrix(&[&[0, 1, 1], &[1, 1, 0]]),
        PieceKind::S2 => Shape::from_matrix(&[&[1, 1, 0], &[0, 1, 1]]),
        PieceKind::T => Shape::from_matrix(&[&[0, 1, 0], &[1, 1, 1]]),
        PieceKind::Z => Shape::from_matrix(&[&[1, 1, 0], &[0, 1, 1]]),
        PieceKind::U => Shape::from_matrix(&[&[1, 0, 1], &[1, 1, 1]]),
    }
}

/// A piece instance: kind, current shape, and the color it was dealt with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub shape: Shape,
    pub color: Color,
}

impl Tetromino {
    /// Fresh piece in spawn orientation
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            shape: base_shape(kind),
            color,
        }
    }
}

/// Try to rotate a shape clockwise with wall kicks.
///
/// `fits(x, y, shape)` reports whether the shape can sit at that anchor.
/// Returns the rotated shape and the kick offset that was used, or `None` if
/// every offset collides.
pub fn try_rotate(
    shape: &Shape,
    x: i8,
    y: i8,
    fits: impl Fn(i8, i8, &Shape) -> bool,
) -> Option<(Shape, (i8, i8))> {
    let rotated = shape.rotated_cw();

    WALL_KICKS
        .iter()
        .copied()
        .find(|&(dx, dy)| fits(x + dx, y + dy, &rotated))
        .map(|kick| (rotated, kick))
}
