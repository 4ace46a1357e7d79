//! Board module - manages the game grid
//!
//! The board is a 15x24 grid: four hidden buffer rows on top of a 20-row
//! visible playfield. Cells hold the color of the piece that landed there.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..14 (left to right), y ranges 0..23
//! (top to bottom). Rows 0..3 are the buffer.

use arrayvec::ArrayVec;

use crate::pieces::Shape;
use crate::types::{Cell, Color, PlaceError, BOARD_WIDTH, BUFFER_ROWS, TOTAL_HEIGHT, VISIBLE_HEIGHT};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (TOTAL_HEIGHT as usize);

/// Row indices, at most one per visible row
pub type RowSet = ArrayVec<usize, { VISIBLE_HEIGHT as usize }>;

/// The game board - 15 columns x 24 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= TOTAL_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Total height, buffer included
    pub fn height(&self) -> u8 {
        TOTAL_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether `shape` anchored at (x, y) hits a wall, the floor, or a filled cell.
    ///
    /// Minos above row 0 only collide with the side walls; the stack never
    /// reaches them.
    pub fn check_collision(&self, x: i8, y: i8, shape: &Shape) -> bool {
        shape.minos().any(|(col, row)| {
            let bx = x as i16 + col as i16;
            let by = y as i16 + row as i16;

            if bx < 0 || bx >= BOARD_WIDTH as i16 {
                return true;
            }
            if by >= TOTAL_HEIGHT as i16 {
                return true;
            }
            by >= 0 && self.is_occupied(bx as i8, by as i8)
        })
    }

    /// Exact negation of [`Board::check_collision`]
    pub fn is_valid_move(&self, x: i8, y: i8, shape: &Shape) -> bool {
        !self.check_collision(x, y, shape)
    }

    /// Lowest anchor row reachable by dropping `shape` straight down from `y`
    pub fn landing_y(&self, x: i8, y: i8, shape: &Shape) -> i8 {
        let mut drop_y = y;
        while self.is_valid_move(x, drop_y + 1, shape) {
            drop_y += 1;
        }
        drop_y
    }

    /// Write a shape's minos into the board.
    ///
    /// Every target is validated before anything is written, so a refused
    /// placement leaves the board untouched. Minos above row 0 are refused.
    pub fn place(&mut self, x: i8, y: i8, shape: &Shape, color: Color) -> Result<(), PlaceError> {
        for (col, row) in shape.minos() {
            match self.get(x + col, y + row) {
                None => return Err(PlaceError::OutOfBounds),
                Some(Some(_)) => return Err(PlaceError::Occupied),
                Some(None) => {}
            }
        }

        for (col, row) in shape.minos() {
            self.set(x + col, y + row, Some(color));
        }

        Ok(())
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= TOTAL_HEIGHT as usize {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Completed rows in the visible area, top to bottom.
    ///
    /// Buffer rows are never reported.
    pub fn full_visible_rows(&self) -> RowSet {
        (BUFFER_ROWS as usize..TOTAL_HEIGHT as usize)
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Remove the given rows and drop everything above them.
    ///
    /// Uses a two-pointer pass from the bottom; as many empty rows as were
    /// removed appear at the top, so the height never changes.
    pub fn remove_rows(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }

        let width = BOARD_WIDTH as usize;
        let mut write_y = TOTAL_HEIGHT as usize;

        for read_y in (0..TOTAL_HEIGHT as usize).rev() {
            if rows.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }
    }

    /// Clear all full visible rows and return the indices that were cleared
    pub fn clear_full_rows(&mut self) -> RowSet {
        let rows = self.full_visible_rows();
        self.remove_rows(&rows);
        rows
    }

    /// Whether anything sits in the topmost visible row
    pub fn is_topped_out(&self) -> bool {
        self.row(BUFFER_ROWS as usize).iter().any(|cell| cell.is_some())
    }

    /// One row as a slice
    pub fn row(&self, y: usize) -> &[Cell] {
        let width = BOARD_WIDTH as usize;
        let start = y * width;
        &self.cells[start..start + width]
    }

    /// Rows top to bottom, buffer included
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(BOARD_WIDTH as usize)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Fill row `y` with `color`, leaving the listed columns empty
    pub fn fill_row_except(&mut self, y: i8, color: Color, holes: &[i8]) {
        for x in 0..BOARD_WIDTH as i8 {
            if !holes.contains(&x) {
                self.set(x, y, Some(color));
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
