//! RNG module - uniform piece generation and the preview queue
//!
//! Unlike bag randomizers, every draw picks a kind uniformly from the whole
//! pool, so repeats and droughts are possible. Each game also shuffles the
//! color palette onto the piece kinds.
//!
//! Also provides a simple LCG for deterministic testing.

use arrayvec::ArrayVec;

use crate::pieces::Tetromino;
use crate::theme::{default_color, AVAILABLE_COLORS};
use crate::types::{Color, PieceKind, QUEUE_LEN};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Infinite source of pieces with a per-game color assignment
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: SimpleRng,
    palette: [Color; PieceKind::COUNT],
}

impl PieceGenerator {
    /// Create a generator and shuffle its first palette
    pub fn new(seed: u32) -> Self {
        let mut generator = Self {
            rng: SimpleRng::new(seed),
            palette: PieceKind::ALL.map(default_color),
        };
        generator.shuffle_palette();
        generator
    }

    /// Re-deal colors to piece kinds.
    ///
    /// A plain shuffle of the palette mapped onto kinds in order; a kind may
    /// keep the color it had last game.
    pub fn shuffle_palette(&mut self) {
        let mut colors = AVAILABLE_COLORS;
        self.rng.shuffle(&mut colors);
        for (slot, color) in self.palette.iter_mut().zip(colors) {
            *slot = color;
        }
    }

    /// Color currently assigned to `kind`
    pub fn color_for(&self, kind: PieceKind) -> Color {
        self.palette[kind.index()]
    }

    pub fn palette(&self) -> &[Color; PieceKind::COUNT] {
        &self.palette
    }

    /// Draw a kind uniformly from the whole pool
    pub fn next_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.next_range(PieceKind::COUNT as u32) as usize]
    }

    /// Draw a fresh piece in spawn orientation with this game's color
    pub fn next_tetromino(&mut self) -> Tetromino {
        let kind = self.next_kind();
        Tetromino::new(kind, self.color_for(kind))
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Fixed-depth preview queue
#[derive(Debug, Clone, Default)]
pub struct PieceQueue {
    pieces: ArrayVec<Tetromino, QUEUE_LEN>,
}

impl PieceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Upcoming pieces, next first
    pub fn pieces(&self) -> &[Tetromino] {
        &self.pieces
    }

    pub fn peek(&self) -> Option<&Tetromino> {
        self.pieces.first()
    }

    /// Top the queue up to full depth
    pub fn fill(&mut self, generator: &mut PieceGenerator) {
        while !self.pieces.is_full() {
            self.pieces.push(generator.next_tetromino());
        }
    }

    /// Take the head and push one fresh piece onto the tail.
    ///
    /// An empty queue is filled first, so this always yields a piece and
    /// leaves the queue at full depth.
    pub fn advance(&mut self, generator: &mut PieceGenerator) -> Tetromino {
        self.fill(generator);
        let head = self.pieces.remove(0);
        self.pieces.push(generator.next_tetromino());
        head
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
    }
}
