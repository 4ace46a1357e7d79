//! Scoring module - linear line scoring, levels, and gravity speed
//!
//! Score is strictly linear in cleared lines: four lines at once are worth
//! exactly four single clears. Each level-up shortens the gravity interval by
//! a fixed factor down to a floor.

use crate::types::{
    INITIAL_DROP_MS, INITIAL_LEVEL, LINES_PER_LEVEL, MIN_DROP_MS, POINTS_PER_LINE,
    SPEED_DENOMINATOR, SPEED_NUMERATOR,
};

/// Points for clearing `lines` rows at once
pub fn line_clear_points(lines: u32) -> u32 {
    lines.saturating_mul(POINTS_PER_LINE)
}

/// Whether `total_lines` has earned a level beyond `level`.
///
/// Levels start at 1, so level `n` is due once `total_lines / 10 >= n`.
pub fn level_up_due(total_lines: u32, level: u32) -> bool {
    total_lines / LINES_PER_LEVEL > level.saturating_sub(1)
}

/// Gravity interval after one level-up (× 4/5, truncated, floored)
pub fn next_drop_ms(current_ms: u32) -> u32 {
    let scaled = (current_ms as u64 * SPEED_NUMERATOR as u64) / SPEED_DENOMINATOR as u64;
    (scaled as u32).max(MIN_DROP_MS)
}

/// What a single line clear changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    pub points: u32,
    pub leveled_up: bool,
}

/// Score, lines, level, and the gravity interval they imply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub drop_ms: u32,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            score: 0,
            lines: 0,
            level: INITIAL_LEVEL,
            drop_ms: INITIAL_DROP_MS,
        }
    }

    /// Credit `cleared` lines.
    ///
    /// At most one level is gained per clear; a single placement cannot
    /// cover more than ten lines.
    pub fn apply_clear(&mut self, cleared: u32) -> ClearOutcome {
        if cleared == 0 {
            return ClearOutcome::default();
        }

        let points = line_clear_points(cleared);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(cleared);

        let leveled_up = level_up_due(self.lines, self.level);
        if leveled_up {
            self.level += 1;
            self.drop_ms = next_drop_ms(self.drop_ms);
        }

        ClearOutcome { points, leveled_up }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}
