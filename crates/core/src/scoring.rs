//! Scoring and gravity speed tables.
//!
//! Classic scoring: simultaneous clears of {1,2,3,4} rows award
//! {40,100,300,1200} points times `(level + 1)`, with the level in effect
//! before the cleared lines are counted. Gravity is a frames-per-cell
//! lookup at 60 logical frames per second.

use blockfall_types::{FRAMES_PER_SEC, INITIAL_FRAMES_PER_CELL, LINE_SCORES};

/// Points awarded for clearing `rows` rows at once at `level`.
pub fn line_score(rows: usize, level: u32) -> u32 {
    if rows == 0 || rows > 4 {
        return 0;
    }
    LINE_SCORES[rows] * (level + 1)
}

/// Level derived from total lines cleared (one level per 10 lines).
pub fn level_for_lines(lines: u32) -> u32 {
    lines / 10
}

/// Gravity speed for a level, in frames per cell.
///
/// 48 at level 0, dropping 5 frames per level through level 8, then the
/// slow taper down to the 1-frame terminal velocity.
pub fn frames_per_cell(level: u32) -> u32 {
    match level {
        0..=8 => INITIAL_FRAMES_PER_CELL - level * 5,
        9..=18 => 9 - level / 3,
        19..=28 => 2,
        _ => 1,
    }
}

/// Gravity interval for a level in milliseconds.
pub fn fall_interval_ms(level: u32) -> u32 {
    frames_per_cell(level) * 1000 / FRAMES_PER_SEC
}
