//! Scoring module - line clears, drop bonuses and level progression
//!
//! Line clears use the superlinear `LINE_SCORES` table multiplied by
//! `(level + 1)`. Drops earn a flat bonus per row travelled.

use crate::types::{
    BASE_GRAVITY_MS, GRAVITY_INTERVALS, GRAVITY_INTERVAL_FLOOR_MS, HARD_DROP_POINTS,
    LINES_PER_LEVEL, LINE_SCORES, SOFT_DROP_POINTS,
};

/// Calculate line clear score
/// lines: number of rows cleared by one lock (0-5)
/// level: current level (0-based), before the clear is counted
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    let base_score = LINE_SCORES.get(lines).copied().unwrap_or(0);
    base_score.saturating_mul(level.saturating_add(1))
}

/// Calculate drop score
/// Soft drop: 1 point per row
/// Hard drop: 2 points per row
pub fn calculate_drop_score(rows: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        rows * HARD_DROP_POINTS
    } else {
        rows * SOFT_DROP_POINTS
    }
}

/// Level increases every 10 lines cleared
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL
}

/// Suggested gravity interval for a level, clamped at the floor.
///
/// The simulation never reads this; hosts use it to schedule gravity ticks.
pub fn gravity_interval_ms(level: u32) -> u32 {
    GRAVITY_INTERVALS
        .get(level as usize)
        .copied()
        .unwrap_or(GRAVITY_INTERVAL_FLOOR_MS)
}

/// Same curve rescaled so level 0 ticks every `base_ms`
pub fn scaled_gravity_interval_ms(level: u32, base_ms: u32) -> u32 {
    let scaled = u64::from(gravity_interval_ms(level)) * u64::from(base_ms)
        / u64::from(BASE_GRAVITY_MS);
    (scaled as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(calculate_line_score(0, 0), 0);
        assert_eq!(calculate_line_score(1, 0), 40);
        assert_eq!(calculate_line_score(2, 0), 100);
        assert_eq!(calculate_line_score(3, 0), 300);
        assert_eq!(calculate_line_score(4, 0), 1200);
        assert_eq!(calculate_line_score(4, 1), 2400);
        assert_eq!(calculate_line_score(1, 9), 400);
        assert_eq!(calculate_line_score(5, 0), 2000);
        assert_eq!(calculate_line_score(6, 0), 0);
    }

    #[test]
    fn test_drop_scores() {
        assert_eq!(calculate_drop_score(1, false), 1);
        assert_eq!(calculate_drop_score(18, true), 36);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0), 0);
        assert_eq!(calculate_level(9), 0);
        assert_eq!(calculate_level(10), 1);
        assert_eq!(calculate_level(25), 2);
    }

    #[test]
    fn test_gravity_intervals() {
        assert_eq!(gravity_interval_ms(0), 1000);
        assert_eq!(gravity_interval_ms(8), 160);
        assert_eq!(gravity_interval_ms(9), 120);
        assert_eq!(gravity_interval_ms(99), 120);
        assert_eq!(scaled_gravity_interval_ms(0, 500), 500);
        assert_eq!(scaled_gravity_interval_ms(3, 2000), 1000);
        assert_eq!(scaled_gravity_interval_ms(9, 0), 1);
    }
}
