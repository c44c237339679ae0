//! Scoring module - row-count scoring, levels and gravity speed
//!
//! - Score: `LINE_SCORES[rows] * (level + 1)` per flush, using the level in
//!   force before the flush.
//! - Level: one level per `ROWS_PER_LEVEL` cleared rows.
//! - Gravity: `max(100, 1000 - (level + 1) * 100)` milliseconds per row.

use crate::types::{BASE_DROP_MS, DROP_STEP_MS, LINE_SCORES, MIN_DROP_INTERVAL_MS, ROWS_PER_LEVEL};

/// Calculate line clear score
/// rows: number of rows cleared together (1-4)
/// level: current level (0-based)
pub fn calculate_line_score(rows: usize, level: u32) -> u32 {
    if rows == 0 || rows >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[rows].saturating_mul(level.saturating_add(1))
}

/// Level management
/// Level increases every ROWS_PER_LEVEL rows cleared
pub fn calculate_level(rows_cleared: u32) -> u32 {
    rows_cleared / ROWS_PER_LEVEL
}

/// Gravity interval for a level, in milliseconds
pub fn drop_interval_ms(level: u32) -> u32 {
    let step = level.saturating_add(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS.saturating_sub(step).max(MIN_DROP_INTERVAL_MS)
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

        assert_eq!(calculate_line_score(1, 5), 40 * 6);
        assert_eq!(calculate_line_score(4, 5), 1200 * 6);

        // More than four rows at once cannot come from a single piece.
        assert_eq!(calculate_line_score(5, 0), 0);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0), 0);
        assert_eq!(calculate_level(9), 0);
        assert_eq!(calculate_level(10), 1);
        assert_eq!(calculate_level(29), 2);
        assert_eq!(calculate_level(100), 10);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(drop_interval_ms(0), 900);
        assert_eq!(drop_interval_ms(1), 800);
        assert_eq!(drop_interval_ms(7), 200);
        assert_eq!(drop_interval_ms(8), 100);
        assert_eq!(drop_interval_ms(9), 100);
        assert_eq!(drop_interval_ms(u32::MAX), 100);
    }
}
