//! Scoring, garbage table and level-scaled gravity

use std::time::Duration;

/// Points for every cleared row
pub const LINE_CLEAR_BONUS: u64 = 10;
/// Extra points for a tetris (more than 3 rows at once)
pub const TETRIS_BONUS: u64 = 30;
/// Rows strictly above this count make a tetris
pub const TETRIS_THRESHOLD: usize = 3;

/// Garbage rows sent to the opponent for one lock's clear count.
///
/// Only strictly more than 3 rows is a tetris; exactly 3 sends what a double does.
pub fn garbage_for_clear(cleared: usize) -> u32 {
    if cleared > TETRIS_THRESHOLD {
        3
    } else if cleared > 1 {
        1
    } else {
        0
    }
}

/// Running totals for one board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Score {
    pub points: u64,
    pub lines: u32,
    pub level: u32,
    pub tetris_count: u32,
    /// Locks that cleared at least one row
    pub total_clear_events: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add drop distance collected by the piece being locked
    pub fn add_drop(&mut self, cells: u32) {
        self.points += cells as u64;
    }

    /// Record the rows cleared by one lock. Returns true for a tetris.
    pub fn add_clear(&mut self, cleared: usize, lines_per_level: u32) -> bool {
        if cleared == 0 {
            return false;
        }
        self.points += LINE_CLEAR_BONUS * cleared as u64;
        self.lines += cleared as u32;
        self.total_clear_events += 1;
        self.level = self.lines / lines_per_level.max(1);

        let tetris = cleared > TETRIS_THRESHOLD;
        if tetris {
            self.points += TETRIS_BONUS;
            self.tetris_count += 1;
        }
        tetris
    }

    /// Percentage of clearing locks that were tetrises
    pub fn tetris_rate(&self) -> f32 {
        if self.total_clear_events == 0 {
            return 0.0;
        }
        self.tetris_count as f32 / self.total_clear_events as f32 * 100.0
    }
}

/// Level-scaled gravity: `base * multiplier^level`, floored at `min`
pub fn fall_interval(base: Duration, multiplier: f64, level: u32, min: Duration) -> Duration {
    let factor = multiplier.powi(level.min(i32::MAX as u32) as i32);
    let nanos = (base.as_nanos() as f64 * factor).round();
    Duration::from_nanos(nanos.max(0.0) as u64).max(min)
}

/// Soft drop interval: the smaller of the fixed soft-drop interval and half the normal one
pub fn soft_drop_interval(normal: Duration, soft_min: Duration) -> Duration {
    soft_min.min(normal / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_clear() {
        let mut score = Score::new();
        assert!(!score.add_clear(1, 10));
        assert_eq!(score.points, 10);
        assert_eq!(score.lines, 1);
        assert_eq!(score.total_clear_events, 1);
    }

    #[test]
    fn test_tetris() {
        let mut score = Score::new();
        assert!(score.add_clear(4, 10));
        assert_eq!(score.points, 40 + TETRIS_BONUS);
        assert_eq!(score.tetris_count, 1);
    }

    #[test]
    fn test_three_rows_is_not_tetris() {
        let mut score = Score::new();
        assert!(!score.add_clear(3, 10));
        assert_eq!(score.points, 30);
        assert_eq!(score.tetris_count, 0);
    }

    #[test]
    fn test_no_clear_changes_nothing() {
        let mut score = Score::new();
        assert!(!score.add_clear(0, 10));
        assert_eq!(score, Score::new());
    }

    #[test]
    fn test_garbage_table() {
        assert_eq!(garbage_for_clear(0), 0);
        assert_eq!(garbage_for_clear(1), 0);
        assert_eq!(garbage_for_clear(2), 1);
        assert_eq!(garbage_for_clear(3), 1);
        assert_eq!(garbage_for_clear(4), 3);
    }

    #[test]
    fn test_level_up() {
        let mut score = Score::new();
        for _ in 0..10 {
            score.add_clear(1, 10);
        }
        assert_eq!(score.level, 1);
    }

    #[test]
    fn test_tetris_rate() {
        let mut score = Score::new();
        assert_eq!(score.tetris_rate(), 0.0);
        score.add_clear(4, 10);
        score.add_clear(1, 10);
        assert!((score.tetris_rate() - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fall_interval_scales_and_floors() {
        let base = Duration::from_millis(600);
        let min = Duration::from_millis(50);
        assert_eq!(fall_interval(base, 0.5, 0, min), base);
        assert_eq!(fall_interval(base, 0.5, 1, min), Duration::from_millis(300));
        assert_eq!(fall_interval(base, 0.5, 10, min), min);
    }

    #[test]
    fn test_soft_drop_interval() {
        let soft = Duration::from_millis(50);
        assert_eq!(soft_drop_interval(Duration::from_millis(600), soft), soft);
        assert_eq!(
            soft_drop_interval(Duration::from_millis(60), soft),
            Duration::from_millis(30)
        );
    }
}
