//! Per-tick input intents and the DAS/ARR lateral repeat clock
//!
//! Device polling and key binding live outside this crate. Each tick the
//! caller hands over an already-resolved [`Intents`] snapshot per player:
//! `left`, `right` and `down` are "held" flags, the rest are press edges.

use std::time::Duration;

/// Semantic intents for one player for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    pub left: bool,
    pub right: bool,
    /// Soft drop (held)
    pub down: bool,
    pub rotate_cw: bool,
    pub rotate_ccw: bool,
    pub hold: bool,
    pub hard_drop: bool,
    /// Start / confirm: join, pause, resume, rematch
    pub start: bool,
}

/// Horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn dx(&self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

impl Intents {
    /// Resolve the held direction. Right is checked last and wins when both are held.
    pub fn horizontal(&self) -> Option<Direction> {
        let mut dir = None;
        if self.left {
            dir = Some(Direction::Left);
        }
        if self.right {
            dir = Some(Direction::Right);
        }
        dir
    }
}

/// Delayed auto shift for a held direction.
///
/// The first tick a direction is held moves once. While it stays held the
/// repeat timer accumulates; the tick it reaches the DAS delay moves again,
/// and after that one move fires every ARR interval. Releasing (or
/// reversing) zeroes the clock.
#[derive(Debug, Clone, Default)]
pub struct LateralRepeat {
    held: Option<Direction>,
    /// Time the current direction has been held
    timer: Duration,
    das_triggered: bool,
    /// Time since the last auto-repeat move
    since_repeat: Duration,
}

impl LateralRepeat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick; returns the direction to move this tick, if any
    pub fn step(
        &mut self,
        input: Option<Direction>,
        dt: Duration,
        das: Duration,
        arr: Duration,
    ) -> Option<Direction> {
        let Some(dir) = input else {
            self.reset();
            return None;
        };

        if self.held != Some(dir) {
            self.reset();
            self.held = Some(dir);
            return Some(dir);
        }

        self.timer += dt;
        if self.timer < das {
            return None;
        }

        if !self.das_triggered {
            // First trigger after DAS
            self.das_triggered = true;
            self.since_repeat = Duration::ZERO;
            return Some(dir);
        }

        // Subsequent ARR triggers
        self.since_repeat += dt;
        if self.since_repeat >= arr.max(Duration::from_millis(1)) {
            self.since_repeat = Duration::ZERO;
            return Some(dir);
        }
        None
    }

    /// Clear the held state (release, reversal or restart)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn timer(&self) -> Duration {
        self.timer
    }
}
