//! Semantic events emitted by the simulation
//!
//! Audio cues and visual effects are driven from these; the core never
//! plays anything itself.

/// Something observable happened on a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    /// A rotation was attempted, whether or not it succeeded
    RotationAttempted { rotated: bool },
    /// A piece was committed to the grid
    PieceLocked { cleared: usize },
    /// One or more rows were cleared by the last lock
    LineCleared(usize),
    /// More than 3 rows cleared at once
    Tetris,
    /// A lock cleared nothing
    NoClear,
    /// The active piece was swapped into the hold slot
    Held,
    /// Garbage rows were pushed into the grid
    GarbageReceived(u32),
    /// Board reached game over (spawn collision or garbage crush)
    ToppedOut,
}

/// Receiver for board events
pub trait EventSink {
    fn emit(&mut self, event: BoardEvent);
}

impl EventSink for Vec<BoardEvent> {
    fn emit(&mut self, event: BoardEvent) {
        self.push(event);
    }
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: BoardEvent) {}
}

/// Sound cue an audio collaborator would play for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Rotate,
    Clear,
    Tetris,
    Collision,
}

impl BoardEvent {
    pub fn sfx(&self) -> Option<Sfx> {
        match self {
            BoardEvent::RotationAttempted { .. } => Some(Sfx::Rotate),
            BoardEvent::LineCleared(n) if *n <= 3 => Some(Sfx::Clear),
            BoardEvent::Tetris => Some(Sfx::Tetris),
            BoardEvent::NoClear => Some(Sfx::Collision),
            _ => None,
        }
    }
}
