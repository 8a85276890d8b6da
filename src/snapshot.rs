//! Read-only views for renderers and the headless driver

use crate::game::{Game, Outcome};
use crate::session::{Phase, PlayerState};
use crate::settings::RuleConfig;
use crate::tetromino::ShapeKind;
use serde::Serialize;

/// Active piece in grid coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieceSnapshot {
    pub kind: ShapeKind,
    pub cells: [(i32, i32); 4],
    pub x: i32,
    pub y: i32,
}

/// Everything needed to draw one board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major from the bottom row
    pub cells: Vec<u8>,
    pub piece: Option<PieceSnapshot>,
    /// Omitted when the ghost toggle is off
    pub ghost_y: Option<i32>,
    pub next: Option<ShapeKind>,
    pub hold: Option<ShapeKind>,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub tetris_rate: f32,
    pub score_delta: i64,
    pub pending_garbage: u32,
    pub game_over: bool,
    pub outcome: Outcome,
}

/// Both boards plus shared match state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub boards: [BoardSnapshot; 2],
    pub players: [PlayerState; 2],
    pub phase: Phase,
    pub countdown_secs: Option<u64>,
    pub match_wins: [u32; 2],
}

impl Game {
    pub fn snapshot(&self, rules: &RuleConfig) -> BoardSnapshot {
        let features = &rules.features;
        let piece = self.current_piece().map(|p| PieceSnapshot {
            kind: p.kind,
            cells: p.block_positions(),
            x: p.x,
            y: p.y,
        });

        BoardSnapshot {
            width: self.board.width(),
            height: self.board.height(),
            cells: self.board.cells().to_vec(),
            piece,
            ghost_y: if features.ghost_piece && !self.is_game_over() {
                self.ghost_y()
            } else {
                None
            },
            next: features.next_piece.then(|| self.next_piece()),
            hold: if features.hold_piece {
                self.hold_piece()
            } else {
                None
            },
            score: self.score.points,
            lines: self.score.lines,
            level: self.score.level,
            tetris_rate: self.score.tetris_rate(),
            score_delta: self.score_delta,
            pending_garbage: self.pending_incoming(),
            game_over: self.is_game_over(),
            outcome: self.outcome(),
        }
    }
}
