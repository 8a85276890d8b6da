//! Per-board game state: piece lifecycle, timers, scoring and garbage
//!
//! A `Game` is built once per player slot and reset in place by
//! [`Game::restart`], so whoever holds it keeps a stable reference.

use crate::board::Board;
use crate::events::{BoardEvent, EventSink};
use crate::input::{Intents, LateralRepeat};
use crate::piece::Piece;
use crate::randomizer::Randomizer;
use crate::score::{fall_interval, garbage_for_clear, soft_drop_interval, Score};
use crate::settings::RuleConfig;
use crate::tetromino::{RotationDirection, ShapeKind};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info};

/// Match result shown on a finished board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub enum Outcome {
    #[default]
    Undecided,
    Winner,
    Loser,
}

/// One player's board
#[derive(Debug, Clone)]
pub struct Game {
    /// Locked cells
    pub board: Board,
    /// Current falling piece, `None` only after top-out
    current_piece: Option<Piece>,
    next_piece: ShapeKind,
    hold_piece: Option<ShapeKind>,
    /// Whether hold has been used since the last lock
    hold_used: bool,
    randomizer: Randomizer,
    pub score: Score,
    /// Own score minus the opponent's, refreshed by the coordinator
    pub score_delta: i64,
    fall_timer: Duration,
    lock_timer: Duration,
    lateral: LateralRepeat,
    /// Cells dropped by the current piece, paid out on lock
    drop_distance: u32,
    incoming_garbage: VecDeque<u32>,
    outgoing_garbage: VecDeque<u32>,
    game_over: bool,
    outcome: Outcome,
    match_resolved: bool,
}

impl Game {
    /// Create a new board with the configured dimensions and a seed
    pub fn new(rules: &RuleConfig, seed: u64) -> Self {
        let mut randomizer = Randomizer::with_seed(seed);
        let next_piece = randomizer.next_piece();
        let mut game = Self {
            board: Board::new(rules.board.width, rules.board.height),
            current_piece: None,
            next_piece,
            hold_piece: None,
            hold_used: false,
            randomizer,
            score: Score::new(),
            score_delta: 0,
            fall_timer: Duration::ZERO,
            lock_timer: Duration::ZERO,
            lateral: LateralRepeat::new(),
            drop_distance: 0,
            incoming_garbage: VecDeque::new(),
            outgoing_garbage: VecDeque::new(),
            game_over: false,
            outcome: Outcome::Undecided,
            match_resolved: false,
        };
        game.spawn(&mut crate::events::NullSink);
        game
    }

    /// Reset everything in place and start over from `seed`
    pub fn restart(&mut self, rules: &RuleConfig, seed: u64) {
        self.board = Board::new(rules.board.width, rules.board.height);
        self.randomizer.reseed(seed);
        self.next_piece = self.randomizer.next_piece();
        self.current_piece = None;
        self.hold_piece = None;
        self.hold_used = false;
        self.score = Score::new();
        self.score_delta = 0;
        self.fall_timer = Duration::ZERO;
        self.lock_timer = Duration::ZERO;
        self.lateral.reset();
        self.drop_distance = 0;
        self.incoming_garbage.clear();
        self.outgoing_garbage.clear();
        self.game_over = false;
        self.outcome = Outcome::Undecided;
        self.match_resolved = false;
        self.spawn(&mut crate::events::NullSink);
    }

    /// Advance one fixed tick
    pub fn update(
        &mut self,
        dt: Duration,
        intents: &Intents,
        rules: &RuleConfig,
        sink: &mut dyn EventSink,
    ) {
        if self.game_over {
            return;
        }
        let timing = &rules.timing;
        let features = &rules.features;
        self.score.level = self.score.lines / timing.lines_per_level.max(1);

        // Lateral movement
        if let Some(dir) = self
            .lateral
            .step(intents.horizontal(), dt, timing.das(), timing.arr())
        {
            if let Some(piece) = &mut self.current_piece {
                piece.try_move(&self.board, dir.dx(), 0);
            }
        }

        if intents.rotate_ccw {
            self.rotate(RotationDirection::CounterClockwise, sink);
        }
        if intents.rotate_cw {
            self.rotate(RotationDirection::Clockwise, sink);
        }

        if intents.hold && features.hold_piece {
            self.hold(sink);
            if self.game_over {
                return;
            }
        }

        if intents.hard_drop && features.hard_drop {
            self.hard_drop(rules, sink);
            return;
        }

        self.apply_gravity(dt, intents.down, rules, sink);
    }

    fn apply_gravity(
        &mut self,
        dt: Duration,
        soft_drop: bool,
        rules: &RuleConfig,
        sink: &mut dyn EventSink,
    ) {
        let normal = self.fall_interval(rules);
        let Some(piece) = &mut self.current_piece else {
            return;
        };

        if piece.is_grounded(&self.board) {
            // Grounded: only the lock clock runs
            self.lock_timer += dt;
            if !rules.features.lock_delay || self.lock_timer >= rules.timing.lock_delay() {
                self.lock(rules, sink);
                self.fall_timer = Duration::ZERO;
                self.lock_timer = Duration::ZERO;
            }
            return;
        }

        self.lock_timer = Duration::ZERO;
        self.fall_timer += dt;
        let interval = if soft_drop {
            soft_drop_interval(normal, rules.timing.soft_drop_interval())
        } else {
            normal
        };
        if self.fall_timer >= interval {
            if piece.move_down(&self.board) && soft_drop {
                self.drop_distance += 1;
            }
            self.fall_timer = Duration::ZERO;
        }
    }

    /// Current gravity interval (level 0 speed under `infinite_level`)
    pub fn fall_interval(&self, rules: &RuleConfig) -> Duration {
        let level = if rules.features.infinite_level {
            0
        } else {
            self.score.level
        };
        fall_interval(
            rules.timing.fall_interval(),
            rules.timing.level_speed_multiplier,
            level,
            rules.timing.min_fall_interval(),
        )
    }

    /// Every attempt resets the lock clock, even when rejected
    fn rotate(&mut self, direction: RotationDirection, sink: &mut dyn EventSink) {
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        let rotated = piece.rotate(direction, &self.board);
        self.lock_timer = Duration::ZERO;
        sink.emit(BoardEvent::RotationAttempted { rotated });
    }

    /// Swap with the hold slot, once per piece. Returns true if anything happened.
    pub fn hold(&mut self, sink: &mut dyn EventSink) -> bool {
        if self.hold_used || self.game_over {
            return false;
        }
        let Some(current) = self.current_piece.take() else {
            return false;
        };

        match self.hold_piece.replace(current.kind) {
            None => self.spawn(sink),
            Some(held) => {
                let piece = Piece::new(held, &self.board);
                self.drop_distance = 0;
                if piece.collides(&self.board) {
                    self.top_out(sink);
                }
                self.current_piece = Some(piece);
            }
        }
        self.hold_used = true;
        self.lock_timer = Duration::ZERO;
        self.fall_timer = Duration::ZERO;
        sink.emit(BoardEvent::Held);
        true
    }

    fn hard_drop(&mut self, rules: &RuleConfig, sink: &mut dyn EventSink) {
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        self.drop_distance += piece.hard_drop(&self.board);
        self.lock(rules, sink);
    }

    /// Commit the active piece, clear rows, then spawn and apply pending garbage
    fn lock(&mut self, rules: &RuleConfig, sink: &mut dyn EventSink) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };

        self.board
            .lock_cells(&piece.block_positions(), piece.kind.cell_value());
        self.score.add_drop(self.drop_distance);

        let cleared = self.board.clear_lines();
        let tetris = self.score.add_clear(cleared, rules.timing.lines_per_level);
        sink.emit(BoardEvent::PieceLocked { cleared });
        if cleared > 0 {
            sink.emit(BoardEvent::LineCleared(cleared));
            if tetris {
                debug!("Tetris! total={}", self.score.tetris_count);
                sink.emit(BoardEvent::Tetris);
            }
            let garbage = garbage_for_clear(cleared);
            if garbage > 0 {
                debug!("Garbage out queued {}", garbage);
                self.outgoing_garbage.push_back(garbage);
            }
        } else {
            sink.emit(BoardEvent::NoClear);
        }

        let incoming = self.consume_incoming_garbage();

        // Garbage lands under the new piece, not the one just locked
        self.spawn(sink);
        self.fall_timer = Duration::ZERO;
        self.lock_timer = Duration::ZERO;
        if incoming > 0 {
            self.add_garbage_lines(incoming, sink);
        }
    }

    /// Promote the next piece to active and draw a new next piece
    fn spawn(&mut self, sink: &mut dyn EventSink) {
        let kind = self.next_piece;
        self.next_piece = self.randomizer.next_piece();
        let piece = Piece::new(kind, &self.board);
        self.hold_used = false;
        self.drop_distance = 0;
        let blocked = piece.collides(&self.board);
        self.current_piece = Some(piece);
        if blocked {
            self.top_out(sink);
        }
    }

    fn top_out(&mut self, sink: &mut dyn EventSink) {
        if !self.game_over {
            info!("Board topped out with score {}", self.score.points);
            self.game_over = true;
            sink.emit(BoardEvent::ToppedOut);
        }
    }

    /// Push `count` garbage rows in from the bottom, each with one random hole.
    ///
    /// The active piece rides up with the stack; if it still overlaps it is
    /// nudged upward, and a piece that cannot be freed ends the game.
    pub fn add_garbage_lines(&mut self, count: u32, sink: &mut dyn EventSink) {
        if self.game_over || count == 0 {
            return;
        }
        let height = self.board.height();
        let rows = (count as usize).min(height);
        let holes = self.randomizer.holes(rows, self.board.width());
        self.board.push_garbage_rows(&holes);
        sink.emit(BoardEvent::GarbageReceived(count));

        let Some(piece) = &mut self.current_piece else {
            return;
        };
        piece.y += rows as i32;
        let mut tries = 0;
        while piece.collides(&self.board) && tries < height {
            piece.y += 1;
            tries += 1;
        }

        if piece.collides(&self.board) {
            info!("Crushed by {} garbage lines", count);
            self.top_out(sink);
        } else {
            debug!("Applied {} garbage lines", count);
        }
    }

    /// Queue garbage sent by the opponent; it lands on the next lock
    pub fn queue_incoming_garbage(&mut self, amount: u32) {
        if amount > 0 {
            self.incoming_garbage.push_back(amount);
        }
    }

    /// Drain and sum the incoming queue
    pub fn consume_incoming_garbage(&mut self) -> u32 {
        let total: u32 = self.incoming_garbage.drain(..).sum();
        if total > 0 {
            debug!("Garbage in consuming {}", total);
        }
        total
    }

    /// Drain and sum the outgoing queue
    pub fn consume_outgoing_garbage(&mut self) -> u32 {
        let total: u32 = self.outgoing_garbage.drain(..).sum();
        if total > 0 {
            debug!("Garbage out consuming {}", total);
        }
        total
    }

    /// Sum of garbage waiting to land on this board
    pub fn pending_incoming(&self) -> u32 {
        self.incoming_garbage.iter().sum()
    }

    /// Final match decision; freezes the board until restart
    pub fn set_outcome(&mut self, winner: bool) {
        self.game_over = true;
        self.outcome = if winner { Outcome::Winner } else { Outcome::Loser };
        self.match_resolved = true;
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    pub fn next_piece(&self) -> ShapeKind {
        self.next_piece
    }

    pub fn hold_piece(&self) -> Option<ShapeKind> {
        self.hold_piece
    }

    pub fn hold_used(&self) -> bool {
        self.hold_used
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_match_resolved(&self) -> bool {
        self.match_resolved
    }

    pub fn fall_timer(&self) -> Duration {
        self.fall_timer
    }

    pub fn lock_timer(&self) -> Duration {
        self.lock_timer
    }

    /// Landing row of the active piece
    pub fn ghost_y(&self) -> Option<i32> {
        self.current_piece
            .as_ref()
            .map(|piece| piece.ghost_y(&self.board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::{EMPTY_CELL, GARBAGE_CELL};

    const TICK: Duration = Duration::from_millis(16);

    fn rules() -> RuleConfig {
        RuleConfig::default()
    }

    fn game() -> Game {
        Game::new(&rules(), 1234)
    }

    fn set_piece(game: &mut Game, kind: ShapeKind) {
        game.current_piece = Some(Piece::new(kind, &game.board));
    }

    fn press(f: impl FnOnce(&mut Intents)) -> Intents {
        let mut intents = Intents::default();
        f(&mut intents);
        intents
    }

    #[test]
    fn test_new_game_has_one_piece() {
        let game = game();
        assert!(game.current_piece().is_some());
        assert!(!game.is_game_over());
        assert!(game.board.is_empty());
        assert_eq!(game.hold_piece(), None);
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let a = Game::new(&rules(), 99);
        let b = Game::new(&rules(), 99);
        assert_eq!(a.current_piece().map(|p| p.kind), b.current_piece().map(|p| p.kind));
        assert_eq!(a.next_piece(), b.next_piece());
    }

    #[test]
    fn test_lock_without_clear() {
        let rules = rules();
        let mut game = game();
        let mut events = Vec::new();
        set_piece(&mut game, ShapeKind::O);
        game.update(TICK, &press(|i| i.hard_drop = true), &rules, &mut events);

        assert!(!game.board.is_empty());
        assert_eq!(game.score.lines, 0);
        // O spawns with its bottom at y = 18 and falls 18 rows
        assert_eq!(game.score.points, 18);
        assert!(events.contains(&BoardEvent::NoClear));
        assert_eq!(game.consume_outgoing_garbage(), 0);
    }

    #[test]
    fn test_single_clear_scenario() {
        let rules = rules();
        let mut game = game();
        let mut events = Vec::new();
        // Row 0 full except columns 0-1 and 9; row 1 full except columns 0-1 and 8-9
        for x in 2..9 {
            game.board.set(x, 0, 5);
        }
        for x in 2..8 {
            game.board.set(x, 1, 5);
        }

        // O into columns 0-1, resting on the floor
        set_piece(&mut game, ShapeKind::O);
        if let Some(p) = &mut game.current_piece {
            p.x = -1;
            p.y = 0;
        }
        game.lock(&rules, &mut events);
        assert_eq!(game.score.lines, 0);
        assert_eq!(game.score.points, 0);

        // Vertical I into column 9 completes only row 0
        set_piece(&mut game, ShapeKind::I);
        if let Some(p) = &mut game.current_piece {
            p.cells = [(1, 0), (1, 1), (1, 2), (1, 3)];
            p.x = 8;
            p.y = 0;
        }
        game.drop_distance = 0;
        game.lock(&rules, &mut events);

        assert_eq!(game.score.lines, 1);
        assert_eq!(game.score.points, 10);
        assert_eq!(game.consume_outgoing_garbage(), 0);
        assert!(events.contains(&BoardEvent::LineCleared(1)));
        // old row 1 slid down, still missing column 8
        assert_eq!(game.board.get(8, 0), Some(EMPTY_CELL));
        assert_eq!(game.board.get(9, 0), Some(ShapeKind::I.cell_value()));
    }

    fn fill_rows_except_column(game: &mut Game, rows: i32, column: i32) {
        for y in 0..rows {
            for x in 0..10 {
                if x != column {
                    game.board.set(x, y, 2);
                }
            }
        }
    }

    fn drop_vertical_i(game: &mut Game, column: i32, rules: &RuleConfig, events: &mut Vec<BoardEvent>) {
        set_piece(game, ShapeKind::I);
        if let Some(p) = &mut game.current_piece {
            p.cells = [(1, 0), (1, 1), (1, 2), (1, 3)];
            p.x = column - 1;
            p.y = 0;
        }
        game.drop_distance = 0;
        game.lock(rules, events);
    }

    #[test]
    fn test_tetris_sends_three() {
        let rules = rules();
        let mut game = game();
        let mut events = Vec::new();
        fill_rows_except_column(&mut game, 4, 0);
        drop_vertical_i(&mut game, 0, &rules, &mut events);

        assert_eq!(game.score.lines, 4);
        assert_eq!(game.score.tetris_count, 1);
        assert_eq!(game.score.points, 40 + 30);
        assert_eq!(game.consume_outgoing_garbage(), 3);
        assert!(events.contains(&BoardEvent::Tetris));
    }

    #[test]
    fn test_triple_sends_one() {
        let rules = rules();
        let mut game = game();
        let mut events = Vec::new();
        fill_rows_except_column(&mut game, 3, 0);
        drop_vertical_i(&mut game, 0, &rules, &mut events);

        assert_eq!(game.score.lines, 3);
        assert_eq!(game.score.tetris_count, 0);
        assert_eq!(game.consume_outgoing_garbage(), 1);
        assert!(!events.contains(&BoardEvent::Tetris));
    }

    #[test]
    fn test_outgoing_queue_drains_fully() {
        let mut game = game();
        game.outgoing_garbage.extend([1, 3, 1]);
        assert_eq!(game.consume_outgoing_garbage(), 5);
        assert_eq!(game.consume_outgoing_garbage(), 0);
    }

    #[test]
    fn test_hold_once_per_piece() {
        let rules = rules();
        let mut game = game();
        let mut events = Vec::new();
        let first = game.current_piece().map(|p| p.kind);
        let next = game.next_piece();

        game.update(TICK, &press(|i| i.hold = true), &rules, &mut events);
        assert_eq!(game.hold_piece(), first);
        assert_eq!(game.current_piece().map(|p| p.kind), Some(next));
        assert!(game.hold_used());

        assert!(!game.hold(&mut events));
        assert_eq!(game.hold_piece(), first);
        assert_eq!(game.current_piece().map(|p| p.kind), Some(next));
    }

    #[test]
    fn test_hold_swap_resets_position() {
        let rules = rules();
        let mut game = game();
        let mut events = Vec::new();
        let first = game.current_piece().map(|p| p.kind).unwrap();
        game.hold(&mut events);
        // lock, then swap back
        game.update(TICK, &press(|i| i.hard_drop = true), &rules, &mut events);
        let second = game.current_piece().map(|p| p.kind).unwrap();
        assert!(!game.hold_used());
        assert!(game.hold(&mut events));
        let piece = game.current_piece().unwrap();
        assert_eq!(piece.kind, first);
        assert_eq!((piece.x, piece.y), (3, 18));
        assert_eq!(game.hold_piece(), Some(second));
    }

    #[test]
    fn test_hold_disabled_by_toggle() {
        let mut rules = rules();
        rules.features.hold_piece = false;
        let mut game = game();
        game.update(TICK, &press(|i| i.hold = true), &rules, &mut Vec::new());
        assert_eq!(game.hold_piece(), None);
    }

    #[test]
    fn test_hard_drop_disabled_by_toggle() {
        let mut rules = rules();
        rules.features.hard_drop = false;
        let mut game = game();
        game.update(TICK, &press(|i| i.hard_drop = true), &rules, &mut Vec::new());
        assert!(game.board.is_empty());
    }

    #[test]
    fn test_gravity_moves_one_row_per_interval() {
        let rules = rules();
        let mut game = game();
        let y0 = game.current_piece().unwrap().y;
        let idle = Intents::default();
        // 600ms at level 0: 37 ticks of 16ms is 592ms, the 38th crosses
        for _ in 0..37 {
            game.update(TICK, &idle, &rules, &mut Vec::new());
        }
        assert_eq!(game.current_piece().unwrap().y, y0);
        game.update(TICK, &idle, &rules, &mut Vec::new());
        assert_eq!(game.current_piece().unwrap().y, y0 - 1);
        assert_eq!(game.fall_timer(), Duration::ZERO);
    }

    #[test]
    fn test_soft_drop_is_faster_and_scores() {
        let rules = rules();
        let mut game = game();
        let y0 = game.current_piece().unwrap().y;
        let down = press(|i| i.down = true);
        for _ in 0..10 {
            game.update(Duration::from_millis(50), &down, &rules, &mut Vec::new());
        }
        assert_eq!(game.current_piece().unwrap().y, y0 - 10);
        assert_eq!(game.drop_distance, 10);
    }

    #[test]
    fn test_lock_delay_on_ground() {
        let rules = rules();
        let mut game = game();
        set_piece(&mut game, ShapeKind::O);
        if let Some(p) = &mut game.current_piece {
            p.y = 0;
        }
        let idle = Intents::default();
        game.update(Duration::from_millis(200), &idle, &rules, &mut Vec::new());
        assert!(game.board.is_empty());
        assert_eq!(game.lock_timer(), Duration::from_millis(200));
        game.update(Duration::from_millis(200), &idle, &rules, &mut Vec::new());
        assert!(!game.board.is_empty());
        assert_eq!(game.lock_timer(), Duration::ZERO);
    }

    #[test]
    fn test_lock_delay_disabled_locks_immediately() {
        let mut rules = rules();
        rules.features.lock_delay = false;
        let mut game = game();
        set_piece(&mut game, ShapeKind::O);
        if let Some(p) = &mut game.current_piece {
            p.y = 0;
        }
        game.update(TICK, &Intents::default(), &rules, &mut Vec::new());
        assert!(!game.board.is_empty());
    }

    #[test]
    fn test_rotation_resets_lock_timer_even_when_rejected() {
        let rules = rules();
        let mut game = game();
        let mut events = Vec::new();
        set_piece(&mut game, ShapeKind::O);
        if let Some(p) = &mut game.current_piece {
            p.y = 0;
        }
        game.update(Duration::from_millis(200), &Intents::default(), &rules, &mut events);
        assert_eq!(game.lock_timer(), Duration::from_millis(200));

        game.update(
            Duration::from_millis(200),
            &press(|i| i.rotate_cw = true),
            &rules,
            &mut events,
        );
        // reset by the rotation, then the grounded tick adds its own 200ms
        assert_eq!(game.lock_timer(), Duration::from_millis(200));
        assert!(game.board.is_empty());
        assert!(events.contains(&BoardEvent::RotationAttempted { rotated: false }));
    }

    #[test]
    fn test_lateral_tap_moves_once() {
        let rules = rules();
        let mut game = game();
        let x0 = game.current_piece().unwrap().x;
        game.update(TICK, &press(|i| i.left = true), &rules, &mut Vec::new());
        assert_eq!(game.current_piece().unwrap().x, x0 - 1);
        game.update(TICK, &press(|i| i.left = true), &rules, &mut Vec::new());
        assert_eq!(game.current_piece().unwrap().x, x0 - 1);
    }

    #[test]
    fn test_garbage_applied_after_spawn_on_lock() {
        let rules = rules();
        let mut game = game();
        game.queue_incoming_garbage(1);
        game.queue_incoming_garbage(1);
        assert_eq!(game.pending_incoming(), 2);

        let mut events = Vec::new();
        game.update(TICK, &press(|i| i.hard_drop = true), &rules, &mut events);

        assert_eq!(game.pending_incoming(), 0);
        for y in 0..2 {
            let holes = game.board.row(y).iter().filter(|&&c| c == EMPTY_CELL).count();
            assert_eq!(holes, 1);
            assert!(game.board.row(y).contains(&GARBAGE_CELL));
        }
        // the new piece rode up with the stack
        assert_eq!(game.current_piece().unwrap().y, 20);
        assert!(events.contains(&BoardEvent::GarbageReceived(2)));
    }

    #[test]
    fn test_garbage_lifts_piece_then_spawn_tops_out() {
        let rules = rules();
        let mut game = game();
        let mut events = Vec::new();
        game.add_garbage_lines(20, &mut events);

        // every row is garbage with a single hole, the piece was pushed clear
        for y in 0..20 {
            assert_eq!(game.board.row(y).iter().filter(|&&c| c == EMPTY_CELL).count(), 1);
        }
        assert!(!game.is_game_over());
        assert!(!game.current_piece().unwrap().collides(&game.board));

        // an O cannot sink into a one-wide hole, so nothing clears and the next spawn is blocked
        set_piece(&mut game, ShapeKind::O);
        if let Some(p) = &mut game.current_piece {
            p.y = 38;
        }
        game.update(TICK, &press(|i| i.hard_drop = true), &rules, &mut events);
        assert!(game.is_game_over());
        assert!(events.contains(&BoardEvent::ToppedOut));
    }

    #[test]
    fn test_oversized_garbage_lifts_piece_by_board_height() {
        let mut game = game();
        let y0 = game.current_piece().unwrap().y;
        game.add_garbage_lines(30, &mut Vec::new());
        assert_eq!(game.current_piece().unwrap().y, y0 + 20);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_held_direction_carries_across_lock() {
        let rules = rules();
        let mut game = game();
        let left = press(|i| i.left = true);
        for _ in 0..3 {
            game.update(TICK, &left, &rules, &mut Vec::new());
        }
        let held = game.lateral.timer();
        assert_eq!(held, TICK * 2);

        let drop = press(|i| {
            i.left = true;
            i.hard_drop = true;
        });
        game.update(TICK, &drop, &rules, &mut Vec::new());
        assert_eq!(game.lateral.timer(), held + TICK);

        // still inside DAS, so the new piece gets no fresh-press move
        let x0 = game.current_piece().unwrap().x;
        game.update(TICK, &left, &rules, &mut Vec::new());
        assert_eq!(game.current_piece().unwrap().x, x0);
    }

    #[test]
    fn test_garbage_noop_when_game_over() {
        let mut game = game();
        game.set_outcome(false);
        game.add_garbage_lines(3, &mut Vec::new());
        assert!(game.board.is_empty());
    }

    #[test]
    fn test_top_out_on_spawn_collision() {
        let rules = rules();
        let mut game = game();
        let mut events = Vec::new();
        for x in 0..10 {
            if x != 0 {
                game.board.set(x, 19, 1);
                game.board.set(x, 18, 1);
            }
        }
        game.update(TICK, &press(|i| i.hard_drop = true), &rules, &mut events);
        assert!(game.is_game_over());
        assert!(events.contains(&BoardEvent::ToppedOut));

        // further ticks are ignored
        let snapshot = game.board.clone();
        game.update(TICK, &press(|i| i.hard_drop = true), &rules, &mut events);
        assert_eq!(game.board, snapshot);
    }

    #[test]
    fn test_restart_resets_everything() {
        let rules = rules();
        let mut game = game();
        game.board.set(0, 0, 3);
        game.score.points = 500;
        game.queue_incoming_garbage(2);
        game.outgoing_garbage.push_back(1);
        game.hold(&mut Vec::new());
        game.set_outcome(true);

        game.restart(&rules, 77);
        assert!(game.board.is_empty());
        assert_eq!(game.score, Score::new());
        assert_eq!(game.hold_piece(), None);
        assert_eq!(game.pending_incoming(), 0);
        assert_eq!(game.consume_outgoing_garbage(), 0);
        assert!(!game.is_game_over());
        assert!(!game.is_match_resolved());
        assert_eq!(game.outcome(), Outcome::Undecided);

        let fresh = Game::new(&rules, 77);
        assert_eq!(game.next_piece(), fresh.next_piece());
        assert_eq!(
            game.current_piece().map(|p| p.kind),
            fresh.current_piece().map(|p| p.kind)
        );
    }

    #[test]
    fn test_infinite_level_freezes_gravity() {
        let mut rules = rules();
        let mut game = game();
        game.score.level = 5;
        let scaled = game.fall_interval(&rules);
        assert!(scaled < rules.timing.fall_interval());
        rules.features.infinite_level = true;
        assert_eq!(game.fall_interval(&rules), rules.timing.fall_interval());
    }
}
