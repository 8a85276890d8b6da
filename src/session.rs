//! Player session state machine
//!
//! Owns every per-slot lifecycle state plus the shared countdown and pause.
//! Callers never poke states directly: they feed [`SessionInput`]s and act
//! on the [`SessionEffect`]s that come back.

use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// Countdown runs this many times faster than wall time
pub const COUNTDOWN_SPEED: u32 = 2;

/// Lifecycle of one player slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlayerState {
    #[default]
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Shared phase across both slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    #[default]
    Running,
    /// Gameplay frozen until the countdown reaches zero
    Countdown,
    /// Shared pause, menu owned by the player who paused
    Paused,
}

/// Pause menu choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Resume,
    RestartAll,
    ResetMatchScores,
    Back,
}

/// Named inputs that drive the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    /// Start / confirm pressed by a slot
    Start(usize),
    Menu(MenuAction),
}

/// Which boards to reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartRequest {
    /// Every non-idle board, with one shared seed
    AllJoined,
    /// A single board
    Player(usize),
}

/// Work the coordinator has to carry out after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    Restart(RestartRequest),
    ResetMatchScores,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    players: [PlayerState; 2],
    phase: Phase,
    countdown: Duration,
    /// Slot that controls menu navigation
    active_player: usize,
}

fn other(slot: usize) -> usize {
    (slot + 1) % 2
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, slot: usize) -> PlayerState {
        self.players[slot]
    }

    pub fn states(&self) -> [PlayerState; 2] {
        self.players
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_player(&self) -> usize {
        self.active_player
    }

    pub fn countdown_remaining(&self) -> Duration {
        if self.phase == Phase::Countdown {
            self.countdown
        } else {
            Duration::ZERO
        }
    }

    pub fn countdown_running(&self) -> bool {
        self.phase == Phase::Countdown
    }

    /// Whole seconds left, rounded up, for display
    pub fn countdown_display(&self) -> Option<u64> {
        if !self.countdown_running() {
            return None;
        }
        let ms = self.countdown.as_millis() as u64;
        Some(ms.div_ceil(1000))
    }

    /// Whether this slot's board should receive a gameplay tick
    pub fn is_ticking(&self, slot: usize) -> bool {
        self.phase != Phase::Countdown && self.players[slot] == PlayerState::Playing
    }

    /// Both slots have joined (neither idle)
    pub fn both_joined(&self) -> bool {
        self.players.iter().all(|&p| p != PlayerState::Idle)
    }

    pub fn both_playing(&self) -> bool {
        self.players.iter().all(|&p| p == PlayerState::Playing)
    }

    /// Advance the countdown
    pub fn tick(&mut self, dt: Duration) {
        if self.phase != Phase::Countdown {
            return;
        }
        self.countdown = self.countdown.saturating_sub(dt * COUNTDOWN_SPEED);
        if self.countdown.is_zero() {
            info!("Countdown finished");
            self.phase = Phase::Running;
        }
    }

    /// Force a joined slot into GameOver (board top-out or match resolution)
    pub fn mark_game_over(&mut self, slot: usize) {
        if self.players[slot] != PlayerState::Idle {
            self.players[slot] = PlayerState::GameOver;
        }
    }

    fn start_countdown(&mut self, duration: Duration) {
        self.phase = Phase::Countdown;
        self.countdown = duration;
    }

    fn resume(&mut self) {
        self.phase = Phase::Running;
        for state in &mut self.players {
            if *state == PlayerState::Paused {
                *state = PlayerState::Playing;
            }
        }
    }

    /// Feed one input; `countdown` is the configured countdown length
    pub fn handle(&mut self, input: SessionInput, countdown: Duration) -> Vec<SessionEffect> {
        match input {
            SessionInput::Start(slot) => self.handle_start(slot, countdown),
            SessionInput::Menu(action) => self.handle_menu(action, countdown),
        }
    }

    fn handle_start(&mut self, slot: usize, countdown: Duration) -> Vec<SessionEffect> {
        let me = self.players[slot];
        let opponent = self.players[other(slot)];

        // Late join restarts the countdown
        if self.phase == Phase::Countdown && me == PlayerState::Idle {
            info!("Player {} joined during countdown", slot);
            self.players[slot] = PlayerState::Playing;
            self.start_countdown(countdown);
            return Vec::new();
        }

        // Any start resumes a shared pause
        if self.phase == Phase::Paused {
            info!("Resumed by player {}", slot);
            self.resume();
            return Vec::new();
        }

        match me {
            PlayerState::Idle => {
                info!("Player {} joined", slot);
                self.players[slot] = PlayerState::Playing;
                self.active_player = slot;
                let request = if opponent == PlayerState::Playing {
                    info!("Versus join, restarting match");
                    RestartRequest::AllJoined
                } else {
                    RestartRequest::Player(slot)
                };
                self.start_countdown(countdown);
                vec![SessionEffect::Restart(request)]
            }
            PlayerState::Playing => {
                info!("Paused by player {}", slot);
                self.phase = Phase::Paused;
                self.active_player = slot;
                for state in &mut self.players {
                    if *state == PlayerState::Playing {
                        *state = PlayerState::Paused;
                    }
                }
                Vec::new()
            }
            PlayerState::GameOver => {
                if opponent == PlayerState::Playing {
                    return Vec::new();
                }
                info!("Player {} requested rematch", slot);
                self.players[slot] = PlayerState::Playing;
                if opponent == PlayerState::GameOver {
                    self.players[other(slot)] = PlayerState::Playing;
                }
                self.start_countdown(countdown);
                vec![SessionEffect::Restart(RestartRequest::AllJoined)]
            }
            // Paused slots outside a paused phase cannot happen
            PlayerState::Paused => Vec::new(),
        }
    }

    fn handle_menu(&mut self, action: MenuAction, countdown: Duration) -> Vec<SessionEffect> {
        match action {
            MenuAction::Resume if self.phase == Phase::Paused => {
                self.handle_start(self.active_player, countdown)
            }
            MenuAction::Back if self.phase == Phase::Paused => {
                self.resume();
                Vec::new()
            }
            MenuAction::Resume | MenuAction::Back => Vec::new(),
            MenuAction::RestartAll => {
                info!("Restart all from menu");
                for state in &mut self.players {
                    if *state != PlayerState::Idle {
                        *state = PlayerState::Playing;
                    }
                }
                self.start_countdown(countdown);
                vec![SessionEffect::Restart(RestartRequest::AllJoined)]
            }
            MenuAction::ResetMatchScores => vec![SessionEffect::ResetMatchScores],
        }
    }
}
