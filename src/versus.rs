//! Two-board match coordinator
//!
//! Each tick: session bookkeeping, then player 0 and player 1 board
//! updates, then cross-board effects computed from the post-update state.
//! Neither board sees the other's same-tick state except through the
//! garbage queues.

use crate::events::BoardEvent;
use crate::game::Game;
use crate::input::Intents;
use crate::session::{
    MenuAction, PlayerState, RestartRequest, Session, SessionEffect, SessionInput,
};
use crate::settings::RuleConfig;
use crate::snapshot::MatchSnapshot;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tracing::{debug, info};

pub const PLAYERS: usize = 2;

/// How a match was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    /// `None` on a tie or a double elimination
    pub winner: Option<usize>,
    pub match_wins: [u32; PLAYERS],
}

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: [Vec<BoardEvent>; PLAYERS],
    /// Garbage handed from each slot to its opponent
    pub garbage_sent: [u32; PLAYERS],
    pub result: Option<MatchResult>,
}

pub struct MatchCoordinator {
    games: [Game; PLAYERS],
    session: Session,
    /// Survives restarts, cleared only by the menu
    match_wins: [u32; PLAYERS],
    rules: RuleConfig,
    seeds: ChaCha8Rng,
}

impl MatchCoordinator {
    pub fn new(rules: RuleConfig, seed: u64) -> Self {
        let rules = rules.sanitized();
        let mut seeds = ChaCha8Rng::seed_from_u64(seed);
        let board_seed = seeds.r#gen();
        Self {
            games: [Game::new(&rules, board_seed), Game::new(&rules, board_seed)],
            session: Session::new(),
            match_wins: [0; PLAYERS],
            rules,
            seeds,
        }
    }

    /// Replace the rules; timings and toggles apply from the next tick,
    /// board dimensions from the next restart
    pub fn set_config(&mut self, rules: RuleConfig) {
        self.rules = rules.sanitized();
        debug!("Rules replaced");
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    pub fn game(&self, slot: usize) -> &Game {
        &self.games[slot]
    }

    /// Direct board access for editors and scripted setups
    pub fn game_mut(&mut self, slot: usize) -> &mut Game {
        &mut self.games[slot]
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn match_wins(&self) -> [u32; PLAYERS] {
        self.match_wins
    }

    pub fn reset_match_scores(&mut self) {
        info!("Match scores reset");
        self.match_wins = [0; PLAYERS];
    }

    /// Pause menu selection
    pub fn menu(&mut self, action: MenuAction) {
        self.dispatch(SessionInput::Menu(action));
    }

    fn dispatch(&mut self, input: SessionInput) {
        let effects = self.session.handle(input, self.rules.timing.countdown());
        for effect in effects {
            match effect {
                SessionEffect::Restart(request) => self.restart(request),
                SessionEffect::ResetMatchScores => self.reset_match_scores(),
            }
        }
    }

    fn restart(&mut self, request: RestartRequest) {
        let seed: u64 = self.seeds.r#gen();
        match request {
            RestartRequest::AllJoined => {
                for (slot, game) in self.games.iter_mut().enumerate() {
                    if self.session.state(slot) != PlayerState::Idle {
                        info!("Restarting player {}", slot);
                        game.restart(&self.rules, seed);
                    }
                }
            }
            RestartRequest::Player(slot) => {
                info!("Restarting player {} (single)", slot);
                self.games[slot].restart(&self.rules, seed);
            }
        }
    }

    /// Advance the whole match by one fixed step
    pub fn tick(&mut self, dt: Duration, intents: [Intents; PLAYERS]) -> TickReport {
        let mut report = TickReport::default();

        self.session.tick(dt);
        for (slot, input) in intents.iter().enumerate() {
            if input.start {
                self.dispatch(SessionInput::Start(slot));
            }
        }

        if self.session.countdown_running() {
            return report;
        }

        for slot in 0..PLAYERS {
            if !self.session.is_ticking(slot) {
                continue;
            }
            let game = &mut self.games[slot];
            game.update(dt, &intents[slot], &self.rules, &mut report.events[slot]);
            if game.is_game_over() {
                self.session.mark_game_over(slot);
            }
        }

        if self.rules.features.garbage_lines && self.session.both_playing() {
            self.exchange_garbage(&mut report);
        } else if self.session.both_joined() {
            report.result = self.resolve();
        }
        report
    }

    fn exchange_garbage(&mut self, report: &mut TickReport) {
        for slot in 0..PLAYERS {
            let opponent = (slot + 1) % PLAYERS;
            let amount = self.games[slot].consume_outgoing_garbage();
            if amount > 0 && self.session.state(opponent) == PlayerState::Playing {
                debug!("Player {} sends {} garbage", slot, amount);
                self.games[opponent].queue_incoming_garbage(amount);
                report.garbage_sent[slot] = amount;
            }
        }

        let diff = self.games[0].score.points as i64 - self.games[1].score.points as i64;
        self.games[0].score_delta = diff;
        self.games[1].score_delta = -diff;
    }

    /// Decide the match at most once per restart
    fn resolve(&mut self) -> Option<MatchResult> {
        if self.games.iter().any(Game::is_match_resolved) {
            return None;
        }
        let lost = [0, 1].map(|slot| self.session.state(slot) == PlayerState::GameOver);

        let winner = if self.rules.features.first_player_wins {
            if !lost.iter().any(|&l| l) {
                return None;
            }
            let survivors: Vec<usize> = (0..PLAYERS).filter(|&s| !lost[s]).collect();
            for slot in 0..PLAYERS {
                self.games[slot].set_outcome(!lost[slot]);
                self.session.mark_game_over(slot);
            }
            info!("Match ended by first elimination");
            survivors.first().copied()
        } else {
            if !lost.iter().all(|&l| l) {
                return None;
            }
            let (a, b) = (self.games[0].score.points, self.games[1].score.points);
            let winner = match a.cmp(&b) {
                std::cmp::Ordering::Greater => Some(0),
                std::cmp::Ordering::Less => Some(1),
                std::cmp::Ordering::Equal => None,
            };
            for slot in 0..PLAYERS {
                self.games[slot].set_outcome(winner == Some(slot));
            }
            info!("Match ended by score {} - {}", a, b);
            winner
        };

        if let Some(slot) = winner {
            self.match_wins[slot] += 1;
        }
        info!("Match wins {} - {}", self.match_wins[0], self.match_wins[1]);
        Some(MatchResult {
            winner,
            match_wins: self.match_wins,
        })
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            boards: [
                self.games[0].snapshot(&self.rules),
                self.games[1].snapshot(&self.rules),
            ],
            players: self.session.states(),
            phase: self.session.phase(),
            countdown_secs: self.session.countdown_display(),
            match_wins: self.match_wins,
        }
    }
}
