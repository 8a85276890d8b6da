//! DUETRIS - two-board competitive falling-block simulation
//!
//! The crate is the simulation core only: boards, the match coordinator
//! and the player session machine. Rendering, audio and input devices
//! talk to it through [`Intents`], [`BoardEvent`]s and snapshots.

pub mod board;
pub mod events;
pub mod game;
pub mod input;
pub mod piece;
pub mod randomizer;
pub mod rotation;
pub mod score;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod tetromino;
pub mod versus;

pub use events::{BoardEvent, EventSink, Sfx};
pub use game::{Game, Outcome};
pub use input::Intents;
pub use session::{MenuAction, Phase, PlayerState};
pub use settings::RuleConfig;
pub use snapshot::{BoardSnapshot, MatchSnapshot};
pub use versus::{MatchCoordinator, MatchResult, TickReport};
