//! Headless DUETRIS driver
//!
//! Runs a seeded bot-vs-bot match and prints the final state as JSON.

use anyhow::Context;
use clap::Parser;
use duetris::{Intents, MatchCoordinator, PlayerState, RuleConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "duetris", about = "Run a headless two-player match")]
struct Args {
    /// Match seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of fixed steps to simulate
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,

    /// Rules file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Step length in milliseconds
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
}

/// Get the duetris temp directory, creating it if needed
fn duetris_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("duetris");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Mash buttons, mostly moving and dropping
fn bot_intents(rng: &mut ChaCha8Rng) -> Intents {
    Intents {
        left: rng.gen_bool(0.2),
        right: rng.gen_bool(0.2),
        down: rng.gen_bool(0.3),
        rotate_cw: rng.gen_bool(0.05),
        rotate_ccw: rng.gen_bool(0.02),
        hold: rng.gen_bool(0.01),
        hard_drop: rng.gen_bool(0.02),
        start: false,
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let session_id: u32 = rand::random();
    let log_dir = duetris_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("duetris=debug".parse().context("bad log directive")?),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "DUETRIS starting, seed={}, log={}",
        args.seed,
        log_dir.join(&log_file).display()
    );

    let rules = match &args.config {
        Some(path) => RuleConfig::load_from(path).map_err(anyhow::Error::msg)?,
        None => RuleConfig::load(),
    };

    let mut coordinator = MatchCoordinator::new(rules, args.seed);
    let mut bots = ChaCha8Rng::seed_from_u64(args.seed ^ 0x5eed);
    let dt = Duration::from_millis(args.tick_ms.max(1));

    // Player 0 joins, player 1 joins once the first countdown has ended
    let mut join = [Intents::default(); 2];
    join[0].start = true;
    coordinator.tick(dt, join);

    for step in 0..args.ticks {
        let mut intents = [bot_intents(&mut bots), bot_intents(&mut bots)];
        let session = coordinator.session();
        if session.state(1) == PlayerState::Idle && !session.countdown_running() {
            intents[1].start = true;
        }
        let report = coordinator.tick(dt, intents);
        if let Some(result) = report.result {
            tracing::info!("Match over at step {}: {:?}", step, result);
            break;
        }
    }

    let snapshot = coordinator.snapshot();
    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?
    );
    Ok(())
}
