//! Tousou - headless round runner
//!
//! Drives a full round at ~60 ticks per second with idle input and logs
//! round events as they happen. Useful for balance checks and as a wiring
//! example for a real frontend: everything a renderer needs is on
//! `Session::state()` after each frame.

use std::sync::Arc;

use clap::Parser;
use tokio::time::{interval, Duration};

use tousou::core::config::Tuning;
use tousou::core::error::Result;
use tousou::llm::{LlmClient, LlmTactics, StaticNarrative, TacticsProvider};
use tousou::session::{Difficulty, GameSettings, GameStatus, Session};
use tousou::simulation::{InputFrame, RoundEvent};

#[derive(Parser)]
#[command(name = "tousou", about = "Real-time arcade chase simulation, headless")]
struct Args {
    /// Settings file (TOML); the flags below override individual fields
    #[arg(long)]
    settings: Option<std::path::PathBuf>,

    /// Round length in seconds
    #[arg(long)]
    duration: Option<u32>,

    /// easy, normal, hard, tactician, horde
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Hunter count (horde mode overrides this)
    #[arg(long)]
    hunters: Option<usize>,

    /// Survivor companion count
    #[arg(long)]
    survivors: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tousou=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => GameSettings::from_toml(&std::fs::read_to_string(path)?)?,
        None => GameSettings::default(),
    };
    if let Some(duration) = args.duration {
        settings.duration = duration;
    }
    if let Some(difficulty) = args.difficulty {
        settings.difficulty = difficulty;
    }
    if let Some(hunters) = args.hunters {
        settings.hunter_count = hunters;
    }
    if let Some(survivors) = args.survivors {
        settings.survivor_count = survivors;
    }
    settings.validate()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(settings))
}

async fn run(settings: GameSettings) -> Result<()> {
    // The tactician is optional even in tactician mode; the round runs
    // identically without it
    let tactics: Option<Arc<dyn TacticsProvider>> = if settings.difficulty.llm_directed() {
        match LlmClient::from_env() {
            Ok(client) => Some(Arc::new(LlmTactics::new(client))),
            Err(_) => {
                tracing::warn!("LLM_API_KEY not set - tactician mode runs without external hints");
                None
            }
        }
    } else {
        None
    };

    let mut session = Session::with_providers(
        settings,
        Tuning::default(),
        tactics,
        Box::new(StaticNarrative::new()),
    );
    session.start();

    let mut ticker = interval(Duration::from_millis(16));
    let mut frames: u64 = 0;
    while session.state().status == GameStatus::Playing {
        ticker.tick().await;
        let events = session.frame(&InputFrame::neutral());
        log_events(&session, &events);

        frames += 1;
        if frames % 60 == 0 {
            let events = session.second();
            log_events(&session, &events);
        }
    }

    let state = session.state();
    println!(
        "round over after {} ticks: {:?}, score {}, {} companions left",
        state.tick, state.status, state.score, state.survivors_remaining
    );
    Ok(())
}

fn log_events(session: &Session, events: &[RoundEvent]) {
    for event in events {
        match event {
            RoundEvent::SecondElapsed {
                time_remaining,
                score,
            } => {
                tracing::debug!(time_remaining, score, "clock");
            }
            RoundEvent::MissionSpawned { id } => {
                if let Some(m) = session.state().missions.get(*id) {
                    tracing::info!(title = %m.title, reward = m.reward, "{}", m.description);
                }
            }
            RoundEvent::SurvivorExited { id } => {
                tracing::info!(%id, "survivor turned itself in at the box");
            }
            RoundEvent::SurvivorCaught { id } => {
                tracing::info!(%id, "survivor caught");
            }
            RoundEvent::PlayerCaught => {
                tracing::info!("runner caught");
            }
            RoundEvent::RoundWon { score } => {
                tracing::info!(score, "runner escaped with the prize");
            }
        }
    }
}
