//! Headless games driven by a random bot.

use std::{path::PathBuf, time::Duration};

use blockfall_engine::{
    Action, Board, EngineConfig, GameEvent, GameResult, GameSession, GameStats, RotationDirection,
};
use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{command::EngineArgs, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(super) engine: EngineArgs,
    /// Seed for the bot's choices
    #[arg(long, default_value_t = 0)]
    bot_seed: u64,
    /// Simulated time per frame in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Probability that the bot acts on a given frame
    #[arg(long, default_value_t = 0.2)]
    action_rate: f64,
    /// Stop after this many frames even if the game is still running
    #[arg(long, default_value_t = 200_000)]
    max_frames: u64,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

const BOT_ACTIONS: &[Action] = &[
    Action::MoveLeft,
    Action::MoveLeft,
    Action::MoveRight,
    Action::MoveRight,
    Action::MoveDown,
    Action::Rotate(RotationDirection::Clockwise),
    Action::Rotate(RotationDirection::CounterClockwise),
    Action::HoldPiece,
    Action::HardDrop,
];

#[derive(Debug, Clone, Copy)]
struct BotSettings {
    seed: u64,
    frame: Duration,
    action_rate: f64,
    max_frames: u64,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationReport {
    config: EngineConfig,
    bot_seed: u64,
    game_over: bool,
    result: GameResult,
    stats: GameStats,
    frames: u64,
    play_time_ms: u128,
    actions: u64,
    board: Board,
    finished_at: DateTime<Utc>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let SimulateArg {
        engine,
        bot_seed,
        frame_ms,
        action_rate,
        max_frames,
        output,
    } = arg;
    anyhow::ensure!(*frame_ms > 0, "--frame-ms must be positive");
    anyhow::ensure!(
        (0.0..=1.0).contains(action_rate),
        "--action-rate must be between 0 and 1, got {action_rate}"
    );

    let config = engine.load_config()?;
    let settings = BotSettings {
        seed: *bot_seed,
        frame: Duration::from_millis(*frame_ms),
        action_rate: *action_rate,
        max_frames: *max_frames,
    };
    let report = simulate(&config, settings)?;
    info!(
        "simulation finished after {} frames: score {}, {} lines",
        report.frames, report.result.score, report.result.lines_cleared
    );
    Output::save_json(&report, output.clone())
}

fn simulate(config: &EngineConfig, settings: BotSettings) -> anyhow::Result<SimulationReport> {
    let mut session = GameSession::new(config)?;
    let mut rng = Pcg32::seed_from_u64(settings.seed);
    let mut actions = 0;

    session.dispatch(Action::StartGame);
    while session.state().status().is_playing() && session.frames() < settings.max_frames {
        if rng.random_bool(settings.action_rate)
            && let Some(&action) = BOT_ACTIONS.choose(&mut rng)
            && session.state().is_action_valid(action)
        {
            actions += 1;
            log_events(&session.dispatch(action));
        }
        log_events(&session.advance(settings.frame));
    }

    let state = session.state();
    Ok(SimulationReport {
        config: config.clone(),
        bot_seed: settings.seed,
        game_over: state.status().is_game_over(),
        result: state.current_result(),
        stats: state.stats().clone(),
        frames: session.frames(),
        play_time_ms: session.play_time().as_millis(),
        actions,
        board: state.board().clone(),
        finished_at: Utc::now(),
    })
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::LinesCleared { .. } | GameEvent::LevelUp { .. } => info!("{event:?}"),
            _ => debug!("{event:?}"),
        }
    }
}
