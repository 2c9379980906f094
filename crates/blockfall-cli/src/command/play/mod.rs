use std::{fs::File, path::PathBuf};

use anyhow::Context as _;
use log::info;

use self::app::PlayApp;
use crate::{command::EngineArgs, tui::Runtime};

mod app;
mod input;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    engine: EngineArgs,
    /// Frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    /// Hide the landing preview
    #[arg(long)]
    no_ghost: bool,
    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            engine: EngineArgs::default(),
            fps: 60.0,
            no_ghost: false,
            log_file: None,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        engine,
        fps,
        no_ghost,
        log_file,
    } = arg;

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    anyhow::ensure!(*fps > 0.0, "--fps must be positive, got {fps}");

    let config = engine.load_config()?;
    let mut app = PlayApp::new(&config, *fps, !*no_ghost)?;
    Runtime::new().run(&mut app)?;

    let state = app.session().state();
    info!(
        "session ended: {} with score {} at level {}",
        state.status(),
        state.score(),
        state.level()
    );
    Ok(())
}
