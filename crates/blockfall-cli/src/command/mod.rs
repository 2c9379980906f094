use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{EngineConfig, PieceSeed};
use clap::{Parser, Subcommand};

use self::{play::PlayArg, simulate::SimulateArg};
use crate::util;

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run a headless game driven by a random bot and print the result as JSON
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Engine settings shared by every mode.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EngineArgs {
    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Piece queue seed, up to 32 hex digits
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Board width in cells
    #[arg(long)]
    width: Option<usize>,
    /// Board height in cells
    #[arg(long)]
    height: Option<usize>,
}

impl EngineArgs {
    /// Reads the config file, if any, then applies command line overrides.
    pub(crate) fn load_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config: EngineConfig = match &self.config {
            Some(path) => util::read_json_file("engine config", path)?,
            None => EngineConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(width) = self.width {
            config.board.width = width;
        }
        if let Some(height) = self.height {
            config.board.height = height;
        }
        config.validate().context("Invalid engine configuration")?;
        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_play() {
        let args = CommandArgs::try_parse_from(["blockfall"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let args = CommandArgs::try_parse_from([
            "blockfall", "simulate", "--seed", "ff", "--width", "8", "--height", "16",
        ])
        .unwrap();
        let Some(Mode::Simulate(arg)) = args.mode else {
            panic!("expected simulate mode");
        };
        let config = arg.engine.load_config().unwrap();
        assert_eq!(config.seed, Some(PieceSeed::from_u128(0xff)));
        assert_eq!(config.board.width, 8);
        assert_eq!(config.board.height, 16);
        assert_eq!(config.timing, EngineConfig::default().timing);
    }

    #[test]
    fn test_rejects_invalid_overrides() {
        let args = EngineArgs {
            width: Some(2),
            ..EngineArgs::default()
        };
        let error = args.load_config().unwrap_err();
        assert!(format!("{error:#}").contains("board width"));
    }

    #[test]
    fn test_missing_config_file() {
        let args = EngineArgs {
            config: Some(PathBuf::from("/nonexistent/blockfall.json")),
            ..EngineArgs::default()
        };
        let error = args.load_config().unwrap_err();
        assert!(format!("{error:#}").contains("engine config"));
    }
}
