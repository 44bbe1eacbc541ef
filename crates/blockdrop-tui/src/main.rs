use std::{fs, path::PathBuf};

use anyhow::Context as _;
use blockdrop_engine::{GameConfig, PieceSeed};
use clap::Parser;
use rand::Rng as _;

use crate::app::BlockdropApp;

mod app;
mod event_loop;
mod widgets;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Piece sequence seed, 32 hex characters (random if omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Path to a JSON file overriding parts of the default game configuration
    #[clap(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    config.validate()?;
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());

    let mut app = BlockdropApp::new(config, seed);
    ratatui::run(|terminal| app.run(terminal))?;
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
}
