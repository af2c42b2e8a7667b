//! blocktris: falling-block puzzle game in the terminal.

mod app;
mod block;
mod game;
mod input;
mod shape;
mod stage;
mod theme;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options derived from CLI that affect game behaviour (stage size, base speed, spawn seed).
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Tick interval at level 1.
    pub speed: Duration,
    /// Fixed seed for the spawn sequence; random when absent.
    pub seed: Option<u64>,
}

impl From<&Args> for GameConfig {
    fn from(args: &Args) -> Self {
        Self {
            width: args.width as usize,
            height: args.height as usize,
            speed: Duration::from_millis(args.speed),
            seed: args.seed,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        warn!("theme not loaded ({e}), using defaults");
        let mut theme = theme::Theme::default();
        theme.apply_palette(args.palette);
        theme
    });
    let config = GameConfig::from(&args);
    info!(
        "stage {}x{}, base tick {}ms",
        config.width,
        config.height,
        config.speed.as_millis()
    );
    let mut app = App::new(&config, theme, args.start);
    app.run()?;
    Ok(())
}

/// The terminal belongs to the game, so logs only go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blocktris",
    version,
    about = "Falling-block puzzle in the terminal. Clear full rows; every 10 rows the pieces fall faster.",
    long_about = "blocktris is a small falling-block puzzle for the terminal.\n\n\
        Steer the falling piece, fill complete rows to clear them. Each cleared row is one \
        point; every 10 points the fall speeds up by one level.\n\n\
        CONTROLS:\n  Left / J    Move left    Right / L   Move right\n  Up / I      Rotate       Down / K    Soft drop\n  \
        S           New game     P           Pause\n  R           Resume       Q / Esc     Quit"
)]
pub struct Args {
    /// Stage width in columns.
    #[arg(long, default_value_t = 10, value_name = "COLS", value_parser = clap::value_parser!(u16).range(4..=64))]
    pub width: u16,

    /// Stage height in rows.
    #[arg(long, default_value_t = 20, value_name = "ROWS", value_parser = clap::value_parser!(u16).range(4..=64))]
    pub height: u16,

    /// Tick interval at level 1, in milliseconds.
    #[arg(long, default_value_t = 500, value_name = "MS", value_parser = clap::value_parser!(u64).range(50..=5000))]
    pub speed: u64,

    /// Seed for the piece sequence (repeatable games).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Start a game immediately instead of waiting for S.
    #[arg(long)]
    pub start: bool,

    /// Path to theme file (btop-style theme[key]=\"value\"). Built-in colours if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write logs to this file (filter with RUST_LOG, default info).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
