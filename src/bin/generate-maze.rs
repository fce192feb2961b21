//! CLI for maze generation

use std::{io, time::Duration};

use clap::Parser;
use log::LevelFilter;
use perfect_maze::{
    render::{EmojiMaze, Playback},
    CellLocation, MazeConfig, MazeContext, NoHook, Opening, Progress,
};

/// Perfect maze generator; the output can be fed to `solve-maze`
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of cell rows
    #[arg(long, default_value_t = 11)]
    rows: usize,

    /// Number of cell columns
    #[arg(long, default_value_t = 15)]
    cols: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Cell where carving starts, as `ROW,COL`
    #[arg(long, default_value = "0,0")]
    start: CellLocation,

    /// Entrance as `ROW,COL:SIDE` [default: north side of the top-left cell]
    #[arg(long)]
    entrance: Option<Opening>,

    /// Exit as `ROW,COL:SIDE` [default: south side of the bottom-right cell]
    #[arg(long)]
    exit: Option<Opening>,

    /// Animate carving on the terminal
    #[arg(short, long)]
    playback: bool,

    /// Playback frame length in milliseconds
    #[arg(short, long, default_value_t = 50)]
    frame_length: u64,
}

/// Carve a maze, print it
fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let defaults = MazeConfig::new(args.rows, args.cols);
    let config = MazeConfig {
        seed: args.seed,
        start: args.start,
        entrance: args.entrance.unwrap_or(defaults.entrance),
        exit: args.exit.unwrap_or(defaults.exit),
        ..defaults
    };
    let mut context = MazeContext::new(config)?;

    let progress = if args.playback {
        let mut playback = Playback::new(io::stdout(), Duration::from_millis(args.frame_length));
        context.generate(&mut playback)?
    } else {
        context.generate(&mut NoHook)?
    };
    if progress == Progress::Stopped {
        anyhow::bail!("Generation was interrupted");
    }
    context.open_entrance_and_exit()?;

    let (entrance, exit) = (context.config().entrance, context.config().exit);
    let mut maze = EmojiMaze::from_grid(context.grid());
    maze.mark_openings(Some(entrance), Some(exit))?;
    println!("{}", maze);
    Ok(())
}
