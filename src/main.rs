//! CLI for maze solving

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};
use perfect_maze::{
    geometry::{draw_path, draw_walls, Color, ScreenCoordinateCalculator},
    render::{parse_emojis, EmojiMaze, Playback},
    solve_maze,
    svg::SvgRenderer,
    CellLocation, MazeConfig, MazeContext, NoHook, Opening, PackedGrid, Selection,
    SelectionPolicy, Solution, StepHook,
};
use rand::{rngs::StdRng, SeedableRng};

/// Carve a perfect maze and find the way through it
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

    /// How the solver picks among open neighbors
    #[arg(long, value_enum, default_value_t = SelectionPolicy::Random)]
    selection: SelectionPolicy,

    /// Animate generation and solving on the terminal
    #[arg(short, long)]
    playback: bool,

    /// Playback frame length in milliseconds
    #[arg(short, long, default_value_t = 50)]
    frame_length: u64,

    /// Also draw the solved maze into this SVG file
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Cell size in pixels for the SVG drawing
    #[arg(long, default_value_t = 30)]
    cell_size: u32,

    /// Solve the emoji maze in this file instead of generating one. Use `-`
    /// for stdin.
    file: Option<PathBuf>,
}

/// Generate or read a maze, print the way through it
fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let mut playback = Playback::new(io::stdout(), Duration::from_millis(args.frame_length));
    let mut no_hook = NoHook;

    let (grid, entrance, exit, solution) = match &args.file {
        Some(file) => {
            let emojis = read_maze(file)?;
            let parsed = parse_emojis(&emojis)
                .with_context(|| format!("Could not parse maze from {}", file.display()))?;
            let entrance = args
                .entrance
                .or(parsed.entrance)
                .context("Maze has no entrance; mark one with 🏃 or pass --entrance")?;
            let exit = args
                .exit
                .or(parsed.exit)
                .context("Maze has no exit; mark one with ❎ or pass --exit")?;

            let mut grid = parsed.grid;
            grid.open_boundary_wall(entrance)?;
            grid.open_boundary_wall(exit)?;

            let mut random = match args.seed {
                Some(state) => StdRng::seed_from_u64(state),
                None => StdRng::from_entropy(),
            };
            let selection = match args.selection {
                SelectionPolicy::Ordered => Selection::Ordered,
                SelectionPolicy::Random => Selection::Random(&mut random),
            };
            playback = playback.with_openings(Some(entrance), Some(exit));
            let hook: &mut dyn StepHook = if args.playback {
                &mut playback
            } else {
                &mut no_hook
            };
            let solution = solve_maze(&mut grid, entrance.loc, exit.loc, selection, hook)?;
            (grid, entrance, exit, solution)
        }
        None => {
            let defaults = MazeConfig::new(args.rows, args.cols);
            let config = MazeConfig {
                seed: args.seed,
                start: args.start,
                entrance: args.entrance.unwrap_or(defaults.entrance),
                exit: args.exit.unwrap_or(defaults.exit),
                selection: args.selection,
                ..defaults
            };
            let mut context = MazeContext::new(config)?;
            playback = playback.with_openings(Some(context.config().entrance), Some(context.config().exit));
            let hook: &mut dyn StepHook = if args.playback {
                &mut playback
            } else {
                &mut no_hook
            };
            let solution = context.run(hook)?;
            let (entrance, exit) = (context.config().entrance, context.config().exit);
            (context.grid().clone(), entrance, exit, solution)
        }
    };

    if !args.playback {
        let mut maze = EmojiMaze::from_grid(&grid);
        maze.mark_path(&solution.path)?;
        maze.mark_openings(Some(entrance), Some(exit))?;
        println!("{}", maze);
    }
    print_report(&solution);

    if let Some(path) = &args.svg {
        write_svg(path, &grid, &solution, args.cell_size)?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn read_maze(file: &Path) -> anyhow::Result<String> {
    if file.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(file).with_context(|| format!("Could not read {}", file.display()))
    }
}

fn print_report(solution: &Solution) {
    if solution.solved {
        println!("The way through the maze is {} steps.", solution.moves())
    } else {
        println!("There is no way through the maze.")
    }
}

fn write_svg(path: &Path, grid: &PackedGrid, solution: &Solution, cell_size: u32) -> anyhow::Result<()> {
    let calc = ScreenCoordinateCalculator::new(cell_size, cell_size / 2 + 1);
    let (width, height) = calc.canvas_size(grid.rows(), grid.cols());
    let mut svg = SvgRenderer::new(width, height);
    draw_walls(grid, &calc, &mut svg);
    draw_path(&solution.path, &calc, &mut svg, Color::Red);
    fs::write(path, svg.finish()).with_context(|| format!("Could not write {}", path.display()))
}
