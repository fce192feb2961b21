//! Carve a perfect maze and find the way through it
//!
//! A maze is a [`PackedGrid`] of cells and walls. [`carve_maze`] opens walls
//! with a randomized depth-first backtracker until the open walls form a
//! spanning tree over all cells, so there is exactly one simple path between
//! any two of them. [`solve_maze`] then finds that path with a depth-first
//! search that only moves through open walls.
//!
//! # Examples
//! ## Carve and solve by hand
//! ```
//! use perfect_maze::{carve_maze, create_grid, solve_maze, CellLocation, Direction, NoHook, Opening, Selection};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut grid = create_grid(8, 12).unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//! carve_maze(&mut grid, CellLocation::new(0, 0), &mut rng, &mut NoHook).unwrap();
//! assert_eq!(grid.open_interior_wall_count(), 8 * 12 - 1);
//!
//! let entrance = CellLocation::new(0, 0);
//! let exit = CellLocation::new(7, 11);
//! grid.open_boundary_wall(Opening::new(entrance, Direction::North)).unwrap();
//! grid.open_boundary_wall(Opening::new(exit, Direction::South)).unwrap();
//!
//! let solution = solve_maze(&mut grid, entrance, exit, Selection::Ordered, &mut NoHook).unwrap();
//! assert!(solution.solved);
//! assert!(solution.moves() >= 7 + 11);
//! ```
//!
//! ## Using a context
//! ```
//! use perfect_maze::{MazeConfig, MazeContext, NoHook};
//! use perfect_maze::render::EmojiMaze;
//!
//! let mut config = MazeConfig::new(5, 7);
//! config.seed = Some(1);
//! let mut context = MazeContext::new(config).unwrap();
//! let solution = context.run(&mut NoHook).unwrap();
//! assert!(solution.solved);
//!
//! let mut maze = EmojiMaze::from_grid(context.grid());
//! maze.mark_path(&solution.path).unwrap();
//! maze.mark_openings(Some(context.config().entrance), Some(context.config().exit)).unwrap();
//! println!("{}", maze);
//! ```

use anyhow::Context;
use clap::ValueEnum;
use log::info;
use rand::{rngs::StdRng, SeedableRng};

pub mod geometry;
pub mod grid;
pub mod location;
pub mod maze_generator;
pub mod maze_solver;
pub mod render;
pub mod step;
pub mod svg;

pub use grid::{Cell, GridError, PackedGrid, Wall};
pub use location::{CellLocation, Direction, Opening, Orientation, WallId};
pub use maze_generator::{carve_maze, MazeGenerator};
pub use maze_solver::{solve_maze, Selection, Solution};
pub use step::{NoHook, Progress, Step, StepHook, StepLog};

/// Empty `rows x cols` grid: all walls solid, all cells unvisited
pub fn create_grid(rows: usize, cols: usize) -> anyhow::Result<PackedGrid> {
    PackedGrid::new(rows, cols)
}

/// Neighbor selection used by [`MazeContext::solve`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SelectionPolicy {
    /// Always try north, south, east, west in this order
    Ordered,
    /// Explore in random order
    #[default]
    Random,
}

/// Everything needed to build and solve one maze
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    /// Random seed; seeded from entropy when `None`
    pub seed: Option<u64>,
    /// Cell where carving starts
    pub start: CellLocation,
    /// Perimeter wall opened as entrance; the solver starts in its cell
    pub entrance: Opening,
    /// Perimeter wall opened as exit; the solver ends in its cell
    pub exit: Opening,
    pub selection: SelectionPolicy,
}

impl MazeConfig {
    /// Conventional layout: carve from the top-left cell, enter through its
    /// north wall and leave through the south wall of the bottom-right cell.
    pub fn new(rows: usize, cols: usize) -> Self {
        let top_left = CellLocation::new(0, 0);
        let bottom_right = CellLocation::new(rows as i32 - 1, cols as i32 - 1);
        Self {
            rows,
            cols,
            seed: None,
            start: top_left,
            entrance: Opening::new(top_left, Direction::North),
            exit: Opening::new(bottom_right, Direction::South),
            selection: SelectionPolicy::default(),
        }
    }
}

/// A grid together with its random source and configuration
pub struct MazeContext {
    config: MazeConfig,
    grid: PackedGrid,
    random: StdRng,
}

impl MazeContext {
    /// Validates the configuration against a fresh grid
    pub fn new(config: MazeConfig) -> anyhow::Result<Self> {
        let grid = PackedGrid::new(config.rows, config.cols)?;
        grid.cell(config.start).context("Invalid start")?;
        for (name, opening) in [("entrance", config.entrance), ("exit", config.exit)] {
            grid.cell(opening.loc)
                .with_context(|| format!("Invalid {}", name))?;
            if !grid.is_perimeter(opening.loc, opening.side) {
                return Err(anyhow::Error::new(GridError::NotPerimeter(opening))
                    .context(format!("Invalid {}", name)));
            }
        }
        let random = match config.seed {
            Some(state) => StdRng::seed_from_u64(state),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            grid,
            random,
        })
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    pub fn grid(&self) -> &PackedGrid {
        &self.grid
    }

    /// Carve the maze
    pub fn generate<H: StepHook + ?Sized>(&mut self, hook: &mut H) -> anyhow::Result<Progress> {
        info!(
            "Carving {}x{} maze from {}",
            self.config.rows, self.config.cols, self.config.start
        );
        carve_maze(&mut self.grid, self.config.start, &mut self.random, hook)
    }

    /// Clear the configured entrance and exit walls
    pub fn open_entrance_and_exit(&mut self) -> anyhow::Result<()> {
        self.grid.open_boundary_wall(self.config.entrance)?;
        self.grid.open_boundary_wall(self.config.exit)?;
        Ok(())
    }

    /// Search from the entrance cell to the exit cell
    pub fn solve<H: StepHook + ?Sized>(&mut self, hook: &mut H) -> anyhow::Result<Solution> {
        info!(
            "Solving from {} to {}",
            self.config.entrance.loc, self.config.exit.loc
        );
        let selection = match self.config.selection {
            SelectionPolicy::Ordered => Selection::Ordered,
            SelectionPolicy::Random => Selection::Random(&mut self.random),
        };
        solve_maze(
            &mut self.grid,
            self.config.entrance.loc,
            self.config.exit.loc,
            selection,
            hook,
        )
    }

    /// Carve, open entrance and exit, solve
    ///
    /// If the hook stops carving, the search is skipped and an unsolved,
    /// stopped [`Solution`] is returned.
    pub fn run<H: StepHook + ?Sized>(&mut self, hook: &mut H) -> anyhow::Result<Solution> {
        if self.generate(hook)? == Progress::Stopped {
            return Ok(Solution {
                solved: false,
                path: vec![],
                progress: Progress::Stopped,
            });
        }
        self.open_entrance_and_exit()?;
        self.solve(hook)
    }
}
