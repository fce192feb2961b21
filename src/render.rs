//! Emoji rendering of mazes
//!
//! A `rows x cols` maze is drawn as `(2 * rows + 1) x (2 * cols + 1)`
//! squares: cells sit at odd row and column, corners at even row and column,
//! and every other square is the wall between its two neighbors.

use std::fmt;
use std::io::Write;
use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use itertools::Itertools;
use log::warn;

use crate::grid::PackedGrid;
use crate::location::{CellLocation, Direction, Opening, Orientation, WallId};
use crate::step::{Step, StepHook};

/// Text representation of a maze, one emoji per square
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmojiMaze {
    squares: Vec<Vec<char>>,
}

/// Maze read back from its emoji representation
pub struct ParsedMaze {
    pub grid: PackedGrid,
    pub entrance: Option<Opening>,
    pub exit: Option<Opening>,
}

impl EmojiMaze {
    pub const S_ENTRANCE: char = '🏃';
    pub const S_EXIT: char = '❎';
    pub const S_VALID: char = '🟩';
    pub const S_WALL: char = '🟫';
    pub const S_PATH: char = '🟨';
    pub const S_DEAD: char = '🟥';

    /// Draw walls and cells; open perimeter walls show as passable.
    pub fn from_grid(grid: &PackedGrid) -> Self {
        let mut squares: Vec<Vec<char>> = (0..2 * grid.rows() + 1)
            .map(|_| (0..2 * grid.cols() + 1).map(|_| Self::S_WALL).collect())
            .collect();
        for (loc, _) in grid.cells() {
            let (y, x) = cell_square(loc);
            squares[y][x] = Self::S_VALID;
        }
        for (id, wall) in grid.walls() {
            if !wall.solid {
                let (y, x) = wall_square(id);
                squares[y][x] = Self::S_VALID;
            }
        }
        Self { squares }
    }

    fn set(&mut self, (y, x): (usize, usize), symbol: char) -> anyhow::Result<()> {
        let square = self
            .squares
            .get_mut(y)
            .and_then(|row| row.get_mut(x))
            .ok_or_else(|| anyhow!("Square y={}, x={} is outside the maze", y, x))?;
        *square = symbol;
        Ok(())
    }

    /// Paint the entrance and exit walls
    pub fn mark_openings(
        &mut self,
        entrance: Option<Opening>,
        exit: Option<Opening>,
    ) -> anyhow::Result<()> {
        for (opening, symbol) in [(entrance, Self::S_ENTRANCE), (exit, Self::S_EXIT)] {
            if let Some(opening) = opening {
                self.set(opening_square(opening)?, symbol)?;
            }
        }
        Ok(())
    }

    /// Paint cells with `symbol`
    pub fn mark_cells(&mut self, cells: &[CellLocation], symbol: char) -> anyhow::Result<()> {
        for loc in cells {
            self.set(checked_cell_square(*loc)?, symbol)?;
        }
        Ok(())
    }

    /// Paint a path of adjacent cells and the walls between them
    pub fn mark_path(&mut self, path: &[CellLocation]) -> anyhow::Result<()> {
        self.mark_cells(path, Self::S_PATH)?;
        for (a, b) in path.iter().tuple_windows() {
            if a.direction_to(*b).is_none() {
                bail!("Path steps from {} to non-adjacent {}", a, b);
            }
            let (ay, ax) = checked_cell_square(*a)?;
            let (by, bx) = checked_cell_square(*b)?;
            self.set(((ay + by) / 2, (ax + bx) / 2), Self::S_PATH)?;
        }
        Ok(())
    }
}

impl fmt::Display for EmojiMaze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.squares.iter().map(|row| row.iter().join("")).join("\n");
        f.write_str(&text)
    }
}

fn cell_square(loc: CellLocation) -> (usize, usize) {
    (2 * loc.row as usize + 1, 2 * loc.col as usize + 1)
}

fn checked_cell_square(loc: CellLocation) -> anyhow::Result<(usize, usize)> {
    if loc.row < 0 || loc.col < 0 {
        bail!("Location {} is outside the maze", loc);
    }
    Ok(cell_square(loc))
}

fn wall_square(id: WallId) -> (usize, usize) {
    match id.orientation {
        Orientation::Horizontal => (2 * id.row, 2 * id.col + 1),
        Orientation::Vertical => (2 * id.row + 1, 2 * id.col),
    }
}

fn opening_square(opening: Opening) -> anyhow::Result<(usize, usize)> {
    let (y, x) = checked_cell_square(opening.loc)?;
    let (dy, dx) = opening.side.offset();
    Ok(((y as i32 + dy) as usize, (x as i32 + dx) as usize))
}

/// Opening for a wall on the perimeter of a `rows x cols` grid
fn perimeter_opening(id: WallId, rows: usize, cols: usize) -> Option<Opening> {
    let (loc, side) = match id.orientation {
        Orientation::Horizontal if id.row == 0 => ((0, id.col), Direction::North),
        Orientation::Horizontal if id.row == rows => ((rows - 1, id.col), Direction::South),
        Orientation::Vertical if id.col == 0 => ((id.row, 0), Direction::West),
        Orientation::Vertical if id.col == cols => ((id.row, cols - 1), Direction::East),
        _ => return None,
    };
    Some(Opening::new(
        CellLocation::new(loc.0 as i32, loc.1 as i32),
        side,
    ))
}

/// Parse maze from its emoji representation
///
/// Corners must be walls and cells must be passable. Walls are solid when
/// drawn as [`EmojiMaze::S_WALL`]; any other known symbol opens them. The
/// entrance and exit symbols may only appear on the perimeter.
///
/// # Examples
/// ```
/// use perfect_maze::render::parse_emojis;
///
/// let maze = parse_emojis("
/// 🟫🏃🟫🟫🟫
/// 🟫🟩🟩🟩🟫
/// 🟫🟫🟫🟩🟫
/// 🟫🟩🟩🟩🟫
/// 🟫❎🟫🟫🟫").unwrap();
/// assert_eq!(maze.grid.rows(), 2);
/// assert_eq!(maze.grid.open_interior_wall_count(), 3);
/// assert!(maze.entrance.is_some() && maze.exit.is_some());
/// ```
pub fn parse_emojis(emojis: &str) -> anyhow::Result<ParsedMaze> {
    let squares: Vec<Vec<char>> = emojis
        .trim()
        .lines()
        .map(|row| row.trim().chars().collect())
        .collect();

    let height = squares.len();
    let width = squares.first().map_or(0, |row| row.len());
    if height < 3 || width < 3 || height % 2 == 0 || width % 2 == 0 {
        bail!(
            "Maze of {}x{} squares is not an odd size of at least 3x3",
            height,
            width
        );
    }
    if let Some((y, row)) = squares.iter().find_position(|row| row.len() != width) {
        bail!(
            "Row {} has {} squares, expected {}",
            y,
            row.len(),
            width
        );
    }

    let (rows, cols) = ((height - 1) / 2, (width - 1) / 2);
    let mut grid = PackedGrid::new(rows, cols)?;
    let mut entrance = None;
    let mut exit = None;

    for (y, row) in squares.iter().enumerate() {
        for (x, c) in row.iter().enumerate() {
            let open = match *c {
                EmojiMaze::S_WALL => false,
                EmojiMaze::S_VALID
                | EmojiMaze::S_PATH
                | EmojiMaze::S_DEAD
                | EmojiMaze::S_ENTRANCE
                | EmojiMaze::S_EXIT => true,
                val => bail!("Unexpected character `{}` at y={}, x={}", val, y, x),
            };

            let id = match (y % 2, x % 2) {
                (0, 0) if open => bail!("Corner at y={}, x={} must be a wall", y, x),
                (1, 1) if !open => bail!("Cell at y={}, x={} must not be a wall", y, x),
                (0, 0) | (1, 1) => None,
                (0, _) => Some(WallId::horizontal(y / 2, (x - 1) / 2)),
                _ => Some(WallId::vertical((y - 1) / 2, x / 2)),
            };

            let marker = match *c {
                EmojiMaze::S_ENTRANCE => Some(&mut entrance),
                EmojiMaze::S_EXIT => Some(&mut exit),
                _ => None,
            };
            if let Some(slot) = marker {
                let opening = id
                    .and_then(|id| perimeter_opening(id, rows, cols))
                    .with_context(|| format!("`{}` at y={}, x={} is not on the perimeter", c, y, x))?;
                if slot.replace(opening).is_some() {
                    bail!("Second `{}` at y={}, x={}", c, y, x);
                }
            }

            if let Some(id) = id {
                grid.wall_by_id_mut(id)?.solid = !open;
            }
        }
    }

    Ok(ParsedMaze {
        grid,
        entrance,
        exit,
    })
}

/// Terminal animation of generation and solving
///
/// Redraws the whole maze after every step, then sleeps for one frame.
/// Cells on the current search stack are drawn as [`EmojiMaze::S_PATH`],
/// cells the solver backed out of as [`EmojiMaze::S_DEAD`].
pub struct Playback<W: Write> {
    out: W,
    frame: Duration,
    entrance: Option<Opening>,
    exit: Option<Opening>,
    trail: Vec<CellLocation>,
    dead: Vec<CellLocation>,
    solving: bool,
}

impl<W: Write> Playback<W> {
    pub fn new(out: W, frame: Duration) -> Self {
        Self {
            out,
            frame,
            entrance: None,
            exit: None,
            trail: vec![],
            dead: vec![],
            solving: false,
        }
    }

    pub fn with_openings(mut self, entrance: Option<Opening>, exit: Option<Opening>) -> Self {
        self.entrance = entrance;
        self.exit = exit;
        self
    }

    fn record(&mut self, step: Step) {
        match step {
            Step::Carve { from, to } | Step::Advance { from, to } => {
                self.solving = matches!(step, Step::Advance { .. });
                if self.trail.last() != Some(&from) {
                    self.trail.push(from);
                }
                self.trail.push(to);
            }
            Step::Backtrack { from, .. } => {
                if self.trail.last() == Some(&from) {
                    self.trail.pop();
                }
                if self.solving {
                    self.dead.push(from);
                }
            }
        }
    }

    fn frame(&self, grid: &PackedGrid) -> anyhow::Result<EmojiMaze> {
        let mut maze = EmojiMaze::from_grid(grid);
        maze.mark_cells(&self.dead, EmojiMaze::S_DEAD)?;
        maze.mark_path(&self.trail)?;
        maze.mark_openings(self.entrance, self.exit)?;
        Ok(maze)
    }

    fn draw(&mut self, grid: &PackedGrid) -> anyhow::Result<()> {
        let maze = self.frame(grid)?;
        write!(self.out, "\x1B[2J\x1B[1;1H")?;
        writeln!(self.out, "{}", maze)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StepHook for Playback<W> {
    fn on_step(&mut self, grid: &PackedGrid, step: Step) -> ControlFlow<()> {
        self.record(step);
        if let Err(err) = self.draw(grid) {
            warn!("Stopping playback: {:#}", err);
            return ControlFlow::Break(());
        }
        if !self.frame.is_zero() {
            thread::sleep(self.frame);
        }
        ControlFlow::Continue(())
    }
}
