//! Logical addressing of cells and the walls around them

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};

/// Location of a cell in the maze
///
/// Rows increase downwards, columns increase to the right. Coordinates are
/// signed so that a step off the grid stays representable and can be
/// rejected by the grid instead of wrapping around.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct CellLocation {
    pub row: i32,
    pub col: i32,
}

impl CellLocation {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Location one step towards `dir`, whether or not it is on the grid.
    ///
    /// `None` only when the step leaves the range of `i32`.
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dr, dc) = dir.offset();
        Some(Self {
            row: self.row.checked_add(dr)?,
            col: self.col.checked_add(dc)?,
        })
    }

    /// Direction leading from `self` to `other`, if they are grid-adjacent.
    pub fn direction_to(self, other: CellLocation) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| self.step(*dir) == Some(other))
    }
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parse `"ROW,COL"`
impl FromStr for CellLocation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("Expected location as `ROW,COL`, got `{}`", s))?;
        let row = row
            .trim()
            .parse()
            .with_context(|| format!("Invalid row in `{}`", s))?;
        let col = col
            .trim()
            .parse()
            .with_context(|| format!("Invalid column in `{}`", s))?;
        Ok(Self { row, col })
    }
}

/// Side of a cell
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Direction {
    /// Up, or -row
    North,
    /// Down, or +row
    South,
    /// Right, or +col
    East,
    /// Left, or -col
    West,
}

impl Direction {
    /// Canonical neighbor order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit step `(drow, dcol)`
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(Direction::North),
            "s" | "south" => Ok(Direction::South),
            "e" | "east" => Ok(Direction::East),
            "w" | "west" => Ok(Direction::West),
            _ => bail!("Unknown direction `{}`", s),
        }
    }
}

/// Which of the two wall mappings a wall lives in
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Orientation {
    /// Runs east-west; `(rows + 1) x cols` of them
    Horizontal,
    /// Runs north-south; `rows x (cols + 1)` of them
    Vertical,
}

/// Address of a single wall
///
/// The north wall of cell `(r, c)` is `Horizontal (r, c)` and its south wall
/// `Horizontal (r + 1, c)`; the west wall is `Vertical (r, c)` and the east
/// wall `Vertical (r, c + 1)`.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct WallId {
    pub orientation: Orientation,
    pub row: usize,
    pub col: usize,
}

impl WallId {
    pub fn horizontal(row: usize, col: usize) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            row,
            col,
        }
    }

    pub fn vertical(row: usize, col: usize) -> Self {
        Self {
            orientation: Orientation::Vertical,
            row,
            col,
        }
    }
}

impl fmt::Display for WallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.orientation {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        };
        write!(f, "{} wall ({}, {})", kind, self.row, self.col)
    }
}

/// A perimeter wall used as entrance or exit
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Opening {
    pub loc: CellLocation,
    pub side: Direction,
}

impl Opening {
    pub fn new(loc: CellLocation, side: Direction) -> Self {
        Self { loc, side }
    }
}

impl fmt::Display for Opening {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} side of {}", self.side, self.loc)
    }
}

/// Parse `"ROW,COL:SIDE"`, e.g. `0,0:north`
impl FromStr for Opening {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (loc, side) = s
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("Expected opening as `ROW,COL:SIDE`, got `{}`", s))?;
        Ok(Self {
            loc: loc.parse()?,
            side: side.parse()?,
        })
    }
}
