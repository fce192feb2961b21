//! Logical store of cell and wall state
//!
//! Cells, horizontal walls and vertical walls are kept in three separate
//! row-major arrays of `rows x cols`, `(rows + 1) x cols` and
//! `rows x (cols + 1)` entries. No pixel geometry lives here.

use std::fmt;

use crate::location::{CellLocation, Direction, Opening, Orientation, WallId};

/// State of one maze cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Scratch flag shared by generation and solving
    pub visited: bool,
}

/// State of one wall
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wall {
    /// `true` blocks passage
    pub solid: bool,
}

impl Default for Wall {
    fn default() -> Self {
        Self { solid: true }
    }
}

/// Addressing failures
///
/// These are programmer errors: the offending operation is aborted and the
/// error propagated as an [`anyhow::Error`]. Use
/// [`anyhow::Error::downcast_ref`] to inspect the variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    /// A grid needs at least one row and one column
    InvalidDimensions { rows: usize, cols: usize },
    /// Location outside `[0, rows) x [0, cols)`
    OutOfRange {
        loc: CellLocation,
        rows: usize,
        cols: usize,
    },
    /// Wall address outside the wall arrays
    UnknownWall(WallId),
    /// The two locations are not one unit apart along a single axis
    NonAdjacentWallRequest {
        from: CellLocation,
        to: CellLocation,
    },
    /// Entrances and exits must be on the perimeter
    NotPerimeter(Opening),
    /// Generation needs every cell unvisited and every interior wall solid
    AlreadyCarved,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidDimensions { rows, cols } => {
                write!(f, "Grid of {}x{} cells is empty", rows, cols)
            }
            GridError::OutOfRange { loc, rows, cols } => {
                write!(f, "Location {} is outside the {}x{} grid", loc, rows, cols)
            }
            GridError::UnknownWall(id) => write!(f, "No such wall: {}", id),
            GridError::NonAdjacentWallRequest { from, to } => {
                write!(f, "No wall between non-adjacent cells {} and {}", from, to)
            }
            GridError::NotPerimeter(opening) => {
                write!(f, "The {} is not a perimeter wall", opening)
            }
            GridError::AlreadyCarved => {
                f.write_str("Grid is already carved or has visited cells")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Rectangular grid of cells and the walls between them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    horizontal_walls: Vec<Wall>,
    vertical_walls: Vec<Wall>,
}

impl PackedGrid {
    /// Grid with every wall solid and every cell unvisited
    pub fn new(rows: usize, cols: usize) -> anyhow::Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols }.into());
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
            horizontal_walls: vec![Wall::default(); (rows + 1) * cols],
            vertical_walls: vec![Wall::default(); rows * (cols + 1)],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, loc: CellLocation) -> bool {
        loc.row >= 0
            && loc.col >= 0
            && (loc.row as usize) < self.rows
            && (loc.col as usize) < self.cols
    }

    fn check(&self, loc: CellLocation) -> Result<(usize, usize), GridError> {
        if self.contains(loc) {
            Ok((loc.row as usize, loc.col as usize))
        } else {
            Err(GridError::OutOfRange {
                loc,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    fn cell_index(&self, loc: CellLocation) -> Result<usize, GridError> {
        let (row, col) = self.check(loc)?;
        Ok(row * self.cols + col)
    }

    fn location_of(&self, index: usize) -> CellLocation {
        CellLocation::new((index / self.cols) as i32, (index % self.cols) as i32)
    }

    pub fn cell(&self, loc: CellLocation) -> anyhow::Result<&Cell> {
        Ok(&self.cells[self.cell_index(loc)?])
    }

    pub fn set_cell(&mut self, loc: CellLocation, value: Cell) -> anyhow::Result<()> {
        let idx = self.cell_index(loc)?;
        self.cells[idx] = value;
        Ok(())
    }

    pub(crate) fn mark_visited(&mut self, loc: CellLocation) -> anyhow::Result<()> {
        self.set_cell(loc, Cell { visited: true })
    }

    /// Address of the wall on side `dir` of `loc`
    ///
    /// Defined for every in-range location, including perimeter sides.
    pub fn wall_id(&self, loc: CellLocation, dir: Direction) -> anyhow::Result<WallId> {
        let (row, col) = self.check(loc)?;
        Ok(match dir {
            Direction::North => WallId::horizontal(row, col),
            Direction::South => WallId::horizontal(row + 1, col),
            Direction::West => WallId::vertical(row, col),
            Direction::East => WallId::vertical(row, col + 1),
        })
    }

    fn wall_index(&self, id: WallId) -> Result<usize, GridError> {
        let (height, width) = match id.orientation {
            Orientation::Horizontal => (self.rows + 1, self.cols),
            Orientation::Vertical => (self.rows, self.cols + 1),
        };
        if id.row < height && id.col < width {
            Ok(id.row * width + id.col)
        } else {
            Err(GridError::UnknownWall(id))
        }
    }

    pub fn wall_by_id(&self, id: WallId) -> anyhow::Result<&Wall> {
        let idx = self.wall_index(id)?;
        Ok(match id.orientation {
            Orientation::Horizontal => &self.horizontal_walls[idx],
            Orientation::Vertical => &self.vertical_walls[idx],
        })
    }

    pub fn wall_by_id_mut(&mut self, id: WallId) -> anyhow::Result<&mut Wall> {
        let idx = self.wall_index(id)?;
        Ok(match id.orientation {
            Orientation::Horizontal => &mut self.horizontal_walls[idx],
            Orientation::Vertical => &mut self.vertical_walls[idx],
        })
    }

    pub fn wall(&self, loc: CellLocation, dir: Direction) -> anyhow::Result<&Wall> {
        self.wall_by_id(self.wall_id(loc, dir)?)
    }

    pub fn wall_mut(&mut self, loc: CellLocation, dir: Direction) -> anyhow::Result<&mut Wall> {
        let id = self.wall_id(loc, dir)?;
        self.wall_by_id_mut(id)
    }

    pub fn north_wall(&self, loc: CellLocation) -> anyhow::Result<&Wall> {
        self.wall(loc, Direction::North)
    }

    pub fn south_wall(&self, loc: CellLocation) -> anyhow::Result<&Wall> {
        self.wall(loc, Direction::South)
    }

    pub fn east_wall(&self, loc: CellLocation) -> anyhow::Result<&Wall> {
        self.wall(loc, Direction::East)
    }

    pub fn west_wall(&self, loc: CellLocation) -> anyhow::Result<&Wall> {
        self.wall(loc, Direction::West)
    }

    /// The wall shared by two grid-adjacent cells
    pub fn wall_between(&self, from: CellLocation, to: CellLocation) -> anyhow::Result<WallId> {
        self.check(from)?;
        self.check(to)?;
        let dir = from
            .direction_to(to)
            .ok_or(GridError::NonAdjacentWallRequest { from, to })?;
        self.wall_id(from, dir)
    }

    /// Open the wall between two grid-adjacent cells
    pub fn carve_between(&mut self, from: CellLocation, to: CellLocation) -> anyhow::Result<WallId> {
        let id = self.wall_between(from, to)?;
        self.wall_by_id_mut(id)?.solid = false;
        Ok(id)
    }

    pub fn is_open_between(&self, from: CellLocation, to: CellLocation) -> anyhow::Result<bool> {
        let id = self.wall_between(from, to)?;
        Ok(!self.wall_by_id(id)?.solid)
    }

    /// Whether side `dir` of `loc` faces the exterior
    pub fn is_perimeter(&self, loc: CellLocation, dir: Direction) -> bool {
        self.contains(loc) && !loc.step(dir).is_some_and(|n| self.contains(n))
    }

    fn is_interior(&self, id: WallId) -> bool {
        match id.orientation {
            Orientation::Horizontal => id.row > 0 && id.row < self.rows,
            Orientation::Vertical => id.col > 0 && id.col < self.cols,
        }
    }

    /// Clear a perimeter wall, e.g. as entrance or exit
    pub fn open_boundary_wall(&mut self, opening: Opening) -> anyhow::Result<WallId> {
        self.check(opening.loc)?;
        if !self.is_perimeter(opening.loc, opening.side) {
            return Err(GridError::NotPerimeter(opening).into());
        }
        let id = self.wall_id(opening.loc, opening.side)?;
        self.wall_by_id_mut(id)?.solid = false;
        Ok(id)
    }

    /// Grid-adjacent locations in canonical order (north, south, east, west)
    pub fn adjacent_cell_locations(&self, loc: CellLocation) -> anyhow::Result<Vec<CellLocation>> {
        self.check(loc)?;
        Ok(Direction::ALL
            .into_iter()
            .filter_map(|dir| loc.step(dir))
            .filter(|n| self.contains(*n))
            .collect())
    }

    /// Adjacent locations reachable through an open wall
    pub fn open_neighbors(&self, loc: CellLocation) -> anyhow::Result<Vec<CellLocation>> {
        self.check(loc)?;
        let mut neighbors = Vec::with_capacity(4);
        for dir in Direction::ALL {
            match loc.step(dir) {
                Some(next) if self.contains(next) && !self.wall(loc, dir)?.solid => {
                    neighbors.push(next)
                }
                _ => (),
            }
        }
        Ok(neighbors)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (CellLocation, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (self.location_of(idx), cell))
    }

    fn wall_row(
        &self,
        orientation: Orientation,
        row: usize,
    ) -> impl Iterator<Item = (WallId, &Wall)> + '_ {
        let (walls, width) = match orientation {
            Orientation::Horizontal => (&self.horizontal_walls, self.cols),
            Orientation::Vertical => (&self.vertical_walls, self.cols + 1),
        };
        walls[row * width..(row + 1) * width]
            .iter()
            .enumerate()
            .map(move |(col, wall)| (WallId { orientation, row, col }, wall))
    }

    /// All walls, top to bottom
    ///
    /// Rows of horizontal walls alternate with rows of vertical walls, the
    /// order in which they appear when the maze is drawn as text.
    pub fn walls(&self) -> impl Iterator<Item = (WallId, &Wall)> + '_ {
        let horizontal = (0..=self.rows).map(move |row| self.wall_row(Orientation::Horizontal, row));
        let vertical = (0..self.rows).map(move |row| self.wall_row(Orientation::Vertical, row));
        itertools::interleave(horizontal, vertical).flatten()
    }

    pub fn apply_to_cells<F>(&mut self, mut func: F)
    where
        F: FnMut(CellLocation, &mut Cell),
    {
        let cols = self.cols;
        for (idx, cell) in self.cells.iter_mut().enumerate() {
            func(
                CellLocation::new((idx / cols) as i32, (idx % cols) as i32),
                cell,
            );
        }
    }

    /// Visit walls mutably, in the same order as [`Self::walls`]
    pub fn apply_to_walls<F>(&mut self, mut func: F)
    where
        F: FnMut(WallId, &mut Wall),
    {
        for line in 0..(2 * self.rows + 1) {
            let row = line / 2;
            let (orientation, width, walls) = if line % 2 == 0 {
                (Orientation::Horizontal, self.cols, &mut self.horizontal_walls)
            } else {
                (Orientation::Vertical, self.cols + 1, &mut self.vertical_walls)
            };
            for (col, wall) in walls[row * width..(row + 1) * width].iter_mut().enumerate() {
                func(WallId { orientation, row, col }, wall);
            }
        }
    }

    pub fn reset_visited(&mut self) {
        self.apply_to_cells(|_, cell| cell.visited = false);
    }

    pub fn open_interior_wall_count(&self) -> usize {
        self.walls()
            .filter(|(id, wall)| !wall.solid && self.is_interior(*id))
            .count()
    }

    /// Every cell unvisited and every interior wall solid
    ///
    /// Perimeter walls are ignored, so an entrance may be opened before
    /// carving.
    pub fn is_pristine(&self) -> bool {
        self.cells.iter().all(|cell| !cell.visited)
            && self
                .walls()
                .all(|(id, wall)| wall.solid || !self.is_interior(id))
    }
}
