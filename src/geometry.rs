//! Pixel geometry for drawing a maze
//!
//! Only presentation code uses this; generation and solving work on
//! row/column addresses alone.

use std::ops::ControlFlow;

use itertools::Itertools;

use crate::grid::PackedGrid;
use crate::location::{CellLocation, Orientation, WallId};
use crate::step::{Step, StepHook};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    White,
    Red,
    Gray,
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
            Color::Red => "red",
            Color::Gray => "gray",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Line(Line),
    Point(Point),
}

/// Something that can draw
pub trait Renderer {
    fn draw(&mut self, shape: Shape, color: Color);
}

/// Maps cell and wall addresses to pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenCoordinateCalculator {
    cell_size: i32,
    border_width: i32,
}

impl ScreenCoordinateCalculator {
    pub fn new(cell_size: u32, border_width: u32) -> Self {
        Self {
            cell_size: cell_size as i32,
            border_width: border_width as i32,
        }
    }

    /// Canvas `(width, height)` fitting a `rows x cols` maze and its border
    pub fn canvas_size(&self, rows: usize, cols: usize) -> (u32, u32) {
        let side = |n: usize| (2 * self.border_width + n as i32 * self.cell_size) as u32;
        (side(cols), side(rows))
    }

    /// Upper left corner of cell `(row, col)`
    pub fn vertex_point(&self, row: i32, col: i32) -> Point {
        Point {
            x: self.border_width + col * self.cell_size,
            y: self.border_width + row * self.cell_size,
        }
    }

    /// All `(rows + 1) x (cols + 1)` corners, row by row
    pub fn vertices(&self, rows: usize, cols: usize) -> impl Iterator<Item = Point> + '_ {
        (0..=rows as i32)
            .cartesian_product(0..=cols as i32)
            .map(|(row, col)| self.vertex_point(row, col))
    }

    pub fn cell_center(&self, loc: CellLocation) -> Point {
        let corner = self.vertex_point(loc.row, loc.col);
        Point {
            x: corner.x + self.cell_size / 2,
            y: corner.y + self.cell_size / 2,
        }
    }

    pub fn wall_line(&self, id: WallId) -> Line {
        let (row, col) = (id.row as i32, id.col as i32);
        let end = match id.orientation {
            Orientation::Horizontal => self.vertex_point(row, col + 1),
            Orientation::Vertical => self.vertex_point(row + 1, col),
        };
        Line {
            start: self.vertex_point(row, col),
            end,
        }
    }

    /// Center to center
    pub fn path_line(&self, from: CellLocation, to: CellLocation) -> Line {
        Line {
            start: self.cell_center(from),
            end: self.cell_center(to),
        }
    }
}

/// Solid walls black, open walls white
pub fn draw_walls<R: Renderer + ?Sized>(
    grid: &PackedGrid,
    calc: &ScreenCoordinateCalculator,
    renderer: &mut R,
) {
    for (id, wall) in grid.walls() {
        let color = if wall.solid { Color::Black } else { Color::White };
        renderer.draw(Shape::Line(calc.wall_line(id)), color);
    }
}

/// Path as connected center lines, with its end points marked
pub fn draw_path<R: Renderer + ?Sized>(
    path: &[CellLocation],
    calc: &ScreenCoordinateCalculator,
    renderer: &mut R,
    color: Color,
) {
    for (from, to) in path.iter().tuple_windows() {
        renderer.draw(Shape::Line(calc.path_line(*from, *to)), color);
    }
    for end in [path.first(), path.last()].into_iter().flatten().dedup() {
        renderer.draw(Shape::Point(calc.cell_center(*end)), color);
    }
}

/// Step hook drawing each move as it happens
///
/// Carved walls are erased, solver moves drawn red and solver backtracks
/// gray. Backtracks made while carving draw nothing.
pub struct DrawingHook<'a, R: Renderer + ?Sized> {
    calc: ScreenCoordinateCalculator,
    renderer: &'a mut R,
    solving: bool,
}

impl<'a, R: Renderer + ?Sized> DrawingHook<'a, R> {
    pub fn new(calc: ScreenCoordinateCalculator, renderer: &'a mut R) -> Self {
        Self {
            calc,
            renderer,
            solving: false,
        }
    }
}

impl<R: Renderer + ?Sized> StepHook for DrawingHook<'_, R> {
    fn on_step(&mut self, grid: &PackedGrid, step: Step) -> ControlFlow<()> {
        match step {
            Step::Carve { from, to } => {
                self.solving = false;
                if let Ok(id) = grid.wall_between(from, to) {
                    self.renderer
                        .draw(Shape::Line(self.calc.wall_line(id)), Color::White);
                }
            }
            Step::Advance { from, to } => {
                self.solving = true;
                self.renderer
                    .draw(Shape::Line(self.calc.path_line(from, to)), Color::Red);
            }
            Step::Backtrack { from, to: Some(to) } if self.solving => {
                self.renderer
                    .draw(Shape::Line(self.calc.path_line(from, to)), Color::Gray);
            }
            Step::Backtrack { .. } => (),
        }
        ControlFlow::Continue(())
    }
}
