//! Maze generation

use log::{debug, trace};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::grid::{GridError, PackedGrid};
use crate::location::CellLocation;
use crate::step::{NoHook, Progress, Step, StepHook};

/// Carve a perfect maze into `grid`, starting from `start`
///
/// Randomized depth-first backtracker over an explicit stack: from the
/// current cell, pick a random unvisited neighbor, open the wall towards it
/// and move there; when no unvisited neighbor is left, pop back to the
/// previous cell. The open walls form a spanning tree of the cells, so there
/// is exactly one simple path between any two of them.
///
/// The grid must be fresh (see [`PackedGrid::is_pristine`]); otherwise
/// [`GridError::AlreadyCarved`] is returned and nothing is touched.
/// Perimeter walls are never opened here.
///
/// `hook` sees every carve and backtrack. Marking `start` visited happens
/// before the first one and is not reported.
///
/// The same grid size, start and random sequence always produce the same
/// maze.
pub fn carve_maze<R, H>(
    grid: &mut PackedGrid,
    start: CellLocation,
    rng: &mut R,
    hook: &mut H,
) -> anyhow::Result<Progress>
where
    R: Rng + ?Sized,
    H: StepHook + ?Sized,
{
    grid.cell(start)?;
    if !grid.is_pristine() {
        return Err(GridError::AlreadyCarved.into());
    }

    grid.mark_visited(start)?;
    let mut stack = vec![start];
    let mut current = start;
    let mut carved = 0;

    loop {
        let mut unvisited = Vec::with_capacity(4);
        for next in grid.adjacent_cell_locations(current)? {
            if !grid.cell(next)?.visited {
                unvisited.push(next);
            }
        }

        let step = if let Some(&next) = unvisited.choose(rng) {
            grid.carve_between(current, next)?;
            grid.mark_visited(next)?;
            stack.push(next);
            carved += 1;
            Step::Carve {
                from: current,
                to: next,
            }
        } else {
            stack.pop();
            Step::Backtrack {
                from: current,
                to: stack.last().copied(),
            }
        };
        trace!("{:?}", step);

        if hook.on_step(grid, step).is_break() {
            debug!("Carving stopped by hook after opening {} walls", carved);
            return Ok(Progress::Stopped);
        }

        current = match stack.last() {
            Some(&loc) => loc,
            None => break,
        };
    }

    debug!(
        "Carved {}x{} maze from {}, opened {} walls",
        grid.rows(),
        grid.cols(),
        start,
        carved
    );
    Ok(Progress::Finished)
}

/// Maze generator owning its random source
pub struct MazeGenerator {
    random: StdRng,
}

impl MazeGenerator {
    /// Seeded generator, or seeded from entropy when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }

    pub fn carve<H: StepHook + ?Sized>(
        &mut self,
        grid: &mut PackedGrid,
        start: CellLocation,
        hook: &mut H,
    ) -> anyhow::Result<Progress> {
        carve_maze(grid, start, &mut self.random, hook)
    }

    /// Fresh `rows x cols` grid carved from `start`
    pub fn generate_maze(
        &mut self,
        rows: usize,
        cols: usize,
        start: CellLocation,
    ) -> anyhow::Result<PackedGrid> {
        let mut grid = PackedGrid::new(rows, cols)?;
        self.carve(&mut grid, start, &mut NoHook)?;
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::ops::ControlFlow;

    use itertools::Itertools;

    use super::*;
    use crate::location::{Direction, Opening, WallId};
    use crate::step::StepLog;

    fn reachable(grid: &PackedGrid, from: CellLocation) -> HashSet<CellLocation> {
        let mut seen = HashSet::from([from]);
        let mut todo = vec![from];
        while let Some(loc) = todo.pop() {
            for next in grid.open_neighbors(loc).unwrap() {
                if seen.insert(next) {
                    todo.push(next);
                }
            }
        }
        seen
    }

    fn open_walls(grid: &PackedGrid) -> Vec<WallId> {
        grid.walls()
            .filter(|(_, wall)| !wall.solid)
            .map(|(id, _)| id)
            .collect()
    }

    #[test]
    fn carving_yields_spanning_tree() {
        for (rows, cols) in (1..=6).cartesian_product(1..=6) {
            for seed in 0..3 {
                let mut gen = MazeGenerator::new(Some(seed));
                let start = CellLocation::new(rows as i32 - 1, 0);
                let grid = gen.generate_maze(rows, cols, start).unwrap();

                // n - 1 edges and connected, hence acyclic
                assert_eq!(grid.open_interior_wall_count(), rows * cols - 1);
                assert_eq!(reachable(&grid, start).len(), rows * cols);
                assert!(grid.cells().all(|(_, cell)| cell.visited));
            }
        }
    }

    #[test]
    fn perimeter_stays_solid() {
        let grid = MazeGenerator::new(Some(5))
            .generate_maze(7, 9, CellLocation::new(3, 4))
            .unwrap();
        for (loc, _) in grid.cells() {
            for dir in Direction::ALL {
                if grid.is_perimeter(loc, dir) {
                    assert!(grid.wall(loc, dir).unwrap().solid);
                }
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let start = CellLocation::new(0, 0);
        let a = MazeGenerator::new(Some(42))
            .generate_maze(12, 15, start)
            .unwrap();
        let b = MazeGenerator::new(Some(42))
            .generate_maze(12, 15, start)
            .unwrap();
        let c = MazeGenerator::new(Some(43))
            .generate_maze(12, 15, start)
            .unwrap();
        assert_eq!(open_walls(&a), open_walls(&b));
        assert_ne!(open_walls(&a), open_walls(&c));
    }

    #[test]
    fn small_maze_connects_all_cells() {
        let start = CellLocation::new(0, 0);
        let grid = MazeGenerator::new(Some(7))
            .generate_maze(3, 2, start)
            .unwrap();
        assert_eq!(grid.open_interior_wall_count(), 5);
        assert_eq!(reachable(&grid, start).len(), 6);
    }

    #[test]
    fn every_cell_is_pushed_and_popped_once() {
        let mut grid = PackedGrid::new(4, 5).unwrap();
        let mut log = StepLog::default();
        let progress = MazeGenerator::new(Some(1))
            .carve(&mut grid, CellLocation::new(2, 2), &mut log)
            .unwrap();
        assert_eq!(progress, Progress::Finished);

        let carves = log
            .steps
            .iter()
            .filter(|s| matches!(s, Step::Carve { .. }))
            .count();
        let backtracks = log
            .steps
            .iter()
            .filter(|s| matches!(s, Step::Backtrack { .. }))
            .count();
        assert_eq!(carves, 19);
        assert_eq!(backtracks, 20);
        assert_eq!(
            log.steps.last(),
            Some(&Step::Backtrack {
                from: CellLocation::new(2, 2),
                to: None
            })
        );
    }

    #[test]
    fn single_cell_maze() {
        let mut grid = PackedGrid::new(1, 1).unwrap();
        let mut log = StepLog::default();
        let start = CellLocation::new(0, 0);
        carve_maze(&mut grid, start, &mut StdRng::seed_from_u64(0), &mut log).unwrap();
        assert_eq!(grid.open_interior_wall_count(), 0);
        assert_eq!(
            log.steps,
            [Step::Backtrack {
                from: start,
                to: None
            }]
        );
    }

    #[test]
    fn hook_can_stop_carving() {
        let mut grid = PackedGrid::new(5, 5).unwrap();
        let mut carves = 0;
        let mut hook = |_: &PackedGrid, step: Step| {
            if let Step::Carve { .. } = step {
                carves += 1;
            }
            if carves == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };
        let progress = carve_maze(
            &mut grid,
            CellLocation::new(0, 0),
            &mut StdRng::seed_from_u64(3),
            &mut hook,
        )
        .unwrap();

        assert_eq!(progress, Progress::Stopped);
        assert_eq!(grid.open_interior_wall_count(), 3);
        assert_eq!(grid.cells().filter(|(_, c)| c.visited).count(), 4);
    }

    #[test]
    fn hook_sees_one_visit_per_carve() {
        let mut grid = PackedGrid::new(4, 3).unwrap();
        let start = CellLocation::new(2, 1);
        let mut carves = 0;
        let mut hook = |grid: &PackedGrid, step: Step| -> ControlFlow<()> {
            if let Step::Carve { from, to } = step {
                carves += 1;
                assert!(grid.cell(from).unwrap().visited);
                assert!(grid.cell(to).unwrap().visited);
            }
            // start was marked before the first step
            let visited = grid.cells().filter(|(_, c)| c.visited).count();
            assert_eq!(visited, carves + 1);
            assert!(grid.cell(start).unwrap().visited);
            ControlFlow::Continue(())
        };
        carve_maze(&mut grid, start, &mut StdRng::seed_from_u64(4), &mut hook).unwrap();
        assert_eq!(carves, 4 * 3 - 1);
    }

    #[test]
    fn carving_twice_is_refused() {
        let mut grid = PackedGrid::new(3, 3).unwrap();
        let mut gen = MazeGenerator::new(Some(0));
        let start = CellLocation::new(0, 0);
        gen.carve(&mut grid, start, &mut NoHook).unwrap();
        let before = grid.clone();

        let err = gen.carve(&mut grid, start, &mut NoHook).unwrap_err();
        assert_eq!(
            err.downcast_ref::<GridError>(),
            Some(&GridError::AlreadyCarved)
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn entrance_may_be_opened_before_carving() {
        let mut grid = PackedGrid::new(3, 3).unwrap();
        grid.open_boundary_wall(Opening::new(CellLocation::new(0, 0), Direction::North))
            .unwrap();
        MazeGenerator::new(Some(9))
            .carve(&mut grid, CellLocation::new(0, 0), &mut NoHook)
            .unwrap();
        assert_eq!(grid.open_interior_wall_count(), 8);
    }

    #[test]
    fn start_out_of_range() {
        let mut grid = PackedGrid::new(3, 3).unwrap();
        let err = MazeGenerator::new(Some(0))
            .carve(&mut grid, CellLocation::new(3, 0), &mut NoHook)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GridError>(),
            Some(GridError::OutOfRange { .. })
        ));
        assert!(grid.is_pristine());
    }
}
