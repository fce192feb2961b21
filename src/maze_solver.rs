//! Path search through a carved maze

use log::{debug, trace};
use rand::{seq::SliceRandom, RngCore};

use crate::grid::PackedGrid;
use crate::location::CellLocation;
use crate::step::{Progress, Step, StepHook};

/// How the solver picks among several open, unvisited neighbors
pub enum Selection<'a> {
    /// First candidate in canonical order (north, south, east, west)
    Ordered,
    /// Uniformly at random
    Random(&'a mut dyn RngCore),
}

impl Selection<'_> {
    fn pick(&mut self, candidates: &[CellLocation]) -> Option<CellLocation> {
        match self {
            Selection::Ordered => candidates.first().copied(),
            Selection::Random(rng) => candidates.choose(&mut **rng).copied(),
        }
    }
}

/// Result of [`solve_maze`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Whether `destination` was reached
    pub solved: bool,
    /// Cells from start to destination, both included; empty when unsolved
    ///
    /// If the search was stopped by the step hook, this holds the search
    /// stack at that moment instead.
    pub path: Vec<CellLocation>,
    pub progress: Progress,
}

impl Solution {
    /// Number of moves along the path
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Find a path from `start` to `destination` through open walls
///
/// Depth-first search with backtracking over an explicit stack. Visited
/// flags left over from generation are cleared first. On a perfect maze the
/// path found is the unique simple path regardless of `selection`; on any
/// other wall layout the search still terminates, reporting `solved: false`
/// when `destination` cannot be reached.
///
/// Every forward step and every backtrack is reported to `hook`. Clearing
/// the visited flags and marking `start` happen before the first report.
/// A hook stopping the search on the step that reaches `destination` still
/// gets the finished solution.
pub fn solve_maze<H: StepHook + ?Sized>(
    grid: &mut PackedGrid,
    start: CellLocation,
    destination: CellLocation,
    mut selection: Selection<'_>,
    hook: &mut H,
) -> anyhow::Result<Solution> {
    grid.cell(start)?;
    grid.cell(destination)?;

    grid.reset_visited();
    grid.mark_visited(start)?;
    let mut stack = vec![start];
    let mut current = start;

    loop {
        if current == destination {
            debug!(
                "Found path from {} to {} in {} moves",
                start,
                destination,
                stack.len() - 1
            );
            return Ok(Solution {
                solved: true,
                path: stack,
                progress: Progress::Finished,
            });
        }

        let mut candidates = Vec::with_capacity(4);
        for next in grid.open_neighbors(current)? {
            if !grid.cell(next)?.visited {
                candidates.push(next);
            }
        }

        let step = if let Some(next) = selection.pick(&candidates) {
            grid.mark_visited(next)?;
            stack.push(next);
            Step::Advance {
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
            if stack.last() == Some(&destination) {
                debug!("Search stopped by hook on reaching {}", destination);
                return Ok(Solution {
                    solved: true,
                    path: stack,
                    progress: Progress::Finished,
                });
            }
            debug!("Search stopped by hook at {}", current);
            return Ok(Solution {
                solved: false,
                path: stack,
                progress: Progress::Stopped,
            });
        }

        current = match stack.last() {
            Some(&loc) => loc,
            None => break,
        };
    }

    debug!("No path from {} to {}", start, destination);
    Ok(Solution {
        solved: false,
        path: vec![],
        progress: Progress::Finished,
    })
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use itertools::Itertools;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::grid::GridError;
    use crate::location::{Direction, Opening};
    use crate::maze_generator::MazeGenerator;
    use crate::step::{NoHook, StepLog};

    fn carved(rows: usize, cols: usize, seed: u64) -> PackedGrid {
        MazeGenerator::new(Some(seed))
            .generate_maze(rows, cols, CellLocation::new(0, 0))
            .unwrap()
    }

    fn assert_valid_path(grid: &PackedGrid, path: &[CellLocation]) {
        for (a, b) in path.iter().tuple_windows() {
            assert!(grid.is_open_between(*a, *b).unwrap());
        }
        assert!(path.iter().all_unique());
    }

    #[test]
    fn corner_to_corner_is_always_solvable() {
        for (rows, cols) in (1..=7).cartesian_product(1..=7) {
            for seed in 0..3 {
                let mut grid = carved(rows, cols, seed);
                let start = CellLocation::new(0, 0);
                let exit = CellLocation::new(rows as i32 - 1, cols as i32 - 1);
                grid.open_boundary_wall(Opening::new(start, Direction::North))
                    .unwrap();
                grid.open_boundary_wall(Opening::new(exit, Direction::South))
                    .unwrap();

                let mut rng = StdRng::seed_from_u64(seed);
                let solution = solve_maze(
                    &mut grid,
                    start,
                    exit,
                    Selection::Random(&mut rng),
                    &mut NoHook,
                )
                .unwrap();

                assert!(solution.solved);
                assert_eq!(solution.progress, Progress::Finished);
                assert_eq!(solution.path.first(), Some(&start));
                assert_eq!(solution.path.last(), Some(&exit));
                assert!(solution.moves() >= rows + cols - 2);
                assert!(solution.moves() <= rows * cols - 1);
                assert_valid_path(&grid, &solution.path);
            }
        }
    }

    #[test]
    fn any_two_cells_are_connected() {
        let mut grid = carved(4, 5, 11);
        let locs = grid.cells().map(|(loc, _)| loc).collect_vec();
        for (a, b) in locs.iter().tuple_combinations() {
            let solution = solve_maze(&mut grid, *a, *b, Selection::Ordered, &mut NoHook).unwrap();
            assert!(solution.solved, "{} -> {}", a, b);
            assert_valid_path(&grid, &solution.path);
        }
    }

    #[test]
    fn path_is_unique_in_perfect_maze() {
        let mut grid = carved(9, 9, 4);
        let start = CellLocation::new(0, 8);
        let end = CellLocation::new(8, 0);
        let ordered = solve_maze(&mut grid, start, end, Selection::Ordered, &mut NoHook).unwrap();
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let random = solve_maze(
                &mut grid,
                start,
                end,
                Selection::Random(&mut rng),
                &mut NoHook,
            )
            .unwrap();
            assert_eq!(random.path, ordered.path);
        }
    }

    #[test]
    fn uncarved_grid_is_unsolvable() {
        let mut grid = PackedGrid::new(3, 4).unwrap();
        let solution = solve_maze(
            &mut grid,
            CellLocation::new(0, 0),
            CellLocation::new(2, 3),
            Selection::Ordered,
            &mut NoHook,
        )
        .unwrap();
        assert!(!solution.solved);
        assert!(solution.path.is_empty());
        assert_eq!(solution.progress, Progress::Finished);
    }

    #[test]
    fn disconnected_walls_are_unsolvable() {
        // Two corridors, top and bottom row, with no passage between them
        let mut grid = PackedGrid::new(2, 4).unwrap();
        for row in 0..2 {
            for col in 0..3 {
                grid.carve_between(CellLocation::new(row, col), CellLocation::new(row, col + 1))
                    .unwrap();
            }
        }
        let solution = solve_maze(
            &mut grid,
            CellLocation::new(0, 0),
            CellLocation::new(1, 3),
            Selection::Ordered,
            &mut NoHook,
        )
        .unwrap();
        assert!(!solution.solved);

        let solution = solve_maze(
            &mut grid,
            CellLocation::new(0, 0),
            CellLocation::new(0, 3),
            Selection::Ordered,
            &mut NoHook,
        )
        .unwrap();
        assert!(solution.solved);
        assert_eq!(solution.moves(), 3);
    }

    #[test]
    fn solving_with_cycles_terminates() {
        let mut grid = PackedGrid::new(3, 3).unwrap();
        let locs = grid.cells().map(|(loc, _)| loc).collect_vec();
        for loc in locs {
            for next in grid.adjacent_cell_locations(loc).unwrap() {
                grid.carve_between(loc, next).unwrap();
            }
        }
        let mut rng = StdRng::seed_from_u64(1);
        let solution = solve_maze(
            &mut grid,
            CellLocation::new(0, 0),
            CellLocation::new(2, 2),
            Selection::Random(&mut rng),
            &mut NoHook,
        )
        .unwrap();
        assert!(solution.solved);
        assert_valid_path(&grid, &solution.path);
    }

    #[test]
    fn hook_does_not_change_result() {
        let mut grid = carved(8, 6, 2);
        let start = CellLocation::new(7, 0);
        let end = CellLocation::new(0, 5);
        let plain = solve_maze(&mut grid, start, end, Selection::Ordered, &mut NoHook).unwrap();

        let mut log = StepLog::default();
        let observed = solve_maze(&mut grid, start, end, Selection::Ordered, &mut log).unwrap();
        assert_eq!(plain, observed);

        let advances = log
            .steps
            .iter()
            .filter(|s| matches!(s, Step::Advance { .. }))
            .count();
        let backtracks = log.steps.len() - advances;
        let visited = grid.cells().filter(|(_, c)| c.visited).count();
        assert_eq!(advances, visited - 1);
        assert_eq!(advances - backtracks, observed.moves());
    }

    #[test]
    fn hook_can_stop_search() {
        let mut grid = carved(5, 5, 0);
        let mut steps = vec![];
        let mut hook = |_: &PackedGrid, step: Step| -> ControlFlow<()> {
            steps.push(step);
            ControlFlow::Break(())
        };
        let solution = solve_maze(
            &mut grid,
            CellLocation::new(0, 0),
            CellLocation::new(4, 4),
            Selection::Ordered,
            &mut hook,
        )
        .unwrap();
        assert!(!solution.solved);
        assert_eq!(solution.progress, Progress::Stopped);
        assert_eq!(solution.path.len(), 2);
        assert_eq!(steps.len(), 1);
    }

    #[test]
    fn stop_on_reaching_destination_is_solved() {
        let mut grid = carved(1, 2, 0);
        let exit = CellLocation::new(0, 1);
        let mut hook = |_: &PackedGrid, step: Step| -> ControlFlow<()> {
            match step {
                Step::Advance { to, .. } if to == exit => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        };
        let solution = solve_maze(
            &mut grid,
            CellLocation::new(0, 0),
            exit,
            Selection::Ordered,
            &mut hook,
        )
        .unwrap();
        assert!(solution.solved);
        assert_eq!(solution.progress, Progress::Finished);
        assert_eq!(solution.path, [CellLocation::new(0, 0), exit]);
    }

    #[test]
    fn start_is_destination() {
        let mut grid = carved(3, 3, 0);
        let loc = CellLocation::new(1, 1);
        let solution = solve_maze(&mut grid, loc, loc, Selection::Ordered, &mut NoHook).unwrap();
        assert!(solution.solved);
        assert_eq!(solution.path, [loc]);
        assert_eq!(solution.moves(), 0);
    }

    #[test]
    fn destination_out_of_range() {
        let mut grid = carved(3, 3, 0);
        let err = solve_maze(
            &mut grid,
            CellLocation::new(0, 0),
            CellLocation::new(0, 3),
            Selection::Ordered,
            &mut NoHook,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GridError>(),
            Some(GridError::OutOfRange { .. })
        ));
    }
}
