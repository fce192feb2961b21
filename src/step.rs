//! Observing generation and solving one step at a time

use std::ops::ControlFlow;

use crate::grid::PackedGrid;
use crate::location::CellLocation;

/// A single mutation made by the generator or the solver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Generator opened the wall between `from` and `to` and moved on
    Carve { from: CellLocation, to: CellLocation },
    /// Solver moved from `from` through an open wall to `to`
    Advance { from: CellLocation, to: CellLocation },
    /// `from` is exhausted; `to` is the new top of the stack, `None` once
    /// the stack is empty
    Backtrack {
        from: CellLocation,
        to: Option<CellLocation>,
    },
}

/// Whether an algorithm ran to completion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Finished,
    /// The step hook asked to stop early
    Stopped,
}

/// Read-only observer called synchronously after every step
///
/// Setup done before the first step, such as marking the start cell
/// visited, is not reported.
///
/// Returning [`ControlFlow::Break`] stops the running algorithm right after
/// the step just reported, leaving the grid in that partially processed
/// state.
pub trait StepHook {
    fn on_step(&mut self, grid: &PackedGrid, step: Step) -> ControlFlow<()>;
}

impl<F> StepHook for F
where
    F: FnMut(&PackedGrid, Step) -> ControlFlow<()>,
{
    fn on_step(&mut self, grid: &PackedGrid, step: Step) -> ControlFlow<()> {
        self(grid, step)
    }
}

/// Hook that ignores every step
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHook;

impl StepHook for NoHook {
    fn on_step(&mut self, _grid: &PackedGrid, _step: Step) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Records every step, for tests and replays
#[derive(Clone, Debug, Default)]
pub struct StepLog {
    pub steps: Vec<Step>,
}

impl StepHook for StepLog {
    fn on_step(&mut self, _grid: &PackedGrid, step: Step) -> ControlFlow<()> {
        self.steps.push(step);
        ControlFlow::Continue(())
    }
}
