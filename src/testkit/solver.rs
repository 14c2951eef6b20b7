//! Scripted solver backend.

use std::sync::atomic::{AtomicUsize, Ordering};

use rust_decimal::Decimal;

use crate::error::Result;
use crate::port::outbound::solver::{IlpProblem, Solver, SolverResult, SolverStatus};

type Script = Box<dyn Fn(&IlpProblem) -> SolverResult + Send + Sync>;

/// A [`Solver`] that answers from a closure and counts its calls.
pub struct ScriptedSolver {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedSolver {
    /// Answer every call with `script(problem)`.
    pub fn from_fn(script: impl Fn(&IlpProblem) -> SolverResult + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail with `status` and no solution.
    pub fn failing(status: SolverStatus) -> Self {
        Self::from_fn(move |_| SolverResult::failed(status, Some(format!("scripted {status:?}"))))
    }

    /// Always return `values` as an optimal solution, whatever the problem.
    pub fn returning(values: Vec<Decimal>) -> Self {
        Self::from_fn(move |_| SolverResult::solved(SolverStatus::Optimal, values.clone(), Decimal::ZERO))
    }

    /// Number of solves so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Solver for ScriptedSolver {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn solve_ilp(&self, problem: &IlpProblem) -> Result<SolverResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((self.script)(problem))
    }
}
