//! Solver port for integer programming.
//!
//! Defines the trait the scheduling engine uses to hand a built model to an
//! external mixed-integer solver, plus the problem and result shapes that
//! cross the boundary.
//!
//! # Overview
//!
//! - [`Solver`]: Core ILP solver interface
//! - [`LpProblem`] / [`IlpProblem`]: Problem definitions
//! - [`SolverResult`]: Normalized solver outcome

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{constraint::Constraint, constraint::VariableBounds};
use crate::error::Result;

/// Mixed-integer programming solver.
///
/// Implementations wrap specific solver backends (HiGHS, CBC, etc.) and map
/// their heterogeneous status reporting onto [`SolverStatus`].
///
/// # Implementation Notes
///
/// - Honour explicit variable bounds in addition to integrality markers
/// - Return infeasible/unbounded outcomes as a [`SolverResult`], not as an
///   `Err`; reserve `Err` for failures to even run the backend
/// - The call blocks; callers impose time limits through backend options
pub trait Solver: Send + Sync {
    /// Return the solver name for logging and configuration.
    fn name(&self) -> &'static str;

    /// Solve an integer linear programming problem.
    ///
    /// Minimizes the objective function with integer constraints on specified
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend could not be invoked at all.
    fn solve_ilp(&self, problem: &IlpProblem) -> Result<SolverResult>;
}

/// Linear programming problem definition.
///
/// Represents a minimization problem of the form:
///
/// ```text
/// minimize    c^T * x
/// subject to  constraints
///             bounds on x
/// ```
#[derive(Debug, Clone)]
pub struct LpProblem {
    /// Objective function coefficients.
    ///
    /// The solver minimizes `c^T * x` where `c` is this vector.
    pub objective: Vec<Decimal>,

    /// Linear constraints on the variables.
    pub constraints: Vec<Constraint>,

    /// Lower and upper bounds for each variable.
    pub bounds: Vec<VariableBounds>,
}

impl LpProblem {
    /// Create a new LP problem with the specified number of variables.
    ///
    /// Initializes all objective coefficients to zero and all variable bounds
    /// to their defaults.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            objective: vec![Decimal::ZERO; num_vars],
            constraints: Vec::new(),
            bounds: vec![VariableBounds::default(); num_vars],
        }
    }

    /// Return the number of decision variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Whether every constraint and bound holds for `values`.
    #[must_use]
    pub fn is_satisfied_by(&self, values: &[Decimal], tolerance: Decimal) -> bool {
        if values.len() != self.num_vars() {
            return false;
        }
        let bounds_ok = self.bounds.iter().zip(values).all(|(b, v)| {
            b.lower.map_or(true, |lb| *v >= lb - tolerance)
                && b.upper.map_or(true, |ub| *v <= ub + tolerance)
        });
        bounds_ok
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied(values, tolerance))
    }
}

/// Integer linear programming problem definition.
///
/// Extends a linear programming problem with integer constraints on specified
/// variables.
#[derive(Debug, Clone)]
pub struct IlpProblem {
    /// Underlying linear programming problem.
    pub lp: LpProblem,

    /// Indices of variables constrained to integer values.
    ///
    /// Variables not in this list are continuous (relaxed).
    pub integer_vars: Vec<usize>,
}

impl IlpProblem {
    /// Create an ILP with all variables constrained to integer values.
    ///
    /// Combined with [`VariableBounds::binary`] this yields 0/1 variables.
    #[must_use]
    pub fn all_binary(lp: LpProblem) -> Self {
        let integer_vars: Vec<usize> = (0..lp.num_vars()).collect();
        Self { lp, integer_vars }
    }
}

/// Normalized outcome of a solver run.
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// Values for each decision variable; empty when no point was produced.
    pub values: Vec<Decimal>,

    /// Objective function value at `values`.
    pub objective: Decimal,

    /// Termination status of the solver.
    pub status: SolverStatus,

    /// Backend message for failed runs.
    pub message: Option<String>,
}

impl SolverResult {
    /// A result carrying a solution.
    #[must_use]
    pub fn solved(status: SolverStatus, values: Vec<Decimal>, objective: Decimal) -> Self {
        Self {
            values,
            objective,
            status,
            message: None,
        }
    }

    /// A result without a solution.
    #[must_use]
    pub fn failed(status: SolverStatus, message: impl Into<Option<String>>) -> Self {
        Self {
            values: Vec::new(),
            objective: Decimal::ZERO,
            status,
            message: message.into(),
        }
    }

    /// Whether the result can be used.
    ///
    /// Status alone is not trusted: an accepted result must also carry a
    /// variable assignment.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
            && !self.values.is_empty()
    }
}

/// Termination status of an optimization solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverStatus {
    /// Solver found a globally optimal solution.
    Optimal,

    /// Solver found a feasible solution without proving optimality.
    Feasible,

    /// No feasible solution exists.
    Infeasible,

    /// Objective function is unbounded.
    Unbounded,

    /// Solver encountered an internal error.
    Error,
}
