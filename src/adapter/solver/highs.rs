//! HiGHS solver implementation via good_lp.
//!
//! HiGHS is a high-performance open-source linear/mixed-integer programming solver.
//! This implementation wraps it using the good_lp crate for ergonomic Rust usage.

use good_lp::solvers::highs::highs;
use good_lp::{constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use super::settings::SolverConfig;
use crate::domain::ConstraintSense;
use crate::error::Result;
use crate::port::outbound::solver::{IlpProblem, LpProblem, Solver, SolverResult, SolverStatus};

/// Tolerance used when re-checking a returned point against the model.
const FEASIBILITY_TOLERANCE: Decimal = dec!(0.001);

/// HiGHS-based ILP solver.
#[derive(Debug, Default, Clone)]
pub struct HiGHSSolver {
    config: SolverConfig,
}

impl HiGHSSolver {
    /// Create a new HiGHS solver instance.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Solver for HiGHSSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve_ilp(&self, problem: &IlpProblem) -> Result<SolverResult> {
        Ok(solve_with_good_lp(
            &problem.lp,
            &problem.integer_vars,
            &self.config,
        ))
    }
}

/// Internal solver implementation using good_lp.
fn solve_with_good_lp(
    problem: &LpProblem,
    integer_vars: &[usize],
    config: &SolverConfig,
) -> SolverResult {
    let n = problem.num_vars();

    // Handle empty problem
    if n == 0 {
        return SolverResult::solved(SolverStatus::Optimal, vec![], Decimal::ZERO);
    }

    let mut is_integer = vec![false; n];
    for &i in integer_vars {
        if let Some(flag) = is_integer.get_mut(i) {
            *flag = true;
        }
    }

    // Create variables
    let mut vars = variables!();
    let mut var_list = Vec::with_capacity(n);

    for (i, bounds) in problem.bounds.iter().enumerate() {
        let mut v = variable();

        // Explicit bounds even for integer variables: HiGHS reports a missing
        // upper bound on a 0/1 variable as an unbounded model.
        if let Some(lb) = bounds.lower {
            v = v.min(lb.to_f64().unwrap_or(0.0));
        }
        if let Some(ub) = bounds.upper {
            v = v.max(ub.to_f64().unwrap_or(f64::INFINITY));
        }

        if is_integer[i] {
            v = v.integer();
        }

        var_list.push(vars.add(v));
    }

    // Build objective function
    let objective: Expression = var_list
        .iter()
        .zip(problem.objective.iter())
        .map(|(v, c)| c.to_f64().unwrap_or(0.0) * *v)
        .sum();

    let mut model = vars.minimise(&objective).using(highs);
    model = apply_options(model, config);

    // Add constraints
    for constr in &problem.constraints {
        let lhs: Expression = constr
            .terms
            .iter()
            .filter_map(|(idx, c)| var_list.get(*idx).map(|v| c.to_f64().unwrap_or(0.0) * *v))
            .sum();

        let rhs = constr.rhs.to_f64().unwrap_or(0.0);

        match constr.sense {
            ConstraintSense::GreaterEqual => {
                model = model.with(constraint!(lhs >= rhs));
            }
            ConstraintSense::LessEqual => {
                model = model.with(constraint!(lhs <= rhs));
            }
            ConstraintSense::Equal => {
                model = model.with(constraint!(lhs == rhs));
            }
        }
    }

    debug!(
        variables = n,
        constraints = problem.constraints.len(),
        "Submitting model to HiGHS"
    );

    match model.solve() {
        Ok(solution) => {
            let values: Vec<Decimal> = var_list
                .iter()
                .map(|v| Decimal::try_from(solution.value(*v)).unwrap_or(Decimal::ZERO))
                .collect();
            normalize_solution(problem, values, config)
        }
        Err(err) => normalize_error(err),
    }
}

fn apply_options(
    mut model: good_lp::solvers::highs::HighsProblem,
    config: &SolverConfig,
) -> good_lp::solvers::highs::HighsProblem {
    if let Some(threads) = config.threads {
        model = model.set_option("threads", i32::try_from(threads).unwrap_or(i32::MAX));
    }
    if let Some(seed) = config.random_seed {
        model = model.set_option("random_seed", seed);
    }
    if let Some(limit) = config.time_limit_secs {
        model = model.set_option("time_limit", limit);
    }
    if let Some(gap) = config.mip_rel_gap {
        model = model.set_option("mip_rel_gap", gap);
    }
    model.set_option("output_flag", config.verbose)
}

/// Classify a returned point.
///
/// good_lp hands back a solution for every non-error model status, including
/// time-limit stops, so the point is re-checked against the model before it
/// is accepted.
fn normalize_solution(problem: &LpProblem, values: Vec<Decimal>, config: &SolverConfig) -> SolverResult {
    if !problem.is_satisfied_by(&values, FEASIBILITY_TOLERANCE) {
        warn!("HiGHS returned a point that violates the model");
        return SolverResult::failed(
            SolverStatus::Error,
            Some("solver returned a point that violates the model".to_string()),
        );
    }

    let objective: Decimal = values
        .iter()
        .zip(problem.objective.iter())
        .map(|(v, c)| v * c)
        .sum();

    let status = if config.time_limit_secs.is_some() || config.mip_rel_gap.is_some() {
        SolverStatus::Feasible
    } else {
        SolverStatus::Optimal
    };
    SolverResult::solved(status, values, objective)
}

fn normalize_error(err: ResolutionError) -> SolverResult {
    match err {
        ResolutionError::Infeasible => SolverResult::failed(SolverStatus::Infeasible, None),
        ResolutionError::Unbounded => SolverResult::failed(SolverStatus::Unbounded, None),
        other => SolverResult::failed(SolverStatus::Error, Some(other.to_string())),
    }
}
