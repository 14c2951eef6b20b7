//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod solver;

pub use solver::{IlpProblem, LpProblem, Solver, SolverResult, SolverStatus};
