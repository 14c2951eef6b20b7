//! Solver implementations for integer programming.
//!
//! Implements the `port::outbound::solver::Solver` trait with concrete backends.

mod highs;
mod settings;

pub use highs::HiGHSSolver;
pub use settings::SolverConfig;
