//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`league`] - League fixtures from a pair of teams up to a full
//!   two-category season, plus their JSON file form.
//! - [`solver`] - [`ScriptedSolver`](solver::ScriptedSolver), a
//!   [`Solver`](crate::port::outbound::solver::Solver) answering from a closure.
//! - [`config`] - Canonical configurations for small seasons.

pub mod config;
pub mod league;
pub mod solver;
