//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::solver::HiGHSSolver;
use crate::application::SeasonPipeline;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::solver::Solver;

/// Build the configured solver backend.
pub fn build_solver(config: &Config) -> Arc<dyn Solver> {
    let solver = HiGHSSolver::new(config.solver.clone());
    debug!(
        solver = solver.name(),
        threads = ?config.solver.threads,
        time_limit_secs = ?config.solver.time_limit_secs,
        "Solver ready"
    );
    Arc::new(solver)
}

/// Wire a pipeline from configuration with the default backend.
pub fn build_pipeline(config: &Config) -> SeasonPipeline {
    build_pipeline_with(config, build_solver(config))
}

/// Wire a pipeline from configuration around a given solver.
pub fn build_pipeline_with(config: &Config, solver: Arc<dyn Solver>) -> SeasonPipeline {
    SeasonPipeline::new(
        config.season.clone(),
        config.constraints.clone(),
        config.repair.clone(),
        solver,
    )
}
