//! End-to-end season scheduling.
//!
//! Generator, protected-slot filter, diagnostics, model, solver, extraction,
//! repair and validation, run in that order. Each stage either hands its
//! output to the next or stops the run with an error.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::diagnostics::Diagnostics;
use super::extract::extract;
use super::generator::{MatchupGenerator, MatchupSet};
use super::model::ModelBuilder;
use super::repair::RepairPass;
use super::validate::{validate_structure, ProtectedSnapshot};
use crate::domain::{
    Assignment, ConstraintConfig, DiagnosticsReport, League, Matchup, ParticipantId, ProtectedSchedule,
    Relocation, RepairConfig, Schedule, SeasonFormat, Slot, UnfixableRepeat,
};
use crate::error::{Result, ScheduleError};
use crate::port::outbound::solver::{Solver, SolverStatus};

/// One scheduled game in the final output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledGame {
    pub slot: Slot,
    pub host: ParticipantId,
    pub visitor: ParticipantId,
    pub protected: bool,
}

/// What the solver reported for the run.
#[derive(Debug, Clone, Serialize)]
pub struct SolveSummary {
    pub backend: String,
    pub status: SolverStatus,
    pub objective: Decimal,
    pub variables: usize,
    pub constraints: usize,
}

/// A complete season schedule with its repair and diagnostics trail.
#[derive(Debug, Clone, Serialize)]
pub struct FinalSchedule {
    pub season: u32,
    pub slots: u32,
    /// Games sorted by slot; protected games lead within their slot.
    pub games: Vec<ScheduledGame>,
    pub relocations: Vec<Relocation>,
    /// Repeats the repair pass could not remove.
    pub defects: Vec<UnfixableRepeat>,
    pub repair_iterations: u32,
    pub repair_exhausted: bool,
    pub diagnostics: DiagnosticsReport,
    /// `None` when every game was protected and the solver was skipped.
    pub solver: Option<SolveSummary>,
}

impl FinalSchedule {
    /// Games in one slot.
    pub fn games_in(&self, slot: Slot) -> impl Iterator<Item = &ScheduledGame> + '_ {
        self.games.iter().filter(move |g| g.slot == slot)
    }

    /// Games as plain assignments.
    #[must_use]
    pub fn assignments(&self) -> Vec<Assignment> {
        self.games
            .iter()
            .map(|g| Assignment::new(Matchup::new(g.host.clone(), g.visitor.clone()), g.slot))
            .collect()
    }

    /// No repeat was left behind.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.defects.is_empty()
    }
}

/// Season scheduling engine wired to a solver backend.
pub struct SeasonPipeline {
    format: SeasonFormat,
    constraints: ConstraintConfig,
    repair: RepairConfig,
    solver: Arc<dyn Solver>,
}

impl SeasonPipeline {
    pub fn new(
        format: SeasonFormat,
        constraints: ConstraintConfig,
        repair: RepairConfig,
        solver: Arc<dyn Solver>,
    ) -> Self {
        Self {
            format,
            constraints,
            repair,
            solver,
        }
    }

    /// Generate and verify the season's matchups.
    ///
    /// # Errors
    ///
    /// Any [`crate::error::GenerationError`].
    pub fn generate(&self, league: &League) -> Result<MatchupSet> {
        Ok(MatchupGenerator::new(league, &self.format).generate()?)
    }

    /// Generate, filter and run the pre-checks without solving.
    ///
    /// # Errors
    ///
    /// Generation errors, and protected games that reference unknown
    /// participants or slots outside the season.
    pub fn diagnose(&self, league: &League, protected: &ProtectedSchedule) -> Result<DiagnosticsReport> {
        let set = self.generate(league)?;
        protected.check(league, self.constraints.slots)?;
        let filtered = protected.filter_matchups(set.matchups());
        Ok(Diagnostics::new(league, &self.format, &self.constraints).diagnose(
            set.matchups(),
            protected,
            &filtered,
        ))
    }

    /// Produce a full season schedule around the protected slots.
    ///
    /// # Errors
    ///
    /// Generation errors are returned as-is. Blocking diagnostics and solver
    /// failures become [`ScheduleError::Infeasible`], `Unbounded` or `Solver`
    /// carrying the diagnostics report. A changed protected slot or a broken
    /// structural invariant after repair is fatal.
    pub fn run(&self, league: &League, protected: &ProtectedSchedule) -> Result<FinalSchedule> {
        let set = self.generate(league)?;
        protected.check(league, self.constraints.slots)?;

        let filtered = protected.filter_matchups(set.matchups());
        for game in &filtered.unmatched {
            warn!(
                matchup = %game.matchup,
                slot = %game.slot,
                "Protected game has no generated counterpart"
            );
        }

        let diagnostics = Diagnostics::new(league, &self.format, &self.constraints).diagnose(
            set.matchups(),
            protected,
            &filtered,
        );
        if diagnostics.is_blocking() {
            return Err(ScheduleError::Infeasible {
                report: Box::new(diagnostics),
            }
            .into());
        }

        let (solved, solver) = if filtered.remaining.is_empty() {
            info!("Every matchup is protected; skipping the solver");
            (Vec::new(), None)
        } else {
            let model = ModelBuilder::new(league, &self.constraints, self.format.games_per_participant)
                .build(&filtered.remaining, protected);
            info!(
                solver = self.solver.name(),
                variables = model.stats.variables,
                constraints = model.stats.constraints,
                "Solving schedule model"
            );
            let result = self.solver.solve_ilp(&model.problem)?;
            if !result.is_accepted() {
                return Err(solver_failure(result.status, result.message, diagnostics).into());
            }
            let summary = SolveSummary {
                backend: self.solver.name().to_string(),
                status: result.status,
                objective: result.objective,
                variables: model.stats.variables,
                constraints: model.stats.constraints,
            };
            (extract(&model, &result, protected)?, Some(summary))
        };

        let mut schedule = Schedule::merge(self.constraints.slots, protected, solved);
        let snapshot = ProtectedSnapshot::capture(&schedule);
        let repair = RepairPass::new(&self.repair, &self.constraints, league).run(&mut schedule);
        snapshot.verify(&schedule)?;

        let defects = validate_structure(&schedule, &filtered.remaining, league, &self.constraints);
        if !defects.is_empty() {
            let detail = defects
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ScheduleError::InvalidSolution(detail).into());
        }

        let games = schedule
            .ordered()
            .into_iter()
            .map(|a| ScheduledGame {
                slot: a.slot,
                host: a.matchup.host.clone(),
                visitor: a.matchup.visitor.clone(),
                protected: schedule.is_protected(a.slot),
            })
            .collect::<Vec<_>>();

        info!(
            season = self.format.season,
            games = games.len(),
            relocations = repair.relocations.len(),
            defects = repair.unfixable.len(),
            "Schedule complete"
        );

        Ok(FinalSchedule {
            season: self.format.season,
            slots: self.constraints.slots,
            games,
            relocations: repair.relocations,
            defects: repair.unfixable,
            repair_iterations: repair.iterations,
            repair_exhausted: repair.exhausted,
            diagnostics,
            solver,
        })
    }
}

fn solver_failure(
    status: SolverStatus,
    message: Option<String>,
    diagnostics: DiagnosticsReport,
) -> ScheduleError {
    let report = Box::new(diagnostics);
    match status {
        SolverStatus::Infeasible => ScheduleError::Infeasible { report },
        SolverStatus::Unbounded => ScheduleError::Unbounded { report },
        other => ScheduleError::Solver {
            message: message.unwrap_or_else(|| format!("solver returned {other:?} without a solution")),
            report,
        },
    }
}
