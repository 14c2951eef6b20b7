//! Handler for `matchweek schedule`.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::{diagnose, output};
use crate::adapter::outbound::file;
use crate::application::FinalSchedule;
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct GameRow {
    #[tabled(rename = "Slot")]
    slot: u32,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Visitor")]
    visitor: String,
    #[tabled(rename = "Fixed")]
    fixed: &'static str,
}

#[derive(Serialize)]
struct ScheduleDocument<'a> {
    command: &'static str,
    generated_at: DateTime<Utc>,
    schedule: &'a FinalSchedule,
}

/// Execute `schedule`.
pub fn execute(
    config: &Config,
    league_path: &Path,
    protected_path: Option<&Path>,
    output_path: Option<&Path>,
) -> Result<()> {
    let league = file::load_league(league_path)?;
    let protected = file::load_protected(protected_path)?;
    let pipeline = bootstrap::build_pipeline(config);

    let schedule = match pipeline.run(&league, &protected) {
        Ok(schedule) => schedule,
        Err(Error::Schedule(e)) => {
            if let Some(report) = e.report() {
                diagnose::print_issues(report);
            }
            return Err(e.into());
        }
        Err(e) => return Err(e),
    };

    let document = ScheduleDocument {
        command: "schedule",
        generated_at: Utc::now(),
        schedule: &schedule,
    };
    if let Some(path) = output_path {
        file::write_json(path, &document)?;
    }

    if output::is_json() {
        output::json_output(&document);
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Schedule");
    output::field("Season", schedule.season);
    output::field("Slots", schedule.slots);
    output::field("Games", schedule.games.len());
    match &schedule.solver {
        Some(solve) => {
            output::field("Solver", format!("{} ({:?})", solve.backend, solve.status));
            output::field("Objective", solve.objective.round_dp(6));
            output::field(
                "Model",
                output::muted(format!(
                    "{} variables, {} constraints",
                    solve.variables, solve.constraints
                )),
            );
        }
        None => output::field("Solver", output::muted("skipped, every game is fixed")),
    }

    if !output::is_quiet() {
        let rows: Vec<GameRow> = schedule
            .games
            .iter()
            .map(|g| GameRow {
                slot: g.slot.get(),
                host: g.host.to_string(),
                visitor: g.visitor.to_string(),
                fixed: if g.protected { "yes" } else { "" },
            })
            .collect();
        output::section("Games");
        output::lines(&Table::new(rows).to_string());
    }

    if !schedule.relocations.is_empty() {
        output::section("Repairs");
        for relocation in &schedule.relocations {
            output::note(&format!(
                "{} moved from slot {} to slot {}",
                relocation.matchup,
                output::highlight(relocation.from),
                output::highlight(relocation.to)
            ));
        }
    }
    for defect in &schedule.defects {
        output::warning(&defect.to_string());
    }
    if schedule.repair_exhausted {
        output::hint("raise [repair] max_iterations to keep repairing");
    }

    if let Some(path) = output_path {
        output::success(&format!("Wrote {}", path.display()));
    }
    if schedule.is_clean() {
        output::success("No back-to-back repeats");
    }
    Ok(())
}
