//! Handler for `matchweek diagnose`.

use std::path::Path;

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::file;
use crate::domain::DiagnosticsReport;
use crate::error::{Result, ScheduleError};
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::settings::Config;

/// Execute `diagnose`.
///
/// A blocking report is an error so scripts can branch on the exit code.
pub fn execute(config: &Config, league_path: &Path, protected_path: Option<&Path>) -> Result<()> {
    let league = file::load_league(league_path)?;
    let protected = file::load_protected(protected_path)?;
    let report = bootstrap::build_pipeline(config).diagnose(&league, &protected)?;

    if output::is_json() {
        output::json_output(&json!({
            "command": "diagnose",
            "report": report,
        }));
    } else {
        output::header(env!("CARGO_PKG_VERSION"));
        output::section("Counts");
        let counts = &report.counts;
        output::field("Participants", counts.participants);
        output::field(
            "Matchups",
            format!("{} of {} required", counts.actual_matchups, counts.required_matchups),
        );
        output::field("Protected", counts.protected_matchups);
        output::field("To place", counts.matchups_to_place);
        output::field(
            "Open slots",
            format!("{} (capacity {})", counts.open_slots, counts.slot_capacity),
        );
        output::field(
            "Byes needed",
            match counts.bye_capacity {
                Some(capacity) => format!("{} of {capacity}", counts.byes_needed),
                None => counts.byes_needed.to_string(),
            },
        );
        output::field(
            "Cross-category",
            match counts.cross_category_capacity {
                Some(capacity) => format!("{} of {capacity}", counts.cross_category_matchups),
                None => counts.cross_category_matchups.to_string(),
            },
        );

        if report.is_clean() {
            output::success("No feasibility issues found");
        } else {
            print_issues(&report);
        }
    }

    if report.is_blocking() {
        return Err(ScheduleError::Infeasible {
            report: Box::new(report),
        }
        .into());
    }
    Ok(())
}

/// Print every issue as a warning.
pub fn print_issues(report: &DiagnosticsReport) {
    if output::is_json() {
        return;
    }
    output::section(if report.is_blocking() {
        "Infeasible"
    } else {
        "Notes"
    });
    for issue in &report.issues {
        output::warning(issue);
    }
}
