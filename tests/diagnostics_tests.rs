//! Feasibility pre-checks through the pipeline.

use std::sync::Arc;

use matchweek::domain::{ByeWindow, DiagnosticsReport, Matchup, ProtectedSchedule, Slot};
use matchweek::error::Error;
use matchweek::infrastructure::bootstrap::build_pipeline_with;
use matchweek::infrastructure::config::settings::Config;
use matchweek::port::outbound::solver::SolverStatus;
use matchweek::testkit::{config, league, solver::ScriptedSolver};

fn scripted() -> Arc<ScriptedSolver> {
    Arc::new(ScriptedSolver::failing(SolverStatus::Error))
}

#[test]
fn default_season_passes_every_check() {
    let report = build_pipeline_with(&Config::default(), scripted())
        .diagnose(&league::full(), &ProtectedSchedule::empty())
        .unwrap();

    assert!(report.is_clean(), "{:?}", report.issues);
    let counts = &report.counts;
    assert_eq!(counts.participants, 32);
    assert_eq!(counts.required_matchups, 272);
    assert_eq!(counts.actual_matchups, 272);
    assert_eq!(counts.open_slots, 18);
    assert_eq!(counts.slot_capacity, 288);
    assert_eq!(counts.byes_needed, 32);
    assert_eq!(counts.bye_capacity, Some(60));
    assert!(counts.mismatched_participants.is_empty());
}

#[test]
fn small_slot_cap_is_blocking() {
    let mut settings = Config::default();
    settings.constraints.max_per_slot = 10;

    let report = build_pipeline_with(&settings, scripted())
        .diagnose(&league::full(), &ProtectedSchedule::empty())
        .unwrap();

    assert!(report.is_blocking());
    assert!(report.issues.iter().any(|i| i.contains("272 matchups to place")));
}

#[test]
fn cross_category_cap_is_checked() {
    let mut settings = Config::default();
    settings.constraints.max_cross_category_per_slot = Some(2);

    let report = build_pipeline_with(&settings, scripted())
        .diagnose(&league::full(), &ProtectedSchedule::empty())
        .unwrap();

    assert!(report.is_blocking());
    assert_eq!(report.counts.cross_category_capacity, Some(36));
    assert!(report.counts.cross_category_matchups > 36);
}

#[test]
fn protected_games_reduce_what_is_left_to_place() {
    let protected = ProtectedSchedule::try_new(
        [(
            Slot::FIRST,
            vec![Matchup::new("A", "B"), Matchup::new("C", "D")],
        )]
        .into_iter()
        .collect(),
    )
    .unwrap();

    let report = build_pipeline_with(&config::double_round_robin(6), scripted())
        .diagnose(&league::four(), &protected)
        .unwrap();

    assert!(report.is_clean(), "{:?}", report.issues);
    assert_eq!(report.counts.protected_matchups, 2);
    assert_eq!(report.counts.matchups_to_place, 10);
    assert_eq!(report.counts.open_slots, 5);
}

#[test]
fn protected_slot_outside_the_season_is_rejected() {
    let protected = ProtectedSchedule::try_new(
        [(Slot::try_new(9).unwrap(), vec![Matchup::new("A", "B")])]
            .into_iter()
            .collect(),
    )
    .unwrap();

    let err = build_pipeline_with(&config::double_round_robin(6), scripted())
        .diagnose(&league::four(), &protected)
        .unwrap_err();

    assert!(matches!(err, Error::Domain(_)));
}

/// Four participants with six games each over eight slots, leaving two byes
/// apiece, under the given bye rules.
fn four_over_eight(
    window: ByeWindow,
    max_byes: Option<u32>,
    max_absent: Option<u32>,
) -> DiagnosticsReport {
    let mut settings = config::double_round_robin(8);
    settings.constraints.bye_window = Some(window);
    settings.constraints.max_byes_per_participant = max_byes;
    settings.constraints.max_absent_per_slot = max_absent;

    build_pipeline_with(&settings, scripted())
        .diagnose(&league::four(), &ProtectedSchedule::empty())
        .unwrap()
}

#[test]
fn byes_beyond_window_capacity_block() {
    let report = four_over_eight(ByeWindow { start: 3, end: 4 }, None, Some(2));

    assert!(report.is_blocking());
    assert_eq!(report.counts.byes_needed, 8);
    assert_eq!(report.counts.bye_capacity, Some(4));
    assert!(report
        .issues
        .iter()
        .any(|i| i.contains("8 byes needed but the bye slots allow 4")));
}

#[test]
fn too_few_games_for_slots_outside_the_window_block() {
    let report = four_over_eight(ByeWindow { start: 8, end: 8 }, None, None);

    assert!(report.is_blocking());
    assert!(report.issues.iter().any(|i| i
        .contains("A must play in 7 slots outside the bye window but has 6 games left")));
}

#[test]
fn byes_above_the_participant_cap_block() {
    let report = four_over_eight(ByeWindow { start: 1, end: 8 }, Some(1), None);

    assert!(report.is_blocking());
    for id in ["A", "B", "C", "D"] {
        assert!(
            report
                .issues
                .iter()
                .any(|i| i.contains(&format!("{id} needs 2 byes in open slots but may take 1"))),
            "{:?}",
            report.issues
        );
    }
}

#[test]
fn byes_within_every_bound_pass() {
    let report = four_over_eight(ByeWindow { start: 3, end: 6 }, Some(2), Some(2));

    assert!(report.is_clean(), "{:?}", report.issues);
    assert_eq!(report.counts.byes_needed, 8);
    assert_eq!(report.counts.bye_capacity, Some(8));
}
