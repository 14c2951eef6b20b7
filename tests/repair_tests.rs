//! Repeat repair on hand-built schedules.

use matchweek::application::{
    validate_bounds, validate_structure, ProtectedSnapshot, RepairPass, RepairReport,
};
use matchweek::domain::{
    Assignment, ByeWindow, ConstraintConfig, League, Matchup, ProtectedSchedule, RepairConfig,
    Schedule, Slot, UnfixableReason,
};
use matchweek::testkit::{config, league};

fn slot(n: u32) -> Slot {
    Slot::try_new(n).unwrap()
}

fn game(host: &str, visitor: &str, s: u32) -> Assignment {
    Assignment::new(Matchup::new(host, visitor), slot(s))
}

fn six() -> League {
    league::single_group(&["A", "B", "C", "D", "E", "F"])
}

fn repair(
    schedule: &mut Schedule,
    max_iterations: u32,
    constraints: &ConstraintConfig,
) -> RepairReport {
    RepairPass::new(&RepairConfig { max_iterations }, constraints, &six()).run(schedule)
}

/// A and B meet in slots 5 and 6; everyone else fills slots 1 and 7.
fn reverse_pair_schedule() -> (Schedule, Vec<Matchup>) {
    let solved = vec![
        game("A", "C", 1),
        game("B", "D", 1),
        game("A", "B", 5),
        game("B", "A", 6),
        game("C", "D", 7),
    ];
    let placed = solved.iter().map(|a| a.matchup.clone()).collect();
    (Schedule::merge(8, &ProtectedSchedule::empty(), solved), placed)
}

#[test]
fn reverse_pair_in_slots_five_and_six_moves_to_first_free_slot() {
    let (mut schedule, placed) = reverse_pair_schedule();

    let constraints = config::open_constraints(8, 2);
    let report = repair(&mut schedule, 10, &constraints);

    assert!(report.is_clean());
    assert_eq!(report.relocations.len(), 1);
    let moved = &report.relocations[0];
    assert_eq!(moved.matchup, Matchup::new("A", "B"));
    assert_eq!((moved.from, moved.to), (slot(5), slot(2)));

    let slots: Vec<Slot> = schedule
        .assignments()
        .iter()
        .filter(|a| a.matchup.pair_key() == Matchup::new("A", "B").pair_key())
        .map(|a| a.slot)
        .collect();
    assert!(!slots[0].is_adjacent(slots[1]));
    assert!(validate_structure(&schedule, &placed, &six(), &constraints).is_empty());
}

#[test]
fn repaired_schedule_is_a_fixed_point() {
    let (mut schedule, _) = reverse_pair_schedule();
    let constraints = config::open_constraints(8, 2);

    repair(&mut schedule, 10, &constraints);
    let after_first = schedule.clone();
    let second = repair(&mut schedule, 10, &constraints);

    assert_eq!(second.iterations, 0);
    assert!(second.relocations.is_empty());
    assert_eq!(schedule, after_first);
}

#[test]
fn protected_slots_are_invariant_under_repair() {
    let protected = ProtectedSchedule::try_new(
        [(slot(3), vec![Matchup::new("A", "B"), Matchup::new("C", "D")])]
            .into_iter()
            .collect(),
    )
    .unwrap();
    let mut schedule = Schedule::merge(
        8,
        &protected,
        vec![game("B", "A", 4), game("D", "C", 2), game("A", "C", 6)],
    );
    let snapshot = ProtectedSnapshot::capture(&schedule);

    let report = repair(&mut schedule, 20, &config::open_constraints(8, 4));

    assert!(snapshot.verify(&schedule).is_ok());
    assert!(report.is_clean());
    assert!(report
        .relocations
        .iter()
        .all(|r| r.from != slot(3) && r.to != slot(3)));
}

#[test]
fn cap_at_least_the_repeat_count_converges() {
    let solved = vec![
        game("A", "B", 3),
        game("B", "A", 4),
        game("C", "D", 6),
        game("D", "C", 7),
        game("E", "F", 9),
        game("F", "E", 10),
    ];
    let mut schedule = Schedule::merge(12, &ProtectedSchedule::empty(), solved);

    let report = repair(&mut schedule, 3, &config::open_constraints(12, 4));

    assert_eq!(report.iterations, 3);
    assert_eq!(report.relocations.len(), 3);
    assert!(report.is_clean());
    assert!(!report.exhausted);
}

#[test]
fn both_protected_repeat_is_reported_not_moved() {
    let protected = ProtectedSchedule::try_new(
        [
            (slot(1), vec![Matchup::new("A", "B")]),
            (slot(2), vec![Matchup::new("B", "A")]),
        ]
        .into_iter()
        .collect(),
    )
    .unwrap();
    let mut schedule = Schedule::merge(6, &protected, Vec::new());
    let before = schedule.clone();

    let report = repair(&mut schedule, 10, &config::open_constraints(6, 2));

    assert_eq!(schedule, before);
    assert_eq!(report.unfixable.len(), 1);
    assert_eq!(report.unfixable[0].reason, UnfixableReason::BothProtected);
    assert_eq!(report.unfixable[0].first_slot, slot(1));
}

/// A full four-participant rotation over slots 1, 2, 3 and 5 with A and B
/// meeting in 1 and 2; only C and D play slot 4.
fn bounded_schedule() -> Schedule {
    Schedule::merge(
        5,
        &ProtectedSchedule::empty(),
        vec![
            game("A", "B", 1),
            game("C", "D", 1),
            game("B", "A", 2),
            game("D", "C", 2),
            game("A", "C", 3),
            game("B", "D", 3),
            game("C", "D", 4),
            game("A", "D", 5),
            game("B", "C", 5),
        ],
    )
}

#[test]
fn repair_keeps_byes_inside_the_window() {
    let league = league::four();
    let mut constraints = config::open_constraints(5, 2);
    constraints.bye_window = Some(ByeWindow { start: 4, end: 4 });
    constraints.max_byes_per_participant = Some(1);
    let mut schedule = bounded_schedule();
    assert!(validate_bounds(&schedule, &league, &constraints).is_empty());

    let report = RepairPass::new(&RepairConfig::default(), &constraints, &league).run(&mut schedule);

    assert!(report.relocations.is_empty());
    assert!(report
        .unfixable
        .iter()
        .all(|u| u.reason == UnfixableReason::NoLegalSlot));
    assert!(validate_bounds(&schedule, &league, &constraints).is_empty());
}

#[test]
fn unbounded_repair_of_the_same_schedule_would_open_a_bye() {
    let league = league::four();
    let open = config::open_constraints(5, 2);
    let mut schedule = bounded_schedule();

    let report = RepairPass::new(&RepairConfig::default(), &open, &league).run(&mut schedule);
    assert_eq!(report.relocations.len(), 1);
    assert_eq!((report.relocations[0].from, report.relocations[0].to), (slot(1), slot(4)));

    // The relocated schedule breaks the window the bounded run kept.
    let mut windowed = open.clone();
    windowed.bye_window = Some(ByeWindow { start: 4, end: 4 });
    let defects = validate_bounds(&schedule, &league, &windowed);
    assert_eq!(defects.len(), 2);
    assert!(defects.iter().all(|d| d.to_string().contains("outside the bye window")));
}
