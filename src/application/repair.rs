//! Post-solve repair of back-to-back repeats.
//!
//! A repeat is the same unordered pair meeting in consecutive slots. The pass
//! fixes one repeat per iteration by moving the open occurrence to the
//! earliest legal slot. Protected slots are never touched.
//!
//! A move must keep every bound the model enforced: slot capacity, the
//! cross-category cap, the minimum load of the vacated slot, no byes outside
//! the bye window and the per-participant bye cap.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    Assignment, ConstraintConfig, League, PairKey, Relocation, RepairConfig, Schedule, Slot,
    UnfixableReason, UnfixableRepeat,
};

/// Outcome of a repair run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub relocations: Vec<Relocation>,
    pub unfixable: Vec<UnfixableRepeat>,
    pub iterations: u32,
    /// The iteration cap stopped the loop with repeats left.
    pub exhausted: bool,
}

impl RepairReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unfixable.is_empty()
    }
}

/// A repeat found in slots `(w, w + 1)`.
struct Repeat {
    pair: PairKey,
    earlier: usize,
    later: usize,
    first_slot: Slot,
    second_slot: Slot,
}

impl Repeat {
    fn marker(&self) -> (PairKey, Slot, Slot) {
        (self.pair.clone(), self.first_slot, self.second_slot)
    }

    fn unfixable(&self, reason: UnfixableReason) -> UnfixableRepeat {
        UnfixableRepeat {
            pair: self.pair.clone(),
            first_slot: self.first_slot,
            second_slot: self.second_slot,
            reason,
        }
    }
}

/// Bounded fixed-point repair loop.
pub struct RepairPass<'a> {
    max_iterations: u32,
    constraints: &'a ConstraintConfig,
    league: &'a League,
    min_load: usize,
}

impl<'a> RepairPass<'a> {
    pub fn new(config: &RepairConfig, constraints: &'a ConstraintConfig, league: &'a League) -> Self {
        Self {
            max_iterations: config.max_iterations,
            constraints,
            league,
            min_load: constraints.min_load(league.len()),
        }
    }

    /// Repair `schedule` in place.
    pub fn run(&self, schedule: &mut Schedule) -> RepairReport {
        let mut report = RepairReport::default();
        let mut known: HashSet<(PairKey, Slot, Slot)> = HashSet::new();

        while report.iterations < self.max_iterations {
            let Some(repeat) = first_repeat(schedule, &known) else {
                break;
            };
            report.iterations += 1;

            let mover = match (
                schedule.is_protected(repeat.first_slot),
                schedule.is_protected(repeat.second_slot),
            ) {
                (true, true) => {
                    warn!(pair = %repeat.pair, slot = %repeat.first_slot, "Repeat between protected slots");
                    known.insert(repeat.marker());
                    report
                        .unfixable
                        .push(repeat.unfixable(UnfixableReason::BothProtected));
                    continue;
                }
                (false, _) => repeat.earlier,
                (true, false) => repeat.later,
            };

            let moved = self
                .target_slot(schedule, mover)
                .and_then(|to| schedule.relocate(mover, to));
            match moved {
                Some(relocation) => {
                    debug!(
                        matchup = %relocation.matchup,
                        from = %relocation.from,
                        to = %relocation.to,
                        "Relocated repeat"
                    );
                    report.relocations.push(relocation);
                }
                None => {
                    warn!(pair = %repeat.pair, slot = %repeat.first_slot, "No legal slot for repeat");
                    known.insert(repeat.marker());
                    report
                        .unfixable
                        .push(repeat.unfixable(UnfixableReason::NoLegalSlot));
                }
            }
        }

        // Anything still unhandled ran out of iterations.
        for repeat in all_repeats(schedule) {
            if known.contains(&repeat.marker()) {
                continue;
            }
            report.exhausted = true;
            report
                .unfixable
                .push(repeat.unfixable(UnfixableReason::IterationCap));
        }
        if report.exhausted {
            warn!(
                iterations = report.iterations,
                cap = self.max_iterations,
                "Repair stopped at the iteration cap"
            );
        }

        info!(
            iterations = report.iterations,
            relocations = report.relocations.len(),
            unfixable = report.unfixable.len(),
            "Repair pass finished"
        );
        report
    }

    /// Earliest slot the assignment at `idx` can move to.
    fn target_slot(&self, schedule: &Schedule, idx: usize) -> Option<Slot> {
        let assignment = schedule.assignments().get(idx)?;
        if !self.can_vacate(schedule, assignment) {
            return None;
        }
        let others = schedule.pair_slots(&assignment.matchup.pair_key(), idx);
        let cross = self
            .league
            .is_cross_category(&assignment.matchup.host, &assignment.matchup.visitor);

        Slot::range(schedule.slot_count()).find(|&slot| {
            slot != assignment.slot
                && !schedule.is_protected(slot)
                && !others.iter().any(|o| *o == slot || o.is_adjacent(slot))
                && assignment
                    .matchup
                    .participants()
                    .into_iter()
                    .all(|p| !schedule.is_busy(p, slot, Some(idx)))
                && schedule.load(slot) < self.constraints.max_per_slot as usize
                && (!cross || self.has_cross_room(schedule, slot))
                && self.keeps_bye_cap(schedule, assignment, slot)
        })
    }

    /// Taking the game out leaves its slot above the minimum load and puts no
    /// one on a bye outside the window.
    fn can_vacate(&self, schedule: &Schedule, assignment: &Assignment) -> bool {
        schedule.load(assignment.slot) > self.min_load
            && self
                .constraints
                .bye_window
                .map_or(true, |window| window.contains(assignment.slot))
    }

    fn has_cross_room(&self, schedule: &Schedule, slot: Slot) -> bool {
        let Some(cap) = self.constraints.max_cross_category_per_slot else {
            return true;
        };
        let cross = schedule
            .in_slot(slot)
            .filter(|a| self.league.is_cross_category(&a.matchup.host, &a.matchup.visitor))
            .count();
        cross < cap as usize
    }

    /// Moving out of the window adds a window bye for both participants.
    fn keeps_bye_cap(&self, schedule: &Schedule, assignment: &Assignment, to: Slot) -> bool {
        let (Some(window), Some(max_byes)) = (
            self.constraints.bye_window,
            self.constraints.max_byes_per_participant,
        ) else {
            return true;
        };
        if window.contains(to) {
            return true;
        }
        assignment.matchup.participants().into_iter().all(|p| {
            let byes = Slot::range(schedule.slot_count())
                .filter(|s| window.contains(*s) && !schedule.is_busy(p, *s, None))
                .count();
            byes < max_byes as usize
        })
    }
}

fn slot_index(schedule: &Schedule) -> BTreeMap<Slot, Vec<usize>> {
    let mut index: BTreeMap<Slot, Vec<usize>> = BTreeMap::new();
    for (idx, assignment) in schedule.assignments().iter().enumerate() {
        index.entry(assignment.slot).or_default().push(idx);
    }
    index
}

/// Every repeat, scanning `(w, w + 1)` in ascending order.
fn all_repeats(schedule: &Schedule) -> Vec<Repeat> {
    let index = slot_index(schedule);
    let assignments = schedule.assignments();
    let mut repeats = Vec::new();

    for (&slot, earlier) in &index {
        let Some(later) = index.get(&slot.next()) else {
            continue;
        };
        for &i in earlier {
            let pair = assignments[i].matchup.pair_key();
            for &j in later {
                if assignments[j].matchup.pair_key() == pair {
                    repeats.push(Repeat {
                        pair: pair.clone(),
                        earlier: i,
                        later: j,
                        first_slot: slot,
                        second_slot: slot.next(),
                    });
                }
            }
        }
    }
    repeats
}

fn first_repeat(schedule: &Schedule, known: &HashSet<(PairKey, Slot, Slot)>) -> Option<Repeat> {
    all_repeats(schedule)
        .into_iter()
        .find(|r| !known.contains(&r.marker()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ByeWindow, Matchup, ProtectedSchedule};
    use crate::testkit::{config, league};

    fn slot(n: u32) -> Slot {
        Slot::try_new(n).unwrap()
    }

    fn game(host: &str, visitor: &str, s: u32) -> Assignment {
        Assignment::new(Matchup::new(host, visitor), slot(s))
    }

    fn run(max_iterations: u32, constraints: &ConstraintConfig, schedule: &mut Schedule) -> RepairReport {
        let league = league::four();
        RepairPass::new(&RepairConfig { max_iterations }, constraints, &league).run(schedule)
    }

    fn open(slots: u32) -> ConstraintConfig {
        config::open_constraints(slots, 16)
    }

    #[test]
    fn moves_earlier_open_occurrence_to_first_legal_slot() {
        let mut schedule = Schedule::merge(
            8,
            &ProtectedSchedule::empty(),
            vec![game("A", "B", 5), game("B", "A", 6), game("A", "C", 1)],
        );

        let report = run(10, &open(8), &mut schedule);

        // Slot 1 has A busy; 2 is free and not adjacent to 6.
        assert_eq!(report.relocations.len(), 1);
        assert_eq!(report.relocations[0].from, slot(5));
        assert_eq!(report.relocations[0].to, slot(2));
        assert!(report.is_clean());
        assert!(!report.exhausted);
        assert!(all_repeats(&schedule).is_empty());
    }

    #[test]
    fn protected_occurrence_stays_put() {
        let fixed = ProtectedSchedule::try_new(
            [(slot(5), vec![Matchup::new("A", "B")])].into_iter().collect(),
        )
        .unwrap();
        let mut schedule = Schedule::merge(6, &fixed, vec![game("B", "A", 6)]);

        let report = run(10, &open(6), &mut schedule);

        assert_eq!(report.relocations.len(), 1);
        assert_eq!(report.relocations[0].from, slot(6));
        assert_eq!(report.relocations[0].to, slot(1));
        assert_eq!(schedule.assignments()[0], game("A", "B", 5));
    }

    #[test]
    fn both_protected_is_reported_once() {
        let fixed = ProtectedSchedule::try_new(
            [
                (slot(1), vec![Matchup::new("A", "B")]),
                (slot(2), vec![Matchup::new("B", "A")]),
            ]
            .into_iter()
            .collect(),
        )
        .unwrap();
        let mut schedule = Schedule::merge(4, &fixed, vec![]);

        let report = run(10, &open(4), &mut schedule);

        assert_eq!(report.unfixable.len(), 1);
        assert_eq!(report.unfixable[0].reason, UnfixableReason::BothProtected);
        assert_eq!(report.iterations, 1);
        assert!(!report.exhausted);
    }

    #[test]
    fn no_legal_slot_when_season_is_too_short() {
        let mut schedule = Schedule::merge(
            2,
            &ProtectedSchedule::empty(),
            vec![game("A", "B", 1), game("B", "A", 2)],
        );

        let report = run(10, &open(2), &mut schedule);

        assert!(report.relocations.is_empty());
        assert_eq!(report.unfixable.len(), 1);
        assert_eq!(report.unfixable[0].reason, UnfixableReason::NoLegalSlot);
    }

    #[test]
    fn iteration_cap_marks_leftovers() {
        let mut schedule = Schedule::merge(
            10,
            &ProtectedSchedule::empty(),
            vec![
                game("A", "B", 5),
                game("B", "A", 6),
                game("C", "D", 7),
                game("D", "C", 8),
            ],
        );

        let report = run(1, &open(10), &mut schedule);

        assert_eq!(report.iterations, 1);
        assert!(report.exhausted);
        assert_eq!(report.unfixable.len(), 1);
        assert_eq!(report.unfixable[0].reason, UnfixableReason::IterationCap);
        assert_eq!(report.unfixable[0].pair, Matchup::new("C", "D").pair_key());
    }

    #[test]
    fn full_slot_is_not_a_target() {
        let mut schedule = Schedule::merge(
            4,
            &ProtectedSchedule::empty(),
            vec![game("A", "B", 3), game("B", "A", 4), game("C", "D", 1)],
        );
        let report = run(5, &config::open_constraints(4, 1), &mut schedule);

        assert_eq!(report.relocations.len(), 1);
        assert_eq!(report.relocations[0].to, slot(2));
    }

    /// Everyone plays slots 1, 2, 3 and 5; A and B are free in slot 4.
    fn everyone_busy_but_slot_four() -> Schedule {
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
    fn move_out_of_the_bye_window_is_refused() {
        let mut schedule = everyone_busy_but_slot_four();
        let mut constraints = open(5);
        constraints.bye_window = Some(ByeWindow { start: 4, end: 4 });

        let report = run(10, &constraints, &mut schedule);

        // Both repeats start in slot 1, outside the window.
        assert!(report.relocations.is_empty());
        assert_eq!(report.unfixable.len(), 2);
        assert!(report
            .unfixable
            .iter()
            .all(|u| u.reason == UnfixableReason::NoLegalSlot));
        assert_eq!(schedule.load(slot(1)), 2);
    }

    #[test]
    fn move_without_a_window_lands_in_the_free_slot() {
        let mut schedule = everyone_busy_but_slot_four();

        let report = run(10, &open(5), &mut schedule);

        assert_eq!(report.relocations.len(), 1);
        assert_eq!((report.relocations[0].from, report.relocations[0].to), (slot(1), slot(4)));
    }

    #[test]
    fn minimum_load_keeps_the_game_in_place() {
        let mut schedule = everyone_busy_but_slot_four();
        let mut constraints = open(5);
        // Four participants with at most zero absent need two games a slot.
        constraints.max_absent_per_slot = Some(0);

        let report = run(10, &constraints, &mut schedule);

        assert!(report.relocations.is_empty());
        assert_eq!(report.unfixable[0].reason, UnfixableReason::NoLegalSlot);
    }

    #[test]
    fn bye_cap_blocks_a_move_out_of_the_window() {
        // Both pairs meet in 2 and 3 inside a 2..=4 window. Everyone sits
        // out slot 4, so each already has one window bye.
        let build = || {
            Schedule::merge(
                6,
                &ProtectedSchedule::empty(),
                vec![
                    game("A", "C", 1),
                    game("B", "D", 1),
                    game("A", "B", 2),
                    game("C", "D", 2),
                    game("B", "A", 3),
                    game("D", "C", 3),
                    game("A", "D", 5),
                    game("B", "C", 5),
                ],
            )
        };
        let mut constraints = open(6);
        constraints.bye_window = Some(ByeWindow { start: 2, end: 4 });

        constraints.max_byes_per_participant = Some(1);
        let mut capped = build();
        let report = run(10, &constraints, &mut capped);
        assert!(report.relocations.is_empty());
        assert_eq!(report.unfixable[0].reason, UnfixableReason::NoLegalSlot);

        constraints.max_byes_per_participant = Some(2);
        let mut relaxed = build();
        let report = run(10, &constraints, &mut relaxed);
        assert_eq!(report.relocations.len(), 2);
        assert_eq!((report.relocations[0].from, report.relocations[0].to), (slot(2), slot(6)));
    }
}
