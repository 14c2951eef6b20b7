//! Post-repair checks: protected-slot invariance, structural invariants and
//! the slot bounds of [`ConstraintConfig`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::domain::{ConstraintConfig, League, Matchup, ParticipantId, Schedule, Slot};
use crate::error::ScheduleError;

/// Ordered contents of every protected slot at capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedSnapshot {
    slots: BTreeMap<Slot, Vec<Matchup>>,
}

impl ProtectedSnapshot {
    #[must_use]
    pub fn capture(schedule: &Schedule) -> Self {
        let slots = schedule
            .protected_slots()
            .map(|slot| {
                let games = schedule.in_slot(slot).map(|a| a.matchup.clone()).collect();
                (slot, games)
            })
            .collect();
        Self { slots }
    }

    /// Compare `schedule` against the snapshot, element for element.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::ProtectedScheduleViolation`] for the first
    /// slot whose count, content or order differs.
    pub fn verify(&self, schedule: &Schedule) -> Result<(), ScheduleError> {
        let current = Self::capture(schedule);

        if let Some(slot) = current.slots.keys().find(|s| !self.slots.contains_key(s)) {
            return Err(ScheduleError::ProtectedScheduleViolation {
                slot: *slot,
                detail: "slot became protected".to_string(),
            });
        }

        for (slot, expected) in &self.slots {
            let Some(found) = current.slots.get(slot) else {
                return Err(ScheduleError::ProtectedScheduleViolation {
                    slot: *slot,
                    detail: "slot is no longer protected".to_string(),
                });
            };
            if found.len() != expected.len() {
                return Err(ScheduleError::ProtectedScheduleViolation {
                    slot: *slot,
                    detail: format!("expected {} games, found {}", expected.len(), found.len()),
                });
            }
            if let Some((before, after)) = expected.iter().zip(found).find(|(a, b)| a != b) {
                return Err(ScheduleError::ProtectedScheduleViolation {
                    slot: *slot,
                    detail: format!("{before} was replaced by {after}"),
                });
            }
        }
        Ok(())
    }

    /// Number of protected slots captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A broken structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuralDefect {
    MissingMatchup { matchup: Matchup },
    DuplicateMatchup { matchup: Matchup, count: usize },
    UnexpectedMatchup { matchup: Matchup, slot: Slot },
    DoubleBooked { participant: ParticipantId, slot: Slot },
    SelfMatch { matchup: Matchup, slot: Slot },
    OverCapacity { slot: Slot, load: usize, capacity: u32 },
    OutOfRange { matchup: Matchup, slot: Slot },
    CrossCategoryOverCapacity { slot: Slot, count: usize, capacity: u32 },
    UnderLoaded { slot: Slot, load: usize, minimum: usize },
    ByeOutsideWindow { participant: ParticipantId, slot: Slot },
    TooManyByes { participant: ParticipantId, byes: usize, allowed: usize },
}

impl fmt::Display for StructuralDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMatchup { matchup } => write!(f, "{matchup} is not scheduled"),
            Self::DuplicateMatchup { matchup, count } => {
                write!(f, "{matchup} is scheduled {count} times")
            }
            Self::UnexpectedMatchup { matchup, slot } => {
                write!(f, "{matchup} in slot {slot} was never generated")
            }
            Self::DoubleBooked { participant, slot } => {
                write!(f, "{participant} plays more than once in slot {slot}")
            }
            Self::SelfMatch { matchup, slot } => write!(f, "{matchup} in slot {slot} is a self match"),
            Self::OverCapacity {
                slot,
                load,
                capacity,
            } => write!(f, "slot {slot} holds {load} games, capacity {capacity}"),
            Self::OutOfRange { matchup, slot } => {
                write!(f, "{matchup} is in slot {slot}, outside the season")
            }
            Self::CrossCategoryOverCapacity {
                slot,
                count,
                capacity,
            } => write!(f, "slot {slot} holds {count} cross-category games, cap {capacity}"),
            Self::UnderLoaded { slot, load, minimum } => {
                write!(f, "slot {slot} holds {load} games, at least {minimum} required")
            }
            Self::ByeOutsideWindow { participant, slot } => {
                write!(f, "{participant} sits out slot {slot}, outside the bye window")
            }
            Self::TooManyByes {
                participant,
                byes,
                allowed,
            } => write!(f, "{participant} sits out {byes} open window slots, {allowed} allowed"),
        }
    }
}

/// Check the schedule against the matchups that were handed to the solver.
///
/// Open-slot assignments must match `placed` as a multiset; no participant
/// plays twice in a slot; no self matches. Open slots must also respect the
/// slot bounds in `constraints` (see [`validate_bounds`]). Protected games
/// are taken as given.
#[must_use]
pub fn validate_structure(
    schedule: &Schedule,
    placed: &[Matchup],
    league: &League,
    constraints: &ConstraintConfig,
) -> Vec<StructuralDefect> {
    let mut defects = Vec::new();

    let mut expected: HashMap<&Matchup, usize> = HashMap::new();
    for matchup in placed {
        *expected.entry(matchup).or_insert(0) += 1;
    }
    let mut seen: HashMap<&Matchup, usize> = HashMap::new();
    for assignment in schedule.assignments() {
        if schedule.is_protected(assignment.slot) {
            continue;
        }
        let count = seen.entry(&assignment.matchup).or_insert(0);
        *count += 1;
        if !expected.contains_key(&assignment.matchup) && *count == 1 {
            defects.push(StructuralDefect::UnexpectedMatchup {
                matchup: assignment.matchup.clone(),
                slot: assignment.slot,
            });
        }
    }
    let mut missing: Vec<&Matchup> = expected
        .iter()
        .filter(|(m, n)| seen.get(*m).copied().unwrap_or(0) < **n)
        .map(|(m, _)| *m)
        .collect();
    missing.sort();
    defects.extend(missing.into_iter().map(|m| StructuralDefect::MissingMatchup {
        matchup: m.clone(),
    }));
    let mut duplicated: Vec<(&Matchup, usize)> = seen
        .iter()
        .filter(|(m, n)| **n > expected.get(*m).copied().unwrap_or(1))
        .map(|(m, n)| (*m, *n))
        .collect();
    duplicated.sort();
    defects.extend(
        duplicated
            .into_iter()
            .map(|(m, count)| StructuralDefect::DuplicateMatchup {
                matchup: m.clone(),
                count,
            }),
    );

    let mut booked: HashSet<(&ParticipantId, Slot)> = HashSet::new();
    for assignment in schedule.ordered() {
        if assignment.slot.get() > schedule.slot_count() {
            defects.push(StructuralDefect::OutOfRange {
                matchup: assignment.matchup.clone(),
                slot: assignment.slot,
            });
        }
        if assignment.matchup.is_self_match() {
            defects.push(StructuralDefect::SelfMatch {
                matchup: assignment.matchup.clone(),
                slot: assignment.slot,
            });
            continue;
        }
        for participant in assignment.matchup.participants() {
            if !booked.insert((participant, assignment.slot)) {
                defects.push(StructuralDefect::DoubleBooked {
                    participant: participant.clone(),
                    slot: assignment.slot,
                });
            }
        }
    }

    defects.extend(validate_bounds(schedule, league, constraints));
    defects
}

/// Slot capacity, cross-category cap, minimum load and bye rules over the
/// open slots.
///
/// Byes are counted the way the model counts them: outside the window
/// everyone plays, and inside it a participant may sit out as many open slots
/// as `max_byes_per_participant` leaves after byes already taken in protected
/// window slots.
#[must_use]
pub fn validate_bounds(
    schedule: &Schedule,
    league: &League,
    constraints: &ConstraintConfig,
) -> Vec<StructuralDefect> {
    let mut defects = Vec::new();
    let min_load = constraints.min_load(league.len());
    let open: Vec<Slot> = Slot::range(schedule.slot_count())
        .filter(|s| !schedule.is_protected(*s))
        .collect();

    for &slot in &open {
        let load = schedule.load(slot);
        if load > constraints.max_per_slot as usize {
            defects.push(StructuralDefect::OverCapacity {
                slot,
                load,
                capacity: constraints.max_per_slot,
            });
        }
        if load < min_load {
            defects.push(StructuralDefect::UnderLoaded {
                slot,
                load,
                minimum: min_load,
            });
        }
        if let Some(cap) = constraints.max_cross_category_per_slot {
            let count = schedule
                .in_slot(slot)
                .filter(|a| league.is_cross_category(&a.matchup.host, &a.matchup.visitor))
                .count();
            if count > cap as usize {
                defects.push(StructuralDefect::CrossCategoryOverCapacity {
                    slot,
                    count,
                    capacity: cap,
                });
            }
        }
    }

    let Some(window) = constraints.bye_window else {
        return defects;
    };
    for participant in league.participants() {
        let id = &participant.id;
        let idle = |slot: &Slot| !schedule.is_busy(id, *slot, None);

        for &slot in open.iter().filter(|s| !window.contains(**s) && idle(*s)) {
            defects.push(StructuralDefect::ByeOutsideWindow {
                participant: id.clone(),
                slot,
            });
        }

        let Some(max_byes) = constraints.max_byes_per_participant else {
            continue;
        };
        let protected_byes = schedule
            .protected_slots()
            .filter(|s| window.contains(*s) && idle(s))
            .count();
        let allowed = (max_byes as usize).saturating_sub(protected_byes);
        let byes = open.iter().filter(|s| window.contains(**s) && idle(*s)).count();
        if byes > allowed {
            defects.push(StructuralDefect::TooManyByes {
                participant: id.clone(),
                byes,
                allowed,
            });
        }
    }

    defects
}
