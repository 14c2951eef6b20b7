//! Assignments, the protected partial schedule and the working schedule.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::ParticipantId;
use super::matchup::{Matchup, PairKey};
use super::participant::League;
use super::slot::Slot;

/// A matchup placed in a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// The scheduled pairing.
    pub matchup: Matchup,
    /// Slot the pairing is played in.
    pub slot: Slot,
}

impl Assignment {
    /// Create an assignment.
    pub fn new(matchup: Matchup, slot: Slot) -> Self {
        Self { matchup, slot }
    }
}

/// Slots whose contents were fixed externally and must never change.
///
/// Insertion order inside each slot is preserved; it is part of what the
/// validator compares after repair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedSchedule {
    slots: BTreeMap<Slot, Vec<Matchup>>,
}

/// Result of removing protected games from the generated matchup list.
#[derive(Debug, Clone, Default)]
pub struct FilteredMatchups {
    /// Matchups still to be placed by the solver.
    pub remaining: Vec<Matchup>,
    /// Protected games that had no generated counterpart.
    pub unmatched: Vec<Assignment>,
}

impl ProtectedSchedule {
    /// An empty protected schedule.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from slot contents, rejecting self matches and double bookings.
    pub fn try_new(slots: BTreeMap<Slot, Vec<Matchup>>) -> Result<Self, DomainError> {
        for (slot, games) in &slots {
            let mut busy = HashSet::new();
            for game in games {
                if game.is_self_match() {
                    return Err(DomainError::SelfMatch {
                        participant: game.host.clone(),
                        slot: slot.get(),
                    });
                }
                for participant in game.participants() {
                    if !busy.insert(participant) {
                        return Err(DomainError::DoubleBooked {
                            participant: participant.clone(),
                            slot: slot.get(),
                        });
                    }
                }
            }
        }
        Ok(Self { slots })
    }

    /// Check every slot and participant against the league and season length.
    pub fn check(&self, league: &League, season_slots: u32) -> Result<(), DomainError> {
        for (slot, games) in &self.slots {
            if slot.get() > season_slots {
                return Err(DomainError::SlotOutOfRange {
                    slot: slot.get(),
                    slots: season_slots,
                });
            }
            for participant in games.iter().flat_map(Matchup::participants) {
                if !league.contains(participant) {
                    return Err(DomainError::UnknownParticipant {
                        participant: participant.clone(),
                        slot: slot.get(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether the slot is protected.
    ///
    /// A slot listed with no games still counts: it is a fixed empty slot.
    #[must_use]
    pub fn is_protected(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Protected slot numbers in ascending order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.slots.keys().copied()
    }

    /// Fixed games of one slot, in their original order.
    #[must_use]
    pub fn games(&self, slot: Slot) -> &[Matchup] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All fixed games as assignments, slot by slot.
    #[must_use]
    pub fn assignments(&self) -> Vec<Assignment> {
        self.slots
            .iter()
            .flat_map(|(slot, games)| games.iter().map(|m| Assignment::new(m.clone(), *slot)))
            .collect()
    }

    /// Number of fixed games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    /// Whether no games are fixed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Games each participant already plays in protected slots.
    #[must_use]
    pub fn realized_counts(&self) -> HashMap<ParticipantId, u32> {
        let mut counts = HashMap::new();
        for game in self.slots.values().flatten() {
            for participant in game.participants() {
                *counts.entry(participant.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Participants appearing in the given protected slot.
    #[must_use]
    pub fn busy_in(&self, slot: Slot) -> HashSet<&ParticipantId> {
        self.games(slot)
            .iter()
            .flat_map(Matchup::participants)
            .collect()
    }

    /// Remove every protected game from the generated list.
    ///
    /// Each fixed game consumes one generated matchup: the exact orientation
    /// when available, otherwise the reversed one. A pair generated twice
    /// (home and away) keeps its other occurrence for the solver.
    #[must_use]
    pub fn filter_matchups(&self, matchups: &[Matchup]) -> FilteredMatchups {
        let mut available: HashMap<&Matchup, Vec<usize>> = HashMap::new();
        for (idx, m) in matchups.iter().enumerate() {
            available.entry(m).or_default().push(idx);
        }

        let mut consumed = vec![false; matchups.len()];
        let mut unmatched = Vec::new();
        for (slot, games) in &self.slots {
            for game in games {
                let reversed = game.reversed();
                let hit = take_first(&mut available, game)
                    .or_else(|| take_first(&mut available, &reversed));
                match hit {
                    Some(idx) => consumed[idx] = true,
                    None => unmatched.push(Assignment::new(game.clone(), *slot)),
                }
            }
        }

        let remaining = matchups
            .iter()
            .zip(consumed)
            .filter(|(_, used)| !used)
            .map(|(m, _)| m.clone())
            .collect();

        FilteredMatchups {
            remaining,
            unmatched,
        }
    }
}

fn take_first(available: &mut HashMap<&Matchup, Vec<usize>>, key: &Matchup) -> Option<usize> {
    let slots = available.get_mut(key)?;
    if slots.is_empty() {
        return None;
    }
    Some(slots.remove(0))
}

/// A relocation applied by the repair pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    /// The moved matchup.
    pub matchup: Matchup,
    /// Slot before the move.
    pub from: Slot,
    /// Slot after the move.
    pub to: Slot,
}

/// The working season schedule: protected plus solved assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    slots: u32,
    protected: BTreeSet<Slot>,
    assignments: Vec<Assignment>,
}

impl Schedule {
    /// Merge protected games with solver output.
    ///
    /// Protected assignments come first in their original order; solved ones
    /// follow sorted by slot, host and visitor.
    #[must_use]
    pub fn merge(slots: u32, protected: &ProtectedSchedule, mut solved: Vec<Assignment>) -> Self {
        solved.sort_by(|a, b| a.slot.cmp(&b.slot).then_with(|| a.matchup.cmp(&b.matchup)));
        let mut assignments = protected.assignments();
        assignments.extend(solved);
        Self {
            slots,
            protected: protected.slots().collect(),
            assignments,
        }
    }

    /// Build directly from assignments, for callers that already hold a
    /// complete schedule.
    #[must_use]
    pub fn from_parts(slots: u32, protected: BTreeSet<Slot>, assignments: Vec<Assignment>) -> Self {
        Self {
            slots,
            protected,
            assignments,
        }
    }

    /// Number of slots in the season.
    #[must_use]
    pub fn slot_count(&self) -> u32 {
        self.slots
    }

    /// All assignments.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Whether the slot is protected.
    #[must_use]
    pub fn is_protected(&self, slot: Slot) -> bool {
        self.protected.contains(&slot)
    }

    /// Protected slots in ascending order.
    pub fn protected_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.protected.iter().copied()
    }

    /// Assignments of one slot, in schedule order.
    pub fn in_slot(&self, slot: Slot) -> impl Iterator<Item = &Assignment> + '_ {
        self.assignments.iter().filter(move |a| a.slot == slot)
    }

    /// Number of games in the slot.
    #[must_use]
    pub fn load(&self, slot: Slot) -> usize {
        self.in_slot(slot).count()
    }

    /// Whether the participant already plays in the slot, ignoring the
    /// assignment at `except`.
    #[must_use]
    pub fn is_busy(&self, participant: &ParticipantId, slot: Slot, except: Option<usize>) -> bool {
        self.assignments
            .iter()
            .enumerate()
            .any(|(idx, a)| Some(idx) != except && a.slot == slot && a.matchup.involves(participant))
    }

    /// Slots holding the pair, excluding the assignment at `except`.
    #[must_use]
    pub fn pair_slots(&self, key: &PairKey, except: usize) -> Vec<Slot> {
        self.assignments
            .iter()
            .enumerate()
            .filter(|(idx, a)| *idx != except && a.matchup.pair_key() == *key)
            .map(|(_, a)| a.slot)
            .collect()
    }

    /// Move the assignment at `idx` to another slot.
    ///
    /// Assignments in protected slots never move; callers decide legality of
    /// the target.
    pub(crate) fn relocate(&mut self, idx: usize, to: Slot) -> Option<Relocation> {
        let assignment = self.assignments.get_mut(idx)?;
        if self.protected.contains(&assignment.slot) || self.protected.contains(&to) {
            return None;
        }
        let from = assignment.slot;
        assignment.slot = to;
        Some(Relocation {
            matchup: assignment.matchup.clone(),
            from,
            to,
        })
    }

    /// Assignments ordered by slot for presentation, protected ones keeping
    /// their fixed order.
    #[must_use]
    pub fn ordered(&self) -> Vec<&Assignment> {
        let mut out: Vec<&Assignment> = self.assignments.iter().collect();
        out.sort_by_key(|a| a.slot);
        out
    }
}
