//! Report shapes shared by the engine, its errors and the CLI.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::ParticipantId;
use super::matchup::PairKey;
use super::slot::Slot;

/// A participant whose matchup count misses the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantCount {
    /// The participant.
    pub participant: ParticipantId,
    /// Matchups actually produced.
    pub realized: u32,
    /// Matchups required.
    pub required: u32,
}

impl fmt::Display for ParticipantCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has {} of {}", self.participant, self.realized, self.required)
    }
}

/// Counts computed by the feasibility pre-checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticCounts {
    /// Participants in the league.
    pub participants: usize,
    /// `participants * games_per_participant / 2`.
    pub required_matchups: usize,
    /// Matchups the generator produced.
    pub actual_matchups: usize,
    /// Games fixed in protected slots.
    pub protected_matchups: usize,
    /// Matchups left for the solver.
    pub matchups_to_place: usize,
    /// Slots not protected.
    pub open_slots: usize,
    /// `open_slots * max_per_slot`.
    pub slot_capacity: usize,
    /// Byes participants must take in open slots.
    pub byes_needed: usize,
    /// Byes the open slots can absorb, when bounded.
    pub bye_capacity: Option<usize>,
    /// Cross-category matchups left for the solver.
    pub cross_category_matchups: usize,
    /// Cross-category games the open slots can absorb, when capped.
    pub cross_category_capacity: Option<usize>,
    /// Participants whose generated count misses the target.
    pub mismatched_participants: Vec<ParticipantCount>,
}

/// Solver-independent feasibility report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    /// Human-readable feasibility issues.
    pub issues: Vec<String>,
    /// Structured counts behind the issues.
    pub counts: DiagnosticCounts,
    /// Whether any issue makes the model certainly infeasible.
    pub blocking: bool,
}

impl DiagnosticsReport {
    /// Whether the configuration is certainly infeasible.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// Whether no issues were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub(crate) fn block(&mut self, issue: String) {
        self.issues.push(issue);
        self.blocking = true;
    }

    pub(crate) fn note(&mut self, issue: String) {
        self.issues.push(issue);
    }
}

/// Why a repeat could not be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfixableReason {
    /// Both occurrences sit in protected slots.
    BothProtected,
    /// No open slot satisfied every relocation rule.
    NoLegalSlot,
    /// The iteration cap ran out before the repeat was handled.
    IterationCap,
}

impl fmt::Display for UnfixableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::BothProtected => "both occurrences are protected",
            Self::NoLegalSlot => "no legal target slot",
            Self::IterationCap => "repair iteration cap reached",
        };
        f.write_str(text)
    }
}

/// An adjacency repeat the repair pass left in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfixableRepeat {
    /// The repeated pair.
    pub pair: PairKey,
    /// Earlier slot.
    pub first_slot: Slot,
    /// Later slot.
    pub second_slot: Slot,
    /// Why it stayed.
    pub reason: UnfixableReason,
}

impl fmt::Display for UnfixableRepeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} meet in slots {} and {}: {}",
            self.pair, self.first_slot, self.second_slot, self.reason
        )
    }
}
