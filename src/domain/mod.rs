//! Scheduling domain: participants, matchups, slots and the rules between them.

pub mod constraint;
pub mod error;
pub mod id;
pub mod matchup;
pub mod participant;
pub mod report;
pub mod rules;
pub mod schedule;
pub mod slot;

pub use constraint::{Constraint, ConstraintSense, VariableBounds};
pub use error::DomainError;
pub use id::{CategoryId, GroupId, ParticipantId};
pub use matchup::{Matchup, PairKey};
pub use participant::{Category, Group, League, Participant};
pub use report::{
    DiagnosticCounts, DiagnosticsReport, ParticipantCount, UnfixableReason, UnfixableRepeat,
};
pub use rules::{ByeWindow, ConstraintConfig, RepairConfig, SeasonFormat};
pub use schedule::{Assignment, FilteredMatchups, ProtectedSchedule, Relocation, Schedule};
pub use slot::Slot;
