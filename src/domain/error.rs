//! Domain validation errors for core domain types.
//!
//! This module defines errors that occur when domain invariants are violated.
//! These errors are returned by `try_new` constructors that validate inputs.
//!
//! # Examples
//!
//! ```
//! use matchweek::domain::error::DomainError;
//! use matchweek::domain::Slot;
//!
//! assert!(matches!(Slot::try_new(0), Err(DomainError::InvalidSlot { slot: 0 })));
//! ```

use thiserror::Error;

use super::id::{CategoryId, GroupId, ParticipantId};

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Slots are numbered from 1.
    #[error("slot numbers start at 1, got {slot}")]
    InvalidSlot {
        /// The rejected slot number.
        slot: u32,
    },

    /// A slot lies beyond the configured season length.
    #[error("slot {slot} is outside the season (1..={slots})")]
    SlotOutOfRange {
        /// The rejected slot number.
        slot: u32,
        /// Number of slots in the season.
        slots: u32,
    },

    /// Participant identifiers must be non-empty.
    #[error("participant id cannot be empty")]
    EmptyParticipantId,

    /// A league needs at least two participants.
    #[error("league needs at least two participants, got {count}")]
    TooFewParticipants {
        /// Number of participants supplied.
        count: usize,
    },

    /// The same participant id was supplied twice.
    #[error("duplicate participant id: {0}")]
    DuplicateParticipant(ParticipantId),

    /// A group was tagged with two different categories.
    #[error("group {group} appears in categories {first} and {second}")]
    GroupSpansCategories {
        /// Offending group.
        group: GroupId,
        /// Category seen first.
        first: CategoryId,
        /// Conflicting category.
        second: CategoryId,
    },

    /// A participant referenced by a fixed assignment is not in the league.
    #[error("unknown participant {participant} in slot {slot}")]
    UnknownParticipant {
        /// Referenced identifier.
        participant: ParticipantId,
        /// Slot of the offending assignment.
        slot: u32,
    },

    /// A fixed assignment pairs a participant with itself.
    #[error("participant {participant} is matched against itself in slot {slot}")]
    SelfMatch {
        /// Offending participant.
        participant: ParticipantId,
        /// Slot of the offending assignment.
        slot: u32,
    },

    /// A fixed slot lists the same participant twice.
    #[error("participant {participant} appears twice in slot {slot}")]
    DoubleBooked {
        /// Offending participant.
        participant: ParticipantId,
        /// Slot of the offending assignments.
        slot: u32,
    },
}
