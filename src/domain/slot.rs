//! Slot (week) numbering.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// A one-based slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Slot(u32);

impl Slot {
    /// Create a slot, rejecting zero.
    pub fn try_new(slot: u32) -> Result<Self, DomainError> {
        if slot == 0 {
            return Err(DomainError::InvalidSlot { slot });
        }
        Ok(Self(slot))
    }

    /// The first slot of every season.
    pub const FIRST: Self = Self(1);

    /// Slot number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The following slot.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// The preceding slot, if any.
    #[must_use]
    pub const fn prev(self) -> Option<Self> {
        if self.0 > 1 {
            Some(Self(self.0 - 1))
        } else {
            None
        }
    }

    /// Whether the two slots are consecutive.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.0.abs_diff(other.0) == 1
    }

    /// Iterate `1..=count`.
    pub fn range(count: u32) -> impl Iterator<Item = Slot> {
        (1..=count).map(Slot)
    }
}

impl TryFrom<u32> for Slot {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Slot> for u32 {
    fn from(slot: Slot) -> Self {
        slot.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
