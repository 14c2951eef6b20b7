//! Matchups and unordered pair keys.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::ParticipantId;

/// An ordered (host, visitor) pairing.
///
/// `A hosts B` and `B hosts A` are distinct matchups; they form a reverse pair
/// and share a [`PairKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Matchup {
    /// Hosting participant.
    pub host: ParticipantId,
    /// Visiting participant.
    pub visitor: ParticipantId,
}

impl Matchup {
    /// Create a matchup.
    pub fn new(host: impl Into<ParticipantId>, visitor: impl Into<ParticipantId>) -> Self {
        Self {
            host: host.into(),
            visitor: visitor.into(),
        }
    }

    /// The same pairing with host and visitor swapped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            host: self.visitor.clone(),
            visitor: self.host.clone(),
        }
    }

    /// Orientation-free key for repeat detection.
    #[must_use]
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.host.clone(), self.visitor.clone())
    }

    /// Whether the participant takes part.
    #[must_use]
    pub fn involves(&self, id: &ParticipantId) -> bool {
        self.host == *id || self.visitor == *id
    }

    /// Both participants, host first.
    #[must_use]
    pub fn participants(&self) -> [&ParticipantId; 2] {
        [&self.host, &self.visitor]
    }

    /// Whether host and visitor are the same participant.
    #[must_use]
    pub fn is_self_match(&self) -> bool {
        self.host == self.visitor
    }
}

impl fmt::Display for Matchup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.host, self.visitor)
    }
}

/// Unordered participant pair, lower identifier first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    /// Lexicographically smaller participant.
    pub first: ParticipantId,
    /// Lexicographically larger participant.
    pub second: ParticipantId,
}

impl PairKey {
    /// Build a key from two participants in any order.
    pub fn new(a: ParticipantId, b: ParticipantId) -> Self {
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first, self.second)
    }
}
