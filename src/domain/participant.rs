//! Participants and their groupings.
//!
//! A [`League`] is the validated, read-only view of the participant list the
//! generator and model builder work against. Groups (divisions) belong to
//! exactly one category (conference). Within a group, members are ordered by
//! prior-period rank, with the identifier as tie-break, so "rank" is always the
//! one-based position inside the group.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{CategoryId, GroupId, ParticipantId};

/// A participant as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier.
    pub id: ParticipantId,
    /// Group (division) membership.
    pub group: GroupId,
    /// Category (conference) membership.
    pub category: CategoryId,
    /// Prior-period finishing position inside the group (1 = best).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl Participant {
    /// Create a participant without a prior rank.
    pub fn new(
        id: impl Into<ParticipantId>,
        group: impl Into<GroupId>,
        category: impl Into<CategoryId>,
    ) -> Self {
        Self {
            id: id.into(),
            group: group.into(),
            category: category.into(),
            rank: None,
        }
    }

    /// Attach a prior-period rank.
    #[must_use]
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }
}

/// A group and its rank-ordered members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Group identifier.
    pub id: GroupId,
    /// Owning category.
    pub category: CategoryId,
    /// Members ordered by rank, then identifier.
    pub members: Vec<ParticipantId>,
}

/// A category and its groups, ordered by group identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category identifier.
    pub id: CategoryId,
    /// Indices into [`League::groups`].
    pub groups: Vec<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Membership {
    group: usize,
    category: usize,
    rank: u32,
}

/// Validated participant list with group/category lookups.
#[derive(Debug, Clone)]
pub struct League {
    participants: Vec<Participant>,
    groups: Vec<Group>,
    categories: Vec<Category>,
    membership: HashMap<ParticipantId, Membership>,
}

impl League {
    /// Validate and index a participant list.
    ///
    /// Participants are kept in category, group, rank order so every
    /// iteration over the league is deterministic regardless of input order.
    pub fn try_new(participants: Vec<Participant>) -> Result<Self, DomainError> {
        if participants.len() < 2 {
            return Err(DomainError::TooFewParticipants {
                count: participants.len(),
            });
        }

        let mut seen = HashSet::with_capacity(participants.len());
        let mut group_category: BTreeMap<GroupId, CategoryId> = BTreeMap::new();
        for p in &participants {
            if p.id.as_str().trim().is_empty() {
                return Err(DomainError::EmptyParticipantId);
            }
            if !seen.insert(p.id.clone()) {
                return Err(DomainError::DuplicateParticipant(p.id.clone()));
            }
            match group_category.get(&p.group) {
                Some(existing) if *existing != p.category => {
                    return Err(DomainError::GroupSpansCategories {
                        group: p.group.clone(),
                        first: existing.clone(),
                        second: p.category.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    group_category.insert(p.group.clone(), p.category.clone());
                }
            }
        }

        // category -> group -> members
        let mut tree: BTreeMap<CategoryId, BTreeMap<GroupId, Vec<&Participant>>> = BTreeMap::new();
        for p in &participants {
            tree.entry(p.category.clone())
                .or_default()
                .entry(p.group.clone())
                .or_default()
                .push(p);
        }

        let mut ordered = Vec::with_capacity(participants.len());
        let mut groups = Vec::new();
        let mut categories = Vec::new();
        let mut membership = HashMap::with_capacity(participants.len());

        for (category_idx, (category_id, category_groups)) in tree.into_iter().enumerate() {
            let mut group_indices = Vec::with_capacity(category_groups.len());
            for (group_id, mut members) in category_groups {
                members.sort_by(|a, b| {
                    a.rank
                        .unwrap_or(u32::MAX)
                        .cmp(&b.rank.unwrap_or(u32::MAX))
                        .then_with(|| a.id.cmp(&b.id))
                });
                let group_idx = groups.len();
                for (pos, member) in members.iter().enumerate() {
                    membership.insert(
                        member.id.clone(),
                        Membership {
                            group: group_idx,
                            category: category_idx,
                            rank: pos as u32 + 1,
                        },
                    );
                    ordered.push((*member).clone());
                }
                groups.push(Group {
                    id: group_id,
                    category: category_id.clone(),
                    members: members.iter().map(|m| m.id.clone()).collect(),
                });
                group_indices.push(group_idx);
            }
            categories.push(Category {
                id: category_id,
                groups: group_indices,
            });
        }

        Ok(Self {
            participants: ordered,
            groups,
            categories,
            membership,
        })
    }

    /// All participants in category, group, rank order.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Always false for a validated league; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// All groups, ordered by category then group identifier.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// All categories, ordered by identifier.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Whether the identifier belongs to the league.
    #[must_use]
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.membership.contains_key(id)
    }

    /// Index of the participant's group.
    #[must_use]
    pub fn group_index(&self, id: &ParticipantId) -> Option<usize> {
        self.membership.get(id).map(|m| m.group)
    }

    /// Index of the participant's category.
    #[must_use]
    pub fn category_index(&self, id: &ParticipantId) -> Option<usize> {
        self.membership.get(id).map(|m| m.category)
    }

    /// One-based position of the participant inside its group.
    #[must_use]
    pub fn rank(&self, id: &ParticipantId) -> Option<u32> {
        self.membership.get(id).map(|m| m.rank)
    }

    /// Whether both participants share a group.
    #[must_use]
    pub fn same_group(&self, a: &ParticipantId, b: &ParticipantId) -> bool {
        match (self.group_index(a), self.group_index(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Whether the participants belong to different categories.
    #[must_use]
    pub fn is_cross_category(&self, a: &ParticipantId, b: &ParticipantId) -> bool {
        match (self.category_index(a), self.category_index(b)) {
            (Some(x), Some(y)) => x != y,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: &str, group: &str, category: &str) -> Participant {
        Participant::new(id, group, category)
    }

    #[test]
    fn orders_members_by_rank_then_id() {
        let league = League::try_new(vec![
            p("C", "East", "A").with_rank(1),
            p("A", "East", "A"),
            p("B", "East", "A").with_rank(2),
            p("D", "West", "A"),
        ])
        .unwrap();

        let east = &league.groups()[0];
        let members: Vec<&str> = east.members.iter().map(ParticipantId::as_str).collect();
        assert_eq!(members, vec!["C", "B", "A"]);
        assert_eq!(league.rank(&"A".into()), Some(3));
        assert_eq!(league.rank(&"D".into()), Some(1));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = League::try_new(vec![p("A", "East", "X"), p("A", "West", "X")]);
        assert_eq!(
            result.unwrap_err(),
            DomainError::DuplicateParticipant("A".into())
        );
    }

    #[test]
    fn rejects_group_in_two_categories() {
        let result = League::try_new(vec![p("A", "East", "X"), p("B", "East", "Y")]);
        assert!(matches!(
            result,
            Err(DomainError::GroupSpansCategories { .. })
        ));
    }

    #[test]
    fn rejects_tiny_league() {
        assert_eq!(
            League::try_new(vec![p("A", "East", "X")]).unwrap_err(),
            DomainError::TooFewParticipants { count: 1 }
        );
    }

    #[test]
    fn category_lookups() {
        let league = League::try_new(vec![
            p("A", "North", "X"),
            p("B", "North", "X"),
            p("C", "South", "Y"),
            p("D", "South", "Y"),
        ])
        .unwrap();
        assert!(league.same_group(&"A".into(), &"B".into()));
        assert!(!league.same_group(&"A".into(), &"C".into()));
        assert!(league.is_cross_category(&"B".into(), &"D".into()));
        assert_eq!(league.categories().len(), 2);
        assert_eq!(league.categories()[1].groups, vec![1]);
    }
}
