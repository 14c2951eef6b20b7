//! Season format and scheduling rules.
//!
//! These are plain data; [`crate::infrastructure::config::settings::Config`]
//! loads them from TOML and validates ranges. Defaults describe a 32-team
//! league: two categories of four groups, 17 games over 18 slots with one bye
//! between slots 5 and 14.

use serde::{Deserialize, Serialize};

use super::slot::Slot;

/// Rotation rules for matchup generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonFormat {
    /// Rotation index; rotation tables are read at `season mod period`.
    pub season: u32,
    /// Games every participant must end up with.
    pub games_per_participant: u32,
    /// Meetings between each pair inside a group (host alternates).
    pub intra_group_rounds: u32,
    /// Play one other group of the same category in full.
    pub intra_category_rotation: bool,
    /// Play one group of the paired category in full.
    pub cross_category_rotation: bool,
    /// Play equal-rank participants of the remaining same-category groups.
    pub same_rank_games: bool,
}

impl Default for SeasonFormat {
    fn default() -> Self {
        Self {
            season: 0,
            games_per_participant: 17,
            intra_group_rounds: 2,
            intra_category_rotation: true,
            cross_category_rotation: true,
            same_rank_games: true,
        }
    }
}

/// Inclusive slot range in which byes may fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByeWindow {
    /// First slot of the window.
    pub start: u32,
    /// Last slot of the window.
    pub end: u32,
}

impl ByeWindow {
    /// Whether the slot is inside the window.
    #[must_use]
    pub fn contains(&self, slot: Slot) -> bool {
        (self.start..=self.end).contains(&slot.get())
    }
}

/// Structural bounds the model builder turns into constraints.
///
/// When the section is present, optional bounds left out of it are unset
/// rather than taking the 32-team defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintConfig {
    /// Number of slots in the season.
    pub slots: u32,
    /// Maximum games in one slot.
    pub max_per_slot: u32,
    /// Slots in which byes are allowed; outside it everyone plays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bye_window: Option<ByeWindow>,
    /// Maximum byes per participant inside the window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_byes_per_participant: Option<u32>,
    /// Maximum idle participants in one slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_absent_per_slot: Option<u32>,
    /// Forbid reverse pairs in consecutive slots inside the model instead of
    /// leaving it to the repair pass.
    pub enforce_adjacency_in_model: bool,
    /// Maximum cross-category games in one slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cross_category_per_slot: Option<u32>,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            slots: 18,
            max_per_slot: 16,
            bye_window: Some(ByeWindow { start: 5, end: 14 }),
            max_byes_per_participant: Some(1),
            max_absent_per_slot: Some(6),
            enforce_adjacency_in_model: false,
            max_cross_category_per_slot: None,
        }
    }
}

impl ConstraintConfig {
    /// Games an open slot must hold so that no more than
    /// `max_absent_per_slot` of `participants` sit out.
    #[must_use]
    pub fn min_load(&self, participants: usize) -> usize {
        match self.max_absent_per_slot {
            Some(max_absent) if participants > max_absent as usize => {
                (participants - max_absent as usize).div_ceil(2)
            }
            _ => 0,
        }
    }
}

/// Repair pass settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Upper bound on repair iterations; each iteration handles one repeat.
    pub max_iterations: u32,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
        }
    }
}
