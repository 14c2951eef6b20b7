//! Canonical test configurations.
//!
//! Single source of truth for small seasons used across tests.

use crate::domain::{ConstraintConfig, RepairConfig, SeasonFormat};
use crate::infrastructure::config::settings::Config;

/// Format where every participant plays `games` games, no rotations.
pub fn round_robin_format(games: u32) -> SeasonFormat {
    SeasonFormat {
        games_per_participant: games,
        intra_category_rotation: false,
        cross_category_rotation: false,
        same_rank_games: false,
        ..SeasonFormat::default()
    }
}

/// Unbounded constraints over `slots` with `max_per_slot` games each.
pub fn open_constraints(slots: u32, max_per_slot: u32) -> ConstraintConfig {
    ConstraintConfig {
        slots,
        max_per_slot,
        bye_window: None,
        max_byes_per_participant: None,
        max_absent_per_slot: None,
        enforce_adjacency_in_model: false,
        max_cross_category_per_slot: None,
    }
}

/// Four participants, double round robin over `slots` slots, two games a slot.
pub fn double_round_robin(slots: u32) -> Config {
    Config {
        season: round_robin_format(6),
        constraints: open_constraints(slots, 2),
        repair: RepairConfig::default(),
        ..Config::default()
    }
}

/// [`double_round_robin`] as a TOML document.
pub fn double_round_robin_toml(slots: u32) -> String {
    format!(
        r#"
[logging]
level = "warn"

[season]
games_per_participant = 6
intra_category_rotation = false
cross_category_rotation = false
same_rank_games = false

[constraints]
slots = {slots}
max_per_slot = 2
enforce_adjacency_in_model = false
"#
    )
}
