//! JSON files for leagues, protected schedules and results.
//!
//! League file:
//!
//! ```json
//! { "participants": [ { "id": "BUF", "group": "East", "category": "AC", "rank": 1 } ] }
//! ```
//!
//! Protected schedule file; unknown game fields are display metadata and are
//! ignored:
//!
//! ```json
//! { "slots": { "1": [ { "host": "BUF", "visitor": "MIA", "kickoff": "20:15" } ] } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{League, Matchup, Participant, ParticipantId, ProtectedSchedule, Slot};
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct LeagueFile {
    participants: Vec<Participant>,
}

#[derive(Debug, Deserialize)]
struct ProtectedFile {
    #[serde(default)]
    slots: BTreeMap<Slot, Vec<ProtectedGame>>,
}

#[derive(Debug, Deserialize)]
struct ProtectedGame {
    host: ParticipantId,
    visitor: ParticipantId,
}

/// Parse and validate a league document.
pub fn parse_league(content: &str) -> Result<League> {
    let file: LeagueFile = serde_json::from_str(content)?;
    Ok(League::try_new(file.participants)?)
}

/// Read a league file.
pub fn load_league(path: impl AsRef<Path>) -> Result<League> {
    let path = path.as_ref();
    let league = parse_league(&fs::read_to_string(path)?)?;
    debug!(path = %path.display(), participants = league.len(), "League loaded");
    Ok(league)
}

/// Parse a protected schedule document.
pub fn parse_protected(content: &str) -> Result<ProtectedSchedule> {
    let file: ProtectedFile = serde_json::from_str(content)?;
    let slots = file
        .slots
        .into_iter()
        .map(|(slot, games)| {
            let games = games
                .into_iter()
                .map(|g| Matchup::new(g.host, g.visitor))
                .collect();
            (slot, games)
        })
        .collect();
    Ok(ProtectedSchedule::try_new(slots)?)
}

/// Read a protected schedule file, or an empty schedule when `path` is `None`.
pub fn load_protected(path: Option<&Path>) -> Result<ProtectedSchedule> {
    let Some(path) = path else {
        return Ok(ProtectedSchedule::empty());
    };
    let protected = parse_protected(&fs::read_to_string(path)?)?;
    debug!(path = %path.display(), games = protected.len(), "Protected schedule loaded");
    Ok(protected)
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path.as_ref(), content)?;
    Ok(())
}
