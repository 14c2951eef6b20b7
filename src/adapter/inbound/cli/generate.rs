//! Handler for `matchweek generate`.

use std::path::Path;

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::file;
use crate::application::MatchupGenerator;
use crate::domain::{League, Matchup};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Participant")]
    participant: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Games")]
    games: u32,
    #[tabled(rename = "Home")]
    home: u32,
}

#[derive(Serialize)]
struct MatchupDocument<'a> {
    command: &'static str,
    season: u32,
    games_per_participant: u32,
    matchups: &'a [Matchup],
}

/// Execute `generate`.
pub fn execute(config: &Config, league_path: &Path, output_path: Option<&Path>) -> Result<()> {
    let league = file::load_league(league_path)?;
    let set = MatchupGenerator::new(&league, &config.season).generate()?;

    let document = MatchupDocument {
        command: "generate",
        season: config.season.season,
        games_per_participant: config.season.games_per_participant,
        matchups: set.matchups(),
    };
    if let Some(path) = output_path {
        file::write_json(path, &document)?;
    }

    if output::is_json() {
        output::json_output(&document);
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Matchups");
    output::field("Season", config.season.season);
    output::field("Participants", league.len());
    output::field("Matchups", set.len());
    output::field("Games each", config.season.games_per_participant);

    if output::verbosity() > 0 {
        output::section("Per participant");
        output::lines(&Table::new(count_rows(&league, set.matchups())).to_string());
    }

    if let Some(path) = output_path {
        output::success(&format!("Wrote {}", path.display()));
    } else {
        output::hint("pass --output to save the matchup list");
    }
    Ok(())
}

fn count_rows(league: &League, matchups: &[Matchup]) -> Vec<CountRow> {
    league
        .participants()
        .iter()
        .map(|p| CountRow {
            participant: p.id.to_string(),
            group: p.group.to_string(),
            games: matchups.iter().filter(|m| m.involves(&p.id)).count() as u32,
            home: matchups.iter().filter(|m| m.host == p.id).count() as u32,
        })
        .collect()
}
