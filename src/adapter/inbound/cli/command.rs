//! Command-line interface definitions.
//!
//! Defines the CLI structure for matchweek using `clap`. Every scheduling
//! command reads a league file and, optionally, a protected schedule file;
//! engine settings come from the TOML configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG: &str = "matchweek.toml";

/// Season schedule generation and slot assignment
#[derive(Parser, Debug)]
#[command(name = "matchweek")]
#[command(version)]
pub struct Cli {
    /// Configuration file [default: matchweek.toml if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the season's matchups without assigning slots
    Generate(GenerateArgs),

    /// Assign every matchup to a slot and repair repeats
    Schedule(ScheduleArgs),

    /// Run the feasibility pre-checks without solving
    Diagnose(DiagnoseArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `matchweek config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a documented configuration template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate the configuration file.
    Validate,
}

/// League input shared by the scheduling commands.
#[derive(Args, Debug)]
pub struct LeagueArgs {
    /// League file (JSON participant list)
    #[arg(short, long)]
    pub league: PathBuf,

    /// Override the configured rotation season
    #[arg(short, long)]
    pub season: Option<u32>,
}

/// Arguments for `generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub league: LeagueArgs,

    /// Write the matchup list as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `schedule`.
#[derive(Args, Debug)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub league: LeagueArgs,

    /// Protected schedule file (JSON, keyed by slot)
    #[arg(short, long)]
    pub protected: Option<PathBuf>,

    /// Write the final schedule as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `diagnose`.
#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    #[command(flatten)]
    pub league: LeagueArgs,

    /// Protected schedule file (JSON, keyed by slot)
    #[arg(short, long)]
    pub protected: Option<PathBuf>,
}

/// Arguments for `config init`.
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the template
    #[arg(default_value = DEFAULT_CONFIG)]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_schedule_with_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "matchweek",
            "schedule",
            "--league",
            "league.json",
            "--protected",
            "fixed.json",
            "--season",
            "2",
            "--json",
            "-vv",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Schedule(args) => {
                assert_eq!(args.league.season, Some(2));
                assert_eq!(args.protected, Some(PathBuf::from("fixed.json")));
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn league_is_required() {
        assert!(Cli::try_parse_from(["matchweek", "generate"]).is_err());
    }

    #[test]
    fn config_init_defaults_path() {
        let cli = Cli::try_parse_from(["matchweek", "config", "init"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommand::Init(args)) => {
                assert_eq!(args.path, PathBuf::from(DEFAULT_CONFIG));
                assert!(!args.force);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
