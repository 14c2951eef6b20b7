use clap::Parser;
use tracing::debug;

use matchweek::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand, LeagueArgs};
use matchweek::adapter::inbound::cli::output::{self, OutputConfig};
use matchweek::adapter::inbound::cli::{config, diagnose, generate, schedule};
use matchweek::error::Result;
use matchweek::infrastructure::config::logging::LoggingConfig;
use matchweek::infrastructure::config::settings::Config;

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if let Err(e) = run(cli) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Config(ConfigCommand::Init(args)) => {
            init_logging(LoggingConfig::default(), &cli);
            return config::execute_init(&args.path, args.force);
        }
        Commands::Config(ConfigCommand::Validate) => {
            init_logging(LoggingConfig::default(), &cli);
            return config::execute_validate(cli.config.as_deref());
        }
        _ => {}
    }

    let (mut settings, source) = config::resolve(cli.config.as_deref())?;
    init_logging(settings.logging.clone(), &cli);
    debug!(
        source = ?source,
        season = settings.season.season,
        slots = settings.constraints.slots,
        "Configuration loaded"
    );

    match &cli.command {
        Commands::Generate(args) => {
            apply_season(&mut settings, &args.league);
            generate::execute(&settings, &args.league.league, args.output.as_deref())
        }
        Commands::Schedule(args) => {
            apply_season(&mut settings, &args.league);
            schedule::execute(
                &settings,
                &args.league.league,
                args.protected.as_deref(),
                args.output.as_deref(),
            )
        }
        Commands::Diagnose(args) => {
            apply_season(&mut settings, &args.league);
            diagnose::execute(&settings, &args.league.league, args.protected.as_deref())
        }
        Commands::Config(ConfigCommand::Show) => config::execute_show(&settings, source.as_deref()),
        Commands::Config(ConfigCommand::Init(_) | ConfigCommand::Validate) => Ok(()),
    }
}

/// `-v` raises the configured level, `--quiet` lowers it to warnings.
fn init_logging(logging: LoggingConfig, cli: &Cli) {
    let logging = match (cli.quiet, cli.verbose) {
        (true, _) => logging.with_level("warn"),
        (false, 0) => logging,
        (false, 1) => logging.with_level("debug"),
        (false, _) => logging.with_level("trace"),
    };
    logging.init();
}

fn apply_season(settings: &mut Config, args: &LeagueArgs) {
    if let Some(season) = args.season {
        settings.season.season = season;
    }
}
