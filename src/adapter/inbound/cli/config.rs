//! Handler for the `config` command group and configuration lookup.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::command::DEFAULT_CONFIG;
use crate::adapter::inbound::cli::output;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;

/// Documented configuration template.
const CONFIG_TEMPLATE: &str = include_str!("../../../../matchweek.toml.example");

/// Resolve the configuration for a command.
///
/// An explicit path must exist. Without one, `matchweek.toml` in the working
/// directory is used when present and built-in defaults otherwise.
pub fn resolve(path: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    if let Some(path) = path {
        return Ok((Config::load(path)?, Some(path.to_path_buf())));
    }
    let fallback = PathBuf::from(DEFAULT_CONFIG);
    if fallback.is_file() {
        return Ok((Config::load(&fallback)?, Some(fallback)));
    }
    debug!("No configuration file; using defaults");
    Ok((Config::default(), None))
}

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, CONFIG_TEMPLATE)?;

    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} for your league", path.display()));
    output::note(&format!(
        "2. Run: matchweek -c {} diagnose --league league.json",
        path.display()
    ));
    output::note(&format!(
        "3. Run: matchweek -c {} schedule --league league.json",
        path.display()
    ));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(config: &Config, source: Option<&Path>) -> Result<()> {
    if output::is_json() {
        output::json_output(&serde_json::json!({
            "command": "config.show",
            "source": source.map(|p| p.display().to_string()),
            "config": config,
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field(
        "Source",
        source.map_or_else(|| output::muted("(defaults)"), |p| p.display().to_string()),
    );

    output::section("Season");
    output::field("Rotation", config.season.season);
    output::field("Games each", config.season.games_per_participant);
    output::field("Group rounds", config.season.intra_group_rounds);
    output::field("Category rotation", config.season.intra_category_rotation);
    output::field("Cross rotation", config.season.cross_category_rotation);
    output::field("Same-rank games", config.season.same_rank_games);

    let constraints = &config.constraints;
    output::section("Constraints");
    output::field("Slots", constraints.slots);
    output::field("Max per slot", constraints.max_per_slot);
    output::field(
        "Bye window",
        constraints
            .bye_window
            .map_or_else(|| "none".to_string(), |w| format!("{}-{}", w.start, w.end)),
    );
    output::field("Max byes", optional(constraints.max_byes_per_participant));
    output::field("Max absent", optional(constraints.max_absent_per_slot));
    output::field(
        "Max cross-category",
        optional(constraints.max_cross_category_per_slot),
    );
    output::field("Adjacency in model", constraints.enforce_adjacency_in_model);

    output::section("Repair");
    output::field("Max iterations", config.repair.max_iterations);

    output::section("Solver");
    output::field("Threads", optional(config.solver.threads));
    output::field("Random seed", optional(config.solver.random_seed));
    output::field("Time limit (s)", optional(config.solver.time_limit_secs));
    output::field("MIP gap", optional(config.solver.mip_rel_gap));

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: Option<&Path>) -> Result<()> {
    let (config, source) = resolve(path)?;

    if output::is_json() {
        output::json_output(&serde_json::json!({
            "command": "config.validate",
            "valid": true,
            "source": source.as_ref().map(|p| p.display().to_string()),
        }));
        return Ok(());
    }

    match source {
        Some(path) => output::success(&format!("{} is valid", path.display())),
        None => {
            output::success("Built-in defaults are valid");
            output::hint("create a file with `matchweek config init`");
        }
    }
    output::field("Slots", config.constraints.slots);
    output::field("Games each", config.season.games_per_participant);
    Ok(())
}

fn optional(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "unset".to_string(), |v| v.to_string())
}
