mod support;

use matchweek::domain::ByeWindow;
use matchweek::error::{ConfigError, Error};
use matchweek::infrastructure::config::settings::Config;
use matchweek::testkit::config;

#[test]
fn loads_small_season_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = support::files::write(dir.path(), "matchweek.toml", &config::double_round_robin_toml(6));

    let loaded = Config::load(&path).unwrap();

    assert_eq!(loaded.season.games_per_participant, 6);
    assert_eq!(loaded.constraints.slots, 6);
    assert_eq!(loaded.constraints.max_per_slot, 2);
    assert!(!loaded.season.same_rank_games);
    assert_eq!(loaded.logging.level, "warn");
}

#[test]
fn optional_bounds_left_out_of_a_section_are_unset() {
    let loaded = Config::parse_toml(&config::double_round_robin_toml(6)).unwrap();

    assert_eq!(loaded.constraints.bye_window, None);
    assert_eq!(loaded.constraints.max_byes_per_participant, None);
    assert_eq!(loaded.constraints.max_absent_per_slot, None);
    assert_eq!(loaded.constraints, config::double_round_robin(6).constraints);
}

#[test]
fn missing_section_keeps_full_league_defaults() {
    let loaded = Config::parse_toml("[repair]\nmax_iterations = 10\n").unwrap();

    assert_eq!(loaded.repair.max_iterations, 10);
    assert_eq!(loaded.constraints.bye_window, Some(ByeWindow { start: 5, end: 14 }));
    assert_eq!(loaded.constraints.max_absent_per_slot, Some(6));
}

#[test]
fn config_rejects_more_games_than_slots() {
    let result = Config::parse_toml(
        r#"
[season]
games_per_participant = 10

[constraints]
slots = 8
"#,
    );

    match result {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "games_per_participant",
            ..
        })) => {}
        Err(err) => panic!("Expected games_per_participant error, got {err}"),
        Ok(_) => panic!("Expected games_per_participant error, got Ok"),
    }
}

#[test]
fn config_rejects_bye_window_past_season_end() {
    let result = Config::parse_toml(
        r#"
[constraints]
slots = 10
bye_window = { start = 4, end = 12 }
"#,
    );
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "bye_window",
            ..
        }))
    ));
}

#[test]
fn config_rejects_zero_repair_iterations() {
    let result = Config::parse_toml("[repair]\nmax_iterations = 0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_iterations",
            ..
        }))
    ));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}
