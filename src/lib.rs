//! Matchweek - season schedule generation, slot assignment and repair.
//!
//! Given a league of participants organised into groups and categories, the
//! crate produces the season's matchups from fixed rotation rules, assigns
//! each one to a slot with a binary integer program around any protected
//! slots, and then moves back-to-back repeats of the same pair apart.
//!
//! # Architecture
//!
//! - **`domain`** - Participants, matchups, slots, rules and reports
//! - **`application`** - Generator, model builder, extraction, repair,
//!   validation, diagnostics and the pipeline that chains them
//! - **`port`** - The [`port::outbound::solver::Solver`] trait
//! - **`adapter`** - HiGHS backend via good_lp, JSON files and the CLI
//! - **`infrastructure`** - TOML configuration, logging and wiring
//!
//! # Features
//!
//! - `testkit` - League fixtures and a scripted solver for tests
//!
//! # Example
//!
//! ```no_run
//! use matchweek::adapter::outbound::file;
//! use matchweek::infrastructure::bootstrap::build_pipeline;
//! use matchweek::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("matchweek.toml")?;
//!     let league = file::load_league("league.json")?;
//!     let protected = file::load_protected(None)?;
//!
//!     let schedule = build_pipeline(&config).run(&league, &protected)?;
//!     println!("{} games, {} repeats left", schedule.games.len(), schedule.defects.len());
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
