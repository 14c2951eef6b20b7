//! CLI module graph.

pub mod command;
pub mod config;
pub mod diagnose;
pub mod generate;
pub mod output;
pub mod schedule;
