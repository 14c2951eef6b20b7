//! Outbound adapters (driven side): file formats for leagues and results.

pub mod file;
