//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! scheduling logic.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`bootstrap`] - Composition root wiring config to the pipeline

pub mod bootstrap;
pub mod config;
