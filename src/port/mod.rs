//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture. They are
//! traits that adapters implement to integrate with external systems.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  generator → model →    │
//!                    │  extract → repair       │
//!                    └────────────┬────────────┘
//!                                 │
//!                                 ▼
//!                          ┌─────────────┐
//!                          │   Solver    │
//!                          │   Adapter   │
//!                          └─────────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`outbound::solver::Solver`] - Mixed-integer optimization backend

pub mod outbound;
