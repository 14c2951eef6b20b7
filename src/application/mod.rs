//! Application services (use cases).
//!
//! These services run the scheduling stages against the domain model and
//! reach the solver only through the outbound port.

pub mod diagnostics;
pub mod extract;
pub mod generator;
pub mod model;
pub mod pipeline;
pub mod repair;
pub mod validate;

pub use diagnostics::Diagnostics;
pub use generator::{MatchupGenerator, MatchupSet};
pub use model::{ModelBuilder, ModelStats, ScheduleModel};
pub use pipeline::{FinalSchedule, ScheduledGame, SeasonPipeline, SolveSummary};
pub use repair::{RepairPass, RepairReport};
pub use validate::{validate_bounds, validate_structure, ProtectedSnapshot, StructuralDefect};
