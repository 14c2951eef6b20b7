use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::{DiagnosticsReport, ParticipantCount, Slot};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Matchup generation errors. All of them abort the pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{} participant(s) short of the required game count", shortfalls.len())]
    Shortfall { shortfalls: Vec<ParticipantCount> },

    #[error("{} participant(s) over the required game count", overflows.len())]
    Overflow { overflows: Vec<ParticipantCount> },

    #[error("league cannot be scheduled with this format: {0}")]
    InvalidLeague(String),

    #[error("generated matchup set is inconsistent: {0}")]
    Inconsistent(String),
}

/// Scheduling failures after generation.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("no schedule satisfies the constraints ({} diagnostic issue(s))", report.issues.len())]
    Infeasible { report: Box<DiagnosticsReport> },

    #[error("model is unbounded; a variable is missing its bounds")]
    Unbounded { report: Box<DiagnosticsReport> },

    #[error("solver failed: {message}")]
    Solver {
        message: String,
        report: Box<DiagnosticsReport>,
    },

    #[error("protected slot {slot} changed during repair: {detail}")]
    ProtectedScheduleViolation { slot: Slot, detail: String },

    #[error("solution is invalid: {0}")]
    InvalidSolution(String),
}

impl ScheduleError {
    /// Diagnostics attached to solver-stage failures.
    #[must_use]
    pub fn report(&self) -> Option<&DiagnosticsReport> {
        match self {
            Self::Infeasible { report } | Self::Unbounded { report } | Self::Solver { report, .. } => {
                Some(report.as_ref())
            }
            Self::ProtectedScheduleViolation { .. } | Self::InvalidSolution(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
