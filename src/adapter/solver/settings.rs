//! Backend options for the HiGHS solver.

use serde::{Deserialize, Serialize};

/// Options forwarded to HiGHS.
///
/// The engine defines no timeout of its own; `time_limit_secs` is how a
/// caller bounds the blocking solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Worker threads; one keeps runs reproducible.
    pub threads: Option<u32>,
    /// Random seed for reproducible branching.
    pub random_seed: Option<i32>,
    /// Wall-clock limit for a single solve.
    pub time_limit_secs: Option<f64>,
    /// Relative MIP gap at which the search stops.
    pub mip_rel_gap: Option<f64>,
    /// Let HiGHS print its own log to stdout.
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            threads: Some(1),
            random_seed: Some(1234),
            time_limit_secs: None,
            mip_rel_gap: None,
            verbose: false,
        }
    }
}
