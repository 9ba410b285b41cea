use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CELLS_PER_SLICE: usize = 256;
pub const DEFAULT_SLICE_BUDGET_MS: u64 = 100;
pub const DEFAULT_MAX_EXPANSIONS: u64 = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Cells scanned per `advance_slice` call.
    pub cells_per_slice: usize,
    /// Wall-clock budget for `advance_timed`.
    pub slice_budget_ms: u64,
    /// Drop repeated neighbour destinations when both endpoints' rules fire.
    pub dedup_neighbours: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            cells_per_slice: DEFAULT_CELLS_PER_SLICE,
            slice_budget_ms: DEFAULT_SLICE_BUDGET_MS,
            dedup_neighbours: true,
        }
    }
}

impl BuildOptions {
    pub fn slice_budget(&self) -> Duration {
        Duration::from_millis(self.slice_budget_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Path queries give up after popping this many frontier entries.
    pub max_expansions: u64,
    /// Stop a path query as soon as the destination is popped.
    pub stop_at_goal: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { max_expansions: DEFAULT_MAX_EXPANSIONS, stop_at_goal: true }
    }
}
