//! Elevation-aware navigation graphs for layered tile worlds.
//!
//! A [`GridBuilder`] scans a rectangular region of a [`TileSource`] and
//! produces a [`Grid`] of walkable nodes wired under the elevation-transition
//! rules. A [`Pathfinder`] answers range and point-to-point queries over it.

pub mod builder;
pub mod cost;
pub mod errors;
pub mod grid;
pub mod models;
pub mod node;
pub mod options;
pub mod pathfinder;
pub mod tiles;

pub use builder::{pathable_groups, BuildProgress, GridBuilder};
pub use cost::{CostModel, MovementCost, MovementType};
pub use errors::GridError;
pub use grid::{Grid, GridStats};
pub use models::{NodeReport, PathReport, Position, RangeReport, Region};
pub use node::{EntityId, Node, NodeId, OccupantRegistry, PathType};
pub use options::{BuildOptions, SearchOptions};
pub use pathfinder::{Path, PathOutcome, Pathfinder, Reachable};
pub use tiles::{TileMap, TileMode, TileRecord, TileSource};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
