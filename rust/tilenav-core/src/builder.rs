//! Grid construction from a tile source.
//!
//! Building is two passes. The scan pass visits every cell of the region,
//! derives which elevation groups are pathable and creates their nodes. It
//! can be driven a slice at a time so a host loop stays responsive; slices
//! always end between cells. The adjacency pass runs once, after the scan
//! has covered the whole region.

use std::cmp::Reverse;
use std::time::{Duration, Instant};

use itertools::Itertools;
use tracing::debug;

use crate::errors::GridError;
use crate::grid::Grid;
use crate::models::{Position, Region};
use crate::node::{NodeId, PathType};
use crate::options::BuildOptions;
use crate::tiles::{TileMode, TileRecord, TileSource};

/// Planar 4-neighbourhood. No diagonals.
pub const QUADRILATERAL: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildProgress {
    pub cells_scanned: u64,
    pub cells_total: u64,
    pub nodes: usize,
}

impl BuildProgress {
    pub fn is_scanned(&self) -> bool {
        self.cells_scanned >= self.cells_total
    }
}

/// Outcome of evaluating the tiles of one elevation group, top to bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct GroupVerdict {
    pathable: bool,
    collidable: bool,
    transitional: bool,
    grounded: bool,
}

impl GroupVerdict {
    fn evaluate<'t>(tiles: impl IntoIterator<Item = &'t TileRecord>) -> Self {
        let mut v = GroupVerdict::default();
        for tile in tiles {
            match tile.mode {
                TileMode::Normal => {}
                TileMode::Surface | TileMode::Transitional => {
                    // Only tiles above any collidable in this group count
                    if !v.collidable {
                        v.pathable = true;
                        v.transitional |= tile.mode == TileMode::Transitional;
                    }
                }
                TileMode::Collidable => v.collidable = true,
            }
            v.grounded |= tile.grounded;
        }
        v
    }

    fn path_type(&self) -> PathType {
        if self.transitional { PathType::Transitional } else { PathType::Surface }
    }
}

/// Pathable elevation groups of one cell, highest first.
///
/// Tiles are visited by descending elevation, then descending sort key. A
/// grounded tile makes the next lower group unpathable; that group is
/// skipped outright, so its own grounded flags do not carry further down.
pub fn pathable_groups(stack: &[TileRecord]) -> Vec<(i32, PathType)> {
    let mut ordered: Vec<&TileRecord> = stack.iter().collect();
    // Stable: equal keys keep first-seen order
    ordered.sort_by_key(|t| (Reverse(t.elevation), Reverse(t.sort_key)));

    let mut out = Vec::new();
    let mut was_grounded = false;
    for (elevation, group) in &ordered.into_iter().group_by(|t| t.elevation) {
        if was_grounded {
            was_grounded = false;
            continue;
        }
        let verdict = GroupVerdict::evaluate(group);
        was_grounded = verdict.grounded;
        if verdict.pathable {
            out.push((elevation, verdict.path_type()));
        }
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Scanning { x: i32, y: i32 },
    Scanned,
    Finished,
}

/// Resumable grid build over a bounded region.
pub struct GridBuilder<S: TileSource> {
    source: S,
    region: Region,
    options: BuildOptions,
    grid: Grid,
    stage: Stage,
    cells_scanned: u64,
}

impl<S: TileSource> GridBuilder<S> {
    pub fn new(source: S, region: Region, options: BuildOptions) -> Result<Self, GridError> {
        if !region.is_valid() {
            return Err(GridError::InvalidRegion { region });
        }
        Ok(Self {
            source,
            region,
            options,
            grid: Grid::new(),
            stage: Stage::Scanning { x: region.min_x, y: region.min_y },
            cells_scanned: 0,
        })
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn progress(&self) -> BuildProgress {
        BuildProgress {
            cells_scanned: self.cells_scanned,
            cells_total: self.region.cell_count(),
            nodes: self.grid.len(),
        }
    }

    pub fn is_scanned(&self) -> bool {
        matches!(self.stage, Stage::Scanned)
    }

    /// Scan up to `max_cells` cells. Returns progress after the slice.
    pub fn advance(&mut self, max_cells: usize) -> Result<BuildProgress, GridError> {
        let mut done = 0usize;
        while done < max_cells && self.scan_next()? {
            done += 1;
        }
        let progress = self.progress();
        debug!(
            cells = done,
            scanned = progress.cells_scanned,
            total = progress.cells_total,
            nodes = progress.nodes,
            "build slice"
        );
        Ok(progress)
    }

    /// One slice of `cells_per_slice` cells.
    pub fn advance_slice(&mut self) -> Result<BuildProgress, GridError> {
        self.advance(self.options.cells_per_slice.max(1))
    }

    /// Scan cells until `budget` elapses or the region is covered. At least
    /// one cell is scanned per call while any remain.
    pub fn advance_for(&mut self, budget: Duration) -> Result<BuildProgress, GridError> {
        let started = Instant::now();
        let mut done = 0usize;
        while self.scan_next()? {
            done += 1;
            if started.elapsed() >= budget {
                break;
            }
        }
        let progress = self.progress();
        debug!(
            cells = done,
            elapsed_us = started.elapsed().as_micros() as u64,
            scanned = progress.cells_scanned,
            "timed build slice"
        );
        Ok(progress)
    }

    /// `advance_for` with the configured slice budget.
    pub fn advance_timed(&mut self) -> Result<BuildProgress, GridError> {
        self.advance_for(self.options.slice_budget())
    }

    /// Runs adjacency and hands over the grid. Fails if cells remain unscanned.
    pub fn finish(&mut self) -> Result<Grid, GridError> {
        match self.stage {
            Stage::Finished => Err(GridError::AlreadyFinished),
            Stage::Scanning { .. } => {
                let p = self.progress();
                Err(GridError::ConstructionIncomplete { remaining: p.cells_total - p.cells_scanned })
            }
            Stage::Scanned => {
                let mut grid = std::mem::take(&mut self.grid);
                let edges = form_connections(&mut grid, self.options.dedup_neighbours);
                self.stage = Stage::Finished;
                debug!(nodes = grid.len(), edges, columns = grid.stats().columns, "grid built");
                Ok(grid)
            }
        }
    }

    /// Blocking build: scan everything then form adjacency.
    pub fn run(mut self) -> Result<Grid, GridError> {
        while !self.is_scanned() {
            if matches!(self.stage, Stage::Finished) {
                return Err(GridError::AlreadyFinished);
            }
            self.advance_slice()?;
        }
        self.finish()
    }

    // Returns false once no cells remain. A cell's nodes are all created
    // before this returns.
    fn scan_next(&mut self) -> Result<bool, GridError> {
        let (x, y) = match self.stage {
            Stage::Scanning { x, y } => (x, y),
            Stage::Scanned => return Ok(false),
            Stage::Finished => return Err(GridError::AlreadyFinished),
        };

        let stack = self.source.tile_stack(x, y);
        if !stack.is_empty() {
            for (elevation, path_type) in pathable_groups(&stack) {
                self.grid.insert_node(Position::new(x, y, elevation), path_type)?;
            }
        }
        self.cells_scanned += 1;

        // x outer, y inner
        self.stage = if y < self.region.max_y {
            Stage::Scanning { x, y: y + 1 }
        } else if x < self.region.max_x {
            Stage::Scanning { x: x + 1, y: self.region.min_y }
        } else {
            Stage::Scanned
        };
        Ok(true)
    }
}

impl Grid {
    /// Build the grid for `region` in one call.
    pub fn build<S: TileSource>(source: S, region: Region, options: &BuildOptions) -> Result<Grid, GridError> {
        GridBuilder::new(source, region, options.clone())?.run()
    }
}

/// Destinations `node` connects to under the elevation-transition rules.
///
/// Surface: same elevation (any type), or one step up/down onto a
/// transitional node. Transitional: same elevation or one step up/down,
/// any type.
fn adjacent_to(grid: &Grid, id: NodeId) -> Vec<NodeId> {
    let node = grid.node(id);
    let pos = node.position();
    let mut out = Vec::with_capacity(4);
    for (dx, dy) in QUADRILATERAL {
        // Cells past the i32 edge have no node
        let Some(adj) = pos.offset(dx, dy, 0) else { continue };
        if let Some(n) = grid.node_id(adj) {
            out.push(n);
        }
        for de in [-1, 1] {
            let Some(n) = adj.offset(0, 0, de).and_then(|p| grid.node_id(p)) else { continue };
            let admitted = match node.path_type() {
                PathType::Surface => grid.node(n).path_type() == PathType::Transitional,
                PathType::Transitional => true,
            };
            if admitted {
                out.push(n);
            }
        }
    }
    out
}

/// Adjacency pass. Each node evaluates its own rule, so edges may be one-way.
fn form_connections(grid: &mut Grid, dedup: bool) -> usize {
    let mut edges = 0;
    for i in 0..grid.len() {
        let id = NodeId(i as u32);
        for to in adjacent_to(grid, id) {
            if grid.connect(id, to, dedup) {
                edges += 1;
            }
        }
    }
    edges
}
