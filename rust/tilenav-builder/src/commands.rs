use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use tilenav_core::{
    BuildOptions, CostModel, Grid, GridBuilder, GridStats, MovementType, NodeReport, PathReport, Pathfinder,
    Position, RangeReport, Region, SearchOptions, TileMap,
};

use crate::load::load_tile_map;

#[derive(Parser, Debug)]
#[command(
    name = "tilenav-builder",
    version,
    about = "Build a navigation grid from a JSON tile map and query it"
)]
pub struct Cli {
    /// Path to the tile map JSON
    #[arg(long = "map", value_name = "PATH")]
    pub map: PathBuf,

    /// Scan region as min_x,min_y,max_x,max_y (defaults to the map bounds)
    #[arg(long = "region", value_name = "RECT")]
    pub region: Option<Region>,

    /// Optional cost model JSON ({"surface_step":1,"transitional_step":1})
    #[arg(long = "costs", value_name = "PATH")]
    pub costs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build and print node/edge counts
    Stats,
    /// Build and print every node with its neighbours
    Dump,
    /// Nodes reachable from a position within a cost budget
    Range {
        #[arg(long = "from", value_name = "X,Y,E")]
        from: Position,
        #[arg(long = "budget")]
        budget: u32,
    },
    /// Lowest-cost path between two positions
    Path {
        #[arg(long = "from", value_name = "X,Y,E")]
        from: Position,
        #[arg(long = "to", value_name = "X,Y,E")]
        to: Position,
        #[arg(long = "max-expansions")]
        max_expansions: Option<u64>,
    },
}

#[derive(Serialize)]
struct StatsReport {
    region: Option<Region>,
    tiles: usize,
    #[serde(flatten)]
    stats: GridStats,
}

/// Drive a sliced build to completion, logging each slice the way a host
/// frame loop would observe it.
pub fn build_grid(map: &TileMap, region: Region, options: &BuildOptions) -> Result<Grid> {
    let mut builder = GridBuilder::new(map, region, options.clone())?;
    let mut slices = 0u32;
    while !builder.is_scanned() {
        let progress = builder.advance_slice()?;
        slices += 1;
        info!(
            slice = slices,
            scanned = progress.cells_scanned,
            total = progress.cells_total,
            nodes = progress.nodes,
            "scan progress"
        );
    }
    Ok(builder.finish()?)
}

fn load_costs(path: Option<&PathBuf>) -> Result<CostModel> {
    match path {
        Some(p) => {
            let raw = std::fs::read_to_string(p).with_context(|| format!("failed to read {:?}", p))?;
            serde_json::from_str(&raw).with_context(|| format!("failed to parse cost model {:?}", p))
        }
        None => Ok(CostModel::default()),
    }
}

pub fn execute(cli: &Cli, options: &BuildOptions) -> Result<Value> {
    let map = load_tile_map(&cli.map)?;
    let region = cli.region.or_else(|| map.bounds());

    let grid = match region {
        Some(r) => build_grid(&map, r, options)?,
        None => Grid::new(),
    };
    info!(nodes = grid.len(), "grid ready");

    let out = match &cli.command {
        Command::Stats => serde_json::to_value(StatsReport { region, tiles: map.tile_count(), stats: grid.stats() })?,
        Command::Dump => {
            let nodes: Vec<NodeReport> = grid.nodes().map(|n| NodeReport::from_grid(&grid, n.id())).collect();
            serde_json::to_value(nodes)?
        }
        Command::Range { from, budget } => {
            let costs = load_costs(cli.costs.as_ref())?;
            let pf = Pathfinder::new(&grid, costs);
            let reach = pf.range(*from, *budget, MovementType::Grounded);
            serde_json::to_value(RangeReport::from_reachable(&grid, &reach))?
        }
        Command::Path { from, to, max_expansions } => {
            let costs = load_costs(cli.costs.as_ref())?;
            let mut search = SearchOptions::default();
            if let Some(n) = max_expansions {
                search.max_expansions = *n;
            }
            let pf = Pathfinder::new(&grid, costs).with_options(search);
            let path = pf.path(*from, *to, MovementType::Grounded);
            serde_json::to_value(PathReport::from_path(&grid, &path))?
        }
    };
    Ok(out)
}
