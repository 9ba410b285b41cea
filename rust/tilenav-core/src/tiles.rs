//! Read-only tile input consumed by the grid builder.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::models::Region;

/// How a tile participates in walkability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileMode {
    /// Decorative; ignored by the builder.
    Normal,
    /// Flat walkable ground.
    Surface,
    /// Ramp or stair bridging one elevation step.
    Transitional,
    /// Blocks walkability of tiles beneath it at the same elevation.
    Collidable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub elevation: i32,
    pub mode: TileMode,
    /// Marks the elevation group directly beneath as unpathable.
    #[serde(default)]
    pub grounded: bool,
    /// Layer sorting value; orders tiles within one elevation only.
    #[serde(default)]
    pub sort_key: i32,
}

impl TileRecord {
    pub const fn new(elevation: i32, mode: TileMode) -> Self {
        Self { elevation, mode, grounded: false, sort_key: 0 }
    }

    pub const fn grounded(mut self) -> Self {
        self.grounded = true;
        self
    }

    pub const fn sorted(mut self, sort_key: i32) -> Self {
        self.sort_key = sort_key;
        self
    }
}

/// Per-cell tile stack lookup. Must be side-effect free.
pub trait TileSource {
    /// Tiles occupying column (x, y), in any order. Empty when the cell has none.
    fn tile_stack(&self, x: i32, y: i32) -> Vec<TileRecord>;
}

impl<T: TileSource + ?Sized> TileSource for &T {
    fn tile_stack(&self, x: i32, y: i32) -> Vec<TileRecord> {
        (**self).tile_stack(x, y)
    }
}

/// In-memory tile source keyed by cell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TileMapFile", into = "TileMapFile")]
pub struct TileMap {
    cells: FxHashMap<(i32, i32), Vec<TileRecord>>,
    bounds: Option<Region>,
}

impl TileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: i32, y: i32, tile: TileRecord) {
        self.cells.entry((x, y)).or_default().push(tile);
        let cell = Region::new(x, y, x, y);
        self.bounds = Some(match self.bounds {
            Some(b) => b.union(cell),
            None => cell,
        });
    }

    pub fn with(mut self, x: i32, y: i32, tile: TileRecord) -> Self {
        self.push(x, y, tile);
        self
    }

    /// Region spanning every populated cell, or `None` for an empty map.
    pub fn bounds(&self) -> Option<Region> {
        self.bounds
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn tile_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }
}

impl TileSource for TileMap {
    fn tile_stack(&self, x: i32, y: i32) -> Vec<TileRecord> {
        self.cells.get(&(x, y)).cloned().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct TileMapFile {
    #[serde(default)]
    cells: Vec<CellTiles>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CellTiles {
    x: i32,
    y: i32,
    tiles: Vec<TileRecord>,
}

impl From<TileMapFile> for TileMap {
    fn from(file: TileMapFile) -> Self {
        let mut map = TileMap::new();
        for cell in file.cells {
            for tile in cell.tiles {
                map.push(cell.x, cell.y, tile);
            }
        }
        map
    }
}

impl From<TileMap> for TileMapFile {
    fn from(map: TileMap) -> Self {
        let mut cells: Vec<CellTiles> = map
            .cells
            .into_iter()
            .map(|((x, y), tiles)| CellTiles { x, y, tiles })
            .collect();
        // Deterministic output order
        cells.sort_by_key(|c| (c.x, c.y));
        TileMapFile { cells }
    }
}
