use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tilenav_core::TileMap;

pub fn load_tile_map(path: &Path) -> Result<TileMap> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read {:?}", path))?;
    let map: TileMap = serde_json::from_str(&raw).with_context(|| format!("failed to parse tile map {:?}", path))?;
    Ok(map)
}
