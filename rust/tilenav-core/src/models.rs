use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseCoordsError;
use crate::grid::Grid;
use crate::node::{NodeId, PathType};
use crate::pathfinder::{Path, PathOutcome, Reachable};

/// A graph key: planar cell plus elevation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub elevation: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, elevation: i32) -> Self {
        Self { x, y, elevation }
    }

    /// `None` when any component would leave the i32 range.
    pub fn offset(self, dx: i32, dy: i32, de: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            elevation: self.elevation.checked_add(de)?,
        })
    }

    pub const fn column(self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Manhattan distance on the (x, y) projection; elevation is ignored.
    pub fn planar_distance(self, other: Position) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.elevation)
    }
}

impl FromStr for Position {
    type Err = ParseCoordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [x, y, elevation] = parse_ints::<3>(s)?;
        Ok(Position { x, y, elevation })
    }
}

/// Inclusive rectangle of cells scanned by a build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Region {
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn width(&self) -> u64 {
        if self.min_x > self.max_x { 0 } else { (self.max_x as i64 - self.min_x as i64 + 1) as u64 }
    }

    pub fn height(&self) -> u64 {
        if self.min_y > self.max_y { 0 } else { (self.max_y as i64 - self.min_y as i64 + 1) as u64 }
    }

    pub fn cell_count(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }

    /// Smallest region covering both.
    pub fn union(self, other: Region) -> Region {
        Region {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

impl FromStr for Region {
    type Err = ParseCoordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [min_x, min_y, max_x, max_y] = parse_ints::<4>(s)?;
        Ok(Region { min_x, min_y, max_x, max_y })
    }
}

fn parse_ints<const N: usize>(s: &str) -> Result<[i32; N], ParseCoordsError> {
    let mut out = [0i32; N];
    let mut parts = s.split(',');
    for slot in out.iter_mut() {
        let part = parts.next().ok_or(ParseCoordsError::Arity { expected: N })?;
        *slot = part
            .trim()
            .parse::<i32>()
            .map_err(|_| ParseCoordsError::NotAnInteger(part.trim().to_string()))?;
    }
    if parts.next().is_some() {
        return Err(ParseCoordsError::Arity { expected: N });
    }
    Ok(out)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeReport {
    pub position: Position,
    pub path_type: PathType,
    pub neighbours: Vec<Position>,
}

impl NodeReport {
    pub fn from_grid(grid: &Grid, id: NodeId) -> Self {
        let node = grid.node(id);
        NodeReport {
            position: node.position(),
            path_type: node.path_type(),
            neighbours: node.neighbours().iter().map(|&n| grid.node(n).position()).collect(),
        }
    }
}

/// Serializable path query output, origin first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathReport {
    pub outcome: PathOutcome,
    pub path: Vec<Position>,
    pub cost: u32,
    pub expanded: u64,
}

impl PathReport {
    pub fn from_path(grid: &Grid, path: &Path) -> Self {
        let mut positions: Vec<Position> = path.nodes().iter().map(|&n| grid.node(n).position()).collect();
        positions.reverse();
        PathReport { outcome: path.outcome(), path: positions, cost: path.cost(), expanded: path.expanded() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachedCell {
    pub position: Position,
    pub cost: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Position>,
}

/// Serializable range query output in admission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeReport {
    pub origin: Option<Position>,
    pub budget: u32,
    pub reached: Vec<ReachedCell>,
}

impl RangeReport {
    pub fn from_reachable(grid: &Grid, reachable: &Reachable) -> Self {
        let reached = reachable
            .nodes()
            .iter()
            .map(|&n| ReachedCell {
                position: grid.node(n).position(),
                cost: reachable.cost_to(n).unwrap_or(0),
                from: reachable.came_from(n).map(|p| grid.node(p).position()),
            })
            .collect();
        RangeReport {
            origin: reachable.origin().map(|n| grid.node(n).position()),
            budget: reachable.budget(),
            reached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_parses_from_comma_list() {
        let p: Position = "3, -2,1".parse().unwrap();
        assert_eq!(p, Position::new(3, -2, 1));
        assert!("1,2".parse::<Position>().is_err());
        assert!("1,2,3,4".parse::<Position>().is_err());
        assert!("1,a,3".parse::<Position>().is_err());
    }

    #[test]
    fn planar_distance_ignores_elevation() {
        let a = Position::new(0, 0, 0);
        let b = Position::new(3, -4, 9);
        assert_eq!(a.planar_distance(b), 7);
        assert_eq!(b.planar_distance(a), 7);
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let edge = Position::new(i32::MAX, 0, i32::MIN);
        assert_eq!(edge.offset(1, 0, 0), None);
        assert_eq!(edge.offset(0, 0, -1), None);
        assert_eq!(edge.offset(-1, 0, 1), Some(Position::new(i32::MAX - 1, 0, i32::MIN + 1)));

        let far = Position::new(i32::MIN, i32::MIN, 0);
        let near = Position::new(i32::MAX, i32::MAX, 0);
        assert_eq!(far.planar_distance(near), 2 * u64::from(u32::MAX));

        let everything = Region::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(everything.width(), 1 << 32);
        assert_eq!(everything.cell_count(), u64::MAX);
    }

    #[test]
    fn region_counts_are_inclusive() {
        let r = Region::new(-1, 0, 2, 1);
        assert_eq!(r.width(), 4);
        assert_eq!(r.height(), 2);
        assert_eq!(r.cell_count(), 8);
        assert!(r.contains(2, 1));
        assert!(!r.contains(3, 1));
        assert!(!Region::new(2, 0, 1, 0).is_valid());
        assert_eq!(Region::new(2, 0, 1, 0).cell_count(), 0);
    }

    #[test]
    fn region_parses_and_unions() {
        let r: Region = "0,0,4,1".parse().unwrap();
        assert_eq!(r, Region::new(0, 0, 4, 1));
        let u = r.union(Region::new(-2, 3, 1, 5));
        assert_eq!(u, Region::new(-2, 0, 4, 5));
    }

    #[test]
    fn position_serializes_with_named_fields() {
        let v = serde_json::to_value(Position::new(1, 2, 3)).unwrap();
        assert_eq!(v, serde_json::json!({ "x": 1, "y": 2, "elevation": 3 }));
    }
}
