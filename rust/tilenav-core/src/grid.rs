use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::GridError;
use crate::models::Position;
use crate::node::{EntityId, Node, NodeId, OccupantRegistry, PathType};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStats {
    pub nodes: usize,
    pub surface: usize,
    pub transitional: usize,
    pub edges: usize,
    pub columns: usize,
}

/// Owner of every node built from a region, keyed by position, plus the
/// per-column height map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    nodes: Vec<Node>,
    index: FxHashMap<Position, NodeId>,
    // (x, y) -> highest walkable elevation
    heights: FxHashMap<(i32, i32), i32>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id. Panics if `id` did not come from this grid.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_id(&self, pos: Position) -> Option<NodeId> {
        self.index.get(&pos).copied()
    }

    pub fn get(&self, pos: Position) -> Option<&Node> {
        self.node_id(pos).map(|id| self.node(id))
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index.contains_key(&pos)
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub fn neighbours(&self, pos: Position) -> Option<&[NodeId]> {
        self.get(pos).map(Node::neighbours)
    }

    /// Highest walkable elevation in column (x, y); `None` when the column has no node.
    pub fn height(&self, x: i32, y: i32) -> Option<i32> {
        self.heights.get(&(x, y)).copied()
    }

    pub fn stats(&self) -> GridStats {
        let surface = self.nodes.iter().filter(|n| n.path_type() == PathType::Surface).count();
        GridStats {
            nodes: self.nodes.len(),
            surface,
            transitional: self.nodes.len() - surface,
            edges: self.nodes.iter().map(|n| n.neighbours().len()).sum(),
            columns: self.heights.len(),
        }
    }

    pub fn occupants(&self, pos: Position) -> Option<&OccupantRegistry> {
        self.get(pos).map(Node::occupants)
    }

    /// Places `entity` at `pos`. Without a node there this is a logged no-op.
    pub fn add_occupant(&mut self, pos: Position, entity: EntityId) -> bool {
        match self.node_id(pos) {
            Some(id) => self.nodes[id.index()].occupants_mut().add(entity),
            None => {
                warn!(%pos, entity = entity.0, "add_occupant: no node at position");
                false
            }
        }
    }

    pub fn remove_occupant(&mut self, pos: Position, entity: EntityId) -> bool {
        match self.node_id(pos) {
            Some(id) => self.nodes[id.index()].occupants_mut().remove(entity),
            None => {
                warn!(%pos, entity = entity.0, "remove_occupant: no node at position");
                false
            }
        }
    }

    /// Remove from `from` then add at `to`; each half is independently a
    /// no-op when its node is missing. Returns whether the entity landed at `to`.
    pub fn move_occupant(&mut self, from: Position, to: Position, entity: EntityId) -> bool {
        self.remove_occupant(from, entity);
        self.add_occupant(to, entity)
    }

    pub fn occupants_matching<F>(&self, pos: Position, matches: F) -> Vec<EntityId>
    where
        F: FnMut(EntityId) -> bool,
    {
        self.occupants(pos).map(|reg| reg.query(matches)).unwrap_or_default()
    }

    pub(crate) fn insert_node(&mut self, position: Position, path_type: PathType) -> Result<NodeId, GridError> {
        if self.index.contains_key(&position) {
            return Err(GridError::DuplicateNode { position });
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(id, position, path_type));
        self.index.insert(position, id);
        let height = self.heights.entry(position.column()).or_insert(position.elevation);
        *height = (*height).max(position.elevation);
        Ok(id)
    }

    pub(crate) fn connect(&mut self, from: NodeId, to: NodeId, dedup: bool) -> bool {
        self.nodes[from.index()].form_connection(to, dedup)
    }
}
