use serde::{Deserialize, Serialize};

use crate::models::Position;

/// Index of a node within its owning [`Grid`](crate::grid::Grid).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathType {
    /// Flat ground. Only crosses an elevation step onto a transitional node.
    Surface,
    /// Ramp or stair. Connects to any node one step up or down.
    Transitional,
}

/// Opaque handle to an external entity standing on a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Entities currently located at one node, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OccupantRegistry {
    entities: Vec<EntityId>,
}

impl OccupantRegistry {
    /// Returns false when the entity was already present.
    pub fn add(&mut self, entity: EntityId) -> bool {
        if self.entities.contains(&entity) {
            return false;
        }
        self.entities.push(entity);
        true
    }

    /// Returns false when the entity was not present.
    pub fn remove(&mut self, entity: EntityId) -> bool {
        match self.entities.iter().position(|&e| e == entity) {
            Some(i) => {
                self.entities.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains(&entity)
    }

    pub fn query<F>(&self, mut matches: F) -> Vec<EntityId>
    where
        F: FnMut(EntityId) -> bool,
    {
        self.entities.iter().copied().filter(|&e| matches(e)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// A walkable slot. Position and path type are fixed at creation; neighbours
/// only grow during the adjacency pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    position: Position,
    path_type: PathType,
    neighbours: Vec<NodeId>,
    occupants: OccupantRegistry,
}

impl Node {
    pub(crate) fn new(id: NodeId, position: Position, path_type: PathType) -> Self {
        Self { id, position, path_type, neighbours: Vec::new(), occupants: OccupantRegistry::default() }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn path_type(&self) -> PathType {
        self.path_type
    }

    pub fn neighbours(&self) -> &[NodeId] {
        &self.neighbours
    }

    pub fn is_connected_to(&self, other: NodeId) -> bool {
        self.neighbours.contains(&other)
    }

    pub fn occupants(&self) -> &OccupantRegistry {
        &self.occupants
    }

    pub(crate) fn occupants_mut(&mut self) -> &mut OccupantRegistry {
        &mut self.occupants
    }

    /// Adds a directed edge. With `dedup` set an existing destination is not repeated.
    pub(crate) fn form_connection(&mut self, to: NodeId, dedup: bool) -> bool {
        if dedup && self.neighbours.contains(&to) {
            return false;
        }
        self.neighbours.push(to);
        true
    }
}
