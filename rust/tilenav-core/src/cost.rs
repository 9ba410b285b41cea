use serde::{Deserialize, Serialize};

use crate::node::{Node, PathType};

pub const DEFAULT_SURFACE_STEP: u32 = 1;
pub const DEFAULT_TRANSITIONAL_STEP: u32 = 1;

/// Selects which traversal cost applies. Only grounded movement is modelled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    #[default]
    Grounded,
}

/// Cost of stepping onto `node`. Must never be negative; zero is allowed.
pub trait MovementCost {
    fn cost(&self, node: &Node, movement: MovementType) -> u32;
}

impl<F> MovementCost for F
where
    F: Fn(&Node, MovementType) -> u32,
{
    fn cost(&self, node: &Node, movement: MovementType) -> u32 {
        self(node, movement)
    }
}

/// Step costs for grounded movement, keyed by the destination's path type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    pub surface_step: u32,
    pub transitional_step: u32,
}

impl Default for CostModel {
    fn default() -> Self {
        Self { surface_step: DEFAULT_SURFACE_STEP, transitional_step: DEFAULT_TRANSITIONAL_STEP }
    }
}

impl CostModel {
    pub fn uniform(step: u32) -> Self {
        Self { surface_step: step, transitional_step: step }
    }
}

impl MovementCost for CostModel {
    fn cost(&self, node: &Node, movement: MovementType) -> u32 {
        match (movement, node.path_type()) {
            (MovementType::Grounded, PathType::Surface) => self.surface_step,
            (MovementType::Grounded, PathType::Transitional) => self.transitional_step,
        }
    }
}
