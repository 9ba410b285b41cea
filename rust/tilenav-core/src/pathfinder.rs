use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cost::{CostModel, MovementCost, MovementType};
use crate::grid::Grid;
use crate::models::Position;
use crate::node::NodeId;
use crate::options::SearchOptions;

#[derive(Clone, Copy, Debug)]
struct QueueNode {
    node: NodeId,
    f: u64,
    g: u64,
    seq: u64,
}

impl PartialEq for QueueNode { fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal } }
impl Eq for QueueNode {}
impl PartialOrd for QueueNode { fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) } }
impl Ord for QueueNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is max-heap; invert ordering for min-heap behavior
        (other.f, other.g, other.seq, other.node).cmp(&(self.f, self.g, self.seq, self.node))
    }
}

/// Nodes reached by a range query, with the edge each was reached through.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reachable {
    origin: Option<NodeId>,
    budget: u32,
    // admission order, origin first
    order: Vec<NodeId>,
    cost: FxHashMap<NodeId, u32>,
    came_from: FxHashMap<NodeId, NodeId>,
}

impl Reachable {
    fn empty(budget: u32) -> Self {
        Self { budget, ..Self::default() }
    }

    pub fn origin(&self) -> Option<NodeId> {
        self.origin
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Every reached node, origin first, in order of first admission.
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.cost.contains_key(&node)
    }

    pub fn cost_to(&self, node: NodeId) -> Option<u32> {
        self.cost.get(&node).copied()
    }

    pub fn came_from(&self, node: NodeId) -> Option<NodeId> {
        self.came_from.get(&node).copied()
    }

    /// Route to a reached node, destination first. Empty if `node` was not reached.
    pub fn path_to(&self, node: NodeId) -> Vec<NodeId> {
        if !self.contains(node) {
            return Vec::new();
        }
        let mut out = vec![node];
        let mut cur = node;
        while let Some(prev) = self.came_from(cur) {
            out.push(prev);
            cur = prev;
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathOutcome {
    Found,
    NoPath,
    MissingOrigin,
    MissingDestination,
    ExpansionLimit,
}

/// Result of a point-to-point query. Nodes run destination to origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<NodeId>,
    cost: u32,
    expanded: u64,
    outcome: PathOutcome,
}

impl Path {
    fn unreachable(outcome: PathOutcome, expanded: u64) -> Self {
        Self { nodes: Vec::new(), cost: 0, expanded, outcome }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_found(&self) -> bool {
        self.outcome == PathOutcome::Found
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn expanded(&self) -> u64 {
        self.expanded
    }

    pub fn outcome(&self) -> PathOutcome {
        self.outcome
    }

    /// Origin to destination order.
    pub fn into_forward(mut self) -> Vec<NodeId> {
        self.nodes.reverse();
        self.nodes
    }
}

/// Range and path queries over a built grid.
pub struct Pathfinder<'g, C: MovementCost = CostModel> {
    grid: &'g Grid,
    cost: C,
    options: SearchOptions,
}

impl<'g, C: MovementCost> Pathfinder<'g, C> {
    pub fn new(grid: &'g Grid, cost: C) -> Self {
        Self { grid, cost, options: SearchOptions::default() }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn grid(&self) -> &'g Grid {
        self.grid
    }

    fn step_cost(&self, to: NodeId, movement: MovementType) -> u64 {
        self.cost.cost(self.grid.node(to), movement) as u64
    }

    /// Dijkstra from `origin`, admitting nodes whose total cost stays within `budget`.
    pub fn range(&self, origin: Position, budget: u32, movement: MovementType) -> Reachable {
        let Some(start) = self.grid.node_id(origin) else {
            debug!(%origin, "range query from position without node");
            return Reachable::empty(budget);
        };

        let mut out = Reachable::empty(budget);
        out.origin = Some(start);
        out.order.push(start);
        out.cost.insert(start, 0);

        let mut open = BinaryHeap::new();
        let mut seq: u64 = 0;
        let mut expanded: u64 = 0;
        open.push(QueueNode { node: start, f: 0, g: 0, seq });

        while let Some(qn) = open.pop() {
            // Discard stale
            if out.cost.get(&qn.node).is_some_and(|&best| qn.g > best as u64) {
                continue;
            }
            expanded += 1;
            for &next in self.grid.node(qn.node).neighbours() {
                let new_cost = qn.g + self.step_cost(next, movement);
                if new_cost > budget as u64 {
                    continue;
                }
                let improves = out.cost.get(&next).map(|&c| new_cost < c as u64).unwrap_or(true);
                if !improves {
                    continue;
                }
                if !out.cost.contains_key(&next) {
                    out.order.push(next);
                }
                out.cost.insert(next, new_cost as u32);
                out.came_from.insert(next, qn.node);
                seq += 1;
                open.push(QueueNode { node: next, f: new_cost, g: new_cost, seq });
            }
        }

        debug!(%origin, budget, reached = out.len(), expanded, "range query done");
        out
    }

    /// Best-first search from `origin` to `destination`, ordered by cost so far
    /// plus planar Manhattan distance to the destination.
    pub fn path(&self, origin: Position, destination: Position, movement: MovementType) -> Path {
        let Some(start) = self.grid.node_id(origin) else {
            warn!(%origin, %destination, "path query: origin is not a valid node");
            return Path::unreachable(PathOutcome::MissingOrigin, 0);
        };
        let Some(goal) = self.grid.node_id(destination) else {
            warn!(%origin, %destination, "path query: destination is not a valid node");
            return Path::unreachable(PathOutcome::MissingDestination, 0);
        };

        let mut open = BinaryHeap::new();
        let mut g_score: FxHashMap<NodeId, u64> = FxHashMap::default();
        let mut came_from: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        let mut expanded: u64 = 0;
        let mut seq: u64 = 0;

        g_score.insert(start, 0);
        open.push(QueueNode { node: start, f: heuristic(origin, destination), g: 0, seq });

        while let Some(qn) = open.pop() {
            if g_score.get(&qn.node).is_some_and(|&best| qn.g > best) {
                continue;
            }
            expanded += 1;
            if expanded > self.options.max_expansions {
                warn!(%origin, %destination, expanded, "path query hit expansion limit");
                return Path::unreachable(PathOutcome::ExpansionLimit, expanded);
            }
            if qn.node == goal && self.options.stop_at_goal {
                break;
            }

            for &next in self.grid.node(qn.node).neighbours() {
                let tentative = qn.g + self.step_cost(next, movement);
                if g_score.get(&next).map(|&bg| tentative < bg).unwrap_or(true) {
                    g_score.insert(next, tentative);
                    came_from.insert(next, qn.node);
                    let h = heuristic(self.grid.node(next).position(), destination);
                    seq += 1;
                    open.push(QueueNode { node: next, f: tentative + h, g: tentative, seq });
                }
            }
        }

        let Some(&total) = g_score.get(&goal) else {
            warn!(%origin, %destination, expanded, "no path between nodes");
            return Path::unreachable(PathOutcome::NoPath, expanded);
        };

        let nodes = reconstruct(&came_from, start, goal);
        debug!(%origin, %destination, len = nodes.len(), cost = total, expanded, "path query done");
        Path { nodes, cost: total.min(u32::MAX as u64) as u32, expanded, outcome: PathOutcome::Found }
    }
}

fn heuristic(a: Position, b: Position) -> u64 {
    a.planar_distance(b)
}

// Destination first. The origin has no entry in `came_from`.
fn reconstruct(came_from: &FxHashMap<NodeId, NodeId>, start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut out = vec![goal];
    let mut cur = goal;
    while cur != start {
        match came_from.get(&cur) {
            Some(&prev) => {
                out.push(prev);
                cur = prev;
            }
            None => break,
        }
    }
    out
}
