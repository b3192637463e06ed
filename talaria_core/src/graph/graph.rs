// talaria_core/src/graph/graph.rs

use std::collections::HashMap;

use crate::graph::FootstepNode;

/// The cheapest known way to arrive at a node.
#[derive(Debug, Clone, Copy)]
struct EdgeRecord {
    predecessor: FootstepNode,
    #[allow(dead_code)] // kept for introspection/debugging of planned edges
    edge_cost: f64,
}

/// Sparse directed graph over the footstep nodes the search has touched.
///
/// For every node except the start it records exactly one predecessor: the
/// one on the cheapest known path from the start. Edges are only ever
/// overwritten by strictly cheaper arrivals (standard relaxation), which
/// keeps the predecessor chains acyclic. Rebuilt from scratch for every
/// planning call.
#[derive(Debug, Default)]
pub struct FootstepGraph {
    start: Option<FootstepNode>,
    incoming_best: HashMap<FootstepNode, EdgeRecord>,
    cost_from_start: HashMap<FootstepNode, f64>,
}

impl FootstepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets all storage and records `start` as the root with cost zero.
    pub fn initialize(&mut self, start: FootstepNode) {
        self.start = Some(start);
        self.incoming_best.clear();
        self.cost_from_start.clear();
        self.cost_from_start.insert(start, 0.0);
    }

    /// Relaxes the edge `from -> to`: if arriving at `to` through `from`
    /// is strictly cheaper than the best known arrival (or `to` is new),
    /// the predecessor and accumulated cost of `to` are updated. Returns
    /// whether the edge was recorded, so the search only re-queues nodes
    /// whose cost actually dropped.
    ///
    /// `from` must already be part of the graph; expanding a node the
    /// search never reached is a programming error.
    pub fn check_and_set_edge(&mut self, from: FootstepNode, to: FootstepNode, edge_cost: f64) -> bool {
        debug_assert!(edge_cost >= 0.0, "edge costs must be nonnegative");
        debug_assert!(
            self.does_node_exist(&from),
            "relaxing an edge from a node outside the graph"
        );

        if Some(to) == self.start {
            // The start has no predecessor by definition.
            return false;
        }

        let Some(&from_cost) = self.cost_from_start.get(&from) else {
            return false;
        };
        let new_cost = from_cost + edge_cost;

        let improves = match self.cost_from_start.get(&to) {
            Some(&current) => new_cost < current,
            None => true,
        };
        if improves {
            self.incoming_best.insert(
                to,
                EdgeRecord {
                    predecessor: from,
                    edge_cost,
                },
            );
            self.cost_from_start.insert(to, new_cost);
        }
        improves
    }

    /// Unconditionally records `from` as the predecessor of `to`.
    ///
    /// Used for the zero-cost edge that completes the goal stance: by the
    /// time one goal foot is taken off the frontier its cost can never
    /// exceed the other goal foot's, but it may tie it, and the tie must
    /// not leave the plan ending on a non-goal stance.
    pub(crate) fn set_edge(&mut self, from: FootstepNode, to: FootstepNode, edge_cost: f64) {
        debug_assert!(edge_cost >= 0.0, "edge costs must be nonnegative");
        if Some(to) == self.start {
            return;
        }
        let Some(&from_cost) = self.cost_from_start.get(&from) else {
            return;
        };
        self.incoming_best.insert(
            to,
            EdgeRecord {
                predecessor: from,
                edge_cost,
            },
        );
        self.cost_from_start.insert(to, from_cost + edge_cost);
    }

    /// Whether the search has ever reached `node` (including the start).
    pub fn does_node_exist(&self, node: &FootstepNode) -> bool {
        self.cost_from_start.contains_key(node)
    }

    /// Accumulated cost of the cheapest known path from the start.
    pub fn cost_from_start(&self, node: &FootstepNode) -> Option<f64> {
        self.cost_from_start.get(node).copied()
    }

    /// Walks the predecessor links from `node` back to the start and
    /// returns the path in stepping order, or `None` if `node` was never
    /// reached.
    pub fn path_from_start(&self, node: &FootstepNode) -> Option<Vec<FootstepNode>> {
        let start = self.start?;
        if !self.does_node_exist(node) {
            return None;
        }

        let mut path = vec![*node];
        let mut current = *node;
        while current != start {
            let record = self.incoming_best.get(&current)?;
            current = record.predecessor;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}
