//! Single-target Dijkstra over the campus graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use thiserror::Error;

use super::{CampusGraph, NodeId};

/// Node sequence and total weight of a shortest path.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Nodes from start to target, both included.
    pub nodes: Vec<NodeId>,
    /// Sum of edge weights along `nodes`, in metres.
    pub distance_m: f64,
}

/// Failures routing over the campus graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// No sequence of edges connects the two nodes.
    #[error("no campus path from {from:?} to {to:?}")]
    Unreachable {
        /// Start node identifier.
        from: String,
        /// Target node identifier.
        to: String,
    },
    /// A node handle from another graph was supplied.
    #[error("node {node} does not belong to this campus graph")]
    UnknownNode {
        /// The foreign handle.
        node: NodeId,
    },
}

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeId,
}

impl Eq for State {}

// Reversed so that `BinaryHeap` pops the cheapest state first; equal costs
// pop the lower node handle first.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl CampusGraph {
    /// Find the cheapest path from `start` to `end`.
    ///
    /// The search stops as soon as `end` is settled. When `start == end` the
    /// path is the single node with distance zero.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Unreachable`] when `end` lies in another
    /// connected component, and [`RoutingError::UnknownNode`] for handles
    /// that do not belong to this graph.
    pub fn shortest_path(&self, start: NodeId, end: NodeId) -> Result<ShortestPath, RoutingError> {
        let count = self.node_count();
        for node in [start, end] {
            if node.0 >= count {
                return Err(RoutingError::UnknownNode { node });
            }
        }

        let mut distance = vec![f64::INFINITY; count];
        let mut previous: Vec<Option<NodeId>> = vec![None; count];
        let mut visited = vec![false; count];
        let mut heap = BinaryHeap::new();

        distance[start.0] = 0.0;
        heap.push(State {
            cost: 0.0,
            node: start,
        });

        while let Some(State { cost, node }) = heap.pop() {
            if visited[node.0] {
                continue;
            }
            visited[node.0] = true;
            if node == end {
                break;
            }
            for &(next, weight) in self.neighbors(node) {
                let candidate = cost + weight;
                if candidate < distance[next.0] {
                    distance[next.0] = candidate;
                    previous[next.0] = Some(node);
                    heap.push(State {
                        cost: candidate,
                        node: next,
                    });
                }
            }
        }

        if !visited[end.0] {
            return Err(self.unreachable(start, end));
        }

        let mut nodes = vec![end];
        let mut current = end;
        while current != start {
            // A broken chain would mean the target was never settled.
            let Some(parent) = previous[current.0] else {
                return Err(self.unreachable(start, end));
            };
            nodes.push(parent);
            current = parent;
        }
        nodes.reverse();

        Ok(ShortestPath {
            nodes,
            distance_m: distance[end.0],
        })
    }

    fn unreachable(&self, start: NodeId, end: NodeId) -> RoutingError {
        RoutingError::Unreachable {
            from: self.name(start).unwrap_or_default().to_owned(),
            to: self.name(end).unwrap_or_default().to_owned(),
        }
    }
}
