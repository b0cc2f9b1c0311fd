//! The campus road network and everything routed over it.
//!
//! A [`CampusConfig`] is the static description loaded once at start-up:
//! nodes, weighted bidirectional edges, building aliases, exits and the
//! campus bounding box. [`CampusGraph::build`] validates it and derives the
//! read-only adjacency structure that the resolver, the shortest-path solver
//! and the route assembler share across requests.

mod assembler;
mod bounds;
mod graph;
mod path;
mod resolver;

use serde::{Deserialize, Serialize};

pub use assembler::CampusRoute;
pub use bounds::{CampusBounds, TripScope};
pub use graph::{CampusConfigError, CampusGraph, NodeId};
pub use path::{RoutingError, ShortestPath};

/// A named point of the campus road graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Unique node identifier.
    pub id: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// An undirected, weighted connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// First endpoint.
    pub from: String,
    /// Second endpoint.
    pub to: String,
    /// Traversal cost in metres, identical in both directions.
    pub weight_m: f64,
}

/// A human-readable place name pointing at a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSpec {
    /// Building or landmark name as typed by users.
    pub name: String,
    /// Target node identifier.
    pub node: String,
}

/// Static description of a campus road network.
///
/// Aliases are an ordered list rather than a map so that a name defined
/// twice resolves to its last definition.
///
/// # Examples
///
/// ```
/// use smartpoi_core::{CampusBounds, CampusConfig, CampusGraph};
/// use smartpoi_core::campus::{EdgeSpec, NodeSpec};
///
/// let config = CampusConfig {
///     bounds: CampusBounds::new(0.0, 1.0, 0.0, 1.0),
///     nodes: vec![
///         NodeSpec { id: "a".into(), lat: 0.1, lon: 0.1 },
///         NodeSpec { id: "b".into(), lat: 0.2, lon: 0.2 },
///     ],
///     edges: vec![EdgeSpec { from: "a".into(), to: "b".into(), weight_m: 10.0 }],
///     aliases: Vec::new(),
///     exits: Vec::new(),
/// };
/// let graph = CampusGraph::build(&config)?;
/// assert_eq!(graph.node_count(), 2);
/// # Ok::<(), smartpoi_core::CampusConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampusConfig {
    /// Axis-aligned box deciding whether a coordinate is on campus.
    pub bounds: CampusBounds,
    /// Graph nodes.
    pub nodes: Vec<NodeSpec>,
    /// Bidirectional edges between nodes.
    pub edges: Vec<EdgeSpec>,
    /// Building names mapped to node identifiers.
    #[serde(default)]
    pub aliases: Vec<AliasSpec>,
    /// Node identifiers tagged as campus egress points.
    #[serde(default)]
    pub exits: Vec<String>,
}
