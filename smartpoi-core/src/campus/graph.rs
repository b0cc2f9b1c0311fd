//! Validated, immutable adjacency structure for the campus network.

use std::collections::HashMap;
use std::fmt;

use geo::Coord;
use log::debug;
use thiserror::Error;

use super::{CampusBounds, CampusConfig, EdgeSpec, NodeSpec};

/// Dense handle for a node of a particular [`CampusGraph`].
///
/// Handles are assigned in ascending order of node identifier, so comparing
/// two handles compares their identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(super) usize);

impl NodeId {
    /// Position of the node in the graph's tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Configuration defects detected while building a [`CampusGraph`].
///
/// Every variant is fatal: a service must not route over an inconsistent
/// graph.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CampusConfigError {
    /// The configuration declared no nodes.
    #[error("campus graph must contain at least one node")]
    EmptyNodeTable,
    /// Two nodes share an identifier.
    #[error("node {id:?} is defined more than once")]
    DuplicateNode {
        /// Offending identifier.
        id: String,
    },
    /// A node coordinate is not a finite WGS84 position.
    #[error("node {id:?} has an invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate {
        /// Offending identifier.
        id: String,
        /// Declared latitude.
        lat: f64,
        /// Declared longitude.
        lon: f64,
    },
    /// An edge references a node that does not exist.
    #[error("edge {from:?} -> {to:?} references unknown node {missing:?}")]
    UnknownEdgeEndpoint {
        /// First endpoint as declared.
        from: String,
        /// Second endpoint as declared.
        to: String,
        /// The endpoint that could not be found.
        missing: String,
    },
    /// An edge weight is zero, negative or not finite.
    #[error("edge {from:?} -> {to:?} has invalid weight {weight_m}")]
    InvalidEdgeWeight {
        /// First endpoint as declared.
        from: String,
        /// Second endpoint as declared.
        to: String,
        /// Declared weight in metres.
        weight_m: f64,
    },
    /// An exit references a node that does not exist.
    #[error("exit {id:?} is not a campus node")]
    UnknownExit {
        /// Offending identifier.
        id: String,
    },
    /// A building alias resolves to a node that does not exist.
    #[error("building {name:?} points at unknown node {node:?}")]
    UnknownAliasTarget {
        /// Building name.
        name: String,
        /// Target identifier after last-write-wins folding.
        node: String,
    },
    /// The bounding box is inverted or contains non-finite values.
    #[error("campus bounds are invalid: {bounds:?}")]
    InvalidBounds {
        /// Bounds as declared.
        bounds: CampusBounds,
    },
}

/// Read-only campus road graph shared by every routing request.
///
/// The graph owns node coordinates, the bidirectional adjacency lists, the
/// building alias table and the exit list. It is `Send + Sync` and never
/// mutated after [`CampusGraph::build`] returns.
#[derive(Debug, Clone)]
pub struct CampusGraph {
    ids: Vec<String>,
    coords: Vec<Coord<f64>>,
    index: HashMap<String, NodeId>,
    adjacency: Vec<Vec<(NodeId, f64)>>,
    aliases: HashMap<String, NodeId>,
    exits: Vec<NodeId>,
    bounds: CampusBounds,
    edge_count: usize,
}

impl CampusGraph {
    /// Validate `config` and derive the adjacency structure.
    ///
    /// Every edge `(u, v, w)` contributes `(v, w)` to `u`'s neighbour list
    /// and `(u, w)` to `v`'s. Aliases are folded in declaration order, so a
    /// name defined twice keeps its last target.
    ///
    /// # Errors
    ///
    /// Returns a [`CampusConfigError`] describing the first defect found.
    pub fn build(config: &CampusConfig) -> Result<Self, CampusConfigError> {
        config.bounds.validate()?;
        if config.nodes.is_empty() {
            return Err(CampusConfigError::EmptyNodeTable);
        }

        let mut specs: Vec<&NodeSpec> = config.nodes.iter().collect();
        specs.sort_by(|lhs, rhs| lhs.id.cmp(&rhs.id));

        let mut ids = Vec::with_capacity(specs.len());
        let mut coords = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());
        for spec in specs {
            if !valid_position(spec.lat, spec.lon) {
                return Err(CampusConfigError::InvalidCoordinate {
                    id: spec.id.clone(),
                    lat: spec.lat,
                    lon: spec.lon,
                });
            }
            let id = NodeId(ids.len());
            if index.insert(spec.id.clone(), id).is_some() {
                return Err(CampusConfigError::DuplicateNode {
                    id: spec.id.clone(),
                });
            }
            ids.push(spec.id.clone());
            coords.push(Coord {
                x: spec.lon,
                y: spec.lat,
            });
        }

        let mut adjacency = vec![Vec::new(); ids.len()];
        for edge in &config.edges {
            let (u, v) = resolve_edge(&index, edge)?;
            if !(edge.weight_m.is_finite() && edge.weight_m > 0.0) {
                return Err(CampusConfigError::InvalidEdgeWeight {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    weight_m: edge.weight_m,
                });
            }
            if let Some(list) = adjacency.get_mut(u.0) {
                list.push((v, edge.weight_m));
            }
            if let Some(list) = adjacency.get_mut(v.0) {
                list.push((u, edge.weight_m));
            }
        }

        let exits = config
            .exits
            .iter()
            .map(|exit| {
                index
                    .get(exit)
                    .copied()
                    .ok_or_else(|| CampusConfigError::UnknownExit { id: exit.clone() })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut folded: HashMap<&str, &str> = HashMap::with_capacity(config.aliases.len());
        for alias in &config.aliases {
            if let Some(previous) = folded.insert(alias.name.as_str(), alias.node.as_str()) {
                debug!(
                    "building {:?} redefined: {previous:?} replaced by {:?}",
                    alias.name, alias.node
                );
            }
        }
        let aliases = folded
            .into_iter()
            .map(|(name, node)| {
                index
                    .get(node)
                    .map(|id| (name.to_owned(), *id))
                    .ok_or_else(|| CampusConfigError::UnknownAliasTarget {
                        name: name.to_owned(),
                        node: node.to_owned(),
                    })
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self {
            ids,
            coords,
            index,
            adjacency,
            aliases,
            exits,
            bounds: config.bounds,
            edge_count: config.edges.len(),
        })
    }

    /// Number of nodes, including isolated ones.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of undirected edges declared in the configuration.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterate over every node handle in ascending identifier order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.ids.len()).map(NodeId)
    }

    /// Look up a node by identifier.
    #[must_use]
    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Identifier of `node`, if it belongs to this graph.
    #[must_use]
    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.ids.get(node.0).map(String::as_str)
    }

    /// Coordinate of `node`, if it belongs to this graph.
    #[must_use]
    pub fn coord(&self, node: NodeId) -> Option<Coord<f64>> {
        self.coords.get(node.0).copied()
    }

    /// Neighbours of `node` with their edge weights in metres.
    ///
    /// Isolated nodes and foreign handles yield an empty slice.
    #[must_use]
    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, f64)] {
        self.adjacency.get(node.0).map_or(&[], Vec::as_slice)
    }

    /// Node mapped to a building name, if the name is known.
    #[must_use]
    pub fn building(&self, name: &str) -> Option<NodeId> {
        self.aliases.get(name).copied()
    }

    /// Number of distinct building names.
    #[must_use]
    pub fn building_count(&self) -> usize {
        self.aliases.len()
    }

    /// Campus exits as `(identifier, coordinate)` pairs in declaration order.
    pub fn exits(&self) -> impl Iterator<Item = (&str, Coord<f64>)> + '_ {
        self.exits
            .iter()
            .filter_map(|exit| Some((self.name(*exit)?, self.coord(*exit)?)))
    }

    /// The campus bounding box.
    #[must_use]
    pub const fn bounds(&self) -> &CampusBounds {
        &self.bounds
    }

    pub(super) fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }
}

fn resolve_edge(
    index: &HashMap<String, NodeId>,
    edge: &EdgeSpec,
) -> Result<(NodeId, NodeId), CampusConfigError> {
    let lookup = |id: &String| {
        index
            .get(id)
            .copied()
            .ok_or_else(|| CampusConfigError::UnknownEdgeEndpoint {
                from: edge.from.clone(),
                to: edge.to.clone(),
                missing: id.clone(),
            })
    };
    Ok((lookup(&edge.from)?, lookup(&edge.to)?))
}

fn valid_position(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campus::AliasSpec;
    use crate::test_support::{edge, node, sample_campus_config};
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> CampusConfig {
        sample_campus_config()
    }

    #[rstest]
    fn every_node_has_an_adjacency_entry(config: CampusConfig) {
        let graph = CampusGraph::build(&config).expect("sample config is valid");
        assert_eq!(graph.node_count(), config.nodes.len());
        let isolated = graph.node_id("isolated").expect("isolated node exists");
        assert!(graph.neighbors(isolated).is_empty());
    }

    #[rstest]
    fn edges_are_bidirectional(config: CampusConfig) {
        let graph = CampusGraph::build(&config).expect("sample config is valid");
        let a = graph.node_id("a").expect("a");
        let b = graph.node_id("b").expect("b");
        assert!(graph.neighbors(a).contains(&(b, 100.0)));
        assert!(graph.neighbors(b).contains(&(a, 100.0)));
    }

    #[rstest]
    fn handles_follow_identifier_order(config: CampusConfig) {
        let graph = CampusGraph::build(&config).expect("sample config is valid");
        let names: Vec<_> = graph.nodes().filter_map(|n| graph.name(n)).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[rstest]
    fn rejects_empty_node_table(mut config: CampusConfig) {
        config.nodes.clear();
        config.edges.clear();
        config.aliases.clear();
        config.exits.clear();
        let err = CampusGraph::build(&config).expect_err("empty table");
        assert_eq!(err, CampusConfigError::EmptyNodeTable);
    }

    #[rstest]
    fn rejects_edge_to_unknown_node(mut config: CampusConfig) {
        config.edges.push(edge("a", "nowhere", 5.0));
        let err = CampusGraph::build(&config).expect_err("unknown endpoint");
        assert!(matches!(
            err,
            CampusConfigError::UnknownEdgeEndpoint { ref missing, .. } if missing == "nowhere"
        ));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-3.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_edge_weight(mut config: CampusConfig, #[case] weight: f64) {
        config.edges.push(edge("a", "c", weight));
        let err = CampusGraph::build(&config).expect_err("invalid weight");
        assert!(matches!(err, CampusConfigError::InvalidEdgeWeight { .. }));
    }

    #[rstest]
    fn rejects_duplicate_node(mut config: CampusConfig) {
        config.nodes.push(node("a", 12.9235, 77.4995));
        let err = CampusGraph::build(&config).expect_err("duplicate node");
        assert_eq!(err, CampusConfigError::DuplicateNode { id: "a".into() });
    }

    #[rstest]
    fn rejects_non_finite_coordinate(mut config: CampusConfig) {
        config.nodes.push(node("broken", f64::NAN, 77.5));
        let err = CampusGraph::build(&config).expect_err("invalid coordinate");
        assert!(matches!(err, CampusConfigError::InvalidCoordinate { .. }));
    }

    #[rstest]
    fn rejects_unknown_exit(mut config: CampusConfig) {
        config.exits.push("back_door".into());
        let err = CampusGraph::build(&config).expect_err("unknown exit");
        assert_eq!(
            err,
            CampusConfigError::UnknownExit {
                id: "back_door".into()
            }
        );
    }

    #[rstest]
    fn rejects_dangling_alias(mut config: CampusConfig) {
        config.aliases.push(AliasSpec {
            name: "Annexe".into(),
            node: "annexe_node".into(),
        });
        let err = CampusGraph::build(&config).expect_err("dangling alias");
        assert!(matches!(err, CampusConfigError::UnknownAliasTarget { .. }));
    }

    #[rstest]
    fn alias_redefinition_keeps_last_target(mut config: CampusConfig) {
        config.aliases.push(AliasSpec {
            name: "Library".into(),
            node: "a".into(),
        });
        config.aliases.push(AliasSpec {
            name: "Library".into(),
            node: "d".into(),
        });
        let graph = CampusGraph::build(&config).expect("valid config");
        assert_eq!(graph.building("Library"), graph.node_id("d"));
    }

    #[rstest]
    fn later_alias_may_repair_an_earlier_dangling_one(mut config: CampusConfig) {
        config.aliases.push(AliasSpec {
            name: "Annexe".into(),
            node: "annexe_node".into(),
        });
        config.aliases.push(AliasSpec {
            name: "Annexe".into(),
            node: "b".into(),
        });
        let graph = CampusGraph::build(&config).expect("last definition is valid");
        assert_eq!(graph.building("Annexe"), graph.node_id("b"));
    }

    #[rstest]
    fn rejects_inverted_bounds(mut config: CampusConfig) {
        config.bounds = CampusBounds::new(13.0, 12.0, 77.0, 78.0);
        let err = CampusGraph::build(&config).expect_err("inverted bounds");
        assert!(matches!(err, CampusConfigError::InvalidBounds { .. }));
    }

    #[rstest]
    fn exits_are_reported_with_coordinates(config: CampusConfig) {
        let graph = CampusGraph::build(&config).expect("valid config");
        let exits: Vec<_> = graph.exits().map(|(name, _)| name).collect();
        assert_eq!(exits, vec!["gate"]);
    }
}
