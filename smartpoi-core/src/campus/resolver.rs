//! Map query coordinates and building names onto graph nodes.

use geo::Coord;
use log::debug;

use super::{CampusGraph, NodeId};
use crate::haversine_km;

impl CampusGraph {
    /// Resolve a query endpoint to a graph node.
    ///
    /// A known `building` name wins outright. Otherwise, including when the
    /// name is unknown, the node nearest to `point` is returned.
    #[must_use]
    pub fn resolve(&self, point: Coord<f64>, building: Option<&str>) -> NodeId {
        if let Some(name) = building {
            if let Some(node) = self.building(name) {
                return node;
            }
            debug!("unknown building {name:?}; resolving by nearest node");
        }
        self.nearest_node(point)
    }

    /// Return the node with the smallest haversine distance to `point`.
    ///
    /// Ties go to the lowest node identifier. The scan is linear, which suits
    /// a graph of tens of nodes; a spatial index is needed once the graph
    /// grows into the hundreds.
    #[must_use]
    pub fn nearest_node(&self, point: Coord<f64>) -> NodeId {
        // The node table is never empty, so node 0 always exists.
        self.nodes()
            .zip(self.coords())
            .map(|(node, coord)| (node, haversine_km(point, *coord)))
            .fold((NodeId(0), f64::INFINITY), |best, candidate| {
                if candidate.1 < best.1 { candidate } else { best }
            })
            .0
    }
}
