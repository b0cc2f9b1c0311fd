//! Stitch arbitrary endpoints onto the campus graph.

use geo::Coord;

use super::{CampusGraph, NodeId, RoutingError};
use crate::haversine_km;

/// A campus route from a raw start coordinate to a raw end coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct CampusRoute {
    /// Graph nodes visited, in order.
    pub nodes: Vec<NodeId>,
    /// Polyline: the raw start, every path node, then the raw end.
    pub geometry: Vec<Coord<f64>>,
    /// Graph distance plus the straight first- and last-mile legs.
    pub distance_km: f64,
}

impl CampusGraph {
    /// Route between two coordinates over the campus graph.
    ///
    /// Endpoints are resolved to nodes (building names first), the nodes
    /// are joined by the shortest path, and the gaps between each raw
    /// coordinate and its node are added as straight legs. Those legs are an
    /// approximation, not routed walks.
    ///
    /// # Errors
    ///
    /// Propagates [`RoutingError`] when the resolved nodes are not
    /// connected.
    ///
    /// # Examples
    ///
    /// ```
    /// use geo::Coord;
    /// use smartpoi_core::{CampusBounds, CampusConfig, CampusGraph};
    /// use smartpoi_core::campus::{EdgeSpec, NodeSpec};
    ///
    /// let config = CampusConfig {
    ///     bounds: CampusBounds::new(0.0, 1.0, 0.0, 1.0),
    ///     nodes: vec![
    ///         NodeSpec { id: "a".into(), lat: 0.1, lon: 0.1 },
    ///         NodeSpec { id: "b".into(), lat: 0.2, lon: 0.1 },
    ///     ],
    ///     edges: vec![EdgeSpec { from: "a".into(), to: "b".into(), weight_m: 12_000.0 }],
    ///     aliases: Vec::new(),
    ///     exits: Vec::new(),
    /// };
    /// let graph = CampusGraph::build(&config)?;
    /// let route = graph.campus_route(
    ///     Coord { x: 0.1, y: 0.1 },
    ///     Coord { x: 0.1, y: 0.2 },
    ///     None,
    ///     None,
    /// )?;
    /// assert_eq!(route.geometry.len(), 4);
    /// assert!((route.distance_km - 12.0).abs() < 1e-9);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn campus_route(
        &self,
        start: Coord<f64>,
        end: Coord<f64>,
        start_building: Option<&str>,
        end_building: Option<&str>,
    ) -> Result<CampusRoute, RoutingError> {
        let from = self.resolve(start, start_building);
        let to = self.resolve(end, end_building);
        let path = self.shortest_path(from, to)?;

        let mut geometry = Vec::with_capacity(path.nodes.len() + 2);
        geometry.push(start);
        for node in &path.nodes {
            geometry.push(self.coord(*node).ok_or(RoutingError::UnknownNode { node: *node })?);
        }
        geometry.push(end);

        let first_leg = self.coord(from).map_or(0.0, |c| haversine_km(start, c));
        let last_leg = self.coord(to).map_or(0.0, |c| haversine_km(c, end));

        Ok(CampusRoute {
            nodes: path.nodes,
            geometry,
            distance_km: path.distance_m / 1000.0 + first_leg + last_leg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{lat_lon, sample_campus_config};
    use rstest::{fixture, rstest};

    #[fixture]
    fn graph() -> CampusGraph {
        CampusGraph::build(&sample_campus_config()).expect("sample config is valid")
    }

    #[rstest]
    fn endpoints_on_nodes_add_no_extra_legs(graph: CampusGraph) {
        let a = lat_lon(12.9240, 77.4990);
        let d = lat_lon(12.9230, 77.4990);
        let route = graph.campus_route(a, d, None, None).expect("connected");
        assert!((route.distance_km - 0.3).abs() < 1e-12);
        assert_eq!(route.geometry.first(), Some(&a));
        assert_eq!(route.geometry.last(), Some(&d));
        // start, a, b, c, d, end
        assert_eq!(route.geometry.len(), 6);
    }

    #[rstest]
    fn off_node_endpoints_add_first_and_last_mile(graph: CampusGraph) {
        let start = lat_lon(12.9241, 77.4990);
        let end = lat_lon(12.9229, 77.4990);
        let route = graph.campus_route(start, end, None, None).expect("connected");
        let legs = haversine_km(start, lat_lon(12.9240, 77.4990))
            + haversine_km(lat_lon(12.9230, 77.4990), end);
        assert!((route.distance_km - (0.3 + legs)).abs() < 1e-12);
    }

    #[rstest]
    fn building_names_pick_the_nodes(graph: CampusGraph) {
        let anywhere = lat_lon(12.9235, 77.4995);
        let route = graph
            .campus_route(anywhere, anywhere, Some("Main Gate"), Some("Library"))
            .expect("connected");
        let names: Vec<_> = route.nodes.iter().filter_map(|n| graph.name(*n)).collect();
        assert_eq!(names, ["gate", "a", "b", "c"]);
    }

    #[rstest]
    fn same_node_yields_three_point_polyline(graph: CampusGraph) {
        let start = lat_lon(12.92401, 77.49901);
        let end = lat_lon(12.92399, 77.49899);
        let route = graph.campus_route(start, end, None, None).expect("same node");
        assert_eq!(route.nodes.len(), 1);
        assert_eq!(route.geometry.len(), 3);
    }

    #[rstest]
    fn disconnected_endpoints_propagate_failure(graph: CampusGraph) {
        let start = lat_lon(12.9240, 77.4990);
        let isolated = lat_lon(12.9222, 77.5008);
        let err = graph
            .campus_route(start, isolated, None, None)
            .expect_err("isolated target");
        assert!(matches!(err, RoutingError::Unreachable { .. }));
    }
}
