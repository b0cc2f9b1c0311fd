//! Fixtures shared by unit and behaviour tests.
//!
//! The sample campus is a small square with a detour, an exit hanging off
//! one corner and an isolated node:
//!
//! ```text
//!   gate
//!    |90
//!    a ---100--- b
//!    |           |
//!   350         100
//!    |           |
//!    d ---100--- c          isolated
//! ```
//!
//! The shortest `a -> d` path therefore runs through `b` and `c` (300 m)
//! rather than along the direct 350 m edge.

use geo::Coord;

use crate::campus::{AliasSpec, EdgeSpec, NodeSpec};
use crate::{CampusBounds, CampusConfig};

/// Build a [`NodeSpec`].
#[must_use]
pub fn node(id: &str, lat: f64, lon: f64) -> NodeSpec {
    NodeSpec {
        id: id.to_owned(),
        lat,
        lon,
    }
}

/// Build an [`EdgeSpec`].
#[must_use]
pub fn edge(from: &str, to: &str, weight_m: f64) -> EdgeSpec {
    EdgeSpec {
        from: from.to_owned(),
        to: to.to_owned(),
        weight_m,
    }
}

/// Build an [`AliasSpec`].
#[must_use]
pub fn alias(name: &str, node: &str) -> AliasSpec {
    AliasSpec {
        name: name.to_owned(),
        node: node.to_owned(),
    }
}

/// Shorthand for a `geo` coordinate given as latitude then longitude.
#[must_use]
pub const fn lat_lon(lat: f64, lon: f64) -> Coord<f64> {
    Coord { x: lon, y: lat }
}

/// Bounds used by [`sample_campus_config`].
#[must_use]
pub const fn sample_bounds() -> CampusBounds {
    CampusBounds::new(12.9220, 12.9250, 77.4980, 77.5010)
}

/// The small campus drawn in the module documentation.
#[must_use]
pub fn sample_campus_config() -> CampusConfig {
    CampusConfig {
        bounds: sample_bounds(),
        nodes: vec![
            node("a", 12.9240, 77.4990),
            node("b", 12.9240, 77.5000),
            node("c", 12.9230, 77.5000),
            node("d", 12.9230, 77.4990),
            node("gate", 12.9248, 77.4990),
            node("isolated", 12.9222, 77.5008),
        ],
        edges: vec![
            edge("a", "b", 100.0),
            edge("b", "c", 100.0),
            edge("c", "d", 100.0),
            edge("a", "d", 350.0),
            edge("gate", "a", 90.0),
        ],
        aliases: vec![alias("Main Gate", "gate"), alias("Library", "c")],
        exits: vec!["gate".to_owned()],
    }
}
