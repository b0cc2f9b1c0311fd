//! Response types for the ORS directions endpoint.
//!
//! Only the parts the engine reads are modelled: the first feature's line
//! geometry and its summary. Missing summary fields read as zero.
//!
//! See: <https://openrouteservice.org/dev/#/api-docs/v2/directions>

use geo::Coord;
use serde::Deserialize;

/// GeoJSON feature collection returned by `GET /v2/directions/{profile}`.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub geometry: LineString,
    #[serde(default)]
    pub properties: Properties,
}

/// Positions are `[lon, lat]` with an optional trailing elevation.
#[derive(Debug, Deserialize)]
pub struct LineString {
    pub coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub summary: Summary,
}

#[derive(Debug, Default, Deserialize)]
pub struct Summary {
    /// Metres.
    #[serde(default)]
    pub distance: f64,
    /// Seconds.
    #[serde(default)]
    pub duration: f64,
}

impl LineString {
    /// Convert positions to coordinates, or report the first short position.
    pub fn to_coords(&self) -> Result<Vec<Coord<f64>>, usize> {
        self.coordinates
            .iter()
            .enumerate()
            .map(|(index, position)| match position.as_slice() {
                [lon, lat, ..] => Ok(Coord { x: *lon, y: *lat }),
                _ => Err(index),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_route_with_elevation() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[77.5, 12.9, 920.0], [77.6, 13.0, 915.0]]},
                "properties": {"summary": {"distance": 15230.4, "duration": 1210.0}}
            }]
        }"#;

        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        let feature = response.features.first().expect("one feature");
        assert_eq!(feature.properties.summary.distance, 15230.4);
        let coords = feature.geometry.to_coords().expect("valid positions");
        assert_eq!(coords[1], Coord { x: 77.6, y: 13.0 });
    }

    #[test]
    fn missing_summary_reads_as_zero() {
        let json = r#"{"features": [{"geometry": {"coordinates": [[77.5, 12.9]]}, "properties": {}}]}"#;

        let response: DirectionsResponse = serde_json::from_str(json).expect("should deserialise");

        let summary = &response.features[0].properties.summary;
        assert_eq!(summary.distance, 0.0);
        assert_eq!(summary.duration, 0.0);
    }

    #[test]
    fn short_positions_are_reported() {
        let line = LineString {
            coordinates: vec![vec![77.5, 12.9], vec![77.6]],
        };
        assert_eq!(line.to_coords(), Err(1));
    }

    #[test]
    fn empty_collection_has_no_features() {
        let response: DirectionsResponse =
            serde_json::from_str(r#"{"type": "FeatureCollection"}"#).expect("should deserialise");
        assert!(response.features.is_empty());
    }
}
