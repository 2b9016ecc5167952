// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Overpass element model and buildable footprint filter

use crate::error::Result;
use crate::georef::GeoPoint;
use crate::tags::TagMap;
use serde::Deserialize;
use std::sync::Arc;

/// OSM element id
pub type FootprintId = u64;

/// Top-level Overpass `[out:json]` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// One element of an Overpass `out geom` response.
///
/// Only the fields needed to build footprints are decoded; everything else
/// in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: FootprintId,
    #[serde(default)]
    pub tags: Option<TagMap>,
    /// Inline node coordinates. Overpass writes `null` for nodes it could not
    /// resolve, so each entry is optional.
    #[serde(default)]
    pub geometry: Option<Vec<Option<GeoPoint>>>,
}

impl Element {
    /// Way carrying a `building` or `building:part` tag and inline geometry
    pub fn is_building_way(&self) -> bool {
        self.kind == "way"
            && self
                .tags
                .as_ref()
                .is_some_and(|tags| tags.contains("building") || tags.contains("building:part"))
            && self.geometry.is_some()
    }
}

/// A building outline plus its tags
#[derive(Debug, Clone)]
pub struct Footprint {
    pub id: FootprintId,
    /// Boundary in source order; first and last point may or may not coincide
    pub ring: Vec<GeoPoint>,
    pub tags: Arc<TagMap>,
}

impl Footprint {
    pub fn new(id: FootprintId, ring: Vec<GeoPoint>, tags: TagMap) -> Self {
        Self {
            id,
            ring,
            tags: Arc::new(tags),
        }
    }

    /// Number of distinct coordinates in the ring
    pub fn distinct_points(&self) -> usize {
        let mut distinct: Vec<GeoPoint> = Vec::with_capacity(self.ring.len());
        for point in &self.ring {
            if !distinct.contains(point) {
                distinct.push(*point);
            }
        }
        distinct.len()
    }

    /// A ring needs at least three distinct points to enclose an area
    #[inline]
    pub fn is_buildable(&self) -> bool {
        self.ring.len() >= 3 && self.distinct_points() >= 3
    }
}

/// Decode an Overpass JSON payload. A payload without `elements` yields an
/// empty list.
pub fn parse_elements(json: &str) -> Result<Vec<Element>> {
    let response: OverpassResponse = serde_json::from_str(json)?;
    Ok(response.elements)
}

/// Keep building ways with geometry and convert them to footprints.
///
/// Degenerate rings are kept here; rejecting them is the solid builder's job.
pub fn buildable_footprints(elements: Vec<Element>) -> Vec<Footprint> {
    elements
        .into_iter()
        .filter(Element::is_building_way)
        .map(|element| {
            let ring = element
                .geometry
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .collect();
            Footprint::new(element.id, ring, element.tags.unwrap_or_default())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "version": 0.6,
        "elements": [
            {"type": "way", "id": 1, "tags": {"building": "yes", "height": "9"},
             "bounds": {"minlat": 44.8, "minlon": 20.4, "maxlat": 44.9, "maxlon": 20.5},
             "nodes": [10, 11, 12, 10],
             "geometry": [{"lat": 44.818, "lon": 20.405}, {"lat": 44.818, "lon": 20.406},
                          {"lat": 44.819, "lon": 20.406}, {"lat": 44.818, "lon": 20.405}]},
            {"type": "way", "id": 2, "tags": {"building:part": "yes"},
             "geometry": [{"lat": 44.818, "lon": 20.405}, null, {"lat": 44.819, "lon": 20.406},
                          {"lat": 44.819, "lon": 20.405}]},
            {"type": "way", "id": 3, "tags": {"highway": "residential"},
             "geometry": [{"lat": 44.818, "lon": 20.405}, {"lat": 44.819, "lon": 20.406}]},
            {"type": "way", "id": 4, "tags": {"building": "yes"}},
            {"type": "relation", "id": 5, "tags": {"building": "yes"}, "members": []},
            {"type": "node", "id": 6, "lat": 44.818, "lon": 20.405, "tags": {"building": "yes"}},
            {"type": "way", "id": 7, "geometry": [{"lat": 44.818, "lon": 20.405}]}
        ]
    }"#;

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let elements = parse_elements(PAYLOAD).unwrap();
        assert_eq!(elements.len(), 7);
        assert_eq!(elements[0].kind, "way");
        assert_eq!(elements[0].geometry.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn test_missing_elements_is_empty() {
        assert!(parse_elements(r#"{"remark": "runtime error"}"#).unwrap().is_empty());
        assert!(parse_elements("not json").is_err());
    }

    #[test]
    fn test_filter_keeps_building_ways_with_geometry() {
        let footprints = buildable_footprints(parse_elements(PAYLOAD).unwrap());
        let ids: Vec<_> = footprints.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(footprints[0].tags.get("height"), Some("9"));
    }

    #[test]
    fn test_null_nodes_are_dropped() {
        let footprints = buildable_footprints(parse_elements(PAYLOAD).unwrap());
        assert_eq!(footprints[1].ring.len(), 3);
    }

    #[test]
    fn test_short_rings_pass_the_filter() {
        // rings are checked by the solid builder, not the filter
        let json = r#"{"elements": [
            {"type": "way", "id": 8, "tags": {"building": "yes"},
             "geometry": [{"lat": 44.818, "lon": 20.405}, {"lat": 44.818, "lon": 20.406}]}
        ]}"#;
        let footprints = buildable_footprints(parse_elements(json).unwrap());
        assert_eq!(footprints.len(), 1);
        assert_eq!(footprints[0].ring.len(), 2);
    }

    #[test]
    fn test_buildable_needs_three_distinct_points() {
        let a = GeoPoint::new(44.818, 20.405);
        let b = GeoPoint::new(44.818, 20.406);
        let c = GeoPoint::new(44.819, 20.406);

        assert!(Footprint::new(1, vec![a, b, c], TagMap::new()).is_buildable());
        assert!(Footprint::new(1, vec![a, b, c, a], TagMap::new()).is_buildable());
        assert!(!Footprint::new(1, vec![a, b], TagMap::new()).is_buildable());
        assert!(!Footprint::new(1, vec![a, b, a], TagMap::new()).is_buildable());
        assert_eq!(Footprint::new(1, vec![a, b, a, b], TagMap::new()).distinct_points(), 2);
    }
}
