use std::collections::HashMap;
use std::f64::consts::{PI, TAU};
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::graph::{Graph, GraphError, NodeId};
use crate::spatial::geodesic::earth_coords;
use crate::spatial::spherical::{Geographic, SphericalError, SurfacePoint};

/// Kind of transport link between two places.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Rail,
    Ferry,
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkType::Rail => f.pad("rail"),
            LinkType::Ferry => f.pad("ferry"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Place {
    name: String,
    location: SurfacePoint,
}

impl Place {
    pub fn new(name: impl Into<String>, location: SurfacePoint) -> Self {
        Place {
            name: name.into(),
            location,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &SurfacePoint {
        &self.location
    }

    /// Latitude and longitude in degrees, longitude in `(-180, 180]`.
    pub fn lat_lon_degrees(&self) -> (f64, f64) {
        let loc = &self.location;
        let (mut latitude, mut longitude) = (loc.latitude(), loc.longitude());
        if loc.radius() < 0.0 {
            latitude = -latitude;
            longitude -= PI;
            if longitude <= -PI {
                longitude += TAU;
            }
        }
        (latitude.to_degrees(), longitude.to_degrees())
    }
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("unknown place: {name}")]
    UnknownPlace { name: String },
    #[error(transparent)]
    Spherical(#[from] SphericalError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Named places on the Earth joined by bidirectional typed links.
#[derive(Clone, Debug, Default)]
pub struct NetworkMap {
    pub(crate) graph: Graph<Place, LinkType>,
    places: HashMap<String, NodeId>,
}

impl NetworkMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn place(&self, name: &str) -> Option<&Place> {
        self.places.get(name).and_then(|node| self.graph.node(*node))
    }

    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.graph.nodes().map(|(_, place)| place)
    }

    /// Number of bidirectional connections.
    pub fn connection_count(&self) -> usize {
        self.graph.edge_count() / 2
    }

    /// Adds a place from degrees. Returns `false` if the name is taken.
    pub fn add_place(&mut self, name: &str, latitude: f64, longitude: f64) -> Result<bool, MapError> {
        if self.places.contains_key(name) {
            return Ok(false);
        }
        let location = earth_coords(latitude, longitude)?;
        let node = self.graph.add_node(Place::new(name, location));
        self.places.insert(name.to_string(), node);
        debug!("added place {name} at ({latitude}, {longitude})");
        Ok(true)
    }

    /// Removes a place and every connection to it. Returns `false` if absent.
    pub fn delete_place(&mut self, name: &str) -> bool {
        let Some(node) = self.places.remove(name) else {
            return false;
        };
        self.graph.delete_node(node).is_ok()
    }

    /// Links two existing places in both directions.
    pub fn add_connection(&mut self, name1: &str, name2: &str, link: LinkType) -> Result<(), MapError> {
        let a = self.node_of(name1)?;
        let b = self.node_of(name2)?;
        for (from, to) in [(a, b), (b, a)] {
            if self.graph.connected(&link, from, to) {
                return Err(GraphError::DuplicateEdge { from, to }.into());
            }
        }
        self.graph.add_edge(link, a, b)?;
        if a != b {
            self.graph.add_edge(link, b, a)?;
        }
        debug!("connected {name1} <-> {name2} by {link}");
        Ok(())
    }

    /// Removes both directions of a connection. Returns whether anything was
    /// removed.
    pub fn remove_connection(&mut self, name1: &str, name2: &str, link: LinkType) -> bool {
        let (Ok(a), Ok(b)) = (self.node_of(name1), self.node_of(name2)) else {
            return false;
        };
        let forward = self.graph.delete_edge_between(&link, a, b).is_ok();
        let backward = self.graph.delete_edge_between(&link, b, a).is_ok();
        forward || backward
    }

    pub fn connected(&self, name1: &str, name2: &str, link: LinkType) -> bool {
        match (self.places.get(name1), self.places.get(name2)) {
            (Some(a), Some(b)) => self.graph.connected(&link, *a, *b),
            _ => false,
        }
    }

    pub(crate) fn node_of(&self, name: &str) -> Result<NodeId, MapError> {
        self.places
            .get(name)
            .copied()
            .ok_or_else(|| MapError::UnknownPlace {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn channel() -> NetworkMap {
        let mut map = NetworkMap::new();
        map.add_place("paris", 48.856613, 2.352222).unwrap();
        map.add_place("london", 51.507222, -0.1275).unwrap();
        map.add_place("calais", 50.948056, 1.856389).unwrap();
        map
    }

    #[test]
    fn add_place_ignores_existing_names() {
        let mut map = channel();
        assert!(!map.add_place("paris", 0.0, 0.0).unwrap());
        let (lat, _) = map.place("paris").unwrap().lat_lon_degrees();
        assert_approx_eq!(lat, 48.856613, 1e-9);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn add_place_rejects_invalid_coordinates() {
        let mut map = NetworkMap::new();
        assert!(matches!(
            map.add_place("nowhere", 95.0, 0.0),
            Err(MapError::Spherical(SphericalError::Domain { .. }))
        ));
        assert!(map.is_empty());
    }

    #[test]
    fn place_round_trips_degrees() {
        let map = channel();
        let (lat, lon) = map.place("london").unwrap().lat_lon_degrees();
        assert_approx_eq!(lat, 51.507222, 1e-9);
        assert_approx_eq!(lon, -0.1275, 1e-9);
    }

    #[test]
    fn connections_are_bidirectional() {
        let mut map = channel();
        map.add_connection("paris", "london", LinkType::Rail).unwrap();
        assert!(map.connected("paris", "london", LinkType::Rail));
        assert!(map.connected("london", "paris", LinkType::Rail));
        assert!(!map.connected("london", "paris", LinkType::Ferry));
        assert_eq!(map.connection_count(), 1);

        assert!(map.remove_connection("london", "paris", LinkType::Rail));
        assert!(!map.connected("paris", "london", LinkType::Rail));
        assert!(!map.connected("london", "paris", LinkType::Rail));
        assert!(!map.remove_connection("london", "paris", LinkType::Rail));
    }

    #[test]
    fn connection_requires_both_places() {
        let mut map = channel();
        assert!(matches!(
            map.add_connection("paris", "atlantis", LinkType::Ferry),
            Err(MapError::UnknownPlace { name }) if name == "atlantis"
        ));
        assert!(matches!(
            map.add_connection("atlantis", "paris", LinkType::Ferry),
            Err(MapError::UnknownPlace { .. })
        ));
        assert_eq!(map.connection_count(), 0);
    }

    #[test]
    fn duplicate_connection_is_rejected_whole() {
        let mut map = channel();
        map.add_connection("paris", "calais", LinkType::Rail).unwrap();
        assert!(matches!(
            map.add_connection("calais", "paris", LinkType::Rail),
            Err(MapError::Graph(GraphError::DuplicateEdge { .. }))
        ));
        map.add_connection("calais", "paris", LinkType::Ferry).unwrap();
        assert_eq!(map.connection_count(), 2);
    }

    #[test]
    fn deleting_a_place_drops_its_connections() {
        let mut map = channel();
        map.add_connection("paris", "calais", LinkType::Rail).unwrap();
        map.add_connection("calais", "london", LinkType::Ferry).unwrap();
        assert!(map.delete_place("calais"));
        assert!(!map.delete_place("calais"));
        assert_eq!(map.connection_count(), 0);
        assert!(map.place("calais").is_none());
        assert_eq!(map.places().count(), 2);
    }
}
