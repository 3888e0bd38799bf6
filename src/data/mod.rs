use std::env;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::network::{LinkType, MapError, NetworkMap};

/// Environment variable naming a JSON scenario file to load instead of the
/// built-in one.
pub const SCENARIO_ENV: &str = "EARTHMAP_SCENARIO";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scenario parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid scenario: {0}")]
    Map(#[from] MapError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    /// Degrees in `[-90, 90]`.
    pub latitude: f64,
    /// Degrees in `(-180, 180]`.
    pub longitude: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub from: String,
    pub to: String,
    pub link: LinkType,
}

/// Places and connections used to seed a [`NetworkMap`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub places: Vec<PlaceRecord>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

impl Scenario {
    /// Builds the map. Invalid coordinates abort the build; connections to
    /// unknown places are skipped with a warning.
    pub fn build(&self) -> Result<NetworkMap, DataError> {
        let mut map = NetworkMap::new();
        for place in &self.places {
            if !map.add_place(&place.name, place.latitude, place.longitude)? {
                warn!("duplicate place {} ignored", place.name);
            }
        }
        for connection in &self.connections {
            match map.add_connection(&connection.from, &connection.to, connection.link) {
                Ok(()) => {}
                Err(MapError::UnknownPlace { name }) => {
                    warn!(
                        "skipping {} connection {} <-> {}: unknown place {}",
                        connection.link, connection.from, connection.to, name
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }
        info!(
            "scenario loaded: {} places, {} connections",
            map.len(),
            map.connection_count()
        );
        Ok(map)
    }
}

/// The English Channel network: British and French towns joined by rail and
/// ferry.
pub fn builtin_scenario() -> Scenario {
    let places = [
        ("bordeaux", 44.84, -0.58),
        ("brest", 48.39, -4.49),
        ("calais", 50.948056, 1.856389),
        ("douvres", 45.9897, 5.3739),
        ("edinburgh", 55.953, -3.189),
        ("lehavre", 49.49, 0.1),
        ("londres", 51.507222, -0.1275),
        ("paris", 48.856613, 2.352222),
        ("plymouth", 50.371389, -4.142222),
        ("portsmouth", 50.805833, -1.087222),
        ("quimper", 47.9967, -4.0964),
        ("rennes", 48.1147, -1.6794),
    ];
    let connections = [
        ("edinburgh", "londres", LinkType::Rail),
        ("londres", "plymouth", LinkType::Rail),
        ("londres", "portsmouth", LinkType::Rail),
        ("londres", "douvres", LinkType::Rail),
        ("plymouth", "brest", LinkType::Ferry),
        ("portsmouth", "lehavre", LinkType::Ferry),
        ("douvres", "calais", LinkType::Ferry),
        ("brest", "rennes", LinkType::Rail),
        ("brest", "bordeaux", LinkType::Ferry),
        ("lehavre", "paris", LinkType::Ferry),
        ("calais", "paris", LinkType::Rail),
        ("rennes", "quimper", LinkType::Rail),
        ("rennes", "paris", LinkType::Rail),
        ("bordeaux", "quimper", LinkType::Rail),
        ("bordeaux", "paris", LinkType::Rail),
    ];

    Scenario {
        places: places
            .into_iter()
            .map(|(name, latitude, longitude)| PlaceRecord {
                name: name.to_string(),
                latitude,
                longitude,
            })
            .collect(),
        connections: connections
            .into_iter()
            .map(|(from, to, link)| ConnectionRecord {
                from: from.to_string(),
                to: to.to_string(),
                link,
            })
            .collect(),
    }
}

pub fn parse_scenario(json: &str) -> Result<Scenario, DataError> {
    Ok(serde_json::from_str(json)?)
}

pub fn read_scenario_from_file<P: AsRef<Path>>(path: P) -> Result<Scenario, DataError> {
    let text = fs::read_to_string(path)?;
    parse_scenario(&text)
}

/// Scenario named by [`SCENARIO_ENV`], or the built-in one when unset.
pub fn scenario_from_env() -> Result<Scenario, DataError> {
    match env::var_os(SCENARIO_ENV) {
        Some(path) => {
            info!("loading scenario from {}", Path::new(&path).display());
            read_scenario_from_file(path)
        }
        None => Ok(builtin_scenario()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_scenario_builds_full_network() {
        let map = builtin_scenario().build().expect("builtin scenario");
        assert_eq!(map.len(), 12);
        assert_eq!(map.connection_count(), 15);
        assert!(map.connected("douvres", "calais", LinkType::Ferry));
        assert!(map.connected("calais", "douvres", LinkType::Ferry));
    }

    #[test]
    fn parses_json_scenario() {
        let json = r#"{
            "places": [
                {"name": "paris", "latitude": 48.856613, "longitude": 2.352222},
                {"name": "london", "latitude": 51.507222, "longitude": -0.1275}
            ],
            "connections": [{"from": "paris", "to": "london", "link": "rail"}]
        }"#;
        let scenario = parse_scenario(json).unwrap();
        assert_eq!(scenario.connections[0].link, LinkType::Rail);
        let map = scenario.build().unwrap();
        assert!(map.connected("london", "paris", LinkType::Rail));
    }

    #[test]
    fn connections_may_be_omitted() {
        let scenario = parse_scenario(r#"{"places": []}"#).unwrap();
        assert!(scenario.connections.is_empty());
        assert!(scenario.build().unwrap().is_empty());
    }

    #[test]
    fn unknown_link_type_is_a_parse_error() {
        let json = r#"{"places": [], "connections": [{"from": "a", "to": "b", "link": "canal"}]}"#;
        assert!(matches!(parse_scenario(json), Err(DataError::Parse(_))));
    }

    #[test]
    fn dangling_connection_is_skipped() {
        let scenario = Scenario {
            places: vec![PlaceRecord {
                name: "paris".into(),
                latitude: 48.856613,
                longitude: 2.352222,
            }],
            connections: vec![ConnectionRecord {
                from: "paris".into(),
                to: "atlantis".into(),
                link: LinkType::Ferry,
            }],
        };
        let map = scenario.build().unwrap();
        assert_eq!(map.connection_count(), 0);
    }

    #[test]
    fn bad_coordinates_fail_the_build() {
        let scenario = Scenario {
            places: vec![PlaceRecord {
                name: "nowhere".into(),
                latitude: 120.0,
                longitude: 0.0,
            }],
            connections: Vec::new(),
        };
        assert!(matches!(scenario.build(), Err(DataError::Map(_))));
    }
}
