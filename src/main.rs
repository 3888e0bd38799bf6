use earthmap_engine::data::scenario_from_env;
use earthmap_engine::map::network::NetworkMap;
use earthmap_engine::LinkType;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use log::error;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static NETWORK: Lazy<Result<NetworkMap, String>> = Lazy::new(|| {
    scenario_from_env()
        .and_then(|scenario| scenario.build())
        .map_err(|err| {
            error!("failed to load scenario: {err}");
            err.to_string()
        })
});

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EngineRequest {
    Distance { from: String, to: String },
    Route { from: String, to: String },
    Places,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EngineResponse {
    Distance {
        from: String,
        to: String,
        meters: f64,
    },
    Route {
        stops: Vec<StopResult>,
        total_distance: f64,
    },
    Unreachable {
        from: String,
        to: String,
    },
    Places {
        places: Vec<PlaceResult>,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Serialize)]
struct StopResult {
    name: String,
    link: Option<LinkType>,
    cumulative_distance: f64,
}

#[derive(Debug, Serialize)]
struct PlaceResult {
    name: String,
    latitude: f64,
    longitude: f64,
}

async fn handler(event: LambdaEvent<EngineRequest>) -> Result<EngineResponse, Error> {
    let map = match &*NETWORK {
        Ok(map) => map,
        Err(message) => {
            return Ok(EngineResponse::Error {
                message: message.clone(),
            })
        }
    };
    Ok(respond(map, event.payload))
}

fn respond(map: &NetworkMap, req: EngineRequest) -> EngineResponse {
    match req {
        EngineRequest::Distance { from, to } => match map.distance(&from, &to) {
            Ok(Some(meters)) => EngineResponse::Distance { from, to, meters },
            Ok(None) => EngineResponse::Unreachable { from, to },
            Err(err) => EngineResponse::Error {
                message: err.to_string(),
            },
        },
        EngineRequest::Route { from, to } => match map.route(&from, &to) {
            Ok(Some(route)) => {
                let total_distance = route.total_distance();
                let stops = route
                    .stops
                    .into_iter()
                    .map(|stop| StopResult {
                        name: stop.name,
                        link: stop.link,
                        cumulative_distance: stop.cumulative_distance,
                    })
                    .collect();
                EngineResponse::Route {
                    stops,
                    total_distance,
                }
            }
            Ok(None) => EngineResponse::Unreachable { from, to },
            Err(err) => EngineResponse::Error {
                message: err.to_string(),
            },
        },
        EngineRequest::Places => {
            let mut places: Vec<PlaceResult> = map
                .places()
                .map(|place| {
                    let (latitude, longitude) = place.lat_lon_degrees();
                    PlaceResult {
                        name: place.name().to_string(),
                        latitude,
                        longitude,
                    }
                })
                .collect();
            places.sort_by(|a, b| a.name.cmp(&b.name));
            EngineResponse::Places { places }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let func = service_fn(handler);
    lambda_runtime::run(func).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthmap_engine::builtin_scenario;

    #[test]
    fn route_request_lists_stops() {
        let map = builtin_scenario().build().unwrap();
        let response = respond(
            &map,
            EngineRequest::Route {
                from: "londres".into(),
                to: "paris".into(),
            },
        );
        match response {
            EngineResponse::Route { stops, total_distance } => {
                assert_eq!(stops.first().map(|s| s.name.as_str()), Some("londres"));
                assert_eq!(stops.last().map(|s| s.name.as_str()), Some("paris"));
                assert!(total_distance > 0.0);
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn disconnected_places_are_unreachable_for_both_requests() {
        let mut map = NetworkMap::new();
        map.add_place("paris", 48.856613, 2.352222).unwrap();
        map.add_place("reykjavik", 64.146582, -21.942635).unwrap();
        let distance = respond(
            &map,
            EngineRequest::Distance {
                from: "paris".into(),
                to: "reykjavik".into(),
            },
        );
        assert!(matches!(distance, EngineResponse::Unreachable { ref to, .. } if to == "reykjavik"));
        let route = respond(
            &map,
            EngineRequest::Route {
                from: "paris".into(),
                to: "reykjavik".into(),
            },
        );
        assert!(matches!(route, EngineResponse::Unreachable { .. }));
    }

    #[test]
    fn unknown_place_becomes_error_response() {
        let map = builtin_scenario().build().unwrap();
        let response = respond(
            &map,
            EngineRequest::Distance {
                from: "paris".into(),
                to: "atlantis".into(),
            },
        );
        assert!(matches!(response, EngineResponse::Error { .. }));
    }
}
