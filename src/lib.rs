pub mod data;
pub mod graph;
pub mod map;
pub mod spatial;

pub use data::{builtin_scenario, Scenario};
pub use graph::graph::{EdgeId, Graph, GraphError, NodeId};
pub use graph::traversal::{Step, TraversalState, Visit, Visitor};
pub use map::distance::{Route, RouteStop};
pub use map::network::{LinkType, MapError, NetworkMap, Place};
pub use spatial::geodesic::{earth_coords, great_circle_distance, EARTH_RADIUS_M};
pub use spatial::spherical::{Geographic, SphericalError, SphericalPoint, SurfacePoint};
