use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::graph::graph::{EdgeId, NodeId};
use crate::graph::traversal::{Step, Visit, Visitor};
use crate::map::network::{LinkType, MapError, NetworkMap, Place};
use crate::spatial::geodesic::great_circle_distance;
use crate::spatial::spherical::SphericalError;

/// Accumulates great-circle path costs while the graph is walked
/// breadth-first, stopping once the goal is expanded.
///
/// Nodes are expanded in hop order, not cost order, so the cost kept for the
/// goal is the best one seen along the paths explored so far, which is not
/// necessarily the geodesically shortest route.
#[derive(Debug)]
struct CostAccumulator {
    goal: NodeId,
    costs: HashMap<NodeId, f64>,
    /// cheapest known predecessor and the edge used from it
    via: HashMap<NodeId, (NodeId, EdgeId)>,
    error: Option<SphericalError>,
}

impl CostAccumulator {
    fn new(start: NodeId, goal: NodeId) -> Self {
        CostAccumulator {
            goal,
            costs: HashMap::from([(start, 0.0)]),
            via: HashMap::new(),
            error: None,
        }
    }
}

impl Visitor<Place, LinkType> for CostAccumulator {
    fn visit(&mut self, step: Step<'_, Place, LinkType>) -> Visit {
        if let Some(&cost_so_far) = self.costs.get(&step.from) {
            let leg = match great_circle_distance(step.from_data.location(), step.to_data.location()) {
                Ok(leg) => leg,
                Err(err) => {
                    self.error = Some(err);
                    return Visit::Stop;
                }
            };
            let candidate = cost_so_far + leg;
            let improves = self
                .costs
                .get(&step.to)
                .map_or(true, |&known| candidate < known);
            if improves {
                self.costs.insert(step.to, candidate);
                self.via.insert(step.to, (step.from, step.edge));
            }
        }
        if step.from == self.goal {
            Visit::Stop
        } else {
            Visit::Continue
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteStop {
    pub name: String,
    /// Link taken to reach this stop; `None` for the origin.
    pub link: Option<LinkType>,
    /// Metres travelled from the origin.
    pub cumulative_distance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    pub stops: Vec<RouteStop>,
}

impl Route {
    pub fn total_distance(&self) -> f64 {
        self.stops.last().map_or(0.0, |stop| stop.cumulative_distance)
    }
}

impl NetworkMap {
    /// Travel distance in metres from `from` to `to` along the network, or
    /// `None` when no connection chain links them.
    pub fn distance(&self, from: &str, to: &str) -> Result<Option<f64>, MapError> {
        let goal = self.node_of(to)?;
        Ok(self
            .accumulate(from, goal)?
            .and_then(|acc| acc.costs.get(&goal).copied()))
    }

    /// Stops along the path whose cost [`NetworkMap::distance`] reports.
    pub fn route(&self, from: &str, to: &str) -> Result<Option<Route>, MapError> {
        let start = self.node_of(from)?;
        let goal = self.node_of(to)?;
        let Some(acc) = self.accumulate(from, goal)? else {
            return Ok(None);
        };

        let mut chain: Vec<(NodeId, Option<LinkType>)> = vec![(goal, None)];
        let mut current = goal;
        while current != start && chain.len() <= self.graph.node_count() {
            let Some(&(previous, edge)) = acc.via.get(&current) else {
                break;
            };
            if let Some(last) = chain.last_mut() {
                last.1 = self.graph.edge(edge).copied();
            }
            chain.push((previous, None));
            current = previous;
        }
        chain.reverse();

        let stops = chain
            .into_iter()
            .filter_map(|(node, link)| {
                let place = self.graph.node(node)?;
                Some(RouteStop {
                    name: place.name().to_string(),
                    link,
                    cumulative_distance: acc.costs.get(&node).copied().unwrap_or(0.0),
                })
            })
            .collect();
        Ok(Some(Route { stops }))
    }

    fn accumulate(&self, from: &str, goal: NodeId) -> Result<Option<CostAccumulator>, MapError> {
        let start = self.node_of(from)?;
        let traversal = self
            .graph
            .breadth_first(start, CostAccumulator::new(start, goal))?;
        let mut acc = traversal.visitor;
        if let Some(err) = acc.error.take() {
            return Err(err.into());
        }
        if acc.costs.contains_key(&goal) {
            Ok(Some(acc))
        } else {
            debug!("{from} does not reach the requested destination");
            Ok(None)
        }
    }
}
