use std::collections::HashMap;
use std::fmt;

use log::debug;
use thiserror::Error;

use crate::graph::arena::{Arena, Key};

/// Handle to a node owned by a [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Key);

/// Handle to an edge owned by a [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(Key);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}.{}", self.0.index, self.0.generation)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge {}.{}", self.0.index, self.0.generation)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("{0} is not in the graph")]
    NodeNotFound(NodeId),
    #[error("{0} is not in the graph")]
    EdgeNotFound(EdgeId),
    #[error("no matching edge from {from} to {to}")]
    NoMatchingEdge { from: NodeId, to: NodeId },
    #[error("an equal edge already goes from {from} to {to}")]
    DuplicateEdge { from: NodeId, to: NodeId },
}

/// Directed multigraph with node payloads `N` and edge annotations `E`.
///
/// Endpoints live in the incidence tables rather than in the edges, and
/// every edge in the graph has both endpoints present: removing a node
/// removes every edge that touches it.
#[derive(Clone, Debug)]
pub struct Graph<N, E> {
    nodes: Arena<N>,
    edges: Arena<E>,
    /// outgoing[n] lists edges leaving n in insertion order
    outgoing: HashMap<NodeId, Vec<EdgeId>>,
    incoming: HashMap<NodeId, Vec<EdgeId>>,
    endpoints: HashMap<EdgeId, (NodeId, NodeId)>,
}

impl<N, E> Default for Graph<N, E> {
    fn default() -> Self {
        Graph {
            nodes: Arena::default(),
            edges: Arena::default(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            endpoints: HashMap::new(),
        }
    }
}

impl<N, E> Graph<N, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(node.0)
    }

    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(edge.0)
    }

    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.0)
    }

    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(node.0)
    }

    pub fn edge(&self, edge: EdgeId) -> Option<&E> {
        self.edges.get(edge.0)
    }

    /// `(source, destination)` of an edge.
    pub fn endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.endpoints.get(&edge).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> {
        self.nodes.iter().map(|(key, data)| (NodeId(key), data))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &E)> {
        self.edges.iter().map(|(key, data)| (EdgeId(key), data))
    }

    /// Edges leaving `node`, in insertion order.
    pub fn outgoing(&self, node: NodeId) -> &[EdgeId] {
        self.outgoing.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges arriving at `node`, in insertion order.
    pub fn incoming(&self, node: NodeId) -> &[EdgeId] {
        self.incoming.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId(self.nodes.insert(data));
        self.outgoing.insert(id, Vec::new());
        self.incoming.insert(id, Vec::new());
        id
    }

    /// Removes `node` together with every edge that starts or ends at it.
    pub fn delete_node(&mut self, node: NodeId) -> Result<N, GraphError> {
        let data = self
            .nodes
            .remove(node.0)
            .ok_or(GraphError::NodeNotFound(node))?;

        let mut touching = self.outgoing.remove(&node).unwrap_or_default();
        touching.extend(self.incoming.remove(&node).unwrap_or_default());
        let mut removed = 0;
        for edge in touching {
            // self-loops appear in both lists
            if self.unlink_edge(edge).is_some() {
                removed += 1;
            }
        }
        debug!("deleted {node} and {removed} incident edges");
        Ok(data)
    }

    pub fn delete_edge(&mut self, edge: EdgeId) -> Result<E, GraphError> {
        self.unlink_edge(edge).ok_or(GraphError::EdgeNotFound(edge))
    }

    /// Removes every edge going from `from` to `to`, whatever its annotation.
    pub fn delete_edges_between(&mut self, from: NodeId, to: NodeId) -> Result<usize, GraphError> {
        self.require_node(from)?;
        self.require_node(to)?;
        let matching: Vec<EdgeId> = self
            .outgoing(from)
            .iter()
            .copied()
            .filter(|edge| self.endpoints(*edge).map(|(_, dst)| dst) == Some(to))
            .collect();
        for edge in &matching {
            self.unlink_edge(*edge);
        }
        Ok(matching.len())
    }

    fn require_node(&self, node: NodeId) -> Result<(), GraphError> {
        if self.contains_node(node) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound(node))
        }
    }

    fn unlink_edge(&mut self, edge: EdgeId) -> Option<E> {
        let annotation = self.edges.remove(edge.0)?;
        if let Some((from, to)) = self.endpoints.remove(&edge) {
            if let Some(list) = self.outgoing.get_mut(&from) {
                list.retain(|e| *e != edge);
            }
            if let Some(list) = self.incoming.get_mut(&to) {
                list.retain(|e| *e != edge);
            }
        }
        Some(annotation)
    }
}

impl<N, E: PartialEq> Graph<N, E> {
    /// Adds a directed edge; an equal annotation may link a pair only once
    /// per direction.
    pub fn add_edge(&mut self, annotation: E, from: NodeId, to: NodeId) -> Result<EdgeId, GraphError> {
        self.require_node(from)?;
        self.require_node(to)?;
        if self.connected(&annotation, from, to) {
            return Err(GraphError::DuplicateEdge { from, to });
        }
        let edge = EdgeId(self.edges.insert(annotation));
        self.endpoints.insert(edge, (from, to));
        self.outgoing.entry(from).or_default().push(edge);
        self.incoming.entry(to).or_default().push(edge);
        Ok(edge)
    }

    /// Looks only at the edges leaving `from`.
    pub fn find_edge(&self, annotation: &E, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.outgoing(from).iter().copied().find(|edge| {
            self.endpoints(*edge).map(|(_, dst)| dst) == Some(to)
                && self.edge(*edge) == Some(annotation)
        })
    }

    pub fn connected(&self, annotation: &E, from: NodeId, to: NodeId) -> bool {
        self.find_edge(annotation, from, to).is_some()
    }

    pub fn delete_edge_between(&mut self, annotation: &E, from: NodeId, to: NodeId) -> Result<E, GraphError> {
        let edge = self
            .find_edge(annotation, from, to)
            .ok_or(GraphError::NoMatchingEdge { from, to })?;
        self.delete_edge(edge)
    }
}

impl<N: PartialEq, E> Graph<N, E> {
    /// First node, in slot order, whose payload equals `data`.
    pub fn find_node(&self, data: &N) -> Option<NodeId> {
        self.nodes()
            .find(|(_, candidate)| *candidate == data)
            .map(|(id, _)| id)
    }
}
