use std::collections::{HashSet, VecDeque};

use log::debug;

use crate::graph::graph::{EdgeId, Graph, GraphError, NodeId};

/// Decision returned by a [`Visitor`] after each examined edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    Continue,
    Stop,
}

/// How a traversal ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalState {
    /// Every reachable node was dequeued.
    Finished,
    /// A visitor returned [`Visit::Stop`].
    Stopped,
}

/// One outgoing edge of the node being expanded.
#[derive(Debug)]
pub struct Step<'g, N, E> {
    pub from: NodeId,
    pub to: NodeId,
    pub edge: EdgeId,
    pub from_data: &'g N,
    pub to_data: &'g N,
    pub annotation: &'g E,
}

impl<N, E> Clone for Step<'_, N, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N, E> Copy for Step<'_, N, E> {}

/// Accumulator threaded through a whole traversal.
pub trait Visitor<N, E> {
    fn visit(&mut self, step: Step<'_, N, E>) -> Visit;
}

/// Adapts a closure to [`Visitor`].
pub struct FnVisitor<F>(pub F);

impl<N, E, F> Visitor<N, E> for FnVisitor<F>
where
    F: FnMut(Step<'_, N, E>) -> Visit,
{
    fn visit(&mut self, step: Step<'_, N, E>) -> Visit {
        (self.0)(step)
    }
}

/// Result of [`Graph::breadth_first`]: the visitor handed back plus how the
/// traversal ended.
#[derive(Debug)]
pub struct Traversal<V> {
    pub visitor: V,
    pub state: TraversalState,
}

impl<N, E> Graph<N, E> {
    /// Breadth-first traversal from `start`.
    ///
    /// The visitor sees every outgoing edge of every dequeued node, in
    /// insertion order, including edges to nodes already discovered. No node
    /// is expanded twice. Returning [`Visit::Stop`] ends the traversal before
    /// any further edge is examined or node enqueued.
    ///
    /// The graph is borrowed for the whole traversal, so visitors cannot
    /// mutate its structure.
    pub fn breadth_first<V>(&self, start: NodeId, mut visitor: V) -> Result<Traversal<V>, GraphError>
    where
        V: Visitor<N, E>,
    {
        if !self.contains_node(start) {
            return Err(GraphError::NodeNotFound(start));
        }

        let mut discovered = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            let Some(from_data) = self.node(current) else {
                continue;
            };
            for &edge in self.outgoing(current) {
                let (Some((_, to)), Some(annotation)) = (self.endpoints(edge), self.edge(edge)) else {
                    continue;
                };
                let Some(to_data) = self.node(to) else {
                    continue;
                };
                let step = Step {
                    from: current,
                    to,
                    edge,
                    from_data,
                    to_data,
                    annotation,
                };
                if visitor.visit(step) == Visit::Stop {
                    debug!("breadth-first traversal from {start} stopped at {current}");
                    return Ok(Traversal {
                        visitor,
                        state: TraversalState::Stopped,
                    });
                }
                if discovered.insert(to) {
                    queue.push_back(to);
                }
            }
        }

        debug!(
            "breadth-first traversal from {start} finished after {} nodes",
            discovered.len()
        );
        Ok(Traversal {
            visitor,
            state: TraversalState::Finished,
        })
    }

    /// [`Graph::breadth_first`] with a closure as the visitor.
    pub fn breadth_first_with<F>(&self, start: NodeId, f: F) -> Result<TraversalState, GraphError>
    where
        F: FnMut(Step<'_, N, E>) -> Visit,
    {
        self.breadth_first(start, FnVisitor(f))
            .map(|traversal| traversal.state)
    }
}
