//! Topology snapshot of the node graph.
//!
//! The scheduler's recursion already executes dependencies before
//! dependents; this module provides the inspectable form of that order. A
//! [`Topology`] snapshots the arena into a directed graph (data → consumer,
//! child → parent, node → observer), topologically sorts it, and exposes
//! structural queries.
//!
//! # Cycle Detection
//!
//! The builder protocol cannot create a dependency cycle (a node's inputs
//! exist before the node does), but manual child registration after
//! construction can. Snapshotting such a graph fails with
//! [`CyclicDependency`]; the run drivers validate topology before
//! executing.
//!
//! [`CyclicDependency`]: crate::Error::CyclicDependency
//!
//! # Example
//!
//! ```
//! use lineflow::graph::{Graph, NodeDecl, NodeLogic, Topology};
//!
//! struct Noop;
//! impl NodeLogic<f64> for Noop {}
//!
//! let mut graph: Graph<f64> = Graph::new();
//! let close = graph.add_stream(["close"]).unwrap();
//! let node = graph
//!     .build_node(NodeDecl::indicator(["out"]), &[close], |_| Ok(Box::new(Noop)))
//!     .unwrap();
//!
//! let topo = Topology::from_graph(&graph).unwrap();
//! let order = topo.execution_order();
//! let close_pos = order.iter().position(|id| *id == close).unwrap();
//! let node_pos = order.iter().position(|id| *id == node).unwrap();
//! assert!(close_pos < node_pos);
//! ```

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::error::{Error, Result};
use crate::graph::engine::{Graph, NodeId};
use crate::traits::SeriesElement;

/// A validated structural snapshot of a node graph.
///
/// Edges point from producers to consumers, so the topological order lists
/// every node after everything it reads.
#[derive(Debug)]
pub struct Topology {
    /// The snapshot graph; node weights are arena ids.
    graph: DiGraph<NodeId, ()>,
    /// Map from arena index to snapshot index.
    indices: Vec<NodeIndex>,
    /// The topologically sorted execution order.
    order: Vec<NodeId>,
}

impl Topology {
    /// Snapshots a graph and computes its execution order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CyclicDependency`] if manual wiring created a
    /// dependency cycle.
    pub fn from_graph<T: SeriesElement>(source: &Graph<T>) -> Result<Self> {
        let count = source.node_count();
        let mut graph = DiGraph::with_capacity(count, count);
        let indices: Vec<NodeIndex> = source.node_ids().map(|id| graph.add_node(id)).collect();

        for id in source.node_ids() {
            for &data in source.datas(id) {
                graph.add_edge(indices[data.index()], indices[id.index()], ());
            }
            for &child in source.children(id) {
                graph.add_edge(indices[child.index()], indices[id.index()], ());
            }
            for &observer in source.observers(id) {
                graph.add_edge(indices[id.index()], indices[observer.index()], ());
            }
        }

        let order = match toposort(&graph, None) {
            Ok(sorted) => sorted.into_iter().map(|ix| graph[ix]).collect(),
            Err(cycle) => {
                return Err(Error::CyclicDependency {
                    node_id: graph[cycle.node_id()].index(),
                })
            }
        };

        Ok(Self {
            graph,
            indices,
            order,
        })
    }

    /// Returns the execution order as a slice of node ids.
    ///
    /// If node A reads node B, B appears before A.
    #[must_use]
    pub fn execution_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Returns the number of nodes in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the number of producers a node reads (its in-degree).
    #[must_use]
    pub fn dependency_count(&self, id: NodeId) -> usize {
        self.graph
            .edges_directed(self.indices[id.index()], Direction::Incoming)
            .count()
    }

    /// Returns the number of consumers reading a node (its out-degree).
    #[must_use]
    pub fn dependent_count(&self, id: NodeId) -> usize {
        self.graph
            .edges_directed(self.indices[id.index()], Direction::Outgoing)
            .count()
    }

    /// Returns the nodes nothing depends on upstream (sources of the
    /// graph).
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|id| self.dependency_count(*id) == 0)
    }

    /// Returns the nodes nothing reads downstream (sinks of the graph).
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|id| self.dependent_count(*id) == 0)
    }
}
