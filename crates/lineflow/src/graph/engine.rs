//! Graph arena and node construction protocol.
//!
//! All nodes live in a central arena owned by [`Graph`]; every
//! cross-reference is a [`NodeId`] index, so the owner/child relationships
//! form no reference cycles and teardown is a plain drop.
//!
//! # Construction protocol
//!
//! [`Graph::build_node`] runs three ordered phases:
//!
//! 1. **Pre-init** — the owner is resolved from the construction-context
//!    stack (the node currently being built, if any). Supplied data streams
//!    become the node's inputs; with none supplied the owner is the sole
//!    input, so the node always has a clock. The warm-up requirement starts
//!    at the maximum of the inputs' requirements.
//! 2. **Init** — the new node is pushed on the context stack and the init
//!    closure runs. Child nodes built inside it resolve this node as their
//!    owner and register themselves before the closure returns, so the
//!    closure observes its own children's warm-up contributions.
//! 3. **Post-init** — the node registers with its owner as a child
//!    (indicators) or observer (observers). Child registration handles
//!    deduplication and the clock-as-child case at registration time,
//!    preserving first-registration identity.
//!
//! # Example
//!
//! ```
//! use lineflow::graph::{Graph, NodeDecl, NodeLogic};
//!
//! struct Echo;
//! impl NodeLogic<f64> for Echo {
//!     fn next(&mut self, v: &mut lineflow::graph::NodeView<'_, f64>) -> lineflow::Result<()> {
//!         let x = v.input(0, 0, 0)?;
//!         v.output(0, x)
//!     }
//! }
//!
//! let mut graph: Graph<f64> = Graph::new();
//! let close = graph.add_stream(["close"]).unwrap();
//! let echo = graph
//!     .build_node(NodeDecl::indicator(["echo"]), &[close], |_| Ok(Box::new(Echo)))
//!     .unwrap();
//!
//! graph.push_record(close, &[10.0]).unwrap();
//! graph.advance_one(echo).unwrap();
//! assert_eq!(graph.series(echo).line(0).unwrap().get(0).unwrap(), 10.0);
//! ```

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::graph::binding::LineBinding;
use crate::graph::node::{NodeDecl, NodeKind, NodeLogic};
use crate::series::LineSeries;
use crate::traits::{validate_period, SeriesElement};

/// A non-owning index into the graph arena.
///
/// Ids are only produced by the [`Graph`] that owns the node and remain
/// valid for the graph's whole lifetime (nodes are never destroyed
/// mid-run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the arena index of this id.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One arena slot: a node's output lines plus its graph metadata.
pub(crate) struct Node<T: SeriesElement> {
    pub(crate) kind: NodeKind,
    pub(crate) series: LineSeries<T>,
    pub(crate) owner: Option<NodeId>,
    pub(crate) datas: Vec<NodeId>,
    pub(crate) clock: NodeId,
    pub(crate) min_period: usize,
    pub(crate) children: Vec<NodeId>,
    pub(crate) observers: Vec<NodeId>,
    pub(crate) clock_is_child: bool,
    pub(crate) bindings: Vec<LineBinding>,
    pub(crate) logic: Option<Box<dyn NodeLogic<T>>>,
}

/// The dataflow graph: a central arena of nodes plus the construction
/// context stack.
///
/// Data flows bottom-up (inputs feed nodes); control flows top-down (a root
/// node's step or batch call drives its children first, then itself, then
/// its observers).
pub struct Graph<T: SeriesElement> {
    pub(crate) nodes: Vec<Node<T>>,
    stack: Vec<NodeId>,
}

impl<T: SeriesElement> Graph<T> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns an iterator over every node id in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Creates a plain stream node with the given ordered line names.
    ///
    /// Streams have no owner, no inputs, and no logic; they are their own
    /// clock and grow only through [`push_record`](Self::push_record).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArityMismatch`] if no line names are supplied.
    pub fn add_stream<I, S>(&mut self, names: I) -> Result<NodeId>
    where
        I: IntoIterator<Item = S>,
        S: Into<std::borrow::Cow<'static, str>>,
    {
        let series = LineSeries::new(names)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind: NodeKind::Stream,
            series,
            owner: None,
            datas: Vec::new(),
            clock: id,
            min_period: 1,
            children: Vec::new(),
            observers: Vec::new(),
            clock_is_child: false,
            bindings: Vec::new(),
            logic: None,
        });
        debug!(id = id.0, kind = "stream", "node created");
        Ok(id)
    }

    /// Builds a derived node through the three-phase construction protocol.
    ///
    /// `datas` are the input streams; when empty, the enclosing node under
    /// construction becomes the sole input so the node always has a clock.
    /// The `init` closure runs with this node on the construction-context
    /// stack: children it builds resolve this node as their owner. It
    /// returns the node's [`NodeLogic`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoClock`] if `datas` is empty and no node is under
    /// construction, [`Error::ArityMismatch`] if the declaration has no
    /// lines, or any error the init closure produces.
    pub fn build_node<F>(&mut self, decl: NodeDecl, datas: &[NodeId], init: F) -> Result<NodeId>
    where
        F: FnOnce(&mut NodeBuilder<'_, T>) -> Result<Box<dyn NodeLogic<T>>>,
    {
        let kind = decl.kind;

        // Pre-init: owner discovery, clock selection, minperiod seeding.
        let owner = self.stack.last().copied();
        let datas: Vec<NodeId> = if datas.is_empty() {
            vec![owner.ok_or(Error::NoClock)?]
        } else {
            datas.to_vec()
        };
        let clock = datas[0];
        let min_period = datas
            .iter()
            .map(|d| self.nodes[d.0].min_period)
            .max()
            .unwrap_or(1);

        let series = LineSeries::new(decl.lines)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            series,
            owner,
            datas,
            clock,
            min_period,
            children: Vec::new(),
            observers: Vec::new(),
            clock_is_child: false,
            bindings: Vec::new(),
            logic: None,
        });

        // Init: run the setup closure with this node as the active context.
        self.stack.push(id);
        let built = init(&mut NodeBuilder { graph: self, id });
        self.stack.pop();
        self.nodes[id.0].logic = Some(built?);

        // Post-init: registration happens only now, after the node's own
        // children have contributed to its minperiod.
        if let Some(owner_id) = owner {
            match kind {
                NodeKind::Indicator => self.add_child(owner_id, id),
                NodeKind::Observer => self.add_observer(owner_id, id),
                NodeKind::Stream => {}
            }
        }

        debug!(
            id = id.0,
            kind = kind.name(),
            min_period = self.nodes[id.0].min_period,
            "node created"
        );
        Ok(id)
    }

    /// Registers `child` as a computational dependent of `parent` and
    /// raises the parent's warm-up requirement to the child's.
    ///
    /// A child equal to the parent's clock is flagged instead of listed, so
    /// the scheduler advances it explicitly exactly once per step.
    /// Re-registering an already known child is a no-op that preserves
    /// first-registration order.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let child_min_period = self.nodes[child.0].min_period;
        let node = &mut self.nodes[parent.0];
        if node.children.contains(&child) || (node.clock_is_child && node.clock == child) {
            warn!(
                parent = parent.0,
                child = child.0,
                "duplicate child registration ignored"
            );
        } else if node.clock == child {
            node.clock_is_child = true;
        } else {
            node.children.push(child);
        }
        node.min_period = node.min_period.max(child_min_period);
    }

    /// Registers `observer` as a passive consumer of `parent`.
    ///
    /// Observers never contribute to the parent's warm-up requirement and
    /// are notified after the parent's own computation, in registration
    /// order. Re-registering an already known observer is a no-op.
    pub fn add_observer(&mut self, parent: NodeId, observer: NodeId) {
        let node = &mut self.nodes[parent.0];
        if node.observers.contains(&observer) {
            warn!(
                parent = parent.0,
                observer = observer.0,
                "duplicate observer registration ignored"
            );
        } else {
            node.observers.push(observer);
        }
    }

    /// Raises a node's warm-up requirement by `extra` consecutive samples
    /// of its own history.
    ///
    /// One bar of warm-up is already implied, so requesting `extra` samples
    /// adds `extra - 1` bars.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPeriod`] if `extra` is zero.
    pub fn raise_min_period(&mut self, id: NodeId, extra: usize) -> Result<()> {
        validate_period(extra)?;
        self.nodes[id.0].min_period += extra - 1;
        Ok(())
    }

    /// Returns a node's kind.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    /// Returns a node's owner, if one was discovered at construction.
    #[must_use]
    pub fn owner(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].owner
    }

    /// Returns a node's input streams in declaration order.
    #[must_use]
    pub fn datas(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].datas
    }

    /// Returns the stream whose growth paces this node's advancement.
    #[must_use]
    pub fn clock(&self, id: NodeId) -> NodeId {
        self.nodes[id.0].clock
    }

    /// Returns a node's warm-up requirement.
    #[must_use]
    pub fn min_period(&self, id: NodeId) -> usize {
        self.nodes[id.0].min_period
    }

    /// Returns a node's registered children in registration order,
    /// excluding a clock handled as a child.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Returns a node's registered observers in registration order.
    #[must_use]
    pub fn observers(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].observers
    }

    /// Returns `true` if the node's clock is one of its own children.
    #[must_use]
    pub fn clock_is_child(&self, id: NodeId) -> bool {
        self.nodes[id.0].clock_is_child
    }

    /// Returns a node's output lines.
    #[must_use]
    pub fn series(&self, id: NodeId) -> &LineSeries<T> {
        &self.nodes[id.0].series
    }
}

impl<T: SeriesElement> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The construction handle passed to a node's init closure.
///
/// Child nodes are built through [`graph`](Self::graph) — the builder's
/// node is the active construction context, so children resolve it as
/// their owner.
pub struct NodeBuilder<'g, T: SeriesElement> {
    pub(crate) graph: &'g mut Graph<T>,
    pub(crate) id: NodeId,
}

impl<T: SeriesElement> NodeBuilder<'_, T> {
    /// Returns the id of the node under construction.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the graph, for building child nodes inside init.
    pub fn graph(&mut self) -> &mut Graph<T> {
        &mut *self.graph
    }

    /// Returns the input stream at `index`, if declared.
    #[must_use]
    pub fn data(&self, index: usize) -> Option<NodeId> {
        self.graph.nodes[self.id.0].datas.get(index).copied()
    }

    /// Returns the warm-up requirement accumulated so far.
    #[must_use]
    pub fn min_period(&self) -> usize {
        self.graph.nodes[self.id.0].min_period
    }

    /// Raises this node's warm-up requirement by `extra` consecutive
    /// samples of its own history (adds `extra - 1` bars).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPeriod`] if `extra` is zero.
    pub fn raise_min_period(&mut self, extra: usize) -> Result<()> {
        self.graph.raise_min_period(self.id, extra)
    }

    /// Declares that this node's output lines additionally write into the
    /// owner's lines, positionally pairing `owner_lines` with `own_lines`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoOwner`] if the node has no owner,
    /// [`Error::ArityMismatch`] if the index slices differ in length, or
    /// [`Error::BindingRange`] if an index is outside either side's
    /// declared arity.
    pub fn bind_outputs(&mut self, owner_lines: &[usize], own_lines: &[usize]) -> Result<()> {
        let owner = self.graph.nodes[self.id.0]
            .owner
            .ok_or(Error::NoOwner { node_id: self.id.0 })?;
        self.graph.bind_lines(self.id, own_lines, owner, owner_lines)
    }
}
