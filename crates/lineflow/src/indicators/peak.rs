//! Running-maximum observer.
//!
//! [`Peak`] is an [`Observer`](crate::graph::NodeKind::Observer): it
//! records the highest value its clock's watched line has reached so far.
//! As an observer it never contributes to its owner's warm-up requirement
//! and is advanced after the owner's own computation, so each bar it sees
//! the owner's freshly computed state.
//!
//! Observers are only computed in step mode; a batch pass aligns their
//! buffers without filling them.

use crate::error::Result;
use crate::graph::engine::{Graph, NodeId};
use crate::graph::node::{NodeDecl, NodeLogic, NodeView};
use crate::traits::SeriesElement;

/// Observer tracking the running maximum of one line of its clock.
pub struct Peak<T> {
    line: usize,
    best: T,
}

impl<T: SeriesElement> Peak<T> {
    /// Builds a peak observer on the enclosing node under construction,
    /// watching line 0.
    ///
    /// Must be called inside an init closure: with no explicit data the
    /// owner becomes the clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoClock`](crate::Error::NoClock) when called
    /// outside any node construction.
    pub fn build(graph: &mut Graph<T>) -> Result<NodeId> {
        Self::build_watching(graph, None, 0)
    }

    /// Builds a peak observer watching the given line of `data` (or of the
    /// enclosing node when `data` is `None`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoClock`](crate::Error::NoClock) when no data is
    /// given and no node is under construction.
    pub fn build_watching(
        graph: &mut Graph<T>,
        data: Option<NodeId>,
        line: usize,
    ) -> Result<NodeId> {
        let datas: Vec<NodeId> = data.into_iter().collect();
        graph.build_node(NodeDecl::observer(["peak"]), &datas, |_| {
            Ok(Box::new(Self {
                line,
                best: T::nan(),
            }))
        })
    }
}

impl<T: SeriesElement> NodeLogic<T> for Peak<T> {
    fn next(&mut self, view: &mut NodeView<'_, T>) -> Result<()> {
        let value = view.input(0, self.line, 0)?;
        if self.best.is_nan() || value > self.best {
            self.best = value;
        }
        view.output(0, self.best)
    }
}
