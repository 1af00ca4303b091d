//! Node kinds, lifecycle logic, and the dispatch view.
//!
//! A node's behavior is a [`NodeLogic`] implementation: a closed set of
//! lifecycle callbacks the scheduler dispatches against. Step mode drives
//! the `prenext` / `nextstart` / `next` family once per bar; batch mode
//! drives `preonce` / `once` once per run over absolute index ranges. Both
//! families must fill the node's output lines with identical values for
//! identical inputs.
//!
//! During dispatch the scheduler hands the callback a [`NodeView`] — a
//! borrow of the graph scoped to the node — carrying cursor-relative
//! accessors for step mode and absolute accessors for batch mode.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::graph::engine::{Graph, NodeId};
use crate::traits::SeriesElement;

/// The closed set of node capabilities, chosen at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A plain series that grows only through the feed path; never
    /// dispatched.
    Stream,
    /// A computational dependent: contributes to its owner's warm-up
    /// requirement and is advanced before the owner computes.
    Indicator,
    /// A passive consumer: never contributes to warm-up and is advanced
    /// after the node it observes computes.
    Observer,
}

impl NodeKind {
    /// Returns the kind name as a string.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::Indicator => "indicator",
            Self::Observer => "observer",
        }
    }
}

/// Declaration of a node's kind and output line shape.
///
/// Built through [`NodeDecl::indicator`] or [`NodeDecl::observer`]; plain
/// streams are created directly with
/// [`Graph::add_stream`](crate::graph::Graph::add_stream).
#[derive(Debug, Clone)]
pub struct NodeDecl {
    pub(crate) kind: NodeKind,
    pub(crate) lines: Vec<Cow<'static, str>>,
}

impl NodeDecl {
    /// Declares an indicator node with the given ordered output line names.
    pub fn indicator<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            kind: NodeKind::Indicator,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Declares an observer node with the given ordered output line names.
    pub fn observer<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            kind: NodeKind::Observer,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lifecycle callbacks for a derived node.
///
/// Step mode dispatches exactly one of `prenext` / `nextstart` / `next` per
/// bar, comparing the clock length `L` to the node's warm-up requirement
/// `M`: `L < M` is warm-up, `L == M` is the first full bar, `L > M` is
/// steady state. Batch mode calls `preonce` over the warm-up range and
/// `once` over the steady range, both with absolute `[start, end)` indices.
///
/// `notify` runs before every step dispatch; it is the hook for queued
/// cross-cutting events and defaults to a no-op.
pub trait NodeLogic<T: SeriesElement> {
    /// Called once per bar while the clock is shorter than the warm-up
    /// requirement. Defaults to a no-op, leaving the NaN prefix in place.
    fn prenext(&mut self, view: &mut NodeView<'_, T>) -> Result<()> {
        let _ = view;
        Ok(())
    }

    /// Called exactly once, on the first bar that satisfies the warm-up
    /// requirement. Defaults to delegating to [`next`](Self::next).
    fn nextstart(&mut self, view: &mut NodeView<'_, T>) -> Result<()> {
        self.next(view)
    }

    /// Called once per bar in steady state. Defaults to a no-op.
    fn next(&mut self, view: &mut NodeView<'_, T>) -> Result<()> {
        let _ = view;
        Ok(())
    }

    /// Batch-mode warm-up pass over `[start, end)`. Defaults to a no-op.
    fn preonce(&mut self, view: &mut NodeView<'_, T>, start: usize, end: usize) -> Result<()> {
        let _ = (view, start, end);
        Ok(())
    }

    /// Batch-mode steady pass over `[start, end)`. Defaults to a no-op.
    fn once(&mut self, view: &mut NodeView<'_, T>, start: usize, end: usize) -> Result<()> {
        let _ = (view, start, end);
        Ok(())
    }

    /// Delivers pending notifications before each step dispatch. Defaults
    /// to a no-op.
    fn notify(&mut self, view: &mut NodeView<'_, T>) -> Result<()> {
        let _ = view;
        Ok(())
    }
}

/// A borrow of the graph scoped to one node during dispatch.
///
/// Input accessors read the node's declared data streams; output accessors
/// read and write the node's own lines. `input` / `output` / `output_back`
/// are cursor-relative (step mode); `input_at` / `output_at` /
/// `output_put` are absolute (batch mode).
pub struct NodeView<'g, T: SeriesElement> {
    pub(crate) graph: &'g mut Graph<T>,
    pub(crate) id: NodeId,
}

impl<T: SeriesElement> NodeView<'_, T> {
    /// Returns the id of the node being dispatched.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node's warm-up requirement.
    #[must_use]
    pub fn min_period(&self) -> usize {
        self.graph.nodes[self.id.0].min_period
    }

    /// Returns the number of declared data inputs.
    #[must_use]
    pub fn datas(&self) -> usize {
        self.graph.nodes[self.id.0].datas.len()
    }

    /// Returns the node's own written length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.nodes[self.id.0].series.len()
    }

    /// Returns `true` if nothing has been written to the node's own lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.nodes[self.id.0].series.is_empty()
    }

    /// Returns the clock stream's written length.
    #[must_use]
    pub fn clock_len(&self) -> usize {
        let clock = self.graph.nodes[self.id.0].clock;
        self.graph.nodes[clock.0].series.len()
    }

    /// Returns the clock stream's allocated length.
    #[must_use]
    pub fn clock_buflen(&self) -> usize {
        let clock = self.graph.nodes[self.id.0].clock;
        self.graph.nodes[clock.0].series.buflen()
    }

    #[allow(clippy::cast_possible_wrap)]
    fn data_id(&self, data: usize) -> Result<NodeId> {
        let datas = &self.graph.nodes[self.id.0].datas;
        datas.get(data).copied().ok_or(Error::OutOfRange {
            index: data as isize,
            len: datas.len(),
        })
    }

    /// Reads input `data`, line `line`, at a cursor-relative `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an unknown data or line index, or
    /// an offset outside the input's written range.
    pub fn input(&self, data: usize, line: usize, offset: isize) -> Result<T> {
        let did = self.data_id(data)?;
        self.graph.nodes[did.0].series.line(line)?.get(offset)
    }

    /// Reads input `data`, line `line`, at an absolute `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an unknown data or line index, or
    /// an index past the input's allocated storage.
    pub fn input_at(&self, data: usize, line: usize, index: usize) -> Result<T> {
        let did = self.data_id(data)?;
        self.graph.nodes[did.0].series.line(line)?.at(index)
    }

    /// Writes `value` into the current slot of own line `line`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an unknown line index or when the
    /// line has no current slot.
    pub fn output(&mut self, line: usize, value: T) -> Result<()> {
        self.graph.nodes[self.id.0].series.line_mut(line)?.set(0, value)
    }

    /// Reads own line `line` at a cursor-relative `offset` (own history).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an unknown line index or an offset
    /// outside the written range.
    pub fn output_back(&self, line: usize, offset: isize) -> Result<T> {
        self.graph.nodes[self.id.0].series.line(line)?.get(offset)
    }

    /// Reads own line `line` at an absolute `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an unknown line index or an index
    /// past the allocated storage.
    pub fn output_at(&self, line: usize, index: usize) -> Result<T> {
        self.graph.nodes[self.id.0].series.line(line)?.at(index)
    }

    /// Writes `value` into own line `line` at an absolute `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for an unknown line index or an index
    /// past the allocated storage.
    pub fn output_put(&mut self, line: usize, index: usize, value: T) -> Result<()> {
        self.graph.nodes[self.id.0]
            .series
            .line_mut(line)?
            .put(index, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_names() {
        assert_eq!(NodeKind::Stream.name(), "stream");
        assert_eq!(NodeKind::Indicator.name(), "indicator");
        assert_eq!(NodeKind::Observer.name(), "observer");
    }

    #[test]
    fn test_node_decl_indicator() {
        let decl = NodeDecl::indicator(["a", "b"]);
        assert_eq!(decl.kind, NodeKind::Indicator);
        assert_eq!(decl.lines.len(), 2);
    }

    #[test]
    fn test_node_decl_observer() {
        let decl = NodeDecl::observer(["x"]);
        assert_eq!(decl.kind, NodeKind::Observer);
        assert_eq!(decl.lines.len(), 1);
    }

    #[test]
    fn test_default_lifecycle_is_noop() {
        struct Passive;
        impl NodeLogic<f64> for Passive {}

        let mut graph: Graph<f64> = Graph::new();
        let stream = graph.add_stream(["close"]).unwrap();
        let node = graph
            .build_node(NodeDecl::indicator(["out"]), &[stream], |_| {
                Ok(Box::new(Passive))
            })
            .unwrap();

        graph.push_record(stream, &[1.0]).unwrap();
        graph.advance_one(node).unwrap();
        // Default callbacks leave the NaN slot untouched.
        assert!(graph.series(node).line(0).unwrap().get(0).unwrap().is_nan());
    }
}
