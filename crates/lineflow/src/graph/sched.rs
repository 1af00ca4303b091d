//! The dual-mode execution engine.
//!
//! Two interchangeable evaluation strategies drive a node and everything
//! below it:
//!
//! - [`Graph::advance_one`] — **step mode**: called once per new bar,
//!   root-down. Children execute before the parent that depends on them,
//!   observers after, and exactly one lifecycle callback fires per node per
//!   bar.
//! - [`Graph::compute_all`] — **batch mode**: one vectorized sweep.
//!   Storage is pre-sized to the clock's full length, cursors are reset,
//!   and each node fills its outputs by absolute index in a single
//!   `preonce` / `once` pass.
//!
//! Both strategies must produce identical final buffer contents for
//! identical inputs; that equivalence is the engine's primary correctness
//! property.
//!
//! Execution is single-threaded, cooperative, depth-first, and synchronous:
//! ordering is total and deterministic, and a run either completes or
//! aborts by propagating an error out of the whole graph.

use crate::error::{Error, Result};
use crate::graph::engine::{Graph, NodeId};
use crate::graph::node::{NodeKind, NodeView};
use crate::traits::SeriesElement;

/// The warm-up phase a dispatch falls into, from clock length vs.
/// min period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Clock shorter than the warm-up requirement: `prenext` fires.
    Warmup,
    /// Clock exactly at the warm-up requirement: `nextstart` fires, once.
    Start,
    /// Clock past the warm-up requirement: `next` fires.
    Steady,
}

impl Phase {
    /// Classifies a clock length against a warm-up requirement.
    #[must_use]
    pub fn of(clock_len: usize, min_period: usize) -> Self {
        if clock_len > min_period {
            Self::Steady
        } else if clock_len == min_period {
            Self::Start
        } else {
            Self::Warmup
        }
    }
}

impl<T: SeriesElement> Graph<T> {
    /// Advances a node by one bar (step mode).
    ///
    /// Order per call: the clock is advanced explicitly first when it is a
    /// child of this node; the node's own storage grows to match the clock;
    /// children advance in registration order; notifications are delivered;
    /// exactly one lifecycle callback fires; step bindings resolve; and
    /// observers advance last, seeing post-computation state.
    ///
    /// Advancing a plain stream is a no-op: streams grow through the feed
    /// path.
    ///
    /// # Errors
    ///
    /// Propagates any error from a lifecycle callback or binding
    /// resolution; returns [`Error::MinPeriodViolation`] if a steady-state
    /// dispatch finds the node's own storage shorter than its warm-up
    /// requirement.
    pub fn advance_one(&mut self, id: NodeId) -> Result<()> {
        if self.nodes[id.0].kind == NodeKind::Stream {
            return Ok(());
        }

        // The clock's data must exist before this node consults its length.
        let clock = self.nodes[id.0].clock;
        if self.nodes[id.0].clock_is_child {
            self.advance_one(clock)?;
        }

        // Keep outputs aligned 1:1 with the clock bar count.
        let clock_len = self.nodes[clock.0].series.len();
        let own_len = self.nodes[id.0].series.len();
        if clock_len > own_len {
            self.nodes[id.0].series.forward(clock_len - own_len);
        }

        // Dependencies always compute before dependents.
        let mut i = 0;
        loop {
            let Some(child) = self.nodes[id.0].children.get(i).copied() else {
                break;
            };
            self.advance_one(child)?;
            i += 1;
        }

        self.dispatch_step(id, clock_len)?;
        self.apply_step_bindings(id)?;

        // Observers see post-computation state.
        let mut i = 0;
        loop {
            let Some(observer) = self.nodes[id.0].observers.get(i).copied() else {
                break;
            };
            self.advance_one(observer)?;
            i += 1;
        }
        Ok(())
    }

    /// Computes a node and everything below it in one vectorized sweep
    /// (batch mode).
    ///
    /// Storage is pre-sized to the clock's full eventual length, the clock
    /// and children are computed first, observers are aligned (forwarded,
    /// not computed), every cursor is reset to the start, and the node
    /// fills its outputs by absolute index through `preonce` / `once`.
    /// Batch bindings resolve last.
    ///
    /// Computing a plain stream is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates any error from a lifecycle callback or binding
    /// resolution.
    pub fn compute_all(&mut self, id: NodeId) -> Result<()> {
        if self.nodes[id.0].kind == NodeKind::Stream {
            return Ok(());
        }

        // A clock that is itself a child must be computed before its
        // eventual length is known.
        let clock = self.nodes[id.0].clock;
        if self.nodes[id.0].clock_is_child {
            self.compute_all(clock)?;
        }

        // Pre-size own storage to the clock's full eventual length.
        let clock_buflen = self.nodes[clock.0].series.buflen();
        let own_buflen = self.nodes[id.0].series.buflen();
        if clock_buflen > own_buflen {
            self.nodes[id.0].series.extend(clock_buflen - own_buflen);
        }

        let mut i = 0;
        loop {
            let Some(child) = self.nodes[id.0].children.get(i).copied() else {
                break;
            };
            self.compute_all(child)?;
            i += 1;
        }

        // Observers are aligned to this node's length, not computed.
        let size = self.nodes[id.0].series.buflen();
        let mut i = 0;
        loop {
            let Some(observer) = self.nodes[id.0].observers.get(i).copied() else {
                break;
            };
            let observer_len = self.nodes[observer.0].series.len();
            if size > observer_len {
                self.nodes[observer.0].series.forward(size - observer_len);
            }
            i += 1;
        }

        // Batch computation operates over an index range, not a moving
        // cursor: reset every participant to the start.
        let mut i = 0;
        loop {
            let Some(data) = self.nodes[id.0].datas.get(i).copied() else {
                break;
            };
            self.nodes[data.0].series.home();
            i += 1;
        }
        if self.nodes[id.0].clock_is_child {
            self.nodes[clock.0].series.home();
        }
        let mut i = 0;
        loop {
            let Some(child) = self.nodes[id.0].children.get(i).copied() else {
                break;
            };
            self.nodes[child.0].series.home();
            i += 1;
        }
        let mut i = 0;
        loop {
            let Some(observer) = self.nodes[id.0].observers.get(i).copied() else {
                break;
            };
            self.nodes[observer.0].series.home();
            i += 1;
        }
        self.nodes[id.0].series.home();

        self.dispatch_batch(id, size)?;
        self.apply_batch_bindings(id)
    }

    /// Fires exactly one lifecycle callback for the current bar.
    fn dispatch_step(&mut self, id: NodeId, clock_len: usize) -> Result<()> {
        let min_period = self.nodes[id.0].min_period;
        let Some(mut logic) = self.nodes[id.0].logic.take() else {
            return Ok(());
        };
        let mut view = NodeView { graph: self, id };
        let mut run = || -> Result<()> {
            logic.notify(&mut view)?;
            match Phase::of(clock_len, min_period) {
                Phase::Steady => {
                    let length = view.len();
                    if length < min_period {
                        return Err(Error::MinPeriodViolation { length, min_period });
                    }
                    logic.next(&mut view)
                }
                Phase::Start => logic.nextstart(&mut view),
                Phase::Warmup => logic.prenext(&mut view),
            }
        };
        let result = run();
        drop(run);
        drop(view);
        self.nodes[id.0].logic = Some(logic);
        result
    }

    /// Runs the warm-up and steady batch passes over the full range.
    fn dispatch_batch(&mut self, id: NodeId, size: usize) -> Result<()> {
        let min_period = self.nodes[id.0].min_period;
        let Some(mut logic) = self.nodes[id.0].logic.take() else {
            return Ok(());
        };
        let boundary = (min_period - 1).min(size);
        let mut view = NodeView { graph: self, id };
        let mut run = || -> Result<()> {
            logic.preonce(&mut view, 0, boundary)?;
            logic.once(&mut view, boundary, size)
        };
        let result = run();
        drop(run);
        drop(view);
        self.nodes[id.0].logic = Some(logic);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::NodeDecl;
    use crate::graph::NodeLogic;

    #[test]
    fn test_phase_classification() {
        assert_eq!(Phase::of(2, 3), Phase::Warmup);
        assert_eq!(Phase::of(3, 3), Phase::Start);
        assert_eq!(Phase::of(4, 3), Phase::Steady);
        assert_eq!(Phase::of(0, 1), Phase::Warmup);
        assert_eq!(Phase::of(1, 1), Phase::Start);
    }

    /// Counts lifecycle callback invocations.
    #[derive(Default)]
    struct Counter {
        prenext: usize,
        nextstart: usize,
        next: usize,
    }

    struct Counting(std::rc::Rc<std::cell::RefCell<Counter>>);

    impl NodeLogic<f64> for Counting {
        fn prenext(&mut self, _: &mut NodeView<'_, f64>) -> Result<()> {
            self.0.borrow_mut().prenext += 1;
            Ok(())
        }
        fn nextstart(&mut self, _: &mut NodeView<'_, f64>) -> Result<()> {
            self.0.borrow_mut().nextstart += 1;
            Ok(())
        }
        fn next(&mut self, _: &mut NodeView<'_, f64>) -> Result<()> {
            self.0.borrow_mut().next += 1;
            Ok(())
        }
    }

    #[test]
    fn test_warmup_dispatch_counts() {
        let counter = std::rc::Rc::new(std::cell::RefCell::new(Counter::default()));
        let mut graph: Graph<f64> = Graph::new();
        let s = graph.add_stream(["close"]).unwrap();
        let handle = counter.clone();
        let node = graph
            .build_node(NodeDecl::indicator(["out"]), &[s], move |b| {
                b.raise_min_period(3)?;
                Ok(Box::new(Counting(handle)))
            })
            .unwrap();

        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            graph.push_record(s, &[v]).unwrap();
            graph.advance_one(node).unwrap();
        }

        let c = counter.borrow();
        assert_eq!(c.prenext, 2);
        assert_eq!(c.nextstart, 1);
        assert_eq!(c.next, 2);
    }

    #[test]
    fn test_own_storage_tracks_clock() {
        struct Noop;
        impl NodeLogic<f64> for Noop {}

        let mut graph: Graph<f64> = Graph::new();
        let s = graph.add_stream(["close"]).unwrap();
        let node = graph
            .build_node(NodeDecl::indicator(["out"]), &[s], |_| Ok(Box::new(Noop)))
            .unwrap();

        for v in [1.0, 2.0, 3.0] {
            graph.push_record(s, &[v]).unwrap();
            graph.advance_one(node).unwrap();
        }
        assert_eq!(graph.series(node).len(), 3);
    }

    #[test]
    fn test_advance_stream_is_noop() {
        let mut graph: Graph<f64> = Graph::new();
        let s = graph.add_stream(["close"]).unwrap();
        graph.advance_one(s).unwrap();
        assert_eq!(graph.series(s).len(), 0);
    }

    #[test]
    fn test_batch_short_stream_stays_in_warmup() {
        struct Fill;
        impl NodeLogic<f64> for Fill {
            fn once(&mut self, v: &mut NodeView<'_, f64>, start: usize, end: usize) -> Result<()> {
                for i in start..end {
                    v.output_put(0, i, 1.0)?;
                }
                Ok(())
            }
        }

        let mut graph: Graph<f64> = Graph::new();
        let s = graph.add_stream(["close"]).unwrap();
        let node = graph
            .build_node(NodeDecl::indicator(["out"]), &[s], |b| {
                b.raise_min_period(10)?;
                Ok(Box::new(Fill))
            })
            .unwrap();

        for v in [1.0, 2.0, 3.0] {
            graph.push_record(s, &[v]).unwrap();
        }
        graph.compute_all(node).unwrap();
        // Three bars never reach a min period of ten: everything stays NaN.
        let line = graph.series(node).line(0).unwrap();
        for i in 0..3 {
            assert!(line.at(i).unwrap().is_nan());
        }
    }
}
