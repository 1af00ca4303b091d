//! Exponential Moving Average (EMA) node.
//!
//! The Exponential Moving Average weights recent values more heavily using
//! the standard smoothing factor `alpha = 2 / (period + 1)`.
//!
//! # Algorithm
//!
//! The first valid value is the SMA of the first `period` inputs; every
//! later value applies the recursion `ema = prev + alpha * (x - prev)`.
//! Step mode reads `prev` back from its own output line, batch mode carries
//! it through the sweep; the arithmetic is written identically in both so
//! the two modes agree bit-for-bit.
//!
//! # Example
//!
//! ```
//! use lineflow::graph::Graph;
//! use lineflow::indicators::Ema;
//!
//! let mut graph: Graph<f64> = Graph::new();
//! let close = graph.add_stream(["close"]).unwrap();
//! let ema = Ema::build(&mut graph, close, 3).unwrap();
//!
//! for value in [10.0, 11.0, 12.0, 13.0] {
//!     graph.push_record(close, &[value]).unwrap();
//!     graph.advance_one(ema).unwrap();
//! }
//!
//! let line = graph.series(ema).line(0).unwrap();
//! assert!(line.at(1).unwrap().is_nan());
//! assert_eq!(line.at(2).unwrap(), 11.0); // SMA seed
//! assert_eq!(line.at(3).unwrap(), 12.0); // 11 + 0.5 * (13 - 11)
//! ```

use crate::error::{Error, Result};
use crate::graph::engine::{Graph, NodeId};
use crate::graph::node::{NodeDecl, NodeLogic, NodeView};
use crate::traits::{validate_period, SeriesElement};

/// Exponentially smoothed mean node over one input line.
pub struct Ema<T> {
    line: usize,
    period: usize,
    alpha: T,
}

impl<T: SeriesElement> Ema<T> {
    /// Builds an EMA over line 0 of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPeriod`] if `period` is zero, or any
    /// construction error from the graph.
    pub fn build(graph: &mut Graph<T>, data: NodeId, period: usize) -> Result<NodeId> {
        Self::build_on(graph, data, 0, period)
    }

    /// Builds an EMA over the given line of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPeriod`] if `period` is zero, or any
    /// construction error from the graph.
    pub fn build_on(
        graph: &mut Graph<T>,
        data: NodeId,
        line: usize,
        period: usize,
    ) -> Result<NodeId> {
        validate_period(period)?;
        let alpha = T::two() / T::from_usize(period + 1)?;
        graph.build_node(NodeDecl::indicator(["ema"]), &[data], |b| {
            b.raise_min_period(period)?;
            Ok(Box::new(Self {
                line,
                period,
                alpha,
            }))
        })
    }

    /// SMA seed over the window ending at `index`, oldest-to-newest.
    fn seed_at(&self, view: &NodeView<'_, T>, index: usize) -> Result<T> {
        let first = (index + 1)
            .checked_sub(self.period)
            .ok_or(Error::MinPeriodViolation {
                length: index + 1,
                min_period: self.period,
            })?;
        let mut sum = T::zero();
        for i in first..=index {
            sum = sum + view.input_at(0, self.line, i)?;
        }
        Ok(sum / T::from_usize(self.period)?)
    }
}

impl<T: SeriesElement> NodeLogic<T> for Ema<T> {
    fn nextstart(&mut self, view: &mut NodeView<'_, T>) -> Result<()> {
        let mut sum = T::zero();
        for k in (0..self.period).rev() {
            sum = sum + view.input(0, self.line, -(k as isize))?;
        }
        view.output(0, sum / T::from_usize(self.period)?)
    }

    fn next(&mut self, view: &mut NodeView<'_, T>) -> Result<()> {
        let x = view.input(0, self.line, 0)?;
        let prev = view.output_back(0, -1)?;
        view.output(0, prev + self.alpha * (x - prev))
    }

    fn once(&mut self, view: &mut NodeView<'_, T>, start: usize, end: usize) -> Result<()> {
        if start >= end {
            return Ok(());
        }
        let mut prev = self.seed_at(view, start)?;
        view.output_put(0, start, prev)?;
        for i in (start + 1)..end {
            let x = view.input_at(0, self.line, i)?;
            prev = prev + self.alpha * (x - prev);
            view.output_put(0, i, prev)?;
        }
        Ok(())
    }
}
