//! Simple Moving Average (SMA) node.
//!
//! The Simple Moving Average is the unweighted mean of the last `period`
//! values of one input line. The first `period - 1` bars (plus whatever
//! warm-up the input itself requires) stay NaN.
//!
//! # Algorithm
//!
//! Both modes maintain a running window sum — seeded oldest-to-newest on
//! the first full bar, then updated with one addition and one subtraction
//! per bar — so step and batch execution produce bit-identical output.
//!
//! # Example
//!
//! ```
//! use lineflow::graph::Graph;
//! use lineflow::indicators::Sma;
//!
//! let mut graph: Graph<f64> = Graph::new();
//! let close = graph.add_stream(["close"]).unwrap();
//! let sma = Sma::build(&mut graph, close, 3).unwrap();
//!
//! for value in [10.0, 11.0, 12.0, 13.0, 14.0] {
//!     graph.push_record(close, &[value]).unwrap();
//!     graph.advance_one(sma).unwrap();
//! }
//!
//! let line = graph.series(sma).line(0).unwrap();
//! assert!(line.at(0).unwrap().is_nan());
//! assert!(line.at(1).unwrap().is_nan());
//! assert_eq!(line.at(2).unwrap(), 11.0);
//! assert_eq!(line.at(3).unwrap(), 12.0);
//! assert_eq!(line.at(4).unwrap(), 13.0);
//! ```

use crate::error::{Error, Result};
use crate::graph::engine::{Graph, NodeId};
use crate::graph::node::{NodeDecl, NodeLogic, NodeView};
use crate::traits::{validate_period, SeriesElement};

/// Rolling-mean node over one input line.
pub struct Sma<T> {
    line: usize,
    period: usize,
    sum: T,
}

impl<T: SeriesElement> Sma<T> {
    /// Builds an SMA over line 0 of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPeriod`] if `period` is zero, or any
    /// construction error from the graph.
    pub fn build(graph: &mut Graph<T>, data: NodeId, period: usize) -> Result<NodeId> {
        Self::build_on(graph, data, 0, period)
    }

    /// Builds an SMA over the given line of `data`.
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
        graph.build_node(NodeDecl::indicator(["sma"]), &[data], |b| {
            b.raise_min_period(period)?;
            Ok(Box::new(Self {
                line,
                period,
                sum: T::zero(),
            }))
        })
    }

    /// Sums the window oldest-to-newest; shared by both seeding paths.
    fn window_sum_at(&self, view: &NodeView<'_, T>, index: usize) -> Result<T> {
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
        Ok(sum)
    }
}

impl<T: SeriesElement> NodeLogic<T> for Sma<T> {
    fn nextstart(&mut self, view: &mut NodeView<'_, T>) -> Result<()> {
        let mut sum = T::zero();
        for k in (0..self.period).rev() {
            sum = sum + view.input(0, self.line, -(k as isize))?;
        }
        self.sum = sum;
        view.output(0, sum / T::from_usize(self.period)?)
    }

    fn next(&mut self, view: &mut NodeView<'_, T>) -> Result<()> {
        let newest = view.input(0, self.line, 0)?;
        let oldest = view.input(0, self.line, -(self.period as isize))?;
        self.sum = self.sum + newest - oldest;
        view.output(0, self.sum / T::from_usize(self.period)?)
    }

    fn once(&mut self, view: &mut NodeView<'_, T>, start: usize, end: usize) -> Result<()> {
        if start >= end {
            return Ok(());
        }
        let divisor = T::from_usize(self.period)?;
        let mut sum = self.window_sum_at(view, start)?;
        view.output_put(0, start, sum / divisor)?;
        for i in (start + 1)..end {
            let newest = view.input_at(0, self.line, i)?;
            let oldest = view.input_at(0, self.line, i - self.period)?;
            sum = sum + newest - oldest;
            view.output_put(0, i, sum / divisor)?;
        }
        Ok(())
    }
}
