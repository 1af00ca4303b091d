//! Bar records and the feed-facing stream contract.
//!
//! A data feed adapter supplies bar streams to the engine through two
//! guarantees: the stream exposes the standard named lines
//! ([`BAR_LINES`]), and each successfully loaded record writes exactly one
//! value into every declared line before the stream's length counts as
//! advanced. Malformed records are rejected before any line is touched —
//! a failed push never leaves a partially written bar.
//!
//! Concrete file and network adapters live outside the core; they only
//! need to implement [`BarSource`]. [`MemoryFeed`] is the in-memory
//! reference source used by drivers and tests.
//!
//! # Example
//!
//! ```
//! use lineflow::feed::{BarSource, MemoryFeed};
//! use lineflow::graph::Graph;
//!
//! let mut graph: Graph<f64> = Graph::new();
//! let stream = graph.add_bar_stream().unwrap();
//!
//! let mut feed = MemoryFeed::from_closes(&[10.0, 11.0]).unwrap();
//! while let Some(bar) = feed.next_bar() {
//!     graph.push_bar(stream, &bar).unwrap();
//! }
//! assert_eq!(graph.series(stream).len(), 2);
//! ```

use crate::error::{Error, Result};
use crate::graph::engine::{Graph, NodeId};
use crate::graph::node::NodeKind;
use crate::traits::SeriesElement;

/// The standard line names of a bar stream, in declaration order.
pub const BAR_LINES: [&str; 7] = [
    "datetime",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "openinterest",
];

/// Index of the `datetime` line in a bar stream.
pub const DATETIME: usize = 0;
/// Index of the `open` line in a bar stream.
pub const OPEN: usize = 1;
/// Index of the `high` line in a bar stream.
pub const HIGH: usize = 2;
/// Index of the `low` line in a bar stream.
pub const LOW: usize = 3;
/// Index of the `close` line in a bar stream.
pub const CLOSE: usize = 4;
/// Index of the `volume` line in a bar stream.
pub const VOLUME: usize = 5;
/// Index of the `openinterest` line in a bar stream.
pub const OPENINTEREST: usize = 6;

/// One complete bar record.
///
/// Field order matches [`BAR_LINES`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar<T> {
    /// Timestamp of the bar, as a numeric value.
    pub datetime: T,
    /// Opening price.
    pub open: T,
    /// Highest price.
    pub high: T,
    /// Lowest price.
    pub low: T,
    /// Closing price.
    pub close: T,
    /// Traded volume.
    pub volume: T,
    /// Open interest.
    pub openinterest: T,
}

impl<T: SeriesElement> Bar<T> {
    /// Returns the bar's values in [`BAR_LINES`] order.
    #[must_use]
    pub fn values(&self) -> [T; 7] {
        [
            self.datetime,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.openinterest,
        ]
    }

    /// Builds a flat bar from a single closing price: open, high, and low
    /// equal the close; volume and open interest are zero.
    #[must_use]
    pub fn from_close(datetime: T, close: T) -> Self {
        Self {
            datetime,
            open: close,
            high: close,
            low: close,
            close,
            volume: T::zero(),
            openinterest: T::zero(),
        }
    }
}

/// The adapter-facing source of bar records.
///
/// A source yields complete bars until exhausted. Validation is the
/// adapter's responsibility: a malformed record must be rejected by the
/// adapter rather than surfaced as a partial bar.
pub trait BarSource<T: SeriesElement> {
    /// Returns the next bar, or `None` when the source is exhausted.
    fn next_bar(&mut self) -> Option<Bar<T>>;
}

/// An in-memory bar source backed by a vector.
#[derive(Debug, Clone)]
pub struct MemoryFeed<T> {
    bars: Vec<Bar<T>>,
    pos: usize,
}

impl<T: SeriesElement> MemoryFeed<T> {
    /// Creates a feed over the given bars.
    #[must_use]
    pub fn new(bars: Vec<Bar<T>>) -> Self {
        Self { bars, pos: 0 }
    }

    /// Creates a feed of flat bars from closing prices, with the bar index
    /// as the timestamp.
    ///
    /// # Errors
    ///
    /// Returns `Error::NumericConversion` if an index is not representable
    /// in `T`.
    pub fn from_closes(closes: &[T]) -> Result<Self> {
        let mut bars = Vec::with_capacity(closes.len());
        for (i, &close) in closes.iter().enumerate() {
            bars.push(Bar::from_close(T::from_usize(i)?, close));
        }
        Ok(Self::new(bars))
    }

    /// Returns the number of bars remaining.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bars.len() - self.pos
    }
}

impl<T: SeriesElement> BarSource<T> for MemoryFeed<T> {
    fn next_bar(&mut self) -> Option<Bar<T>> {
        let bar = self.bars.get(self.pos).copied()?;
        self.pos += 1;
        Some(bar)
    }
}

impl<T: SeriesElement> Graph<T> {
    /// Creates a stream node with the standard bar lines.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the error type is shared with
    /// [`add_stream`](Self::add_stream).
    pub fn add_bar_stream(&mut self) -> Result<NodeId> {
        self.add_stream(BAR_LINES)
    }

    /// Appends one record to a stream, writing one value into every line.
    ///
    /// The write is atomic with respect to stream length: arity is
    /// validated before any line is touched, so a rejected record never
    /// advances the stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAStream`] if the node is not a plain stream, or
    /// [`Error::ArityMismatch`] if the value count does not match the
    /// stream's declared lines.
    pub fn push_record(&mut self, id: NodeId, values: &[T]) -> Result<()> {
        let node = &mut self.nodes[id.0];
        if node.kind != NodeKind::Stream {
            return Err(Error::NotAStream { node_id: id.0 });
        }
        let arity = node.series.arity();
        if values.len() != arity {
            return Err(Error::ArityMismatch {
                expected: arity,
                actual: values.len(),
            });
        }
        node.series.forward(1);
        for (i, &value) in values.iter().enumerate() {
            node.series.line_mut(i)?.set(0, value)?;
        }
        Ok(())
    }

    /// Appends one bar to a bar stream.
    ///
    /// # Errors
    ///
    /// Same conditions as [`push_record`](Self::push_record).
    pub fn push_bar(&mut self, id: NodeId, bar: &Bar<T>) -> Result<()> {
        self.push_record(id, &bar.values())
    }
}
