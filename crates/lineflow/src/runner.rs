//! Run drivers: pump a bar source through the graph in either mode.
//!
//! The driver owns the outermost loop the engine itself does not define:
//! pulling records from a [`BarSource`], pushing them into a stream node,
//! and driving the root. [`run_step`] replays the feed bar-by-bar the way a
//! live simulation would; [`run_batch`] preloads the whole feed and
//! computes everything in one vectorized pass. For identical feeds the two
//! leave identical buffers behind.
//!
//! Topology is validated before either run, so manually wired cycles fail
//! fast instead of recursing forever.
//!
//! # Example
//!
//! ```
//! use lineflow::feed::{MemoryFeed, CLOSE};
//! use lineflow::graph::Graph;
//! use lineflow::indicators::Sma;
//! use lineflow::runner::run_step;
//!
//! let mut graph: Graph<f64> = Graph::new();
//! let stream = graph.add_bar_stream().unwrap();
//! let sma = Sma::build_on(&mut graph, stream, CLOSE, 3).unwrap();
//!
//! let mut feed = MemoryFeed::from_closes(&[10.0, 11.0, 12.0, 13.0, 14.0]).unwrap();
//! let bars = run_step(&mut graph, &mut feed, stream, sma).unwrap();
//! assert_eq!(bars, 5);
//!
//! let line = graph.series(sma).line(0).unwrap();
//! assert!(line.at(1).unwrap().is_nan());
//! assert_eq!(line.at(2).unwrap(), 11.0);
//! assert_eq!(line.at(4).unwrap(), 13.0);
//! ```

use tracing::debug;

use crate::error::Result;
use crate::feed::BarSource;
use crate::graph::engine::{Graph, NodeId};
use crate::graph::topology::Topology;
use crate::traits::SeriesElement;

/// Replays a feed bar-by-bar: each pulled bar is pushed into `stream` and
/// the root is advanced once.
///
/// Returns the number of bars processed.
///
/// # Errors
///
/// Returns [`Error::CyclicDependency`](crate::Error::CyclicDependency) if
/// the graph's topology is invalid, or any error the feed push or a
/// lifecycle callback produces.
pub fn run_step<T, S>(
    graph: &mut Graph<T>,
    source: &mut S,
    stream: NodeId,
    root: NodeId,
) -> Result<usize>
where
    T: SeriesElement,
    S: BarSource<T>,
{
    let topology = Topology::from_graph(graph)?;
    debug!(nodes = topology.len(), "step run starting");

    let mut bars = 0;
    while let Some(bar) = source.next_bar() {
        graph.push_bar(stream, &bar)?;
        graph.advance_one(root)?;
        bars += 1;
    }
    debug!(bars, "step run finished");
    Ok(bars)
}

/// Preloads the whole feed into `stream`, then computes the root once in a
/// vectorized batch pass.
///
/// Returns the number of bars preloaded.
///
/// # Errors
///
/// Returns [`Error::CyclicDependency`](crate::Error::CyclicDependency) if
/// the graph's topology is invalid, or any error the feed push or a
/// lifecycle callback produces.
pub fn run_batch<T, S>(
    graph: &mut Graph<T>,
    source: &mut S,
    stream: NodeId,
    root: NodeId,
) -> Result<usize>
where
    T: SeriesElement,
    S: BarSource<T>,
{
    let topology = Topology::from_graph(graph)?;
    debug!(nodes = topology.len(), "batch run starting");

    let mut bars = 0;
    while let Some(bar) = source.next_bar() {
        graph.push_bar(stream, &bar)?;
        bars += 1;
    }
    graph.compute_all(root)?;
    debug!(bars, "batch run finished");
    Ok(bars)
}
