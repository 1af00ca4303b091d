//! lineflow: dual-mode line-graph engine for time-series analytics
//!
//! This crate is the computation core of a backtesting engine: a dataflow
//! graph in which nodes consume time-ordered streams and lazily produce
//! derived streams, synchronized to a shared notion of "current bar".
//!
//! # Features
//!
//! - **Dual execution modes**: bar-by-bar stepping and one-pass vectorized
//!   batch computation produce identical buffers
//! - **Warm-up tracking**: every node knows how many bars it needs before
//!   its output is valid, and warm-up requirements propagate through the
//!   graph automatically
//! - **Deterministic ordering**: children compute before parents, observers
//!   after, with no interleaving
//! - **Generics**: works with both `f32` and `f64` series
//!
//! # Quick Start
//!
//! ```
//! use lineflow::graph::Graph;
//! use lineflow::indicators::Sma;
//!
//! let mut graph: Graph<f64> = Graph::new();
//! let close = graph.add_stream(["close"]).unwrap();
//! let sma = Sma::build(&mut graph, close, 3).unwrap();
//!
//! // Step mode: one bar at a time.
//! for value in [10.0, 11.0, 12.0, 13.0, 14.0] {
//!     graph.push_record(close, &[value]).unwrap();
//!     graph.advance_one(sma).unwrap();
//! }
//!
//! let line = graph.series(sma).line(0).unwrap();
//! // First two bars are NaN (warm-up), then the rolling mean.
//! assert!(line.at(0).unwrap().is_nan());
//! assert_eq!(line.at(2).unwrap(), 11.0);
//! assert_eq!(line.at(4).unwrap(), 13.0);
//! ```
//!
//! # Architecture
//!
//! - [`line`]: append-only buffers with a movable cursor
//! - [`series`]: named, fixed-arity groups of lines
//! - [`graph`]: the node arena, construction protocol, scheduler, bindings,
//!   and topology introspection
//! - [`feed`]: the bar-record contract feeds use to grow streams
//! - [`runner`]: step and batch run drivers
//! - [`indicators`]: concrete dual-mode nodes
//!
//! # Error Handling
//!
//! Every fallible operation returns [`Result`]; the engine performs no
//! silent recovery. A construction or computation error aborts the run.
//!
//! ```
//! use lineflow::graph::{Graph, NodeDecl};
//! use lineflow::Error;
//!
//! let mut graph: Graph<f64> = Graph::new();
//! // No data inputs and no enclosing node: there is no clock to borrow.
//! let err = graph
//!     .build_node(NodeDecl::indicator(["out"]), &[], |_| {
//!         unreachable!("init never runs without a clock")
//!     })
//!     .unwrap_err();
//! assert_eq!(err, Error::NoClock);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod feed;
pub mod graph;
pub mod indicators;
pub mod line;
pub mod prelude;
pub mod runner;
pub mod series;
pub mod traits;
pub mod utils;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use graph::{Graph, NodeDecl, NodeId, NodeKind, NodeLogic, NodeView, Phase, Topology};
pub use line::LineBuffer;
pub use series::LineSeries;
pub use traits::SeriesElement;
