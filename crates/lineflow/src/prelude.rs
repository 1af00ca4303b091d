//! Commonly used types and traits for convenient importing.
//!
//! # Usage
//!
//! ```
//! use lineflow::prelude::*;
//!
//! let mut graph: Graph<f64> = Graph::new();
//! let close = graph.add_stream(["close"]).unwrap();
//! let sma = Sma::build(&mut graph, close, 3).unwrap();
//!
//! let mut feed = MemoryFeed::from_closes(&[10.0, 11.0, 12.0]).unwrap();
//! while let Some(bar) = feed.next_bar() {
//!     graph.push_record(close, &[bar.close]).unwrap();
//!     graph.advance_one(sma).unwrap();
//! }
//! assert_eq!(graph.series(sma).line(0).unwrap().get(0).unwrap(), 11.0);
//! ```
//!
//! # Contents
//!
//! - Error handling: [`Error`], [`Result`]
//! - Storage: [`LineBuffer`], [`LineSeries`]
//! - Graph: [`Graph`], [`NodeId`], [`NodeDecl`], [`NodeKind`],
//!   [`NodeLogic`], [`NodeView`], [`Phase`], [`Topology`]
//! - Feeds: [`Bar`], [`BarSource`], [`MemoryFeed`]
//! - Drivers: [`run_step`], [`run_batch`]
//! - Nodes: [`Sma`], [`Ema`], [`Peak`]

pub use crate::error::{Error, Result};

pub use crate::traits::SeriesElement;

pub use crate::line::LineBuffer;
pub use crate::series::LineSeries;

pub use crate::graph::{
    Graph, LineBinding, NodeBuilder, NodeDecl, NodeId, NodeKind, NodeLogic, NodeView, Phase,
    Topology,
};

pub use crate::feed::{Bar, BarSource, MemoryFeed, BAR_LINES, CLOSE};

pub use crate::runner::{run_batch, run_step};

pub use crate::indicators::{Ema, Peak, Sma};

pub use crate::utils::{approx_eq, approx_eq_relative, count_nan_prefix, EPSILON, LOOSE_EPSILON};
