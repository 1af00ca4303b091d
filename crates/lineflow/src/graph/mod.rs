//! The dataflow graph: construction, scheduling, bindings, and topology.
//!
//! This module is the engine core. Nodes live in a central arena
//! ([`Graph`]) and reference each other by [`NodeId`]; behavior attaches as
//! [`NodeLogic`] implementations; execution runs either bar-by-bar
//! ([`Graph::advance_one`]) or in one vectorized sweep
//! ([`Graph::compute_all`]), and the two must agree.
//!
//! # Module Organization
//!
//! - [`engine`]: the arena, the construction-context stack, registration
//! - [`node`]: node kinds, the lifecycle trait, the dispatch view
//! - [`sched`]: the step and batch execution strategies
//! - [`binding`]: declared line aliases and their resolution
//! - [`topology`]: petgraph snapshot, execution order, cycle detection
//!
//! # Example
//!
//! ```
//! use lineflow::graph::{Graph, NodeDecl, NodeLogic, NodeView};
//! use lineflow::Result;
//!
//! /// Difference between the two most recent bars.
//! struct Momentum;
//!
//! impl NodeLogic<f64> for Momentum {
//!     fn next(&mut self, v: &mut NodeView<'_, f64>) -> Result<()> {
//!         let now = v.input(0, 0, 0)?;
//!         let prev = v.input(0, 0, -1)?;
//!         v.output(0, now - prev)
//!     }
//! }
//!
//! let mut graph: Graph<f64> = Graph::new();
//! let close = graph.add_stream(["close"]).unwrap();
//! let momentum = graph
//!     .build_node(NodeDecl::indicator(["mom"]), &[close], |b| {
//!         b.raise_min_period(2)?;
//!         Ok(Box::new(Momentum))
//!     })
//!     .unwrap();
//!
//! for value in [10.0, 12.0, 11.0] {
//!     graph.push_record(close, &[value]).unwrap();
//!     graph.advance_one(momentum).unwrap();
//! }
//!
//! let line = graph.series(momentum).line(0).unwrap();
//! assert!(line.at(0).unwrap().is_nan());
//! assert_eq!(line.at(1).unwrap(), 2.0);
//! assert_eq!(line.at(2).unwrap(), -1.0);
//! ```

pub mod binding;
pub mod engine;
pub mod node;
pub mod sched;
pub mod topology;

pub use binding::LineBinding;
pub use engine::{Graph, NodeBuilder, NodeId};
pub use node::{NodeDecl, NodeKind, NodeLogic, NodeView};
pub use sched::Phase;
pub use topology::Topology;
