//! Error types for lineflow.
//!
//! This module defines the error types used throughout the engine for
//! construction, access, and execution failures. The core performs no silent
//! recovery: every error propagates to the caller of the construction or run
//! entry point and aborts the operation.

use thiserror::Error;

/// The main error type for lineflow operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A node was built with no data inputs and no owner to borrow a clock
    /// from.
    ///
    /// Every node must synchronize to a clock stream. When no input streams
    /// are supplied, the enclosing node under construction provides the
    /// clock; at top level there is no such fallback and the graph cannot
    /// be constructed.
    #[error("node has no data inputs and no owner to provide a clock")]
    NoClock,

    /// A line access referenced a slot outside the written or cursor range.
    ///
    /// Raised for reads at positive offsets, reads before the start of
    /// storage, writes at a non-current offset, and absolute accesses past
    /// the allocated buffer. Signals a logic bug in a node callback.
    #[error("line access out of range: index {index}, length {len}")]
    OutOfRange {
        /// The offending relative offset or absolute index.
        index: isize,
        /// The accessible length at the time of the access.
        len: usize,
    },

    /// A binding referenced a line index outside the declared arity.
    #[error("binding references line {line} outside declared arity {arity}")]
    BindingRange {
        /// The out-of-range line index.
        line: usize,
        /// The declared arity of the line group.
        arity: usize,
    },

    /// A steady-state callback was dispatched before the warm-up
    /// requirement was satisfied.
    ///
    /// This is an internal invariant failure of the scheduler, not a
    /// user-recoverable condition.
    #[error("steady-state dispatch at length {length} before min period {min_period}")]
    MinPeriodViolation {
        /// The series length at dispatch time.
        length: usize,
        /// The node's warm-up requirement.
        min_period: usize,
    },

    /// A record did not match the arity of the stream it was pushed into.
    ///
    /// The stream is left untouched: a rejected record never advances the
    /// stream length.
    #[error("record arity mismatch: expected {expected} values, got {actual}")]
    ArityMismatch {
        /// The stream's declared line count.
        expected: usize,
        /// The number of values supplied.
        actual: usize,
    },

    /// The period parameter is invalid.
    #[error("invalid period {period}: {reason}")]
    InvalidPeriod {
        /// The invalid period value that was provided.
        period: usize,
        /// Description of why the period is invalid.
        reason: &'static str,
    },

    /// A cyclic dependency was detected in the node graph.
    ///
    /// Cycles can only arise from manual child registration after
    /// construction; the builder protocol cannot create one.
    #[error("cyclic dependency detected involving node {node_id}")]
    CyclicDependency {
        /// Arena index of a node that participates in the cycle.
        node_id: usize,
    },

    /// A line name lookup found no line with that name.
    #[error("unknown line name: {name}")]
    UnknownLine {
        /// The name that failed to resolve.
        name: String,
    },

    /// A record push targeted a node that is not a plain stream.
    ///
    /// Derived nodes grow through the scheduler, never through the feed
    /// path.
    #[error("node {node_id} is not a stream and cannot be fed records")]
    NotAStream {
        /// Arena index of the node.
        node_id: usize,
    },

    /// An output binding was declared on a node without an owner.
    #[error("node {node_id} has no owner to bind output lines into")]
    NoOwner {
        /// Arena index of the node.
        node_id: usize,
    },

    /// Failed to convert a numeric value to the series element type.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },
}

/// Convenience type alias for Results using the lineflow Error type.
pub type Result<T> = std::result::Result<T, Error>;
