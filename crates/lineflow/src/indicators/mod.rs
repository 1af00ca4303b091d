//! Concrete node implementations.
//!
//! Each indicator here implements **both** execution modes — the
//! incremental `next` family and the vectorized `once` pass — with
//! identical arithmetic, so running a graph in step mode or batch mode
//! leaves identical buffers behind.
//!
//! # Available Nodes
//!
//! - [`Sma`]: simple moving average (rolling mean)
//! - [`Ema`]: exponential moving average, SMA-seeded
//! - [`Peak`]: observer tracking the running maximum of its clock

pub mod ema;
pub mod peak;
pub mod sma;

pub use ema::Ema;
pub use peak::Peak;
pub use sma::Sma;
