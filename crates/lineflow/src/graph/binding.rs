//! Line bindings: declared aliasing between nodes' lines.
//!
//! A binding is an ordered pair (source line, target line) meaning "target
//! reads what source writes". Bindings are declared before execution and
//! resolved by the scheduler: step mode copies the current slot after each
//! dispatch, batch mode copies the whole computed buffer once after the
//! vectorized pass. Either way, reading the bound target at a resolved
//! index equals reading the source at the same index.
//!
//! Declaration is validated eagerly: an index outside either line group's
//! declared arity fails with [`Error::BindingRange`] at bind time, never at
//! resolution time.

use crate::error::{Error, Result};
use crate::graph::engine::{Graph, NodeId};
use crate::traits::SeriesElement;

/// One declared alias from a source node's line into a target node's line.
///
/// Stored on the source node; resolved after the source computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBinding {
    /// Line index on the source node.
    pub source_line: usize,
    /// The node whose line receives the values.
    pub target: NodeId,
    /// Line index on the target node.
    pub target_line: usize,
}

impl<T: SeriesElement> Graph<T> {
    /// Declares that `source`'s lines additionally write into `target`'s
    /// lines, positionally pairing `source_lines` with `target_lines`.
    ///
    /// This is the general binding form; it covers both the "write my
    /// outputs into my owner" direction and the mirror "another node's
    /// lines read from mine" direction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArityMismatch`] if the index slices differ in
    /// length, or [`Error::BindingRange`] if any index is outside the
    /// corresponding node's declared arity.
    pub fn bind_lines(
        &mut self,
        source: NodeId,
        source_lines: &[usize],
        target: NodeId,
        target_lines: &[usize],
    ) -> Result<()> {
        if source_lines.len() != target_lines.len() {
            return Err(Error::ArityMismatch {
                expected: source_lines.len(),
                actual: target_lines.len(),
            });
        }
        let source_arity = self.nodes[source.0].series.arity();
        let target_arity = self.nodes[target.0].series.arity();
        for (&src, &tgt) in source_lines.iter().zip(target_lines) {
            if src >= source_arity {
                return Err(Error::BindingRange {
                    line: src,
                    arity: source_arity,
                });
            }
            if tgt >= target_arity {
                return Err(Error::BindingRange {
                    line: tgt,
                    arity: target_arity,
                });
            }
        }
        for (&src, &tgt) in source_lines.iter().zip(target_lines) {
            self.nodes[source.0].bindings.push(LineBinding {
                source_line: src,
                target,
                target_line: tgt,
            });
        }
        Ok(())
    }

    /// Returns the bindings declared on `source`, in declaration order.
    #[must_use]
    pub fn bindings(&self, source: NodeId) -> &[LineBinding] {
        &self.nodes[source.0].bindings
    }

    /// Copies the current slot of every bound source line into its target
    /// (step mode resolution).
    pub(crate) fn apply_step_bindings(&mut self, source: NodeId) -> Result<()> {
        for i in 0..self.nodes[source.0].bindings.len() {
            let binding = self.nodes[source.0].bindings[i];
            let value = self.nodes[source.0]
                .series
                .line(binding.source_line)?
                .get(0)?;
            self.nodes[binding.target.0]
                .series
                .line_mut(binding.target_line)?
                .set(0, value)?;
        }
        Ok(())
    }

    /// Copies the whole computed buffer of every bound source line into its
    /// target (batch mode resolution).
    pub(crate) fn apply_batch_bindings(&mut self, source: NodeId) -> Result<()> {
        for i in 0..self.nodes[source.0].bindings.len() {
            let binding = self.nodes[source.0].bindings[i];
            let len = self.nodes[source.0]
                .series
                .line(binding.source_line)?
                .buflen()
                .min(
                    self.nodes[binding.target.0]
                        .series
                        .line(binding.target_line)?
                        .buflen(),
                );
            for index in 0..len {
                let value = self.nodes[source.0]
                    .series
                    .line(binding.source_line)?
                    .at(index)?;
                self.nodes[binding.target.0]
                    .series
                    .line_mut(binding.target_line)?
                    .put(index, value)?;
            }
        }
        Ok(())
    }
}
