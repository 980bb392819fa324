//! Labeled half-open intervals over a sequence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use super::AnnotationResult;
use crate::engines::compute::{GcContentStrategy, MetricStrategy};
use crate::modules::seq::SymbolClass;

/// Symbol composition of one interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositionStats {
    /// Symbols in the class (G/C by default)
    pub gc_count: usize,
    /// Every other symbol (A/T, N, gaps, ...)
    pub other_count: usize,
    /// `gc_count` as a fraction of the interval length
    pub gc_content: f64,
}

impl CompositionStats {
    /// Measure a slice with the given symbol class
    pub fn measure(subsequence: &[u8], class: &SymbolClass) -> AnnotationResult<Self> {
        if subsequence.is_empty() {
            return Ok(Self {
                gc_count: 0,
                other_count: 0,
                gc_content: 0.0,
            });
        }

        let strategy = GcContentStrategy::with_class(subsequence.len(), class.clone())?;
        let measurement = strategy.compute_full(subsequence);

        Ok(Self {
            gc_count: measurement.tally,
            other_count: subsequence.len() - measurement.tally,
            gc_content: measurement.metrics[0],
        })
    }

    /// Total number of symbols measured
    pub fn total(&self) -> usize {
        self.gc_count + self.other_count
    }
}

/// A span `[start, stop)` where every position carries the same label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateInterval<L> {
    label: L,
    start: usize,
    stop: usize,
    /// p-value assigned by the annotator, if there was enough data
    pub score: Option<f64>,
    /// Composition of the spanned symbols, once measured
    pub composition: Option<CompositionStats>,
}

impl<L> StateInterval<L> {
    /// Create a new interval
    pub fn new(label: L, start: usize, stop: usize) -> Self {
        debug_assert!(start <= stop);
        Self {
            label,
            start,
            stop,
            score: None,
            composition: None,
        }
    }

    pub fn label(&self) -> &L {
        &self.label
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn stop(&self) -> usize {
        self.stop
    }

    /// Number of positions spanned
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// The spanned positions
    pub fn range(&self) -> Range<usize> {
        self.start..self.stop
    }

    /// Replace the label, keeping the span
    pub fn relabel<M>(self, label: M) -> StateInterval<M> {
        StateInterval {
            label,
            start: self.start,
            stop: self.stop,
            score: self.score,
            composition: self.composition,
        }
    }

    /// Measure the composition of the spanned part of `sequence`
    pub fn set_composition(&mut self, sequence: &[u8], class: &SymbolClass) -> AnnotationResult<()> {
        let stop = self.stop.min(sequence.len());
        let start = self.start.min(stop);
        self.composition = Some(CompositionStats::measure(&sequence[start..stop], class)?);
        Ok(())
    }
}

impl<L: fmt::Display> fmt::Display for StateInterval<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}-{}", self.label, self.start, self.stop)?;

        if let Some(composition) = &self.composition {
            match self.score {
                Some(score) => write!(f, "\t{}\t{}", score, composition.gc_content)?,
                None => write!(f, "\tNot Enough Data\t{}", composition.gc_content)?,
            }
        }

        Ok(())
    }
}
