//! Sequence state annotation
//!
//! An annotator assigns a state to every position of a sequence, collapses
//! runs of equal states into intervals, optionally smooths away intervals
//! that are too short, relabels them and scores them.

pub mod interval;
pub mod segment;
pub mod kmeans;
pub mod scoring;
pub mod gc_annotator;

use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

pub use gc_annotator::{AnnotatorConfig, GcContentAnnotator, GcLabel};
pub use interval::{CompositionStats, StateInterval};
pub use kmeans::{kmeans_1d, KMeansFit};
pub use scoring::{proportions_ztest, Alternative, ZTest};
pub use segment::{segment_states, smooth_intervals};

/// Error type for annotation
#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Invalid sequence: {0}")]
    InvalidSequence(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Statistics error: {0}")]
    Statistics(String),

    #[error("Engine error: {0}")]
    Engine(#[from] crate::engines::EngineError),
}

/// Result type for annotation
pub type AnnotationResult<T> = Result<T, AnnotationError>;

/// Per-position states together with the label each state stands for
#[derive(Debug, Clone)]
pub struct StateSequence<S, L> {
    pub states: Vec<S>,
    pub labels: HashMap<S, L>,
}

impl<S: Eq + Hash, L: Clone + Default> StateSequence<S, L> {
    /// Label for a state; states without a mapping get `L::default()`
    pub fn label_for(&self, state: &S) -> L {
        self.labels.get(state).cloned().unwrap_or_default()
    }
}

/// Labeled intervals produced by an annotator
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation<L> {
    intervals: Vec<StateInterval<L>>,
}

impl<L> Annotation<L> {
    pub fn new(intervals: Vec<StateInterval<L>>) -> Self {
        Self { intervals }
    }

    pub fn intervals(&self) -> &[StateInterval<L>] {
        &self.intervals
    }

    pub fn into_intervals(self) -> Vec<StateInterval<L>> {
        self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Intervals whose score is at most `alpha`; unscored intervals never qualify
    pub fn significant_hits(&self, alpha: f64) -> impl Iterator<Item = &StateInterval<L>> + '_ {
        self.intervals
            .iter()
            .filter(move |interval| matches!(interval.score, Some(p) if p <= alpha))
    }
}

/// A sequence annotator
pub trait Annotator {
    /// Per-position state
    type State: Copy + Eq + Hash;
    /// Label attached to finished intervals
    type Label: Clone + PartialEq + Default;

    /// Smallest interval that survives smoothing; `None` disables smoothing
    fn minimum_feature_size(&self) -> Option<usize>;

    /// Assign a state to every position of `sequence`
    fn compute_state_sequence(
        &self,
        sequence: &[u8],
    ) -> AnnotationResult<StateSequence<Self::State, Self::Label>>;

    /// Score finished intervals in place
    fn assign_scores(
        &self,
        intervals: &mut [StateInterval<Self::Label>],
        sequence: &[u8],
    ) -> AnnotationResult<()>;

    /// Collapse states into intervals, smooth them, then relabel
    fn compute_annotation_labels(
        &self,
        states: &StateSequence<Self::State, Self::Label>,
    ) -> Vec<StateInterval<Self::Label>> {
        let mut intervals = segment_states(&states.states);

        if let Some(minimum) = self.minimum_feature_size() {
            smooth_intervals(&mut intervals, minimum);
        }

        intervals
            .into_iter()
            .map(|interval| {
                let label = states.label_for(interval.label());
                interval.relabel(label)
            })
            .collect()
    }

    /// Annotate a sequence
    fn annotate_sequence(&self, sequence: &[u8]) -> AnnotationResult<Annotation<Self::Label>> {
        let states = self.compute_state_sequence(sequence)?;
        let mut intervals = self.compute_annotation_labels(&states);
        self.assign_scores(&mut intervals, sequence)?;

        Ok(Annotation::new(intervals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Upper-case positions are state 1, everything else state 0
    struct CaseAnnotator;

    impl Annotator for CaseAnnotator {
        type State = u8;
        type Label = &'static str;

        fn minimum_feature_size(&self) -> Option<usize> {
            None
        }

        fn compute_state_sequence(&self, sequence: &[u8]) -> AnnotationResult<StateSequence<u8, &'static str>> {
            let states = sequence.iter().map(|b| b.is_ascii_uppercase() as u8).collect();
            let labels = HashMap::from([(1, "upper")]);
            Ok(StateSequence { states, labels })
        }

        fn assign_scores(&self, intervals: &mut [StateInterval<&'static str>], _sequence: &[u8]) -> AnnotationResult<()> {
            for interval in intervals.iter_mut() {
                interval.score = Some(1.0 / interval.len() as f64);
            }
            Ok(())
        }
    }

    #[test]
    fn test_annotator_pipeline() {
        let annotation = CaseAnnotator.annotate_sequence(b"ACgtaG").unwrap();
        let spans: Vec<_> = annotation
            .intervals()
            .iter()
            .map(|iv| (*iv.label(), iv.start(), iv.stop()))
            .collect();

        // Unmapped state 0 falls back to the default label
        assert_eq!(spans, vec![("upper", 0, 2), ("", 2, 5), ("upper", 5, 6)]);

        let hits: Vec<_> = annotation.significant_hits(0.5).map(|iv| iv.start()).collect();
        assert_eq!(hits, vec![0, 2]);
    }

    #[test]
    fn test_unscored_intervals_are_never_significant() {
        let annotation = Annotation::new(vec![StateInterval::new("x", 0, 4)]);
        assert_eq!(annotation.significant_hits(1.0).count(), 0);
        assert_eq!(annotation.len(), 1);
    }
}
