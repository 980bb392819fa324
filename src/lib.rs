//! Sliding-window k-mer metrics
//!
//! The engine walks a sequence one symbol at a time and evaluates a
//! pluggable metric strategy on every fixed-size window, deriving each
//! window from its left neighbour when the strategy supports it.
//! GC content is the shipped metric; `modules::annotate` builds a
//! GC-content state annotator on top of it.

pub mod engines;
pub mod modules;

pub use engines::compute::{FullRecompute, GcContentStrategy, Measurement, MetricStrategy, MetricVector};
pub use engines::window::{EngineConfig, EvaluationMode, SlidingWindows, WindowEngine, WindowSpec};
pub use engines::{EngineError, EngineResult};

/// Compute GC content with a sliding window across an entire sequence.
///
/// Returns one single-element metric vector per window start offset. A
/// sequence shorter than the window yields an empty result; a window size
/// below 1 is rejected before any window is evaluated.
pub fn compute_gc_content(sequence: &str, kmer_size: i64) -> EngineResult<Vec<MetricVector>> {
    let spec = WindowSpec::from_signed(kmer_size)?;
    WindowEngine::gc_content(&EngineConfig::new(spec.get()))?.run(sequence.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_gc_content() {
        let results = compute_gc_content("AGGCCTA", 2).unwrap();
        assert_eq!(
            results,
            vec![vec![0.5], vec![1.0], vec![1.0], vec![1.0], vec![0.5], vec![0.0]]
        );
    }

    #[test]
    fn test_compute_gc_content_edge_cases() {
        assert!(compute_gc_content("", 3).unwrap().is_empty());
        assert!(compute_gc_content("AGGCCTA", 200).unwrap().is_empty());

        for kmer_size in [0, -2] {
            let err = compute_gc_content("AGGCCTA", kmer_size).unwrap_err();
            assert!(matches!(err, EngineError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn test_case_insensitive_entry_point() {
        assert_eq!(
            compute_gc_content("gcgc", 4).unwrap(),
            compute_gc_content("GCGC", 4).unwrap()
        );
    }
}
