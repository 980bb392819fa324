//! GC content over sliding windows
//!
//! The full path counts the class members of a window in `O(k)`. The
//! incremental path takes the previous window's exact member count,
//! uncounts the symbol that slid out and counts the symbol that slid in,
//! which is `O(1)` per window.

use super::{Measurement, MetricStrategy};
use crate::engines::{EngineError, EngineResult};
use crate::modules::seq::SymbolClass;

/// Fraction of class members (G/C by default) in each window
#[derive(Debug, Clone)]
pub struct GcContentStrategy {
    window_size: usize,
    class: SymbolClass,
}

impl GcContentStrategy {
    /// Create a GC-content strategy for windows of `window_size` symbols
    pub fn new(window_size: usize) -> EngineResult<Self> {
        Self::with_class(window_size, SymbolClass::gc())
    }

    /// Create a composition strategy counting members of `class`
    pub fn with_class(window_size: usize, class: SymbolClass) -> EngineResult<Self> {
        if window_size == 0 {
            return Err(EngineError::InvalidConfiguration(
                "Window size must be at least 1".to_string(),
            ));
        }

        Ok(Self { window_size, class })
    }

    /// The classification predicate in use
    pub fn class(&self) -> &SymbolClass {
        &self.class
    }

    #[inline]
    fn fraction(&self, count: usize) -> f64 {
        count as f64 / self.window_size as f64
    }
}

impl MetricStrategy for GcContentStrategy {
    /// Exact number of class members in the window
    type Tally = usize;

    fn window_size(&self) -> usize {
        self.window_size
    }

    fn compute_full(&self, window: &[u8]) -> Measurement<usize> {
        let count = self.class.count(window);
        Measurement::new(vec![self.fraction(count)], count)
    }

    fn compute_incremental(
        &self,
        window: &[u8],
        previous: &Measurement<usize>,
        previous_leading: u8,
    ) -> Measurement<usize> {
        debug_assert_eq!(window.len(), self.window_size);

        let mut count = previous.tally;

        if self.class.contains(previous_leading) {
            count = count.saturating_sub(1);
        }

        if let Some(&trailing) = window.last() {
            if self.class.contains(trailing) {
                count += 1;
            }
        }

        Measurement::new(vec![self.fraction(count)], count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_window() {
        let result = GcContentStrategy::new(0);
        assert!(matches!(result, Err(EngineError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_compute_full() {
        let strategy = GcContentStrategy::new(4).unwrap();

        assert_eq!(strategy.compute_full(b"ACGT").metrics, vec![0.5]);
        assert_eq!(strategy.compute_full(b"GCGC").metrics, vec![1.0]);
        assert_eq!(strategy.compute_full(b"ATAT").metrics, vec![0.0]);
        // Ambiguity codes and gaps are silently non-GC
        assert_eq!(strategy.compute_full(b"GN-S").metrics, vec![0.25]);
    }

    #[test]
    fn test_case_insensitive() {
        let strategy = GcContentStrategy::new(4).unwrap();
        assert_eq!(
            strategy.compute_full(b"gcgc"),
            strategy.compute_full(b"GCGC")
        );
    }

    #[test]
    fn test_compute_incremental() {
        let strategy = GcContentStrategy::new(3).unwrap();
        let first = strategy.compute_full(b"GCA");
        assert_eq!(first.tally, 2);

        // G leaves, T enters
        let second = strategy.compute_incremental(b"CAT", &first, b'G');
        assert_eq!(second.tally, 1);
        assert_eq!(second.metrics, vec![1.0 / 3.0]);

        // C leaves, G enters
        let third = strategy.compute_incremental(b"ATG", &second, b'C');
        assert_eq!(third.tally, 1);

        // A leaves, C enters
        let fourth = strategy.compute_incremental(b"TGC", &third, b'A');
        assert_eq!(fourth.tally, 2);
        assert_eq!(fourth, strategy.compute_full(b"TGC"));
    }

    #[test]
    fn test_custom_class() {
        let strategy = GcContentStrategy::with_class(4, SymbolClass::at()).unwrap();
        let first = strategy.compute_full(b"AACG");
        assert_eq!(first.metrics, vec![0.5]);

        let next = strategy.compute_incremental(b"ACGU", &first, b'A');
        assert_eq!(next.metrics, vec![0.5]);
        assert_eq!(next, strategy.compute_full(b"ACGU"));
    }
}
