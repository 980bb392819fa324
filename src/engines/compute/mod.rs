//! Metric strategies for sliding windows
//!
//! A strategy evaluates one window either from scratch (`compute_full`) or
//! from the measurement of the window one position to the left plus the
//! symbol that just slid out (`compute_incremental`). Strategies are
//! stateless: everything carried between windows travels in the
//! `Measurement` the engine hands back.

pub mod gc_content;

pub use gc_content::GcContentStrategy;

/// Ordered metric values for one window
pub type MetricVector = Vec<f64>;

/// The result of evaluating one window
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement<T> {
    /// Public metric values
    pub metrics: MetricVector,
    /// Exact strategy-defined state needed to derive the next window
    pub tally: T,
}

impl<T> Measurement<T> {
    /// Create a new measurement
    pub fn new(metrics: MetricVector, tally: T) -> Self {
        Self { metrics, tally }
    }

    /// Drop the tally, keeping only the public metrics
    pub fn into_metrics(self) -> MetricVector {
        self.metrics
    }
}

/// Capability set the window engine is polymorphic over
pub trait MetricStrategy {
    /// Exact running state carried from one window to the next.
    /// Strategies with nothing to carry use `()`.
    type Tally: Clone;

    /// Window length this strategy was built for
    fn window_size(&self) -> usize;

    /// Evaluate a window with no knowledge of prior windows
    fn compute_full(&self, window: &[u8]) -> Measurement<Self::Tally>;

    /// Evaluate a window from the previous window's measurement and the
    /// symbol that occupied the previous window's leading position.
    ///
    /// Strategies without a cheaper path keep this default, which recomputes
    /// the window from scratch.
    fn compute_incremental(
        &self,
        window: &[u8],
        _previous: &Measurement<Self::Tally>,
        _previous_leading: u8,
    ) -> Measurement<Self::Tally> {
        self.compute_full(window)
    }
}

impl<S: MetricStrategy + ?Sized> MetricStrategy for &S {
    type Tally = S::Tally;

    fn window_size(&self) -> usize {
        (**self).window_size()
    }

    fn compute_full(&self, window: &[u8]) -> Measurement<Self::Tally> {
        (**self).compute_full(window)
    }

    fn compute_incremental(
        &self,
        window: &[u8],
        previous: &Measurement<Self::Tally>,
        previous_leading: u8,
    ) -> Measurement<Self::Tally> {
        (**self).compute_incremental(window, previous, previous_leading)
    }
}

/// Wrapper that forces every window through `compute_full`
///
/// Useful as the reference when validating an incremental strategy, and as
/// the strategy behind the engine's full-recompute modes.
#[derive(Debug, Clone)]
pub struct FullRecompute<S> {
    inner: S,
}

impl<S: MetricStrategy> FullRecompute<S> {
    /// Wrap a strategy
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Get the wrapped strategy
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: MetricStrategy> MetricStrategy for FullRecompute<S> {
    type Tally = S::Tally;

    fn window_size(&self) -> usize {
        self.inner.window_size()
    }

    fn compute_full(&self, window: &[u8]) -> Measurement<Self::Tally> {
        self.inner.compute_full(window)
    }
}
