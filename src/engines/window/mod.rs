//! Sliding-window driver
//!
//! `WindowEngine` walks a sequence one symbol at a time and evaluates every
//! window of the strategy's length. The first window is always computed
//! from scratch; later windows are derived from the previous window's
//! measurement and the symbol that slid out, unless a full-recompute mode
//! was selected.

use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

use crate::engines::compute::{GcContentStrategy, Measurement, MetricStrategy, MetricVector};
use crate::engines::core::MaybeSync;
use crate::engines::{EngineError, EngineResult};

/// Default window length, matching the annotator workflow
pub const DEFAULT_WINDOW_SIZE: usize = 50;

/// A validated window length (always at least 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowSpec {
    window_size: usize,
}

impl WindowSpec {
    /// Validate a window length
    pub fn new(window_size: usize) -> EngineResult<Self> {
        if window_size == 0 {
            return Err(EngineError::InvalidConfiguration(
                "Window size must be at least 1, got 0".to_string(),
            ));
        }

        Ok(Self { window_size })
    }

    /// Validate a window length coming from a signed caller-native integer
    pub fn from_signed(window_size: i64) -> EngineResult<Self> {
        let window_size = usize::try_from(window_size).map_err(|_| {
            EngineError::InvalidConfiguration(format!(
                "Window size must be a positive integer, got {}",
                window_size
            ))
        })?;

        Self::new(window_size)
    }

    /// The window length
    pub fn get(&self) -> usize {
        self.window_size
    }

    /// Number of complete windows in a sequence of `sequence_len` symbols
    pub fn window_count(&self, sequence_len: usize) -> usize {
        (sequence_len + 1).saturating_sub(self.window_size)
    }
}

/// How windows after the first one are evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Derive each window from its left neighbour (sequential, `O(1)` per
    /// window for strategies with a fast path)
    #[default]
    Incremental,
    /// Recompute every window from scratch, sequentially
    Full,
    /// Recompute every window from scratch on the shared thread pool.
    /// Requires the `parallel` feature.
    Parallel,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Window length in symbols
    pub window_size: usize,
    /// Evaluation mode
    #[serde(default)]
    pub mode: EvaluationMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            mode: EvaluationMode::default(),
        }
    }
}

impl EngineConfig {
    /// Create a configuration for the given window length
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            ..Self::default()
        }
    }

    /// Set the evaluation mode
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check the configuration before any windowing begins
    pub fn validate(&self) -> EngineResult<WindowSpec> {
        WindowSpec::new(self.window_size)
    }
}

// Carry-over between consecutive windows of one run
struct SlideState<T> {
    previous: Measurement<T>,
    leading: u8,
}

/// Lazy iterator over the metric vectors of every window, in offset order
pub struct SlidingWindows<'a, S: MetricStrategy> {
    sequence: &'a [u8],
    strategy: &'a S,
    window_size: usize,
    offset: usize,
    incremental: bool,
    state: Option<SlideState<S::Tally>>,
}

impl<'a, S: MetricStrategy> SlidingWindows<'a, S> {
    fn new(sequence: &'a [u8], strategy: &'a S, incremental: bool) -> Self {
        Self {
            sequence,
            strategy,
            window_size: strategy.window_size(),
            offset: 0,
            incremental,
            state: None,
        }
    }

    fn remaining(&self) -> usize {
        (self.sequence.len() + 1).saturating_sub(self.window_size + self.offset)
    }
}

impl<'a, S: MetricStrategy> Iterator for SlidingWindows<'a, S> {
    type Item = MetricVector;

    fn next(&mut self) -> Option<Self::Item> {
        let end = self.offset + self.window_size;
        if self.window_size == 0 || end > self.sequence.len() {
            self.state = None;
            return None;
        }

        let window = &self.sequence[self.offset..end];
        let measurement = match self.state.as_ref() {
            Some(state) if self.incremental => {
                self.strategy
                    .compute_incremental(window, &state.previous, state.leading)
            }
            _ => self.strategy.compute_full(window),
        };

        let metrics = measurement.metrics.clone();
        self.state = Some(SlideState {
            previous: measurement,
            leading: window[0],
        });
        self.offset += 1;

        Some(metrics)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.window_size == 0 { 0 } else { self.remaining() };
        (remaining, Some(remaining))
    }
}

impl<'a, S: MetricStrategy> ExactSizeIterator for SlidingWindows<'a, S> {}

impl<'a, S: MetricStrategy> FusedIterator for SlidingWindows<'a, S> {}

/// Sliding-window driver over a metric strategy
#[derive(Debug, Clone)]
pub struct WindowEngine<S> {
    strategy: S,
    spec: WindowSpec,
    mode: EvaluationMode,
}

impl<S: MetricStrategy> WindowEngine<S> {
    /// Create an engine around a strategy, in incremental mode
    pub fn new(strategy: S) -> EngineResult<Self> {
        let spec = WindowSpec::new(strategy.window_size())?;

        Ok(Self {
            strategy,
            spec,
            mode: EvaluationMode::Incremental,
        })
    }

    /// Set the evaluation mode
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// The strategy in use
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The window length
    pub fn window_size(&self) -> usize {
        self.spec.get()
    }

    /// The evaluation mode
    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Lazily evaluate every window of `sequence`.
    ///
    /// `Parallel` mode has no lazy form; it walks sequentially like `Full`.
    pub fn windows<'a>(&'a self, sequence: &'a [u8]) -> SlidingWindows<'a, S> {
        SlidingWindows::new(
            sequence,
            &self.strategy,
            self.mode == EvaluationMode::Incremental,
        )
    }
}

impl<S: MetricStrategy + MaybeSync> WindowEngine<S> {
    /// Evaluate every window of `sequence`, one metric vector per window
    /// start offset in ascending order.
    ///
    /// A sequence shorter than the window yields an empty result.
    pub fn run(&self, sequence: &[u8]) -> EngineResult<Vec<MetricVector>> {
        log::debug!(
            "Sliding window run: length={} window={} mode={:?} windows={}",
            sequence.len(),
            self.spec.get(),
            self.mode,
            self.spec.window_count(sequence.len())
        );

        match self.mode {
            EvaluationMode::Incremental | EvaluationMode::Full => {
                Ok(self.windows(sequence).collect())
            }
            EvaluationMode::Parallel => self.run_parallel(sequence),
        }
    }

    #[cfg(feature = "parallel")]
    fn run_parallel(&self, sequence: &[u8]) -> EngineResult<Vec<MetricVector>> {
        crate::engines::core::parallel::par_compute_full(sequence, &self.strategy)
    }

    #[cfg(not(feature = "parallel"))]
    fn run_parallel(&self, _sequence: &[u8]) -> EngineResult<Vec<MetricVector>> {
        Err(EngineError::UnsupportedOperation(
            "Parallel evaluation requires the `parallel` feature".to_string(),
        ))
    }
}

impl WindowEngine<GcContentStrategy> {
    /// Build a GC-content engine from a configuration
    pub fn gc_content(config: &EngineConfig) -> EngineResult<Self> {
        let spec = config.validate()?;
        let strategy = GcContentStrategy::new(spec.get())?;

        Ok(Self::new(strategy)?.with_mode(config.mode))
    }
}
