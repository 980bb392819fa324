//! Parallel processing primitives
//!
//! A shared rayon pool for evaluating windows independently. Only the
//! full-recompute path can run here: incremental evaluation chains every
//! window to its left neighbour and stays sequential.

use std::sync::OnceLock;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::engines::compute::{MetricStrategy, MetricVector};
use crate::engines::{EngineError, EngineResult};

// Global thread pool for parallel window evaluation
static GLOBAL_POOL: OnceLock<ThreadPool> = OnceLock::new();

// Minimum chunks handed to each worker
const MIN_CHUNKS_PER_THREAD: usize = 4;

// Smallest run of windows worth scheduling as one task
const DEFAULT_MIN_CHUNK: usize = 1024;

/// Initialize the thread pool for parallel processing, returning it.
///
/// Safe to call repeatedly; only the first successful call builds a pool.
pub fn initialize_thread_pool() -> EngineResult<&'static ThreadPool> {
    if let Some(pool) = GLOBAL_POOL.get() {
        return Ok(pool);
    }

    let num_threads = default_num_threads();
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|idx| format!("kmer-worker-{}", idx))
        .build()
        .map_err(|e| EngineError::ComputationError(format!("Failed to create thread pool: {}", e)))?;

    let pool = GLOBAL_POOL.get_or_init(|| {
        log::info!("Initialized thread pool with {} threads", num_threads);
        pool
    });

    Ok(pool)
}

/// Get the default number of threads to use
pub fn default_num_threads() -> usize {
    num_cpus::get()
}

/// Calculate how many consecutive windows one task should evaluate
pub fn calculate_chunk_size(total_windows: usize, min_chunk_size: Option<usize>) -> usize {
    let min_size = min_chunk_size.unwrap_or(DEFAULT_MIN_CHUNK).max(1);
    let total_chunks = default_num_threads() * MIN_CHUNKS_PER_THREAD;

    (total_windows / total_chunks.max(1)).max(min_size)
}

/// Evaluate every window of `sequence` with `compute_full` on the shared pool.
///
/// The output is index-aligned with window start offsets.
pub fn par_compute_full<S>(sequence: &[u8], strategy: &S) -> EngineResult<Vec<MetricVector>>
where
    S: MetricStrategy + Sync,
{
    let window_size = strategy.window_size();
    if window_size == 0 || window_size > sequence.len() {
        return Ok(Vec::new());
    }

    let total_windows = sequence.len() - window_size + 1;
    let chunk_size = calculate_chunk_size(total_windows, None);
    let pool = initialize_thread_pool()?;

    log::debug!(
        "Evaluating {} windows in parallel (chunk size {})",
        total_windows,
        chunk_size
    );

    Ok(pool.install(|| {
        (0..total_windows)
            .into_par_iter()
            .with_min_len(chunk_size)
            .map(|offset| {
                strategy
                    .compute_full(&sequence[offset..offset + window_size])
                    .into_metrics()
            })
            .collect()
    }))
}
