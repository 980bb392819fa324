//! One-dimensional k-means
//!
//! Lloyd's algorithm seeded at evenly spaced order statistics of the input,
//! so results are deterministic and cluster indices follow centroid order
//! at initialization (cluster 0 starts at the minimum).

use itertools::Itertools;

use super::{AnnotationError, AnnotationResult};

/// Iteration cap for Lloyd's algorithm
pub const MAX_ITERATIONS: usize = 300;

/// Result of clustering
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster index for every input value
    pub labels: Vec<usize>,
    /// Final centroid of every cluster
    pub centroids: Vec<f64>,
    /// Assignment passes performed
    pub iterations: usize,
}

impl KMeansFit {
    /// Number of distinct clusters that received at least one value
    pub fn occupied_clusters(&self) -> usize {
        self.labels.iter().unique().count()
    }
}

/// Cluster `values` into `k` groups
pub fn kmeans_1d(values: &[f64], k: usize) -> AnnotationResult<KMeansFit> {
    if k == 0 {
        return Err(AnnotationError::InvalidParameter(
            "Number of clusters must be at least 1".to_string(),
        ));
    }

    if values.is_empty() {
        return Ok(KMeansFit {
            labels: Vec::new(),
            centroids: Vec::new(),
            iterations: 0,
        });
    }

    let sorted = values.iter().copied().sorted_by(f64::total_cmp).collect_vec();
    let last = sorted.len() - 1;
    let mut centroids = (0..k)
        .map(|j| {
            let rank = if k > 1 { j * last / (k - 1) } else { 0 };
            sorted[rank.min(last)]
        })
        .collect_vec();

    let mut labels: Vec<usize> = Vec::new();
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        iterations += 1;

        let assigned = values
            .iter()
            .map(|&value| nearest(&centroids, value))
            .collect_vec();

        if assigned == labels {
            break;
        }
        labels = assigned;

        let mut sums = vec![0.0; k];
        let mut counts = vec![0usize; k];
        for (&value, &label) in values.iter().zip(labels.iter()) {
            sums[label] += value;
            counts[label] += 1;
        }

        // Empty clusters keep their previous centroid
        for j in 0..k {
            if counts[j] > 0 {
                centroids[j] = sums[j] / counts[j] as f64;
            }
        }
    }

    log::trace!(
        "k-means converged after {} iterations: centroids {:?}",
        iterations,
        centroids
    );

    Ok(KMeansFit {
        labels,
        centroids,
        iterations,
    })
}

// Ties go to the lower cluster index
fn nearest(centroids: &[f64], value: f64) -> usize {
    let mut best = 0;
    for (j, &centroid) in centroids.iter().enumerate().skip(1) {
        if (value - centroid).abs() < (value - centroids[best]).abs() {
            best = j;
        }
    }
    best
}
