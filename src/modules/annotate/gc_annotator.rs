//! Two-state annotation by relative GC content
//!
//! Windowed GC content is clustered into two groups; the group with the
//! richer GC content is labeled high, the other low. Intervals are then
//! scored with a proportion z-test against a baseline pooled from the other
//! intervals carrying the same label.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::iter;

use super::interval::StateInterval;
use super::kmeans::kmeans_1d;
use super::scoring::{proportions_ztest, Alternative};
use super::{AnnotationError, AnnotationResult, Annotator, StateSequence};
use crate::engines::compute::GcContentStrategy;
use crate::engines::window::WindowEngine;
use crate::modules::seq::SymbolClass;

/// Number of clusters the GC content is split into
const NUMBER_OF_STATES: usize = 2;

/// Interval labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GcLabel {
    HighGc,
    LowGc,
    /// Only one cluster was observed, so no relative call can be made
    #[default]
    Unknown,
}

impl fmt::Display for GcLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            GcLabel::HighGc => "High GC Content",
            GcLabel::LowGc => "Low GC Content",
            GcLabel::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Annotator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Sliding window length used for GC content
    pub kmer_length: usize,
    /// Smallest interval that survives smoothing; `None` disables smoothing
    pub minimum_feature_size: Option<usize>,
    /// Significance level for `significant_hits`
    pub alpha: f64,
    /// Baseline size below which an interval is left unscored
    pub min_baseline_bases: usize,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            kmer_length: 50,
            minimum_feature_size: Some(10),
            alpha: 0.01,
            min_baseline_bases: 30,
        }
    }
}

impl AnnotatorConfig {
    pub fn with_kmer_length(mut self, kmer_length: usize) -> Self {
        self.kmer_length = kmer_length;
        self
    }

    pub fn with_minimum_feature_size(mut self, minimum_feature_size: Option<usize>) -> Self {
        self.minimum_feature_size = minimum_feature_size;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_min_baseline_bases(mut self, min_baseline_bases: usize) -> Self {
        self.min_baseline_bases = min_baseline_bases;
        self
    }
}

// Summed composition of every interval carrying one label
#[derive(Debug, Clone, Copy, Default)]
struct Baseline {
    other: usize,
    gc: usize,
}

/// Annotates a sequence with high/low GC content intervals
#[derive(Debug, Clone)]
pub struct GcContentAnnotator {
    config: AnnotatorConfig,
    engine: WindowEngine<GcContentStrategy>,
}

impl GcContentAnnotator {
    /// Create an annotator, validating the configuration
    pub fn new(config: AnnotatorConfig) -> AnnotationResult<Self> {
        if !(config.alpha > 0.0 && config.alpha <= 1.0) {
            return Err(AnnotationError::InvalidParameter(format!(
                "Alpha must lie in (0, 1], got {}",
                config.alpha
            )));
        }

        let engine = WindowEngine::new(GcContentStrategy::new(config.kmer_length)?)?;

        Ok(Self { config, engine })
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Intervals of `annotation` significant at the configured alpha
    pub fn significant_hits<'a>(
        &self,
        annotation: &'a super::Annotation<GcLabel>,
    ) -> Vec<&'a StateInterval<GcLabel>> {
        annotation.significant_hits(self.config.alpha).collect()
    }

    fn class(&self) -> &SymbolClass {
        self.engine.strategy().class()
    }

    // The first two clusters to appear are compared by the GC content of the
    // window where each first appears
    fn label_clusters(states: &[usize], gc_content: &[f64]) -> HashMap<usize, GcLabel> {
        let candidates = states
            .iter()
            .copied()
            .zip(gc_content.iter().copied())
            .unique_by(|(state, _)| *state)
            .take(NUMBER_OF_STATES)
            .collect_vec();

        match candidates.as_slice() {
            [(only, _)] => HashMap::from([(*only, GcLabel::Unknown)]),
            [(first, first_gc), (second, second_gc)] => {
                if first_gc > second_gc {
                    HashMap::from([(*first, GcLabel::HighGc), (*second, GcLabel::LowGc)])
                } else {
                    HashMap::from([(*first, GcLabel::LowGc), (*second, GcLabel::HighGc)])
                }
            }
            _ => HashMap::new(),
        }
    }

    fn baselines(intervals: &[StateInterval<GcLabel>]) -> HashMap<GcLabel, Baseline> {
        let mut baselines: HashMap<GcLabel, Baseline> = HashMap::new();

        for interval in intervals {
            if let Some(composition) = &interval.composition {
                let baseline = baselines.entry(*interval.label()).or_default();
                baseline.other += composition.other_count;
                baseline.gc += composition.gc_count;
            }
        }

        baselines
    }
}

impl Annotator for GcContentAnnotator {
    type State = usize;
    type Label = GcLabel;

    fn minimum_feature_size(&self) -> Option<usize> {
        self.config.minimum_feature_size
    }

    fn compute_state_sequence(
        &self,
        sequence: &[u8],
    ) -> AnnotationResult<StateSequence<usize, GcLabel>> {
        let kmer_length = self.config.kmer_length;
        if sequence.len() < kmer_length {
            return Err(AnnotationError::InvalidSequence(format!(
                "kmer size of {} is larger than the provided sequence of length {}",
                kmer_length,
                sequence.len()
            )));
        }

        let gc_content = self
            .engine
            .run(sequence)?
            .into_iter()
            .map(|metrics| metrics[0])
            .collect_vec();

        let fit = kmeans_1d(&gc_content, NUMBER_OF_STATES)?;
        log::debug!(
            "Clustered {} windows into {} states (centroids {:?})",
            gc_content.len(),
            fit.occupied_clusters(),
            fit.centroids
        );

        let labels = Self::label_clusters(&fit.labels, &gc_content);

        // Center each window's state on the middle of the window, then carry
        // the last state to the end of the sequence
        let (first, last) = match (fit.labels.first(), fit.labels.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                return Err(AnnotationError::InvalidSequence(
                    "Sequence produced no windows".to_string(),
                ))
            }
        };
        let states = iter::repeat(first)
            .take(kmer_length / 2)
            .chain(fit.labels.iter().copied())
            .chain(iter::repeat(last))
            .take(sequence.len())
            .collect_vec();

        Ok(StateSequence { states, labels })
    }

    fn assign_scores(
        &self,
        intervals: &mut [StateInterval<GcLabel>],
        sequence: &[u8],
    ) -> AnnotationResult<()> {
        for interval in intervals.iter_mut() {
            interval.set_composition(sequence, self.class())?;
        }

        let baselines = Self::baselines(intervals);

        for interval in intervals.iter_mut() {
            interval.score = None;

            let alternative = match interval.label() {
                GcLabel::HighGc => Alternative::Smaller,
                GcLabel::LowGc => Alternative::Larger,
                GcLabel::Unknown => continue,
            };

            let (Some(composition), Some(baseline)) =
                (interval.composition, baselines.get(interval.label()))
            else {
                continue;
            };

            // The baseline excludes the interval under test
            let expected_other = baseline.other - composition.other_count;
            let expected_gc = baseline.gc - composition.gc_count;
            let expected_total = expected_other + expected_gc;

            if expected_total < self.config.min_baseline_bases || composition.total() == 0 {
                continue;
            }

            let test = proportions_ztest(
                [composition.other_count, expected_other],
                [composition.total(), expected_total],
                alternative,
            )?;
            interval.score = test.map(|t| t.p_value);

            log::trace!("Scored interval {}", interval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::annotate::Annotation;

    fn annotator(kmer_length: usize, minimum_feature_size: Option<usize>) -> GcContentAnnotator {
        let config = AnnotatorConfig::default()
            .with_kmer_length(kmer_length)
            .with_minimum_feature_size(minimum_feature_size);
        GcContentAnnotator::new(config).unwrap()
    }

    fn spans(annotation: &Annotation<GcLabel>) -> Vec<(GcLabel, usize, usize)> {
        annotation
            .intervals()
            .iter()
            .map(|iv| (*iv.label(), iv.start(), iv.stop()))
            .collect()
    }

    const EASY: &[u8] = b"GCGCCCCGCAGCGCGATATATATATATAATATGCATATATATATATGCGCGCGCGCGGCGCGCGCGC";

    #[test]
    fn test_easy_example_without_smoothing() {
        let annotation = annotator(3, None).annotate_sequence(EASY).unwrap();

        assert_eq!(
            spans(&annotation),
            vec![
                (GcLabel::HighGc, 0, 15),
                (GcLabel::LowGc, 15, 32),
                (GcLabel::HighGc, 32, 34),
                (GcLabel::LowGc, 34, 46),
                (GcLabel::HighGc, 46, 67),
            ]
        );
    }

    #[test]
    fn test_easy_example_with_smoothing() {
        let annotation = annotator(3, Some(5)).annotate_sequence(EASY).unwrap();

        assert_eq!(
            spans(&annotation),
            vec![
                (GcLabel::HighGc, 0, 15),
                (GcLabel::LowGc, 15, 46),
                (GcLabel::HighGc, 46, 67),
            ]
        );
    }

    #[test]
    fn test_single_state_is_unknown() {
        let annotation = annotator(3, Some(5))
            .annotate_sequence(b"GCGCCCCGCGCGCGGCGCGGCGCGCGCGC")
            .unwrap();

        assert_eq!(spans(&annotation), vec![(GcLabel::Unknown, 0, 29)]);
        assert_eq!(annotation.intervals()[0].score, None);
    }

    #[test]
    fn test_not_enough_data_to_score() {
        let sequence =
            b"GCGCCCCGCAGCTAGGCGCGGCGCGATATATATATATAATATGCATATATATATATGCAGCGCGCGCGCGCGGCGCGCGCGC";
        let annotation = annotator(10, Some(5)).annotate_sequence(sequence).unwrap();

        assert!(!annotation.is_empty());
        for interval in annotation.intervals() {
            assert_eq!(interval.score, None, "{} should be unscored", interval);
            assert!(interval.composition.is_some());
        }
    }

    #[test]
    fn test_discernible_high_gc_region() {
        let sequence = b"GTGCACCACAGCTAGGCACGGCTATGCGCATGCATGCGAATGCGGCATCTCGAGGGCCATGCATATATATATATATATATATATATATATATATATATATATATGCAGCGCGCGCGCGCGGCGCGCGCGC";
        let annotator = annotator(10, Some(10));
        let annotation = annotator.annotate_sequence(sequence).unwrap();

        let spans: Vec<_> = annotation
            .intervals()
            .iter()
            .map(|iv| (*iv.label(), iv.start(), iv.stop()))
            .collect();
        assert_eq!(
            spans,
            vec![
                (GcLabel::HighGc, 0, 62),
                (GcLabel::LowGc, 62, 104),
                (GcLabel::HighGc, 104, 130),
            ]
        );

        let last = annotation.intervals().last().unwrap();
        assert_eq!(last.start(), 104);
        assert_eq!(last.stop(), sequence.len());

        let score = last.score.unwrap();
        assert!(score < 0.05, "{}", last);

        let hits: Vec<_> = annotation.significant_hits(0.05).collect();
        assert!(hits.iter().any(|iv| iv.start() == last.start()));
        assert!(annotator.significant_hits(&annotation).len() <= hits.len());
    }

    #[test]
    fn test_short_sequences_rejected() {
        let annotator = annotator(10, None);
        assert!(matches!(
            annotator.annotate_sequence(b"ACGT"),
            Err(AnnotationError::InvalidSequence(_))
        ));
        assert!(matches!(
            annotator.annotate_sequence(b""),
            Err(AnnotationError::InvalidSequence(_))
        ));
    }

    #[test]
    fn test_invalid_configuration() {
        let err = GcContentAnnotator::new(AnnotatorConfig::default().with_kmer_length(0)).unwrap_err();
        assert!(matches!(err, AnnotationError::Engine(_)));

        let err = GcContentAnnotator::new(AnnotatorConfig::default().with_alpha(0.0)).unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidParameter(_)));
    }

    #[test]
    fn test_states_cover_sequence() {
        let annotator = annotator(4, None);
        let states = annotator.compute_state_sequence(EASY).unwrap();
        assert_eq!(states.states.len(), EASY.len());
        assert_eq!(states.labels.len(), 2);
    }

    #[test]
    fn test_config_defaults_and_serde() {
        let config = AnnotatorConfig::default();
        assert_eq!(config.kmer_length, 50);
        assert_eq!(config.minimum_feature_size, Some(10));
        assert_eq!(config.min_baseline_bases, 30);

        let parsed: AnnotatorConfig =
            serde_json::from_str(r#"{"kmer_length": 20, "minimum_feature_size": null}"#).unwrap();
        assert_eq!(parsed.kmer_length, 20);
        assert_eq!(parsed.minimum_feature_size, None);
        assert_eq!(parsed.alpha, 0.01);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(GcLabel::HighGc.to_string(), "High GC Content");
        assert_eq!(GcLabel::LowGc.to_string(), "Low GC Content");
        assert_eq!(GcLabel::Unknown.to_string(), "UNKNOWN");
    }
}
