//! Collapsing per-position states into intervals, and smoothing them

use itertools::Itertools;

use super::interval::StateInterval;

/// Collapse runs of equal states into adjacent intervals
pub fn segment_states<S: Copy + PartialEq>(states: &[S]) -> Vec<StateInterval<S>> {
    let mut start = 0;

    states
        .iter()
        .dedup_with_count()
        .map(|(run, &state)| {
            let interval = StateInterval::new(state, start, start + run);
            start += run;
            interval
        })
        .collect()
}

/// Merge intervals that are too short to stand on their own.
///
/// Two neighbours survive only when both are longer than
/// `minimum_feature_size` and carry different labels. Otherwise they are
/// merged under the label of the longer one (the right one on a tie), and
/// the scan steps back so the merged interval is compared with its left
/// neighbour again.
pub fn smooth_intervals<L: Clone + PartialEq>(
    intervals: &mut Vec<StateInterval<L>>,
    minimum_feature_size: usize,
) {
    let mut i = 0;

    while i + 1 < intervals.len() {
        let first_len = intervals[i].len();
        let second_len = intervals[i + 1].len();

        if first_len > minimum_feature_size
            && second_len > minimum_feature_size
            && intervals[i].label() != intervals[i + 1].label()
        {
            i += 1;
            continue;
        }

        let second = intervals.remove(i + 1);
        let first = &mut intervals[i];
        let label = if second_len < first_len {
            first.label().clone()
        } else {
            second.label().clone()
        };

        *first = StateInterval::new(label, first.start(), second.stop());
        i = i.saturating_sub(1);
    }
}
