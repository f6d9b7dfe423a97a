//! Cumulative totals to daily increments.

use c19_common::{CumulativePoint, DeltaPoint};

/// Differences consecutive cumulative points.
///
/// The first input point has no predecessor and is dropped, so `n` points
/// yield `n - 1` deltas dated on the later day of each pair. Revisions in
/// the source can make a total shrink; those days come out negative rather
/// than clamped.
#[must_use]
pub fn to_deltas(points: &[CumulativePoint]) -> Vec<DeltaPoint> {
    points
        .windows(2)
        .map(|pair| {
            let (prev, curr) = (&pair[0], &pair[1]);
            DeltaPoint::new(
                curr.date,
                diff(curr.cases, prev.cases),
                diff(curr.deaths, prev.deaths),
            )
        })
        .collect()
}

/// Totals past `i64::MAX` saturate instead of wrapping.
fn diff(curr: u64, prev: u64) -> i64 {
    let widen = |total: u64| i64::try_from(total).unwrap_or(i64::MAX);
    widen(curr).saturating_sub(widen(prev))
}

#[cfg(test)]
mod tests {
    use super::*;
    use c19_common::test_utils::{fixtures, strategies};
    use proptest::prelude::*;

    #[test]
    fn empty_and_single_point_yield_nothing() {
        assert!(to_deltas(&[]).is_empty());
        assert!(to_deltas(&fixtures::cumulative_series(&[(10, 1)])).is_empty());
    }

    #[test]
    fn three_points_give_two_increments() {
        let series = fixtures::cumulative_series(&[(100, 5), (120, 5), (150, 7)]);
        let deltas = to_deltas(&series);
        assert_eq!(deltas.len(), 2);
        assert_eq!((deltas[0].new_cases, deltas[0].new_deaths), (20, 0));
        assert_eq!((deltas[1].new_cases, deltas[1].new_deaths), (30, 2));
        assert_eq!(deltas[0].date, series[1].date);
    }

    #[test]
    fn downward_revision_is_negative() {
        let deltas = to_deltas(&fixtures::cumulative_series(&[(500, 10), (480, 9)]));
        assert_eq!((deltas[0].new_cases, deltas[0].new_deaths), (-20, -1));
    }

    #[test]
    fn oversized_totals_saturate() {
        let series = fixtures::cumulative_series(&[(0, 0), (u64::MAX, 1)]);
        assert_eq!(to_deltas(&series)[0].new_cases, i64::MAX);

        let series = fixtures::cumulative_series(&[(u64::MAX, 1), (5, 1)]);
        assert_eq!(to_deltas(&series)[0].new_cases, 5 - i64::MAX);
    }

    proptest! {
        #[test]
        fn repeated_calls_agree(series in strategies::revised_series(40)) {
            prop_assert_eq!(to_deltas(&series), to_deltas(&series));
        }

        #[test]
        fn length_is_one_less(series in strategies::revised_series(40)) {
            prop_assert_eq!(to_deltas(&series).len(), series.len().saturating_sub(1));
        }

        #[test]
        fn increments_telescope_to_the_total_change(series in strategies::revised_series(40)) {
            prop_assume!(series.len() >= 2);
            let deltas = to_deltas(&series);
            let sum: i64 = deltas.iter().map(|d| d.new_cases).sum();
            let first = series.first().unwrap().cases as i64;
            let last = series.last().unwrap().cases as i64;
            prop_assert_eq!(sum, last - first);
        }

        #[test]
        fn monotonic_input_never_goes_negative(series in strategies::monotonic_series(40)) {
            prop_assert!(to_deltas(&series)
                .iter()
                .all(|d| d.new_cases >= 0 && d.new_deaths >= 0));
        }

        #[test]
        fn dates_follow_the_later_point(series in strategies::monotonic_series(20)) {
            let deltas = to_deltas(&series);
            for (delta, point) in deltas.iter().zip(series.iter().skip(1)) {
                prop_assert_eq!(delta.date, point.date);
            }
        }
    }
}
