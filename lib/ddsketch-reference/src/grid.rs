//! Quantile grid sampling.

use tracing::debug;

use crate::sketch::{QuantileSketch, SketchError};

/// Number of evenly spaced ranks in the quantile grid.
pub const QUANTILE_GRID_POINTS: usize = 1000;

/// A rank in the quantile grid, paired with the value estimated for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuantileRecord {
    /// Rank, in `[0, 1]`.
    pub rank: f64,

    /// Estimated value at the rank.
    pub value: f64,
}

/// Returns an iterator over the ranks of the quantile grid, in ascending order.
///
/// Ranks are evenly spaced from 0.0 to 1.0, inclusive. Each rank is computed as `i * step`, and the final rank is pinned
/// to exactly 1.0 so that accumulated rounding never leaves the top of the grid short of (or past) the maximum.
pub fn quantile_grid() -> impl Iterator<Item = f64> {
    let last = QUANTILE_GRID_POINTS - 1;
    let step = 1.0 / last as f64;

    (0..QUANTILE_GRID_POINTS).map(move |i| if i == last { 1.0 } else { i as f64 * step })
}

/// Samples the sketch at every rank in the quantile grid.
///
/// # Errors
///
/// If the sketch fails to answer a query at any rank, sampling stops and the error is returned.
pub fn sample_quantiles<S>(sketch: &mut S) -> Result<Vec<QuantileRecord>, SketchError>
where
    S: QuantileSketch + ?Sized,
{
    let mut records = Vec::with_capacity(QUANTILE_GRID_POINTS);
    for rank in quantile_grid() {
        let value = sketch.quantile(rank)?;
        records.push(QuantileRecord { rank, value });
    }

    debug!(count = sketch.count(), records = records.len(), "Sampled quantile grid.");

    Ok(records)
}

#[cfg(test)]
pub(crate) mod tests {
    use proptest::prelude::*;

    use super::*;

    /// An exact, sort-based sketch, using the same rank convention as DDSketch: the value at rank `q` is the element at
    /// index `floor(q * (n - 1))` of the sorted samples.
    #[derive(Default)]
    pub(crate) struct ExactSketch {
        values: Vec<f64>,
        queries: usize,
    }

    impl QuantileSketch for ExactSketch {
        fn add(&mut self, value: f64) {
            self.values.push(value);
        }

        fn count(&mut self) -> f64 {
            self.values.len() as f64
        }

        fn quantile(&mut self, rank: f64) -> Result<f64, SketchError> {
            if !(0.0..=1.0).contains(&rank) || self.values.is_empty() {
                return Err(SketchError::Query {
                    rank,
                    reason: "no value at rank".to_string(),
                });
            }

            self.queries += 1;
            self.values.sort_by(f64::total_cmp);
            let idx = (rank * (self.values.len() - 1) as f64).floor() as usize;
            Ok(self.values[idx])
        }
    }

    #[test]
    fn grid_bounds() {
        let ranks = quantile_grid().collect::<Vec<_>>();
        assert_eq!(ranks.len(), 1000);
        assert_eq!(ranks[0], 0.0);
        assert_eq!(ranks[999], 1.0);
        assert!((ranks[500] - 500.0 / 999.0).abs() < 1e-12);
    }

    #[test]
    fn grid_strictly_increasing() {
        let ranks = quantile_grid().collect::<Vec<_>>();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
        assert!(ranks.iter().all(|rank| (0.0..=1.0).contains(rank)));
    }

    #[test]
    fn samples_every_rank_in_order() {
        let mut sketch = ExactSketch::default();
        crate::sketch::populate(&mut sketch, &[3.0, 1.0, 2.0]);

        let records = sample_quantiles(&mut sketch).unwrap();
        assert_eq!(sketch.queries, QUANTILE_GRID_POINTS);
        assert_eq!(records.len(), QUANTILE_GRID_POINTS);

        let ranks = records.iter().map(|record| record.rank).collect::<Vec<_>>();
        assert_eq!(ranks, quantile_grid().collect::<Vec<_>>());

        assert_eq!(records[0].value, 1.0);
        assert_eq!(records[999].value, 3.0);
        assert!(records.windows(2).all(|w| w[0].value <= w[1].value));
    }

    #[test]
    fn duplicate_values_are_not_collapsed() {
        let mut sketch = ExactSketch::default();
        sketch.add(7.0);

        let records = sample_quantiles(&mut sketch).unwrap();
        assert_eq!(records.len(), QUANTILE_GRID_POINTS);
        assert!(records.iter().all(|record| record.value == 7.0));
    }

    #[test]
    fn query_failure_aborts_sampling() {
        let mut sketch = ExactSketch::default();
        assert!(sample_quantiles(&mut sketch).is_err());
        assert_eq!(sketch.queries, 0);
    }

    proptest! {
        #[test]
        fn property_test_sampled_values_are_monotonic(values in prop::collection::vec(-1.0e6f64..1.0e6, 1..256)) {
            let mut sketch = ExactSketch::default();
            crate::sketch::populate(&mut sketch, &values);

            let records = sample_quantiles(&mut sketch).unwrap();
            prop_assert_eq!(records.len(), QUANTILE_GRID_POINTS);
            prop_assert!(records.windows(2).all(|w| w[0].rank < w[1].rank && w[0].value <= w[1].value));
        }
    }
}
