//! Quantile sketches.

use sketches_rust::DDSketch;
use snafu::Snafu;

/// Default relative accuracy.
pub const DEFAULT_RELATIVE_ACCURACY: f64 = 0.0001;

/// Default bin limit.
pub const DEFAULT_BIN_LIMIT: u32 = 32_768;

/// Sketch error.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)))]
pub enum SketchError {
    /// The sketch could not be constructed with the given parameters.
    #[snafu(display(
        "failed to construct sketch (relative_accuracy={}, bin_limit={}): {}",
        relative_accuracy,
        bin_limit,
        reason
    ))]
    Construction {
        /// Requested relative accuracy.
        relative_accuracy: f64,

        /// Requested bin limit.
        bin_limit: u32,

        /// Cause of the failure, as reported by the sketch.
        reason: String,
    },

    /// The sketch could not answer a quantile query.
    #[snafu(display("failed to query sketch at rank {}: {}", rank, reason))]
    Query {
        /// Rank that was queried.
        rank: f64,

        /// Cause of the failure, as reported by the sketch.
        reason: String,
    },
}

/// Sketch parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SketchConfig {
    /// Relative accuracy guaranteed by the sketch for quantile estimates.
    pub relative_accuracy: f64,

    /// Maximum number of bins per store before the lowest bins are collapsed.
    pub bin_limit: u32,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            relative_accuracy: DEFAULT_RELATIVE_ACCURACY,
            bin_limit: DEFAULT_BIN_LIMIT,
        }
    }
}

/// A quantile sketch.
///
/// Values are added one at a time, and the sketch can then be queried for the estimated value at any rank in `[0, 1]`.
/// Queries take `&mut self` as some sketches lazily compute internal state when first queried.
pub trait QuantileSketch {
    /// Adds a value to the sketch.
    fn add(&mut self, value: f64);

    /// Returns the number of values added to the sketch.
    fn count(&mut self) -> f64;

    /// Returns the estimated value at the given rank.
    ///
    /// # Errors
    ///
    /// If the rank is out of range, or the sketch cannot produce an estimate (such as when it is empty), an error is
    /// returned.
    fn quantile(&mut self, rank: f64) -> Result<f64, SketchError>;
}

/// Adds every sample to the sketch, in order.
pub fn populate<S>(sketch: &mut S, samples: &[f64])
where
    S: QuantileSketch + ?Sized,
{
    for sample in samples {
        sketch.add(*sample);
    }
}

/// DDSketch with a logarithmic index mapping and collapsing-lowest dense stores.
///
/// Once the number of bins in a store exceeds the configured bin limit, the lowest bins are collapsed together, which
/// preserves the relative accuracy guarantee for the higher quantiles.
pub struct CollapsingLowestDenseSketch {
    inner: DDSketch,
}

impl CollapsingLowestDenseSketch {
    /// Creates a new `CollapsingLowestDenseSketch` with the given configuration.
    ///
    /// Parameters are not validated here: whatever the underlying sketch rejects is returned as an error. A bin limit of
    /// zero is accepted by the underlying sketch, which then panics on the first added value.
    ///
    /// # Errors
    ///
    /// If the underlying sketch cannot be constructed with the given parameters, an error is returned.
    pub fn new(config: &SketchConfig) -> Result<Self, SketchError> {
        let construction_error = |reason: String| SketchError::Construction {
            relative_accuracy: config.relative_accuracy,
            bin_limit: config.bin_limit,
            reason,
        };

        let max_num_bins = config
            .bin_limit
            .try_into()
            .map_err(|_| construction_error("bin limit is out of range".to_string()))?;
        let inner = DDSketch::logarithmic_collapsing_lowest_dense(config.relative_accuracy, max_num_bins)
            .map_err(|e| construction_error(format!("{:?}", e)))?;

        Ok(Self { inner })
    }
}

impl QuantileSketch for CollapsingLowestDenseSketch {
    fn add(&mut self, value: f64) {
        self.inner.accept(value);
    }

    fn count(&mut self) -> f64 {
        self.inner.get_count()
    }

    fn quantile(&mut self, rank: f64) -> Result<f64, SketchError> {
        self.inner
            .get_value_at_quantile(rank)
            .ok_or_else(|| SketchError::Query {
                rank,
                reason: "no value at rank".to_string(),
            })
    }
}
