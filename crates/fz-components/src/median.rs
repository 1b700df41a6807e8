//! Streaming Median Estimator.
//!
//! Computes the median of a training stream in a single pass using two heaps:
//! `smaller` (max-heap) holds the lower half and `larger` (min-heap) the upper
//! half. Between fit calls `smaller` holds the same number of items as
//! `larger` or exactly one more.
//!
//! Nulls are skipped. With an even count the median is the mean of the two
//! middle values when interpolation is enabled, and the lower middle value
//! otherwise.
//!
//! # Example
//!
//! ```rust
//! use fz_core::prelude::*;
//! use fz_components::median::{MedianAnnotation, MedianEstimator, MedianPolicy};
//!
//! let maps = create_annotation_maps(1);
//! let mut estimator: MedianEstimator<i32, f64> =
//!     Estimator::new(MedianPolicy::new(), maps.clone(), 0).unwrap();
//!
//! train(&mut estimator, &[Some(1), Some(2), None, Some(3), Some(4)]).unwrap();
//! assert_eq!(estimator.annotation().unwrap().median, 2.5);
//!
//! let stored = maps.borrow().get::<MedianAnnotation<f64>>(0, "MedianEstimator").unwrap();
//! assert_eq!(stored.median, 2.5);
//! ```

use core::cmp::Reverse;
use core::marker::PhantomData;
use std::collections::BinaryHeap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use fz_core::error::{FeaturizerError, Result};
use fz_core::estimator::{Estimator, FitResult, TrainingPolicy};
use fz_core::num::{IntOrNumeric, Ordered};
use fz_core::traits::Traits;

/// Name the median annotation is published under.
pub const MEDIAN_ESTIMATOR_NAME: &str = "MedianEstimator";

/// Frozen result of a median training run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MedianAnnotation<O> {
    /// Median of the non-null training values.
    pub median: O,
}

/// Two-heap median training policy.
///
/// `T` is the input value type (fit receives `T::Nullable`); `O` is the
/// numeric type values are cast to before being stored.
#[derive(Debug)]
pub struct MedianPolicy<T: Traits, O = <T as Traits>::Value> {
    smaller: BinaryHeap<Ordered<O>>,
    larger: BinaryHeap<Reverse<Ordered<O>>>,
    interpolate: bool,
    _input: PhantomData<fn(T)>,
}

/// Median estimator over values of type `T`, producing `O`.
pub type MedianEstimator<T, O = <T as Traits>::Value> = Estimator<MedianPolicy<T, O>>;

impl<T: Traits, O: IntOrNumeric> Default for MedianPolicy<T, O> {
    fn default() -> Self {
        Self {
            smaller: BinaryHeap::new(),
            larger: BinaryHeap::new(),
            interpolate: true,
            _input: PhantomData,
        }
    }
}

impl<T: Traits, O: IntOrNumeric> MedianPolicy<T, O> {
    /// Create a policy that interpolates even-count medians.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable interpolation of even-count medians.
    #[must_use]
    pub fn with_interpolation(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    /// Whether even-count medians are interpolated.
    #[must_use]
    pub fn interpolate(&self) -> bool {
        self.interpolate
    }

    /// Items in the lower-half max-heap.
    #[must_use]
    pub fn smaller_len(&self) -> usize {
        self.smaller.len()
    }

    /// Items in the upper-half min-heap.
    #[must_use]
    pub fn larger_len(&self) -> usize {
        self.larger.len()
    }

    fn insert(&mut self, value: O) {
        match self.smaller.peek() {
            Some(top) if value.total_cmp_fn(&top.0).is_gt() => {
                self.larger.push(Reverse(Ordered(value)));
            }
            _ => self.smaller.push(Ordered(value)),
        }

        if self.smaller.len() >= self.larger.len() + 2 {
            if let Some(top) = self.smaller.pop() {
                self.larger.push(Reverse(top));
            }
        } else if self.larger.len() > self.smaller.len() {
            if let Some(Reverse(top)) = self.larger.pop() {
                self.smaller.push(top);
            }
        }
    }

    fn reset(&mut self) {
        self.smaller.clear();
        self.larger.clear();
    }
}

impl<T, O> TrainingPolicy for MedianPolicy<T, O>
where
    T: Traits,
    T::Value: IntOrNumeric,
    O: IntOrNumeric,
{
    type Input = T::Nullable;
    type Annotation = MedianAnnotation<O>;
    const NAME: &'static str = MEDIAN_ESTIMATOR_NAME;

    fn fit(&mut self, input: &Self::Input) -> Result<FitResult> {
        if T::is_null(input) {
            return Ok(FitResult::Continue);
        }

        let value = T::get_nullable_value(input)?;
        let value = O::cast_from(value).ok_or_else(|| {
            FeaturizerError::invalid_argument(format!(
                "{value:?} cannot be represented in the median output type"
            ))
        })?;

        self.insert(value);
        Ok(FitResult::Continue)
    }

    fn complete_training(&mut self) -> Result<Self::Annotation> {
        let count = self.smaller.len() + self.larger.len();
        let lower = self
            .smaller
            .peek()
            .map(|top| top.0)
            .ok_or_else(|| FeaturizerError::data("No elements were provided during training"))?;

        let median = if !self.interpolate || count % 2 == 1 {
            lower
        } else {
            let upper = self.larger.peek().map_or(0.0, |top| top.0 .0.to_f64_lossy());
            let midpoint = (lower.to_f64_lossy() + upper) / 2.0;
            O::from_f64_lossy(midpoint).ok_or_else(|| {
                FeaturizerError::invalid_state(format!(
                    "interpolated median {midpoint} does not fit the output type"
                ))
            })?
        };

        debug!(count, ?median, interpolate = self.interpolate, "median computed");
        self.reset();
        Ok(MedianAnnotation { median })
    }
}
