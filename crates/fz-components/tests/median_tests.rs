//! Property-based tests for the streaming median.
//!
//! These tests verify invariants that must hold for all inputs.

use approx::assert_relative_eq;
use fz_components::prelude::*;
use fz_core::prelude::*;
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

/// Reference median: sort, then pick or average the middle values.
fn sorted_median(values: &[i64], interpolate: bool) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    if n % 2 == 1 || !interpolate {
        sorted[(n - 1) / 2] as f64
    } else {
        (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
    }
}

fn estimator(interpolate: bool) -> MedianEstimator<i64, f64> {
    Estimator::new(
        MedianPolicy::new().with_interpolation(interpolate),
        create_annotation_maps(1),
        0,
    )
    .unwrap()
}

// ============================================================================
// Proptest Strategies
// ============================================================================

fn nullable_values() -> impl Strategy<Value = Vec<Option<i64>>> {
    prop::collection::vec(prop::option::weighted(0.8, -10_000i64..10_000), 0..200)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// `smaller` never trails `larger` and never leads it by more than one.
    #[test]
    fn heap_sizes_stay_balanced(values in nullable_values()) {
        let mut est = estimator(true);
        for value in &values {
            est.fit(value).unwrap();
            let smaller = est.policy().smaller_len();
            let larger = est.policy().larger_len();
            prop_assert!(smaller >= larger);
            prop_assert!(smaller - larger <= 1);
        }

        let non_null = values.iter().flatten().count();
        prop_assert_eq!(est.policy().smaller_len() + est.policy().larger_len(), non_null);
    }

    /// The streaming result matches a sort-based median.
    #[test]
    fn matches_sorted_median(values in nullable_values(), interpolate in any::<bool>()) {
        let non_null: Vec<i64> = values.iter().flatten().copied().collect();
        prop_assume!(!non_null.is_empty());

        let mut est = estimator(interpolate);
        train(&mut est, &values).unwrap();

        let expected = sorted_median(&non_null, interpolate);
        prop_assert!((est.annotation().unwrap().median - expected).abs() < 1e-9);
    }

    /// Insertion order does not affect the result.
    #[test]
    fn order_independent(mut values in prop::collection::vec(-1000i64..1000, 1..60)) {
        let nullable: Vec<Option<i64>> = values.iter().copied().map(Some).collect();
        let mut forward = estimator(true);
        train(&mut forward, &nullable).unwrap();

        values.reverse();
        let nullable: Vec<Option<i64>> = values.iter().copied().map(Some).collect();
        let mut backward = estimator(true);
        train(&mut backward, &nullable).unwrap();

        prop_assert_eq!(
            forward.annotation().unwrap().median,
            backward.annotation().unwrap().median
        );
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_median_examples() {
    let values = [Some(1), Some(2), Some(3), Some(4)];

    let mut lower = estimator(false);
    train(&mut lower, &values).unwrap();
    assert_relative_eq!(lower.annotation().unwrap().median, 2.0);

    let mut interpolated = estimator(true);
    train(&mut interpolated, &values).unwrap();
    assert_relative_eq!(interpolated.annotation().unwrap().median, 2.5);

    let mut single = estimator(true);
    train(&mut single, &[Some(5)]).unwrap();
    assert_relative_eq!(single.annotation().unwrap().median, 5.0);
}

#[test]
fn test_annotation_visible_to_later_components() {
    let maps = create_annotation_maps(2);
    let mut est: MedianEstimator<f32, f64> =
        Estimator::new(MedianPolicy::new(), maps.clone(), 1).unwrap();
    est.fit_buffer(&[4.0, f32::NAN, 8.0]).unwrap();
    est.complete_training().unwrap();

    let maps = maps.borrow();
    let annotation = maps
        .get::<MedianAnnotation<f64>>(1, MEDIAN_ESTIMATOR_NAME)
        .unwrap();
    assert_relative_eq!(annotation.median, 6.0);
    assert!(maps.get::<MedianAnnotation<f32>>(1, MEDIAN_ESTIMATOR_NAME).is_none());
}

#[test]
fn test_lifecycle_errors() {
    let mut est = estimator(true);
    est.fit(&Some(1)).unwrap();
    est.complete_training().unwrap();

    assert!(matches!(est.fit(&Some(2)), Err(FeaturizerError::InvalidState(_))));
    assert!(matches!(
        est.complete_training(),
        Err(FeaturizerError::InvalidState(_))
    ));
}
