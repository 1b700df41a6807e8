//! Prelude for fz-components.
//!
//! This module re-exports all commonly used types.

pub use crate::median::{MedianAnnotation, MedianEstimator, MedianPolicy, MEDIAN_ESTIMATOR_NAME};

// Re-export the lifecycle traits the components implement
pub use fz_core::estimator::{FitResult, TrainingPolicy};
