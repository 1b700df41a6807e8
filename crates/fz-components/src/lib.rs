//! # fz-components
//!
//! Reusable training components for the rust-featurizers library.
//!
//! - [`MedianEstimator`]: Streaming two-heap median over nullable numeric input
//!
//! Components publish their results as annotations, which featurizers later
//! in a pipeline read back from the shared annotation maps.
//!
//! # Example
//!
//! ```rust
//! use fz_components::prelude::*;
//! use fz_core::prelude::*;
//!
//! let mut estimator: MedianEstimator<f64> =
//!     Estimator::new(MedianPolicy::new().with_interpolation(false), create_annotation_maps(1), 0)
//!         .unwrap();
//! train(&mut estimator, &[1.0, 2.0, f64::NAN, 3.0, 4.0]).unwrap();
//! assert_eq!(estimator.annotation().unwrap().median, 2.0);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod median;
pub mod prelude;

pub use median::{MedianAnnotation, MedianEstimator, MedianPolicy, MEDIAN_ESTIMATOR_NAME};
