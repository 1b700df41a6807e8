//! # fz-featurizers
//!
//! Concrete featurizers built on the rust-featurizers estimator/transformer
//! lifecycle.
//!
//! ## Featurizers
//!
//! - [`ShortGrainDropperPolicy`]: Flags grains with too few training rows
//! - [`MedianImputerPolicy`]: Replaces nulls with the column median
//! - [`RollingWindow`]: Per-grain rolling mean, min, max or median
//!
//! # Example
//!
//! ```rust
//! use fz_components::prelude::*;
//! use fz_core::prelude::*;
//! use fz_featurizers::prelude::*;
//!
//! let maps = create_annotation_maps(1);
//! let values = [1.0, f64::NAN, 3.0, 10.0];
//!
//! let mut median: MedianEstimator<f64> = Estimator::new(MedianPolicy::new(), maps.clone(), 0).unwrap();
//! train(&mut median, &values).unwrap();
//!
//! let mut imputer = MedianImputerPolicy::<f64>::estimator(maps, 0).unwrap();
//! train(&mut imputer, &values).unwrap();
//! let mut transformer = imputer.create_transformer().unwrap();
//!
//! assert_eq!(transformer.execute_one(&f64::NAN).unwrap(), 3.0);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod median_imputer;
pub mod prelude;
pub mod rolling_window;
pub mod short_grain_dropper;

pub use median_imputer::{MedianImputerEstimator, MedianImputerPolicy, MedianImputerTransformer};
pub use rolling_window::{
    RollingCalculation, RollingWindow, RollingWindowConfig, RollingWindowEstimator, RollingWindowTransformer,
};
pub use short_grain_dropper::{
    Grain, ShortGrainDropperConfig, ShortGrainDropperEstimator, ShortGrainDropperPolicy,
    ShortGrainDropperTransformer,
};
