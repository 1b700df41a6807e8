//! Prelude for fz-featurizers.
//!
//! This module re-exports all commonly used types.

pub use crate::median_imputer::{
    MedianImputerAnnotation, MedianImputerEstimator, MedianImputerPolicy, MedianImputerTransformer,
    MEDIAN_IMPUTER_NAME,
};
pub use crate::rolling_window::{
    RollingCalculation, RollingWindow, RollingWindowConfig, RollingWindowEstimator, RollingWindowInput,
    RollingWindowTransformer, MAX_WINDOW_SIZE, ROLLING_WINDOW_NAME,
};
pub use crate::short_grain_dropper::{
    Grain, ShortGrainDropperAnnotation, ShortGrainDropperConfig, ShortGrainDropperEstimator,
    ShortGrainDropperPolicy, ShortGrainDropperTransformer, SHORT_GRAIN_DROPPER_NAME,
};

// Re-export the inference trait every featurizer implements
pub use fz_core::transformer::Transformer;
