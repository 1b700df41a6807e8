//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use fz_core::prelude::*;
//!
//! let maps = create_annotation_maps(1);
//! let buffer: CircularBuffer<f64> = CircularBuffer::new(4).unwrap();
//! assert_eq!(maps.borrow().len(), 1);
//! assert!(buffer.is_empty());
//! ```

// Core types
pub use crate::annotation::{create_annotation_maps, AnnotationMaps, AnnotationMapsPtr};
pub use crate::archive::{Archive, ArchiveVersion};
pub use crate::hash::HashKey;
pub use crate::num::{IntOrNumeric, Ordered};
pub use crate::window::{CircularBuffer, CircularIterator};

// Error types
pub use crate::error::{FeaturizerError, FormatError, Result};

// Lifecycle
pub use crate::estimator::{
    Estimator, FitResult, InferenceOnly, InferenceOnlyPolicy, TrainingPolicy, TrainingState,
    TransformerPolicy,
};
pub use crate::pipeline::{complete_all, train, ErasedEstimator, MAX_TRAINING_PASSES};
pub use crate::transformer::{StreamState, Transformer};

// Traits
pub use crate::traits::Traits;
