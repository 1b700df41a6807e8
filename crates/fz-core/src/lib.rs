//! # fz-core
//!
//! Core types and traits for the rust-featurizers library.
//!
//! This crate provides the foundational abstractions used by every featurizer:
//!
//! - [`Traits`] - Per-type null handling, text form, key equality, encoding, and hashing
//! - [`Archive`] - Versioned little-endian binary container
//! - [`Estimator`], [`TrainingPolicy`], and [`TransformerPolicy`] - The training lifecycle
//! - [`Transformer`] - Inference-time component with explicit flush
//! - [`AnnotationMaps`] - Shared per-column store of frozen training results
//! - [`CircularBuffer`] and [`CircularIterator`] - Bounded history for window features
//! - [`HashKey`] - MurmurHash3-backed map key for any value type
//!
//! ## Feature Flags
//!
//! - `serde` (default) - Derive `Serialize`/`Deserialize` on lifecycle enums
//!
//! ## Example
//!
//! ```rust
//! use fz_core::prelude::*;
//!
//! let mut archive = Archive::new();
//! archive.write_version(ArchiveVersion::new(1, 0)).unwrap();
//! archive.serialize(&vec![Some(1.5f64), None]).unwrap();
//!
//! let mut input = Archive::from_bytes(archive.commit().unwrap());
//! input.read_version(1).unwrap();
//! let values: Vec<Option<f64>> = input.deserialize().unwrap();
//! assert_eq!(values.to_text(), "[1.500000,NULL]");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod annotation;
pub mod archive;
pub mod containers;
pub mod error;
pub mod estimator;
pub mod hash;
pub mod num;
pub mod pipeline;
pub mod prelude;
pub mod traits;
pub mod transformer;
pub mod window;

// Re-export core types at crate root
pub use annotation::{create_annotation_maps, AnnotationMaps, AnnotationMapsPtr};
pub use archive::{Archive, ArchiveVersion};
pub use error::{FeaturizerError, FormatError, Result};
pub use estimator::{
    Estimator, FitResult, InferenceOnly, InferenceOnlyPolicy, TrainingPolicy, TrainingState,
    TransformerPolicy,
};
pub use hash::HashKey;
pub use num::{IntOrNumeric, Ordered};
pub use pipeline::{train, ErasedEstimator};
pub use traits::Traits;
pub use transformer::{StreamState, Transformer};
pub use window::{CircularBuffer, CircularIterator};
