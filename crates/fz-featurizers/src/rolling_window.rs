//! Rolling Window Featurizer.
//!
//! For each `(grain, value)` row, emits an aggregate over the previous
//! `window_size` values of the same grain. The current row is not part of
//! its own window. NaN values occupy a slot in the window but are skipped by
//! the aggregate; while fewer than `min_periods` non-null values are
//! available the output is NaN.
//!
//! The featurizer needs no training. Per-grain history lives only in the
//! transformer and is not persisted.
//!
//! # Example
//!
//! ```rust
//! use fz_core::prelude::*;
//! use fz_featurizers::rolling_window::{RollingCalculation, RollingWindowConfig, RollingWindowTransformer};
//!
//! let config = RollingWindowConfig::new(2, RollingCalculation::Mean).with_min_periods(1);
//! let mut transformer = RollingWindowTransformer::new(config).unwrap();
//! let grain = vec!["store".to_string()];
//!
//! assert!(transformer.execute_one(&(grain.clone(), 1.0)).unwrap().is_nan());
//! assert_eq!(transformer.execute_one(&(grain.clone(), 3.0)).unwrap(), 1.0);
//! assert_eq!(transformer.execute_one(&(grain.clone(), 5.0)).unwrap(), 2.0);
//! assert_eq!(transformer.execute_one(&(grain, 7.0)).unwrap(), 4.0);
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use fz_components::median::MedianPolicy;
use fz_core::annotation::AnnotationMapsPtr;
use fz_core::archive::{Archive, ArchiveVersion};
use fz_core::error::{FeaturizerError, FormatError, Result};
use fz_core::estimator::{Estimator, InferenceOnly, InferenceOnlyPolicy, TrainingPolicy};
use fz_core::transformer::{StreamState, Transformer};
use fz_core::window::CircularBuffer;

use crate::short_grain_dropper::Grain;

/// One inference row: the grain key and its value (NaN for null).
pub type RollingWindowInput = (Grain, f64);

/// Name the (empty) rolling window annotation is published under.
pub const ROLLING_WINDOW_NAME: &str = "RollingWindowEstimator";

/// Largest accepted `window_size`. Every grain allocates a buffer this big.
pub const MAX_WINDOW_SIZE: u32 = 1 << 16;

const ARCHIVE_VERSION: ArchiveVersion = ArchiveVersion::new(1, 0);

/// Aggregate computed over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RollingCalculation {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
    /// Interpolated median.
    Median,
}

impl RollingCalculation {
    fn tag(self) -> u8 {
        match self {
            Self::Mean => 0,
            Self::Min => 1,
            Self::Max => 2,
            Self::Median => 3,
        }
    }

    fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Self::Mean),
            1 => Ok(Self::Min),
            2 => Ok(Self::Max),
            3 => Ok(Self::Median),
            _ => Err(FormatError::InvalidTag {
                kind: "RollingCalculation",
                tag,
            }
            .into()),
        }
    }
}

/// Configuration for the rolling window featurizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RollingWindowConfig {
    /// Number of previous values per grain in the window.
    pub window_size: u32,
    /// Non-null values required before an aggregate is produced.
    pub min_periods: u32,
    /// Aggregate to compute.
    pub calculation: RollingCalculation,
}

impl Default for RollingWindowConfig {
    fn default() -> Self {
        Self {
            window_size: 1,
            min_periods: 1,
            calculation: RollingCalculation::Mean,
        }
    }
}

impl RollingWindowConfig {
    /// Create a configuration requiring a full window.
    pub fn new(window_size: u32, calculation: RollingCalculation) -> Self {
        Self {
            window_size,
            min_periods: window_size,
            calculation,
        }
    }

    /// Set the minimum number of non-null values.
    #[must_use]
    pub fn with_min_periods(mut self, min_periods: u32) -> Self {
        self.min_periods = min_periods;
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a window outside `1..=MAX_WINDOW_SIZE`
    /// or a `min_periods` outside `1..=window_size`.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.window_size > MAX_WINDOW_SIZE {
            return Err(FeaturizerError::invalid_argument("windowSize"));
        }
        if self.min_periods == 0 || self.min_periods > self.window_size {
            return Err(FeaturizerError::invalid_argument("minPeriods"));
        }
        Ok(())
    }
}

/// Inference-only component producing a [`RollingWindowTransformer`].
#[derive(Debug, Clone, Default)]
pub struct RollingWindow {
    config: RollingWindowConfig,
}

/// Rolling window estimator.
pub type RollingWindowEstimator = Estimator<InferenceOnlyPolicy<RollingWindow>>;

impl RollingWindow {
    /// Create the component from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error.
    pub fn new(config: RollingWindowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Build an estimator bound to `col_index`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument("colIndex")` or the configuration's
    /// validation error.
    pub fn estimator(
        annotation_maps: AnnotationMapsPtr,
        col_index: usize,
        config: RollingWindowConfig,
    ) -> Result<RollingWindowEstimator> {
        let estimator = Estimator::new(InferenceOnlyPolicy(Self { config }), annotation_maps, col_index)?;
        config.validate()?;
        Ok(estimator)
    }

    /// The configuration.
    pub fn config(&self) -> &RollingWindowConfig {
        &self.config
    }
}

impl InferenceOnly for RollingWindow {
    type Input = RollingWindowInput;
    type Transformer = RollingWindowTransformer;
    const NAME: &'static str = ROLLING_WINDOW_NAME;

    fn create_transformer(&mut self) -> Result<RollingWindowTransformer> {
        RollingWindowTransformer::new(self.config)
    }
}

/// Per-grain rolling aggregate.
#[derive(Debug, Clone)]
pub struct RollingWindowTransformer {
    config: RollingWindowConfig,
    history: HashMap<Grain, CircularBuffer<f64>>,
    stream: StreamState,
}

impl RollingWindowTransformer {
    /// Create a transformer with empty history.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error.
    pub fn new(config: RollingWindowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            history: HashMap::new(),
            stream: StreamState::new(),
        })
    }

    /// The configuration.
    pub fn config(&self) -> &RollingWindowConfig {
        &self.config
    }

    /// Number of grains with recorded history.
    pub fn grain_count(&self) -> usize {
        self.history.len()
    }

    fn aggregate(config: &RollingWindowConfig, history: &CircularBuffer<f64>) -> Result<f64> {
        let values: Vec<f64> = history.iter().copied().filter(|v| !v.is_nan()).collect();
        if values.len() < config.min_periods as usize {
            return Ok(f64::NAN);
        }

        let result = match config.calculation {
            RollingCalculation::Mean => values.iter().sum::<f64>() / values.len() as f64,
            RollingCalculation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            RollingCalculation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            RollingCalculation::Median => {
                let mut median = MedianPolicy::<f64>::new();
                for value in &values {
                    median.fit(value)?;
                }
                median.complete_training()?.median
            }
        };
        Ok(result)
    }
}

impl Transformer for RollingWindowTransformer {
    type Input = RollingWindowInput;
    type Output = f64;

    fn execute(&mut self, input: &RollingWindowInput, callback: &mut dyn FnMut(f64)) -> Result<()> {
        self.stream.ensure_open()?;
        let (grain, value) = input;

        let history = match self.history.entry(grain.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(?grain, "new grain in rolling window");
                entry.insert(CircularBuffer::new(self.config.window_size as usize)?)
            }
        };

        let output = Self::aggregate(&self.config, history)?;
        history.push(*value);
        callback(output);
        Ok(())
    }

    fn flush(&mut self, _callback: &mut dyn FnMut(f64)) -> Result<()> {
        self.stream.mark_flushed()?;
        self.history.clear();
        Ok(())
    }

    fn save(&self, archive: &mut Archive) -> Result<()> {
        archive.write_version(ARCHIVE_VERSION)?;
        archive.write_u32(self.config.window_size)?;
        archive.write_u32(self.config.min_periods)?;
        archive.write_u8(self.config.calculation.tag())
    }

    fn load(archive: &mut Archive) -> Result<Self> {
        archive.read_version(ARCHIVE_VERSION.major)?;
        let config = RollingWindowConfig {
            window_size: archive.read_u32()?,
            min_periods: archive.read_u32()?,
            calculation: RollingCalculation::from_tag(archive.read_u8()?)?,
        };
        Self::new(config)
    }
}
