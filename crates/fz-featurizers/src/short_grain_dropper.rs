//! Short Grain Dropper.
//!
//! Flags grains (sub-series keyed by a composite string key) that have too
//! few training rows to support the configured window, lags, horizon and
//! cross validation. At inference the transformer answers `true` for a grain
//! that should be dropped.
//!
//! # Example
//!
//! ```rust
//! use fz_core::prelude::*;
//! use fz_featurizers::short_grain_dropper::{ShortGrainDropperConfig, ShortGrainDropperPolicy};
//!
//! let config = ShortGrainDropperConfig::new(vec![1]).with_max_horizon(1);
//! assert_eq!(config.min_points(), 3);
//!
//! let grain = |s: &str| vec![s.to_string()];
//! let mut estimator = ShortGrainDropperPolicy::estimator(create_annotation_maps(1), 0, config).unwrap();
//! train(&mut estimator, &[grain("a"), grain("a"), grain("a"), grain("a"), grain("b")]).unwrap();
//!
//! let mut transformer = estimator.create_transformer().unwrap();
//! assert!(!transformer.execute_one(&grain("a")).unwrap());
//! assert!(transformer.execute_one(&grain("b")).unwrap());
//! ```

use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use fz_core::annotation::AnnotationMapsPtr;
use fz_core::archive::{Archive, ArchiveVersion};
use fz_core::error::{FeaturizerError, Result};
use fz_core::estimator::{Estimator, FitResult, TrainingPolicy, TransformerPolicy};
use fz_core::hash::HashKey;
use fz_core::transformer::{StreamState, Transformer};

/// Composite grain key.
pub type Grain = Vec<String>;

/// Name the grain annotation is published under.
pub const SHORT_GRAIN_DROPPER_NAME: &str = "ShortGrainDropperEstimator";

const ARCHIVE_VERSION: ArchiveVersion = ArchiveVersion::new(1, 0);

/// Configuration for the short grain dropper.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShortGrainDropperConfig {
    /// Rolling window size used downstream.
    pub window_size: u32,
    /// Lag offsets used downstream (must not be empty).
    pub lags: Vec<u32>,
    /// Forecast horizon.
    pub max_horizon: u32,
    /// Number of cross validation folds, if any.
    pub cross_validations: Option<u32>,
}

impl Default for ShortGrainDropperConfig {
    fn default() -> Self {
        Self {
            window_size: 0,
            lags: vec![0],
            max_horizon: 1,
            cross_validations: None,
        }
    }
}

impl ShortGrainDropperConfig {
    /// Create a configuration with the given lags.
    pub fn new(lags: Vec<u32>) -> Self {
        Self {
            lags,
            ..Self::default()
        }
    }

    /// Set the rolling window size.
    #[must_use]
    pub fn with_window_size(mut self, window_size: u32) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the forecast horizon.
    #[must_use]
    pub fn with_max_horizon(mut self, max_horizon: u32) -> Self {
        self.max_horizon = max_horizon;
        self
    }

    /// Set the number of cross validation folds.
    #[must_use]
    pub fn with_cross_validations(mut self, cross_validations: u32) -> Self {
        self.cross_validations = Some(cross_validations);
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument("lags")` when no lags are configured.
    pub fn validate(&self) -> Result<()> {
        if self.lags.is_empty() {
            return Err(FeaturizerError::invalid_argument("lags"));
        }
        Ok(())
    }

    /// Rows a grain needs to be kept; grains with this many rows or fewer are
    /// dropped.
    pub fn min_points(&self) -> u64 {
        let max_lag = self.lags.iter().copied().max().unwrap_or(0);
        let lookback = u64::from(self.window_size.max(max_lag));
        let horizon = u64::from(self.max_horizon);

        let mut min_points = if lookback > 0 {
            horizon + lookback + 1
        } else {
            horizon + 1
        };
        if let Some(cv) = self.cross_validations {
            min_points += u64::from(cv) + horizon;
        }
        min_points
    }
}

/// Grains selected for dropping by a completed training run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShortGrainDropperAnnotation {
    /// Grains with too few rows.
    pub grains_to_drop: BTreeSet<Grain>,
}

/// Counts training rows per grain.
#[derive(Debug, Clone)]
pub struct ShortGrainDropperPolicy {
    config: ShortGrainDropperConfig,
    counts: HashMap<HashKey<Grain>, u64>,
}

/// Short grain dropper estimator.
pub type ShortGrainDropperEstimator = Estimator<ShortGrainDropperPolicy>;

impl ShortGrainDropperPolicy {
    /// Create a policy from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error.
    pub fn new(config: ShortGrainDropperConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::unchecked(config))
    }

    /// Build an estimator bound to `col_index`.
    ///
    /// The column is checked before the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument("colIndex")` or `InvalidArgument("lags")`.
    pub fn estimator(
        annotation_maps: AnnotationMapsPtr,
        col_index: usize,
        config: ShortGrainDropperConfig,
    ) -> Result<ShortGrainDropperEstimator> {
        let estimator = Estimator::new(Self::unchecked(config), annotation_maps, col_index)?;
        estimator.policy().config.validate()?;
        Ok(estimator)
    }

    fn unchecked(config: ShortGrainDropperConfig) -> Self {
        Self {
            config,
            counts: HashMap::new(),
        }
    }

    /// The configuration.
    pub fn config(&self) -> &ShortGrainDropperConfig {
        &self.config
    }

    /// Rows seen so far for `grain`.
    pub fn count(&self, grain: &[String]) -> u64 {
        self.counts
            .get(&HashKey(grain.to_vec()))
            .copied()
            .unwrap_or(0)
    }
}

impl TrainingPolicy for ShortGrainDropperPolicy {
    type Input = Grain;
    type Annotation = ShortGrainDropperAnnotation;
    const NAME: &'static str = SHORT_GRAIN_DROPPER_NAME;

    fn fit(&mut self, input: &Grain) -> Result<FitResult> {
        *self.counts.entry(HashKey(input.clone())).or_insert(0) += 1;
        Ok(FitResult::Continue)
    }

    fn complete_training(&mut self) -> Result<ShortGrainDropperAnnotation> {
        let min_points = self.config.min_points();
        let grains_to_drop: BTreeSet<Grain> = self
            .counts
            .drain()
            .filter(|(_, count)| *count <= min_points)
            .map(|(grain, _)| grain.into_inner())
            .collect();

        debug!(min_points, dropped = grains_to_drop.len(), "short grains selected");
        Ok(ShortGrainDropperAnnotation { grains_to_drop })
    }
}

impl TransformerPolicy for ShortGrainDropperPolicy {
    type Transformer = ShortGrainDropperTransformer;

    fn create_transformer(
        &mut self,
        annotation: &ShortGrainDropperAnnotation,
    ) -> Result<ShortGrainDropperTransformer> {
        Ok(ShortGrainDropperTransformer::new(annotation.grains_to_drop.clone()))
    }
}

/// Answers whether a grain should be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShortGrainDropperTransformer {
    grains_to_drop: BTreeSet<Grain>,
    stream: StreamState,
}

impl ShortGrainDropperTransformer {
    /// Create a transformer that drops `grains_to_drop`.
    pub fn new(grains_to_drop: BTreeSet<Grain>) -> Self {
        Self {
            grains_to_drop,
            stream: StreamState::new(),
        }
    }

    /// Grains this transformer drops.
    pub fn grains_to_drop(&self) -> &BTreeSet<Grain> {
        &self.grains_to_drop
    }
}

impl Transformer for ShortGrainDropperTransformer {
    type Input = Grain;
    type Output = bool;

    fn execute(&mut self, input: &Grain, callback: &mut dyn FnMut(bool)) -> Result<()> {
        self.stream.ensure_open()?;
        callback(self.grains_to_drop.contains(input));
        Ok(())
    }

    fn flush(&mut self, _callback: &mut dyn FnMut(bool)) -> Result<()> {
        self.stream.mark_flushed()
    }

    fn save(&self, archive: &mut Archive) -> Result<()> {
        archive.write_version(ARCHIVE_VERSION)?;
        archive.serialize(&self.grains_to_drop)
    }

    fn load(archive: &mut Archive) -> Result<Self> {
        archive.read_version(ARCHIVE_VERSION.major)?;
        Ok(Self::new(archive.deserialize()?))
    }
}
