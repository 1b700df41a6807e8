//! Estimator lifecycle.
//!
//! An [`Estimator`] wraps a [`TrainingPolicy`] (the algorithm) and enforces
//! the `Training → Trained → TransformerCreated` state machine around it.
//! The annotation produced by `complete_training` is published to the shared
//! [`AnnotationMaps`](crate::annotation::AnnotationMaps) under the policy's
//! name and the estimator's column.
//!
//! # Example
//!
//! ```rust
//! use fz_core::prelude::*;
//!
//! #[derive(Default)]
//! struct Count(usize);
//!
//! impl TrainingPolicy for Count {
//!     type Input = i32;
//!     type Annotation = usize;
//!     const NAME: &'static str = "Count";
//!
//!     fn fit(&mut self, _input: &i32) -> Result<FitResult> {
//!         self.0 += 1;
//!         Ok(FitResult::Continue)
//!     }
//!
//!     fn complete_training(&mut self) -> Result<usize> {
//!         Ok(self.0)
//!     }
//! }
//!
//! let maps = create_annotation_maps(1);
//! let mut estimator = Estimator::new(Count::default(), maps.clone(), 0).unwrap();
//! estimator.fit_buffer(&[1, 2, 3]).unwrap();
//! estimator.complete_training().unwrap();
//!
//! assert_eq!(*estimator.annotation().unwrap(), 3);
//! assert_eq!(*maps.borrow().get::<usize>(0, "Count").unwrap(), 3);
//! ```

use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotation::{AnnotationMapsPtr, AnnotationPtr};
use crate::error::{FeaturizerError, Result};
use crate::transformer::Transformer;

/// Lifecycle phase of an [`Estimator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrainingState {
    /// Accepting `fit` calls.
    Training,
    /// Annotation produced; a transformer may be created.
    Trained,
    /// The transformer has been handed out.
    TransformerCreated,
}

/// Signal returned by a `fit` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FitResult {
    /// No more input is needed.
    Complete,
    /// Keep feeding input.
    Continue,
    /// Restart the training data from the beginning and keep feeding.
    ResetAndContinue,
}

/// The training algorithm driven by an [`Estimator`].
pub trait TrainingPolicy {
    /// Item consumed by `fit`.
    type Input;

    /// Frozen training result.
    type Annotation: 'static;

    /// Name the annotation is published under.
    const NAME: &'static str;

    /// Accumulate one item.
    ///
    /// # Errors
    ///
    /// Returns an error if the item cannot be accepted.
    fn fit(&mut self, input: &Self::Input) -> Result<FitResult>;

    /// Produce the annotation from the accumulated state.
    ///
    /// # Errors
    ///
    /// Returns an error (typically `Data`) if the state cannot produce one.
    fn complete_training(&mut self) -> Result<Self::Annotation>;
}

/// A training policy that can build a transformer from its annotation.
pub trait TransformerPolicy: TrainingPolicy {
    /// Transformer produced after training.
    type Transformer: Transformer;

    /// Build the transformer.
    ///
    /// # Errors
    ///
    /// Returns an error if the annotation cannot be turned into a transformer.
    fn create_transformer(&mut self, annotation: &Self::Annotation) -> Result<Self::Transformer>;
}

/// A component that needs no training data.
pub trait InferenceOnly {
    /// Item type the estimator would accept.
    type Input;

    /// Transformer produced by the component.
    type Transformer: Transformer;

    /// Name used for the (empty) annotation.
    const NAME: &'static str;

    /// Build the transformer.
    ///
    /// # Errors
    ///
    /// Returns an error if the component's configuration is invalid.
    fn create_transformer(&mut self) -> Result<Self::Transformer>;
}

/// Adapts an [`InferenceOnly`] component to the estimator lifecycle.
///
/// `fit` reports `Complete` immediately and the annotation is `()`.
#[derive(Clone, Debug, Default)]
pub struct InferenceOnlyPolicy<C>(pub C);

impl<C: InferenceOnly> TrainingPolicy for InferenceOnlyPolicy<C> {
    type Input = C::Input;
    type Annotation = ();
    const NAME: &'static str = C::NAME;

    fn fit(&mut self, _input: &Self::Input) -> Result<FitResult> {
        Ok(FitResult::Complete)
    }

    fn complete_training(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<C: InferenceOnly> TransformerPolicy for InferenceOnlyPolicy<C> {
    type Transformer = C::Transformer;

    fn create_transformer(&mut self, _annotation: &()) -> Result<Self::Transformer> {
        self.0.create_transformer()
    }
}

/// Generic lifecycle wrapper around a [`TrainingPolicy`].
pub struct Estimator<P: TrainingPolicy> {
    policy: P,
    annotation_maps: AnnotationMapsPtr,
    col_index: usize,
    state: TrainingState,
    max_training_items: Option<u64>,
    items_fitted: u64,
    annotation: Option<Rc<P::Annotation>>,
}

impl<P: TrainingPolicy> core::fmt::Debug for Estimator<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Estimator")
            .field("name", &P::NAME)
            .field("col_index", &self.col_index)
            .field("state", &self.state)
            .field("items_fitted", &self.items_fitted)
            .finish()
    }
}

impl<P: TrainingPolicy> Estimator<P> {
    /// Create an estimator for column `col_index`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument("colIndex")` if `col_index` is not a column of
    /// `annotation_maps`.
    pub fn new(policy: P, annotation_maps: AnnotationMapsPtr, col_index: usize) -> Result<Self> {
        if col_index >= annotation_maps.borrow().len() {
            return Err(FeaturizerError::invalid_argument("colIndex"));
        }

        Ok(Self {
            policy,
            annotation_maps,
            col_index,
            state: TrainingState::Training,
            max_training_items: None,
            items_fitted: 0,
            annotation: None,
        })
    }

    /// Stop consuming input once `max` items have been fitted.
    #[must_use]
    pub fn with_max_training_items(mut self, max: u64) -> Self {
        self.max_training_items = Some(max);
        self
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn state(&self) -> TrainingState {
        self.state
    }

    /// Returns `true` once `complete_training` has succeeded.
    #[must_use]
    pub fn is_training_complete(&self) -> bool {
        self.state != TrainingState::Training
    }

    /// Column this estimator is bound to.
    #[must_use]
    pub fn col_index(&self) -> usize {
        self.col_index
    }

    /// Number of items accepted by `fit`.
    #[must_use]
    pub fn items_fitted(&self) -> u64 {
        self.items_fitted
    }

    /// Shared annotation maps.
    #[must_use]
    pub fn annotation_maps(&self) -> &AnnotationMapsPtr {
        &self.annotation_maps
    }

    /// The wrapped policy.
    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Accumulate one item.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` outside of `Training`, or the policy's error.
    pub fn fit(&mut self, input: &P::Input) -> Result<FitResult> {
        self.ensure_state(TrainingState::Training, "fit")?;

        if self.limit_reached() {
            return Ok(FitResult::Complete);
        }

        let result = self.policy.fit(input)?;
        self.items_fitted += 1;

        if result == FitResult::Continue && self.limit_reached() {
            return Ok(FitResult::Complete);
        }
        Ok(result)
    }

    /// Accumulate a batch of items, stopping at the first non-`Continue`
    /// result.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty batch, `InvalidState` outside of
    /// `Training`, or the policy's error.
    pub fn fit_buffer(&mut self, inputs: &[P::Input]) -> Result<FitResult> {
        self.ensure_state(TrainingState::Training, "fit_buffer")?;

        if inputs.is_empty() {
            return Err(FeaturizerError::invalid_argument(
                "fit_buffer requires at least one item",
            ));
        }

        for input in inputs {
            let result = self.fit(input)?;
            if result != FitResult::Continue {
                return Ok(result);
            }
        }
        Ok(FitResult::Continue)
    }

    /// Freeze training and publish the annotation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` outside of `Training`, or the policy's error; on
    /// error the estimator stays in `Training`.
    pub fn complete_training(&mut self) -> Result<()> {
        self.ensure_state(TrainingState::Training, "complete_training")?;

        let annotation = Rc::new(self.policy.complete_training()?);
        let erased: AnnotationPtr = annotation.clone();
        self.annotation_maps
            .borrow_mut()
            .push(self.col_index, P::NAME, erased)?;

        self.annotation = Some(annotation);
        self.state = TrainingState::Trained;
        debug!(
            estimator = P::NAME,
            col_index = self.col_index,
            items = self.items_fitted,
            "training complete"
        );
        Ok(())
    }

    /// The annotation produced by `complete_training`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` before training is complete.
    pub fn annotation(&self) -> Result<&P::Annotation> {
        self.annotation
            .as_deref()
            .ok_or_else(|| FeaturizerError::invalid_state("annotation requested before complete_training"))
    }

    fn limit_reached(&self) -> bool {
        self.max_training_items
            .is_some_and(|max| self.items_fitted >= max)
    }

    fn ensure_state(&self, expected: TrainingState, operation: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(FeaturizerError::invalid_state(format!(
                "{operation} called on {} in state {:?}",
                P::NAME,
                self.state
            )))
        }
    }
}

impl<P: TransformerPolicy> Estimator<P> {
    /// Build the transformer. Allowed once, after training.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the estimator is `Trained`, or the
    /// policy's error.
    pub fn create_transformer(&mut self) -> Result<P::Transformer> {
        self.ensure_state(TrainingState::Trained, "create_transformer")?;

        let annotation = self
            .annotation
            .clone()
            .ok_or_else(|| FeaturizerError::invalid_state("missing annotation"))?;
        let transformer = self.policy.create_transformer(&annotation)?;

        self.state = TrainingState::TransformerCreated;
        debug!(estimator = P::NAME, col_index = self.col_index, "transformer created");
        Ok(transformer)
    }
}
