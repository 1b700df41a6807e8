//! Training driver.
//!
//! [`train`] feeds a slice of training items through an estimator, honouring
//! the [`FitResult`] protocol, and completes training. [`ErasedEstimator`]
//! lets estimators with different policies be finished together.

use tracing::{debug, warn};

use crate::error::{FeaturizerError, Result};
use crate::estimator::{Estimator, FitResult, TrainingPolicy, TrainingState};

/// Upper bound on the number of passes over the training data.
pub const MAX_TRAINING_PASSES: usize = 16;

/// Train `estimator` on `items` and complete training.
///
/// Stops feeding on `Complete`, and restarts from the first item on
/// `ResetAndContinue`. Returns the number of passes made.
///
/// # Errors
///
/// Returns the estimator's errors, or `InvalidState` if the estimator keeps
/// requesting resets past [`MAX_TRAINING_PASSES`].
///
/// # Example
///
/// ```rust
/// use fz_core::prelude::*;
///
/// struct Max(i32);
///
/// impl TrainingPolicy for Max {
///     type Input = i32;
///     type Annotation = i32;
///     const NAME: &'static str = "Max";
///
///     fn fit(&mut self, input: &i32) -> Result<FitResult> {
///         self.0 = self.0.max(*input);
///         Ok(FitResult::Continue)
///     }
///
///     fn complete_training(&mut self) -> Result<i32> {
///         Ok(self.0)
///     }
/// }
///
/// let mut estimator = Estimator::new(Max(i32::MIN), create_annotation_maps(1), 0).unwrap();
/// assert_eq!(train(&mut estimator, &[3, 9, 4]).unwrap(), 1);
/// assert_eq!(*estimator.annotation().unwrap(), 9);
/// ```
pub fn train<P: TrainingPolicy>(estimator: &mut Estimator<P>, items: &[P::Input]) -> Result<usize> {
    for pass in 1..=MAX_TRAINING_PASSES {
        let mut reset = false;

        for item in items {
            match estimator.fit(item)? {
                FitResult::Continue => {}
                FitResult::Complete => {
                    debug!(estimator = P::NAME, pass, "estimator requested early completion");
                    estimator.complete_training()?;
                    return Ok(pass);
                }
                FitResult::ResetAndContinue => {
                    reset = true;
                    break;
                }
            }
        }

        if !reset {
            estimator.complete_training()?;
            return Ok(pass);
        }
        debug!(estimator = P::NAME, pass, "restarting training pass");
    }

    warn!(estimator = P::NAME, passes = MAX_TRAINING_PASSES, "training did not settle");
    Err(FeaturizerError::invalid_state(format!(
        "{} requested more than {MAX_TRAINING_PASSES} training passes",
        P::NAME
    )))
}

/// Type-erased view of an [`Estimator`] for heterogeneous collections.
pub trait ErasedEstimator {
    /// Name of the wrapped policy.
    fn name(&self) -> &'static str;

    /// Column the estimator is bound to.
    fn col_index(&self) -> usize;

    /// Current lifecycle phase.
    fn state(&self) -> TrainingState;

    /// Complete training.
    ///
    /// # Errors
    ///
    /// Returns the estimator's `complete_training` error.
    fn complete_training(&mut self) -> Result<()>;
}

impl<P: TrainingPolicy> ErasedEstimator for Estimator<P> {
    fn name(&self) -> &'static str {
        P::NAME
    }

    fn col_index(&self) -> usize {
        Estimator::col_index(self)
    }

    fn state(&self) -> TrainingState {
        Estimator::state(self)
    }

    fn complete_training(&mut self) -> Result<()> {
        Estimator::complete_training(self)
    }
}

/// Complete every estimator still in `Training`, in order.
///
/// # Errors
///
/// Stops at and returns the first failure.
pub fn complete_all(estimators: &mut [Box<dyn ErasedEstimator>]) -> Result<()> {
    for estimator in estimators.iter_mut() {
        if estimator.state() == TrainingState::Training {
            estimator.complete_training()?;
        }
    }
    Ok(())
}
