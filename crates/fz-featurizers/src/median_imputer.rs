//! Median Imputer.
//!
//! Replaces null inputs with the median a [`MedianEstimator`] published for
//! the same column. The imputer does no training of its own: it reads the
//! median annotation when training completes, so the median estimator must
//! complete first. Any numeric median output type is accepted and widened to
//! `f64`.
//!
//! [`MedianEstimator`]: fz_components::median::MedianEstimator

use core::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use fz_components::median::{MedianAnnotation, MEDIAN_ESTIMATOR_NAME};
use fz_core::annotation::{AnnotationMaps, AnnotationMapsPtr};
use fz_core::archive::{Archive, ArchiveVersion};
use fz_core::error::{FeaturizerError, Result};
use fz_core::estimator::{Estimator, FitResult, TrainingPolicy, TransformerPolicy};
use fz_core::num::IntOrNumeric;
use fz_core::traits::Traits;
use fz_core::transformer::{StreamState, Transformer};

/// Name the imputer annotation is published under.
pub const MEDIAN_IMPUTER_NAME: &str = "MedianImputerEstimator";

const ARCHIVE_VERSION: ArchiveVersion = ArchiveVersion::new(1, 0);

/// Median captured by the imputer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MedianImputerAnnotation {
    /// Replacement for null inputs.
    pub median: f64,
}

/// The median published for `col_index`, whatever numeric type it was
/// computed in.
fn published_median(maps: &AnnotationMaps, col_index: usize) -> Option<f64> {
    fn lookup<O: IntOrNumeric>(maps: &AnnotationMaps, col_index: usize) -> Option<f64> {
        maps.get::<MedianAnnotation<O>>(col_index, MEDIAN_ESTIMATOR_NAME)
            .map(|annotation| annotation.median.to_f64_lossy())
    }

    lookup::<f64>(maps, col_index)
        .or_else(|| lookup::<f32>(maps, col_index))
        .or_else(|| lookup::<i64>(maps, col_index))
        .or_else(|| lookup::<i32>(maps, col_index))
        .or_else(|| lookup::<i16>(maps, col_index))
        .or_else(|| lookup::<i8>(maps, col_index))
        .or_else(|| lookup::<u64>(maps, col_index))
        .or_else(|| lookup::<u32>(maps, col_index))
        .or_else(|| lookup::<u16>(maps, col_index))
        .or_else(|| lookup::<u8>(maps, col_index))
}

/// Looks up the column median when training completes.
#[derive(Debug)]
pub struct MedianImputerPolicy<T> {
    annotation_maps: AnnotationMapsPtr,
    col_index: usize,
    _input: PhantomData<fn(T)>,
}

/// Median imputer estimator over values of type `T`.
pub type MedianImputerEstimator<T = f64> = Estimator<MedianImputerPolicy<T>>;

impl<T> MedianImputerPolicy<T>
where
    T: Traits,
    T::Value: IntOrNumeric,
{
    /// Build an estimator for `col_index` reading medians from `annotation_maps`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument("colIndex")` for a column outside the maps.
    pub fn estimator(annotation_maps: AnnotationMapsPtr, col_index: usize) -> Result<MedianImputerEstimator<T>> {
        let policy = Self {
            annotation_maps: annotation_maps.clone(),
            col_index,
            _input: PhantomData,
        };
        Estimator::new(policy, annotation_maps, col_index)
    }
}

impl<T> TrainingPolicy for MedianImputerPolicy<T>
where
    T: Traits,
    T::Value: IntOrNumeric,
{
    type Input = T::Nullable;
    type Annotation = MedianImputerAnnotation;
    const NAME: &'static str = MEDIAN_IMPUTER_NAME;

    fn fit(&mut self, _input: &Self::Input) -> Result<FitResult> {
        Ok(FitResult::Complete)
    }

    fn complete_training(&mut self) -> Result<MedianImputerAnnotation> {
        let median = published_median(&self.annotation_maps.borrow(), self.col_index).ok_or_else(|| {
            FeaturizerError::invalid_state(format!(
                "no {MEDIAN_ESTIMATOR_NAME} annotation for column {}",
                self.col_index
            ))
        })?;

        debug!(col_index = self.col_index, median, "median imputer bound");
        Ok(MedianImputerAnnotation { median })
    }
}

impl<T> TransformerPolicy for MedianImputerPolicy<T>
where
    T: Traits,
    T::Value: IntOrNumeric,
{
    type Transformer = MedianImputerTransformer<T>;

    fn create_transformer(&mut self, annotation: &MedianImputerAnnotation) -> Result<Self::Transformer> {
        Ok(MedianImputerTransformer::new(annotation.median))
    }
}

/// Emits the input as `f64`, or the median when the input is null.
#[derive(Debug, Clone, Copy)]
pub struct MedianImputerTransformer<T = f64> {
    median: f64,
    stream: StreamState,
    _input: PhantomData<fn(T)>,
}

impl<T> PartialEq for MedianImputerTransformer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.median.to_bits() == other.median.to_bits() && self.stream == other.stream
    }
}

impl<T> MedianImputerTransformer<T> {
    /// Create a transformer that imputes `median`.
    pub fn new(median: f64) -> Self {
        Self {
            median,
            stream: StreamState::new(),
            _input: PhantomData,
        }
    }

    /// The replacement value.
    pub fn median(&self) -> f64 {
        self.median
    }
}

impl<T> Transformer for MedianImputerTransformer<T>
where
    T: Traits,
    T::Value: IntOrNumeric,
{
    type Input = T::Nullable;
    type Output = f64;

    fn execute(&mut self, input: &T::Nullable, callback: &mut dyn FnMut(f64)) -> Result<()> {
        self.stream.ensure_open()?;
        let output = if T::is_null(input) {
            self.median
        } else {
            T::get_nullable_value(input)?.to_f64_lossy()
        };
        callback(output);
        Ok(())
    }

    fn flush(&mut self, _callback: &mut dyn FnMut(f64)) -> Result<()> {
        self.stream.mark_flushed()
    }

    fn save(&self, archive: &mut Archive) -> Result<()> {
        archive.write_version(ARCHIVE_VERSION)?;
        archive.write_f64(self.median)
    }

    fn load(archive: &mut Archive) -> Result<Self> {
        archive.read_version(ARCHIVE_VERSION.major)?;
        Ok(Self::new(archive.read_f64()?))
    }
}
