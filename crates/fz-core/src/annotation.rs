//! Shared per-column annotation storage.
//!
//! Estimators publish their frozen training results here so that components
//! later in a pipeline can read them. Entries are append-only and grouped by
//! column index and component name; insertion order is preserved.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{FeaturizerError, Result};

/// Type-erased annotation as stored in [`AnnotationMaps`].
pub type AnnotationPtr = Rc<dyn Any>;

/// Shared handle to the annotation maps of one pipeline.
pub type AnnotationMapsPtr = Rc<RefCell<AnnotationMaps>>;

/// Create shared annotation maps for `num_columns` input columns.
#[must_use]
pub fn create_annotation_maps(num_columns: usize) -> AnnotationMapsPtr {
    Rc::new(RefCell::new(AnnotationMaps::new(num_columns)))
}

/// Per-column map from component name to the annotations it produced.
#[derive(Default)]
pub struct AnnotationMaps {
    columns: Vec<IndexMap<String, Vec<AnnotationPtr>>>,
}

impl core::fmt::Debug for AnnotationMaps {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<Vec<&String>> = self.columns.iter().map(|c| c.keys().collect()).collect();
        f.debug_struct("AnnotationMaps").field("columns", &names).finish()
    }
}

impl AnnotationMaps {
    /// Create empty maps for `num_columns` columns.
    #[must_use]
    pub fn new(num_columns: usize) -> Self {
        Self {
            columns: (0..num_columns).map(|_| IndexMap::new()).collect(),
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` when there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Append an annotation for `col_index` under `name`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument("colIndex")` if the column does not exist.
    pub fn push(&mut self, col_index: usize, name: &str, annotation: AnnotationPtr) -> Result<()> {
        let column = self
            .columns
            .get_mut(col_index)
            .ok_or_else(|| FeaturizerError::invalid_argument("colIndex"))?;

        trace!(col_index, name, "storing annotation");
        column.entry(name.to_owned()).or_default().push(annotation);
        Ok(())
    }

    /// First annotation of type `A` stored under `(col_index, name)`.
    #[must_use]
    pub fn get<A: 'static>(&self, col_index: usize, name: &str) -> Option<Rc<A>> {
        self.get_all::<A>(col_index, name).into_iter().next()
    }

    /// Every annotation of type `A` stored under `(col_index, name)`, oldest
    /// first.
    #[must_use]
    pub fn get_all<A: 'static>(&self, col_index: usize, name: &str) -> Vec<Rc<A>> {
        self.columns
            .get(col_index)
            .and_then(|column| column.get(name))
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| Rc::clone(entry).downcast::<A>().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Component names with annotations for `col_index`, in insertion order.
    pub fn names(&self, col_index: usize) -> impl Iterator<Item = &str> {
        self.columns
            .get(col_index)
            .into_iter()
            .flat_map(|column| column.keys().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Median(f64);

    #[test]
    fn test_push_and_get() {
        let maps = create_annotation_maps(2);
        maps.borrow_mut()
            .push(1, "MedianEstimator", Rc::new(Median(2.5)))
            .unwrap();

        let maps = maps.borrow();
        assert_eq!(maps.len(), 2);
        assert_eq!(*maps.get::<Median>(1, "MedianEstimator").unwrap(), Median(2.5));
        assert!(maps.get::<Median>(0, "MedianEstimator").is_none());
        assert!(maps.get::<String>(1, "MedianEstimator").is_none());
        assert!(maps.get::<Median>(5, "MedianEstimator").is_none());
    }

    #[test]
    fn test_push_out_of_range() {
        let mut maps = AnnotationMaps::new(1);
        let err = maps.push(1, "x", Rc::new(1u8)).unwrap_err();
        assert!(err.to_string().contains("colIndex"));
    }

    #[test]
    fn test_names_keep_insertion_order() {
        let mut maps = AnnotationMaps::new(1);
        maps.push(0, "b", Rc::new(1u8)).unwrap();
        maps.push(0, "a", Rc::new(2u8)).unwrap();
        maps.push(0, "b", Rc::new(3u8)).unwrap();

        assert_eq!(maps.names(0).collect::<Vec<_>>(), vec!["b", "a"]);
        let all: Vec<u8> = maps.get_all::<u8>(0, "b").iter().map(|v| **v).collect();
        assert_eq!(all, vec![1, 3]);
    }
}
