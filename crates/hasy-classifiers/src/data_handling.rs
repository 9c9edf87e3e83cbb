//! Data structures for the train/test splits handed to the harness.
//!
//! `SampleArray` keeps the raw per-sample shape (e.g. 32x32 images) until the
//! pipeline flattens it; `Dataset` pairs both splits with their labels and
//! checks that they line up.
use std::collections::BTreeMap;

use crate::error::{HarnessError, Result};
use crate::math::Array2;

/// Samples of one split, stored contiguously in sample order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleArray {
    data: Vec<f32>,
    n_samples: usize,
    sample_shape: Vec<usize>,
}

impl SampleArray {
    pub fn new(n_samples: usize, sample_shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        let sample_len: usize = sample_shape.iter().product();
        if sample_shape.is_empty() || sample_len == 0 {
            return Err(HarnessError::EmptyInput("sample shape"));
        }
        if data.len() != n_samples * sample_len {
            return Err(HarnessError::ShapeMismatch {
                context: "sample buffer length",
                expected: n_samples * sample_len,
                found: data.len(),
            });
        }
        Ok(Self {
            data,
            n_samples,
            sample_shape,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn sample_shape(&self) -> &[usize] {
        &self.sample_shape
    }

    /// Number of scalar features per sample once flattened.
    pub fn sample_len(&self) -> usize {
        self.sample_shape.iter().product()
    }

    /// Reshape to one row per sample, keeping sample order and element order.
    pub fn flatten(&self) -> Array2<f32> {
        Array2::from_shape_vec((self.n_samples, self.sample_len()), self.data.clone())
            .expect("SampleArray invariant: buffer length matches shape")
    }
}

/// Train and test splits with their integer labels.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub train: SampleArray,
    pub test: SampleArray,
    pub y_train: Vec<i32>,
    pub y_test: Vec<i32>,
}

impl Dataset {
    pub fn new(
        train: SampleArray,
        test: SampleArray,
        y_train: Vec<i32>,
        y_test: Vec<i32>,
    ) -> Result<Self> {
        if train.n_samples() == 0 {
            return Err(HarnessError::EmptyInput("training split"));
        }
        if y_train.len() != train.n_samples() {
            return Err(HarnessError::ShapeMismatch {
                context: "training labels vs samples",
                expected: train.n_samples(),
                found: y_train.len(),
            });
        }
        if y_test.len() != test.n_samples() {
            return Err(HarnessError::ShapeMismatch {
                context: "test labels vs samples",
                expected: test.n_samples(),
                found: y_test.len(),
            });
        }
        if train.sample_len() != test.sample_len() {
            return Err(HarnessError::ShapeMismatch {
                context: "features per sample (test vs train)",
                expected: train.sample_len(),
                found: test.sample_len(),
            });
        }
        Ok(Self {
            train,
            test,
            y_train,
            y_test,
        })
    }

    pub fn log_input_data_summary(&self) {
        log::info!(
            "{} training samples, {} test samples, sample shape {:?} ({} features)",
            self.train.n_samples(),
            self.test.n_samples(),
            self.train.sample_shape(),
            self.train.sample_len()
        );
        let counts = class_counts(&self.y_train);
        log::debug!("{} classes in training split: {:?}", counts.len(), counts);
    }
}

/// Count occurrences of each label, ordered by label.
pub fn class_counts(labels: &[i32]) -> BTreeMap<i32, usize> {
    let mut counts = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_keeps_sample_order() {
        let data: Vec<f32> = (0..8).map(|v| v as f32).collect();
        let samples = SampleArray::new(2, vec![2, 2], data).unwrap();
        let flat = samples.flatten();
        assert_eq!(flat.shape(), (2, 4));
        assert_eq!(flat.row_slice(1), &[4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn label_count_must_match() {
        let train = SampleArray::new(2, vec![1], vec![0.0, 1.0]).unwrap();
        let test = SampleArray::new(1, vec![1], vec![0.5]).unwrap();
        let err = Dataset::new(train, test, vec![0], vec![1]).unwrap_err();
        assert!(matches!(err, HarnessError::ShapeMismatch { .. }));
    }

    #[test]
    fn feature_counts_must_match() {
        let train = SampleArray::new(1, vec![2], vec![0.0, 1.0]).unwrap();
        let test = SampleArray::new(1, vec![3], vec![0.0, 1.0, 2.0]).unwrap();
        assert!(Dataset::new(train, test, vec![0], vec![0]).is_err());
    }
}
