//! Integration tests for fold assignment and the cross-validation engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hasy_classifiers::config::MethodConfig;
use hasy_classifiers::cross_validation::{cross_validate, k_fold_indices};
use hasy_classifiers::error::{HarnessError, Result};
use hasy_classifiers::math::Array2;
use hasy_classifiers::models::factory::build_method;
use hasy_classifiers::models::Method;

/// Counts every `fit` call so tests can assert nothing was trained.
struct CountingMethod {
    fits: Arc<AtomicUsize>,
    inner: Box<dyn Method>,
}

impl Method for CountingMethod {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<Vec<i32>> {
        self.fits.fetch_add(1, Ordering::SeqCst);
        self.inner.fit(x, y)
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>> {
        self.inner.predict(x)
    }
}

fn column(n: usize) -> (Array2<f32>, Vec<i32>) {
    let x = Array2::from_shape_vec((n, 1), (0..n).map(|v| v as f32).collect()).unwrap();
    let y = (0..n).map(|v| (v % 3) as i32).collect();
    (x, y)
}

// ---------------------------------------------------------------------------
// Fold assignment
// ---------------------------------------------------------------------------

#[test]
fn ten_samples_five_folds() {
    let folds = k_fold_indices(10, 5, None).unwrap();
    assert_eq!(folds.len(), 5);
    for (i, fold) in folds.iter().enumerate() {
        assert_eq!(fold, &vec![2 * i, 2 * i + 1]);
    }
}

#[test]
fn folds_partition_every_index_once() {
    for n in 2..30 {
        for k in 2..=n.min(9) {
            let folds = k_fold_indices(n, k, None).unwrap();
            let floor = n / k;
            let ceil = (n + k - 1) / k;
            assert!(folds.iter().all(|f| f.len() == floor || f.len() == ceil));

            let mut seen = vec![0usize; n];
            for idx in folds.iter().flatten() {
                seen[*idx] += 1;
            }
            assert!(seen.iter().all(|&c| c == 1), "n={} k={}", n, k);
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[test]
fn invalid_fold_counts_fit_nothing() {
    let (x, y) = column(4);
    for k in [0, 1, 5] {
        let fits = Arc::new(AtomicUsize::new(0));
        let result = cross_validate(&x, &y, k, None, || {
            Ok(Box::new(CountingMethod {
                fits: Arc::clone(&fits),
                inner: build_method(&MethodConfig::Dummy { label: 0 }, 0)?,
            }) as Box<dyn Method>)
        });
        assert!(matches!(result, Err(HarnessError::InvalidFoldCount { .. })));
        assert_eq!(fits.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn every_fold_gets_a_fresh_method() {
    let (x, y) = column(12);
    let fits = Arc::new(AtomicUsize::new(0));
    let report = cross_validate(&x, &y, 4, None, || {
        Ok(Box::new(CountingMethod {
            fits: Arc::clone(&fits),
            inner: build_method(&MethodConfig::Dummy { label: 0 }, 0)?,
        }) as Box<dyn Method>)
    })
    .unwrap();
    assert_eq!(fits.load(Ordering::SeqCst), 4);
    assert_eq!(report.folds.len(), 4);
    for (i, fold) in report.folds.iter().enumerate() {
        assert_eq!(fold.fold, i);
        assert_eq!(fold.validation_size, 3);
        assert_eq!(fold.train_size, 9);
    }
}

#[test]
fn dummy_baseline_runs_through_cross_validation() {
    // Labels cycle 0,1,2 so every fold of 3 holds one of each.
    let (x, y) = column(9);
    let config = MethodConfig::Dummy { label: 0 };
    let report = cross_validate(&x, &y, 3, None, || build_method(&config, 0)).unwrap();

    let third = 100.0 / 3.0;
    assert!((report.mean_accuracy - third).abs() < 1e-9);
    assert!(report.std_accuracy.abs() < 1e-9);
    // Per fold only class 0 has nonzero F1: P = 1/3, R = 1, F1 = 0.5.
    assert!((report.mean_macro_f1 - 0.5 / 3.0).abs() < 1e-9);
    assert!((report.mean_train_accuracy - third).abs() < 1e-9);
}

#[test]
fn label_length_mismatch_is_rejected() {
    let (x, _) = column(6);
    let config = MethodConfig::Dummy { label: 0 };
    let result = cross_validate(&x, &[0, 1], 2, None, || build_method(&config, 0));
    assert!(matches!(result, Err(HarnessError::ShapeMismatch { .. })));
}
