//! K-fold cross-validation over a preprocessed training matrix.
//!
//! Folds are contiguous index blocks (optionally over a seeded permutation).
//! Each fold trains its own fresh method instance, so folds run in parallel
//! on the rayon pool and only read the shared matrix.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::error::{HarnessError, Result};
use crate::math::Array2;
use crate::metrics::Scores;
use crate::models::Method;

/// Fail unless `1 < k <= n`.
pub fn check_fold_count(n: usize, k: usize) -> Result<()> {
    if k < 2 || k > n {
        return Err(HarnessError::InvalidFoldCount { k, n });
    }
    Ok(())
}

/// Split `0..n` into `k` disjoint folds covering every index once.
///
/// The first `n % k` folds hold `ceil(n / k)` indices, the rest
/// `floor(n / k)`. With `shuffle_seed` the indices are permuted by a
/// `StdRng` seeded from it before blocking.
pub fn k_fold_indices(n: usize, k: usize, shuffle_seed: Option<u64>) -> Result<Vec<Vec<usize>>> {
    check_fold_count(n, k)?;

    let mut order: Vec<usize> = (0..n).collect();
    if let Some(seed) = shuffle_seed {
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
    }

    let base = n / k;
    let extra = n % k;
    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for fold in 0..k {
        let len = if fold < extra { base + 1 } else { base };
        folds.push(order[start..start + len].to_vec());
        start += len;
    }
    Ok(folds)
}

/// Metrics for one fold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldResult {
    pub fold: usize,
    pub train_size: usize,
    pub validation_size: usize,
    pub train: Scores,
    pub validation: Scores,
}

/// Per-fold results plus their aggregates. Standard deviations are the
/// population form (divide by `k`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossValidationReport {
    pub folds: Vec<FoldResult>,
    pub mean_accuracy: f64,
    pub std_accuracy: f64,
    pub mean_macro_f1: f64,
    pub std_macro_f1: f64,
    pub mean_train_accuracy: f64,
    pub mean_train_macro_f1: f64,
}

impl CrossValidationReport {
    fn from_folds(folds: Vec<FoldResult>) -> Self {
        let val_acc: Vec<f64> = folds.iter().map(|f| f.validation.accuracy).collect();
        let val_f1: Vec<f64> = folds.iter().map(|f| f.validation.macro_f1).collect();
        let train_acc: Vec<f64> = folds.iter().map(|f| f.train.accuracy).collect();
        let train_f1: Vec<f64> = folds.iter().map(|f| f.train.macro_f1).collect();

        CrossValidationReport {
            mean_accuracy: val_acc.iter().mean(),
            std_accuracy: val_acc.iter().population_std_dev(),
            mean_macro_f1: val_f1.iter().mean(),
            std_macro_f1: val_f1.iter().population_std_dev(),
            mean_train_accuracy: train_acc.iter().mean(),
            mean_train_macro_f1: train_f1.iter().mean(),
            folds,
        }
    }
}

/// Run k-fold cross-validation of the methods produced by `make_method`.
///
/// The fold count is checked before any method is built or fitted.
pub fn cross_validate<F>(
    x: &Array2<f32>,
    y: &[i32],
    k: usize,
    shuffle_seed: Option<u64>,
    make_method: F,
) -> Result<CrossValidationReport>
where
    F: Fn() -> Result<Box<dyn Method>> + Sync,
{
    if x.nrows() != y.len() {
        return Err(HarnessError::ShapeMismatch {
            context: "labels vs samples",
            expected: x.nrows(),
            found: y.len(),
        });
    }
    let folds = k_fold_indices(x.nrows(), k, shuffle_seed)?;
    log::info!("Running {}-fold cross-validation on {} samples", k, x.nrows());

    let results = folds
        .par_iter()
        .enumerate()
        .map(|(fold, validation_idx)| {
            run_fold(fold, &folds, validation_idx, x, y, &make_method)
        })
        .collect::<Result<Vec<FoldResult>>>()?;

    let report = CrossValidationReport::from_folds(results);
    log::info!(
        "Cross-validation: accuracy = {:.3}% (std {:.3}) - F1-score = {:.6} (std {:.6})",
        report.mean_accuracy,
        report.std_accuracy,
        report.mean_macro_f1,
        report.std_macro_f1
    );
    Ok(report)
}

fn run_fold<F>(
    fold: usize,
    folds: &[Vec<usize>],
    validation_idx: &[usize],
    x: &Array2<f32>,
    y: &[i32],
    make_method: &F,
) -> Result<FoldResult>
where
    F: Fn() -> Result<Box<dyn Method>>,
{
    let train_idx: Vec<usize> = folds
        .iter()
        .enumerate()
        .filter(|(other, _)| *other != fold)
        .flat_map(|(_, idx)| idx.iter().copied())
        .collect();

    let x_train = x.select_rows(&train_idx);
    let y_train: Vec<i32> = train_idx.iter().map(|&i| y[i]).collect();
    let x_val = x.select_rows(validation_idx);
    let y_val: Vec<i32> = validation_idx.iter().map(|&i| y[i]).collect();

    let mut method = make_method()?;
    let train_preds = method.fit(&x_train, &y_train)?;
    let val_preds = method.predict(&x_val)?;

    let result = FoldResult {
        fold,
        train_size: train_idx.len(),
        validation_size: validation_idx.len(),
        train: Scores::compute(&train_preds, &y_train)?,
        validation: Scores::compute(&val_preds, &y_val)?,
    };
    log::debug!(
        "Fold {} ({}): train accuracy = {:.3}%, validation accuracy = {:.3}% - F1-score = {:.6}",
        fold,
        method.name(),
        result.train.accuracy,
        result.validation.accuracy,
        result.validation.macro_f1
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uneven_split_front_loads_the_remainder() {
        let folds = k_fold_indices(7, 3, None).unwrap();
        let sizes: Vec<usize> = folds.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 2, 2]);
        assert_eq!(folds[0], vec![0, 1, 2]);
        assert_eq!(folds[2], vec![5, 6]);
    }

    #[test]
    fn shuffled_folds_are_reproducible_partitions() {
        let a = k_fold_indices(20, 4, Some(3)).unwrap();
        let b = k_fold_indices(20, 4, Some(3)).unwrap();
        assert_eq!(a, b);

        let mut all: Vec<usize> = a.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn rejects_out_of_range_k() {
        assert!(matches!(
            k_fold_indices(5, 1, None),
            Err(HarnessError::InvalidFoldCount { k: 1, n: 5 })
        ));
        assert!(matches!(
            k_fold_indices(5, 6, None),
            Err(HarnessError::InvalidFoldCount { k: 6, n: 5 })
        ));
    }

    #[test]
    fn population_std_of_fold_scores() {
        let fold = |acc: f64| FoldResult {
            fold: 0,
            train_size: 1,
            validation_size: 1,
            train: Scores { accuracy: 100.0, macro_f1: 1.0 },
            validation: Scores { accuracy: acc, macro_f1: acc / 100.0 },
        };
        let report = CrossValidationReport::from_folds(vec![fold(50.0), fold(100.0)]);
        assert!((report.mean_accuracy - 75.0).abs() < 1e-12);
        assert!((report.std_accuracy - 25.0).abs() < 1e-12);
        assert!((report.mean_train_accuracy - 100.0).abs() < 1e-12);
    }
}
