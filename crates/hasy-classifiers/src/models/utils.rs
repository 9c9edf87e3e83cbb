//! Input checks and small helpers shared by the method implementations.
use std::collections::BTreeMap;

use crate::error::{HarnessError, Result};
use crate::math::Array2;

/// Validate the inputs of `fit`: non-empty, one label per row.
pub fn check_fit_inputs(x: &Array2<f32>, y: &[i32]) -> Result<()> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(HarnessError::EmptyInput("training features"));
    }
    if y.len() != x.nrows() {
        return Err(HarnessError::ShapeMismatch {
            context: "labels vs training samples",
            expected: x.nrows(),
            found: y.len(),
        });
    }
    Ok(())
}

/// Validate that `x` has the feature count seen at fit time.
pub fn check_features(expected: usize, x: &Array2<f32>) -> Result<()> {
    if x.ncols() != expected {
        return Err(HarnessError::ShapeMismatch {
            context: "features at predict time vs fit time",
            expected,
            found: x.ncols(),
        });
    }
    Ok(())
}

/// Distinct labels in ascending order.
pub fn sorted_classes(y: &[i32]) -> Vec<i32> {
    let mut classes = y.to_vec();
    classes.sort_unstable();
    classes.dedup();
    classes
}

/// Most frequent label; ties go to the smallest label.
pub fn majority_label<'a, I>(labels: I) -> Option<i32>
where
    I: IntoIterator<Item = &'a i32>,
{
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for &label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(i32, usize)>, (label, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        })
        .map(|(label, _)| label)
}

/// Index of the largest value; the first one wins on ties.
pub fn argmax<I>(values: I) -> usize
where
    I: IntoIterator<Item = f64>,
{
    let mut best_idx = 0;
    let mut best = f64::NEG_INFINITY;
    for (idx, value) in values.into_iter().enumerate() {
        if value > best {
            best = value;
            best_idx = idx;
        }
    }
    best_idx
}
