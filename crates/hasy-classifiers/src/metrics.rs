//! Classification metrics over predicted vs. true labels.
//!
//! Both metrics are invariant under any permutation applied identically to
//! predictions and ground truth, and make no assumption about the label
//! values (they need not be contiguous or start at 0).
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// Accuracy (percentage) and macro-F1 for one (predictions, truth) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub accuracy: f64,
    pub macro_f1: f64,
}

impl Scores {
    pub fn compute(predictions: &[i32], truth: &[i32]) -> Result<Self> {
        Ok(Scores {
            accuracy: accuracy(predictions, truth)?,
            macro_f1: macro_f1(predictions, truth)?,
        })
    }
}

fn check_lengths(predictions: &[i32], truth: &[i32]) -> Result<()> {
    if predictions.len() != truth.len() {
        return Err(HarnessError::LengthMismatch {
            predictions: predictions.len(),
            truth: truth.len(),
        });
    }
    if truth.is_empty() {
        return Err(HarnessError::EmptyInput("ground truth"));
    }
    Ok(())
}

/// Percentage of predictions equal to the ground truth, in `[0, 100]`.
pub fn accuracy(predictions: &[i32], truth: &[i32]) -> Result<f64> {
    check_lengths(predictions, truth)?;
    let correct = predictions
        .iter()
        .zip(truth)
        .filter(|(p, t)| p == t)
        .count();
    Ok(correct as f64 / truth.len() as f64 * 100.0)
}

#[derive(Default, Clone, Copy)]
struct ClassCounts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

/// Unweighted mean of per-class F1 over every label seen in either input.
///
/// A class with an undefined precision or recall contributes that term as 0;
/// a class with `P + R = 0` contributes an F1 of 0.
pub fn macro_f1(predictions: &[i32], truth: &[i32]) -> Result<f64> {
    check_lengths(predictions, truth)?;

    let mut per_class: BTreeMap<i32, ClassCounts> = BTreeMap::new();
    for (&p, &t) in predictions.iter().zip(truth) {
        if p == t {
            per_class.entry(t).or_default().tp += 1;
        } else {
            per_class.entry(p).or_default().fp += 1;
            per_class.entry(t).or_default().fn_ += 1;
        }
    }

    let total: f64 = per_class.values().map(|c| class_f1(*c)).sum();
    Ok(total / per_class.len() as f64)
}

fn class_f1(c: ClassCounts) -> f64 {
    let precision = ratio(c.tp, c.tp + c.fp);
    let recall = ratio(c.tp, c.tp + c.fn_);
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
