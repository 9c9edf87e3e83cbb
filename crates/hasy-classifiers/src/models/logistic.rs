use std::collections::HashMap;

use ndarray::Array2 as NdArray2;

use crate::error::{HarnessError, Result};
use crate::math::Array2;
use crate::models::method_trait::Method;
use crate::models::utils::{argmax, check_features, check_fit_inputs, sorted_classes};

/// Multinomial logistic regression trained with full-batch gradient descent.
///
/// The gradient of the cross-entropy loss is summed (not averaged) over the
/// training samples, so the learning rate scales with the training set size.
pub struct LogisticRegression {
    lr: f64,
    max_iters: usize,
    weights: Option<NdArray2<f64>>,
    classes: Vec<i32>,
}

impl LogisticRegression {
    pub fn new(lr: f64, max_iters: usize) -> Self {
        LogisticRegression {
            lr,
            max_iters,
            weights: None,
            classes: Vec::new(),
        }
    }

    fn label_rows(&self, logits: &NdArray2<f64>) -> Vec<i32> {
        logits
            .rows()
            .into_iter()
            .map(|row| self.classes[argmax(row.iter().copied())])
            .collect()
    }
}

/// Row-wise softmax, shifted by the row maximum for stability.
fn softmax_inplace(logits: &mut NdArray2<f64>) {
    for mut row in logits.rows_mut() {
        let max = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row /= sum;
    }
}

impl Method for LogisticRegression {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<Vec<i32>> {
        check_fit_inputs(x, y)?;

        self.classes = sorted_classes(y);
        let index: HashMap<i32, usize> = self
            .classes
            .iter()
            .enumerate()
            .map(|(i, &label)| (label, i))
            .collect();

        let features = x.to_ndarray();
        let mut one_hot = NdArray2::<f64>::zeros((x.nrows(), self.classes.len()));
        for (row, label) in y.iter().enumerate() {
            one_hot[[row, index[label]]] = 1.0;
        }

        let mut weights = NdArray2::<f64>::zeros((x.ncols(), self.classes.len()));
        for iter in 0..self.max_iters {
            let mut probs = features.dot(&weights);
            softmax_inplace(&mut probs);
            let residual = probs - &one_hot;
            let gradient = features.t().dot(&residual);
            weights.scaled_add(-self.lr, &gradient);

            if weights.iter().any(|w| !w.is_finite()) {
                return Err(HarnessError::Numeric(format!(
                    "logistic_regression diverged at iteration {} (learning rate {} too large?)",
                    iter, self.lr
                )));
            }
        }

        let train_logits = features.dot(&weights);
        self.weights = Some(weights);
        Ok(self.label_rows(&train_logits))
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>> {
        let weights = self
            .weights
            .as_ref()
            .ok_or(HarnessError::NotFitted("logistic_regression"))?;
        check_features(weights.nrows(), x)?;
        Ok(self.label_rows(&x.to_ndarray().dot(weights)))
    }

    fn name(&self) -> &str {
        "logistic_regression"
    }
}
