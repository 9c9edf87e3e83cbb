use linfa::dataset::Pr;
use linfa::traits::Predict;
use linfa::Dataset;
use linfa_svm::{Svm, SvmParams};
use ndarray::{Array1, Array2 as NdArray2};

use crate::config::Kernel;
use crate::error::{HarnessError, Result};
use crate::math::Array2;
use crate::models::method_trait::Method;
use crate::models::utils::{argmax, check_features, check_fit_inputs, sorted_classes};

/// Kernel support vector classifier, one-vs-rest over the training classes.
///
/// Each binary machine produces a Platt-scaled probability; the class whose
/// machine is most confident wins. Kernels:
///
/// * linear: `<x, x'>`
/// * poly: `(gamma * <x, x'> + coef0)^degree`
/// * rbf: `exp(-gamma * |x - x'|^2)`
pub struct SVMClassifier {
    c: f64,
    kernel: Kernel,
    gamma: f64,
    degree: u32,
    coef0: f64,
    state: Option<FittedSvm>,
}

enum FittedSvm {
    /// Only one class was present at fit time.
    Constant { label: i32, n_features: usize },
    OneVsRest {
        classes: Vec<i32>,
        machines: Vec<Svm<f64, Pr>>,
        n_features: usize,
    },
}

impl SVMClassifier {
    pub fn new(c: f64, kernel: Kernel, gamma: f64, degree: u32, coef0: f64) -> Self {
        SVMClassifier {
            c,
            kernel,
            gamma,
            degree,
            coef0,
            state: None,
        }
    }

    /// Convert to `f64` records. For the polynomial kernel the features are
    /// scaled by `sqrt(gamma)` so that the backend's `(<x, x'> + coef0)^degree`
    /// equals `(gamma * <x, x'> + coef0)^degree`.
    fn records(&self, x: &Array2<f32>) -> NdArray2<f64> {
        let records = x.to_ndarray();
        match self.kernel {
            Kernel::Poly => records * self.gamma.sqrt(),
            Kernel::Linear | Kernel::Rbf => records,
        }
    }

    fn params(&self) -> SvmParams<f64, Pr> {
        let params = Svm::<f64, Pr>::params().pos_neg_weights(self.c, self.c);
        match self.kernel {
            Kernel::Linear => params.linear_kernel(),
            Kernel::Poly => params.polynomial_kernel(self.coef0, self.degree as f64),
            // The backend's Gaussian kernel is exp(-|x - x'|^2 / eps).
            Kernel::Rbf => params.gaussian_kernel(1.0 / self.gamma),
        }
    }

    fn predict_records(
        classes: &[i32],
        machines: &[Svm<f64, Pr>],
        records: &NdArray2<f64>,
    ) -> Vec<i32> {
        let scores: Vec<Array1<Pr>> = machines.iter().map(|m| m.predict(records)).collect();
        (0..records.nrows())
            .map(|row| classes[argmax(scores.iter().map(|s| *s[row] as f64))])
            .collect()
    }
}

impl Method for SVMClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<Vec<i32>> {
        check_fit_inputs(x, y)?;
        let classes = sorted_classes(y);
        let n_features = x.ncols();

        if classes.len() == 1 {
            log::warn!("svm: only class {} present in training data", classes[0]);
            self.state = Some(FittedSvm::Constant {
                label: classes[0],
                n_features,
            });
            return Ok(vec![classes[0]; x.nrows()]);
        }

        let records = self.records(x);
        let params = self.params();
        log::debug!(
            "svm: fitting {} one-vs-rest machines ({} kernel, C={})",
            classes.len(),
            self.kernel,
            self.c
        );
        let mut machines = Vec::with_capacity(classes.len());
        for &class in &classes {
            let targets = y.iter().map(|&label| label == class).collect::<Array1<bool>>();
            let dataset = Dataset::new(records.clone(), targets);
            let machine = <SvmParams<f64, Pr> as linfa::traits::Fit<_, _, _>>::fit(&params, &dataset)
                .map_err(|e| HarnessError::Numeric(format!("svm fit for class {}: {}", class, e)))?;
            machines.push(machine);
        }

        let train_preds = Self::predict_records(&classes, &machines, &records);
        self.state = Some(FittedSvm::OneVsRest {
            classes,
            machines,
            n_features,
        });
        Ok(train_preds)
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>> {
        match self.state.as_ref().ok_or(HarnessError::NotFitted("svm"))? {
            FittedSvm::Constant { label, n_features } => {
                check_features(*n_features, x)?;
                Ok(vec![*label; x.nrows()])
            }
            FittedSvm::OneVsRest {
                classes,
                machines,
                n_features,
            } => {
                check_features(*n_features, x)?;
                Ok(Self::predict_records(classes, machines, &self.records(x)))
            }
        }
    }

    fn name(&self) -> &str {
        "svm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Array2<f32>, Vec<i32>) {
        let x = Array2::from_shape_vec(
            (12, 2),
            vec![
                0.0, 0.2, 0.3, 0.1, 0.1, 0.4, 0.4, 0.3, //
                5.0, 5.2, 5.3, 5.1, 5.1, 4.8, 4.9, 5.3, //
                0.1, 5.0, 0.3, 5.2, 0.2, 4.9, 0.4, 5.1, //
            ],
        )
        .unwrap();
        (x, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2])
    }

    #[test]
    fn rbf_one_vs_rest_fits_training_data() {
        let (x, y) = separable();
        let mut model = SVMClassifier::new(10.0, Kernel::Rbf, 0.5, 1, 0.0);
        let preds = model.fit(&x, &y).unwrap();
        assert_eq!(preds.len(), y.len());
        let correct = preds.iter().zip(&y).filter(|(p, t)| p == t).count();
        assert!(correct >= 10, "only {} of 12 correct", correct);
    }

    #[test]
    fn single_class_predicts_constant() {
        let x = Array2::from_shape_vec((2, 1), vec![0.0, 1.0]).unwrap();
        let mut model = SVMClassifier::new(1.0, Kernel::Linear, 1.0, 1, 0.0);
        assert_eq!(model.fit(&x, &[5, 5]).unwrap(), vec![5, 5]);
        assert_eq!(model.predict(&x).unwrap(), vec![5, 5]);
    }

    #[test]
    fn predict_before_fit_fails() {
        let model = SVMClassifier::new(1.0, Kernel::Linear, 1.0, 1, 0.0);
        let x = Array2::from_shape_vec((1, 1), vec![0.0]).unwrap();
        assert!(matches!(model.predict(&x), Err(HarnessError::NotFitted("svm"))));
    }
}
