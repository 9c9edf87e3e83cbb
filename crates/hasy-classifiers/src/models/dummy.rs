use crate::error::{HarnessError, Result};
use crate::math::Array2;
use crate::models::method_trait::Method;
use crate::models::utils::{check_features, check_fit_inputs};

/// Baseline that answers the same label for every sample.
pub struct DummyClassifier {
    label: i32,
    n_features: Option<usize>,
}

impl DummyClassifier {
    pub fn new(label: i32) -> Self {
        DummyClassifier {
            label,
            n_features: None,
        }
    }
}

impl Method for DummyClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<Vec<i32>> {
        check_fit_inputs(x, y)?;
        self.n_features = Some(x.ncols());
        Ok(vec![self.label; x.nrows()])
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>> {
        let n_features = self
            .n_features
            .ok_or(HarnessError::NotFitted("dummy_classifier"))?;
        check_features(n_features, x)?;
        Ok(vec![self.label; x.nrows()])
    }

    fn name(&self) -> &str {
        "dummy_classifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_before_fit_fails() {
        let model = DummyClassifier::new(4);
        let x = Array2::from_shape_vec((1, 2), vec![0.0, 1.0]).unwrap();
        assert!(matches!(model.predict(&x), Err(HarnessError::NotFitted(_))));
    }

    #[test]
    fn answers_constant_label() {
        let mut model = DummyClassifier::new(4);
        let x = Array2::from_shape_vec((3, 1), vec![0.0, 1.0, 2.0]).unwrap();
        assert_eq!(model.fit(&x, &[1, 2, 3]).unwrap(), vec![4, 4, 4]);
        assert_eq!(model.predict(&x).unwrap(), vec![4, 4, 4]);
    }
}
