use crate::error::Result;
use crate::math::Array2;

/// The contract every learning method satisfies, classifier or clusterer.
///
/// Hyper-parameters are bound when the method is constructed (see
/// `models::factory`); the harness only ever sees `Box<dyn Method>`.
pub trait Method {
    /// Train on `x` (rows are samples) and return predictions on `x` itself.
    ///
    /// Unsupervised methods use `y` only to name their clusters. Calling
    /// `fit` again overwrites previously fitted state.
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<Vec<i32>>;

    /// Predict one label per row using fitted state only.
    ///
    /// Fails with `HarnessError::NotFitted` before `fit` has succeeded.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>>;

    /// Optional human readable name for the method
    fn name(&self) -> &str {
        "method"
    }
}

impl<M: Method + ?Sized> Method for Box<M> {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<Vec<i32>> {
        (**self).fit(x, y)
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>> {
        (**self).predict(x)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
