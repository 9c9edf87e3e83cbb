use crate::config::MethodConfig;
use crate::error::Result;
use crate::models::dummy::DummyClassifier;
use crate::models::kmeans::KMeans;
use crate::models::logistic::LogisticRegression;
use crate::models::method_trait::Method;
use crate::models::svm::SVMClassifier;

/// Build a fresh, unfitted method from its configuration.
///
/// `seed` is handed to methods with stochastic internals. Invalid
/// hyper-parameters are rejected here, before any data is touched.
pub fn build_method(config: &MethodConfig, seed: u64) -> Result<Box<dyn Method>> {
    config.validate()?;
    let method: Box<dyn Method> = match *config {
        MethodConfig::Dummy { label } => Box::new(DummyClassifier::new(label)),
        MethodConfig::KMeans { k, max_iters } => Box::new(KMeans::new(k, max_iters, seed)),
        MethodConfig::LogisticRegression { lr, max_iters } => {
            Box::new(LogisticRegression::new(lr, max_iters))
        }
        MethodConfig::Svm {
            c,
            kernel,
            gamma,
            degree,
            coef0,
        } => Box::new(SVMClassifier::new(c, kernel, gamma, degree, coef0)),
    };
    Ok(method)
}
